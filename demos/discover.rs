// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Demo program: print a discovery report of a simulated BACnet network.
//!
//! The report runs against the in-memory loopback client, once per
//! broadcast address. Without arguments the broadcast addresses of the
//! local interfaces are used.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example discover -- [broadcast-address...]
//! ```
//!
//! # Example
//!
//! ```bash
//! RUST_LOG=bacnet_binding=debug cargo run --example discover -- 192.168.1.255
//! ```

use std::env;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use bacnet_binding::client::{Device, MemoryClient};
use bacnet_binding::diagnostics::{broadcast_addresses, discover_report};
use bacnet_binding::types::{BinaryPv, EncodedValue, ObjectType};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn simulated_network() -> Arc<MemoryClient> {
    let client = Arc::new(MemoryClient::new());

    client.add_device(
        Device::new(701_105, "192.168.1.40:47808".parse().unwrap())
            .with_name("AHU-1")
            .with_model_name("AX-200")
            .with_vendor_name("Acme Controls"),
    );
    client.add_object(701_105, ObjectType::AnalogInput, 1, EncodedValue::Real(18.4));
    client.describe_object(
        701_105,
        ObjectType::AnalogInput,
        1,
        "Supply Temp",
        "degreesCelsius",
        "Supply air temperature",
    );
    client.add_object(701_105, ObjectType::AnalogValue, 3, EncodedValue::Real(21.0));
    client.describe_object(
        701_105,
        ObjectType::AnalogValue,
        3,
        "Setpoint",
        "degreesCelsius",
        "Room temperature setpoint",
    );
    client.add_object(701_105, ObjectType::BinaryOutput, 2, EncodedValue::Binary(BinaryPv::Active));
    client.describe_object(701_105, ObjectType::BinaryOutput, 2, "Supply Fan", "", "Fan command");

    client.add_device(
        Device::new(42, "192.168.1.41:47808".parse().unwrap())
            .with_name("Lobby Lights")
            .with_vendor_name("Lumen Systems"),
    );
    client.add_object(42, ObjectType::MultiStateValue, 1, EncodedValue::Unsigned(2));
    client.describe_object(42, ObjectType::MultiStateValue, 1, "Scene", "", "Active scene");

    client
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = env::args().skip(1).collect();

    let broadcasts: Vec<Ipv4Addr> = if args.is_empty() {
        println!("Fetching network interfaces");
        broadcast_addresses()?
    } else {
        args.iter()
            .map(|arg| arg.parse::<Ipv4Addr>())
            .collect::<Result<_, _>>()?
    };

    let client = simulated_network();
    let mut stdout = std::io::stdout().lock();

    let found = discover_report(
        &client.connector(),
        &broadcasts,
        Duration::from_secs(2),
        &mut stdout,
    )
    .await?;

    tracing::info!(devices = found, "Report finished");
    Ok(())
}
