// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! One-shot network diagnostics.
//!
//! [`broadcast_addresses`] lists the IPv4 broadcast address of every
//! non-loopback interface. [`discover_report`] runs a discovery on each of
//! them and writes what it finds (device metadata, objects, present values)
//! in a human readable form.

use std::io::{self, Write};
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use crate::client::{BacnetClient, ClientConnector, Device};
use crate::config::{DEFAULT_LOCAL_DEVICE_ID, NetworkConfig};
use crate::error::Error;

/// How long a report listens for devices on each broadcast address.
pub const DEFAULT_REPORT_TIMEOUT: Duration = Duration::from_secs(30);

/// Returns the broadcast addresses of all non-loopback IPv4 interfaces.
///
/// Addresses are deduplicated and sorted.
///
/// # Errors
///
/// Returns an I/O error if the interfaces cannot be enumerated.
#[cfg(unix)]
pub fn broadcast_addresses() -> io::Result<Vec<Ipv4Addr>> {
    use nix::net::if_::InterfaceFlags;

    let mut addresses: Vec<Ipv4Addr> = nix::ifaddrs::getifaddrs()?
        .filter(|ia| !ia.flags.contains(InterfaceFlags::IFF_LOOPBACK))
        .filter_map(|ia| {
            ia.broadcast
                .and_then(|addr| addr.as_sockaddr_in().map(|addr| Ipv4Addr::from(addr.ip())))
        })
        .filter(|ip| !ip.is_unspecified())
        .collect();

    addresses.sort_unstable();
    addresses.dedup();
    Ok(addresses)
}

/// Returns no addresses on platforms without interface enumeration.
///
/// # Errors
///
/// Never fails.
#[cfg(not(unix))]
pub fn broadcast_addresses() -> io::Result<Vec<Ipv4Addr>> {
    Ok(Vec::new())
}

/// Discovers devices on each broadcast address and writes a report.
///
/// A client is connected per address with the local device instance 1339
/// and stopped once its devices were listed. Failed reads of individual
/// present values are reported inline.
///
/// Returns the number of devices found on all addresses.
///
/// # Errors
///
/// Returns [`Error::Client`] if a client cannot be connected or started,
/// and [`Error::Io`] if writing to `out` fails.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use bacnet_binding::client::{Device, MemoryClient};
/// use bacnet_binding::diagnostics::discover_report;
/// use bacnet_binding::types::{EncodedValue, ObjectType};
///
/// # async fn example() -> bacnet_binding::Result<()> {
/// let client = Arc::new(MemoryClient::new());
/// client.add_device(Device::new(7, "10.0.0.7:47808".parse().unwrap()).with_name("AHU-1"));
/// client.add_object(7, ObjectType::AnalogInput, 1, EncodedValue::Real(21.5));
///
/// let mut out = Vec::new();
/// let found = discover_report(
///     &client.connector(),
///     &["10.0.0.255".parse().unwrap()],
///     Duration::from_secs(1),
///     &mut out,
/// )
/// .await?;
///
/// assert_eq!(found, 1);
/// assert!(String::from_utf8(out).unwrap().ends_with("Discovery complete\n"));
/// # Ok(())
/// # }
/// ```
pub async fn discover_report<W: Write>(
    connector: &dyn ClientConnector,
    broadcasts: &[Ipv4Addr],
    timeout: Duration,
    out: &mut W,
) -> Result<usize, Error> {
    if broadcasts.is_empty() {
        writeln!(out, "No broadcast interfaces found")?;
    }

    let mut found = 0;
    for broadcast in broadcasts {
        writeln!(
            out,
            "Discovering devices on {broadcast} ({} s timeout)",
            timeout.as_secs()
        )?;

        let network = NetworkConfig::new()
            .with_broadcast(IpAddr::V4(*broadcast))
            .with_local_device_id(DEFAULT_LOCAL_DEVICE_ID);
        let client = connector.connect(&network)?;
        client.start().await?;
        tracing::info!(%broadcast, "Running diagnostic discovery");

        let result = report_network(&client, timeout, out).await;
        client.stop().await;
        found += result?;
    }

    writeln!(out, "Discovery complete")?;
    Ok(found)
}

async fn report_network<W: Write>(
    client: &Arc<dyn BacnetClient>,
    timeout: Duration,
    out: &mut W,
) -> Result<usize, Error> {
    let devices = client.collect_devices(timeout).await?;
    if devices.is_empty() {
        writeln!(out, "  no devices found")?;
        return Ok(0);
    }

    for device in &devices {
        report_device(client, device, out).await?;
    }
    Ok(devices.len())
}

async fn report_device<W: Write>(
    client: &Arc<dyn BacnetClient>,
    device: &Device,
    out: &mut W,
) -> Result<(), Error> {
    writeln!(out, "  Device {}", device.instance_number)?;
    writeln!(out, "    Address: {}", device.socket_addr())?;
    writeln!(out, "    Name:    {}", device.name)?;
    writeln!(out, "    Model:   {}", device.model_name)?;
    writeln!(out, "    Vendor:  {}", device.vendor_name)?;

    let properties = match client.device_properties(device).await {
        Ok(properties) => properties,
        Err(e) => {
            tracing::warn!(device_id = device.instance_number, error = %e, "Cannot list properties");
            writeln!(out, "    properties unavailable: {e}")?;
            return Ok(());
        }
    };

    if properties.is_empty() {
        writeln!(out, "    no properties found")?;
        return Ok(());
    }

    writeln!(out, "    Properties:")?;
    for info in properties {
        let value = match client.read_property(&info.property).await {
            Ok(value) => value.to_string(),
            Err(e) => format!("<{e}>"),
        };
        writeln!(
            out,
            "      {} {}: present value {value}",
            info.property.object_type, info.property.object_id
        )?;
        writeln!(out, "        Name:        {}", info.name)?;
        writeln!(out, "        Units:       {}", info.units)?;
        writeln!(out, "        Description: {}", info.description)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MemoryClient;
    use crate::error::ClientError;
    use crate::types::{EncodedValue, ObjectType};

    fn network() -> Arc<MemoryClient> {
        let client = Arc::new(MemoryClient::new());
        client.add_device(
            Device::new(7, "10.0.0.7:47808".parse().unwrap())
                .with_name("AHU-1")
                .with_model_name("AX-200")
                .with_vendor_name("Acme Controls"),
        );
        client.add_object(7, ObjectType::AnalogInput, 1, EncodedValue::Real(21.5));
        client.describe_object(7, ObjectType::AnalogInput, 1, "Supply Temp", "degreesCelsius", "Supply air");
        client
    }

    fn broadcast() -> Vec<Ipv4Addr> {
        vec![Ipv4Addr::new(10, 0, 0, 255)]
    }

    #[tokio::test]
    async fn report_lists_devices_and_properties() {
        let client = network();
        let mut out = Vec::new();

        let found = discover_report(&client.connector(), &broadcast(), Duration::from_secs(1), &mut out)
            .await
            .unwrap();
        let report = String::from_utf8(out).unwrap();

        assert_eq!(found, 1);
        assert!(report.contains("Discovering devices on 10.0.0.255"));
        assert!(report.contains("Address: 10.0.0.7:47808"));
        assert!(report.contains("Vendor:  Acme Controls"));
        assert!(report.contains("analogInput 1: present value 21.5"));
        assert!(report.contains("Units:       degreesCelsius"));
        assert!(report.ends_with("Discovery complete\n"));
        assert!(!client.is_started());
    }

    #[tokio::test]
    async fn failed_read_is_reported_inline() {
        let client = network();
        client.fail_next_read(7, ObjectType::AnalogInput, 1, ClientError::Timeout(3000));
        let mut out = Vec::new();

        discover_report(&client.connector(), &broadcast(), Duration::from_secs(1), &mut out)
            .await
            .unwrap();
        let report = String::from_utf8(out).unwrap();

        assert!(report.contains("present value <request timed out after 3000 ms>"));
    }

    #[tokio::test]
    async fn no_interfaces() {
        let client = Arc::new(MemoryClient::new());
        let mut out = Vec::new();

        let found = discover_report(&client.connector(), &[], DEFAULT_REPORT_TIMEOUT, &mut out)
            .await
            .unwrap();

        assert_eq!(found, 0);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "No broadcast interfaces found\nDiscovery complete\n"
        );
    }

    #[tokio::test]
    async fn empty_network() {
        let client = Arc::new(MemoryClient::new());
        let mut out = Vec::new();

        discover_report(&client.connector(), &broadcast(), Duration::from_secs(1), &mut out)
            .await
            .unwrap();

        assert!(String::from_utf8(out).unwrap().contains("no devices found"));
    }

    #[test]
    fn broadcast_addresses_skip_loopback() {
        let addresses = broadcast_addresses().unwrap();
        assert!(addresses.iter().all(|ip| !ip.is_loopback()));
    }
}
