// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! BACnet Binding - bind home-automation items to BACnet/IP devices.
//!
//! This library connects a home-automation framework's item model to the
//! objects of BACnet/IP devices. It polls bound objects and publishes
//! changed values to the host, and writes host commands back to the
//! devices. The BACnet protocol itself is handled by an external client
//! behind the [`client::BacnetClient`] trait.
//!
//! # Supported Features
//!
//! - **Item bindings**: `device=701105,type=analogValue,id=3` binding strings
//! - **Polling**: periodic reads with change suppression
//! - **Commands**: item commands and updates written to device objects
//! - **Discovery**: devices registered as they answer a broadcast query
//! - **Diagnostics**: one-shot network report (feature `diagnostics`)
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use bacnet_binding::{Binding, EventBus};
//! use bacnet_binding::client::MemoryClient;
//! use bacnet_binding::config::{ItemBindings, Properties};
//! use bacnet_binding::types::{ItemType, ItemValue};
//!
//! #[tokio::main]
//! async fn main() -> bacnet_binding::Result<()> {
//!     let client = Arc::new(MemoryClient::new());
//!     let bus = EventBus::new();
//!     let mut events = bus.subscribe();
//!
//!     let bindings = Arc::new(ItemBindings::new());
//!     bindings.process_binding_config(
//!         "Office_Setpoint",
//!         ItemType::Number,
//!         "device=701105,type=analogValue,id=3",
//!     )?;
//!
//!     let binding = Arc::new(Binding::new(client.connector(), bus.clone()));
//!     binding.add_provider(bindings);
//!
//!     let mut properties = Properties::new();
//!     properties.insert("localDeviceId".to_string(), "1339".to_string());
//!     binding.updated(Some(&properties)).await?;
//!
//!     let poll = binding.spawn_poll_loop();
//!
//!     binding
//!         .receive_command("Office_Setpoint", &ItemValue::Decimal(21.0))
//!         .await;
//!
//!     while let Ok(event) = events.recv().await {
//!         println!("{event:?}");
//!     }
//!
//!     poll.stop().await;
//!     binding.deactivate().await;
//!     Ok(())
//! }
//! ```
//!
//! # Value Conversion
//!
//! Host values are converted to the type each BACnet object declares for its
//! present value, and back to the kind of the bound item:
//!
//! ```
//! use bacnet_binding::convert;
//! use bacnet_binding::types::{EncodedValue, ItemType, ItemValue, OnOff, ValueTag};
//!
//! let encoded = convert::to_encoded(ValueTag::Real, &ItemValue::Decimal(21.5)).unwrap();
//! assert_eq!(encoded, EncodedValue::Real(21.5));
//!
//! let state = convert::item_value_or_text(ItemType::Switch, &EncodedValue::Unsigned(1));
//! assert_eq!(state, ItemValue::OnOff(OnOff::On));
//! ```

mod binding;
pub mod cache;
pub mod client;
pub mod config;
pub mod convert;
#[cfg(feature = "diagnostics")]
pub mod diagnostics;
pub mod error;
pub mod event;
pub mod registry;
pub mod types;

pub use binding::{Binding, PollHandle, PollSummary};
pub use error::{ClientError, ConfigError, ConversionError, Error, Result};
pub use event::{BindingEvent, EventBus, EventPublisher};
