// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boundary to the external BACnet/IP client.
//!
//! The binding never speaks BACnet itself. Discovery, property reads and
//! property writes go through a [`BacnetClient`], built from the network
//! settings by a [`ClientConnector`].
//!
//! # Clients
//!
//! - Implement [`BacnetClient`] on top of a BACnet/IP stack for production use
//! - [`MemoryClient`]: in-process loopback network for tests and demos

mod device;
mod memory;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::config::NetworkConfig;
use crate::error::ClientError;
use crate::types::EncodedValue;

pub use device::{Device, Property, PropertyInfo};
pub use memory::{MemoryClient, WriteRecord};

/// Capacity of the channel used by [`BacnetClient::collect_devices`].
const COLLECT_CAPACITY: usize = 64;

/// Operations the binding needs from a BACnet/IP client.
///
/// All methods take `&self`; implementations synchronize internally so a
/// single client can serve the poll loop, the dispatcher and discovery at
/// the same time.
#[async_trait]
pub trait BacnetClient: Send + Sync {
    /// Opens the transport.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the socket cannot be opened.
    async fn start(&self) -> Result<(), ClientError>;

    /// Closes the transport. In-flight requests fail.
    async fn stop(&self);

    /// Broadcasts a device query and pushes every answering device into
    /// `sink` until `timeout` elapses.
    ///
    /// Returns the number of devices pushed. Stops early if the receiving
    /// side of `sink` is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the broadcast cannot be sent.
    async fn discover_devices(
        &self,
        sink: mpsc::Sender<Device>,
        timeout: Duration,
    ) -> Result<usize, ClientError>;

    /// Lists the objects of a device with their metadata.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the device cannot be queried.
    async fn device_properties(&self, device: &Device) -> Result<Vec<PropertyInfo>, ClientError>;

    /// Reads the present value of a property.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the read fails.
    async fn read_property(&self, property: &Property) -> Result<EncodedValue, ClientError>;

    /// Writes the present value of a property.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the write fails or is rejected.
    async fn write_property(
        &self,
        property: &Property,
        value: EncodedValue,
    ) -> Result<(), ClientError>;

    /// Runs a discovery and collects the answering devices.
    ///
    /// Devices are deduplicated by instance number and returned in
    /// ascending instance order.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the discovery fails.
    async fn collect_devices(&self, timeout: Duration) -> Result<Vec<Device>, ClientError> {
        let (tx, mut rx) = mpsc::channel::<Device>(COLLECT_CAPACITY);

        let collect = async move {
            let mut devices = BTreeMap::new();
            while let Some(device) = rx.recv().await {
                devices.insert(device.instance_number, device);
            }
            devices
        };

        let (result, devices) = tokio::join!(self.discover_devices(tx, timeout), collect);
        result?;

        Ok(devices.into_values().collect())
    }
}

/// Builds a client from network settings.
///
/// Called every time the binding is reconfigured. Closures with the
/// matching signature implement this trait.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use bacnet_binding::ClientError;
/// use bacnet_binding::client::{BacnetClient, ClientConnector, MemoryClient};
/// use bacnet_binding::config::NetworkConfig;
///
/// let connector = |_config: &NetworkConfig| -> Result<Arc<dyn BacnetClient>, ClientError> {
///     Ok(Arc::new(MemoryClient::new()))
/// };
/// assert!(connector.connect(&NetworkConfig::default()).is_ok());
/// ```
pub trait ClientConnector: Send + Sync {
    /// Creates a client that is not started yet.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the settings cannot be used.
    fn connect(&self, config: &NetworkConfig) -> Result<Arc<dyn BacnetClient>, ClientError>;
}

impl<F> ClientConnector for F
where
    F: Fn(&NetworkConfig) -> Result<Arc<dyn BacnetClient>, ClientError> + Send + Sync,
{
    fn connect(&self, config: &NetworkConfig) -> Result<Arc<dyn BacnetClient>, ClientError> {
        self(config)
    }
}
