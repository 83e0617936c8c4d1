// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registry of discovered devices.
//!
//! Discovery runs on its own task and hands devices over through an mpsc
//! channel; [`DeviceRegistry::spawn_sink`] drains that channel into the
//! registry. Lookups never block on discovery.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::client::Device;
use crate::event::EventPublisher;

/// Concurrent map from device instance number to device handle.
///
/// Entries are never removed; re-discovery overwrites the stored handle.
/// Cloning the registry shares the same map.
///
/// # Examples
///
/// ```
/// use bacnet_binding::client::Device;
/// use bacnet_binding::registry::DeviceRegistry;
///
/// let registry = DeviceRegistry::new();
/// registry.insert(Device::new(7, "10.0.0.7:47808".parse().unwrap()));
///
/// assert!(registry.get(7).is_some());
/// assert!(registry.get(8).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: Arc<DashMap<u32, Device>>,
}

impl DeviceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a device, replacing any handle with the same instance number.
    ///
    /// Returns the replaced handle, if any.
    pub fn insert(&self, device: Device) -> Option<Device> {
        self.devices.insert(device.instance_number, device)
    }

    /// Returns the handle of a device, or `None` if it was never discovered.
    #[must_use]
    pub fn get(&self, instance_number: u32) -> Option<Device> {
        self.devices.get(&instance_number).map(|d| d.value().clone())
    }

    /// Returns true if the device was discovered.
    #[must_use]
    pub fn contains(&self, instance_number: u32) -> bool {
        self.devices.contains_key(&instance_number)
    }

    /// Returns all known devices in ascending instance order.
    #[must_use]
    pub fn devices(&self) -> Vec<Device> {
        let mut devices: Vec<Device> = self.devices.iter().map(|d| d.value().clone()).collect();
        devices.sort_by_key(|d| d.instance_number);
        devices
    }

    /// Returns the number of known devices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Returns true if no device was discovered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Spawns the task that drains discovered devices into the registry.
    ///
    /// Each device is logged and forwarded to `publisher`. The task ends when
    /// every sender of `rx` is dropped.
    pub fn spawn_sink(
        &self,
        mut rx: mpsc::Receiver<Device>,
        publisher: Arc<dyn EventPublisher>,
    ) -> JoinHandle<()> {
        let registry = self.clone();

        tokio::spawn(async move {
            while let Some(device) = rx.recv().await {
                tracing::info!(
                    device_id = device.instance_number,
                    address = %device.socket_addr(),
                    name = %device.name,
                    "Discovered device"
                );
                publisher.device_discovered(&device);
                registry.insert(device);
            }
            tracing::debug!("Discovery channel closed");
        })
    }
}
