// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device handles and property addresses.

use std::fmt;
use std::net::{IpAddr, SocketAddr};

use serde::{Deserialize, Serialize};

use crate::config::EndpointConfig;
use crate::types::ObjectType;

/// Runtime metadata of a discovered BACnet device.
///
/// Devices are identified by their instance number.
///
/// # Examples
///
/// ```
/// use bacnet_binding::client::Device;
///
/// let device = Device::new(7, "10.0.0.7:47808".parse().unwrap())
///     .with_name("AHU-1")
///     .with_vendor_name("Acme Controls");
///
/// assert_eq!(device.instance_number, 7);
/// assert_eq!(device.socket_addr().port(), 47808);
/// assert_eq!(device.to_string(), "device 7 (AHU-1) at 10.0.0.7:47808");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Device object instance number.
    pub instance_number: u32,
    /// IP address of the device.
    pub address: IpAddr,
    /// UDP port of the device.
    pub port: u16,
    /// Object name.
    pub name: String,
    /// Model name.
    pub model_name: String,
    /// Vendor name.
    pub vendor_name: String,
}

impl Device {
    /// Creates a device handle with empty metadata.
    #[must_use]
    pub fn new(instance_number: u32, address: SocketAddr) -> Self {
        Self {
            instance_number,
            address: address.ip(),
            port: address.port(),
            name: String::new(),
            model_name: String::new(),
            vendor_name: String::new(),
        }
    }

    /// Sets the object name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the model name.
    #[must_use]
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    /// Sets the vendor name.
    #[must_use]
    pub fn with_vendor_name(mut self, vendor_name: impl Into<String>) -> Self {
        self.vendor_name = vendor_name.into();
        self
    }

    /// Returns the device's socket address.
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "device {} at {}", self.instance_number, self.socket_addr())
        } else {
            write!(
                f,
                "device {} ({}) at {}",
                self.instance_number,
                self.name,
                self.socket_addr()
            )
        }
    }
}

/// A readable/writable object of a discovered device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    /// The device hosting the object.
    pub device: Device,
    /// Object type.
    pub object_type: ObjectType,
    /// Object instance number.
    pub object_id: u32,
}

impl Property {
    /// Creates a property address.
    #[must_use]
    pub fn new(device: Device, object_type: ObjectType, object_id: u32) -> Self {
        Self {
            device,
            object_type,
            object_id,
        }
    }

    /// Creates the property an endpoint config points at on `device`.
    #[must_use]
    pub fn for_endpoint(device: Device, config: &EndpointConfig) -> Self {
        Self::new(device, config.object_type, config.object_id)
    }

    /// Returns the device instance number.
    #[must_use]
    pub fn device_id(&self) -> u32 {
        self.device.instance_number
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}@{}",
            self.object_type, self.object_id, self.device.instance_number
        )
    }
}

/// A property together with its descriptive metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyInfo {
    /// The property address.
    pub property: Property,
    /// Object name.
    pub name: String,
    /// Engineering units, empty if none.
    pub units: String,
    /// Free-form description.
    pub description: String,
}
