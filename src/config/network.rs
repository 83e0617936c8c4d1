// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! BACnet/IP network settings.

use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Raw key/value settings handed over by the host framework.
pub type Properties = HashMap<String, String>;

/// Device instance number used by the local BACnet device when none is set.
pub const DEFAULT_LOCAL_DEVICE_ID: u32 = 1339;

/// Standard BACnet/IP UDP port (`0xBAC0`).
pub const DEFAULT_PORT: u16 = 47808;

/// Key for the local bind address.
pub const KEY_LOCAL_BIND_ADDRESS: &str = "localBindAddress";
/// Key for the broadcast address.
pub const KEY_BROADCAST: &str = "broadcast";
/// Key for the UDP port.
pub const KEY_PORT: &str = "port";
/// Key for the local network number.
pub const KEY_LOCAL_NETWORK_NUMBER: &str = "localNetworkNumber";
/// Key for the local device instance number.
pub const KEY_LOCAL_DEVICE_ID: &str = "localDeviceId";

/// Network settings used to build a BACnet/IP client.
///
/// Every setting is optional; missing values take the documented defaults.
///
/// # Examples
///
/// ```
/// use bacnet_binding::config::{NetworkConfig, Properties};
///
/// let mut properties = Properties::new();
/// properties.insert("broadcast".to_string(), "192.168.1.255".to_string());
/// properties.insert("localDeviceId".to_string(), "4242".to_string());
///
/// let config = NetworkConfig::from_properties(&properties).unwrap();
/// assert_eq!(config.broadcast.to_string(), "192.168.1.255");
/// assert_eq!(config.local_device_id, 4242);
/// assert_eq!(config.port, 47808);
///
/// // Builder style
/// let config = NetworkConfig::new()
///     .with_port(47809)
///     .with_local_network_number(5);
/// assert_eq!(config.local_device_id, 1339);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkConfig {
    /// Local address the UDP socket binds to (default `0.0.0.0`).
    pub local_bind_address: IpAddr,
    /// Broadcast address used for discovery (default `255.255.255.255`).
    pub broadcast: IpAddr,
    /// UDP port (default 47808).
    pub port: u16,
    /// Local BACnet network number (default 0).
    pub local_network_number: u16,
    /// Instance number of the local BACnet device (default 1339).
    pub local_device_id: u32,
}

impl NetworkConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the host framework's property map.
    ///
    /// Unknown keys are ignored. Empty values count as missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a present value cannot be parsed.
    pub fn from_properties(properties: &Properties) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(properties, KEY_LOCAL_BIND_ADDRESS) {
            config.local_bind_address = parse_address(KEY_LOCAL_BIND_ADDRESS, value)?;
        }
        if let Some(value) = lookup(properties, KEY_BROADCAST) {
            config.broadcast = parse_address(KEY_BROADCAST, value)?;
        }
        if let Some(value) = lookup(properties, KEY_PORT) {
            config.port = parse_number(KEY_PORT, value)?;
        }
        if let Some(value) = lookup(properties, KEY_LOCAL_NETWORK_NUMBER) {
            config.local_network_number = parse_number(KEY_LOCAL_NETWORK_NUMBER, value)?;
        }
        if let Some(value) = lookup(properties, KEY_LOCAL_DEVICE_ID) {
            config.local_device_id = parse_number(KEY_LOCAL_DEVICE_ID, value)?;
        }

        Ok(config)
    }

    /// Sets the local bind address.
    #[must_use]
    pub fn with_local_bind_address(mut self, address: IpAddr) -> Self {
        self.local_bind_address = address;
        self
    }

    /// Sets the broadcast address.
    #[must_use]
    pub fn with_broadcast(mut self, broadcast: IpAddr) -> Self {
        self.broadcast = broadcast;
        self
    }

    /// Sets the UDP port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the local network number.
    #[must_use]
    pub fn with_local_network_number(mut self, number: u16) -> Self {
        self.local_network_number = number;
        self
    }

    /// Sets the local device instance number.
    #[must_use]
    pub fn with_local_device_id(mut self, device_id: u32) -> Self {
        self.local_device_id = device_id;
        self
    }

    /// Returns the socket address to bind.
    #[must_use]
    pub fn bind_socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.local_bind_address, self.port)
    }

    /// Returns the socket address discovery broadcasts are sent to.
    #[must_use]
    pub fn broadcast_socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.broadcast, self.port)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            local_bind_address: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            broadcast: IpAddr::V4(Ipv4Addr::BROADCAST),
            port: DEFAULT_PORT,
            local_network_number: 0,
            local_device_id: DEFAULT_LOCAL_DEVICE_ID,
        }
    }
}

fn lookup<'a>(properties: &'a Properties, key: &str) -> Option<&'a str> {
    properties
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn parse_address(key: &str, value: &str) -> Result<IpAddr, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidAddress {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidNumber {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn properties(pairs: &[(&str, &str)]) -> Properties {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn defaults() {
        let config = NetworkConfig::from_properties(&Properties::new()).unwrap();

        assert_eq!(config, NetworkConfig::default());
        assert_eq!(config.local_device_id, DEFAULT_LOCAL_DEVICE_ID);
        assert_eq!(config.port, 47808);
        assert_eq!(config.bind_socket_addr().to_string(), "0.0.0.0:47808");
        assert_eq!(
            config.broadcast_socket_addr().to_string(),
            "255.255.255.255:47808"
        );
    }

    #[test]
    fn all_keys() {
        let config = NetworkConfig::from_properties(&properties(&[
            ("localBindAddress", "10.0.0.5"),
            ("broadcast", "10.0.0.255"),
            ("port", "47809"),
            ("localNetworkNumber", "12"),
            ("localDeviceId", "77"),
        ]))
        .unwrap();

        assert_eq!(config.local_bind_address.to_string(), "10.0.0.5");
        assert_eq!(config.broadcast.to_string(), "10.0.0.255");
        assert_eq!(config.port, 47809);
        assert_eq!(config.local_network_number, 12);
        assert_eq!(config.local_device_id, 77);
    }

    #[test]
    fn blank_values_use_defaults() {
        let config =
            NetworkConfig::from_properties(&properties(&[("port", "  "), ("localDeviceId", "")]))
                .unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.local_device_id, DEFAULT_LOCAL_DEVICE_ID);
    }

    #[test]
    fn invalid_port() {
        let err = NetworkConfig::from_properties(&properties(&[("port", "70000")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidNumber {
                key: "port".to_string(),
                value: "70000".to_string(),
            }
        );
    }

    #[test]
    fn invalid_broadcast() {
        let err =
            NetworkConfig::from_properties(&properties(&[("broadcast", "lan")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAddress { .. }));
    }

    #[test]
    fn deserialize_partial_json() {
        let config: NetworkConfig =
            serde_json::from_str(r#"{ "broadcast": "192.168.0.255", "localDeviceId": 9 }"#)
                .unwrap();

        assert_eq!(config.broadcast.to_string(), "192.168.0.255");
        assert_eq!(config.local_device_id, 9);
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn builder() {
        let config = NetworkConfig::new()
            .with_local_bind_address("192.168.1.10".parse().unwrap())
            .with_broadcast("192.168.1.255".parse().unwrap())
            .with_local_device_id(5000);

        assert_eq!(config.bind_socket_addr().to_string(), "192.168.1.10:47808");
        assert_eq!(config.local_device_id, 5000);
    }
}
