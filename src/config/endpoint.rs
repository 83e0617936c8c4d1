// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Endpoint configuration: one item bound to one device property.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{ItemType, ObjectType};

/// Binds a named host item to one property of one BACnet device.
///
/// Endpoint configs are immutable once loaded and are used as keys of the
/// change-suppression cache.
///
/// # Examples
///
/// ```
/// use bacnet_binding::config::EndpointConfig;
/// use bacnet_binding::types::{ItemType, ObjectType};
///
/// let config = EndpointConfig::parse(
///     "Office_Temperature",
///     ItemType::Number,
///     "device=701105,type=analogValue,id=3",
/// )
/// .unwrap();
///
/// assert_eq!(config.device_id, 701105);
/// assert_eq!(config.object_type, ObjectType::AnalogValue);
/// assert_eq!(config.object_id, 3);
/// assert_eq!(config.to_string(), "device=701105,type=analogValue,id=3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointConfig {
    /// Instance number of the device.
    pub device_id: u32,
    /// Object type of the property.
    pub object_type: ObjectType,
    /// Object instance number of the property.
    pub object_id: u32,
    /// Name of the bound host item.
    pub item_name: String,
    /// Kind of the bound host item.
    pub item_type: ItemType,
}

impl EndpointConfig {
    /// Creates an endpoint configuration.
    #[must_use]
    pub fn new(
        item_name: impl Into<String>,
        item_type: ItemType,
        device_id: u32,
        object_type: ObjectType,
        object_id: u32,
    ) -> Self {
        Self {
            device_id,
            object_type,
            object_id,
            item_name: item_name.into(),
            item_type,
        }
    }

    /// Parses an item binding string of the form
    /// `device=<instance>,type=<objectType>,id=<instance>`.
    ///
    /// Keys are case-insensitive and may appear in any order. Whitespace
    /// around keys and values is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a key is unknown, a key is missing, a
    /// number does not parse or the object type is unknown.
    pub fn parse(
        item_name: impl Into<String>,
        item_type: ItemType,
        binding: &str,
    ) -> Result<Self, ConfigError> {
        let mut device_id = None;
        let mut object_type = None;
        let mut object_id = None;

        for part in binding.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| ConfigError::InvalidBinding(binding.to_string()))?;
            let value = value.trim();

            match key.trim().to_ascii_lowercase().as_str() {
                "device" => device_id = Some(parse_instance("device", value)?),
                "type" => object_type = Some(value.parse::<ObjectType>()?),
                "id" => object_id = Some(parse_instance("id", value)?),
                _ => return Err(ConfigError::InvalidBinding(binding.to_string())),
            }
        }

        Ok(Self {
            device_id: device_id.ok_or(ConfigError::MissingKey("device"))?,
            object_type: object_type.ok_or(ConfigError::MissingKey("type"))?,
            object_id: object_id.ok_or(ConfigError::MissingKey("id"))?,
            item_name: item_name.into(),
            item_type,
        })
    }

    /// Returns true if this config addresses the given endpoint.
    #[must_use]
    pub fn matches_endpoint(&self, device_id: u32, object_type: ObjectType, object_id: u32) -> bool {
        self.device_id == device_id && self.object_type == object_type && self.object_id == object_id
    }
}

impl fmt::Display for EndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "device={},type={},id={}",
            self.device_id, self.object_type, self.object_id
        )
    }
}

fn parse_instance(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidNumber {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_any_order_and_case() {
        let config =
            EndpointConfig::parse("Fan", ItemType::Switch, " ID = 4 , Type=binary-output,DEVICE=12")
                .unwrap();

        assert_eq!(
            config,
            EndpointConfig::new("Fan", ItemType::Switch, 12, ObjectType::BinaryOutput, 4)
        );
    }

    #[test]
    fn parse_numeric_type() {
        let config = EndpointConfig::parse("Setpoint", ItemType::Number, "device=7,type=1,id=3")
            .unwrap();
        assert_eq!(config.object_type, ObjectType::AnalogOutput);
    }

    #[test]
    fn missing_key() {
        assert_eq!(
            EndpointConfig::parse("X", ItemType::Number, "device=7,type=analogInput"),
            Err(ConfigError::MissingKey("id"))
        );
    }

    #[test]
    fn unknown_key() {
        assert!(matches!(
            EndpointConfig::parse("X", ItemType::Number, "device=7,type=ai,id=1,prio=8"),
            Err(ConfigError::InvalidBinding(_))
        ));
    }

    #[test]
    fn bad_instance() {
        assert!(matches!(
            EndpointConfig::parse("X", ItemType::Number, "device=-1,type=ai,id=1"),
            Err(ConfigError::InvalidNumber { .. })
        ));
        assert!(matches!(
            EndpointConfig::parse("X", ItemType::Number, "device"),
            Err(ConfigError::InvalidBinding(_))
        ));
    }

    #[test]
    fn matches_endpoint() {
        let config = EndpointConfig::new("T", ItemType::Number, 7, ObjectType::AnalogOutput, 3);
        assert!(config.matches_endpoint(7, ObjectType::AnalogOutput, 3));
        assert!(!config.matches_endpoint(7, ObjectType::AnalogInput, 3));
        assert!(!config.matches_endpoint(8, ObjectType::AnalogOutput, 3));
    }

    #[test]
    fn configs_are_hash_keys() {
        use std::collections::HashSet;

        let a = EndpointConfig::new("T", ItemType::Number, 7, ObjectType::AnalogOutput, 3);
        let b = EndpointConfig::new("T", ItemType::Number, 7, ObjectType::AnalogOutput, 3);
        let c = EndpointConfig::new("U", ItemType::Number, 7, ObjectType::AnalogOutput, 3);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }
}
