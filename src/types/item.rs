// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host item types and values.
//!
//! Items are the host framework's view of a device property: a named value
//! of a given kind (switch, contact, dimmer, number or string). Commands and
//! state updates flowing in and out of the binding use [`ItemValue`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Kind of host item an endpoint is bound to.
///
/// Determines which [`ItemValue`] variant a read value is converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    /// On/off switch.
    Switch,
    /// Open/closed contact.
    Contact,
    /// Percentage (0-100).
    Dimmer,
    /// Decimal number.
    Number,
    /// Free text.
    String,
}

impl ItemType {
    /// Returns the item type name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Switch => "Switch",
            Self::Contact => "Contact",
            Self::Dimmer => "Dimmer",
            Self::Number => "Number",
            Self::String => "String",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = ConfigError;

    /// Parses `Switch`, `switch` or `SwitchItem`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let name = lower.strip_suffix("item").unwrap_or(&lower);
        match name {
            "switch" => Ok(Self::Switch),
            "contact" => Ok(Self::Contact),
            "dimmer" => Ok(Self::Dimmer),
            "number" => Ok(Self::Number),
            "string" => Ok(Self::String),
            _ => Err(ConfigError::UnknownItemType(s.to_string())),
        }
    }
}

/// On/off state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OnOff {
    /// On.
    On,
    /// Off.
    Off,
}

impl From<bool> for OnOff {
    fn from(value: bool) -> Self {
        if value { Self::On } else { Self::Off }
    }
}

/// Open/closed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OpenClosed {
    /// Open.
    Open,
    /// Closed.
    Closed,
}

impl From<bool> for OpenClosed {
    fn from(value: bool) -> Self {
        if value { Self::Open } else { Self::Closed }
    }
}

/// A command or state value exchanged with the host framework.
///
/// # Examples
///
/// ```
/// use bacnet_binding::types::{ItemValue, OnOff};
///
/// assert_eq!(ItemValue::OnOff(OnOff::On).to_string(), "ON");
/// assert_eq!(ItemValue::Decimal(21.5).to_string(), "21.5");
/// assert_eq!(ItemValue::Undefined.to_string(), "UNDEF");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum ItemValue {
    /// Switch state or command.
    OnOff(OnOff),
    /// Contact state.
    OpenClosed(OpenClosed),
    /// Percentage (0-100).
    Percent(u8),
    /// Decimal number.
    Decimal(f64),
    /// Free text.
    Text(String),
    /// No known value.
    Undefined,
}

impl ItemValue {
    /// Returns a short name of the value kind, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::OnOff(_) => "OnOff",
            Self::OpenClosed(_) => "OpenClosed",
            Self::Percent(_) => "Percent",
            Self::Decimal(_) => "Decimal",
            Self::Text(_) => "Text",
            Self::Undefined => "Undefined",
        }
    }
}

impl fmt::Display for ItemValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OnOff(OnOff::On) => f.write_str("ON"),
            Self::OnOff(OnOff::Off) => f.write_str("OFF"),
            Self::OpenClosed(OpenClosed::Open) => f.write_str("OPEN"),
            Self::OpenClosed(OpenClosed::Closed) => f.write_str("CLOSED"),
            Self::Percent(p) => write!(f, "{p}"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::Text(s) => f.write_str(s),
            Self::Undefined => f.write_str("UNDEF"),
        }
    }
}

impl From<OnOff> for ItemValue {
    fn from(value: OnOff) -> Self {
        Self::OnOff(value)
    }
}

impl From<OpenClosed> for ItemValue {
    fn from(value: OpenClosed) -> Self {
        Self::OpenClosed(value)
    }
}

impl From<f64> for ItemValue {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

impl From<&str> for ItemValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_type_from_str() {
        assert_eq!("Switch".parse::<ItemType>().unwrap(), ItemType::Switch);
        assert_eq!("number".parse::<ItemType>().unwrap(), ItemType::Number);
        assert_eq!("DimmerItem".parse::<ItemType>().unwrap(), ItemType::Dimmer);
        assert!(matches!(
            "Color".parse::<ItemType>(),
            Err(ConfigError::UnknownItemType(_))
        ));
    }

    #[test]
    fn item_value_display() {
        assert_eq!(ItemValue::OpenClosed(OpenClosed::Closed).to_string(), "CLOSED");
        assert_eq!(ItemValue::Percent(40).to_string(), "40");
        assert_eq!(ItemValue::from("hello").to_string(), "hello");
    }

    #[test]
    fn from_bool() {
        assert_eq!(OnOff::from(true), OnOff::On);
        assert_eq!(OpenClosed::from(false), OpenClosed::Closed);
    }

    #[test]
    fn serde_shape() {
        let json = serde_json::to_value(ItemValue::OnOff(OnOff::On)).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "onOff", "value": "ON" }));
    }
}
