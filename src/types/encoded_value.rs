// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Protocol-native property values.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ValueTag;

/// Present value of a binary object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BinaryPv {
    /// Inactive (0).
    Inactive,
    /// Active (1).
    Active,
}

impl BinaryPv {
    /// Returns the enumerated value used on the wire.
    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        match self {
            Self::Inactive => 0,
            Self::Active => 1,
        }
    }

    /// Returns true if active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl From<bool> for BinaryPv {
    fn from(value: bool) -> Self {
        if value { Self::Active } else { Self::Inactive }
    }
}

impl fmt::Display for BinaryPv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inactive => f.write_str("inactive"),
            Self::Active => f.write_str("active"),
        }
    }
}

/// A property value as returned by the external BACnet client.
///
/// Equality is structural: `Real(21.5)` equals `Real(21.5)` but not
/// `Double(21.5)`. Floats compare by bit pattern, so a repeated `NaN` is
/// equal to itself. The change-suppression cache relies on this.
///
/// # Examples
///
/// ```
/// use bacnet_binding::types::{BinaryPv, EncodedValue, ValueTag};
///
/// let value = EncodedValue::Real(21.5);
/// assert_eq!(value.tag(), ValueTag::Real);
/// assert_eq!(value.to_string(), "21.5");
/// assert_eq!(value.as_f64(), Some(21.5));
///
/// assert_eq!(EncodedValue::Binary(BinaryPv::Active).to_string(), "active");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum EncodedValue {
    /// Null.
    Null,
    /// Boolean.
    Boolean(bool),
    /// Unsigned integer.
    Unsigned(u32),
    /// Signed integer.
    Signed(i32),
    /// Single precision float.
    Real(f32),
    /// Double precision float.
    Double(f64),
    /// Enumerated value.
    Enumerated(u32),
    /// Binary present value.
    Binary(BinaryPv),
    /// Character string.
    CharacterString(String),
}

impl EncodedValue {
    /// Returns the tag of this value.
    #[must_use]
    pub const fn tag(&self) -> ValueTag {
        match self {
            Self::Null => ValueTag::Null,
            Self::Boolean(_) => ValueTag::Boolean,
            Self::Unsigned(_) => ValueTag::Unsigned,
            Self::Signed(_) => ValueTag::Signed,
            Self::Real(_) => ValueTag::Real,
            Self::Double(_) => ValueTag::Double,
            Self::Enumerated(_) => ValueTag::Enumerated,
            Self::Binary(_) => ValueTag::BinaryPv,
            Self::CharacterString(_) => ValueTag::CharacterString,
        }
    }

    /// Returns the numeric value, if this is a number, boolean or binary value.
    ///
    /// Booleans and binary values map to 0 and 1.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Unsigned(n) | Self::Enumerated(n) => Some(f64::from(*n)),
            Self::Signed(n) => Some(f64::from(*n)),
            Self::Real(n) => Some(widen_real(*n)),
            Self::Double(n) => Some(*n),
            Self::Binary(pv) => Some(f64::from(pv.as_u32())),
            Self::Null | Self::CharacterString(_) => None,
        }
    }

    /// Returns true for `Null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Widens through the shortest decimal form, so `21.3f32` becomes `21.3`.
fn widen_real(n: f32) -> f64 {
    n.to_string().parse().unwrap_or_else(|_| f64::from(n))
}

impl PartialEq for EncodedValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::Unsigned(a), Self::Unsigned(b)) | (Self::Enumerated(a), Self::Enumerated(b)) => {
                a == b
            }
            (Self::Signed(a), Self::Signed(b)) => a == b,
            (Self::Real(a), Self::Real(b)) => a.to_bits() == b.to_bits(),
            (Self::Double(a), Self::Double(b)) => a.to_bits() == b.to_bits(),
            (Self::Binary(a), Self::Binary(b)) => a == b,
            (Self::CharacterString(a), Self::CharacterString(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for EncodedValue {}

impl fmt::Display for EncodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Unsigned(n) | Self::Enumerated(n) => write!(f, "{n}"),
            Self::Signed(n) => write!(f, "{n}"),
            Self::Real(n) => write!(f, "{n}"),
            Self::Double(n) => write!(f, "{n}"),
            Self::Binary(pv) => write!(f, "{pv}"),
            Self::CharacterString(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_structural() {
        assert_eq!(EncodedValue::Real(21.5), EncodedValue::Real(21.5));
        assert_ne!(EncodedValue::Real(21.5), EncodedValue::Real(22.0));
        assert_ne!(EncodedValue::Real(21.5), EncodedValue::Double(21.5));
        assert_ne!(EncodedValue::Unsigned(1), EncodedValue::Enumerated(1));
    }

    #[test]
    fn floats_compare_by_bits() {
        assert_eq!(EncodedValue::Real(f32::NAN), EncodedValue::Real(f32::NAN));
        assert_eq!(EncodedValue::Double(f64::NAN), EncodedValue::Double(f64::NAN));
        assert_ne!(EncodedValue::Real(0.0), EncodedValue::Real(-0.0));
    }

    #[test]
    fn real_widens_through_decimal_form() {
        assert_eq!(EncodedValue::Real(21.3).as_f64(), Some(21.3));
        assert_eq!(EncodedValue::Real(-0.1).as_f64(), Some(-0.1));
        assert!(EncodedValue::Real(f32::NAN).as_f64().unwrap().is_nan());
    }

    #[test]
    fn display() {
        assert_eq!(EncodedValue::Null.to_string(), "Null");
        assert_eq!(EncodedValue::Boolean(true).to_string(), "true");
        assert_eq!(EncodedValue::Real(22.0).to_string(), "22");
        assert_eq!(EncodedValue::Signed(-4).to_string(), "-4");
        assert_eq!(
            EncodedValue::CharacterString("lobby".to_string()).to_string(),
            "lobby"
        );
        assert_eq!(
            EncodedValue::Binary(BinaryPv::Inactive).to_string(),
            "inactive"
        );
    }

    #[test]
    fn numeric_view() {
        assert_eq!(EncodedValue::Binary(BinaryPv::Active).as_f64(), Some(1.0));
        assert_eq!(EncodedValue::Boolean(false).as_f64(), Some(0.0));
        assert_eq!(EncodedValue::Unsigned(3).as_f64(), Some(3.0));
        assert_eq!(EncodedValue::Null.as_f64(), None);
        assert_eq!(
            EncodedValue::CharacterString("3".to_string()).as_f64(),
            None
        );
    }

    #[test]
    fn serde_shape() {
        let json = serde_json::to_value(EncodedValue::Real(21.5)).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "real", "value": 21.5 }));

        let back: EncodedValue = serde_json::from_value(json).unwrap();
        assert_eq!(back, EncodedValue::Real(21.5));
    }
}
