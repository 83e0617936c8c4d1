// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion between host item values and BACnet encoded values.
//!
//! Both directions are pure functions. Writes are driven by the object's
//! declared [`ValueTag`]; reads are driven by the bound [`ItemType`].
//!
//! # Examples
//!
//! ```
//! use bacnet_binding::convert;
//! use bacnet_binding::types::{EncodedValue, ItemType, ItemValue, OnOff, ValueTag};
//!
//! // Host -> BACnet
//! let encoded = convert::to_encoded(ValueTag::Real, &ItemValue::Decimal(21.5)).unwrap();
//! assert_eq!(encoded, EncodedValue::Real(21.5));
//!
//! // BACnet -> host
//! let state = convert::to_item_value(ItemType::Switch, &EncodedValue::Boolean(true)).unwrap();
//! assert_eq!(state, ItemValue::OnOff(OnOff::On));
//!
//! // Mistyped reads fall back to the raw value's text
//! let state = convert::item_value_or_text(ItemType::Dimmer, &EncodedValue::Real(180.0));
//! assert_eq!(state, ItemValue::Text("180".to_string()));
//! ```

use crate::error::ConversionError;
use crate::types::{BinaryPv, EncodedValue, ItemType, ItemValue, OnOff, OpenClosed, ValueTag};

/// Converts a host value to the encoding declared by `tag`.
///
/// [`ItemValue::Undefined`] converts to [`EncodedValue::Null`] for every
/// tag, which relinquishes a commandable property.
///
/// # Errors
///
/// Returns [`ConversionError`] when the value cannot be represented by the
/// tag: text that does not parse, numbers out of range, or a non-null value
/// for a `Null` tag.
pub fn to_encoded(tag: ValueTag, value: &ItemValue) -> Result<EncodedValue, ConversionError> {
    if matches!(value, ItemValue::Undefined) {
        return Ok(EncodedValue::Null);
    }

    match tag {
        ValueTag::Null => Err(unsupported(value.kind(), tag.as_str())),
        ValueTag::Boolean => item_to_bool(value).map(EncodedValue::Boolean),
        ValueTag::BinaryPv => item_to_binary(value).map(EncodedValue::Binary),
        ValueTag::Real => {
            let n = item_to_f64(value)?;
            if !n.is_finite() || n.abs() > f64::from(f32::MAX) {
                return Err(ConversionError::OutOfRange {
                    value: n,
                    target: "real",
                });
            }
            #[allow(clippy::cast_possible_truncation)]
            let real = n as f32;
            Ok(EncodedValue::Real(real))
        }
        ValueTag::Double => item_to_f64(value).map(EncodedValue::Double),
        ValueTag::Unsigned => item_to_u32(value, "unsigned").map(EncodedValue::Unsigned),
        ValueTag::Enumerated => item_to_u32(value, "enumerated").map(EncodedValue::Enumerated),
        ValueTag::Signed => item_to_i32(value).map(EncodedValue::Signed),
        ValueTag::CharacterString => Ok(EncodedValue::CharacterString(match value {
            ItemValue::Text(s) => s.clone(),
            other => other.to_string(),
        })),
    }
}

/// Converts an encoded value to the host value kind of `item_type`.
///
/// [`EncodedValue::Null`] converts to [`ItemValue::Undefined`].
///
/// # Errors
///
/// Returns [`ConversionError`] when the value does not fit the item type,
/// for example a dimmer reading outside 0-100 or a switch reading 21.5.
pub fn to_item_value(
    item_type: ItemType,
    value: &EncodedValue,
) -> Result<ItemValue, ConversionError> {
    if value.is_null() {
        return Ok(ItemValue::Undefined);
    }

    match item_type {
        ItemType::String => Ok(ItemValue::Text(value.to_string())),
        ItemType::Number => encoded_to_f64(value).map(ItemValue::Decimal),
        ItemType::Switch => encoded_to_bool(value, "switch").map(|b| ItemValue::OnOff(b.into())),
        ItemType::Contact => {
            encoded_to_bool(value, "contact").map(|b| ItemValue::OpenClosed(b.into()))
        }
        ItemType::Dimmer => {
            let n = encoded_to_f64(value)?;
            if !(0.0..=100.0).contains(&n) {
                return Err(ConversionError::OutOfRange {
                    value: n,
                    target: "percent",
                });
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let percent = n.round() as u8;
            Ok(ItemValue::Percent(percent))
        }
    }
}

/// Converts an encoded value for `item_type`, falling back to its text.
///
/// Conversion failures are logged at debug level and never propagated.
#[must_use]
pub fn item_value_or_text(item_type: ItemType, value: &EncodedValue) -> ItemValue {
    match to_item_value(item_type, value) {
        Ok(state) => state,
        Err(e) => {
            tracing::debug!(
                item_type = %item_type,
                value = %value,
                error = %e,
                "Couldn't create state, falling back to string"
            );
            ItemValue::Text(value.to_string())
        }
    }
}

fn unsupported(from: &str, to: &str) -> ConversionError {
    ConversionError::Unsupported {
        from: from.to_string(),
        to: to.to_string(),
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "active" | "open" | "1" => Some(true),
        "off" | "false" | "inactive" | "closed" | "0" => Some(false),
        _ => None,
    }
}

fn item_to_f64(value: &ItemValue) -> Result<f64, ConversionError> {
    match value {
        ItemValue::OnOff(OnOff::On) | ItemValue::OpenClosed(OpenClosed::Open) => Ok(1.0),
        ItemValue::OnOff(OnOff::Off) | ItemValue::OpenClosed(OpenClosed::Closed) => Ok(0.0),
        ItemValue::Percent(p) => Ok(f64::from(*p)),
        ItemValue::Decimal(d) => Ok(*d),
        ItemValue::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ConversionError::Malformed(s.clone())),
        ItemValue::Undefined => Err(unsupported("Undefined", "number")),
    }
}

fn item_to_bool(value: &ItemValue) -> Result<bool, ConversionError> {
    match value {
        ItemValue::OnOff(v) => Ok(*v == OnOff::On),
        ItemValue::OpenClosed(v) => Ok(*v == OpenClosed::Open),
        ItemValue::Percent(p) => Ok(*p > 0),
        ItemValue::Decimal(d) => Ok(*d != 0.0),
        ItemValue::Text(s) => parse_bool(s).ok_or_else(|| ConversionError::Malformed(s.clone())),
        ItemValue::Undefined => Err(unsupported("Undefined", "boolean")),
    }
}

#[allow(clippy::float_cmp)]
fn item_to_binary(value: &ItemValue) -> Result<BinaryPv, ConversionError> {
    if let ItemValue::Decimal(d) = value
        && *d != 0.0
        && *d != 1.0
    {
        return Err(ConversionError::OutOfRange {
            value: *d,
            target: "binaryPv",
        });
    }
    item_to_bool(value).map(BinaryPv::from)
}

fn item_to_integer(value: &ItemValue) -> Result<f64, ConversionError> {
    let n = item_to_f64(value)?;
    if n.fract() != 0.0 || !n.is_finite() {
        return Err(ConversionError::Malformed(n.to_string()));
    }
    Ok(n)
}

fn item_to_u32(value: &ItemValue, target: &'static str) -> Result<u32, ConversionError> {
    let n = item_to_integer(value)?;
    if n < 0.0 || n > f64::from(u32::MAX) {
        return Err(ConversionError::OutOfRange { value: n, target });
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let whole = n as u32;
    Ok(whole)
}

fn item_to_i32(value: &ItemValue) -> Result<i32, ConversionError> {
    let n = item_to_integer(value)?;
    if n < f64::from(i32::MIN) || n > f64::from(i32::MAX) {
        return Err(ConversionError::OutOfRange {
            value: n,
            target: "signed",
        });
    }
    #[allow(clippy::cast_possible_truncation)]
    let whole = n as i32;
    Ok(whole)
}

fn encoded_to_f64(value: &EncodedValue) -> Result<f64, ConversionError> {
    if let Some(n) = value.as_f64() {
        return Ok(n);
    }
    match value {
        EncodedValue::CharacterString(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ConversionError::Malformed(s.clone())),
        other => Err(unsupported(other.tag().as_str(), "number")),
    }
}

#[allow(clippy::float_cmp)]
fn encoded_to_bool(value: &EncodedValue, target: &'static str) -> Result<bool, ConversionError> {
    match value {
        EncodedValue::Boolean(b) => Ok(*b),
        EncodedValue::Binary(pv) => Ok(pv.is_active()),
        EncodedValue::CharacterString(s) => {
            parse_bool(s).ok_or_else(|| ConversionError::Malformed(s.clone()))
        }
        other => match other.as_f64() {
            Some(n) if n == 0.0 => Ok(false),
            Some(n) if n == 1.0 => Ok(true),
            Some(n) => Err(ConversionError::OutOfRange { value: n, target }),
            None => Err(unsupported(other.tag().as_str(), target)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_to_real() {
        assert_eq!(
            to_encoded(ValueTag::Real, &ItemValue::Decimal(22.0)).unwrap(),
            EncodedValue::Real(22.0)
        );
        assert_eq!(
            to_encoded(ValueTag::Real, &ItemValue::Percent(40)).unwrap(),
            EncodedValue::Real(40.0)
        );
    }

    #[test]
    fn real_rejects_overflow() {
        let err = to_encoded(ValueTag::Real, &ItemValue::Decimal(1e300)).unwrap_err();
        assert!(matches!(err, ConversionError::OutOfRange { target: "real", .. }));
    }

    #[test]
    fn switch_command_to_binary() {
        assert_eq!(
            to_encoded(ValueTag::BinaryPv, &ItemValue::OnOff(OnOff::On)).unwrap(),
            EncodedValue::Binary(BinaryPv::Active)
        );
        assert_eq!(
            to_encoded(ValueTag::BinaryPv, &ItemValue::Text("inactive".into())).unwrap(),
            EncodedValue::Binary(BinaryPv::Inactive)
        );
        assert!(to_encoded(ValueTag::BinaryPv, &ItemValue::Decimal(2.0)).is_err());
    }

    #[test]
    fn unsigned_requires_whole_non_negative() {
        assert_eq!(
            to_encoded(ValueTag::Unsigned, &ItemValue::Decimal(3.0)).unwrap(),
            EncodedValue::Unsigned(3)
        );
        assert!(matches!(
            to_encoded(ValueTag::Unsigned, &ItemValue::Decimal(-1.0)),
            Err(ConversionError::OutOfRange { .. })
        ));
        assert!(matches!(
            to_encoded(ValueTag::Unsigned, &ItemValue::Decimal(2.5)),
            Err(ConversionError::Malformed(_))
        ));
    }

    #[test]
    fn signed_range() {
        assert_eq!(
            to_encoded(ValueTag::Signed, &ItemValue::Text("-12".into())).unwrap(),
            EncodedValue::Signed(-12)
        );
        assert!(to_encoded(ValueTag::Signed, &ItemValue::Decimal(3e10)).is_err());
    }

    #[test]
    fn undefined_relinquishes() {
        assert_eq!(
            to_encoded(ValueTag::Real, &ItemValue::Undefined).unwrap(),
            EncodedValue::Null
        );
    }

    #[test]
    fn malformed_text() {
        assert_eq!(
            to_encoded(ValueTag::Double, &ItemValue::Text("warm".into())),
            Err(ConversionError::Malformed("warm".to_string()))
        );
    }

    #[test]
    fn anything_to_character_string() {
        assert_eq!(
            to_encoded(ValueTag::CharacterString, &ItemValue::OnOff(OnOff::Off)).unwrap(),
            EncodedValue::CharacterString("OFF".to_string())
        );
    }

    #[test]
    fn read_number() {
        assert_eq!(
            to_item_value(ItemType::Number, &EncodedValue::Real(21.5)).unwrap(),
            ItemValue::Decimal(21.5)
        );
        assert_eq!(
            to_item_value(ItemType::Number, &EncodedValue::CharacterString(" 7 ".into())).unwrap(),
            ItemValue::Decimal(7.0)
        );
    }

    #[test]
    fn read_switch_and_contact() {
        assert_eq!(
            to_item_value(ItemType::Switch, &EncodedValue::Binary(BinaryPv::Active)).unwrap(),
            ItemValue::OnOff(OnOff::On)
        );
        assert_eq!(
            to_item_value(ItemType::Contact, &EncodedValue::Unsigned(0)).unwrap(),
            ItemValue::OpenClosed(OpenClosed::Closed)
        );
        assert!(to_item_value(ItemType::Switch, &EncodedValue::Real(21.5)).is_err());
    }

    #[test]
    fn read_dimmer() {
        assert_eq!(
            to_item_value(ItemType::Dimmer, &EncodedValue::Real(42.4)).unwrap(),
            ItemValue::Percent(42)
        );
        assert!(matches!(
            to_item_value(ItemType::Dimmer, &EncodedValue::Signed(-5)),
            Err(ConversionError::OutOfRange { target: "percent", .. })
        ));
    }

    #[test]
    fn real_reads_keep_their_decimal_form() {
        assert_eq!(
            to_item_value(ItemType::Number, &EncodedValue::Real(21.3)).unwrap(),
            ItemValue::Decimal(21.3)
        );
        assert_eq!(
            item_value_or_text(ItemType::Number, &EncodedValue::Real(21.3)).to_string(),
            EncodedValue::Real(21.3).to_string()
        );
    }

    #[test]
    fn read_null_is_undefined() {
        assert_eq!(
            to_item_value(ItemType::Number, &EncodedValue::Null).unwrap(),
            ItemValue::Undefined
        );
    }

    #[test]
    fn fallback_to_text() {
        assert_eq!(
            item_value_or_text(ItemType::Switch, &EncodedValue::Real(21.5)),
            ItemValue::Text("21.5".to_string())
        );
        assert_eq!(
            item_value_or_text(
                ItemType::Number,
                &EncodedValue::CharacterString("n/a".to_string())
            ),
            ItemValue::Text("n/a".to_string())
        );
        assert_eq!(
            item_value_or_text(ItemType::Number, &EncodedValue::Real(3.0)),
            ItemValue::Decimal(3.0)
        );
    }
}
