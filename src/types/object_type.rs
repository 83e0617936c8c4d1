// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! BACnet object types and their declared value tags.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Protocol type of an object's present value.
///
/// The value converter uses this tag to decide which [`EncodedValue`]
/// variant a host value is written as.
///
/// [`EncodedValue`]: super::EncodedValue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueTag {
    /// Null.
    Null,
    /// Boolean.
    Boolean,
    /// Unsigned integer.
    Unsigned,
    /// Signed integer.
    Signed,
    /// Single precision float.
    Real,
    /// Double precision float.
    Double,
    /// Enumerated value.
    Enumerated,
    /// Binary present value (active/inactive).
    BinaryPv,
    /// Character string.
    CharacterString,
}

impl ValueTag {
    /// Returns the tag name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Unsigned => "unsigned",
            Self::Signed => "signed",
            Self::Real => "real",
            Self::Double => "double",
            Self::Enumerated => "enumerated",
            Self::BinaryPv => "binaryPv",
            Self::CharacterString => "characterString",
        }
    }
}

impl fmt::Display for ValueTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A BACnet object type that can back an item endpoint.
///
/// Parsing accepts the camelCase name (`analogValue`), kebab or snake case
/// (`analog-value`, `ANALOG_VALUE`), the common abbreviation (`av`) or the
/// numeric object type code (`2`).
///
/// # Examples
///
/// ```
/// use bacnet_binding::types::{ObjectType, ValueTag};
///
/// let ty: ObjectType = "analogValue".parse().unwrap();
/// assert_eq!(ty, ObjectType::AnalogValue);
/// assert_eq!(ty.code(), 2);
/// assert_eq!(ty.value_tag(), ValueTag::Real);
///
/// assert_eq!("binary-output".parse::<ObjectType>().unwrap(), ObjectType::BinaryOutput);
/// assert_eq!("1".parse::<ObjectType>().unwrap(), ObjectType::AnalogOutput);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectType {
    /// Analog input (0).
    AnalogInput,
    /// Analog output (1).
    AnalogOutput,
    /// Analog value (2).
    AnalogValue,
    /// Binary input (3).
    BinaryInput,
    /// Binary output (4).
    BinaryOutput,
    /// Binary value (5).
    BinaryValue,
    /// Multi-state input (13).
    MultiStateInput,
    /// Multi-state output (14).
    MultiStateOutput,
    /// Multi-state value (19).
    MultiStateValue,
    /// Character string value (40).
    CharacterStringValue,
    /// Integer value (45).
    IntegerValue,
    /// Large analog value (46).
    LargeAnalogValue,
    /// Positive integer value (48).
    PositiveIntegerValue,
}

impl ObjectType {
    /// All supported object types.
    pub const ALL: [Self; 13] = [
        Self::AnalogInput,
        Self::AnalogOutput,
        Self::AnalogValue,
        Self::BinaryInput,
        Self::BinaryOutput,
        Self::BinaryValue,
        Self::MultiStateInput,
        Self::MultiStateOutput,
        Self::MultiStateValue,
        Self::CharacterStringValue,
        Self::IntegerValue,
        Self::LargeAnalogValue,
        Self::PositiveIntegerValue,
    ];

    /// Returns the BACnet object type code.
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::AnalogInput => 0,
            Self::AnalogOutput => 1,
            Self::AnalogValue => 2,
            Self::BinaryInput => 3,
            Self::BinaryOutput => 4,
            Self::BinaryValue => 5,
            Self::MultiStateInput => 13,
            Self::MultiStateOutput => 14,
            Self::MultiStateValue => 19,
            Self::CharacterStringValue => 40,
            Self::IntegerValue => 45,
            Self::LargeAnalogValue => 46,
            Self::PositiveIntegerValue => 48,
        }
    }

    /// Looks up an object type by its code.
    #[must_use]
    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.code() == code)
    }

    /// Returns the camelCase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AnalogInput => "analogInput",
            Self::AnalogOutput => "analogOutput",
            Self::AnalogValue => "analogValue",
            Self::BinaryInput => "binaryInput",
            Self::BinaryOutput => "binaryOutput",
            Self::BinaryValue => "binaryValue",
            Self::MultiStateInput => "multiStateInput",
            Self::MultiStateOutput => "multiStateOutput",
            Self::MultiStateValue => "multiStateValue",
            Self::CharacterStringValue => "characterStringValue",
            Self::IntegerValue => "integerValue",
            Self::LargeAnalogValue => "largeAnalogValue",
            Self::PositiveIntegerValue => "positiveIntegerValue",
        }
    }

    const fn abbreviation(&self) -> &'static str {
        match self {
            Self::AnalogInput => "ai",
            Self::AnalogOutput => "ao",
            Self::AnalogValue => "av",
            Self::BinaryInput => "bi",
            Self::BinaryOutput => "bo",
            Self::BinaryValue => "bv",
            Self::MultiStateInput => "msi",
            Self::MultiStateOutput => "mso",
            Self::MultiStateValue => "msv",
            Self::CharacterStringValue => "csv",
            Self::IntegerValue => "iv",
            Self::LargeAnalogValue => "lav",
            Self::PositiveIntegerValue => "piv",
        }
    }

    /// Returns the declared type of this object's present value.
    #[must_use]
    pub const fn value_tag(&self) -> ValueTag {
        match self {
            Self::AnalogInput | Self::AnalogOutput | Self::AnalogValue => ValueTag::Real,
            Self::BinaryInput | Self::BinaryOutput | Self::BinaryValue => ValueTag::BinaryPv,
            Self::MultiStateInput
            | Self::MultiStateOutput
            | Self::MultiStateValue
            | Self::PositiveIntegerValue => ValueTag::Unsigned,
            Self::CharacterStringValue => ValueTag::CharacterString,
            Self::IntegerValue => ValueTag::Signed,
            Self::LargeAnalogValue => ValueTag::Double,
        }
    }

    /// Returns true for input objects.
    ///
    /// Input objects reflect physical sensors. Their present value is
    /// read-only unless the object is out of service.
    #[must_use]
    pub const fn is_input(&self) -> bool {
        matches!(
            self,
            Self::AnalogInput | Self::BinaryInput | Self::MultiStateInput
        )
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<u16>() {
            return Self::from_code(code)
                .ok_or_else(|| ConfigError::UnknownObjectType(s.to_string()));
        }

        let normalized: String = trimmed
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .flat_map(char::to_lowercase)
            .collect();

        Self::ALL
            .into_iter()
            .find(|ty| {
                ty.as_str().eq_ignore_ascii_case(&normalized) || ty.abbreviation() == normalized
            })
            .ok_or_else(|| ConfigError::UnknownObjectType(s.to_string()))
    }
}

impl TryFrom<u16> for ObjectType {
    type Error = ConfigError;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| ConfigError::UnknownObjectType(code.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for ty in ObjectType::ALL {
            assert_eq!(ObjectType::from_code(ty.code()), Some(ty));
        }
        assert_eq!(ObjectType::from_code(8), None);
    }

    #[test]
    fn parse_name_variants() {
        assert_eq!(
            "analogInput".parse::<ObjectType>().unwrap(),
            ObjectType::AnalogInput
        );
        assert_eq!(
            "ANALOG_INPUT".parse::<ObjectType>().unwrap(),
            ObjectType::AnalogInput
        );
        assert_eq!(
            "multi-state-value".parse::<ObjectType>().unwrap(),
            ObjectType::MultiStateValue
        );
        assert_eq!("bv".parse::<ObjectType>().unwrap(), ObjectType::BinaryValue);
        assert_eq!("19".parse::<ObjectType>().unwrap(), ObjectType::MultiStateValue);
    }

    #[test]
    fn parse_unknown() {
        assert_eq!(
            "thermostat".parse::<ObjectType>(),
            Err(ConfigError::UnknownObjectType("thermostat".to_string()))
        );
        assert!("8".parse::<ObjectType>().is_err());
    }

    #[test]
    fn value_tags() {
        assert_eq!(ObjectType::AnalogOutput.value_tag(), ValueTag::Real);
        assert_eq!(ObjectType::BinaryInput.value_tag(), ValueTag::BinaryPv);
        assert_eq!(ObjectType::MultiStateOutput.value_tag(), ValueTag::Unsigned);
        assert_eq!(ObjectType::IntegerValue.value_tag(), ValueTag::Signed);
        assert_eq!(ObjectType::LargeAnalogValue.value_tag(), ValueTag::Double);
        assert_eq!(
            ObjectType::CharacterStringValue.value_tag(),
            ValueTag::CharacterString
        );
    }

    #[test]
    fn display_uses_camel_case() {
        assert_eq!(ObjectType::PositiveIntegerValue.to_string(), "positiveIntegerValue");
        assert_eq!(ValueTag::BinaryPv.to_string(), "binaryPv");
    }

    #[test]
    fn serde_names() {
        let json = serde_json::to_string(&ObjectType::AnalogValue).unwrap();
        assert_eq!(json, "\"analogValue\"");
    }
}
