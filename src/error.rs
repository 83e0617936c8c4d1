// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the BACnet binding.
//!
//! This module provides the error hierarchy used across the crate:
//! configuration parsing, the external client boundary, and value
//! conversion between host items and BACnet encoded values.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Binding or network configuration is invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The external BACnet client failed.
    #[error("client error: {0}")]
    Client(#[from] ClientError),

    /// A value could not be converted.
    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// The binding has no running client.
    #[error("binding is not configured")]
    NotConfigured,

    /// No provider knows the item.
    #[error("no binding configured for item {0}")]
    UnknownItem(String),

    /// The device has not been discovered yet.
    #[error("device {0} has not been discovered")]
    DeviceNotFound(u32),

    /// Writing a diagnostic report failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while parsing network settings or item binding strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A numeric setting could not be parsed.
    #[error("invalid number for {key}: {value:?}")]
    InvalidNumber {
        /// The configuration key.
        key: String,
        /// The rejected raw value.
        value: String,
    },

    /// An address setting could not be parsed.
    #[error("invalid address for {key}: {value:?}")]
    InvalidAddress {
        /// The configuration key.
        key: String,
        /// The rejected raw value.
        value: String,
    },

    /// An item binding string is malformed.
    #[error("invalid binding config {0:?}")]
    InvalidBinding(String),

    /// An item binding string lacks a required key.
    #[error("binding config is missing {0}")]
    MissingKey(&'static str),

    /// The object type name or number is not known.
    #[error("unknown object type {0:?}")]
    UnknownObjectType(String),

    /// The item type name is not known.
    #[error("unknown item type {0:?}")]
    UnknownItemType(String),
}

/// Errors reported by the external BACnet client.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The client was used before `start` or after `stop`.
    #[error("client is not started")]
    NotStarted,

    /// The request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// The device did not answer.
    #[error("device {0} is unreachable")]
    DeviceUnreachable(u32),

    /// The device has no such object.
    #[error("unknown property {0}")]
    UnknownProperty(String),

    /// The device refused a write.
    #[error("write rejected: {0}")]
    WriteRejected(String),

    /// Socket or transport failure.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Errors raised by the value converter.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConversionError {
    /// No mapping exists between the two types.
    #[error("cannot convert {from} to {to}")]
    Unsupported {
        /// Source type description.
        from: String,
        /// Target type description.
        to: String,
    },

    /// A textual value could not be parsed.
    #[error("malformed value {0:?}")]
    Malformed(String),

    /// A numeric value does not fit the target type.
    #[error("value {value} is out of range for {target}")]
    OutOfRange {
        /// The offending value.
        value: f64,
        /// Target type description.
        target: &'static str,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::InvalidNumber {
            key: "port".to_string(),
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "invalid number for port: \"abc\"");
    }

    #[test]
    fn error_from_client_error() {
        let err: Error = ClientError::Timeout(500).into();
        assert!(matches!(err, Error::Client(ClientError::Timeout(500))));
        assert_eq!(
            err.to_string(),
            "client error: request timed out after 500 ms"
        );
    }

    #[test]
    fn conversion_error_display() {
        let err = ConversionError::OutOfRange {
            value: 150.0,
            target: "percent",
        };
        assert_eq!(err.to_string(), "value 150 is out of range for percent");
    }

    #[test]
    fn device_not_found_display() {
        assert_eq!(
            Error::DeviceNotFound(7).to_string(),
            "device 7 has not been discovered"
        );
    }
}
