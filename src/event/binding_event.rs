// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Binding event types.

use chrono::{DateTime, Utc};

use crate::client::Device;
use crate::types::ItemValue;

/// Events emitted by the binding.
///
/// # Examples
///
/// ```
/// use bacnet_binding::event::BindingEvent;
/// use bacnet_binding::types::ItemValue;
///
/// let event = BindingEvent::state_updated("Office_Temp", ItemValue::Decimal(21.5));
/// assert_eq!(event.item_name(), Some("Office_Temp"));
/// assert!(event.is_state_update());
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum BindingEvent {
    /// An item received a new state from its device.
    StateUpdated {
        /// Name of the item.
        item_name: String,
        /// The new state.
        state: ItemValue,
        /// When the state was read.
        timestamp: DateTime<Utc>,
    },

    /// A device answered discovery.
    DeviceDiscovered {
        /// The discovered device.
        device: Device,
        /// When the device was registered.
        timestamp: DateTime<Utc>,
    },
}

impl BindingEvent {
    /// Creates a state update event stamped with the current time.
    #[must_use]
    pub fn state_updated(item_name: impl Into<String>, state: ItemValue) -> Self {
        Self::StateUpdated {
            item_name: item_name.into(),
            state,
            timestamp: Utc::now(),
        }
    }

    /// Creates a discovery event stamped with the current time.
    #[must_use]
    pub fn device_discovered(device: Device) -> Self {
        Self::DeviceDiscovered {
            device,
            timestamp: Utc::now(),
        }
    }

    /// Returns the item name of a state update.
    #[must_use]
    pub fn item_name(&self) -> Option<&str> {
        match self {
            Self::StateUpdated { item_name, .. } => Some(item_name),
            Self::DeviceDiscovered { .. } => None,
        }
    }

    /// Returns the state of a state update.
    #[must_use]
    pub fn state(&self) -> Option<&ItemValue> {
        match self {
            Self::StateUpdated { state, .. } => Some(state),
            Self::DeviceDiscovered { .. } => None,
        }
    }

    /// Returns when the event happened.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::StateUpdated { timestamp, .. } | Self::DeviceDiscovered { timestamp, .. } => {
                *timestamp
            }
        }
    }

    /// Returns `true` if this is a state update.
    #[must_use]
    pub fn is_state_update(&self) -> bool {
        matches!(self, Self::StateUpdated { .. })
    }

    /// Returns `true` if this is a discovery event.
    #[must_use]
    pub fn is_discovery(&self) -> bool {
        matches!(self, Self::DeviceDiscovered { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_update_accessors() {
        let event = BindingEvent::state_updated("Fan", ItemValue::Percent(40));

        assert_eq!(event.item_name(), Some("Fan"));
        assert_eq!(event.state(), Some(&ItemValue::Percent(40)));
        assert!(!event.is_discovery());
    }

    #[test]
    fn discovery_accessors() {
        let device = Device::new(7, "10.0.0.7:47808".parse().unwrap());
        let before = Utc::now();
        let event = BindingEvent::device_discovered(device);

        assert!(event.is_discovery());
        assert!(event.item_name().is_none());
        assert!(event.state().is_none());
        assert!(event.timestamp() >= before);
    }
}
