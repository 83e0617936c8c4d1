// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Writing host commands and state updates to devices.

use crate::client::Property;
use crate::convert;
use crate::error::Error;
use crate::types::ItemValue;

use super::Binding;

impl Binding {
    /// Handles a command sent to an item by the host.
    ///
    /// The command is written to the bound property. Failures are logged
    /// and dropped; use [`write_item`](Self::write_item) to observe them.
    pub async fn receive_command(&self, item_name: &str, command: &ItemValue) {
        tracing::debug!(item = item_name, %command, "Received command");
        self.perform_update(item_name, command).await;
    }

    /// Handles a state update of an item by the host.
    ///
    /// Handled exactly like a command.
    pub async fn receive_update(&self, item_name: &str, state: &ItemValue) {
        tracing::debug!(item = item_name, %state, "Received update");
        self.perform_update(item_name, state).await;
    }

    async fn perform_update(&self, item_name: &str, value: &ItemValue) {
        match self.write_item(item_name, value).await {
            Ok(()) => {}
            Err(Error::UnknownItem(_)) => {
                tracing::trace!(item = item_name, "Item not bound, ignoring");
            }
            Err(Error::DeviceNotFound(device_id)) => {
                tracing::debug!(item = item_name, device_id, "Device not discovered, ignoring");
            }
            Err(e) => {
                tracing::error!(item = item_name, %value, error = %e, "Failed to write item");
            }
        }
    }

    /// Converts a value and writes it to the property bound to an item.
    ///
    /// On success the item's last value is forgotten, so the next poll
    /// publishes whatever the device reports back.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownItem`] if no provider knows the item
    /// - [`Error::DeviceNotFound`] if the device was not discovered
    /// - [`Error::NotConfigured`] if no client is running
    /// - [`Error::Conversion`] if the value does not fit the object type
    /// - [`Error::Client`] if the write fails
    pub async fn write_item(&self, item_name: &str, value: &ItemValue) -> Result<(), Error> {
        let config = self
            .config_for_item(item_name)
            .ok_or_else(|| Error::UnknownItem(item_name.to_string()))?;
        let device = self
            .registry
            .get(config.device_id)
            .ok_or(Error::DeviceNotFound(config.device_id))?;
        let client = self.client().ok_or(Error::NotConfigured)?;

        let encoded = convert::to_encoded(config.object_type.value_tag(), value)?;
        let property = Property::for_endpoint(device, &config);

        client.write_property(&property, encoded.clone()).await?;
        self.cache.invalidate(&config);

        tracing::info!(item = item_name, %property, value = %encoded, "Wrote property");
        Ok(())
    }
}
