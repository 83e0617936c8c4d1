// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sources of endpoint configurations.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::ConfigError;
use crate::types::{ItemType, ObjectType};

use super::EndpointConfig;

/// Lookup surface for the endpoint configurations of a set of items.
///
/// The binding consults every registered provider in order; the first
/// provider that knows an item or endpoint wins.
pub trait BindingProvider: Send + Sync {
    /// Returns the config bound to an item.
    fn config_for_item(&self, item_name: &str) -> Option<EndpointConfig>;

    /// Returns the config bound to an endpoint.
    fn config_for_endpoint(
        &self,
        device_id: u32,
        object_type: ObjectType,
        object_id: u32,
    ) -> Option<EndpointConfig>;

    /// Returns every config this provider knows.
    fn all_configs(&self) -> Vec<EndpointConfig>;
}

/// In-memory provider fed with item binding strings.
///
/// After changing the bindings, notify the binding with
/// [`Binding::binding_changed`](crate::Binding::binding_changed) so the
/// change-suppression cache is reset.
///
/// # Examples
///
/// ```
/// use bacnet_binding::config::{BindingProvider, ItemBindings};
/// use bacnet_binding::types::ItemType;
///
/// let bindings = ItemBindings::new();
/// bindings
///     .process_binding_config("Office_Temp", ItemType::Number, "device=7,type=analogInput,id=1")
///     .unwrap();
///
/// assert!(bindings.config_for_item("Office_Temp").is_some());
/// assert_eq!(bindings.all_configs().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ItemBindings {
    configs: RwLock<HashMap<String, EndpointConfig>>,
}

impl ItemBindings {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and stores the binding of one item, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the binding string is invalid. The
    /// previous binding of the item is kept in that case.
    pub fn process_binding_config(
        &self,
        item_name: &str,
        item_type: ItemType,
        binding: &str,
    ) -> Result<(), ConfigError> {
        let config = EndpointConfig::parse(item_name, item_type, binding)?;
        self.insert(config);
        Ok(())
    }

    /// Stores a config, replacing any previous one for the same item.
    pub fn insert(&self, config: EndpointConfig) {
        tracing::debug!(item = %config.item_name, endpoint = %config, "Binding item");
        self.configs.write().insert(config.item_name.clone(), config);
    }

    /// Removes the binding of an item.
    ///
    /// Returns `true` if the item was bound.
    pub fn remove_item(&self, item_name: &str) -> bool {
        self.configs.write().remove(item_name).is_some()
    }

    /// Removes all bindings.
    pub fn clear(&self) {
        self.configs.write().clear();
    }

    /// Returns the names of all bound items.
    #[must_use]
    pub fn item_names(&self) -> Vec<String> {
        self.configs.read().keys().cloned().collect()
    }

    /// Returns the number of bound items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.configs.read().len()
    }

    /// Returns true if no item is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.configs.read().is_empty()
    }
}

impl BindingProvider for ItemBindings {
    fn config_for_item(&self, item_name: &str) -> Option<EndpointConfig> {
        self.configs.read().get(item_name).cloned()
    }

    fn config_for_endpoint(
        &self,
        device_id: u32,
        object_type: ObjectType,
        object_id: u32,
    ) -> Option<EndpointConfig> {
        self.configs
            .read()
            .values()
            .find(|c| c.matches_endpoint(device_id, object_type, object_id))
            .cloned()
    }

    fn all_configs(&self) -> Vec<EndpointConfig> {
        self.configs.read().values().cloned().collect()
    }
}
