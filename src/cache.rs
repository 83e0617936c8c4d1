// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Change-suppression cache.
//!
//! Remembers the last encoded value observed for each endpoint so the poll
//! loop only publishes values that changed. A missing entry means "never
//! observed" and forces the next read to be published.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::config::EndpointConfig;
use crate::types::EncodedValue;

/// Concurrent map from endpoint config to last observed value.
///
/// # Examples
///
/// ```
/// use bacnet_binding::cache::LastValueCache;
/// use bacnet_binding::config::EndpointConfig;
/// use bacnet_binding::types::{EncodedValue, ItemType, ObjectType};
///
/// let cache = LastValueCache::new();
/// let config = EndpointConfig::new("T", ItemType::Number, 7, ObjectType::AnalogOutput, 3);
///
/// assert!(cache.observe(&config, EncodedValue::Real(21.5)));
/// assert!(!cache.observe(&config, EncodedValue::Real(21.5)));
/// assert!(cache.observe(&config, EncodedValue::Real(22.0)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct LastValueCache {
    entries: Arc<DashMap<EndpointConfig, EncodedValue>>,
}

impl LastValueCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a read value.
    ///
    /// Returns `true` if the value must be published: no entry existed or
    /// the stored value differs. The stored value is updated in that case.
    pub fn observe(&self, config: &EndpointConfig, value: EncodedValue) -> bool {
        match self.entries.entry(config.clone()) {
            Entry::Occupied(mut entry) => {
                if *entry.get() == value {
                    false
                } else {
                    entry.insert(value);
                    true
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }

    /// Returns the last observed value of an endpoint.
    #[must_use]
    pub fn get(&self, config: &EndpointConfig) -> Option<EncodedValue> {
        self.entries.get(config).map(|v| v.value().clone())
    }

    /// Forgets the value of one endpoint.
    ///
    /// Returns the forgotten value, if any.
    pub fn invalidate(&self, config: &EndpointConfig) -> Option<EncodedValue> {
        self.entries.remove(config).map(|(_, v)| v)
    }

    /// Forgets every value.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Returns the number of endpoints with a stored value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ItemType, ObjectType};

    fn config(id: u32) -> EndpointConfig {
        EndpointConfig::new(format!("Item{id}"), ItemType::Number, 7, ObjectType::AnalogValue, id)
    }

    #[test]
    fn first_observation_is_reported() {
        let cache = LastValueCache::new();
        assert!(cache.observe(&config(1), EncodedValue::Null));
        assert_eq!(cache.get(&config(1)), Some(EncodedValue::Null));
    }

    #[test]
    fn equal_values_are_suppressed() {
        let cache = LastValueCache::new();
        let c = config(1);

        assert!(cache.observe(&c, EncodedValue::Unsigned(2)));
        assert!(!cache.observe(&c, EncodedValue::Unsigned(2)));
        assert!(!cache.observe(&c, EncodedValue::Unsigned(2)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn repeated_nan_is_suppressed() {
        let cache = LastValueCache::new();
        let c = config(1);

        assert!(cache.observe(&c, EncodedValue::Real(f32::NAN)));
        assert!(!cache.observe(&c, EncodedValue::Real(f32::NAN)));
        assert!(cache.observe(&c, EncodedValue::Real(20.0)));
    }

    #[test]
    fn different_tag_is_a_change() {
        let cache = LastValueCache::new();
        let c = config(1);

        assert!(cache.observe(&c, EncodedValue::Unsigned(2)));
        assert!(cache.observe(&c, EncodedValue::Enumerated(2)));
    }

    #[test]
    fn invalidate_forces_report() {
        let cache = LastValueCache::new();
        let c = config(1);

        cache.observe(&c, EncodedValue::Real(1.0));
        assert_eq!(cache.invalidate(&c), Some(EncodedValue::Real(1.0)));
        assert!(cache.get(&c).is_none());
        assert!(cache.observe(&c, EncodedValue::Real(1.0)));
    }

    #[test]
    fn clear_drops_everything() {
        let cache = LastValueCache::new();
        cache.observe(&config(1), EncodedValue::Real(1.0));
        cache.observe(&config(2), EncodedValue::Real(2.0));

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn entries_are_per_endpoint() {
        let cache = LastValueCache::new();
        assert!(cache.observe(&config(1), EncodedValue::Real(1.0)));
        assert!(cache.observe(&config(2), EncodedValue::Real(1.0)));
        assert_eq!(cache.len(), 2);
    }
}
