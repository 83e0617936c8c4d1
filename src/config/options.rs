// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Timing options of the binding.

use std::time::Duration;

/// Default period of the poll loop.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Default time the client listens for device announcements.
pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Default capacity of the discovery channel.
pub const DEFAULT_DISCOVERY_CAPACITY: usize = 64;

/// Timing options for a [`Binding`](crate::Binding).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use bacnet_binding::config::BindingOptions;
///
/// let options = BindingOptions::default()
///     .with_refresh_interval(Duration::from_secs(10))
///     .with_discovery_timeout(Duration::from_secs(2));
///
/// assert_eq!(options.refresh_interval, Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingOptions {
    /// Period of the poll loop.
    pub refresh_interval: Duration,
    /// How long a discovery run listens for devices.
    pub discovery_timeout: Duration,
    /// Capacity of the channel between discovery and the device registry.
    pub discovery_capacity: usize,
}

impl BindingOptions {
    /// Creates options with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the poll period.
    #[must_use]
    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.refresh_interval = interval;
        self
    }

    /// Sets the discovery timeout.
    #[must_use]
    pub fn with_discovery_timeout(mut self, timeout: Duration) -> Self {
        self.discovery_timeout = timeout;
        self
    }

    /// Sets the discovery channel capacity (minimum 1).
    #[must_use]
    pub fn with_discovery_capacity(mut self, capacity: usize) -> Self {
        self.discovery_capacity = capacity.max(1);
        self
    }
}

impl Default for BindingOptions {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            discovery_timeout: DEFAULT_DISCOVERY_TIMEOUT,
            discovery_capacity: DEFAULT_DISCOVERY_CAPACITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = BindingOptions::default();
        assert_eq!(options.refresh_interval, Duration::from_secs(30));
        assert_eq!(options.discovery_timeout, Duration::from_secs(5));
        assert_eq!(options.discovery_capacity, 64);
    }

    #[test]
    fn capacity_is_at_least_one() {
        let options = BindingOptions::new().with_discovery_capacity(0);
        assert_eq!(options.discovery_capacity, 1);
    }
}
