// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configuration of the binding.
//!
//! - [`NetworkConfig`]: BACnet/IP settings parsed from the host's property map
//! - [`EndpointConfig`]: one item bound to one device property
//! - [`BindingProvider`] / [`ItemBindings`]: where endpoint configs come from
//! - [`BindingOptions`]: poll period and discovery timing

mod endpoint;
mod network;
mod options;
mod provider;

pub use endpoint::EndpointConfig;
pub use network::{
    DEFAULT_LOCAL_DEVICE_ID, DEFAULT_PORT, KEY_BROADCAST, KEY_LOCAL_BIND_ADDRESS,
    KEY_LOCAL_DEVICE_ID, KEY_LOCAL_NETWORK_NUMBER, KEY_PORT, NetworkConfig, Properties,
};
pub use options::{
    BindingOptions, DEFAULT_DISCOVERY_CAPACITY, DEFAULT_DISCOVERY_TIMEOUT,
    DEFAULT_REFRESH_INTERVAL,
};
pub use provider::{BindingProvider, ItemBindings};
