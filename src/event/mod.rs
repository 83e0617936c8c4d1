// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Publishing item state to the host framework.
//!
//! The binding posts state updates through an [`EventPublisher`]. The
//! [`EventBus`] implementation fans them out over a tokio broadcast channel.
//!
//! # Examples
//!
//! ```
//! use bacnet_binding::event::{EventBus, EventPublisher};
//! use bacnet_binding::types::ItemValue;
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! bus.post_update("Office_Temp", ItemValue::Decimal(21.5));
//! assert!(rx.try_recv().unwrap().is_state_update());
//! ```

mod binding_event;
mod event_bus;

pub use binding_event::BindingEvent;
pub use event_bus::EventBus;

use crate::client::Device;
use crate::types::ItemValue;

/// Host-side sink for item state updates.
pub trait EventPublisher: Send + Sync {
    /// Posts a new state for an item.
    fn post_update(&self, item_name: &str, state: ItemValue);

    /// Called when discovery registers a device. Ignored by default.
    fn device_discovered(&self, _device: &Device) {}
}
