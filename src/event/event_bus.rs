// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event bus for broadcasting binding events.

use tokio::sync::broadcast;

use crate::client::Device;
use crate::types::ItemValue;

use super::{BindingEvent, EventPublisher};

/// Default channel capacity for the event bus.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Event bus for broadcasting binding events to multiple subscribers.
///
/// The `EventBus` uses tokio's broadcast channel; every subscriber gets its
/// own copy of each event. It implements [`EventPublisher`], so it can be
/// handed to a [`Binding`](crate::Binding) directly.
///
/// # Capacity
///
/// The event bus has a fixed capacity (default 256). A slow subscriber that
/// falls behind loses the oldest events and receives `RecvError::Lagged`.
///
/// # Examples
///
/// ```
/// use bacnet_binding::event::{EventBus, EventPublisher};
/// use bacnet_binding::types::ItemValue;
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// bus.post_update("Office_Temp", ItemValue::Decimal(21.5));
///
/// let event = rx.try_recv().unwrap();
/// assert_eq!(event.item_name(), Some("Office_Temp"));
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<BindingEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a new event bus with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to binding events.
    ///
    /// Returns a receiver that will receive all events published after
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<BindingEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event to all subscribers.
    ///
    /// If there are no subscribers, the event is silently discarded.
    pub fn publish(&self, event: BindingEvent) {
        // Ignore errors (no subscribers)
        let _ = self.sender.send(event);
    }

    /// Publishes an event and returns the number of receivers that got it.
    #[must_use]
    pub fn publish_counted(&self, event: BindingEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPublisher for EventBus {
    fn post_update(&self, item_name: &str, state: ItemValue) {
        self.publish(BindingEvent::state_updated(item_name, state));
    }

    fn device_discovered(&self, device: &Device) {
        self.publish(BindingEvent::device_discovered(device.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_bus_has_no_subscribers() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn subscribe_and_drop_track_count() {
        let bus = EventBus::new();

        let rx1 = bus.subscribe();
        let _rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(rx1);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn post_update_delivers_to_all_subscribers() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.post_update("Fan", ItemValue::Percent(10));

        let event1 = rx1.recv().await.unwrap();
        let event2 = rx2.recv().await.unwrap();
        assert_eq!(event1.item_name(), Some("Fan"));
        assert_eq!(event2.state(), Some(&ItemValue::Percent(10)));
    }

    #[tokio::test]
    async fn device_discovered_is_published() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.device_discovered(&Device::new(3, "10.0.0.3:47808".parse().unwrap()));

        assert!(rx.recv().await.unwrap().is_discovery());
    }

    #[test]
    fn publish_counted_without_subscribers() {
        let bus = EventBus::new();
        let count = bus.publish_counted(BindingEvent::state_updated("X", ItemValue::Undefined));
        assert_eq!(count, 0);
    }

    #[test]
    fn clone_shares_same_channel() {
        let bus1 = EventBus::new();
        let bus2 = bus1.clone();

        let _rx = bus1.subscribe();
        assert_eq!(bus2.subscriber_count(), 1);
    }
}
