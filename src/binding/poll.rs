// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Periodic reading of all bound endpoints.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::client::Property;
use crate::convert;

use super::Binding;

/// Outcome counts of one poll cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    /// Endpoints whose value changed and was published.
    pub published: usize,
    /// Endpoints whose value equals the last published one.
    pub unchanged: usize,
    /// Endpoints not read: device not discovered or no client running.
    pub skipped: usize,
    /// Endpoints whose read failed.
    pub failed: usize,
}

impl PollSummary {
    /// Returns the number of endpoints visited.
    #[must_use]
    pub fn total(&self) -> usize {
        self.published + self.unchanged + self.skipped + self.failed
    }
}

/// Handle to a running poll loop.
///
/// Dropping the handle aborts the loop; [`stop`](Self::stop) ends it after
/// the cycle in progress.
#[derive(Debug)]
pub struct PollHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Stops the loop and waits for it to exit.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        let _ = (&mut self.task).await;
    }

    /// Returns true once the loop task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl Binding {
    /// Reads every bound endpoint once and publishes changed values.
    ///
    /// Endpoints of undiscovered devices are skipped. A failed read is
    /// logged and does not stop the cycle. A value that cannot be converted
    /// to the item type is published as text. An endpoint bound to several
    /// items publishes to the first provider's item.
    pub async fn poll_once(&self) -> PollSummary {
        let configs = self.all_configs();
        let mut summary = PollSummary::default();

        let Some(client) = self.client() else {
            if !configs.is_empty() {
                tracing::error!(
                    endpoints = configs.len(),
                    "No BACnet client running, skipping poll"
                );
            }
            summary.skipped = configs.len();
            return summary;
        };

        for config in configs {
            let Some(device) = self.registry.get(config.device_id) else {
                tracing::trace!(
                    item = %config.item_name,
                    device_id = config.device_id,
                    "Device not discovered yet"
                );
                summary.skipped += 1;
                continue;
            };

            let property = Property::for_endpoint(device, &config);
            let value = match client.read_property(&property).await {
                Ok(value) => value,
                Err(e) => {
                    tracing::error!(
                        item = %config.item_name,
                        %property,
                        error = %e,
                        "Failed to read property"
                    );
                    summary.failed += 1;
                    continue;
                }
            };

            // The read may outlive the binding, so resolve the owner again.
            let Some(owner) = self.config_for_endpoint(&property) else {
                tracing::trace!(%property, "Endpoint no longer bound");
                summary.skipped += 1;
                continue;
            };

            if self.cache.observe(&owner, value.clone()) {
                let state = convert::item_value_or_text(owner.item_type, &value);
                tracing::debug!(
                    item = %owner.item_name,
                    %property,
                    %value,
                    %state,
                    "Publishing new value"
                );
                self.publisher.post_update(&owner.item_name, state);
                summary.published += 1;
            } else {
                tracing::trace!(item = %owner.item_name, %property, "Value unchanged");
                summary.unchanged += 1;
            }
        }

        summary
    }

    /// Spawns the loop that calls [`poll_once`](Self::poll_once) every
    /// refresh interval.
    ///
    /// The first cycle runs immediately. Cycles that overrun the interval
    /// delay the next tick instead of bursting.
    pub fn spawn_poll_loop(self: &Arc<Self>) -> PollHandle {
        let binding = Arc::clone(self);
        // interval() panics on a zero period
        let period = self.options.refresh_interval.max(Duration::from_millis(1));
        let (shutdown, mut stopped) = oneshot::channel();

        let task = tokio::spawn(async move {
            tracing::info!(interval = ?period, "Starting poll loop");
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut stopped => break,
                    _ = ticker.tick() => {
                        let summary = binding.poll_once().await;
                        tracing::debug!(
                            published = summary.published,
                            unchanged = summary.unchanged,
                            skipped = summary.skipped,
                            failed = summary.failed,
                            "Poll cycle complete"
                        );
                    }
                }
            }

            tracing::info!("Poll loop stopped");
        });

        PollHandle {
            shutdown: Some(shutdown),
            task,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Device, MemoryClient};
    use crate::config::{EndpointConfig, ItemBindings, Properties};
    use crate::error::ClientError;
    use crate::event::EventBus;
    use crate::types::{EncodedValue, ItemType, ItemValue, ObjectType};

    async fn setup(configs: Vec<EndpointConfig>) -> (Arc<MemoryClient>, Binding, EventBus) {
        let client = Arc::new(MemoryClient::new());
        client.add_device(Device::new(7, "10.0.0.7:47808".parse().unwrap()));
        client.add_object(7, ObjectType::AnalogOutput, 3, EncodedValue::Real(0.0));
        client.add_object(7, ObjectType::BinaryInput, 1, EncodedValue::Binary(true.into()));

        let bindings = Arc::new(ItemBindings::new());
        for config in configs {
            bindings.insert(config);
        }

        let bus = EventBus::new();
        let binding = Binding::new(client.connector(), bus.clone());
        binding.add_provider(bindings);
        binding.updated(Some(&Properties::new())).await.unwrap();
        binding.wait_for_discovery().await;

        (client, binding, bus)
    }

    fn setpoint() -> EndpointConfig {
        EndpointConfig::new("Setpoint", ItemType::Number, 7, ObjectType::AnalogOutput, 3)
    }

    #[tokio::test]
    async fn equal_reads_publish_once() {
        let (client, binding, bus) = setup(vec![setpoint()]).await;
        let mut rx = bus.subscribe();
        client.push_reads(
            7,
            ObjectType::AnalogOutput,
            3,
            [
                EncodedValue::Real(21.5),
                EncodedValue::Real(21.5),
                EncodedValue::Real(22.0),
            ],
        );

        let first = binding.poll_once().await;
        let second = binding.poll_once().await;
        let third = binding.poll_once().await;

        assert_eq!(first.published, 1);
        assert_eq!(second.unchanged, 1);
        assert_eq!(third.published, 1);

        assert_eq!(rx.recv().await.unwrap().state(), Some(&ItemValue::Decimal(21.5)));
        assert_eq!(rx.recv().await.unwrap().state(), Some(&ItemValue::Decimal(22.0)));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn shared_endpoint_publishes_to_first_bound_item() {
        let (_client, binding, bus) = setup(vec![setpoint()]).await;
        let alias = Arc::new(ItemBindings::new());
        alias.insert(EndpointConfig::new("Alias", ItemType::Number, 7, ObjectType::AnalogOutput, 3));
        binding.add_provider(alias);
        let mut rx = bus.subscribe();

        let summary = binding.poll_once().await;

        assert_eq!(summary.published, 1);
        assert_eq!(summary.unchanged, 1);
        assert_eq!(rx.recv().await.unwrap().item_name(), Some("Setpoint"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn repeated_nan_reads_publish_once() {
        let (client, binding, bus) = setup(vec![setpoint()]).await;
        let mut rx = bus.subscribe();
        client.set_value(7, ObjectType::AnalogOutput, 3, EncodedValue::Real(f32::NAN));

        for _ in 0..3 {
            binding.poll_once().await;
        }

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn undiscovered_device_is_skipped() {
        let orphan = EndpointConfig::new("Orphan", ItemType::Number, 99, ObjectType::AnalogValue, 1);
        let (client, binding, _bus) = setup(vec![orphan]).await;

        let summary = binding.poll_once().await;

        assert_eq!(summary.skipped, 1);
        assert_eq!(client.read_count(), 0);
    }

    #[tokio::test]
    async fn read_failure_does_not_abort_cycle() {
        let door = EndpointConfig::new("Door", ItemType::Contact, 7, ObjectType::BinaryInput, 1);
        let (client, binding, _bus) = setup(vec![setpoint(), door]).await;
        client.fail_next_read(7, ObjectType::AnalogOutput, 3, ClientError::Timeout(3000));

        let summary = binding.poll_once().await;

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.published, 1);
        assert_eq!(summary.total(), 2);
    }

    #[tokio::test]
    async fn no_client_skips_everything() {
        let (_client, binding, _bus) = setup(vec![setpoint()]).await;
        binding.deactivate().await;

        let summary = binding.poll_once().await;
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.total(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn loop_polls_every_interval() {
        let (client, binding, _bus) = setup(vec![setpoint()]).await;
        let binding = Arc::new(binding);

        let handle = binding.spawn_poll_loop();
        tokio::time::sleep(Duration::from_secs(61)).await;
        handle.stop().await;

        // ticks at 0 s, 30 s and 60 s
        assert_eq!(client.read_count(), 3);
    }
}
