// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The binding: glue between host items and the BACnet client.
//!
//! A [`Binding`] owns the active client, the device registry and the
//! change-suppression cache. The host framework drives it through three
//! entry points:
//!
//! - [`Binding::updated`] when the network configuration changes
//! - [`Binding::receive_command`] / [`Binding::receive_update`] when an item
//!   is commanded or updated
//! - [`Binding::spawn_poll_loop`] to read all endpoints periodically
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use bacnet_binding::Binding;
//! use bacnet_binding::client::{Device, MemoryClient};
//! use bacnet_binding::config::{ItemBindings, Properties};
//! use bacnet_binding::event::EventBus;
//! use bacnet_binding::types::{EncodedValue, ItemType, ObjectType};
//!
//! # async fn example() -> bacnet_binding::Result<()> {
//! let client = Arc::new(MemoryClient::new());
//! client.add_device(Device::new(7, "10.0.0.7:47808".parse().unwrap()));
//! client.add_object(7, ObjectType::AnalogInput, 1, EncodedValue::Real(21.5));
//!
//! let bindings = Arc::new(ItemBindings::new());
//! bindings.process_binding_config("Office_Temp", ItemType::Number, "device=7,type=analogInput,id=1")?;
//!
//! let bus = EventBus::new();
//! let binding = Binding::new(client.connector(), bus.clone());
//! binding.add_provider(bindings);
//!
//! binding.updated(Some(&Properties::new())).await?;
//! binding.wait_for_discovery().await;
//!
//! let summary = binding.poll_once().await;
//! assert_eq!(summary.published, 1);
//! # Ok(())
//! # }
//! ```

mod dispatch;
mod poll;

use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::cache::LastValueCache;
use crate::client::{BacnetClient, ClientConnector, Property};
use crate::config::{BindingOptions, BindingProvider, EndpointConfig, NetworkConfig, Properties};
use crate::error::{ClientError, Error};
use crate::event::EventPublisher;
use crate::registry::DeviceRegistry;

pub use poll::{PollHandle, PollSummary};

/// BACnet binding instance.
///
/// All methods take `&self`; wrap the binding in an [`Arc`] to share it
/// between the poll loop and host callbacks.
pub struct Binding {
    providers: RwLock<Vec<Arc<dyn BindingProvider>>>,
    registry: DeviceRegistry,
    cache: LastValueCache,
    publisher: Arc<dyn EventPublisher>,
    connector: Arc<dyn ClientConnector>,
    client: RwLock<Option<Arc<dyn BacnetClient>>>,
    discovery: Mutex<Option<JoinHandle<()>>>,
    options: BindingOptions,
}

impl Binding {
    /// Creates an unconfigured binding.
    ///
    /// No client exists until [`updated`](Self::updated) is called with a
    /// configuration.
    #[must_use]
    pub fn new<C, P>(connector: C, publisher: P) -> Self
    where
        C: ClientConnector + 'static,
        P: EventPublisher + 'static,
    {
        Self {
            providers: RwLock::new(Vec::new()),
            registry: DeviceRegistry::new(),
            cache: LastValueCache::new(),
            publisher: Arc::new(publisher),
            connector: Arc::new(connector),
            client: RwLock::new(None),
            discovery: Mutex::new(None),
            options: BindingOptions::default(),
        }
    }

    /// Sets the binding options.
    #[must_use]
    pub fn with_options(mut self, options: BindingOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the binding options.
    #[must_use]
    pub fn options(&self) -> &BindingOptions {
        &self.options
    }

    /// Returns the device registry.
    #[must_use]
    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    /// Returns the change-suppression cache.
    #[must_use]
    pub fn cache(&self) -> &LastValueCache {
        &self.cache
    }

    /// Returns true while a client is running.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.client.read().is_some()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Applies a new network configuration.
    ///
    /// The running client is always stopped first. With `None` the binding
    /// stays unconfigured. Otherwise a new client is built from the
    /// properties, started, and a discovery run is spawned in the
    /// background.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a property is malformed and
    /// [`Error::Client`] if the client cannot be built or started. The
    /// binding is left unconfigured in both cases.
    pub async fn updated(&self, properties: Option<&Properties>) -> Result<(), Error> {
        self.deactivate().await;

        let Some(properties) = properties else {
            tracing::info!("No configuration, BACnet binding stays inactive");
            return Ok(());
        };

        let network = NetworkConfig::from_properties(properties)?;
        let client = self.connector.connect(&network)?;
        client.start().await?;

        tracing::info!(
            bind = %network.bind_socket_addr(),
            broadcast = %network.broadcast_socket_addr(),
            local_network_number = network.local_network_number,
            local_device_id = network.local_device_id,
            "BACnet client started"
        );

        *self.client.write() = Some(Arc::clone(&client));
        self.spawn_discovery(client);
        Ok(())
    }

    /// Stops and drops the running client, if any.
    ///
    /// A running discovery is aborted. Discovered devices stay registered.
    pub async fn deactivate(&self) {
        if let Some(handle) = self.discovery.lock().take() {
            handle.abort();
        }

        let client = self.client.write().take();
        if let Some(client) = client {
            client.stop().await;
            tracing::info!("BACnet client stopped");
        }
    }

    /// Notifies the binding that the configuration of an item changed.
    ///
    /// Clears the whole change-suppression cache so every endpoint is
    /// published again on the next poll.
    pub fn binding_changed(&self, item_name: &str) {
        tracing::debug!(item = item_name, "Binding changed, clearing last values");
        self.cache.clear();
    }

    /// Registers a binding provider.
    pub fn add_provider(&self, provider: Arc<dyn BindingProvider>) {
        self.providers.write().push(provider);
        self.cache.clear();
    }

    /// Unregisters a binding provider.
    ///
    /// Returns `true` if the provider was registered.
    pub fn remove_provider(&self, provider: &Arc<dyn BindingProvider>) -> bool {
        let removed = {
            let mut providers = self.providers.write();
            let before = providers.len();
            providers.retain(|p| !Arc::ptr_eq(p, provider));
            providers.len() != before
        };
        if removed {
            self.cache.clear();
        }
        removed
    }

    // =========================================================================
    // Discovery
    // =========================================================================

    /// Runs a discovery with the running client and waits for it to end.
    ///
    /// Returns the number of devices the client reported.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConfigured`] without a running client and
    /// [`Error::Client`] if the discovery fails.
    pub async fn discover(&self) -> Result<usize, Error> {
        let client = self.client().ok_or(Error::NotConfigured)?;
        let found = run_discovery(
            client,
            self.registry.clone(),
            Arc::clone(&self.publisher),
            &self.options,
        )
        .await?;
        Ok(found)
    }

    /// Waits for the background discovery started by
    /// [`updated`](Self::updated) to finish.
    ///
    /// Returns immediately if none is running.
    pub async fn wait_for_discovery(&self) {
        let handle = self.discovery.lock().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }

    fn spawn_discovery(&self, client: Arc<dyn BacnetClient>) {
        let registry = self.registry.clone();
        let publisher = Arc::clone(&self.publisher);
        let options = self.options.clone();

        let handle = tokio::spawn(async move {
            if let Err(e) = run_discovery(client, registry, publisher, &options).await {
                tracing::error!(error = %e, "Device discovery failed");
            }
        });

        if let Some(previous) = self.discovery.lock().replace(handle) {
            previous.abort();
        }
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub(crate) fn client(&self) -> Option<Arc<dyn BacnetClient>> {
        self.client.read().clone()
    }

    /// Returns the config of an item from the first provider that knows it.
    #[must_use]
    pub fn config_for_item(&self, item_name: &str) -> Option<EndpointConfig> {
        self.providers
            .read()
            .iter()
            .find_map(|p| p.config_for_item(item_name))
    }

    /// Returns the config bound to a property from the first provider that
    /// knows its endpoint.
    #[must_use]
    pub fn config_for_endpoint(&self, property: &Property) -> Option<EndpointConfig> {
        self.providers.read().iter().find_map(|p| {
            p.config_for_endpoint(property.device_id(), property.object_type, property.object_id)
        })
    }

    /// Returns the configs of all providers.
    #[must_use]
    pub fn all_configs(&self) -> Vec<EndpointConfig> {
        self.providers
            .read()
            .iter()
            .flat_map(|p| p.all_configs())
            .collect()
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("providers", &self.providers.read().len())
            .field("registry", &self.registry)
            .field("cache", &self.cache.len())
            .field("configured", &self.is_configured())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Discovers devices into `registry` and waits until the sink drained them.
async fn run_discovery(
    client: Arc<dyn BacnetClient>,
    registry: DeviceRegistry,
    publisher: Arc<dyn EventPublisher>,
    options: &BindingOptions,
) -> Result<usize, ClientError> {
    let (tx, rx) = mpsc::channel(options.discovery_capacity);
    let sink = registry.spawn_sink(rx, publisher);

    tracing::debug!(timeout = ?options.discovery_timeout, "Starting device discovery");
    let result = client.discover_devices(tx, options.discovery_timeout).await;

    // The sender was moved into the client call, so the sink ends on its own.
    let _ = sink.await;

    let found = result?;
    tracing::info!(devices = found, known = registry.len(), "Device discovery complete");
    Ok(found)
}
