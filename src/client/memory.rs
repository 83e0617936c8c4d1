// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-process loopback client.
//!
//! [`MemoryClient`] simulates a BACnet network of devices and objects held
//! in memory. Reads can be scripted and failures injected, which makes it
//! the external client of choice for tests and demos.

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use crate::config::NetworkConfig;
use crate::error::ClientError;
use crate::types::{EncodedValue, ObjectType};

use super::{BacnetClient, ClientConnector, Device, Property, PropertyInfo};

/// A write accepted by a [`MemoryClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct WriteRecord {
    /// Device instance number.
    pub device_id: u32,
    /// Object type.
    pub object_type: ObjectType,
    /// Object instance number.
    pub object_id: u32,
    /// The written value.
    pub value: EncodedValue,
}

#[derive(Debug)]
struct SimulatedObject {
    name: String,
    units: String,
    description: String,
    value: EncodedValue,
    scripted: VecDeque<Result<EncodedValue, ClientError>>,
}

#[derive(Debug)]
struct SimulatedDevice {
    device: Device,
    objects: BTreeMap<(ObjectType, u32), SimulatedObject>,
}

#[derive(Debug, Default)]
struct Network {
    devices: BTreeMap<u32, SimulatedDevice>,
    unreachable: HashSet<u32>,
    writes: Vec<WriteRecord>,
}

/// Loopback BACnet client backed by an in-memory device network.
///
/// Reads return the object's current value unless scripted results are
/// queued with [`push_reads`](Self::push_reads) or
/// [`fail_next_read`](Self::fail_next_read). Writes to input objects are
/// rejected, like on a real device whose inputs are in service.
///
/// # Examples
///
/// ```
/// use bacnet_binding::client::{BacnetClient, Device, MemoryClient, Property};
/// use bacnet_binding::types::{EncodedValue, ObjectType};
///
/// # async fn example() -> bacnet_binding::Result<()> {
/// let client = MemoryClient::new();
/// let device = Device::new(7, "10.0.0.7:47808".parse().unwrap());
/// client.add_device(device.clone());
/// client.add_object(7, ObjectType::AnalogOutput, 3, EncodedValue::Real(21.5));
///
/// client.start().await?;
/// let property = Property::new(device, ObjectType::AnalogOutput, 3);
/// assert_eq!(client.read_property(&property).await?, EncodedValue::Real(21.5));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryClient {
    network: Mutex<Network>,
    started: AtomicBool,
    reads: AtomicUsize,
}

impl MemoryClient {
    /// Creates an empty, stopped client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a connector that hands out this client for any settings.
    #[must_use]
    pub fn connector(self: &Arc<Self>) -> impl ClientConnector + 'static {
        let client = Arc::clone(self);
        move |config: &NetworkConfig| -> Result<Arc<dyn BacnetClient>, ClientError> {
            tracing::debug!(
                bind = %config.bind_socket_addr(),
                broadcast = %config.broadcast_socket_addr(),
                local_device_id = config.local_device_id,
                "Connecting loopback client"
            );
            Ok(Arc::clone(&client) as Arc<dyn BacnetClient>)
        }
    }

    /// Adds a device to the network, replacing one with the same instance.
    ///
    /// Objects of a replaced device are kept.
    pub fn add_device(&self, device: Device) {
        let mut network = self.network.lock();
        let id = device.instance_number;
        match network.devices.get_mut(&id) {
            Some(existing) => existing.device = device,
            None => {
                network.devices.insert(
                    id,
                    SimulatedDevice {
                        device,
                        objects: BTreeMap::new(),
                    },
                );
            }
        }
    }

    /// Adds an object to a device.
    ///
    /// Returns `false` if the device does not exist.
    pub fn add_object(
        &self,
        device_id: u32,
        object_type: ObjectType,
        object_id: u32,
        value: EncodedValue,
    ) -> bool {
        let mut network = self.network.lock();
        let Some(device) = network.devices.get_mut(&device_id) else {
            return false;
        };
        device.objects.insert(
            (object_type, object_id),
            SimulatedObject {
                name: format!("{object_type}-{object_id}"),
                units: String::new(),
                description: String::new(),
                value,
                scripted: VecDeque::new(),
            },
        );
        true
    }

    /// Sets the name, units and description of an object.
    ///
    /// Returns `false` if the object does not exist.
    pub fn describe_object(
        &self,
        device_id: u32,
        object_type: ObjectType,
        object_id: u32,
        name: impl Into<String>,
        units: impl Into<String>,
        description: impl Into<String>,
    ) -> bool {
        self.with_object(device_id, object_type, object_id, |object| {
            object.name = name.into();
            object.units = units.into();
            object.description = description.into();
        })
    }

    /// Sets the current value of an object.
    ///
    /// Returns `false` if the object does not exist.
    pub fn set_value(
        &self,
        device_id: u32,
        object_type: ObjectType,
        object_id: u32,
        value: EncodedValue,
    ) -> bool {
        self.with_object(device_id, object_type, object_id, |object| {
            object.value = value;
        })
    }

    /// Returns the current value of an object.
    #[must_use]
    pub fn value(
        &self,
        device_id: u32,
        object_type: ObjectType,
        object_id: u32,
    ) -> Option<EncodedValue> {
        self.network
            .lock()
            .devices
            .get(&device_id)?
            .objects
            .get(&(object_type, object_id))
            .map(|o| o.value.clone())
    }

    /// Queues values returned by the next reads of an object, in order.
    ///
    /// Each scripted value becomes the object's current value once read.
    /// Returns `false` if the object does not exist.
    pub fn push_reads(
        &self,
        device_id: u32,
        object_type: ObjectType,
        object_id: u32,
        values: impl IntoIterator<Item = EncodedValue>,
    ) -> bool {
        self.with_object(device_id, object_type, object_id, |object| {
            object.scripted.extend(values.into_iter().map(Ok));
        })
    }

    /// Makes the next read of an object fail with `error`.
    ///
    /// Returns `false` if the object does not exist.
    pub fn fail_next_read(
        &self,
        device_id: u32,
        object_type: ObjectType,
        object_id: u32,
        error: ClientError,
    ) -> bool {
        self.with_object(device_id, object_type, object_id, |object| {
            object.scripted.push_back(Err(error));
        })
    }

    /// Marks a device as unreachable (or reachable again).
    ///
    /// Unreachable devices still answer discovery but fail reads and writes.
    pub fn set_unreachable(&self, device_id: u32, unreachable: bool) {
        let mut network = self.network.lock();
        if unreachable {
            network.unreachable.insert(device_id);
        } else {
            network.unreachable.remove(&device_id);
        }
    }

    /// Returns all accepted writes, oldest first.
    #[must_use]
    pub fn writes(&self) -> Vec<WriteRecord> {
        self.network.lock().writes.clone()
    }

    /// Returns the number of read requests served, failed ones included.
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Returns true between `start` and `stop`.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    fn with_object(
        &self,
        device_id: u32,
        object_type: ObjectType,
        object_id: u32,
        f: impl FnOnce(&mut SimulatedObject),
    ) -> bool {
        let mut network = self.network.lock();
        match network
            .devices
            .get_mut(&device_id)
            .and_then(|d| d.objects.get_mut(&(object_type, object_id)))
        {
            Some(object) => {
                f(object);
                true
            }
            None => false,
        }
    }

    fn ensure_started(&self) -> Result<(), ClientError> {
        if self.is_started() {
            Ok(())
        } else {
            Err(ClientError::NotStarted)
        }
    }
}

fn ensure_reachable(network: &Network, device_id: u32) -> Result<(), ClientError> {
    if network.unreachable.contains(&device_id) || !network.devices.contains_key(&device_id) {
        return Err(ClientError::DeviceUnreachable(device_id));
    }
    Ok(())
}

#[async_trait]
impl BacnetClient for MemoryClient {
    async fn start(&self) -> Result<(), ClientError> {
        self.started.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) {
        self.started.store(false, Ordering::SeqCst);
    }

    async fn discover_devices(
        &self,
        sink: mpsc::Sender<Device>,
        _timeout: Duration,
    ) -> Result<usize, ClientError> {
        self.ensure_started()?;

        let devices: Vec<Device> = self
            .network
            .lock()
            .devices
            .values()
            .map(|d| d.device.clone())
            .collect();

        let mut sent = 0;
        for device in devices {
            if sink.send(device).await.is_err() {
                break;
            }
            sent += 1;
        }
        Ok(sent)
    }

    async fn device_properties(&self, device: &Device) -> Result<Vec<PropertyInfo>, ClientError> {
        self.ensure_started()?;

        let network = self.network.lock();
        ensure_reachable(&network, device.instance_number)?;

        let Some(simulated) = network.devices.get(&device.instance_number) else {
            return Err(ClientError::DeviceUnreachable(device.instance_number));
        };

        Ok(simulated
            .objects
            .iter()
            .map(|((object_type, object_id), object)| PropertyInfo {
                property: Property::new(device.clone(), *object_type, *object_id),
                name: object.name.clone(),
                units: object.units.clone(),
                description: object.description.clone(),
            })
            .collect())
    }

    async fn read_property(&self, property: &Property) -> Result<EncodedValue, ClientError> {
        self.ensure_started()?;
        self.reads.fetch_add(1, Ordering::SeqCst);

        let mut network = self.network.lock();
        ensure_reachable(&network, property.device_id())?;

        let object = network
            .devices
            .get_mut(&property.device_id())
            .and_then(|d| {
                d.objects
                    .get_mut(&(property.object_type, property.object_id))
            })
            .ok_or_else(|| ClientError::UnknownProperty(property.to_string()))?;

        match object.scripted.pop_front() {
            Some(Ok(value)) => {
                object.value = value.clone();
                Ok(value)
            }
            Some(Err(e)) => Err(e),
            None => Ok(object.value.clone()),
        }
    }

    async fn write_property(
        &self,
        property: &Property,
        value: EncodedValue,
    ) -> Result<(), ClientError> {
        self.ensure_started()?;

        let mut network = self.network.lock();
        ensure_reachable(&network, property.device_id())?;

        if property.object_type.is_input() {
            return Err(ClientError::WriteRejected(format!(
                "{property} is read-only"
            )));
        }

        let object = network
            .devices
            .get_mut(&property.device_id())
            .and_then(|d| {
                d.objects
                    .get_mut(&(property.object_type, property.object_id))
            })
            .ok_or_else(|| ClientError::UnknownProperty(property.to_string()))?;

        object.value = value.clone();
        network.writes.push(WriteRecord {
            device_id: property.device_id(),
            object_type: property.object_type,
            object_id: property.object_id,
            value,
        });
        Ok(())
    }
}
