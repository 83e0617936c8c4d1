// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared by the binding.
//!
//! # Types
//!
//! - [`ObjectType`] - BACnet object types an endpoint can point at
//! - [`ValueTag`] - Declared protocol type of an object's present value
//! - [`EncodedValue`] - Protocol-native value returned by the client
//! - [`ItemType`] / [`ItemValue`] - The host framework's item model

mod encoded_value;
mod item;
mod object_type;

pub use encoded_value::{BinaryPv, EncodedValue};
pub use item::{ItemType, ItemValue, OnOff, OpenClosed};
pub use object_type::{ObjectType, ValueTag};
