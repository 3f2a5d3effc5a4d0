// -------------------------------------------------------------------------------------------------
//  Copyright (C) 2015-2026 Nautech Systems Pty Ltd. All rights reserved.
//  https://nautechsystems.io
//
//  Licensed under the GNU Lesser General Public License Version 3.0 (the "License");
//  You may not use this file except in compliance with the License.
//  You may obtain a copy of the License at https://www.gnu.org/licenses/lgpl-3.0.en.html
//
//  Unless required by applicable law or agreed to in writing, software
//  distributed under the License is distributed on an "AS IS" BASIS,
//  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//  See the License for the specific language governing permissions and
//  limitations under the License.
// -------------------------------------------------------------------------------------------------

//! Wildcard address matching and binding synchronization for message routing.
//!
//! Addresses are dot-delimited token sequences. A token that is exactly `#`
//! matches zero or more tokens, a token that is exactly `*` matches exactly
//! one, and wildcards may appear in stored entries and in queries alike. The
//! crate provides:
//!
//! - [`AddressMap`](address_map::AddressMap): a concurrent trie mapping
//!   (possibly wildcard) addresses to bags of values, with bidirectional
//!   wildcard matching and bottom-up pruning.
//! - [`AddressManager`](manager::AddressManager): keeps a direct
//!   address-to-bindings map synchronized with the trie, materializing the
//!   binding set for a concrete address lazily on first routing lookup.
//! - [`WildcardScheme`](scheme::WildcardScheme): the configurable delimiter
//!   and wildcard symbols the above interpret addresses under.

pub mod address;
pub mod address_map;
pub mod correctness;
pub mod manager;
pub mod scheme;
pub mod stubs;

pub use crate::{
    address::{Address, Token, TokenPath},
    address_map::AddressMap,
    manager::{AddressInfo, AddressManager, Binding, BindingSet, BindingSetFactory},
    scheme::WildcardScheme,
};
