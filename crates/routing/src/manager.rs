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

//! Keeps the concrete routing view and the wildcard trie in lockstep.
//!
//! The hot path is routing: a producer sends to a concrete address and we
//! must hand back the full set of bindings covering it, including bindings
//! registered under wildcard patterns. That set is materialized lazily on
//! first routing miss, cached in a direct map, and from then on kept current
//! incrementally as bindings and patterns come and go.
//!
//! # Concurrency
//!
//! Lookups go through [`DashMap`] without any manager-wide lock. Every
//! mutation that touches more than one structure (and the lazy
//! materialization itself) runs under a single `sync_lock`, so concurrent
//! callers racing to materialize the same address end up sharing one
//! [`BindingSet`] instance, and a lookup can never observe the direct map and
//! the trie disagreeing.

use std::{
    fmt::Debug,
    sync::{Arc, Mutex},
};

use dashmap::DashMap;
use ustr::Ustr;

use crate::{
    address::Address,
    address_map::AddressMap,
    correctness::check_valid_string,
    scheme::WildcardScheme,
};

/// A consumer registration: a named endpoint attached to an address, which
/// may be a concrete address or a wildcard pattern.
pub trait Binding: Send + Sync {
    /// The address (or pattern) this binding was registered under.
    fn address(&self) -> Address;

    /// The name uniquely identifying this binding within a manager.
    fn unique_name(&self) -> Ustr;
}

/// A live collection of bindings routed to as a unit.
///
/// Implementations must make [`add`](Self::add) idempotent per unique name:
/// adding a binding whose name is already present is a no-op. The manager
/// relies on this when merging overlapping pattern entries into one set.
pub trait BindingSet: Send + Sync {
    /// Adds `binding` unless one with the same unique name is present.
    fn add(&self, binding: Arc<dyn Binding>);

    /// Removes and returns the binding registered under `unique_name`.
    fn remove_by_unique_name(&self, unique_name: Ustr) -> Option<Arc<dyn Binding>>;

    /// Snapshot of the current members.
    fn bindings(&self) -> Vec<Arc<dyn Binding>>;
}

/// Creates empty [`BindingSet`]s for addresses being materialized.
pub trait BindingSetFactory: Send + Sync {
    fn create(&self, address: Address) -> Arc<dyn BindingSet>;
}

/// Metadata for a declared address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AddressInfo {
    pub address: Address,
    pub auto_created: bool,
}

impl AddressInfo {
    /// Creates a new [`AddressInfo`] instance.
    #[must_use]
    pub fn new(address: Address, auto_created: bool) -> Self {
        Self {
            address,
            auto_created,
        }
    }
}

/// Synchronizes a direct address-to-bindings map with a wildcard trie so
/// concrete routing lookups stay O(1) while wildcard registrations still
/// reach every address they cover.
pub struct AddressManager {
    scheme: WildcardScheme,
    factory: Box<dyn BindingSetFactory>,
    /// Concrete-address (and pattern) entry points for routing.
    mappings: DashMap<Address, Arc<dyn BindingSet>>,
    /// Every binding by unique name, for existence checks and removal.
    name_map: DashMap<Ustr, Arc<dyn Binding>>,
    address_info: DashMap<Address, AddressInfo>,
    /// Trie over the same sets, keyed by tokenized address.
    address_map: AddressMap<Arc<dyn BindingSet>>,
    /// Serializes every cross-structure mutation.
    sync_lock: Mutex<()>,
}

impl Debug for AddressManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct(stringify!(AddressManager))
            .field("scheme", &self.scheme)
            .field("mappings", &self.mappings.len())
            .field("bindings", &self.name_map.len())
            .finish()
    }
}

impl AddressManager {
    /// Creates a new empty [`AddressManager`] instance.
    #[must_use]
    pub fn new(scheme: WildcardScheme, factory: Box<dyn BindingSetFactory>) -> Self {
        Self {
            address_map: AddressMap::new(scheme.clone()),
            scheme,
            factory,
            mappings: DashMap::new(),
            name_map: DashMap::new(),
            address_info: DashMap::new(),
            sync_lock: Mutex::new(()),
        }
    }

    /// Returns the wildcard scheme this manager interprets addresses under.
    #[must_use]
    pub fn scheme(&self) -> &WildcardScheme {
        &self.scheme
    }

    /// Returns the binding set to route a send to `address` through,
    /// materializing it from matching wildcard entries on first use.
    ///
    /// Returns `None` for a wildcard pattern with no registered entry, and
    /// for a concrete address nothing currently covers.
    ///
    /// # Errors
    ///
    /// Returns an error if `address` is empty.
    pub fn get_bindings_for_routing_address(
        &self,
        address: Address,
    ) -> anyhow::Result<Option<Arc<dyn BindingSet>>> {
        if let Some(existing) = self.mappings.get(&address) {
            return Ok(Some(existing.value().clone()));
        }
        if self.scheme.is_pattern(&address) {
            // patterns are only routable once a binding registers them
            return Ok(None);
        }

        let _guard = self.sync_lock.lock().expect("manager lock poisoned");
        // another caller may have materialized while we waited
        if let Some(existing) = self.mappings.get(&address) {
            return Ok(Some(existing.value().clone()));
        }

        let mut merged: Option<Arc<dyn BindingSet>> = None;
        self.address_map.visit_matching(address, &mut |set| {
            let target = merged.get_or_insert_with(|| self.factory.create(address));
            for binding in set.bindings() {
                target.add(binding);
            }
            Ok(())
        })?;

        if let Some(set) = merged {
            log::debug!("Materialized bindings for {address}");
            self.mappings.insert(address, set.clone());
            self.address_map.put(address, set.clone())?;
            return Ok(Some(set));
        }
        Ok(None)
    }

    /// Registers `binding` under its address, propagating it into every
    /// already-materialized entry it covers (for a pattern) or pulling in
    /// every pattern entry covering it (for a concrete address).
    ///
    /// Returns whether the binding's address gained its first entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is empty or the unique name is empty
    /// or already registered.
    pub fn add_binding(&self, binding: Arc<dyn Binding>) -> anyhow::Result<bool> {
        let address = binding.address();
        let unique_name = binding.unique_name();
        check_valid_string(unique_name.as_str(), stringify!(unique_name))?;

        let _guard = self.sync_lock.lock().expect("manager lock poisoned");
        if self.name_map.contains_key(&unique_name) {
            anyhow::bail!("Binding already exists: {unique_name}");
        }

        let mut is_new = false;
        let set = self
            .mappings
            .entry(address)
            .or_insert_with(|| {
                is_new = true;
                self.factory.create(address)
            })
            .value()
            .clone();
        self.name_map.insert(unique_name, binding.clone());
        set.add(binding.clone());

        if self.scheme.is_pattern(&address) {
            // push the new binding into every literal entry the pattern covers
            self.address_map.visit_non_wildcard(address, &mut |other| {
                if !Arc::ptr_eq(other, &set) {
                    other.add(binding.clone());
                }
                Ok(())
            })?;
        } else {
            // pull members of every entry covering this concrete address
            self.address_map.visit_matching(address, &mut |other| {
                if !Arc::ptr_eq(other, &set) {
                    for existing in other.bindings() {
                        set.add(existing);
                    }
                }
                Ok(())
            })?;
        }

        if is_new {
            self.address_map.put(address, set)?;
        }
        log::debug!("Added binding {unique_name} for {address}");
        Ok(is_new)
    }

    /// Unregisters the binding named `unique_name` and strips it from every
    /// entry it had been propagated into. The owning entry persists even when
    /// emptied, so a later identical registration reuses it.
    ///
    /// Returns the removed binding, or `None` if the name is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if trie traversal fails.
    pub fn remove_binding(&self, unique_name: Ustr) -> anyhow::Result<Option<Arc<dyn Binding>>> {
        let _guard = self.sync_lock.lock().expect("manager lock poisoned");
        let Some((_, binding)) = self.name_map.remove(&unique_name) else {
            return Ok(None);
        };

        let address = binding.address();
        self.address_map.visit_matching(address, &mut |set| {
            set.remove_by_unique_name(unique_name);
            Ok(())
        })?;
        if let Some(own) = self.mappings.get(&address) {
            // the owning entry may predate the trie entry (pattern with no
            // materialized matches), so strip it directly as well
            own.remove_by_unique_name(unique_name);
        }

        log::debug!("Removed binding {unique_name} for {address}");
        Ok(Some(binding))
    }

    /// Declares `address`, returning whether it was newly added.
    pub fn add_address_info(&self, info: AddressInfo) -> bool {
        let mut added = false;
        self.address_info.entry(info.address).or_insert_with(|| {
            added = true;
            info
        });
        added
    }

    /// Returns the declared metadata for `address`, if any.
    #[must_use]
    pub fn get_address_info(&self, address: Address) -> Option<AddressInfo> {
        self.address_info.get(&address).map(|info| info.value().clone())
    }

    /// Undeclares `address`, dropping its routing entry and unlinking that
    /// entry from the trie.
    ///
    /// # Errors
    ///
    /// Returns an error if trie traversal fails.
    pub fn remove_address_info(&self, address: Address) -> anyhow::Result<Option<AddressInfo>> {
        let _guard = self.sync_lock.lock().expect("manager lock poisoned");
        let Some((_, info)) = self.address_info.remove(&address) else {
            return Ok(None);
        };

        if let Some((_, set)) = self.mappings.remove(&address) {
            self.address_map
                .remove_by(address, |entry| Arc::ptr_eq(entry, &set))?;
        }

        log::debug!("Removed address {address}");
        Ok(Some(info))
    }

    /// Returns the bindings of `address` whose own registration address is
    /// exactly `address` (members propagated in from patterns are excluded).
    #[must_use]
    pub fn get_direct_bindings(&self, address: Address) -> Vec<Arc<dyn Binding>> {
        self.mappings
            .get(&address)
            .map(|set| {
                set.bindings()
                    .into_iter()
                    .filter(|binding| binding.address() == address)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Returns the binding registered under `unique_name`, if any.
    #[must_use]
    pub fn get_binding(&self, unique_name: Ustr) -> Option<Arc<dyn Binding>> {
        self.name_map.get(&unique_name).map(|b| b.value().clone())
    }

    /// Every address currently holding a routing entry.
    #[must_use]
    pub fn addresses(&self) -> Vec<Address> {
        self.mappings.iter().map(|entry| *entry.key()).collect()
    }

    /// Number of registered bindings.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.name_map.len()
    }

    /// Drops every binding, entry, and declared address.
    pub fn clear(&self) {
        let _guard = self.sync_lock.lock().expect("manager lock poisoned");
        self.mappings.clear();
        self.name_map.clear();
        self.address_info.clear();
        self.address_map.reset();
        log::debug!("Cleared address manager");
    }
}
