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

//! Minimal in-memory [`Binding`] implementations for tests and benchmarks.

use std::sync::{Arc, Mutex};

use ustr::Ustr;

use crate::{
    address::Address,
    manager::{Binding, BindingSet, BindingSetFactory},
};

/// A plain named binding with no delivery behavior.
#[derive(Debug)]
pub struct StubBinding {
    address: Address,
    unique_name: Ustr,
}

impl StubBinding {
    /// Creates a new [`StubBinding`] instance.
    #[must_use]
    pub fn new(address: Address, unique_name: &str) -> Self {
        Self {
            address,
            unique_name: Ustr::from(unique_name),
        }
    }
}

impl Binding for StubBinding {
    fn address(&self) -> Address {
        self.address
    }

    fn unique_name(&self) -> Ustr {
        self.unique_name
    }
}

/// A [`BindingSet`] backed by a mutex-guarded vector.
pub struct StubBindingSet {
    address: Address,
    members: Mutex<Vec<Arc<dyn Binding>>>,
}

impl StubBindingSet {
    /// Creates a new empty [`StubBindingSet`] instance for `address`.
    #[must_use]
    pub fn new(address: Address) -> Self {
        Self {
            address,
            members: Mutex::new(Vec::new()),
        }
    }

    /// The address this set was created for.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }
}

impl BindingSet for StubBindingSet {
    fn add(&self, binding: Arc<dyn Binding>) {
        let mut members = self.members.lock().expect("binding set lock poisoned");
        if members
            .iter()
            .all(|member| member.unique_name() != binding.unique_name())
        {
            members.push(binding);
        }
    }

    fn remove_by_unique_name(&self, unique_name: Ustr) -> Option<Arc<dyn Binding>> {
        let mut members = self.members.lock().expect("binding set lock poisoned");
        let index = members
            .iter()
            .position(|member| member.unique_name() == unique_name)?;
        Some(members.remove(index))
    }

    fn bindings(&self) -> Vec<Arc<dyn Binding>> {
        self.members.lock().expect("binding set lock poisoned").clone()
    }
}

/// Creates [`StubBindingSet`]s.
#[derive(Debug, Default)]
pub struct StubBindingSetFactory;

impl BindingSetFactory for StubBindingSetFactory {
    fn create(&self, address: Address) -> Arc<dyn BindingSet> {
        Arc::new(StubBindingSet::new(address))
    }
}
