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

//! Interned address strings and their token classification.

use std::{fmt::Display, ops::Deref};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use ustr::Ustr;

/// A hierarchical, delimiter-separated address.
///
/// Interned for cheap copies and hashing; whether an address is concrete or a
/// pattern is a property of the [`WildcardScheme`](crate::WildcardScheme) it
/// is interpreted under, not of the string itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(Ustr);

impl Address {
    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns whether the address string is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for Address {
    type Target = Ustr;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self(Ustr::from(value))
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        value.as_str().into()
    }
}

impl From<Ustr> for Address {
    fn from(value: Ustr) -> Self {
        Self(value)
    }
}

/// One delimiter-separated segment of an address, classified under a scheme.
///
/// Wildcard kinds are carried by the variant: user data that happens to look
/// like a wildcard inside a longer token stays [`Token::Part`], so stored
/// literals can never be promoted to wildcards by string coincidence.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Token {
    /// Matches zero or more consecutive tokens (`#` by default).
    AnyWords,
    /// Matches exactly one token (`*` by default).
    SingleWord,
    /// An ordinary literal token.
    Part(Ustr),
}

impl Token {
    /// Returns whether this token is one of the two wildcard kinds.
    #[must_use]
    pub const fn is_wildcard(&self) -> bool {
        matches!(self, Self::AnyWords | Self::SingleWord)
    }
}

/// A classified token sequence; inline-allocated for typical address depths.
pub type TokenPath = SmallVec<[Token; 8]>;
