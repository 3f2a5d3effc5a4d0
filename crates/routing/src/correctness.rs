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

//! Input validation checks.
//!
//! Invalid inputs are programming errors on the caller's side: they fail fast,
//! are never retried, and surface synchronously as `anyhow` errors.

use crate::address::Address;

/// Standard expect message for conditions that imply an internal bug.
pub const FAILED: &str = "Condition failed";

/// Checks that `value` is non-empty and not all whitespace.
///
/// # Errors
///
/// Returns an error if the check fails.
pub fn check_valid_string<T: AsRef<str>>(value: T, key: &str) -> anyhow::Result<()> {
    let value = value.as_ref();
    if value.is_empty() {
        anyhow::bail!("invalid string for `{key}`, was empty");
    }
    if value.chars().all(char::is_whitespace) {
        anyhow::bail!("invalid string for `{key}`, was all whitespace");
    }
    Ok(())
}

/// Checks that `address` is a usable address string.
///
/// # Errors
///
/// Returns an error if the address is empty or all whitespace.
pub fn check_valid_address(address: &Address, key: &str) -> anyhow::Result<()> {
    check_valid_string(address.as_str(), key)
}
