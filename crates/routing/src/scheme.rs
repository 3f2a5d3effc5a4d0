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

//! Deployment-configurable wildcard symbols for hierarchical addresses.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use ustr::Ustr;

use crate::address::{Address, Token, TokenPath};

/// The delimiter and wildcard symbols an address namespace is interpreted under.
///
/// Addresses are ordered sequences of tokens separated by `delimiter`. Two
/// token values are reserved:
///
/// - `any_words` (default `#`) matches zero or more consecutive tokens.
/// - `single_word` (default `*`) matches exactly one token.
///
/// Both are wildcards only when they form a *whole* token: a token that merely
/// contains a wildcard symbol among other characters is an ordinary literal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WildcardScheme {
    delimiter: char,
    any_words: String,
    single_word: String,
}

impl Default for WildcardScheme {
    /// Creates the conventional `.` / `#` / `*` scheme.
    fn default() -> Self {
        Self {
            delimiter: '.',
            any_words: "#".to_string(),
            single_word: "*".to_string(),
        }
    }
}

impl WildcardScheme {
    /// Creates a new [`WildcardScheme`] instance.
    ///
    /// # Errors
    ///
    /// Returns an error if either wildcard symbol is empty, if the two symbols
    /// are equal, or if a symbol contains the delimiter (it could then never
    /// form a whole token).
    pub fn new<S1, S2>(delimiter: char, any_words: S1, single_word: S2) -> anyhow::Result<Self>
    where
        S1: AsRef<str>,
        S2: AsRef<str>,
    {
        let any_words = any_words.as_ref();
        let single_word = single_word.as_ref();

        if any_words.is_empty() || single_word.is_empty() {
            anyhow::bail!("wildcard symbols must be non-empty");
        }
        if any_words == single_word {
            anyhow::bail!(
                "wildcard symbols must be distinct, both were `{any_words}`"
            );
        }
        if any_words.contains(delimiter) || single_word.contains(delimiter) {
            anyhow::bail!(
                "wildcard symbols must not contain the delimiter `{delimiter}`"
            );
        }

        Ok(Self {
            delimiter,
            any_words: any_words.to_string(),
            single_word: single_word.to_string(),
        })
    }

    /// Returns the token delimiter.
    #[must_use]
    pub const fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Returns the zero-or-more-tokens wildcard symbol.
    #[must_use]
    pub fn any_words(&self) -> &str {
        &self.any_words
    }

    /// Returns the exactly-one-token wildcard symbol.
    #[must_use]
    pub fn single_word(&self) -> &str {
        &self.single_word
    }

    /// Splits `address` into its classified token path.
    ///
    /// Pure function: classification depends only on this scheme, never on
    /// what is stored under any address map.
    #[must_use]
    pub fn tokenize(&self, address: &Address) -> TokenPath {
        let mut tokens: TokenPath = SmallVec::new();
        for part in address.as_str().split(self.delimiter) {
            tokens.push(self.classify(part));
        }
        tokens
    }

    /// Classifies a single delimiter-separated segment.
    #[must_use]
    pub fn classify(&self, part: &str) -> Token {
        if part == self.any_words {
            Token::AnyWords
        } else if part == self.single_word {
            Token::SingleWord
        } else {
            Token::Part(Ustr::from(part))
        }
    }

    /// Returns whether `address` contains at least one wildcard token.
    #[must_use]
    pub fn is_pattern(&self, address: &Address) -> bool {
        address
            .as_str()
            .split(self.delimiter)
            .any(|part| part == self.any_words || part == self.single_word)
    }
}
