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

//! Bidirectional wildcard matching over a token trie.
//!
//! # Design decisions
//!
//! ## Why a trie rather than a flat pattern list?
//!
//! Both the *stored* side and the *query* side of a match may contain
//! wildcards, and the zero-or-more wildcard has unbounded span, so no single
//! forward pass suffices: some positions require exploring every way the
//! remaining query could be consumed. Keying the search on a trie bounds that
//! exploration to branches that are actually populated, so the average visit
//! cost is proportional to the number of branches that can possibly match,
//! not to the number of registered entries.
//!
//! ## Why an arena?
//!
//! Pruning an emptied node requires reaching its parent, which in a pointer
//! design is a reference cycle. Nodes therefore live in a slab-style arena and
//! link to each other by index: the arena owns every node, parent/child links
//! are plain indices, and detaching a node is two map operations with no
//! ownership gymnastics.
//!
//! ## Concurrency
//!
//! The arena sits behind an [`RwLock`]: visits share a read guard (visitors
//! run under it), structural mutations take the write guard briefly. Readers
//! can never observe a half-linked node, and the remove-then-prune sequence is
//! atomic with respect to concurrent inserts along the same path.

use std::sync::RwLock;

use ahash::AHashMap;

use crate::{
    address::{Address, Token},
    correctness::{FAILED, check_valid_address},
    scheme::WildcardScheme,
};

type NodeId = usize;

const ROOT: NodeId = 0;

struct PartNode<T> {
    /// `None` only for the root.
    token: Option<Token>,
    /// `None` only for the root.
    parent: Option<NodeId>,
    values: Vec<T>,
    children: AHashMap<Token, NodeId>,
}

impl<T> PartNode<T> {
    fn new(token: Token, parent: NodeId) -> Self {
        Self {
            token: Some(token),
            parent: Some(parent),
            values: Vec::new(),
            children: AHashMap::new(),
        }
    }

    fn root() -> Self {
        Self {
            token: None,
            parent: None,
            values: Vec::new(),
            children: AHashMap::new(),
        }
    }
}

struct Arena<T> {
    nodes: Vec<Option<PartNode<T>>>,
    free: Vec<NodeId>,
}

impl<T> Arena<T> {
    fn with_root() -> Self {
        Self {
            nodes: vec![Some(PartNode::root())],
            free: Vec::new(),
        }
    }

    fn node(&self, id: NodeId) -> &PartNode<T> {
        self.nodes[id].as_ref().expect(FAILED)
    }

    fn node_mut(&mut self, id: NodeId) -> &mut PartNode<T> {
        self.nodes[id].as_mut().expect(FAILED)
    }

    fn alloc(&mut self, node: PartNode<T>) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.nodes[id] = Some(node);
            id
        } else {
            self.nodes.push(Some(node));
            self.nodes.len() - 1
        }
    }

    fn release(&mut self, id: NodeId) {
        self.nodes[id] = None;
        self.free.push(id);
    }

    fn child_or_create(&mut self, parent: NodeId, token: Token) -> NodeId {
        if let Some(&child) = self.node(parent).children.get(&token) {
            return child;
        }
        let child = self.alloc(PartNode::new(token, parent));
        self.node_mut(parent).children.insert(token, child);
        child
    }

    /// Detaches `id` and every newly emptied ancestor, stopping at the root or
    /// at the first ancestor that still holds values or other children.
    fn prune_if_empty(&mut self, mut id: NodeId) {
        loop {
            let (token, parent) = {
                let node = self.node(id);
                if !node.values.is_empty() || !node.children.is_empty() {
                    break;
                }
                match (node.token, node.parent) {
                    (Some(token), Some(parent)) => (token, parent),
                    _ => break, // root is never pruned
                }
            };
            self.node_mut(parent).children.remove(&token);
            self.release(id);
            id = parent;
        }
    }
}

/// A concurrent map from token-sequence keys to bags of values, where both
/// the stored keys and the lookup keys may contain wildcard tokens.
///
/// Values are held in unordered, duplicate-permitting bags attached exactly at
/// their key's terminal node. Nodes are created on demand on first insert and
/// pruned bottom-up as soon as a mutation leaves them with neither values nor
/// children.
pub struct AddressMap<T> {
    scheme: WildcardScheme,
    arena: RwLock<Arena<T>>,
}

impl<T> AddressMap<T> {
    /// Creates a new empty [`AddressMap`] instance under `scheme`.
    #[must_use]
    pub fn new(scheme: WildcardScheme) -> Self {
        Self {
            scheme,
            arena: RwLock::new(Arena::with_root()),
        }
    }

    /// Returns the wildcard scheme this map interprets addresses under.
    #[must_use]
    pub fn scheme(&self) -> &WildcardScheme {
        &self.scheme
    }

    /// Appends `value` to the bag at `address`, creating nodes along the path
    /// as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if `address` is empty.
    pub fn put(&self, address: Address, value: T) -> anyhow::Result<()> {
        check_valid_address(&address, stringify!(address))?;
        let tokens = self.scheme.tokenize(&address);

        let mut arena = self.arena.write().expect("address map lock poisoned");
        let mut node = ROOT;
        for token in tokens {
            node = arena.child_or_create(node, token);
        }
        arena.node_mut(node).values.push(value);
        Ok(())
    }

    /// Removes one occurrence of `value` from the bag at `address`, then
    /// prunes any nodes the removal emptied.
    ///
    /// Returns whether a value was removed; a missing path segment is not an
    /// error, the path is simply absent.
    ///
    /// # Errors
    ///
    /// Returns an error if `address` is empty.
    pub fn remove(&self, address: Address, value: &T) -> anyhow::Result<bool>
    where
        T: PartialEq,
    {
        self.remove_by(address, |candidate| candidate == value)
    }

    /// Removes the first value at `address` accepted by `matches`.
    ///
    /// # Errors
    ///
    /// Returns an error if `address` is empty.
    pub fn remove_by<F>(&self, address: Address, matches: F) -> anyhow::Result<bool>
    where
        F: Fn(&T) -> bool,
    {
        check_valid_address(&address, stringify!(address))?;
        let tokens = self.scheme.tokenize(&address);

        let mut arena = self.arena.write().expect("address map lock poisoned");
        let mut node = ROOT;
        for token in tokens {
            match arena.node(node).children.get(&token) {
                Some(&child) => node = child,
                None => return Ok(false),
            }
        }
        let values = &mut arena.node_mut(node).values;
        let removed = match values.iter().position(|candidate| matches(candidate)) {
            Some(index) => {
                values.remove(index);
                true
            }
            None => false,
        };
        arena.prune_if_empty(node);
        Ok(removed)
    }

    /// Clears every node and value, leaving a lone root.
    pub fn reset(&self) {
        let mut arena = self.arena.write().expect("address map lock poisoned");
        *arena = Arena::with_root();
    }

    /// Invokes `visitor` once per stored value whose key is compatible with
    /// `address` under the full bidirectional wildcard rules (wildcards in
    /// both the stored keys and the query participate).
    ///
    /// # Errors
    ///
    /// Returns an error if `address` is empty, or propagates the first error
    /// returned by `visitor` (traversal short-circuits; earlier visits are
    /// not rolled back).
    pub fn visit_matching<F>(&self, address: Address, visitor: &mut F) -> anyhow::Result<()>
    where
        F: FnMut(&T) -> anyhow::Result<()>,
    {
        self.visit(address, visitor, true)
    }

    /// As [`visit_matching`](Self::visit_matching), but stored wildcard
    /// entries do not participate: only values registered on literal token
    /// paths are visited. Wildcards in the query still fan out as usual.
    ///
    /// # Errors
    ///
    /// Returns an error if `address` is empty, or propagates the first error
    /// returned by `visitor`.
    pub fn visit_non_wildcard<F>(&self, address: Address, visitor: &mut F) -> anyhow::Result<()>
    where
        F: FnMut(&T) -> anyhow::Result<()>,
    {
        self.visit(address, visitor, false)
    }

    fn visit<F>(&self, address: Address, visitor: &mut F, wildcards: bool) -> anyhow::Result<()>
    where
        F: FnMut(&T) -> anyhow::Result<()>,
    {
        check_valid_address(&address, stringify!(address))?;
        let tokens = self.scheme.tokenize(&address);

        let arena = self.arena.read().expect("address map lock poisoned");
        visit_matching_at(&arena, ROOT, &tokens, 0, wildcards, visitor)
    }

    #[cfg(test)]
    pub(crate) fn node_count(&self) -> usize {
        let arena = self.arena.read().expect("address map lock poisoned");
        arena.nodes.iter().flatten().count()
    }
}

fn visit_values<T, F>(arena: &Arena<T>, id: NodeId, visitor: &mut F) -> anyhow::Result<()>
where
    F: FnMut(&T) -> anyhow::Result<()>,
{
    for value in &arena.node(id).values {
        visitor(value)?;
    }
    Ok(())
}

fn visit_descendant_values<T, F>(
    arena: &Arena<T>,
    id: NodeId,
    wildcards: bool,
    visitor: &mut F,
) -> anyhow::Result<()>
where
    F: FnMut(&T) -> anyhow::Result<()>,
{
    visit_values(arena, id, visitor)?;
    for (&token, &child) in &arena.node(id).children {
        if !wildcards && token.is_wildcard() {
            continue;
        }
        visit_descendant_values(arena, child, wildcards, visitor)?;
    }
    Ok(())
}

/// Resumes the query against this subtree after a stored zero-or-more
/// wildcard: the wildcard may have consumed any number of query tokens, so
/// scan the remaining tokens for the first child that re-anchors the match,
/// then walk the rest of the subtree for deeper re-anchors.
fn visit_path_tail_match<T, F>(
    arena: &Arena<T>,
    id: NodeId,
    query: &[Token],
    start: usize,
    wildcards: bool,
    visitor: &mut F,
) -> anyhow::Result<()>
where
    F: FnMut(&T) -> anyhow::Result<()>,
{
    let mut matched: Option<NodeId> = None;
    for i in start..query.len() {
        let token = query[i];
        if let Some(&child) = arena.node(id).children.get(&token) {
            if !wildcards && token.is_wildcard() {
                continue;
            }
            visit_matching_at(arena, child, query, i + 1, wildcards, visitor)?;
            matched = Some(child);
            break;
        }
    }

    for (&token, &child) in &arena.node(id).children {
        if matched == Some(child) || token == Token::AnyWords {
            continue;
        }
        if !wildcards && token == Token::SingleWord {
            continue;
        }
        visit_path_tail_match(arena, child, query, start, wildcards, visitor)?;
    }
    Ok(())
}

fn visit_matching_at<T, F>(
    arena: &Arena<T>,
    start_node: NodeId,
    query: &[Token],
    start: usize,
    wildcards: bool,
    visitor: &mut F,
) -> anyhow::Result<()>
where
    F: FnMut(&T) -> anyhow::Result<()>,
{
    let size = query.len();
    let mut node = Some(start_node);
    let mut i = start;

    while i < size {
        let Some(current) = node else { break };
        let token = query[i];

        // A trailing zero-or-more wildcard swallows the whole remaining subtree.
        if token == Token::AnyWords && i == size - 1 {
            return visit_descendant_values(arena, current, wildcards, visitor);
        }

        let mut single_child: Option<NodeId> = None;
        if wildcards {
            if let Some(&wild) = arena.node(current).children.get(&Token::AnyWords) {
                // A stored `#` here covers any split of the remaining query.
                visit_values(arena, wild, visitor)?;
                visit_path_tail_match(arena, wild, query, i, true, visitor)?;
            }
            if let Some(&wild) = arena.node(current).children.get(&Token::SingleWord) {
                // A stored `*` consumes exactly the current query token.
                visit_matching_at(arena, wild, query, i + 1, true, visitor)?;
                single_child = Some(wild);
            }
        }

        match token {
            Token::SingleWord => {
                for (&child_token, &child) in &arena.node(current).children {
                    if !wildcards && child_token.is_wildcard() {
                        continue;
                    }
                    if single_child == Some(child) {
                        continue; // already walked above
                    }
                    visit_matching_at(arena, child, query, i + 1, wildcards, visitor)?;
                }
                return Ok(());
            }
            Token::AnyWords => {
                visit_values(arena, current, visitor)?;
                return visit_path_tail_match(arena, current, query, i + 1, wildcards, visitor);
            }
            Token::Part(_) => {
                node = arena.node(current).children.get(&token).copied();
            }
        }
        i += 1;
    }

    // Query exhausted: the node reached contributes its own bag, and a stored
    // `#` child also matches the zero-length remainder.
    if let Some(terminal) = node {
        visit_values(arena, terminal, visitor)?;
        if wildcards {
            if let Some(&wild) = arena.node(terminal).children.get(&Token::AnyWords) {
                visit_values(arena, wild, visitor)?;
            }
        }
    }
    Ok(())
}
