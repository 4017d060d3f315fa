// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener registry: the side table from nodes to their delegated
//! subscriptions.
//!
//! The registry is owned by a [`Delegate`](crate::delegate::Delegate) and
//! never hangs off node representations — node identity is just a map key,
//! so node lifetime and registry lifetime are independent and several
//! delegation subsystems can observe the same tree without colliding.
//!
//! Shape: node → event-type name → ordered entry list. Two invariants hold
//! at every public-method boundary:
//!
//! - a `(node, type)` key exists iff its entry list is non-empty; lists that
//!   empty out are pruned immediately (the caller is told, so it can fire
//!   the detach hook);
//! - entries keep registration order, which is the invocation order the
//!   dispatcher guarantees.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::types::{Handler, Unbind};

/// One delegated subscription as stored in the registry.
///
/// Entries are immutable once stored; removal deletes them, it never
/// mutates them.
pub struct Entry<K, M> {
    /// Descendant selector; `None` means direct mode (no target matching).
    pub selector: Option<Rc<str>>,
    /// Explicit invocation receiver; `None` means the registrant node.
    pub context: Option<K>,
    /// The callback handle, carrying its identity.
    pub handler: Handler<K, M>,
}

impl<K: Copy, M> Clone for Entry<K, M> {
    fn clone(&self) -> Self {
        Self {
            selector: self.selector.clone(),
            context: self.context,
            handler: self.handler.clone(),
        }
    }
}

impl<K: core::fmt::Debug, M> core::fmt::Debug for Entry<K, M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Entry")
            .field("selector", &self.selector)
            .field("context", &self.context)
            .field("handler", &self.handler)
            .finish()
    }
}

impl<K, M> Entry<K, M> {
    /// Whether this entry satisfies both present filters of `unbind`.
    ///
    /// An absent selector filter matches any stored selector including
    /// direct mode; a present one requires exact string equality. An absent
    /// handler filter matches any identity.
    pub fn matches_filter(&self, unbind: &Unbind<'_>) -> bool {
        let selector_ok = match unbind.selector {
            None => true,
            Some(s) => self.selector.as_deref() == Some(s),
        };
        let handler_ok = match unbind.handler {
            None => true,
            Some(id) => self.handler.id() == Some(id),
        };
        selector_ok && handler_ok
    }
}

type EntryList<K, M> = SmallVec<[Entry<K, M>; 2]>;

/// Side table from node identity to per-event-type entry lists.
pub struct Registry<K, M> {
    nodes: HashMap<K, HashMap<String, EntryList<K, M>>>,
}

impl<K, M> core::fmt::Debug for Registry<K, M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let types: usize = self.nodes.values().map(HashMap::len).sum();
        let entries: usize = self
            .nodes
            .values()
            .flat_map(HashMap::values)
            .map(SmallVec::len)
            .sum();
        f.debug_struct("Registry")
            .field("nodes", &self.nodes.len())
            .field("types", &types)
            .field("entries", &entries)
            .finish_non_exhaustive()
    }
}

impl<K, M> Default for Registry<K, M> {
    fn default() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash, M> Registry<K, M> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry for `(node, event_type)`.
    ///
    /// Returns `true` when this is the first entry for the pair — the signal
    /// to attach the raw listener.
    pub fn insert(&mut self, node: K, event_type: &str, entry: Entry<K, M>) -> bool {
        let types = self.nodes.entry(node).or_default();
        let first = !types.contains_key(event_type);
        types.entry_ref(event_type).or_default().push(entry);
        first
    }

    /// Remove every entry for `(node, event_type)` matching `unbind`.
    ///
    /// Returns `true` when the pair's list emptied and was pruned — the
    /// signal to detach the raw listener. Unknown nodes and types are silent
    /// no-ops.
    pub fn remove_where(&mut self, node: K, event_type: &str, unbind: &Unbind<'_>) -> bool {
        let Some(types) = self.nodes.get_mut(&node) else {
            return false;
        };
        let Some(list) = types.get_mut(event_type) else {
            return false;
        };
        list.retain(|entry| !entry.matches_filter(unbind));
        if !list.is_empty() {
            return false;
        }
        types.remove(event_type);
        if types.is_empty() {
            self.nodes.remove(&node);
        }
        true
    }

    /// Drop every entry for `node` across all event types.
    ///
    /// Returns the pruned type names so the caller can fire detach hooks.
    pub fn remove_node(&mut self, node: K) -> Vec<String> {
        self.nodes
            .remove(&node)
            .map(|types| types.into_keys().collect())
            .unwrap_or_default()
    }

    /// Clone the entry list for `(node, event_type)` for dispatch.
    ///
    /// The snapshot is what gives re-entrant registration and removal their
    /// stable-iteration guarantee; cloning is cheap (`Rc` handles).
    pub fn snapshot(&self, node: K, event_type: &str) -> Option<SmallVec<[Entry<K, M>; 2]>> {
        self.nodes.get(&node)?.get(event_type).cloned()
    }

    /// Whether any entry exists for `(node, event_type)`.
    pub fn contains(&self, node: K, event_type: &str) -> bool {
        self.nodes
            .get(&node)
            .is_some_and(|types| types.contains_key(event_type))
    }

    /// Number of entries for `(node, event_type)`.
    pub fn count(&self, node: K, event_type: &str) -> usize {
        self.nodes
            .get(&node)
            .and_then(|types| types.get(event_type))
            .map_or(0, SmallVec::len)
    }

    /// Whether the registry holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
