// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Delegate: delegated event dispatch for UI node trees.
//!
//! ## Overview
//!
//! This crate lets a caller attach a callback to an ancestor node and have
//! it fire only when the node an event originated at matches a
//! descendant-selector pattern. A [`Delegate`](delegate::Delegate) keeps one
//! listener registry — a side table from node identity to per-event-type
//! entry lists — and dispatches over snapshots of it, so callbacks can
//! re-register and unregister mid-flight without corrupting a dispatch.
//!
//! ## What lives where
//!
//! - [`delegate`] — the [`Delegate`](delegate::Delegate) subsystem:
//!   `on`/`off`/`trigger`/`dispatch`, the ready interception, and the bubble
//!   walk.
//! - [`registry`] — the side table and its pruning invariants.
//! - [`dispatcher`] — matching and invocation over one entry snapshot.
//! - [`ready`] — the one-shot readiness latch.
//! - [`types`] — handlers and identity, event contexts and flags, event-spec
//!   helpers, removal filters, and the collaborator traits.
//! - [`adapters`] — feature-gated integrations (currently
//!   `node_tree_adapter` for [`trellis_node_tree`]).
//!
//! ## Collaborators, not implementations
//!
//! The crate never walks a tree or parses a selector itself. Hosts provide
//! a [`ParentLookup`](types::ParentLookup) for ancestry and a
//! [`SelectorScan`](types::SelectorScan) for matching; hosts with native
//! listener machinery can mirror registry attach/detach transitions through
//! [`ListenerHooks`](types::ListenerHooks). The `node_tree_adapter` feature
//! wires all of this to a real element tree.
//!
//! ## Delegation is single-level
//!
//! A delegated entry on node `A` matches events whose target is currently a
//! matching *descendant* of `A` — membership in the selector's result set,
//! tested by equality. There is no walk from the target up to a nearest
//! matching ancestor: with `A > B(.item) > C`, a click targeted at `C` does
//! not fire an `.item` subscription on `A`.
//!
//! ## Example
//!
//! ```rust
//! # #[cfg(feature = "node_tree_adapter")] {
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use trellis_delegate::delegate::Delegate;
//! use trellis_delegate::types::Handler;
//! use trellis_node_tree::{ElementData, NodeId, Tree};
//!
//! // ul > (li.item, li)
//! let mut tree = Tree::new();
//! let list = tree.insert(None, ElementData::new("ul"));
//! let item = tree.insert(Some(list), ElementData::new("li").with_class("item"));
//! let other = tree.insert(Some(list), ElementData::new("li"));
//!
//! let hub: Delegate<NodeId> = Delegate::new();
//! let clicks = Rc::new(Cell::new(0));
//! let c = clicks.clone();
//! let handler: Handler<NodeId> = Handler::new(move |_, _| c.set(c.get() + 1));
//! hub.on_selector(list, "click", ".item", &handler);
//!
//! hub.trigger(&tree, item, "click").unwrap();
//! hub.trigger(&tree, other, "click").unwrap();
//! assert_eq!(clicks.get(), 1);
//! # }
//! ```
//!
//! (The example exercises the `node_tree_adapter` feature.)
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod delegate;
pub mod dispatcher;
pub mod ready;
pub mod registry;
pub mod types;
