// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trellis Node Tree: a slot-allocated element tree with selector queries.
//!
//! This crate is the structural half of the Trellis stack. It stores a
//! hierarchy of element-style nodes (tag name, optional id, class list),
//! hands out generational [`NodeId`] handles that never resolve after a node
//! is removed, and answers selector queries over descendants.
//!
//! - [`Tree::insert`] / [`Tree::remove`] build and prune the hierarchy.
//! - [`Tree::parent_of`], [`Tree::children_of`], and [`Tree::descendants`]
//!   expose traversal.
//! - [`Selector::parse`] understands comma-separated groups of compound
//!   simple selectors: `*`, `tag`, `#id`, `.class`, and concatenations such
//!   as `li.item`. Combinators, attribute conditions, and pseudo-classes are
//!   rejected with [`SelectorError`].
//! - [`Tree::select`] and [`Tree::query_all`] return matching descendants of
//!   a node in document (preorder) order, excluding the node itself.
//!
//! The crate deliberately does not dispatch events, run layout, or track
//! geometry. Event delegation lives in `trellis_delegate`, which consumes
//! this tree through its collaborator traits.
//!
//! ## Example
//!
//! ```rust
//! use trellis_node_tree::{ElementData, Tree};
//!
//! let mut tree = Tree::new();
//! let list = tree.insert(None, ElementData::new("ul"));
//! let item = tree.insert(Some(list), ElementData::new("li").with_class("item"));
//! let _label = tree.insert(Some(item), ElementData::new("span"));
//!
//! let matched = tree.select(list, "li.item").unwrap();
//! assert_eq!(matched, vec![item]);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod selector;
mod tree;
mod types;

pub use selector::{Selector, SelectorError};
pub use tree::Tree;
pub use types::{ElementData, NodeId};
