// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapters to integrate with other Trellis crates.
//!
//! Each adapter is gated behind a feature flag to keep the core delegation
//! layer lightweight and `no_std` by default.
//!
//! ## Available Adapters
//!
//! - [`node_tree`] (`node_tree_adapter` feature): Implements the
//!   [`ParentLookup`](crate::types::ParentLookup) and
//!   [`SelectorScan`](crate::types::SelectorScan) collaborator traits for
//!   [`trellis_node_tree::Tree`], so a delegate can bubble and match
//!   selectors against a real element tree.

#[cfg(feature = "node_tree_adapter")]
pub mod node_tree;
