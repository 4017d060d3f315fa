// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter implementing the collaborator traits for Trellis Node Tree.
//!
//! ## Feature
//!
//! Enable with `node_tree_adapter`.
//!
//! ## Notes
//!
//! The scan parses the selector on every query, which keeps the "re-query
//! per dispatch" contract honest: matching always reflects the tree as it
//! is now. Parse failures surface as [`SelectorError`] through the trigger
//! call, unwrapped.

use alloc::vec::Vec;

use trellis_node_tree::{NodeId, SelectorError, Tree};

use crate::types::{ParentLookup, SelectorScan};

impl ParentLookup<NodeId> for Tree {
    fn parent_of(&self, node: &NodeId) -> Option<NodeId> {
        Self::parent_of(self, *node)
    }
}

impl SelectorScan<NodeId> for Tree {
    type Error = SelectorError;

    fn matching_descendants(&self, root: NodeId, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        self.select(root, selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delegate::Delegate;
    use crate::types::{Event, Handler};
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::Cell;
    use trellis_node_tree::ElementData;

    fn counting(hits: &Rc<Cell<u32>>) -> Handler<NodeId> {
        let hits = Rc::clone(hits);
        Handler::new(move |_, _: &mut Event<NodeId>| hits.set(hits.get() + 1))
    }

    #[test]
    fn delegation_through_a_real_tree() {
        // list > (item(.item) > label, other)
        let mut tree = Tree::new();
        let list = tree.insert(None, ElementData::new("ul"));
        let item = tree.insert(Some(list), ElementData::new("li").with_class("item"));
        let label = tree.insert(Some(item), ElementData::new("span"));
        let other = tree.insert(Some(list), ElementData::new("li"));

        let hub: Delegate<NodeId> = Delegate::new();
        let hits = Rc::new(Cell::new(0));
        hub.on_selector(list, "click", ".item", &counting(&hits));

        // Clicking the matching item fires; the non-matching sibling and the
        // label nested *inside* the match do not (no ancestor walk).
        hub.trigger(&tree, item, "click").unwrap();
        assert_eq!(hits.get(), 1);
        hub.trigger(&tree, other, "click").unwrap();
        assert_eq!(hits.get(), 1);
        hub.trigger(&tree, label, "click").unwrap();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn matching_tracks_tree_mutations_between_dispatches() {
        let mut tree = Tree::new();
        let list = tree.insert(None, ElementData::new("ul"));
        let item = tree.insert(Some(list), ElementData::new("li"));

        let hub: Delegate<NodeId> = Delegate::new();
        let hits = Rc::new(Cell::new(0));
        hub.on_selector(list, "click", ".item", &counting(&hits));

        hub.trigger(&tree, item, "click").unwrap();
        assert_eq!(hits.get(), 0);

        // The selector set is re-queried per dispatch, so a class added
        // after registration is picked up.
        tree.data_mut(item).unwrap().classes.push("item".into());
        hub.trigger(&tree, item, "click").unwrap();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn unparsable_selectors_error_at_dispatch_time() {
        let mut tree = Tree::new();
        let list = tree.insert(None, ElementData::new("ul"));
        let item = tree.insert(Some(list), ElementData::new("li"));

        let hub: Delegate<NodeId> = Delegate::new();
        let hits = Rc::new(Cell::new(0));
        // Registration performs no validation; the failure surfaces from
        // the selector engine during dispatch.
        hub.on_selector(list, "click", "ul li", &counting(&hits));

        assert!(matches!(
            hub.trigger(&tree, item, "click"),
            Err(SelectorError::Unsupported(_))
        ));
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn bubbling_follows_tree_ancestry() {
        let mut tree = Tree::new();
        let root = tree.insert(None, ElementData::new("div"));
        let mid = tree.insert(Some(root), ElementData::new("ul"));
        let leaf = tree.insert(Some(mid), ElementData::new("li"));

        let hub: Delegate<NodeId> = Delegate::new();
        let order = Rc::new(core::cell::RefCell::new(vec![]));
        for (node, name) in [(root, "root"), (mid, "mid"), (leaf, "leaf")] {
            let order = Rc::clone(&order);
            let handler: Handler<NodeId> =
                Handler::new(move |_, _: &mut Event<NodeId>| order.borrow_mut().push(name));
            hub.on(node, "click", &handler);
        }

        hub.trigger(&tree, leaf, "click").unwrap();
        assert_eq!(*order.borrow(), vec!["leaf", "mid", "root"]);
    }
}
