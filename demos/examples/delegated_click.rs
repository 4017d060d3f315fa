// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Delegated clicks over a small list tree.
//!
//! This example shows how to combine:
//! - `trellis_node_tree` for the element hierarchy and selector matching,
//! - `trellis_delegate` for registration, delegation, and manual triggers.
//!
//! Run:
//! - `cargo run -p trellis_examples --example delegated_click`

use std::cell::RefCell;
use std::rc::Rc;

use trellis_delegate::delegate::Delegate;
use trellis_delegate::ready::ReadySignal;
use trellis_delegate::types::Handler;
use trellis_node_tree::{ElementData, NodeId, Tree};

fn main() {
    // Build a todo list: ul#todos > three li entries, two of them removable.
    let mut tree = Tree::new();
    let list = tree.insert(None, ElementData::new("ul").with_id("todos"));
    let milk = tree.insert(
        Some(list),
        ElementData::new("li").with_class("todo").with_class("removable"),
    );
    let eggs = tree.insert(
        Some(list),
        ElementData::new("li").with_class("todo").with_class("removable"),
    );
    let rent = tree.insert(Some(list), ElementData::new("li").with_class("todo"));

    let hub: Delegate<NodeId> = Delegate::new();

    // One delegated subscription on the list covers every removable entry,
    // present and future.
    let removed: Rc<RefCell<Vec<NodeId>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&removed);
    let on_remove: Handler<NodeId> = Handler::new(move |_, event| {
        sink.borrow_mut().push(event.target);
        println!("removing todo {:?}", event.target);
    });
    hub.on_selector(list, "click", ".removable", &on_remove);

    // A direct subscription on the list sees every click that bubbles up.
    let audit: Handler<NodeId> = Handler::new(|list_node, event| {
        println!("list {list_node:?} observed a {} on {:?}", event.event_type, event.target);
    });
    hub.on(list, "click", &audit);

    // Readiness callbacks race the host's signals and fire exactly once.
    let announce: Handler<NodeId> = Handler::new(|_, _| println!("tree is ready"));
    hub.on_ready(list, &announce);
    hub.notify_ready(ReadySignal::ContentLoaded);
    hub.notify_ready(ReadySignal::Load); // suppressed by the latch

    // Click each entry: the delegated callback fires for the removable two.
    for node in [milk, eggs, rent] {
        hub.trigger(&tree, node, "click").expect("selectors parse");
    }
    assert_eq!(*removed.borrow(), vec![milk, eggs]);

    // Unbind the delegated subscription; later clicks only hit the audit.
    hub.off_selector(list, "click", ".removable");
    hub.trigger(&tree, milk, "click").expect("selectors parse");
    assert_eq!(removed.borrow().len(), 2);

    println!("done; {} todos removed", removed.borrow().len());
}
