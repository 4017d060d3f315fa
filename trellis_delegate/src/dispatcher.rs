// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher: walk an entry snapshot and invoke the callbacks that match.
//!
//! The dispatcher is deliberately minimal:
//!
//! - Entries run in registration order; the registry guarantees the
//!   snapshot preserves it.
//! - A direct-mode entry (no selector) always runs.
//! - A selector entry runs iff the event target is a member of the
//!   collaborator's *current* matching-descendant set for the registrant
//!   node. The set is re-queried on every dispatch — the tree may have
//!   changed since registration — and membership is an exact equality test:
//!   there is no walk from the target up to a nearest matching ancestor.
//! - The receiver passed to the callback is the entry's context if set,
//!   otherwise the registrant node.
//! - Propagation flags on the event are ignored here; they belong to the
//!   bubble walk between nodes, not to the fan-out within one node.
//!
//! Selector-scan errors propagate unwrapped; a panicking callback unwinds to
//! the trigger call.
//!
//! ## Minimal example
//!
//! ```rust
//! use std::cell::Cell;
//! use std::convert::Infallible;
//! use std::rc::Rc;
//! use trellis_delegate::dispatcher;
//! use trellis_delegate::registry::Entry;
//! use trellis_delegate::types::{Event, Handler, SelectorScan};
//!
//! // A scan where ".item" matches node 2 under node 1.
//! struct Scan;
//! impl SelectorScan<u32> for Scan {
//!     type Error = Infallible;
//!     fn matching_descendants(&self, root: u32, selector: &str) -> Result<Vec<u32>, Infallible> {
//!         Ok(if root == 1 && selector == ".item" { vec![2] } else { vec![] })
//!     }
//! }
//!
//! let hits = Rc::new(Cell::new(0));
//! let h = hits.clone();
//! let handler: Handler<u32> = Handler::new(move |_, _| h.set(h.get() + 1));
//! let entries = [Entry { selector: Some(".item".into()), context: None, handler }];
//!
//! // Target 2 matches; target 3 does not.
//! let mut event = Event::new("click", 2_u32);
//! assert_eq!(dispatcher::run(&entries, &Scan, 1, &mut event), Ok(1));
//! let mut event = Event::new("click", 3_u32);
//! assert_eq!(dispatcher::run(&entries, &Scan, 1, &mut event), Ok(0));
//! assert_eq!(hits.get(), 1);
//! ```

use crate::registry::Entry;
use crate::types::{Event, SelectorScan};

/// Run the matching entries of one `(node, event type)` snapshot.
///
/// `node` is the registrant the entries were stored on. Returns the number
/// of callbacks invoked, or the first selector-scan error.
pub fn run<K, M, S>(
    entries: &[Entry<K, M>],
    scan: &S,
    node: K,
    event: &mut Event<K, M>,
) -> Result<usize, S::Error>
where
    K: Copy + Eq,
    S: SelectorScan<K>,
{
    let mut invoked = 0_usize;
    for entry in entries {
        let receiver = entry.context.unwrap_or(node);
        match &entry.selector {
            // Direct mode: no target matching at all.
            None => {
                entry.handler.invoke(receiver, event);
                invoked += 1;
            }
            Some(selector) => {
                let matching = scan.matching_descendants(node, selector)?;
                if matching.contains(&event.target) {
                    entry.handler.invoke(receiver, event);
                    invoked += 1;
                }
            }
        }
    }
    Ok(invoked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Handler;
    use alloc::rc::Rc;
    use alloc::string::String;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;
    use core::convert::Infallible;

    /// Scan fixture: `.item` matches nodes 10 and 11 under root 1; `.inner`
    /// matches node 20 (a child of 10). Everything else matches nothing.
    struct FixedScan;

    impl SelectorScan<u32> for FixedScan {
        type Error = Infallible;

        fn matching_descendants(&self, root: u32, selector: &str) -> Result<Vec<u32>, Infallible> {
            Ok(match (root, selector) {
                (1, ".item") => vec![10, 11],
                (1, ".inner") => vec![20],
                _ => vec![],
            })
        }
    }

    /// Scan fixture that always fails.
    struct BrokenScan;

    impl SelectorScan<u32> for BrokenScan {
        type Error = &'static str;

        fn matching_descendants(
            &self,
            _root: u32,
            _selector: &str,
        ) -> Result<Vec<u32>, &'static str> {
            Err("bad selector")
        }
    }

    fn recording(log: &Rc<RefCell<Vec<(String, u32)>>>, name: &'static str) -> Handler<u32> {
        let log = Rc::clone(log);
        Handler::new(move |receiver, _event: &mut Event<u32>| {
            log.borrow_mut().push((String::from(name), receiver));
        })
    }

    fn entry(selector: Option<&str>, context: Option<u32>, handler: Handler<u32>) -> Entry<u32, ()> {
        Entry {
            selector: selector.map(Rc::from),
            context,
            handler,
        }
    }

    #[test]
    fn direct_entries_always_run() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let entries = [entry(None, None, recording(&log, "a"))];
        let mut event = Event::new("click", 999_u32);
        assert_eq!(run(&entries, &FixedScan, 1, &mut event), Ok(1));
        assert_eq!(*log.borrow(), vec![(String::from("a"), 1)]);
    }

    #[test]
    fn selector_entries_run_only_for_matching_targets() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let entries = [entry(Some(".item"), None, recording(&log, "a"))];

        let mut event = Event::new("click", 10_u32);
        assert_eq!(run(&entries, &FixedScan, 1, &mut event), Ok(1));

        let mut event = Event::new("click", 20_u32);
        assert_eq!(run(&entries, &FixedScan, 1, &mut event), Ok(0));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn target_must_be_in_the_set_itself_not_under_a_member() {
        // Node 20 sits under the `.item` node 10, but `.item` matching does
        // not climb from the target: only set membership counts.
        let log = Rc::new(RefCell::new(Vec::new()));
        let entries = [entry(Some(".item"), None, recording(&log, "a"))];
        let mut event = Event::new("click", 20_u32);
        assert_eq!(run(&entries, &FixedScan, 1, &mut event), Ok(0));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn entries_run_in_registration_order_and_all_matches_fire() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let entries = [
            entry(Some(".item"), None, recording(&log, "first")),
            entry(None, None, recording(&log, "second")),
            entry(Some(".inner"), None, recording(&log, "skipped")),
            entry(Some(".item"), None, recording(&log, "third")),
        ];
        let mut event = Event::new("click", 11_u32);
        assert_eq!(run(&entries, &FixedScan, 1, &mut event), Ok(3));
        let names: Vec<String> = log.borrow().iter().map(|(n, _)| n.clone()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn context_overrides_the_receiver() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let entries = [
            entry(None, Some(42), recording(&log, "bound")),
            entry(None, None, recording(&log, "free")),
        ];
        let mut event = Event::new("click", 1_u32);
        assert_eq!(run(&entries, &FixedScan, 1, &mut event), Ok(2));
        assert_eq!(
            *log.borrow(),
            vec![(String::from("bound"), 42), (String::from("free"), 1)]
        );
    }

    #[test]
    fn scan_errors_propagate_unwrapped() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let entries = [
            entry(None, None, recording(&log, "before")),
            entry(Some(".item"), None, recording(&log, "broken")),
        ];
        let mut event = Event::new("click", 1_u32);
        assert_eq!(run(&entries, &BrokenScan, 1, &mut event), Err("bad selector"));
        // Entries before the failing one already ran.
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn callbacks_may_mutate_the_event() {
        let handler: Handler<u32> = Handler::new(|_, event: &mut Event<u32>| {
            event.stop_propagation();
            event.prevent_default();
        });
        let entries = [entry(None, None, handler)];
        let mut event = Event::new("click", 1_u32);
        assert_eq!(run(&entries, &FixedScan, 1, &mut event), Ok(1));
        assert!(event.propagation_stopped());
        assert!(event.default_prevented());
    }
}
