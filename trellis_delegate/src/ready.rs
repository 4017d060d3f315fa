// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-shot readiness detection.
//!
//! Hosts typically surface several signals that all mean "the tree is now
//! usable": a state change that reports completion, an explicit
//! content-ready notification, and a late load notification. Which one
//! arrives first (or at all) varies by host, so the latch races all three:
//! the first effective signal fires every pending callback exactly once and
//! a guard flag suppresses everything after that.
//!
//! This is not a registry concern — `"ready"` registrations never enter the
//! listener registry, carry no selector, and cannot be removed. The latch is
//! driven through [`Delegate::notify_ready`](crate::delegate::Delegate::notify_ready);
//! the type lives here so hosts embedding their own delivery can reuse the
//! one-shot contract.

use alloc::vec::Vec;

use crate::types::Handler;

/// A readiness signal reported by the host.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReadySignal {
    /// The host's ready-state changed; only a change to the complete state
    /// is effective.
    StateChange {
        /// Whether the new state is the complete one.
        complete: bool,
    },
    /// The tree content finished building.
    ContentLoaded,
    /// The host finished loading entirely.
    Load,
}

impl ReadySignal {
    /// Whether this signal is allowed to fire the latch.
    pub fn is_ready(self) -> bool {
        !matches!(self, Self::StateChange { complete: false })
    }
}

/// One-shot latch racing readiness signals; first effective signal wins.
pub struct ReadyLatch<K, M = ()> {
    fired: bool,
    watchers: Vec<(K, Handler<K, M>)>,
}

impl<K, M> core::fmt::Debug for ReadyLatch<K, M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ReadyLatch")
            .field("fired", &self.fired)
            .field("watchers", &self.watchers.len())
            .finish()
    }
}

impl<K, M> Default for ReadyLatch<K, M> {
    fn default() -> Self {
        Self {
            fired: false,
            watchers: Vec::new(),
        }
    }
}

impl<K, M> ReadyLatch<K, M> {
    /// Create an unfired latch with no watchers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the latch already fired.
    pub fn fired(&self) -> bool {
        self.fired
    }

    /// Register a callback to run when the latch fires.
    ///
    /// `node` becomes both the receiver and the target of the synthesized
    /// ready event. Watchers added after the latch fired are dropped: the
    /// signals they would have raced have already passed.
    pub fn watch(&mut self, node: K, handler: Handler<K, M>) {
        if !self.fired {
            self.watchers.push((node, handler));
        }
    }

    /// Feed a signal into the latch.
    ///
    /// On the first effective signal, flips the guard and hands back the
    /// pending watchers for the caller to invoke (outside any borrow it
    /// holds). Every other call returns `None`.
    pub fn fire(&mut self, signal: ReadySignal) -> Option<Vec<(K, Handler<K, M>)>> {
        if self.fired || !signal.is_ready() {
            return None;
        }
        self.fired = true;
        Some(core::mem::take(&mut self.watchers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Event;
    use alloc::rc::Rc;
    use core::cell::Cell;

    fn counting(hits: &Rc<Cell<u32>>) -> Handler<u32> {
        let hits = Rc::clone(hits);
        Handler::new(move |_, _: &mut Event<u32>| hits.set(hits.get() + 1))
    }

    #[test]
    fn first_effective_signal_wins_and_the_rest_are_suppressed() {
        let hits = Rc::new(Cell::new(0));
        let mut latch: ReadyLatch<u32> = ReadyLatch::new();
        latch.watch(1, counting(&hits));

        let watchers = latch.fire(ReadySignal::StateChange { complete: true }).unwrap();
        assert_eq!(watchers.len(), 1);
        assert!(latch.fired());

        // Both remaining signals arrive anyway; neither yields watchers.
        assert!(latch.fire(ReadySignal::ContentLoaded).is_none());
        assert!(latch.fire(ReadySignal::Load).is_none());
    }

    #[test]
    fn incomplete_state_changes_do_not_fire() {
        let mut latch: ReadyLatch<u32> = ReadyLatch::new();
        latch.watch(1, counting(&Rc::new(Cell::new(0))));
        assert!(latch.fire(ReadySignal::StateChange { complete: false }).is_none());
        assert!(!latch.fired());
        assert!(latch.fire(ReadySignal::Load).is_some());
    }

    #[test]
    fn each_watcher_is_handed_back_once_with_its_node() {
        let hits = Rc::new(Cell::new(0));
        let mut latch: ReadyLatch<u32> = ReadyLatch::new();
        latch.watch(1, counting(&hits));
        latch.watch(2, counting(&hits));

        let watchers = latch.fire(ReadySignal::ContentLoaded).unwrap();
        let nodes: alloc::vec::Vec<u32> = watchers.iter().map(|(n, _)| *n).collect();
        assert_eq!(nodes, [1, 2]);
        for (node, handler) in watchers {
            let mut event = Event::new("ready", node);
            handler.invoke(node, &mut event);
        }
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn late_watchers_are_dropped() {
        let hits = Rc::new(Cell::new(0));
        let mut latch: ReadyLatch<u32> = ReadyLatch::new();
        latch.fire(ReadySignal::Load);
        latch.watch(1, counting(&hits));
        assert!(latch.fire(ReadySignal::ContentLoaded).is_none());
        assert_eq!(hits.get(), 0);
    }
}
