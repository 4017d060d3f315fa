// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The `Delegate` subsystem: registration, removal, manual triggers, and the
//! bubble walk.
//!
//! ## Overview
//!
//! A [`Delegate`] owns one listener registry and one handler-identity
//! counter. It is a cheap-to-clone handle over shared single-threaded state,
//! so callbacks can capture a clone and re-enter registration or removal
//! while a dispatch is running.
//!
//! ## Registration and removal
//!
//! [`Delegate::on`] stores a direct-mode subscription,
//! [`Delegate::on_selector`] a delegated one, and [`Delegate::on_with`] the
//! full form with an optional invocation context. Event specs name one or
//! more whitespace-separated types and the whole-spec
//! [`TRANSITION_END`](crate::types::TRANSITION_END) alias expands to its
//! vendor set. The reserved [`READY`](crate::types::READY) name routes to
//! the one-shot latch instead of the registry.
//!
//! [`Delegate::off_matching`] removes by any combination of exact selector
//! and handler identity; [`Delegate::off`], [`Delegate::off_selector`], and
//! [`Delegate::off_handler`] are the common shorthands. Removal that leaves
//! a `(node, type)` pair empty detaches it (hook fires); removal that
//! matches nothing is a silent no-op.
//!
//! ## Dispatch
//!
//! [`Delegate::trigger`] synthesizes a bubbling, cancelable event and walks
//! it from the target toward the root, running
//! [`dispatcher::run`](crate::dispatcher::run) over the entry snapshot at
//! every hop that has listeners. `stop_propagation` halts the walk between
//! hops; the return value reports whether `prevent_default` was called.
//! External delivery mechanisms with their own propagation can instead call
//! [`Delegate::dispatch`] per node.
//!
//! ## Re-entrancy
//!
//! Dispatch iterates a snapshot: `on`/`off` from inside a callback never
//! corrupts the in-progress walk, and such mutations become visible on the
//! *next* dispatch, not the current one.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::hash::Hash;

use crate::dispatcher;
use crate::ready::{ReadyLatch, ReadySignal};
use crate::registry::{Entry, Registry};
use crate::types::{
    Event, Handler, HandlerId, ListenerHooks, NoHooks, ParentLookup, READY, SelectorScan, Unbind,
    expand_transition_alias, split_event_types,
};

struct State<K, M, H> {
    registry: Registry<K, M>,
    ready: ReadyLatch<K, M>,
    hooks: H,
    next_handler: u64,
}

impl<K: Copy + Eq + Hash, M, H> State<K, M, H> {
    fn assign_id(&mut self, handler: &Handler<K, M>) -> HandlerId {
        handler.ensure_id(|| {
            let id = HandlerId::new(self.next_handler);
            self.next_handler += 1;
            id
        })
    }
}

/// Delegated-event subsystem for one tree of nodes keyed by `K`.
///
/// `M` is the manual-trigger payload type (`()` unless you attach data);
/// `H` is the [`ListenerHooks`] implementation ([`NoHooks`] by default).
/// Cloning shares the underlying registry, identity counter, and ready
/// latch.
///
/// ## Example
///
/// ```rust
/// use std::cell::Cell;
/// use std::convert::Infallible;
/// use std::rc::Rc;
/// use trellis_delegate::delegate::Delegate;
/// use trellis_delegate::types::{Handler, ParentLookup, SelectorScan};
///
/// // Tiny fixed tree: node 2 is a `.item` child of root 1.
/// struct Tiny;
/// impl ParentLookup<u32> for Tiny {
///     fn parent_of(&self, node: &u32) -> Option<u32> {
///         (*node == 2).then_some(1)
///     }
/// }
/// impl SelectorScan<u32> for Tiny {
///     type Error = Infallible;
///     fn matching_descendants(&self, root: u32, selector: &str) -> Result<Vec<u32>, Infallible> {
///         Ok(if root == 1 && selector == ".item" { vec![2] } else { vec![] })
///     }
/// }
///
/// let hub: Delegate<u32> = Delegate::new();
/// let seen = Rc::new(Cell::new(0));
/// let s = seen.clone();
/// let handler: Handler<u32> = Handler::new(move |_, _| s.set(s.get() + 1));
///
/// hub.on_selector(1, "click", ".item", &handler);
/// // A click on the matching child reaches the delegated callback.
/// assert!(hub.trigger(&Tiny, 2, "click").unwrap());
/// assert_eq!(seen.get(), 1);
/// ```
pub struct Delegate<K, M = (), H = NoHooks> {
    state: Rc<RefCell<State<K, M, H>>>,
}

impl<K, M, H> Clone for Delegate<K, M, H> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
        }
    }
}

impl<K, M, H> core::fmt::Debug for Delegate<K, M, H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut s = f.debug_struct("Delegate");
        if let Ok(state) = self.state.try_borrow() {
            s.field("registry", &state.registry)
                .field("ready_fired", &state.ready.fired());
        }
        s.finish_non_exhaustive()
    }
}

impl<K: Copy + Eq + Hash, M> Delegate<K, M> {
    /// Create a subsystem with no hooks.
    pub fn new() -> Self {
        Self::with_hooks(NoHooks)
    }
}

impl<K: Copy + Eq + Hash, M> Default for Delegate<K, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Copy + Eq + Hash, M, H: ListenerHooks<K>> Delegate<K, M, H> {
    /// Create a subsystem that reports attach/detach transitions to `hooks`.
    pub fn with_hooks(hooks: H) -> Self {
        Self {
            state: Rc::new(RefCell::new(State {
                registry: Registry::new(),
                ready: ReadyLatch::new(),
                hooks,
                next_handler: 1,
            })),
        }
    }

    /// Register a direct-mode subscription: the callback fires on every
    /// occurrence of the named types on `node`, no target matching.
    pub fn on(&self, node: K, events: &str, handler: &Handler<K, M>) -> HandlerId {
        self.on_with(node, events, None, None, handler)
    }

    /// Register a delegated subscription: the callback fires only when the
    /// event target is currently a matching descendant of `node`.
    pub fn on_selector(
        &self,
        node: K,
        events: &str,
        selector: &str,
        handler: &Handler<K, M>,
    ) -> HandlerId {
        self.on_with(node, events, Some(selector), None, handler)
    }

    /// Register with the full set of options.
    ///
    /// `events` is one or more whitespace-separated type names; the
    /// operation applies once per name, and an empty spec stores nothing
    /// (the identity is still minted). When the *first* name is
    /// [`READY`](crate::types::READY) the whole call is routed to the ready
    /// latch and nothing enters the registry. `context`, when set, replaces
    /// the registrant node as the receiver passed to the callback.
    ///
    /// Duplicate registrations are legal and all fire, in registration
    /// order. Returns the handler's identity for later removal.
    pub fn on_with(
        &self,
        node: K,
        events: &str,
        selector: Option<&str>,
        context: Option<K>,
        handler: &Handler<K, M>,
    ) -> HandlerId {
        let events = expand_transition_alias(events);
        let mut state = self.state.borrow_mut();
        let id = state.assign_id(handler);

        if split_event_types(events).next() == Some(READY) {
            state.ready.watch(node, handler.clone());
            return id;
        }

        let selector: Option<Rc<str>> = selector.map(Rc::from);
        for event_type in split_event_types(events) {
            let entry = Entry {
                selector: selector.clone(),
                context,
                handler: handler.clone(),
            };
            if state.registry.insert(node, event_type, entry) {
                state.hooks.attached(node, event_type);
            }
        }
        id
    }

    /// Register a readiness callback; shorthand for `on(node, "ready", …)`.
    pub fn on_ready(&self, node: K, handler: &Handler<K, M>) -> HandlerId {
        self.on(node, READY, handler)
    }

    /// Remove every subscription for the named types on `node`.
    pub fn off(&self, node: K, events: &str) {
        self.off_matching(node, events, Unbind::all());
    }

    /// Remove subscriptions registered with exactly this selector.
    pub fn off_selector(&self, node: K, events: &str, selector: &str) {
        self.off_matching(node, events, Unbind::selector(selector));
    }

    /// Remove subscriptions with this handler identity, across selectors.
    pub fn off_handler(&self, node: K, events: &str, handler: HandlerId) {
        self.off_matching(node, events, Unbind::handler(handler));
    }

    /// Remove subscriptions matching `unbind` for the named types on `node`.
    ///
    /// Applies the same spec splitting and alias expansion as registration.
    /// Types whose entry list empties are detached (hook fires); filters
    /// that match nothing, unknown types, and unknown nodes are silent
    /// no-ops.
    pub fn off_matching(&self, node: K, events: &str, unbind: Unbind<'_>) {
        let events = expand_transition_alias(events);
        let mut state = self.state.borrow_mut();
        for event_type in split_event_types(events) {
            if state.registry.remove_where(node, event_type, &unbind) {
                state.hooks.detached(node, event_type);
            }
        }
    }

    /// Remove every subscription on `node` across all event types, firing
    /// detach hooks for each type that had any.
    pub fn clear_node(&self, node: K) {
        let mut state = self.state.borrow_mut();
        let pruned = state.registry.remove_node(node);
        for event_type in &pruned {
            state.hooks.detached(node, event_type);
        }
    }

    /// Raw per-node dispatch: run the matching callbacks registered on
    /// `node` for the event's type.
    ///
    /// This is the entry point an external delivery mechanism calls once per
    /// node it propagates through; [`Self::trigger_event`] drives it
    /// internally. The entry list is snapshotted first, so callbacks may
    /// re-enter `on`/`off` freely; a node or type with no entries is a
    /// graceful no-op. Returns the number of callbacks invoked.
    pub fn dispatch<S: SelectorScan<K>>(
        &self,
        scan: &S,
        node: K,
        event: &mut Event<K, M>,
    ) -> Result<usize, S::Error> {
        let snapshot = self.state.borrow().registry.snapshot(node, &event.event_type);
        let Some(entries) = snapshot else {
            return Ok(0);
        };
        dispatcher::run(&entries, scan, node, event)
    }

    /// Synthesize a bubbling, cancelable event of `event_type` targeted at
    /// `node` and deliver it synchronously.
    ///
    /// Returns `Ok(true)` unless some callback called `prevent_default`.
    pub fn trigger<S>(&self, tree: &S, node: K, event_type: &str) -> Result<bool, S::Error>
    where
        S: ParentLookup<K> + SelectorScan<K>,
    {
        let mut event = Event::new(event_type, node);
        self.trigger_event(tree, &mut event)
    }

    /// Like [`Self::trigger`], with an ordered payload attached to the
    /// event's `data` field for callbacks to read.
    pub fn trigger_with<S>(
        &self,
        tree: &S,
        node: K,
        event_type: &str,
        data: Vec<M>,
    ) -> Result<bool, S::Error>
    where
        S: ParentLookup<K> + SelectorScan<K>,
    {
        let mut event = Event::new(event_type, node);
        event.data = data;
        self.trigger_event(tree, &mut event)
    }

    /// Deliver a caller-built event, starting at its target.
    ///
    /// The walk visits the target and then each ancestor in turn, dispatching
    /// at every hop; it honors the event's flags: non-bubbling events stay on
    /// the target, and `stop_propagation` ends the walk after the current
    /// hop's callbacks finish. Returns `Ok(!default_prevented)` once every
    /// synchronously invoked callback has completed.
    pub fn trigger_event<S>(&self, tree: &S, event: &mut Event<K, M>) -> Result<bool, S::Error>
    where
        S: ParentLookup<K> + SelectorScan<K>,
    {
        let mut hop = Some(event.target);
        while let Some(node) = hop {
            self.dispatch(tree, node, event)?;
            if !event.bubbles() || event.propagation_stopped() {
                break;
            }
            hop = tree.parent_of(&node);
        }
        Ok(!event.default_prevented())
    }

    /// Feed a readiness signal into the latch.
    ///
    /// The first effective signal invokes every pending readiness callback
    /// exactly once, each with a synthesized [`READY`](crate::types::READY)
    /// event targeted at its registration node; all later signals are
    /// ignored.
    pub fn notify_ready(&self, signal: ReadySignal) {
        let fired = self.state.borrow_mut().ready.fire(signal);
        let Some(watchers) = fired else {
            return;
        };
        for (node, handler) in watchers {
            let mut event = Event::new(READY, node);
            handler.invoke(node, &mut event);
        }
    }

    /// Whether the ready latch already fired.
    pub fn ready_fired(&self) -> bool {
        self.state.borrow().ready.fired()
    }

    /// Whether any subscription exists for `(node, event_type)`.
    pub fn has_listeners(&self, node: K, event_type: &str) -> bool {
        self.state.borrow().registry.contains(node, event_type)
    }

    /// Number of subscriptions for `(node, event_type)`.
    pub fn listener_count(&self, node: K, event_type: &str) -> usize {
        self.state.borrow().registry.count(node, event_type)
    }

    /// Whether no subscription exists at all.
    pub fn is_empty(&self) -> bool {
        self.state.borrow().registry.is_empty()
    }
}
