// Copyright 2026 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for delegated dispatch: handlers and their identity, event
//! contexts, event-spec helpers, removal filters, and the collaborator
//! traits the core consumes.
//!
//! ## Handlers and identity
//!
//! A [`Handler`] is a cheaply clonable, single-threaded callback handle.
//! Clones share one identity cell: the first registration with a
//! [`Delegate`](crate::delegate::Delegate) assigns a [`HandlerId`] from that
//! instance's counter, and every clone observes it. That is what makes "the
//! same callback" recognizable for removal no matter how many times, on how
//! many nodes, or with which contexts it was registered.
//!
//! ```rust
//! use trellis_delegate::types::{Event, Handler};
//!
//! let handler: Handler<u32> = Handler::new(|receiver, event| {
//!     assert_eq!(receiver, 7);
//!     assert_eq!(event.event_type, "click");
//! });
//! // Identity is assigned by a `Delegate` on first registration.
//! assert_eq!(handler.id(), None);
//!
//! let mut event = Event::new("click", 7);
//! handler.invoke(7, &mut event);
//! ```
//!
//! ## Collaborator traits
//!
//! The core never walks a tree or parses a selector itself. Hosts supply:
//!
//! - [`ParentLookup`] — ancestry, used by the bubble walk in
//!   [`Delegate::trigger_event`](crate::delegate::Delegate::trigger_event);
//! - [`SelectorScan`] — the selector-matching primitive, re-queried on every
//!   dispatch; its error type is propagated unwrapped;
//! - [`ListenerHooks`] — attach/detach notifications mirroring registry
//!   state, for hosts with native listener machinery ([`NoHooks`] otherwise).

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

/// Reserved event-type name for one-shot readiness callbacks.
///
/// Registrations for this name bypass the listener registry entirely; see
/// [`crate::ready`].
pub const READY: &str = "ready";

/// Event-type alias expanded to [`TRANSITION_END_EVENTS`] at registration
/// and removal.
pub const TRANSITION_END: &str = "transitionend";

/// The concrete event types the [`TRANSITION_END`] alias stands for.
pub const TRANSITION_END_EVENTS: [&str; 4] = [
    "transitionend",
    "webkitTransitionEnd",
    "oTransitionend",
    "MSTransitionEnd",
];

pub(crate) const TRANSITION_END_SPEC: &str =
    "transitionend webkitTransitionEnd oTransitionend MSTransitionEnd";

/// Split an event spec into individual type names.
///
/// Any amount of whitespace separates names; an empty or blank spec yields
/// nothing, which turns registration and removal into no-ops.
pub fn split_event_types(spec: &str) -> impl Iterator<Item = &str> {
    spec.split_whitespace()
}

/// Expand the transition alias. Only the exact, whole spec is expanded.
pub(crate) fn expand_transition_alias(spec: &str) -> &str {
    if spec == TRANSITION_END {
        TRANSITION_END_SPEC
    } else {
        spec
    }
}

/// Identity tag assigned to a [`Handler`] on first registration.
///
/// Ids are minted per [`Delegate`](crate::delegate::Delegate) instance from
/// a monotonically increasing counter and are never reused.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HandlerId(u64);

impl HandlerId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

struct HandlerInner<F: ?Sized> {
    id: Cell<Option<HandlerId>>,
    func: RefCell<F>,
}

/// A clonable callback handle invoked with a receiver node and a mutable
/// event context.
///
/// Clones share the underlying callback and identity cell. The handle is
/// single-threaded (`Rc`-backed), matching the cooperative dispatch model.
///
/// # Panics
///
/// A handler that transitively invokes *itself* (for example by triggering
/// the very event it is currently handling) panics on the interior borrow.
/// Re-entrant registration and removal through a
/// [`Delegate`](crate::delegate::Delegate) are fine; recursive
/// self-invocation is not.
pub struct Handler<K, M = ()> {
    inner: Rc<HandlerInner<dyn FnMut(K, &mut Event<K, M>)>>,
}

impl<K, M> Handler<K, M> {
    /// Wrap a callback.
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut(K, &mut Event<K, M>) + 'static,
    {
        Self {
            inner: Rc::new(HandlerInner {
                id: Cell::new(None),
                func: RefCell::new(f),
            }),
        }
    }

    /// The identity assigned on first registration, if any.
    pub fn id(&self) -> Option<HandlerId> {
        self.inner.id.get()
    }

    /// Return the existing identity or assign a freshly minted one.
    pub(crate) fn ensure_id(&self, mint: impl FnOnce() -> HandlerId) -> HandlerId {
        match self.inner.id.get() {
            Some(id) => id,
            None => {
                let id = mint();
                self.inner.id.set(Some(id));
                id
            }
        }
    }

    /// Invoke the callback with `receiver` and the event context.
    pub fn invoke(&self, receiver: K, event: &mut Event<K, M>) {
        (self.inner.func.borrow_mut())(receiver, event);
    }
}

impl<K, M> Clone for Handler<K, M> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<K, M> core::fmt::Debug for Handler<K, M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Handler")
            .field("id", &self.id())
            .finish_non_exhaustive()
    }
}

bitflags::bitflags! {
    /// Event-context flags: construction-time properties and the two
    /// mutators callbacks may flip.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct EventFlags: u8 {
        /// The event propagates from the target toward the root.
        const BUBBLES             = 0b0000_0001;
        /// `prevent_default` is honored.
        const CANCELABLE          = 0b0000_0010;
        /// Set by `stop_propagation`; stops the bubble walk between nodes.
        const PROPAGATION_STOPPED = 0b0000_0100;
        /// Set by `prevent_default` on a cancelable event.
        const DEFAULT_PREVENTED   = 0b0000_1000;
    }
}

impl Default for EventFlags {
    fn default() -> Self {
        Self::BUBBLES | Self::CANCELABLE
    }
}

/// Event context handed to every invoked callback.
///
/// `K` is the node key type; `M` is the manual-trigger payload carried in
/// [`data`](Self::data) (empty unless the trigger attached one).
///
/// The flag mutators only record intent on the context. The delegation
/// dispatcher ignores them — every matching entry at a node runs — while the
/// bubble walk in [`Delegate::trigger_event`](crate::delegate::Delegate::trigger_event)
/// honors [`stop_propagation`](Self::stop_propagation) between nodes and
/// reports [`prevent_default`](Self::prevent_default) through its return
/// value.
#[derive(Debug)]
pub struct Event<K, M = ()> {
    /// Event-type name, e.g. `"click"`.
    pub event_type: String,
    /// The node the event originated at.
    pub target: K,
    /// Ordered payload attached by a manual trigger.
    pub data: Vec<M>,
    flags: EventFlags,
}

impl<K, M> Event<K, M> {
    /// A bubbling, cancelable event targeted at `target` — the shape manual
    /// triggers synthesize.
    pub fn new(event_type: impl Into<String>, target: K) -> Self {
        Self::with_flags(event_type, target, EventFlags::default())
    }

    /// An event with explicit flags.
    pub fn with_flags(event_type: impl Into<String>, target: K, flags: EventFlags) -> Self {
        Self {
            event_type: event_type.into(),
            target,
            data: Vec::new(),
            flags,
        }
    }

    /// Whether the event bubbles toward the root.
    pub fn bubbles(&self) -> bool {
        self.flags.contains(EventFlags::BUBBLES)
    }

    /// Whether `prevent_default` is honored.
    pub fn cancelable(&self) -> bool {
        self.flags.contains(EventFlags::CANCELABLE)
    }

    /// Stop the bubble walk after the current node finishes dispatching.
    pub fn stop_propagation(&mut self) {
        self.flags.insert(EventFlags::PROPAGATION_STOPPED);
    }

    /// Whether propagation was stopped.
    pub fn propagation_stopped(&self) -> bool {
        self.flags.contains(EventFlags::PROPAGATION_STOPPED)
    }

    /// Mark the default action as prevented. No-op on non-cancelable events.
    pub fn prevent_default(&mut self) {
        if self.cancelable() {
            self.flags.insert(EventFlags::DEFAULT_PREVENTED);
        }
    }

    /// Whether the default action was prevented.
    pub fn default_prevented(&self) -> bool {
        self.flags.contains(EventFlags::DEFAULT_PREVENTED)
    }
}

/// Removal filter for [`Delegate::off_matching`](crate::delegate::Delegate::off_matching).
///
/// An entry is removed when it satisfies **both** present filters. An absent
/// filter matches every entry; an absent selector filter in particular also
/// matches direct-mode entries, while a present one requires an exact string
/// match (so it never matches a direct-mode entry).
#[derive(Clone, Copy, Debug, Default)]
pub struct Unbind<'a> {
    /// Exact selector string to match, if any.
    pub selector: Option<&'a str>,
    /// Handler identity to match, if any.
    pub handler: Option<HandlerId>,
}

impl<'a> Unbind<'a> {
    /// Match every entry.
    pub const fn all() -> Self {
        Self {
            selector: None,
            handler: None,
        }
    }

    /// Match entries registered with exactly this selector.
    pub const fn selector(selector: &'a str) -> Self {
        Self {
            selector: Some(selector),
            handler: None,
        }
    }

    /// Match entries registered with this handler identity.
    pub const fn handler(handler: HandlerId) -> Self {
        Self {
            selector: None,
            handler: Some(handler),
        }
    }

    /// Additionally require this handler identity.
    pub const fn and_handler(mut self, handler: HandlerId) -> Self {
        self.handler = Some(handler);
        self
    }
}

/// Ancestry lookup for the bubble walk.
pub trait ParentLookup<K> {
    /// Parent of `node`, or `None` at a root.
    fn parent_of(&self, node: &K) -> Option<K>;
}

/// The selector-matching primitive the dispatcher consumes.
///
/// Implementations answer "which descendants of `root` currently match
/// `selector`?". The dispatcher re-queries on every dispatch — results must
/// reflect the tree as it is now, not as it was at registration — and tests
/// the event target for membership by equality. Errors (for example from an
/// unparsable selector) are propagated to the trigger call unwrapped.
pub trait SelectorScan<K> {
    /// Error surfaced by the underlying selector engine.
    type Error;

    /// Descendants of `root` matching `selector`, excluding `root` itself.
    fn matching_descendants(&self, root: K, selector: &str) -> Result<Vec<K>, Self::Error>;
}

/// Notifications mirroring registry attach/detach state.
///
/// [`attached`](Self::attached) fires when the first entry for a
/// `(node, event type)` pair is stored, [`detached`](Self::detached) when the
/// last one is removed — exactly once each per transition, no matter how many
/// callbacks subscribe in between. Hosts with native listener machinery
/// install or remove their raw listener here; hosts without use [`NoHooks`].
///
/// Hooks run while the registry is locked and must not call back into the
/// owning [`Delegate`](crate::delegate::Delegate).
pub trait ListenerHooks<K> {
    /// The first entry for `(node, event_type)` was stored.
    fn attached(&mut self, _node: K, _event_type: &str) {}

    /// The last entry for `(node, event_type)` was removed.
    fn detached(&mut self, _node: K, _event_type: &str) {}
}

/// Hook implementation that does nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoHooks;

impl<K> ListenerHooks<K> for NoHooks {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn alias_constants_agree() {
        let split: Vec<&str> = split_event_types(TRANSITION_END_SPEC).collect();
        assert_eq!(split, TRANSITION_END_EVENTS);
        assert_eq!(expand_transition_alias(TRANSITION_END), TRANSITION_END_SPEC);
    }

    #[test]
    fn alias_expands_only_as_the_whole_spec() {
        assert_eq!(
            expand_transition_alias("transitionend click"),
            "transitionend click"
        );
        assert_eq!(expand_transition_alias("click"), "click");
    }

    #[test]
    fn blank_specs_split_to_nothing() {
        assert_eq!(split_event_types("").count(), 0);
        assert_eq!(split_event_types("   ").count(), 0);
        let types: Vec<&str> = split_event_types(" click   keyup ").collect();
        assert_eq!(types, ["click", "keyup"]);
    }

    #[test]
    fn handler_clones_share_identity() {
        let handler: Handler<u32> = Handler::new(|_, _| {});
        let clone = handler.clone();
        assert_eq!(handler.id(), None);

        let id = handler.ensure_id(|| HandlerId::new(1));
        assert_eq!(clone.id(), Some(id));
        // A second registration reuses the identity instead of minting.
        let again = clone.ensure_id(|| HandlerId::new(2));
        assert_eq!(again, id);
    }

    #[test]
    fn distinct_handlers_over_the_same_closure_shape_are_distinct() {
        let a: Handler<u32> = Handler::new(|_, _| {});
        let b: Handler<u32> = Handler::new(|_, _| {});
        a.ensure_id(|| HandlerId::new(1));
        b.ensure_id(|| HandlerId::new(2));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn prevent_default_requires_cancelable() {
        let mut cancelable: Event<u32> = Event::new("submit", 1);
        cancelable.prevent_default();
        assert!(cancelable.default_prevented());

        let mut plain: Event<u32> =
            Event::with_flags("scroll", 1, EventFlags::BUBBLES);
        plain.prevent_default();
        assert!(!plain.default_prevented());
    }

    #[test]
    fn stop_propagation_is_sticky() {
        let mut event: Event<u32> = Event::new("click", 1);
        assert!(!event.propagation_stopped());
        event.stop_propagation();
        assert!(event.propagation_stopped());
        assert!(event.bubbles());
    }

    #[test]
    fn unbind_builders_compose() {
        let id = HandlerId::new(3);
        let both = Unbind::selector(".item").and_handler(id);
        assert_eq!(both.selector, Some(".item"));
        assert_eq!(both.handler, Some(id));
        assert!(Unbind::all().selector.is_none());
        assert!(Unbind::handler(id).selector.is_none());
    }
}
