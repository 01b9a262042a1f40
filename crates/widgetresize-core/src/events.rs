//! Event sources and subscriptions.
//!
//! The host owns an [`EditorEvents`] and emits into it; consumers subscribe
//! and keep the returned [`Subscription`] alive for as long as they listen.
//! Everything here is single-threaded.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Point;

use crate::element::{Element, ElementId};

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Pointer press, move or release on the document-wide surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Element under the pointer, if any.
    pub target: Option<Element>,
    /// Pointer position in viewport coordinates.
    pub position: Point,
    /// When the event was produced.
    pub at: Instant,
}

impl PointerEvent {
    /// Create a pointer event.
    pub fn new(target: Option<Element>, position: Point, at: Instant) -> Self {
        Self {
            target,
            position,
            at,
        }
    }
}

/// Editor UI update or viewport resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEvent {
    pub at: Instant,
}

/// The view layer's current selection.
pub trait Selection {
    /// Ranges in document order, each walking the nodes it visits.
    fn ranges(&self) -> Vec<Box<dyn Iterator<Item = ElementId> + '_>>;

    /// Whether the node is a widget.
    fn is_widget(&self, node: ElementId) -> bool;

    /// Whether the node carries the resizer-bearing marker.
    fn has_resizer(&self, node: ElementId) -> bool;

    /// Whether `node` is a descendant of `ancestor`.
    fn is_inside(&self, node: ElementId, ancestor: ElementId) -> bool;
}

/// Listener ordering within one event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    /// Runs after everything else, e.g. after rendering listeners.
    Low,
    #[default]
    Normal,
    High,
}

type Handler<E> = Rc<RefCell<dyn FnMut(&E)>>;

struct Listener<E: ?Sized> {
    id: u64,
    priority: Priority,
    handler: Handler<E>,
}

struct Listeners<E: ?Sized> {
    next_id: u64,
    entries: Vec<Listener<E>>,
}

/// A single-threaded event source.
pub struct Emitter<E: ?Sized> {
    listeners: Rc<RefCell<Listeners<E>>>,
}

impl<E: ?Sized + 'static> Emitter<E> {
    /// Create an event source with no listeners.
    pub fn new() -> Self {
        Self {
            listeners: Rc::new(RefCell::new(Listeners {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Register a handler. It stays registered until the returned
    /// subscription is dropped or unsubscribed.
    pub fn subscribe<F>(&self, priority: Priority, handler: F) -> Subscription
    where
        F: FnMut(&E) + 'static,
    {
        let handler: Handler<E> = Rc::new(RefCell::new(handler));
        let mut listeners = self.listeners.borrow_mut();
        let id = listeners.next_id;
        listeners.next_id += 1;

        // Higher priorities first, registration order within a priority.
        let index = listeners
            .entries
            .iter()
            .position(|entry| entry.priority < priority)
            .unwrap_or(listeners.entries.len());
        listeners.entries.insert(
            index,
            Listener {
                id,
                priority,
                handler,
            },
        );

        let weak = Rc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = weak.upgrade() {
                listeners.borrow_mut().entries.retain(|entry| entry.id != id);
            }
        })
    }

    /// Deliver an event to every handler.
    ///
    /// Handlers added or removed while emitting take effect on the next emit.
    pub fn emit(&self, event: &E) {
        let handlers: Vec<Handler<E>> = self
            .listeners
            .borrow()
            .entries
            .iter()
            .map(|entry| Rc::clone(&entry.handler))
            .collect();

        for handler in handlers {
            match handler.try_borrow_mut() {
                Ok(mut handler) => (*handler)(event),
                Err(_) => log::warn!("Skipping re-entrant event handler"),
            }
        }
    }

    /// Number of registered handlers.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().entries.len()
    }
}

impl<E: ?Sized + 'static> Default for Emitter<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: ?Sized> Clone for Emitter<E> {
    fn clone(&self) -> Self {
        Self {
            listeners: Rc::clone(&self.listeners),
        }
    }
}

/// A registered handler. Dropping it unsubscribes.
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new(detach: impl FnOnce() + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    /// Unsubscribe now.
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

/// A set of subscriptions released together.
#[derive(Default)]
pub struct Subscriptions {
    items: Vec<Subscription>,
}

impl Subscriptions {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a subscription.
    pub fn add(&mut self, subscription: Subscription) {
        self.items.push(subscription);
    }

    /// Unsubscribe everything. Calling it again is a no-op.
    pub fn release_all(&mut self) {
        for mut subscription in self.items.drain(..) {
            subscription.release();
        }
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The notifications the resize machinery listens to.
#[derive(Clone, Default)]
pub struct EditorEvents {
    pub pointer_down: Emitter<PointerEvent>,
    pub pointer_move: Emitter<PointerEvent>,
    pub pointer_up: Emitter<PointerEvent>,
    pub selection_change: Emitter<dyn Selection>,
    pub ui_update: Emitter<LayoutEvent>,
    pub viewport_resize: Emitter<LayoutEvent>,
}

impl EditorEvents {
    /// Create a set of event sources with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total listeners across all sources.
    pub fn listener_count(&self) -> usize {
        self.pointer_down.listener_count()
            + self.pointer_move.listener_count()
            + self.pointer_up.listener_count()
            + self.selection_change.listener_count()
            + self.ui_update.listener_count()
            + self.viewport_resize.listener_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        let emitter: Emitter<u32> = Emitter::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let l = Rc::clone(&log);
        let _low = emitter.subscribe(Priority::Low, move |v| l.borrow_mut().push(("low", *v)));
        let l = Rc::clone(&log);
        let _first = emitter.subscribe(Priority::Normal, move |v| l.borrow_mut().push(("first", *v)));
        let l = Rc::clone(&log);
        let _high = emitter.subscribe(Priority::High, move |v| l.borrow_mut().push(("high", *v)));
        let l = Rc::clone(&log);
        let _second = emitter.subscribe(Priority::Normal, move |v| l.borrow_mut().push(("second", *v)));

        emitter.emit(&5);
        assert_eq!(
            *log.borrow(),
            vec![("high", 5), ("first", 5), ("second", 5), ("low", 5)]
        );
    }

    #[test]
    fn test_drop_unsubscribes() {
        let emitter: Emitter<u32> = Emitter::new();
        let count = Rc::new(RefCell::new(0));

        let c = Rc::clone(&count);
        let subscription = emitter.subscribe(Priority::Normal, move |_| *c.borrow_mut() += 1);
        emitter.emit(&1);
        drop(subscription);
        emitter.emit(&2);

        assert_eq!(*count.borrow(), 1);
        assert_eq!(emitter.listener_count(), 0);
    }

    #[test]
    fn test_release_all_is_idempotent() {
        let events = EditorEvents::new();
        let mut subscriptions = Subscriptions::new();
        subscriptions.add(events.pointer_down.subscribe(Priority::Normal, |_| {}));
        subscriptions.add(events.ui_update.subscribe(Priority::Normal, |_| {}));
        assert_eq!(events.listener_count(), 2);

        subscriptions.release_all();
        subscriptions.release_all();
        assert!(subscriptions.is_empty());
        assert_eq!(events.listener_count(), 0);
    }

    #[test]
    fn test_subscription_outliving_emitter() {
        let emitter: Emitter<u32> = Emitter::new();
        let subscription = emitter.subscribe(Priority::Normal, |_| {});
        drop(emitter);
        subscription.unsubscribe();
    }
}
