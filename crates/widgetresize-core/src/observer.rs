//! Pointer press/move/release tracking for the single active resize.
//!
//! The observer only decides *which* resizer an event goes to. Calling into
//! the resizer is left to the caller so that no shared state is borrowed
//! while resizer code runs.

use crate::element::Element;
use crate::events::PointerEvent;
use crate::registry::{ResizeRegistry, ResizerRef};
use crate::resizer::is_resize_handle;
use crate::throttle::Throttle;

#[cfg(target_arch = "wasm32")]
use web_time::{Duration, Instant};
#[cfg(not(target_arch = "wasm32"))]
use std::time::{Duration, Instant};

/// Default floor interval between size updates (about 60 per second).
pub const DEFAULT_MOVE_INTERVAL_MS: u64 = 16;

/// A move that is due for the active resizer.
pub type DueMove = (ResizerRef, PointerEvent);

/// Holds the active resizer slot and throttles pointer moves.
pub struct PointerObserver {
    active: Option<ResizerRef>,
    moves: Throttle<PointerEvent>,
}

impl PointerObserver {
    /// Create an observer with no active resizer.
    pub fn new(move_interval: Duration) -> Self {
        Self {
            active: None,
            moves: Throttle::new(move_interval),
        }
    }

    /// The resizer mid-drag, if any.
    pub fn active(&self) -> Option<ResizerRef> {
        self.active.clone()
    }

    /// Handle a press. Returns the resizer to `begin` and the handle pressed.
    pub fn press(
        &mut self,
        event: &PointerEvent,
        registry: &ResizeRegistry,
    ) -> Option<(ResizerRef, Element)> {
        let target = event.target.filter(is_resize_handle)?;
        if self.active.is_some() {
            log::debug!("Ignoring press on {} while a resize is active", target.id);
            return None;
        }
        let Some(resizer) = registry.find_by_handle(&target) else {
            log::trace!("No resizer owns handle {}", target.id);
            return None;
        };

        self.moves.cancel();
        self.active = Some(resizer.clone());
        Some((resizer, target))
    }

    /// Handle a move. Returns a move to apply now, if one is overdue.
    pub fn movement(&mut self, event: &PointerEvent) -> Option<DueMove> {
        let active = self.active.clone()?;
        self.moves
            .call(event.at, *event)
            .map(|due| (active, due))
    }

    /// Release a held move whose window has closed by `now`.
    pub fn poll(&mut self, now: Instant) -> Option<DueMove> {
        let due = self.moves.poll(now)?;
        self.active.clone().map(|active| (active, due))
    }

    /// Handle a release. Returns the resizer to commit along with the last
    /// move still held, which must be applied before committing.
    pub fn release(&mut self) -> Option<(ResizerRef, Option<PointerEvent>)> {
        let pending = self.moves.flush();
        let active = self.active.take()?;
        Some((active, pending))
    }

    /// Forget the active resizer without committing.
    pub fn clear(&mut self) {
        self.moves.cancel();
        self.active = None;
    }

    /// When the held move is due.
    pub fn deadline(&self) -> Option<Instant> {
        self.moves.deadline()
    }
}

impl Default for PointerObserver {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_MOVE_INTERVAL_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Handle, HandlePosition, new_element_id};
    use crate::resizer::{ResizerOptions, Resizer, WidgetResizer};
    use crate::view::MemoryView;
    use kurbo::{Point, Rect};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn registry_with_resizer() -> (ResizeRegistry, Element) {
        let view = Rc::new(MemoryView::new());
        let widget = view.add_widget(None, Rect::new(0.0, 0.0, 100.0, 100.0), 200.0);
        let host_view = Rc::clone(&view);
        let mut resizer = WidgetResizer::new(ResizerOptions::new(
            new_element_id(),
            widget,
            view,
            move || host_view.resize_host(widget).unwrap(),
            |_| {},
        ));
        resizer.attach();
        let handle = resizer.handles()[0].element();

        let mut registry = ResizeRegistry::new();
        registry.insert(Rc::new(RefCell::new(resizer)));
        (registry, handle)
    }

    fn event(target: Option<Element>, at: Instant) -> PointerEvent {
        PointerEvent::new(target, Point::new(1.0, 1.0), at)
    }

    #[test]
    fn test_press_requires_owned_handle() {
        let (registry, handle) = registry_with_resizer();
        let mut observer = PointerObserver::default();
        let now = Instant::now();

        assert!(observer.press(&event(None, now), &registry).is_none());
        assert!(observer.press(&event(Some(Element::other(handle.id)), now), &registry).is_none());
        let stranger = Handle::new(HandlePosition::TopLeft).element();
        assert!(observer.press(&event(Some(stranger), now), &registry).is_none());
        assert!(observer.active().is_none());

        let (_, pressed) = observer.press(&event(Some(handle), now), &registry).unwrap();
        assert_eq!(pressed, handle);
        assert!(observer.active().is_some());
    }

    #[test]
    fn test_second_press_ignored_while_active() {
        let (registry, handle) = registry_with_resizer();
        let mut observer = PointerObserver::default();
        let now = Instant::now();

        assert!(observer.press(&event(Some(handle), now), &registry).is_some());
        assert!(observer.press(&event(Some(handle), now), &registry).is_none());
    }

    #[test]
    fn test_moves_ignored_without_active() {
        let mut observer = PointerObserver::default();
        let now = Instant::now();

        assert!(observer.movement(&event(None, now)).is_none());
        assert!(observer.poll(now + Duration::from_millis(100)).is_none());
        assert!(observer.release().is_none());
    }

    #[test]
    fn test_release_hands_back_last_move() {
        let (registry, handle) = registry_with_resizer();
        let mut observer = PointerObserver::default();
        let t0 = Instant::now();

        observer.press(&event(Some(handle), t0), &registry);
        observer.movement(&PointerEvent::new(None, Point::new(5.0, 5.0), t0));
        observer.movement(&PointerEvent::new(None, Point::new(9.0, 9.0), t0 + Duration::from_millis(4)));

        let (_, last) = observer.release().unwrap();
        assert_eq!(last.map(|e| e.position), Some(Point::new(9.0, 9.0)));
        assert!(observer.active().is_none());
        assert_eq!(observer.deadline(), None);
    }
}
