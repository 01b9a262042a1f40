//! The resize coordinator: registry, pointer observer, focus tracking and
//! redraw scheduling behind one set of subscriptions.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::ResizeConfig;
use crate::element::ElementId;
use crate::events::{EditorEvents, LayoutEvent, PointerEvent, Priority, Selection, Subscriptions};
use crate::focus::{FocusTracker, resolve_focus};
use crate::observer::PointerObserver;
use crate::redraw::RedrawScheduler;
use crate::registry::{ResizeRegistry, ResizerRef};
use crate::resizer::{Resizer, ResizerOptions, WidgetResizer};

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Shared state touched by every handler.
struct ResizeState {
    config: ResizeConfig,
    registry: ResizeRegistry,
    observer: PointerObserver,
    focus: FocusTracker,
    redraw: RedrawScheduler,
}

type SharedState = Rc<RefCell<ResizeState>>;

/// Coordinates pointer-driven resizing of the widgets attached to it.
///
/// All subscriptions are acquired in [`WidgetResize::new`] and released by
/// [`WidgetResize::destroy`] (or on drop). The host drives throttle windows
/// by calling [`WidgetResize::tick`] from its frame loop.
pub struct WidgetResize {
    state: SharedState,
    subscriptions: Subscriptions,
}

impl WidgetResize {
    /// Create a coordinator listening to `events`.
    pub fn new(events: &EditorEvents, config: ResizeConfig) -> Self {
        let state = Rc::new(RefCell::new(ResizeState {
            config,
            registry: ResizeRegistry::new(),
            observer: PointerObserver::new(config.move_interval()),
            focus: FocusTracker::new(),
            redraw: RedrawScheduler::new(config.redraw_interval()),
        }));

        let mut subscriptions = Subscriptions::new();

        let s = Rc::clone(&state);
        subscriptions.add(events.pointer_down.subscribe(Priority::Normal, move |event| {
            on_pointer_down(&s, event);
        }));
        let s = Rc::clone(&state);
        subscriptions.add(events.pointer_move.subscribe(Priority::Normal, move |event| {
            on_pointer_move(&s, event);
        }));
        let s = Rc::clone(&state);
        subscriptions.add(events.pointer_up.subscribe(Priority::Normal, move |_| {
            on_pointer_up(&s);
        }));
        // Runs after rendering so widget classification is already applied.
        let s = Rc::clone(&state);
        subscriptions.add(events.selection_change.subscribe(Priority::Low, move |selection| {
            on_selection_change(&s, selection);
        }));
        let s = Rc::clone(&state);
        subscriptions.add(events.ui_update.subscribe(Priority::Normal, move |event: &LayoutEvent| {
            let due = s.borrow_mut().redraw.ui_update(event.at);
            if due {
                redraw_focused(&s);
            }
        }));
        let s = Rc::clone(&state);
        subscriptions.add(events.viewport_resize.subscribe(Priority::Normal, move |event: &LayoutEvent| {
            let due = s.borrow_mut().redraw.viewport_resize(event.at);
            if due {
                redraw_focused(&s);
            }
        }));

        log::debug!("Widget resize listening with {:?}", config);
        Self {
            state,
            subscriptions,
        }
    }

    /// Create a [`WidgetResizer`] from `options`, attach its handles and
    /// register it under `options.view_element`.
    ///
    /// Attaching the same widget twice replaces the registry entry; the
    /// replaced resizer is left as is.
    pub fn attach_to(&self, mut options: ResizerOptions) -> Rc<RefCell<WidgetResizer>> {
        let default_unit = self.state.borrow().config.unit;
        options.unit.get_or_insert(default_unit);

        let resizer = Rc::new(RefCell::new(WidgetResizer::new(options)));
        resizer.borrow_mut().attach();
        self.register(resizer.clone());
        resizer
    }

    /// Register a resizer built elsewhere. It must already be attached.
    pub fn register(&self, resizer: ResizerRef) {
        let widget = resizer.borrow().widget();
        self.state.borrow_mut().registry.insert(resizer);
        log::debug!("Registered resizer for {}", widget);
    }

    /// Remove a widget's resizer, clearing any slot that points at it.
    ///
    /// A drag in progress on it is abandoned without committing.
    pub fn detach(&self, widget: ElementId) -> Option<ResizerRef> {
        let mut state = self.state.borrow_mut();
        let removed = state.registry.remove(widget)?;
        if state
            .observer
            .active()
            .is_some_and(|active| Rc::ptr_eq(&active, &removed))
        {
            state.observer.clear();
        }
        state.focus.forget(widget);
        log::debug!("Detached resizer for {}", widget);
        Some(removed)
    }

    /// The resizer registered for a widget.
    pub fn resizer_for(&self, widget: ElementId) -> Option<ResizerRef> {
        self.state.borrow().registry.get(widget)
    }

    /// Number of registered resizers.
    pub fn resizer_count(&self) -> usize {
        self.state.borrow().registry.len()
    }

    /// The resizer mid-drag, if any.
    pub fn active_resizer(&self) -> Option<ResizerRef> {
        self.state.borrow().observer.active()
    }

    /// The resizer of the selected outer-most widget, if any.
    pub fn focused_resizer(&self) -> Option<ResizerRef> {
        self.state.borrow().focus.focused()
    }

    /// Fire throttle windows that have closed by `now`. Does nothing once
    /// destroyed.
    pub fn tick(&self, now: Instant) {
        if self.subscriptions.is_empty() {
            return;
        }
        let (due_move, due_redraw) = {
            let mut state = self.state.borrow_mut();
            (state.observer.poll(now), state.redraw.poll(now))
        };

        if let Some((resizer, event)) = due_move {
            resizer.borrow_mut().update_size(&event);
        }
        if due_redraw {
            redraw_focused(&self.state);
        }
    }

    /// When [`WidgetResize::tick`] next has work to do.
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.subscriptions.is_empty() {
            return None;
        }
        let state = self.state.borrow();
        match (state.observer.deadline(), state.redraw.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Stop listening to every event source and drop any drag in progress
    /// without committing it. Safe to call more than once.
    pub fn destroy(&mut self) {
        if self.subscriptions.is_empty() {
            return;
        }
        self.subscriptions.release_all();
        let mut state = self.state.borrow_mut();
        state.observer.clear();
        state.redraw.cancel();
        log::debug!("Widget resize destroyed");
    }
}

fn on_pointer_down(state: &SharedState, event: &PointerEvent) {
    let begin = {
        let mut state = state.borrow_mut();
        let ResizeState {
            observer, registry, ..
        } = &mut *state;
        observer.press(event, registry)
    };

    if let Some((resizer, handle)) = begin {
        resizer.borrow_mut().begin(&handle);
    }
}

fn on_pointer_move(state: &SharedState, event: &PointerEvent) {
    let due = state.borrow_mut().observer.movement(event);
    if let Some((resizer, event)) = due {
        resizer.borrow_mut().update_size(&event);
    }
}

fn on_pointer_up(state: &SharedState) {
    let released = state.borrow_mut().observer.release();
    let Some((resizer, last_move)) = released else {
        return;
    };

    let commit = {
        let mut resizer = resizer.borrow_mut();
        if let Some(event) = last_move {
            resizer.update_size(&event);
        }
        resizer.commit()
    };
    // The callback writes to the document model, which may notify us again.
    if let Some(commit) = commit {
        commit.deliver();
    }
}

fn on_selection_change(state: &SharedState, selection: &dyn Selection) {
    let focused = {
        let state = state.borrow();
        resolve_focus(selection, |widget| state.registry.get(widget))
    };

    if let Some(resizer) = &focused {
        redraw(resizer);
    }
    state.borrow_mut().focus.set(focused.as_ref());
}

fn redraw_focused(state: &SharedState) {
    let focused = state.borrow().focus.focused();
    if let Some(resizer) = focused {
        redraw(&resizer);
    }
}

fn redraw(resizer: &ResizerRef) {
    match resizer.try_borrow_mut() {
        Ok(mut resizer) => resizer.redraw(),
        Err(_) => log::debug!("Skipping redraw of a busy resizer"),
    }
}
