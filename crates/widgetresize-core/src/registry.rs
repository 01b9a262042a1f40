//! Widget to resizer mapping.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::element::{Element, ElementId};
use crate::resizer::Resizer;

/// Shared handle to a registered resizer.
pub type ResizerRef = Rc<RefCell<dyn Resizer>>;

/// Resizers keyed by the view element they were attached to.
#[derive(Default)]
pub struct ResizeRegistry {
    resizers: HashMap<ElementId, ResizerRef>,
}

impl ResizeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resizer under its widget.
    ///
    /// An existing entry for the same widget is replaced and returned; it
    /// is not detached.
    pub fn insert(&mut self, resizer: ResizerRef) -> Option<ResizerRef> {
        let widget = resizer.borrow().widget();
        let stale = self.resizers.insert(widget, resizer);
        if stale.is_some() {
            log::warn!("Replacing resizer registered for {}", widget);
        }
        stale
    }

    /// The resizer registered for a widget.
    pub fn get(&self, widget: ElementId) -> Option<ResizerRef> {
        self.resizers.get(&widget).cloned()
    }

    /// The resizer owning a handle element.
    pub fn find_by_handle(&self, element: &Element) -> Option<ResizerRef> {
        self.resizers
            .values()
            .find(|resizer| resizer.borrow().contains_handle(element))
            .cloned()
    }

    /// Drop a widget's entry.
    pub fn remove(&mut self, widget: ElementId) -> Option<ResizerRef> {
        self.resizers.remove(&widget)
    }

    /// Number of registered resizers.
    pub fn len(&self) -> usize {
        self.resizers.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.resizers.is_empty()
    }
}
