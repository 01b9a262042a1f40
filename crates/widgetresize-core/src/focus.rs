//! Tracks which resizer belongs to the selected widget.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::element::ElementId;
use crate::events::Selection;
use crate::registry::ResizerRef;
use crate::resizer::Resizer;

/// Find the resizer of the outer-most selected resizable widget.
///
/// Nodes are visited across all ranges in order. A qualifying node equal
/// to or inside the last qualifying node is skipped, so an outer widget
/// wins over widgets nested in it. Widgets with no registered resizer still
/// count as the last qualifying node but leave the current candidate as is.
pub fn resolve_focus(
    selection: &dyn Selection,
    lookup: impl Fn(ElementId) -> Option<ResizerRef>,
) -> Option<ResizerRef> {
    let mut last_marked: Option<ElementId> = None;
    let mut candidate = None;

    for range in selection.ranges() {
        for node in range {
            if !(selection.is_widget(node) && selection.has_resizer(node)) {
                continue;
            }
            if let Some(marked) = last_marked {
                if node == marked || selection.is_inside(node, marked) {
                    continue;
                }
            }

            last_marked = Some(node);
            if let Some(resizer) = lookup(node) {
                candidate = Some(resizer);
            }
        }
    }

    candidate
}

/// Non-owning reference to the focused resizer.
#[derive(Default)]
pub struct FocusTracker {
    focused: Option<Weak<RefCell<dyn Resizer>>>,
}

impl FocusTracker {
    /// Create a tracker with nothing focused.
    pub fn new() -> Self {
        Self::default()
    }

    /// The focused resizer, if it is still alive.
    pub fn focused(&self) -> Option<ResizerRef> {
        self.focused.as_ref().and_then(Weak::upgrade)
    }

    /// Replace the focused resizer.
    pub fn set(&mut self, resizer: Option<&ResizerRef>) {
        self.focused = resizer.map(Rc::downgrade);
    }

    /// Forget the focused resizer if it belongs to `widget`.
    pub fn forget(&mut self, widget: ElementId) {
        let matches = self
            .focused()
            .is_some_and(|resizer| resizer.borrow().widget() == widget);
        if matches {
            self.focused = None;
        }
    }
}
