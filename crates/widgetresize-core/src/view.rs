//! In-memory render tree for testing and ephemeral use.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use kurbo::Rect;

use crate::element::{ElementId, Handle, new_element_id};
use crate::events::Selection;
use crate::resizer::{ResizeHost, ResizeView};

#[derive(Debug, Clone, Default)]
struct ViewNode {
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    is_widget: bool,
    has_resizer: bool,
}

/// A render tree held in memory.
///
/// Records what the resize machinery writes to it: handles, previews and
/// how often handles were placed.
#[derive(Debug, Default)]
pub struct MemoryView {
    nodes: RefCell<HashMap<ElementId, ViewNode>>,
    hosts: RefCell<HashMap<ElementId, ResizeHost>>,
    handles: RefCell<HashMap<ElementId, Vec<Handle>>>,
    previews: RefCell<HashMap<ElementId, Rect>>,
    placements: Cell<usize>,
}

impl MemoryView {
    /// Create an empty view.
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&self, parent: Option<ElementId>, is_widget: bool, has_resizer: bool) -> ElementId {
        let id = new_element_id();
        let mut nodes = self.nodes.borrow_mut();
        if let Some(parent) = parent {
            if let Some(parent_node) = nodes.get_mut(&parent) {
                parent_node.children.push(id);
            }
        }
        nodes.insert(
            id,
            ViewNode {
                parent,
                children: Vec::new(),
                is_widget,
                has_resizer,
            },
        );
        id
    }

    /// Add a plain element.
    pub fn add_element(&self, parent: Option<ElementId>) -> ElementId {
        self.insert(parent, false, false)
    }

    /// Add a widget that does not carry the resizer marker.
    pub fn add_plain_widget(&self, parent: Option<ElementId>) -> ElementId {
        self.insert(parent, true, false)
    }

    /// Add a resizable widget with its geometry.
    pub fn add_widget(&self, parent: Option<ElementId>, rect: Rect, reference_width: f64) -> ElementId {
        let id = self.insert(parent, true, true);
        self.hosts.borrow_mut().insert(
            id,
            ResizeHost {
                rect,
                reference_width,
            },
        );
        id
    }

    /// Move or resize a widget, as a layout change would.
    pub fn set_rect(&self, widget: ElementId, rect: Rect) {
        if let Some(host) = self.hosts.borrow_mut().get_mut(&widget) {
            host.rect = rect;
        }
    }

    /// Geometry of a resizable widget.
    pub fn resize_host(&self, widget: ElementId) -> Option<ResizeHost> {
        self.hosts.borrow().get(&widget).copied()
    }

    /// Handles as last written for a widget.
    pub fn handles_of(&self, widget: ElementId) -> Vec<Handle> {
        self.handles.borrow().get(&widget).cloned().unwrap_or_default()
    }

    /// Preview currently shown on a widget.
    pub fn preview_of(&self, widget: ElementId) -> Option<Rect> {
        self.previews.borrow().get(&widget).copied()
    }

    /// How many times handles were placed on any widget.
    pub fn placement_count(&self) -> usize {
        self.placements.get()
    }

    /// A selection made of one range per entry, each covering the
    /// listed nodes and everything below them.
    pub fn select(self: &Rc<Self>, ranges: Vec<Vec<ElementId>>) -> MemorySelection {
        MemorySelection {
            view: Rc::clone(self),
            ranges,
        }
    }

    fn children(&self, node: ElementId) -> Vec<ElementId> {
        self.nodes
            .borrow()
            .get(&node)
            .map(|node| node.children.clone())
            .unwrap_or_default()
    }

    fn flags(&self, node: ElementId) -> (bool, bool) {
        self.nodes
            .borrow()
            .get(&node)
            .map(|node| (node.is_widget, node.has_resizer))
            .unwrap_or((false, false))
    }

    fn parent(&self, node: ElementId) -> Option<ElementId> {
        self.nodes.borrow().get(&node).and_then(|node| node.parent)
    }
}

impl ResizeView for MemoryView {
    fn attach_handles(&self, widget: ElementId, handles: &[Handle]) {
        self.handles.borrow_mut().insert(widget, handles.to_vec());
    }

    fn place_handles(&self, widget: ElementId, handles: &[Handle]) {
        self.handles.borrow_mut().insert(widget, handles.to_vec());
        self.placements.set(self.placements.get() + 1);
    }

    fn show_preview(&self, widget: ElementId, preview: Option<Rect>) {
        let mut previews = self.previews.borrow_mut();
        match preview {
            Some(rect) => {
                previews.insert(widget, rect);
            }
            None => {
                previews.remove(&widget);
            }
        }
    }
}

/// A selection over a [`MemoryView`].
pub struct MemorySelection {
    view: Rc<MemoryView>,
    ranges: Vec<Vec<ElementId>>,
}

/// Pre-order walk over the subtrees of a range's nodes.
struct SubtreeWalk<'a> {
    view: &'a MemoryView,
    stack: Vec<ElementId>,
}

impl Iterator for SubtreeWalk<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        let node = self.stack.pop()?;
        self.stack.extend(self.view.children(node).into_iter().rev());
        Some(node)
    }
}

impl Selection for MemorySelection {
    fn ranges(&self) -> Vec<Box<dyn Iterator<Item = ElementId> + '_>> {
        self.ranges
            .iter()
            .map(|roots| {
                Box::new(SubtreeWalk {
                    view: &self.view,
                    stack: roots.iter().rev().copied().collect(),
                }) as Box<dyn Iterator<Item = ElementId> + '_>
            })
            .collect()
    }

    fn is_widget(&self, node: ElementId) -> bool {
        self.view.flags(node).0
    }

    fn has_resizer(&self, node: ElementId) -> bool {
        self.view.flags(node).1
    }

    fn is_inside(&self, node: ElementId, ancestor: ElementId) -> bool {
        let mut current = self.view.parent(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.view.parent(id);
        }
        false
    }
}
