//! Element identities and resize handle definitions.

use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of an element in the render tree or document model.
pub type ElementId = Uuid;

/// Create a fresh element identity.
pub fn new_element_id() -> ElementId {
    Uuid::new_v4()
}

/// Which corner of a widget a resize handle sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandlePosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl HandlePosition {
    /// All corners, in the order handles are created.
    pub const ALL: [HandlePosition; 4] = [
        HandlePosition::TopLeft,
        HandlePosition::TopRight,
        HandlePosition::BottomLeft,
        HandlePosition::BottomRight,
    ];

    /// Whether dragging this handle moves the left edge.
    pub fn is_left(self) -> bool {
        matches!(self, Self::TopLeft | Self::BottomLeft)
    }

    /// Whether dragging this handle moves the top edge.
    pub fn is_top(self) -> bool {
        matches!(self, Self::TopLeft | Self::TopRight)
    }

    /// The point of `rect` this handle is anchored to.
    pub fn anchor(self, rect: Rect) -> Point {
        match self {
            Self::TopLeft => Point::new(rect.x0, rect.y0),
            Self::TopRight => Point::new(rect.x1, rect.y0),
            Self::BottomLeft => Point::new(rect.x0, rect.y1),
            Self::BottomRight => Point::new(rect.x1, rect.y1),
        }
    }

    /// The corner diagonally across from this one.
    pub fn opposite(self) -> Self {
        match self {
            Self::TopLeft => Self::BottomRight,
            Self::TopRight => Self::BottomLeft,
            Self::BottomLeft => Self::TopRight,
            Self::BottomRight => Self::TopLeft,
        }
    }
}

/// What part an element plays for the resize machinery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementRole {
    /// A drag handle on a widget corner.
    ResizeHandle(HandlePosition),
    /// Anything else a pointer can land on.
    Other,
}

/// A pointer event target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Element {
    pub id: ElementId,
    pub role: ElementRole,
}

impl Element {
    /// An element that is not a resize handle.
    pub fn other(id: ElementId) -> Self {
        Self {
            id,
            role: ElementRole::Other,
        }
    }

    /// The handle position, if this element is a resize handle.
    pub fn handle_position(&self) -> Option<HandlePosition> {
        match self.role {
            ElementRole::ResizeHandle(position) => Some(position),
            ElementRole::Other => None,
        }
    }
}

/// A resize handle element attached to a widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Element identity of the handle.
    pub id: ElementId,
    /// Corner the handle controls.
    pub position: HandlePosition,
    /// Where the handle is drawn, in viewport coordinates.
    pub point: Point,
}

impl Handle {
    /// Create a new handle with a fresh identity.
    pub fn new(position: HandlePosition) -> Self {
        Self {
            id: new_element_id(),
            position,
            point: Point::ZERO,
        }
    }

    /// The pointer target this handle presents.
    pub fn element(&self) -> Element {
        Element {
            id: self.id,
            role: ElementRole::ResizeHandle(self.position),
        }
    }

    /// Move the handle onto its corner of `rect`.
    pub fn place(&mut self, rect: Rect) {
        self.point = self.position.anchor(rect);
    }
}
