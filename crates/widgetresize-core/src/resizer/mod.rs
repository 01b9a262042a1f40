//! Per-widget resize controllers.
//!
//! A [`Resizer`] owns one widget's drag lifecycle:
//! - `begin` captures the baseline when a handle is pressed
//! - `update_size` previews a candidate size while the pointer moves
//! - `commit` hands the final size to the document model
//!
//! [`WidgetResizer`] is the stock implementation; its size computation is
//! delegated to a [`GeometryPolicy`].

mod geometry;
mod widget_resizer;

pub use geometry::{FreeForm, GeometryPolicy, KeepAspectRatio, MIN_SIZE, ResizeBaseline};
pub use widget_resizer::WidgetResizer;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use kurbo::Rect;
use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementId, ElementRole, Handle};
use crate::events::PointerEvent;

/// The drag lifecycle of one resizable widget.
pub trait Resizer {
    /// The view element this resizer is registered under.
    fn widget(&self) -> ElementId;

    /// Whether a drag is in progress.
    fn is_active(&self) -> bool;

    /// Create the handle elements. Only the first call has an effect.
    fn attach(&mut self);

    /// Start a drag from `handle`. Ignored while already active.
    fn begin(&mut self, handle: &Element);

    /// Preview the size for the pointer in `event`. Ignored while inactive.
    fn update_size(&mut self, event: &PointerEvent);

    /// Finish the drag and return the last previewed size, if there is one.
    ///
    /// The returned commit is delivered by the caller once this resizer is
    /// no longer borrowed, so the callback may re-enter the coordinator.
    fn commit(&mut self) -> Option<PendingCommit>;

    /// Reposition handles to match the current geometry.
    fn redraw(&mut self);

    /// Whether `element` is one of this resizer's handles.
    fn contains_handle(&self, element: &Element) -> bool;
}

/// Whether a pointer target is a resize handle at all.
pub fn is_resize_handle(element: &Element) -> bool {
    matches!(element.role, ElementRole::ResizeHandle(_))
}

/// Writer into the view layer, scoped to resize concerns.
pub trait ResizeView {
    /// Create handle elements on a widget.
    fn attach_handles(&self, widget: ElementId, handles: &[Handle]);

    /// Move a widget's handles to their current points.
    fn place_handles(&self, widget: ElementId, handles: &[Handle]);

    /// Show a size preview on a widget, or clear it.
    fn show_preview(&self, widget: ElementId, preview: Option<Rect>);
}

/// Geometry a resize is measured against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeHost {
    /// The resized element's rect, in viewport coordinates.
    pub rect: Rect,
    /// Width of the element's container.
    pub reference_width: f64,
}

/// Unit a committed width is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeUnit {
    /// Percent of the container width.
    #[default]
    Percent,
    /// Absolute pixels.
    Pixels,
}

/// A committed width, e.g. `50%` or `320px`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizeValue {
    pub width: f64,
    pub unit: ResizeUnit,
}

impl ResizeValue {
    /// Express a pixel width in `unit`.
    ///
    /// Percentages need a positive reference width; without one the value
    /// falls back to pixels.
    pub fn from_width(width: f64, unit: ResizeUnit, reference_width: f64) -> Self {
        match unit {
            ResizeUnit::Percent if reference_width > 0.0 => Self {
                width: (width / reference_width * 10_000.0).round() / 100.0,
                unit,
            },
            ResizeUnit::Percent => {
                log::warn!("No reference width for percent resize, using pixels");
                Self::pixels(width)
            }
            ResizeUnit::Pixels => Self::pixels(width),
        }
    }

    fn pixels(width: f64) -> Self {
        Self {
            width: width.round(),
            unit: ResizeUnit::Pixels,
        }
    }
}

impl fmt::Display for ResizeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            ResizeUnit::Percent => write!(f, "{}%", self.width),
            ResizeUnit::Pixels => write!(f, "{}px", self.width),
        }
    }
}

/// Callback receiving committed sizes.
pub type CommitSink = Rc<RefCell<dyn FnMut(ResizeValue)>>;

/// A finished drag whose size has not reached the document model yet.
#[must_use = "a commit does nothing until it is delivered"]
pub struct PendingCommit {
    pub value: ResizeValue,
    sink: CommitSink,
}

impl PendingCommit {
    pub fn new(value: ResizeValue, sink: CommitSink) -> Self {
        Self { value, sink }
    }

    /// Hand the value to the commit callback.
    pub fn deliver(self) {
        match self.sink.try_borrow_mut() {
            Ok(mut on_commit) => (*on_commit)(self.value),
            Err(_) => log::warn!("Dropping commit of {} from inside its own callback", self.value),
        }
    }
}

/// Configuration a [`WidgetResizer`] is created from.
pub struct ResizerOptions {
    /// The element in the document model that stores the size.
    pub model_element: ElementId,
    /// The rendered widget. Doubles as the registry key.
    pub view_element: ElementId,
    /// Writer used for handles and previews.
    pub mutation_scope: Rc<dyn ResizeView>,
    /// Receives the final size, once per completed drag.
    pub on_commit: CommitSink,
    /// Returns the geometry to measure against.
    pub get_resize_host: Box<dyn Fn() -> ResizeHost>,
    /// Whether the widget grows symmetrically about its centre.
    pub is_centered: Box<dyn Fn() -> bool>,
    /// Unit of committed widths; the coordinator's default when unset.
    pub unit: Option<ResizeUnit>,
    /// Candidate size computation.
    pub geometry: Box<dyn GeometryPolicy>,
}

impl ResizerOptions {
    /// Options with an aspect-ratio-keeping, corner-anchored resize.
    pub fn new(
        model_element: ElementId,
        view_element: ElementId,
        mutation_scope: Rc<dyn ResizeView>,
        get_resize_host: impl Fn() -> ResizeHost + 'static,
        on_commit: impl FnMut(ResizeValue) + 'static,
    ) -> Self {
        Self {
            model_element,
            view_element,
            mutation_scope,
            on_commit: Rc::new(RefCell::new(on_commit)),
            get_resize_host: Box::new(get_resize_host),
            is_centered: Box::new(|| false),
            unit: None,
            geometry: Box::new(KeepAspectRatio),
        }
    }

    /// Set the centred-resize predicate.
    pub fn with_centered(mut self, is_centered: impl Fn() -> bool + 'static) -> Self {
        self.is_centered = Box::new(is_centered);
        self
    }

    /// Set the commit unit.
    pub fn with_unit(mut self, unit: ResizeUnit) -> Self {
        self.unit = Some(unit);
        self
    }

    /// Replace the geometry policy.
    pub fn with_geometry(mut self, geometry: impl GeometryPolicy + 'static) -> Self {
        self.geometry = Box::new(geometry);
        self
    }
}
