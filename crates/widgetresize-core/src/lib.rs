//! Widget Resize Core
//!
//! Turns pointer press/move/release events into committed size changes on
//! resizable editor widgets, one widget at a time, and keeps the handles of
//! the selected widget in place as the layout changes.

pub mod config;
pub mod coordinator;
pub mod element;
pub mod events;
pub mod focus;
pub mod observer;
pub mod redraw;
pub mod registry;
pub mod resizer;
pub mod throttle;
pub mod view;

pub use config::{ConfigError, ConfigResult, ResizeConfig};
pub use coordinator::WidgetResize;
pub use element::{Element, ElementId, ElementRole, Handle, HandlePosition, new_element_id};
pub use events::{EditorEvents, Emitter, LayoutEvent, PointerEvent, Priority, Selection, Subscription, Subscriptions};
pub use registry::{ResizeRegistry, ResizerRef};
pub use resizer::{
    CommitSink, FreeForm, GeometryPolicy, KeepAspectRatio, PendingCommit, ResizeHost, ResizeUnit, ResizeValue,
    ResizeView, Resizer, ResizerOptions, WidgetResizer, is_resize_handle,
};
pub use throttle::Throttle;
pub use view::{MemorySelection, MemoryView};
