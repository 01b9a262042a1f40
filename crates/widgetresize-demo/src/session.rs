//! Scripted pointer sessions.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, Instant};

use kurbo::{Point, Rect};
use serde::Deserialize;
use thiserror::Error;
use widgetresize_core::{
    ConfigError, EditorEvents, ElementId, HandlePosition, LayoutEvent, MemoryView, PointerEvent,
    ResizeConfig, ResizeHost, ResizeUnit, ResizeValue, ResizerOptions, WidgetResize, new_element_id,
};

/// Session loading errors.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// The widget a session resizes.
#[derive(Debug, Clone, Deserialize)]
pub struct WidgetSpec {
    pub rect: Rect,
    pub container_width: f64,
    #[serde(default)]
    pub centered: bool,
}

/// One scripted input.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    Select,
    Deselect,
    Press { handle: HandlePosition },
    Move { x: f64, y: f64 },
    Release,
    UiUpdate,
    ViewportResize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Step {
    /// Offset from the start of the session.
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub config: ResizeConfig,
    pub widget: WidgetSpec,
    pub steps: Vec<Step>,
}

impl Session {
    /// Parse a session from JSON.
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        let session: Self = serde_json::from_str(json)?;
        session.config.validate()?;
        Ok(session)
    }

    /// Load a session file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}

/// Replay a session and return every committed size.
///
/// Committed sizes are written back to the view the way a document model
/// would, so later redraws follow the new geometry.
pub fn replay(session: &Session) -> Vec<ResizeValue> {
    let events = EditorEvents::new();
    let mut resize = WidgetResize::new(&events, session.config);

    let view = Rc::new(MemoryView::new());
    let widget = view.add_widget(None, session.widget.rect, session.widget.container_width);
    let paragraph = view.add_element(None);
    let commits = Rc::new(RefCell::new(Vec::new()));

    let host_view = Rc::clone(&view);
    let model_view = Rc::clone(&view);
    let sink = Rc::clone(&commits);
    let centered = session.widget.centered;
    let fallback = session.widget.rect;
    let resizer = resize.attach_to(
        ResizerOptions::new(
            new_element_id(),
            widget,
            view.clone(),
            move || {
                host_view.resize_host(widget).unwrap_or(ResizeHost {
                    rect: fallback,
                    reference_width: 0.0,
                })
            },
            move |value: ResizeValue| {
                log::info!("Committed width {}", value);
                apply_width(&model_view, widget, value);
                sink.borrow_mut().push(value);
            },
        )
        .with_centered(move || centered),
    );

    let start = Instant::now();
    let mut pointer = Point::ZERO;
    for step in &session.steps {
        let at = start + Duration::from_millis(step.at_ms);
        resize.tick(at);

        match &step.action {
            Action::Select => events.selection_change.emit(&view.select(vec![vec![widget]])),
            Action::Deselect => events.selection_change.emit(&view.select(vec![vec![paragraph]])),
            Action::Press { handle } => {
                let Some(handle) = resizer.borrow().handle(*handle).copied() else {
                    log::warn!("Widget has no {:?} handle", handle);
                    continue;
                };
                pointer = handle.point;
                events
                    .pointer_down
                    .emit(&PointerEvent::new(Some(handle.element()), pointer, at));
            }
            Action::Move { x, y } => {
                pointer = Point::new(*x, *y);
                events.pointer_move.emit(&PointerEvent::new(None, pointer, at));
            }
            Action::Release => events.pointer_up.emit(&PointerEvent::new(None, pointer, at)),
            Action::UiUpdate => events.ui_update.emit(&LayoutEvent { at }),
            Action::ViewportResize => events.viewport_resize.emit(&LayoutEvent { at }),
        }
    }

    while let Some(deadline) = resize.next_deadline() {
        resize.tick(deadline);
    }
    log::debug!("Handles placed {} times", view.placement_count());
    resize.destroy();

    commits.take()
}

/// Resize the widget in the view to a committed width, keeping its ratio.
fn apply_width(view: &MemoryView, widget: ElementId, value: ResizeValue) {
    let Some(host) = view.resize_host(widget) else {
        return;
    };
    let width = match value.unit {
        ResizeUnit::Percent => value.width / 100.0 * host.reference_width,
        ResizeUnit::Pixels => value.width,
    };
    let ratio = host.rect.width() / host.rect.height().max(0.1);
    let origin = host.rect.origin();
    view.set_rect(widget, Rect::new(origin.x, origin.y, origin.x + width, origin.y + width / ratio));
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRAG: &str = include_str!("../sessions/drag.json");

    #[test]
    fn test_bundled_session_commits_once() {
        let session = Session::from_json(DRAG).unwrap();
        let commits = replay(&session);
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].to_string(), "75%");
    }

    #[test]
    fn test_press_release_without_move_commits_nothing() {
        let json = r#"{
            "widget": { "rect": { "x0": 0.0, "y0": 0.0, "x1": 100.0, "y1": 100.0 }, "container_width": 200.0 },
            "steps": [
                { "at_ms": 0, "kind": "press", "handle": "TopLeft" },
                { "at_ms": 5, "kind": "release" }
            ]
        }"#;
        let session = Session::from_json(json).unwrap();
        assert!(replay(&session).is_empty());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let json = r#"{
            "config": { "redraw_interval_ms": 0 },
            "widget": { "rect": { "x0": 0.0, "y0": 0.0, "x1": 1.0, "y1": 1.0 }, "container_width": 1.0 },
            "steps": []
        }"#;
        assert!(matches!(Session::from_json(json), Err(SessionError::Config(_))));
    }
}
