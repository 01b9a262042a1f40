//! The stock resizer, configured by [`ResizerOptions`].

use std::rc::Rc;

use kurbo::Rect;

use super::{PendingCommit, ResizeBaseline, ResizeValue, Resizer, ResizerOptions};
use crate::element::{Element, ElementId, Handle, HandlePosition};
use crate::events::PointerEvent;

/// State of a drag in progress.
#[derive(Debug, Clone)]
struct Drag {
    /// Handle the drag started from.
    handle: ElementId,
    baseline: ResizeBaseline,
    /// Last candidate shown, if the pointer has moved.
    preview: Option<Rect>,
}

/// Resizer for one widget with four corner handles.
pub struct WidgetResizer {
    options: ResizerOptions,
    handles: Vec<Handle>,
    drag: Option<Drag>,
}

impl WidgetResizer {
    /// Create a resizer. Handles are created by [`Resizer::attach`].
    pub fn new(options: ResizerOptions) -> Self {
        Self {
            options,
            handles: Vec::new(),
            drag: None,
        }
    }

    /// The model element the committed size is written to.
    pub fn model_element(&self) -> ElementId {
        self.options.model_element
    }

    /// The handles, empty until attached.
    pub fn handles(&self) -> &[Handle] {
        &self.handles
    }

    /// The handle drawn at `position`.
    pub fn handle(&self, position: HandlePosition) -> Option<&Handle> {
        self.handles.iter().find(|handle| handle.position == position)
    }

    /// The candidate currently previewed.
    pub fn preview(&self) -> Option<Rect> {
        self.drag.as_ref().and_then(|drag| drag.preview)
    }

    /// Id of the handle that started the current drag.
    pub fn dragged_handle(&self) -> Option<ElementId> {
        self.drag.as_ref().map(|drag| drag.handle)
    }

    fn place_handles(&mut self, rect: Rect) {
        for handle in &mut self.handles {
            handle.place(rect);
        }
        self.options
            .mutation_scope
            .place_handles(self.options.view_element, &self.handles);
    }
}

impl Resizer for WidgetResizer {
    fn widget(&self) -> ElementId {
        self.options.view_element
    }

    fn is_active(&self) -> bool {
        self.drag.is_some()
    }

    fn attach(&mut self) {
        if !self.handles.is_empty() {
            return;
        }

        let rect = (self.options.get_resize_host)().rect;
        self.handles = HandlePosition::ALL
            .into_iter()
            .map(|position| {
                let mut handle = Handle::new(position);
                handle.place(rect);
                handle
            })
            .collect();
        self.options
            .mutation_scope
            .attach_handles(self.options.view_element, &self.handles);
    }

    fn begin(&mut self, handle: &Element) {
        if self.drag.is_some() {
            log::warn!("Resize already in progress on {}", self.options.view_element);
            return;
        }
        let Some(own) = self.handles.iter().find(|own| own.id == handle.id) else {
            log::warn!("Handle {} does not belong to {}", handle.id, self.options.view_element);
            return;
        };

        let host = (self.options.get_resize_host)();
        self.drag = Some(Drag {
            handle: own.id,
            baseline: ResizeBaseline {
                handle: own.position,
                rect: host.rect,
                reference_width: host.reference_width,
            },
            preview: None,
        });
        log::debug!("Resize started on {} from {:?}", self.options.view_element, own.position);
    }

    fn update_size(&mut self, event: &PointerEvent) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };

        let centered = (self.options.is_centered)();
        let candidate = self
            .options
            .geometry
            .propose(&drag.baseline, event.position, centered);
        drag.preview = Some(candidate);

        self.options
            .mutation_scope
            .show_preview(self.options.view_element, Some(candidate));
        self.place_handles(candidate);
    }

    fn commit(&mut self) -> Option<PendingCommit> {
        let drag = self.drag.take()?;
        let Some(preview) = drag.preview else {
            log::debug!("Resize on {} ended without movement", self.options.view_element);
            return None;
        };

        let value = ResizeValue::from_width(
            preview.width(),
            self.options.unit.unwrap_or_default(),
            drag.baseline.reference_width,
        );
        self.options
            .mutation_scope
            .show_preview(self.options.view_element, None);
        log::debug!("Committing {} for {}", value, self.options.model_element);
        Some(PendingCommit::new(value, Rc::clone(&self.options.on_commit)))
    }

    fn redraw(&mut self) {
        if self.handles.is_empty() {
            return;
        }
        let rect = match self.preview() {
            Some(preview) => preview,
            None => (self.options.get_resize_host)().rect,
        };
        self.place_handles(rect);
    }

    fn contains_handle(&self, element: &Element) -> bool {
        self.handles.iter().any(|handle| handle.id == element.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::new_element_id;
    use crate::resizer::{FreeForm, ResizeHost, ResizeUnit};
    use crate::view::MemoryView;
    use kurbo::Point;
    use std::cell::RefCell;
    use std::time::Instant;

    struct Fixture {
        view: Rc<MemoryView>,
        widget: ElementId,
        commits: Rc<RefCell<Vec<ResizeValue>>>,
    }

    fn fixture() -> Fixture {
        let view = Rc::new(MemoryView::new());
        let widget = view.add_widget(None, Rect::new(0.0, 0.0, 200.0, 100.0), 400.0);
        Fixture {
            view,
            widget,
            commits: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn resizer(fixture: &Fixture) -> WidgetResizer {
        let view = Rc::clone(&fixture.view);
        let widget = fixture.widget;
        let commits = Rc::clone(&fixture.commits);
        let mut resizer = WidgetResizer::new(ResizerOptions::new(
            new_element_id(),
            widget,
            fixture.view.clone(),
            move || view.resize_host(widget).unwrap_or(ResizeHost {
                rect: Rect::ZERO,
                reference_width: 0.0,
            }),
            move |value| commits.borrow_mut().push(value),
        ));
        resizer.attach();
        resizer
    }

    fn finish(resizer: &mut WidgetResizer) {
        if let Some(commit) = resizer.commit() {
            commit.deliver();
        }
    }

    fn pointer_at(x: f64, y: f64) -> PointerEvent {
        PointerEvent::new(None, Point::new(x, y), Instant::now())
    }

    #[test]
    fn test_attach_creates_corner_handles_once() {
        let fixture = fixture();
        let mut resizer = resizer(&fixture);
        let ids: Vec<_> = resizer.handles().iter().map(|h| h.id).collect();

        resizer.attach();
        assert_eq!(resizer.handles().len(), 4);
        assert_eq!(resizer.handles().iter().map(|h| h.id).collect::<Vec<_>>(), ids);
        assert_eq!(fixture.view.handles_of(fixture.widget).len(), 4);

        let bottom_right = resizer.handle(HandlePosition::BottomRight).unwrap();
        assert_eq!(bottom_right.point, Point::new(200.0, 100.0));
        assert!(resizer.contains_handle(&bottom_right.element()));
        assert!(!resizer.contains_handle(&Element::other(new_element_id())));
    }

    #[test]
    fn test_drag_commits_last_preview() {
        let fixture = fixture();
        let mut resizer = resizer(&fixture);
        let handle = resizer.handle(HandlePosition::BottomRight).unwrap().element();

        resizer.begin(&handle);
        assert!(resizer.is_active());
        assert_eq!(resizer.dragged_handle(), Some(handle.id));

        resizer.update_size(&pointer_at(260.0, 100.0));
        resizer.update_size(&pointer_at(300.0, 100.0));
        assert_eq!(resizer.preview(), Some(Rect::new(0.0, 0.0, 300.0, 150.0)));
        assert_eq!(fixture.view.preview_of(fixture.widget), Some(Rect::new(0.0, 0.0, 300.0, 150.0)));

        finish(&mut resizer);
        assert!(!resizer.is_active());
        assert_eq!(fixture.commits.borrow().len(), 1);
        assert_eq!(fixture.commits.borrow()[0].to_string(), "75%");
        assert_eq!(fixture.view.preview_of(fixture.widget), None);
    }

    #[test]
    fn test_commit_without_movement_is_silent() {
        let fixture = fixture();
        let mut resizer = resizer(&fixture);
        let handle = resizer.handle(HandlePosition::TopLeft).unwrap().element();

        resizer.begin(&handle);
        assert!(resizer.commit().is_none());
        assert!(!resizer.is_active());
        assert!(fixture.commits.borrow().is_empty());

        assert!(resizer.commit().is_none());
        assert!(fixture.commits.borrow().is_empty());
    }

    #[test]
    fn test_begin_while_active_keeps_baseline() {
        let fixture = fixture();
        let mut resizer = resizer(&fixture);
        let first = resizer.handle(HandlePosition::BottomRight).unwrap().element();
        let second = resizer.handle(HandlePosition::TopLeft).unwrap().element();

        resizer.begin(&first);
        resizer.begin(&second);
        assert_eq!(resizer.dragged_handle(), Some(first.id));
    }

    #[test]
    fn test_foreign_handle_does_not_begin() {
        let fixture = fixture();
        let mut resizer = resizer(&fixture);
        let stranger = Handle::new(HandlePosition::BottomRight).element();

        resizer.begin(&stranger);
        assert!(!resizer.is_active());
        resizer.update_size(&pointer_at(10.0, 10.0));
        assert_eq!(resizer.preview(), None);
    }

    #[test]
    fn test_redraw_follows_host_without_touching_size() {
        let fixture = fixture();
        let mut resizer = resizer(&fixture);

        fixture.view.set_rect(fixture.widget, Rect::new(10.0, 10.0, 110.0, 60.0));
        resizer.redraw();
        let top_left = resizer.handle(HandlePosition::TopLeft).unwrap();
        assert_eq!(top_left.point, Point::new(10.0, 10.0));
        assert_eq!(resizer.preview(), None);
        assert!(fixture.commits.borrow().is_empty());
    }

    #[test]
    fn test_pixels_free_form() {
        let fixture = fixture();
        let view = Rc::clone(&fixture.view);
        let widget = fixture.widget;
        let commits = Rc::clone(&fixture.commits);
        let mut resizer = WidgetResizer::new(
            ResizerOptions::new(
                new_element_id(),
                widget,
                fixture.view.clone(),
                move || view.resize_host(widget).unwrap_or(ResizeHost {
                    rect: Rect::ZERO,
                    reference_width: 0.0,
                }),
                move |value| commits.borrow_mut().push(value),
            )
            .with_unit(ResizeUnit::Pixels)
            .with_geometry(FreeForm)
            .with_centered(|| true),
        );
        resizer.attach();
        let handle = resizer.handle(HandlePosition::BottomRight).unwrap().element();

        resizer.begin(&handle);
        resizer.update_size(&pointer_at(210.0, 120.0));
        assert_eq!(resizer.preview(), Some(Rect::new(-10.0, -20.0, 210.0, 120.0)));
        let commit = resizer.commit().unwrap();
        assert_eq!(commit.value.to_string(), "220px");
        assert!(fixture.commits.borrow().is_empty());
        commit.deliver();
        assert_eq!(fixture.commits.borrow()[0].to_string(), "220px");
    }
}
