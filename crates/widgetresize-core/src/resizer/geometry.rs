//! Candidate size computation for a drag in progress.

use kurbo::{Point, Rect, Size};

use crate::element::HandlePosition;

/// Smallest width or height a resize can produce.
pub const MIN_SIZE: f64 = 1.0;

/// Geometry captured when a drag begins. Every candidate is computed
/// from this, never from a previous candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeBaseline {
    /// The handle being dragged.
    pub handle: HandlePosition,
    /// Host rect at the start of the drag.
    pub rect: Rect,
    /// Width of the container that percentages are relative to.
    pub reference_width: f64,
}

impl ResizeBaseline {
    /// Width over height of the starting rect.
    pub fn aspect_ratio(&self) -> f64 {
        self.rect.width() / self.rect.height().max(0.1)
    }

    /// Where the dragged handle started.
    pub fn origin(&self) -> Point {
        self.handle.anchor(self.rect)
    }

    /// Signed growth along x for a pointer at `pointer`.
    fn grow_x(&self, pointer: Point, centered: bool) -> f64 {
        let dx = pointer.x - self.origin().x;
        let dx = if self.handle.is_left() { -dx } else { dx };
        if centered { dx * 2.0 } else { dx }
    }

    /// Signed growth along y for a pointer at `pointer`.
    fn grow_y(&self, pointer: Point, centered: bool) -> f64 {
        let dy = pointer.y - self.origin().y;
        let dy = if self.handle.is_top() { -dy } else { dy };
        if centered { dy * 2.0 } else { dy }
    }

    /// Lay out a rect of `size` the way the drag is anchored: about the
    /// centre, or pinned to the corner opposite the handle.
    pub fn place(&self, size: Size, centered: bool) -> Rect {
        if centered {
            return Rect::from_center_size(self.rect.center(), size);
        }

        let fixed = self.handle.opposite().anchor(self.rect);
        let x0 = if self.handle.is_left() { fixed.x - size.width } else { fixed.x };
        let y0 = if self.handle.is_top() { fixed.y - size.height } else { fixed.y };
        Rect::new(x0, y0, x0 + size.width, y0 + size.height)
    }
}

/// Computes the live candidate rect for a pointer position.
///
/// Implementations must be pure functions of their inputs.
pub trait GeometryPolicy {
    /// Candidate rect for `pointer`, measured from the drag's baseline.
    fn propose(&self, baseline: &ResizeBaseline, pointer: Point, centered: bool) -> Rect;
}

/// Width follows the pointer, height follows the starting aspect ratio.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepAspectRatio;

impl GeometryPolicy for KeepAspectRatio {
    fn propose(&self, baseline: &ResizeBaseline, pointer: Point, centered: bool) -> Rect {
        let width = (baseline.rect.width() + baseline.grow_x(pointer, centered)).max(MIN_SIZE);
        let height = (width / baseline.aspect_ratio()).max(MIN_SIZE);
        baseline.place(Size::new(width, height), centered)
    }
}

/// Both axes follow the pointer independently.
#[derive(Debug, Clone, Copy, Default)]
pub struct FreeForm;

impl GeometryPolicy for FreeForm {
    fn propose(&self, baseline: &ResizeBaseline, pointer: Point, centered: bool) -> Rect {
        let width = (baseline.rect.width() + baseline.grow_x(pointer, centered)).max(MIN_SIZE);
        let height = (baseline.rect.height() + baseline.grow_y(pointer, centered)).max(MIN_SIZE);
        baseline.place(Size::new(width, height), centered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn baseline(handle: HandlePosition) -> ResizeBaseline {
        ResizeBaseline {
            handle,
            rect: Rect::new(100.0, 100.0, 300.0, 200.0),
            reference_width: 400.0,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_keep_aspect_ratio_bottom_right() {
        let base = baseline(HandlePosition::BottomRight);
        let rect = KeepAspectRatio.propose(&base, Point::new(350.0, 400.0), false);

        assert!(approx(rect.width(), 250.0));
        assert!(approx(rect.height(), 125.0));
        assert!(approx(rect.x0, 100.0));
        assert!(approx(rect.y0, 100.0));
    }

    #[test]
    fn test_left_handle_pins_right_edge() {
        let base = baseline(HandlePosition::TopLeft);
        let rect = KeepAspectRatio.propose(&base, Point::new(150.0, 100.0), false);

        assert!(approx(rect.width(), 150.0));
        assert!(approx(rect.x1, 300.0));
        assert!(approx(rect.y1, 200.0));
    }

    #[test]
    fn test_centered_grows_both_sides() {
        let base = baseline(HandlePosition::BottomRight);
        let rect = KeepAspectRatio.propose(&base, Point::new(320.0, 200.0), true);

        assert!(approx(rect.width(), 240.0));
        assert!(approx(rect.center().x, 200.0));
        assert!(approx(rect.center().y, 150.0));
    }

    #[test]
    fn test_free_form_and_minimum() {
        let base = baseline(HandlePosition::BottomRight);
        let rect = FreeForm.propose(&base, Point::new(320.0, 150.0), false);
        assert!(approx(rect.width(), 220.0));
        assert!(approx(rect.height(), 50.0));

        let collapsed = FreeForm.propose(&base, Point::new(-500.0, -500.0), false);
        assert!(approx(collapsed.width(), MIN_SIZE));
        assert!(approx(collapsed.height(), MIN_SIZE));
    }

    #[test]
    fn test_repeated_proposals_do_not_accumulate() {
        let base = baseline(HandlePosition::BottomRight);
        let pointer = Point::new(340.0, 260.0);
        let first = KeepAspectRatio.propose(&base, pointer, false);
        for _ in 0..10 {
            KeepAspectRatio.propose(&base, Point::new(500.0, 500.0), false);
        }
        assert_eq!(KeepAspectRatio.propose(&base, pointer, false), first);
    }
}
