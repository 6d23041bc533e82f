//! In-flight pointer gesture state.

use crate::geometry::{self, HandleKind};
use crate::selection::MarqueeRect;
use crate::shapes::DrawingElement;
use kurbo::{Point, Rect, Vec2};

/// Snapshot taken when a resize starts.
///
/// The target bounds are always derived from `original_bounds` plus the total
/// cursor travel, and every element is remapped from its original copy, so a
/// long drag does not accumulate rounding drift.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeState {
    pub handle: HandleKind,
    /// Logical point where the resize started.
    pub start_point: Point,
    pub original_bounds: Rect,
    /// Selected elements as they were when the resize started.
    pub originals: Vec<DrawingElement>,
    pub moved: bool,
}

impl ResizeState {
    pub fn new(
        handle: HandleKind,
        start_point: Point,
        original_bounds: Rect,
        originals: Vec<DrawingElement>,
    ) -> Self {
        Self {
            handle,
            start_point,
            original_bounds,
            originals,
            moved: false,
        }
    }

    /// Target bounds for the cursor at `current`.
    pub fn target_bounds(&self, current: Point) -> Rect {
        geometry::resized_bounds(self.handle, self.original_bounds, current - self.start_point)
    }

    /// Originals remapped into the bounds implied by `current`.
    pub fn resized_elements(&self, current: Point) -> impl Iterator<Item = DrawingElement> + '_ {
        let target = self.target_bounds(current);
        self.originals.iter().map(move |original| {
            let mut element = original.clone();
            element.rescale(self.original_bounds, target);
            element
        })
    }
}

/// The one gesture in progress. Variants are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    /// A new element is being drawn. It joins the scene on release.
    Drawing { element: DrawingElement },
    /// Panning; `anchor` is the last screen position.
    Panning { anchor: Point },
    /// Dragging the selection; `anchor` is the last logical position.
    /// `originals` restore the selection if the drag is cancelled.
    Dragging {
        anchor: Point,
        originals: Vec<DrawingElement>,
        moved: bool,
    },
    Resizing(ResizeState),
    MarqueeSelecting(MarqueeRect),
    /// Waiting for the text-input surface to submit or cancel.
    EditingText { anchor: Point },
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            GestureState::Idle => "idle",
            GestureState::Drawing { .. } => "drawing",
            GestureState::Panning { .. } => "panning",
            GestureState::Dragging { .. } => "dragging-selection",
            GestureState::Resizing(_) => "resizing-selection",
            GestureState::MarqueeSelecting(_) => "marquee-selecting",
            GestureState::EditingText { .. } => "editing-text",
        }
    }

    /// Element being drawn, if any.
    pub fn in_progress(&self) -> Option<&DrawingElement> {
        match self {
            GestureState::Drawing { element } => Some(element),
            _ => None,
        }
    }

    /// Active marquee rectangle, if any.
    pub fn marquee(&self) -> Option<Rect> {
        match self {
            GestureState::MarqueeSelecting(marquee) => Some(marquee.rect()),
            _ => None,
        }
    }

    /// Pending text anchor, if any.
    pub fn text_anchor(&self) -> Option<Point> {
        match self {
            GestureState::EditingText { anchor } => Some(*anchor),
            _ => None,
        }
    }
}

/// Incremental drag step: the delta from `anchor` to `current`.
pub fn drag_delta(anchor: Point, current: Point) -> Vec2 {
    current - anchor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{ElementKind, ElementStyle};

    #[test]
    fn test_resize_from_originals_does_not_drift() {
        let rect = DrawingElement::two_point(
            ElementKind::Rectangle,
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            ElementStyle::default(),
        );
        let state = ResizeState::new(
            HandleKind::BottomRight,
            Point::new(10.0, 10.0),
            rect.bounds(),
            vec![rect],
        );

        // Many intermediate moves, then the final cursor position.
        for step in 1..50 {
            let _ = state.resized_elements(Point::new(10.0 + step as f64 * 0.37, 10.0)).count();
        }
        let resized: Vec<_> = state.resized_elements(Point::new(30.0, 20.0)).collect();
        assert_eq!(resized[0].points, vec![Point::new(0.0, 0.0), Point::new(30.0, 20.0)]);
    }

    #[test]
    fn test_target_bounds_pins_opposite_corner() {
        let state = ResizeState::new(
            HandleKind::TopLeft,
            Point::new(0.0, 0.0),
            Rect::new(0.0, 0.0, 100.0, 50.0),
            Vec::new(),
        );
        assert_eq!(
            state.target_bounds(Point::new(-10.0, -5.0)),
            Rect::new(-10.0, -5.0, 100.0, 50.0)
        );
    }

    #[test]
    fn test_accessors() {
        let marquee = GestureState::MarqueeSelecting(MarqueeRect::new(Point::new(1.0, 1.0)));
        assert!(marquee.marquee().is_some());
        assert!(marquee.in_progress().is_none());
        assert_eq!(marquee.name(), "marquee-selecting");
        assert!(GestureState::default().is_idle());
        assert_eq!(
            GestureState::EditingText { anchor: Point::new(2.0, 3.0) }.text_anchor(),
            Some(Point::new(2.0, 3.0))
        );
    }
}
