//! Bounds, intersection and resize-handle geometry.
//!
//! Everything here is pure. Bounds are `kurbo::Rect` values in logical space
//! with `x0 <= x1` and `y0 <= y1` unless a function says otherwise.

use crate::shapes::{DrawingElement, ElementKind};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Resize handle grab radius in screen pixels.
pub const HANDLE_HIT_TOLERANCE: f64 = 8.0;
/// Estimated glyph advance as a fraction of the font size.
pub const TEXT_WIDTH_FACTOR: f64 = 0.6;
/// Estimated line height as a fraction of the font size.
pub const TEXT_HEIGHT_FACTOR: f64 = 1.2;
/// Text bounds are never narrower than this.
pub const TEXT_MIN_WIDTH: f64 = 20.0;
/// Font size assumed for a text element without a payload.
pub const FALLBACK_FONT_SIZE: f64 = 16.0;

/// One of the eight resize handles around a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Top,
    Bottom,
    Left,
    Right,
}

impl HandleKind {
    /// Hit-test order: corners win over edges when tolerances overlap.
    pub const ALL: [HandleKind; 8] = [
        HandleKind::TopLeft,
        HandleKind::TopRight,
        HandleKind::BottomLeft,
        HandleKind::BottomRight,
        HandleKind::Top,
        HandleKind::Bottom,
        HandleKind::Left,
        HandleKind::Right,
    ];

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            HandleKind::TopLeft
                | HandleKind::TopRight
                | HandleKind::BottomLeft
                | HandleKind::BottomRight
        )
    }

    pub fn moves_left(self) -> bool {
        matches!(self, HandleKind::TopLeft | HandleKind::BottomLeft | HandleKind::Left)
    }

    pub fn moves_right(self) -> bool {
        matches!(self, HandleKind::TopRight | HandleKind::BottomRight | HandleKind::Right)
    }

    pub fn moves_top(self) -> bool {
        matches!(self, HandleKind::TopLeft | HandleKind::TopRight | HandleKind::Top)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(self, HandleKind::BottomLeft | HandleKind::BottomRight | HandleKind::Bottom)
    }

    /// Compass name (`nw`, `n`, ...), as used for resize cursors.
    pub fn as_str(self) -> &'static str {
        match self {
            HandleKind::TopLeft => "nw",
            HandleKind::TopRight => "ne",
            HandleKind::BottomLeft => "sw",
            HandleKind::BottomRight => "se",
            HandleKind::Top => "n",
            HandleKind::Bottom => "s",
            HandleKind::Left => "w",
            HandleKind::Right => "e",
        }
    }

    /// Position of this handle on `bounds`.
    pub fn position(self, bounds: Rect) -> Point {
        let center = bounds.center();
        match self {
            HandleKind::TopLeft => Point::new(bounds.x0, bounds.y0),
            HandleKind::TopRight => Point::new(bounds.x1, bounds.y0),
            HandleKind::BottomLeft => Point::new(bounds.x0, bounds.y1),
            HandleKind::BottomRight => Point::new(bounds.x1, bounds.y1),
            HandleKind::Top => Point::new(center.x, bounds.y0),
            HandleKind::Bottom => Point::new(center.x, bounds.y1),
            HandleKind::Left => Point::new(bounds.x0, center.y),
            HandleKind::Right => Point::new(bounds.x1, center.y),
        }
    }
}

/// Bounds of a single element.
///
/// Freehand strokes and lines are padded by half the stroke weight. Circles and
/// rectangles use their two corner points. Text is estimated from the string
/// length and font size since no glyph metrics are available here. Incomplete
/// elements yield a zero-area rect at their first point (or the origin).
pub fn bounds_of(element: &DrawingElement) -> Rect {
    if !element.is_complete() {
        return element
            .points
            .first()
            .map(|p| Rect::from_points(*p, *p))
            .unwrap_or(Rect::ZERO);
    }

    match element.kind {
        ElementKind::Freehand => {
            padded_extent(&element.points, element.style.stroke_weight / 2.0)
        }
        ElementKind::Line => padded_extent(&element.points[..2], element.style.stroke_weight / 2.0),
        ElementKind::Circle | ElementKind::Rectangle => {
            Rect::from_points(element.points[0], element.points[1])
        }
        ElementKind::Text => {
            let anchor = element.points[0];
            let (chars, font_size) = element
                .text
                .as_ref()
                .map(|t| (t.content.chars().count(), t.font_size))
                .unwrap_or((0, FALLBACK_FONT_SIZE));
            let width = (chars as f64 * font_size * TEXT_WIDTH_FACTOR).max(TEXT_MIN_WIDTH);
            let height = font_size * TEXT_HEIGHT_FACTOR;
            Rect::new(anchor.x, anchor.y, anchor.x + width, anchor.y + height)
        }
    }
}

fn padded_extent(points: &[Point], pad: f64) -> Rect {
    let mut iter = points.iter();
    let Some(first) = iter.next() else {
        return Rect::ZERO;
    };
    let extent = iter.fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p));
    extent.inflate(pad, pad)
}

/// Union of the bounds of `elements`. Empty input gives a zero rect at the origin.
pub fn combined_bounds<'a, I>(elements: I) -> Rect
where
    I: IntoIterator<Item = &'a DrawingElement>,
{
    elements
        .into_iter()
        .map(bounds_of)
        .reduce(|acc, b| acc.union(b))
        .unwrap_or(Rect::ZERO)
}

/// Closed-interval containment on both axes.
pub fn point_in_bounds(point: Point, bounds: Rect) -> bool {
    point.x >= bounds.x0 && point.x <= bounds.x1 && point.y >= bounds.y0 && point.y <= bounds.y1
}

/// Separating-axis test. Touching edges count as intersecting.
pub fn rects_intersect(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

/// Logical-space grab radius for a screen-space tolerance at `zoom`.
pub fn handle_tolerance(zoom: f64, screen_tolerance: f64) -> f64 {
    screen_tolerance / zoom
}

/// Find the resize handle of `bounds` under `point` using the default
/// screen tolerance.
pub fn resize_handle_at(point: Point, bounds: Rect, zoom: f64) -> Option<HandleKind> {
    resize_handle_at_with_tolerance(point, bounds, zoom, HANDLE_HIT_TOLERANCE)
}

/// Find the resize handle of `bounds` under `point`.
///
/// The grab radius is `screen_tolerance / zoom` so handles keep a constant
/// on-screen size. Corners are checked before edges.
pub fn resize_handle_at_with_tolerance(
    point: Point,
    bounds: Rect,
    zoom: f64,
    screen_tolerance: f64,
) -> Option<HandleKind> {
    let tolerance = handle_tolerance(zoom, screen_tolerance);
    HandleKind::ALL
        .into_iter()
        .find(|handle| handle.position(bounds).distance(point) <= tolerance)
}

/// Target bounds after dragging `handle` of `original` by `delta`.
///
/// Edges the handle does not control stay pinned. The result is not
/// normalized: dragging an edge past its opposite edge yields a negative
/// extent, which mirrors the content when used with [`scale_factors`].
pub fn resized_bounds(handle: HandleKind, original: Rect, delta: Vec2) -> Rect {
    let mut target = original;
    if handle.moves_left() {
        target.x0 += delta.x;
    }
    if handle.moves_right() {
        target.x1 += delta.x;
    }
    if handle.moves_top() {
        target.y0 += delta.y;
    }
    if handle.moves_bottom() {
        target.y1 += delta.y;
    }
    target
}

/// Per-axis scale mapping `from` onto `to`.
///
/// A zero-extent source axis has no meaningful scale; it keeps 1.
pub fn scale_factors(from: Rect, to: Rect) -> (f64, f64) {
    let axis = |from_len: f64, to_len: f64| {
        if from_len.abs() < f64::EPSILON {
            1.0
        } else {
            to_len / from_len
        }
    };
    (
        axis(from.x1 - from.x0, to.x1 - to.x0),
        axis(from.y1 - from.y0, to.y1 - to.y0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{ElementStyle, SerializableColor};

    fn style(weight: f64) -> ElementStyle {
        ElementStyle::new(SerializableColor::black(), weight)
    }

    fn rect_element(a: (f64, f64), b: (f64, f64)) -> DrawingElement {
        DrawingElement::two_point(
            ElementKind::Rectangle,
            Point::new(a.0, a.1),
            Point::new(b.0, b.1),
            style(2.0),
        )
    }

    #[test]
    fn test_freehand_bounds_padded_by_half_stroke() {
        let stroke = DrawingElement::freehand(
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)],
            style(4.0),
        );
        assert_eq!(bounds_of(&stroke), Rect::new(-2.0, -2.0, 12.0, 12.0));
        let b = bounds_of(&stroke);
        assert!((b.width() - 14.0).abs() < f64::EPSILON);
        assert!((b.height() - 14.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_freehand_is_zero() {
        let stroke = DrawingElement::freehand(Vec::new(), style(4.0));
        assert_eq!(bounds_of(&stroke), Rect::ZERO);
    }

    #[test]
    fn test_line_bounds_padded() {
        let line = DrawingElement::two_point(
            ElementKind::Line,
            Point::new(10.0, 10.0),
            Point::new(0.0, 0.0),
            style(2.0),
        );
        assert_eq!(bounds_of(&line), Rect::new(-1.0, -1.0, 11.0, 11.0));
    }

    #[test]
    fn test_rectangle_and_circle_unpadded() {
        let rect = rect_element((100.0, 50.0), (0.0, 0.0));
        assert_eq!(bounds_of(&rect), Rect::new(0.0, 0.0, 100.0, 50.0));

        let circle = DrawingElement::two_point(
            ElementKind::Circle,
            Point::new(0.0, 0.0),
            Point::new(40.0, 20.0),
            style(8.0),
        );
        assert_eq!(bounds_of(&circle), Rect::new(0.0, 0.0, 40.0, 20.0));
    }

    #[test]
    fn test_text_bounds_estimate() {
        let text = DrawingElement::text(Point::new(10.0, 20.0), "abcd", 10.0, style(1.0));
        let b = bounds_of(&text);
        assert!((b.x0 - 10.0).abs() < 1e-9);
        assert!((b.width() - 24.0).abs() < 1e-9);
        assert!((b.height() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_text_uses_min_width() {
        let text = DrawingElement::text(Point::ZERO, "a", 10.0, style(1.0));
        assert!((bounds_of(&text).width() - TEXT_MIN_WIDTH).abs() < 1e-9);
    }

    #[test]
    fn test_incomplete_shape_is_degenerate() {
        let rect = DrawingElement::new(ElementKind::Rectangle, Point::new(3.0, 4.0), style(2.0));
        let b = bounds_of(&rect);
        assert_eq!(b.area(), 0.0);
        assert_eq!(b.origin(), Point::new(3.0, 4.0));
    }

    #[test]
    fn test_bounds_idempotent() {
        let stroke =
            DrawingElement::freehand(vec![Point::new(1.0, 2.0), Point::new(-3.0, 7.5)], style(3.0));
        assert_eq!(bounds_of(&stroke), bounds_of(&stroke));
    }

    #[test]
    fn test_combined_bounds_contains_members() {
        let elements = vec![
            rect_element((0.0, 0.0), (10.0, 10.0)),
            rect_element((50.0, -20.0), (60.0, 5.0)),
            DrawingElement::text(Point::new(-30.0, 40.0), "hi", 16.0, style(1.0)),
        ];
        let combined = combined_bounds(&elements);
        for e in &elements {
            let b = bounds_of(e);
            assert_eq!(combined.union(b), combined);
        }
    }

    #[test]
    fn test_combined_bounds_empty() {
        assert_eq!(combined_bounds(&Vec::<DrawingElement>::new()), Rect::ZERO);
    }

    #[test]
    fn test_point_in_bounds_closed() {
        let b = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(point_in_bounds(Point::new(10.0, 10.0), b));
        assert!(point_in_bounds(Point::new(0.0, 5.0), b));
        assert!(!point_in_bounds(Point::new(10.01, 5.0), b));
    }

    #[test]
    fn test_rects_touching_intersect() {
        let marquee = Rect::new(0.0, 0.0, 50.0, 50.0);
        let touching = Rect::new(50.0, 0.0, 60.0, 10.0);
        let apart = Rect::new(50.5, 0.0, 60.0, 10.0);
        assert!(rects_intersect(marquee, touching));
        assert!(!rects_intersect(marquee, apart));
    }

    #[test]
    fn test_handle_tolerance_scales_inverse_to_zoom() {
        let at_low = handle_tolerance(0.2, HANDLE_HIT_TOLERANCE);
        let at_high = handle_tolerance(4.0, HANDLE_HIT_TOLERANCE);
        assert!((at_low * 0.2 - HANDLE_HIT_TOLERANCE).abs() < 1e-9);
        assert!((at_high * 4.0 - HANDLE_HIT_TOLERANCE).abs() < 1e-9);
    }

    #[test]
    fn test_handle_grab_is_zoom_invariant_on_screen() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        for zoom in [0.2, 1.0, 4.0] {
            // 7 screen pixels off the corner always hits, 9 never does.
            let near = Point::new(100.0 + 7.0 / zoom, 100.0);
            let far = Point::new(100.0 + 9.0 / zoom, 100.0);
            assert_eq!(resize_handle_at(near, bounds, zoom), Some(HandleKind::BottomRight));
            assert_eq!(resize_handle_at(far, bounds, zoom), None);
        }
    }

    #[test]
    fn test_corner_wins_over_edge() {
        // Tiny box: every handle overlaps at zoom 1.
        let bounds = Rect::new(0.0, 0.0, 4.0, 4.0);
        assert_eq!(resize_handle_at(Point::new(2.0, 0.0), bounds, 1.0), Some(HandleKind::TopLeft));
    }

    #[test]
    fn test_edge_handle_hit() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 60.0);
        assert_eq!(resize_handle_at(Point::new(50.0, 61.0), bounds, 1.0), Some(HandleKind::Bottom));
        assert_eq!(resize_handle_at(Point::new(-2.0, 30.0), bounds, 1.0), Some(HandleKind::Left));
        assert_eq!(resize_handle_at(Point::new(50.0, 30.0), bounds, 1.0), None);
    }

    #[test]
    fn test_resized_bounds_pins_opposite_edges() {
        let original = Rect::new(0.0, 0.0, 100.0, 50.0);
        let r = resized_bounds(HandleKind::BottomRight, original, Vec2::new(20.0, 10.0));
        assert_eq!(r, Rect::new(0.0, 0.0, 120.0, 60.0));
        let r = resized_bounds(HandleKind::Left, original, Vec2::new(10.0, 99.0));
        assert_eq!(r, Rect::new(10.0, 0.0, 100.0, 50.0));
        let r = resized_bounds(HandleKind::Top, original, Vec2::new(5.0, -5.0));
        assert_eq!(r, Rect::new(0.0, -5.0, 100.0, 50.0));
    }

    #[test]
    fn test_scale_factors_guard_zero() {
        let (sx, sy) =
            scale_factors(Rect::new(0.0, 0.0, 0.0, 10.0), Rect::new(0.0, 0.0, 30.0, 5.0));
        assert_eq!(sx, 1.0);
        assert!((sy - 0.5).abs() < f64::EPSILON);
    }
}
