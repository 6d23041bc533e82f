//! Drawing element model for the sketch surface.

mod style;

pub use style::{ElementStyle, SerializableColor};

use crate::geometry;
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for drawing elements.
pub type ElementId = Uuid;

/// Flattening tolerance used when converting ellipses to paths.
const PATH_TOLERANCE: f64 = 0.1;

/// The kind of a drawing element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Freehand,
    Line,
    Circle,
    Rectangle,
    Text,
}

impl ElementKind {
    /// Number of points a complete element of this kind carries.
    /// `None` means any number (freehand strokes).
    pub fn required_points(self) -> Option<usize> {
        match self {
            ElementKind::Freehand => None,
            ElementKind::Line | ElementKind::Circle | ElementKind::Rectangle => Some(2),
            ElementKind::Text => Some(1),
        }
    }

    /// Whether this kind is drawn from an anchor and a floating second point.
    pub fn is_two_point(self) -> bool {
        self.required_points() == Some(2)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Freehand => "freehand",
            ElementKind::Line => "line",
            ElementKind::Circle => "circle",
            ElementKind::Rectangle => "rectangle",
            ElementKind::Text => "text",
        }
    }
}

/// Literal text payload of a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub content: String,
    pub font_size: f64,
}

/// The atomic unit of drawn content.
///
/// `points` semantics depend on `kind`: freehand keeps every sample, line,
/// circle and rectangle keep two corners, text keeps its top-left anchor.
/// Elements with fewer points than their kind requires are incomplete and are
/// skipped by bounds and rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawingElement {
    pub(crate) id: ElementId,
    pub kind: ElementKind,
    pub points: Vec<Point>,
    pub style: ElementStyle,
    /// Present for text elements only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextContent>,
}

impl DrawingElement {
    /// Start a new element of `kind` at `start`.
    pub fn new(kind: ElementKind, start: Point, style: ElementStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            points: vec![start],
            style,
            text: None,
        }
    }

    /// A freehand stroke from existing samples.
    pub fn freehand(points: Vec<Point>, style: ElementStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: ElementKind::Freehand,
            points,
            style,
            text: None,
        }
    }

    /// A two-point shape (line, circle or rectangle).
    pub fn two_point(kind: ElementKind, a: Point, b: Point, style: ElementStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            points: vec![a, b],
            style,
            text: None,
        }
    }

    /// A text element anchored at its top-left corner.
    pub fn text(
        anchor: Point,
        content: impl Into<String>,
        font_size: f64,
        style: ElementStyle,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: ElementKind::Text,
            points: vec![anchor],
            style,
            text: Some(TextContent {
                content: content.into(),
                font_size,
            }),
        }
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Whether the element has enough points to be measured and drawn.
    pub fn is_complete(&self) -> bool {
        match self.kind.required_points() {
            Some(n) => self.points.len() >= n,
            None => !self.points.is_empty(),
        }
    }

    /// Axis-aligned bounds in logical space.
    pub fn bounds(&self) -> Rect {
        geometry::bounds_of(self)
    }

    /// Record a pointer sample while the element is being drawn.
    ///
    /// Freehand strokes append the sample, two-point shapes move their second
    /// point. `min_distance` drops freehand samples closer than that to the
    /// previous one. Returns whether the element changed.
    pub fn track_pointer(&mut self, point: Point, min_distance: f64) -> bool {
        match self.kind {
            ElementKind::Freehand => {
                if min_distance > 0.0 {
                    if let Some(last) = self.points.last() {
                        if last.distance(point) < min_distance {
                            return false;
                        }
                    }
                }
                self.points.push(point);
                true
            }
            ElementKind::Line | ElementKind::Circle | ElementKind::Rectangle => {
                self.points.truncate(1);
                self.points.push(point);
                true
            }
            ElementKind::Text => false,
        }
    }

    /// Move every point by `delta`.
    pub fn translate(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p += delta;
        }
    }

    /// Remap every point from `from` to `to`.
    ///
    /// An axis whose source extent is zero keeps scale 1 on that axis so no
    /// NaN or infinity reaches the coordinates.
    ///
    /// Only the points move. Freehand and line bounds carry half the stroke
    /// weight as padding that does not scale, so after a resize by factor `s`
    /// their bounds edge sits `pad * (s - 1)` inside the target edge.
    pub fn rescale(&mut self, from: Rect, to: Rect) {
        let (sx, sy) = geometry::scale_factors(from, to);
        for p in &mut self.points {
            *p = Point::new(to.x0 + (p.x - from.x0) * sx, to.y0 + (p.y - from.y0) * sy);
        }
    }

    /// Path for stroke rendering. Text and incomplete elements yield an empty path.
    pub fn to_path(&self) -> BezPath {
        if !self.is_complete() {
            return BezPath::new();
        }
        match self.kind {
            ElementKind::Freehand => {
                let mut path = BezPath::new();
                let mut iter = self.points.iter();
                if let Some(first) = iter.next() {
                    path.move_to(*first);
                    for p in iter {
                        path.line_to(*p);
                    }
                }
                path
            }
            ElementKind::Line => {
                let mut path = BezPath::new();
                path.move_to(self.points[0]);
                path.line_to(self.points[1]);
                path
            }
            ElementKind::Circle => {
                let rect = Rect::from_points(self.points[0], self.points[1]);
                kurbo::Ellipse::from_rect(rect).to_path(PATH_TOLERANCE)
            }
            ElementKind::Rectangle => {
                Rect::from_points(self.points[0], self.points[1]).to_path(PATH_TOLERANCE)
            }
            ElementKind::Text => BezPath::new(),
        }
    }

    /// Text payload, if this is a text element.
    pub fn text_content(&self) -> Option<&TextContent> {
        self.text.as_ref()
    }
}
