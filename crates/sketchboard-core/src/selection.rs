//! Selection membership, marquee and hover feedback.

use crate::geometry::{self, HandleKind};
use crate::scene::Scene;
use crate::shapes::ElementId;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// Handle size in screen pixels.
pub const HANDLE_SIZE: f64 = 8.0;

/// Selected element IDs, in the order they were selected.
///
/// Selection is view state: it never enters history and its combined bounds
/// are always recomputed from the scene, never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<ElementId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.ids.contains(&id)
    }

    /// Replace the selection with a single element.
    pub fn select_only(&mut self, id: ElementId) {
        self.ids.clear();
        self.ids.push(id);
    }

    /// Replace the selection with `ids`, dropping duplicates.
    pub fn set(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        self.ids.clear();
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop IDs that no longer exist in `scene`. Returns whether anything was dropped.
    pub fn retain_existing(&mut self, scene: &Scene) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| scene.contains(*id));
        before != self.ids.len()
    }

    /// Combined bounds of the selected elements, or `None` when nothing is selected.
    pub fn bounds(&self, scene: &Scene) -> Option<Rect> {
        if self.ids.is_empty() {
            return None;
        }
        let mut members = scene.select(&self.ids).peekable();
        members.peek()?;
        Some(geometry::combined_bounds(members))
    }
}

/// Rubber-band rectangle dragged out in logical space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarqueeRect {
    pub start: Point,
    pub current: Point,
}

impl MarqueeRect {
    pub fn new(start: Point) -> Self {
        Self {
            start,
            current: start,
        }
    }

    /// Normalized rectangle spanned by the two corners.
    pub fn rect(&self) -> Rect {
        Rect::from_points(self.start, self.current)
    }
}

/// What the pointer is over relative to the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoverTarget {
    Handle(HandleKind),
    Inside,
    Outside,
}

impl HoverTarget {
    /// Classify `point` against selection `bounds`. Handles take priority.
    pub fn classify(point: Point, bounds: Rect, zoom: f64, screen_tolerance: f64) -> Self {
        if let Some(handle) =
            geometry::resize_handle_at_with_tolerance(point, bounds, zoom, screen_tolerance)
        {
            HoverTarget::Handle(handle)
        } else if geometry::point_in_bounds(point, bounds) {
            HoverTarget::Inside
        } else {
            HoverTarget::Outside
        }
    }
}

/// Pointer cursor the host should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CursorHint {
    Default,
    Crosshair,
    Text,
    Grab,
    Grabbing,
    Move,
    Resize(HandleKind),
}

impl CursorHint {
    /// CSS cursor name.
    pub fn as_css(self) -> &'static str {
        match self {
            CursorHint::Default => "default",
            CursorHint::Crosshair => "crosshair",
            CursorHint::Text => "text",
            CursorHint::Grab => "grab",
            CursorHint::Grabbing => "grabbing",
            CursorHint::Move => "move",
            CursorHint::Resize(HandleKind::TopLeft | HandleKind::BottomRight) => "nwse-resize",
            CursorHint::Resize(HandleKind::TopRight | HandleKind::BottomLeft) => "nesw-resize",
            CursorHint::Resize(HandleKind::Top | HandleKind::Bottom) => "ns-resize",
            CursorHint::Resize(HandleKind::Left | HandleKind::Right) => "ew-resize",
        }
    }
}

/// The eight handle squares around `bounds`, sized for `zoom`, in logical space.
pub fn handle_rects(bounds: Rect, zoom: f64) -> [(HandleKind, Rect); 8] {
    let half = HANDLE_SIZE / zoom / 2.0;
    HandleKind::ALL.map(|kind| {
        let p = kind.position(bounds);
        (kind, Rect::new(p.x - half, p.y - half, p.x + half, p.y + half))
    })
}
