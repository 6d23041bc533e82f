//! Read-only views handed to external collaborators, and the capabilities
//! the engine consumes from them.

use crate::camera::Camera;
use crate::scene::Scene;
use crate::selection::HoverTarget;
use crate::shapes::{DrawingElement, ElementId, SerializableColor};
use crate::tools::ToolKind;
use kurbo::{Point, Rect};

/// Everything a render-sink needs to draw one frame.
///
/// Built on demand by [`Canvas::frame`](crate::Canvas::frame). Drawing it has
/// no effect on the engine, so it may be rebuilt and redrawn any number of times.
#[derive(Debug, Clone, Copy)]
pub struct RenderFrame<'a> {
    pub scene: &'a Scene,
    /// Element currently being drawn, not yet part of the scene.
    pub in_progress: Option<&'a DrawingElement>,
    pub selection: &'a [ElementId],
    /// Combined bounds of the selection, recomputed for this frame.
    pub selection_bounds: Option<Rect>,
    /// Normalized marquee rectangle while marquee-selecting.
    pub marquee: Option<Rect>,
    pub camera: &'a Camera,
    pub tool: ToolKind,
    pub hover: HoverTarget,
    pub background: SerializableColor,
    pub grid_size: f64,
    pub grid_color: SerializableColor,
}

impl RenderFrame<'_> {
    /// Selection box and handles are drawn only for a non-empty selection
    /// while the select tool is active.
    pub fn show_selection(&self) -> bool {
        self.tool == ToolKind::Select && self.selection_bounds.is_some()
    }

    pub fn zoom(&self) -> f64 {
        self.camera.zoom
    }
}

/// Placement for the external text-input field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextInputRequest {
    /// Top-left of the field in screen coordinates (`anchor * zoom + pan`).
    pub screen_position: Point,
    /// Logical anchor the text element will be created at.
    pub anchor: Point,
    /// Font size on screen (`font_size * zoom`).
    pub font_size: f64,
    pub color: SerializableColor,
}

/// An editable text field owned by the host.
///
/// The engine asks for the field to be shown when the text tool is pressed and
/// dismissed once editing ends. The host reports the outcome back through
/// [`Canvas::submit_text`](crate::Canvas::submit_text) or
/// [`Canvas::cancel_text`](crate::Canvas::cancel_text); it never edits the
/// scene itself.
pub trait TextInputSurface {
    /// Show (or move) the field and focus it.
    fn show(&mut self, request: &TextInputRequest);
    /// Hide the field.
    fn dismiss(&mut self);
}

/// Turns a frame into an image. Persisting the image is up to the caller.
pub trait FrameExporter {
    type Output;
    type Error;

    fn export(&mut self, frame: &RenderFrame<'_>) -> Result<Self::Output, Self::Error>;
}

/// What changed since the host last drained notifications.
///
/// Flags coalesce, so a burst of pointer moves produces one redraw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dirty {
    pub scene: bool,
    pub selection: bool,
    pub viewport: bool,
    pub history: bool,
    /// In-progress element, marquee, hover or background.
    pub overlay: bool,
}

impl Dirty {
    pub fn any(&self) -> bool {
        self.scene || self.selection || self.viewport || self.history || self.overlay
    }
}
