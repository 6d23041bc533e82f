//! Renderer trait abstraction.

use kurbo::{Affine, Point, Rect, Size};
use peniko::Color;
use sketchboard_core::RenderFrame;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Grid display style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridStyle {
    /// No grid (plain background).
    None,
    /// Full grid lines.
    #[default]
    Lines,
    /// Only dots at intersections.
    Dots,
}

impl GridStyle {
    /// Cycle to the next grid style.
    pub fn next(self) -> Self {
        match self {
            GridStyle::None => GridStyle::Lines,
            GridStyle::Lines => GridStyle::Dots,
            GridStyle::Dots => GridStyle::None,
        }
    }

    /// Get display name for this grid style.
    pub fn name(self) -> &'static str {
        match self {
            GridStyle::None => "None",
            GridStyle::Lines => "Lines",
            GridStyle::Dots => "Dots",
        }
    }
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// Engine state to draw.
    pub frame: RenderFrame<'a>,
    /// Viewport size in logical pixels.
    pub viewport_size: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
    /// Grid display style.
    pub grid_style: GridStyle,
    /// Selection highlight color.
    pub selection_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context.
    pub fn new(frame: RenderFrame<'a>, viewport_size: Size) -> Self {
        Self {
            frame,
            viewport_size,
            scale_factor: 1.0,
            grid_style: GridStyle::Lines,
            selection_color: Color::from_rgba8(59, 130, 246, 255), // Blue
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the grid style.
    pub fn with_grid(mut self, style: GridStyle) -> Self {
        self.grid_style = style;
        self
    }

    /// Set the selection highlight color.
    pub fn with_selection_color(mut self, color: Color) -> Self {
        self.selection_color = color;
        self
    }

    /// Background color from the frame.
    pub fn background_color(&self) -> Color {
        self.frame.background.into()
    }

    /// Visible area in screen coordinates.
    pub fn viewport(&self) -> Rect {
        Rect::new(0.0, 0.0, self.viewport_size.width, self.viewport_size.height)
    }

    /// Transform from logical space to device pixels.
    pub fn transform(&self) -> Affine {
        Affine::scale(self.scale_factor) * self.frame.camera.transform()
    }

    /// A frame can only be drawn onto a non-empty surface.
    pub fn check_surface(&self) -> RenderResult<()> {
        let Size { width, height } = self.viewport_size;
        if !(width > 0.0 && height > 0.0) || !(self.scale_factor > 0.0) {
            return Err(RendererError::Surface(format!(
                "unusable viewport {width}x{height} at scale {}",
                self.scale_factor
            )));
        }
        Ok(())
    }
}

/// Logical-space span of grid lines covering `viewport`.
///
/// `viewport` is in screen coordinates and `transform` maps logical space to
/// the screen. Returns `(start_x, start_y, end_x, end_y)`, snapped outward to
/// multiples of `grid_size`, so line spacing is constant in logical space.
pub fn grid_bounds(viewport: Rect, transform: Affine, grid_size: f64) -> (f64, f64, f64, f64) {
    let inv = transform.inverse();
    let world_tl = inv * Point::new(viewport.x0, viewport.y0);
    let world_br = inv * Point::new(viewport.x1, viewport.y1);

    let start_x = (world_tl.x / grid_size).floor() * grid_size;
    let start_y = (world_tl.y / grid_size).floor() * grid_size;
    let end_x = (world_br.x / grid_size).ceil() * grid_size;
    let end_y = (world_br.y / grid_size).ceil() * grid_size;

    (start_x, start_y, end_x, end_y)
}

/// Trait for rendering backends.
///
/// Implementations can use Vello, wgpu directly, or other rendering engines.
/// Building a scene only reads the frame, so it may run as often as the host likes.
pub trait Renderer: Send + Sync {
    /// Build the scene/command buffer for a frame.
    ///
    /// An unusable surface skips the frame and reports [`RendererError::Surface`].
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()>;

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Vec2;
    use sketchboard_core::{Camera, Canvas, SerializableColor};

    #[test]
    fn test_grid_spacing_is_logical() {
        let viewport = Rect::new(0.0, 0.0, 200.0, 100.0);
        let (sx, sy, ex, ey) = grid_bounds(viewport, Affine::IDENTITY, 50.0);
        assert_eq!((sx, sy, ex, ey), (0.0, 0.0, 200.0, 100.0));

        // At zoom 2 the same viewport covers half the logical area.
        let mut camera = Camera::new();
        camera.zoom = 2.0;
        let (sx, _, ex, _) = grid_bounds(viewport, camera.transform(), 50.0);
        assert_eq!((sx, ex), (0.0, 100.0));
    }

    #[test]
    fn test_grid_bounds_snap_outward() {
        let mut camera = Camera::new();
        camera.offset = Vec2::new(-30.0, 20.0);
        let (sx, sy, ex, ey) =
            grid_bounds(Rect::new(0.0, 0.0, 100.0, 100.0), camera.transform(), 50.0);
        assert_eq!((sx, sy), (0.0, -50.0));
        assert_eq!((ex, ey), (150.0, 100.0));
    }

    #[test]
    fn test_zero_viewport_rejected() {
        let canvas = Canvas::new();
        let ctx = RenderContext::new(canvas.frame(), Size::new(0.0, 600.0));
        assert!(matches!(ctx.check_surface(), Err(RendererError::Surface(_))));
        let ctx = RenderContext::new(canvas.frame(), Size::new(800.0, 600.0));
        assert!(ctx.check_surface().is_ok());
    }

    #[test]
    fn test_context_background_follows_frame() {
        let mut canvas = Canvas::new();
        canvas.set_background("#102030").unwrap();
        let ctx = RenderContext::new(canvas.frame(), Size::new(10.0, 10.0));
        assert_eq!(
            SerializableColor::from(ctx.background_color()),
            SerializableColor::new(0x10, 0x20, 0x30, 255)
        );
    }

    #[test]
    fn test_grid_style_cycle() {
        assert_eq!(GridStyle::default().next(), GridStyle::Dots);
        assert_eq!(GridStyle::Dots.next().name(), "None");
    }
}
