//! Vello-based renderer implementation.

use crate::renderer::{GridStyle, RenderContext, RenderResult, Renderer, RendererError, grid_bounds};
use kurbo::{Affine, BezPath, Cap, Circle, Join, Point, Rect, Shape as KurboShape, Size, Stroke};
use parley::layout::PositionedLayoutItem;
use parley::{FontContext, FontFamily, FontStack, GenericFamily, LayoutContext, StyleProperty};
use peniko::{Brush, Color, Fill};
use sketchboard_core::selection::handle_rects;
use sketchboard_core::{DrawingElement, ElementKind, FrameExporter, RenderFrame};
use vello::Scene;

/// Padding around exported content, in logical pixels.
const EXPORT_PADDING: f64 = 20.0;

/// Snapshot of the current view, ready to be rasterized.
pub struct ExportedScene {
    pub scene: Scene,
    /// Image size in pixels.
    pub size: Size,
    /// Logical area the image covers.
    pub view: Rect,
}

/// Vello-based renderer for GPU-accelerated 2D graphics.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Selection highlight color.
    selection_color: Color,
    /// Font context for text rendering (system fonts, cached across frames).
    font_cx: FontContext,
    /// Layout context for text rendering.
    layout_cx: LayoutContext<Brush>,
    /// Current zoom level (for zoom-independent UI elements).
    zoom: f64,
    /// Resolution multiplier used by [`FrameExporter::export`].
    export_scale: f64,
    /// Viewport of the last frame drawn, reused when exporting the view.
    view_size: Option<Size>,
    /// Grid style of the last frame drawn.
    grid_style: GridStyle,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            selection_color: Color::from_rgba8(59, 130, 246, 255),
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
            zoom: 1.0,
            export_scale: 1.0,
            view_size: None,
            grid_style: GridStyle::default(),
        }
    }

    /// Set the export resolution multiplier (1 = 1x, 2 = 2x, ...).
    pub fn with_export_scale(mut self, scale: f64) -> Self {
        self.export_scale = scale;
        self
    }

    /// Set the viewport exported before any frame has been drawn.
    pub fn with_export_viewport(mut self, size: Size) -> Self {
        self.view_size = Some(size);
        self
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Build a scene of the whole drawing, cropped to its content
    /// (elements only, no grid/selection/marquee).
    /// Returns the scene and the scaled bounds (for texture dimensions).
    ///
    /// `scale` is the export resolution multiplier (1 = 1x, 2 = 2x, 3 = 3x).
    pub fn build_export_scene(
        &mut self,
        drawing: &sketchboard_core::Scene,
        background: Color,
        scale: f64,
    ) -> (Scene, Option<Rect>) {
        self.scene.reset();
        self.zoom = scale;

        let Some(bounds) = drawing.bounds() else {
            return (std::mem::take(&mut self.scene), None);
        };

        let padded_bounds = bounds.inflate(EXPORT_PADDING, EXPORT_PADDING);

        // Translate to origin, then scale up
        let transform =
            Affine::scale(scale) * Affine::translate((-padded_bounds.x0, -padded_bounds.y0));

        let scaled_bounds = Rect::new(
            0.0,
            0.0,
            padded_bounds.width() * scale,
            padded_bounds.height() * scale,
        );
        self.scene
            .fill(Fill::NonZero, Affine::IDENTITY, background, None, &scaled_bounds);

        for element in drawing.iter() {
            self.render_element(element, transform);
        }

        log::debug!(
            "export scene: {} elements, {}x{} px",
            drawing.len(),
            scaled_bounds.width(),
            scaled_bounds.height()
        );
        (std::mem::take(&mut self.scene), Some(scaled_bounds))
    }

    fn render_element(&mut self, element: &DrawingElement, transform: Affine) {
        match element.kind {
            ElementKind::Text => self.render_text(element, transform),
            ElementKind::Freehand if element.points.len() == 1 => {
                // A click without movement leaves a dot.
                let dot = Circle::new(element.points[0], element.style.stroke_weight / 2.0);
                self.scene
                    .fill(Fill::NonZero, transform, element.style.stroke(), None, &dot);
            }
            _ => {
                let path = element.to_path();
                if path.elements().is_empty() {
                    return;
                }
                let stroke = Stroke::new(element.style.stroke_weight)
                    .with_caps(Cap::Round)
                    .with_join(Join::Round);
                self.scene
                    .stroke(&stroke, transform, element.style.stroke(), None, &path);
            }
        }
    }

    /// Render a text element using Parley for layout.
    fn render_text(&mut self, element: &DrawingElement, transform: Affine) {
        let (Some(text), Some(anchor)) = (element.text_content(), element.points.first()) else {
            return;
        };
        if text.content.is_empty() {
            return;
        }

        let brush = Brush::Solid(element.style.stroke());
        let mut builder = self
            .layout_cx
            .ranged_builder(&mut self.font_cx, &text.content, 1.0, false);
        builder.push_default(StyleProperty::FontSize(text.font_size as f32));
        builder.push_default(StyleProperty::Brush(brush.clone()));
        builder.push_default(StyleProperty::FontStack(FontStack::Single(FontFamily::Generic(
            GenericFamily::SansSerif,
        ))));
        let mut layout = builder.build(&text.content);
        layout.break_all_lines(None);
        layout.align(None, parley::Alignment::Start, parley::AlignmentOptions::default());

        // The anchor is the top-left of the text box.
        let text_transform = transform * Affine::translate(anchor.to_vec2());
        let mut glyph_count = 0;

        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let font = run.font();
                let font_size = run.font_size();
                let glyph_xform = run
                    .synthesis()
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        glyph_count += 1;
                        vello::Glyph { id: glyph.id, x: gx, y: gy }
                    })
                    .collect();

                if !glyphs.is_empty() {
                    self.scene
                        .draw_glyphs(font)
                        .brush(&brush)
                        .hint(true)
                        .transform(text_transform)
                        .glyph_transform(glyph_xform)
                        .font_size(font_size)
                        .normalized_coords(run.normalized_coords())
                        .draw(Fill::NonZero, glyphs.into_iter());
                }
            }
        }

        // No system font resolved: show the estimated text box instead.
        if glyph_count == 0 {
            log::debug!("no glyphs for text element {}, drawing placeholder", element.id());
            let placeholder = element.style.stroke_color.with_alpha(60);
            self.scene
                .fill(Fill::NonZero, transform, Color::from(placeholder), None, &element.bounds());
        }
    }

    /// Render full grid lines.
    fn render_grid_lines(
        &mut self,
        viewport: Rect,
        transform: Affine,
        grid_size: f64,
        color: Color,
    ) {
        let stroke = Stroke::new(1.0 / self.zoom);
        let (start_x, start_y, end_x, end_y) = grid_bounds(viewport, transform, grid_size);

        // Batch all lines into a single path
        let mut path = BezPath::new();
        let mut x = start_x;
        while x <= end_x {
            path.move_to(Point::new(x, start_y));
            path.line_to(Point::new(x, end_y));
            x += grid_size;
        }
        let mut y = start_y;
        while y <= end_y {
            path.move_to(Point::new(start_x, y));
            path.line_to(Point::new(end_x, y));
            y += grid_size;
        }
        self.scene.stroke(&stroke, transform, color, None, &path);
    }

    /// Render grid as dots at intersections.
    fn render_grid_dots(
        &mut self,
        viewport: Rect,
        transform: Affine,
        grid_size: f64,
        color: Color,
    ) {
        let dot_size = 1.5 / self.zoom;
        let (start_x, start_y, end_x, end_y) = grid_bounds(viewport, transform, grid_size);

        let mut path = BezPath::new();
        let mut x = start_x;
        while x <= end_x {
            let mut y = start_y;
            while y <= end_y {
                // Small squares are cheaper than ellipses
                let dot = Rect::new(x - dot_size, y - dot_size, x + dot_size, y + dot_size);
                path.extend(dot.path_elements(0.1));
                y += grid_size;
            }
            x += grid_size;
        }
        self.scene.fill(Fill::NonZero, transform, color, None, &path);
    }

    /// Dashed box around the selection plus its eight handles.
    fn render_selection_box(&mut self, bounds: Rect, transform: Affine) {
        let stroke_width = 1.0 / self.zoom;
        let dash_len = 4.0 / self.zoom;
        let stroke = Stroke::new(stroke_width).with_dashes(0.0, &[dash_len, dash_len]);
        self.scene
            .stroke(&stroke, transform, self.selection_color, None, &bounds.to_path(0.1));

        let border = Stroke::new(1.5 / self.zoom);
        for (_, handle) in handle_rects(bounds, self.zoom) {
            let path = handle.to_path(0.1);
            self.scene.fill(Fill::NonZero, transform, Color::WHITE, None, &path);
            self.scene
                .stroke(&border, transform, self.selection_color, None, &path);
        }
    }

    fn render_marquee(&mut self, rect: Rect, transform: Affine) {
        let path = rect.to_path(0.1);
        // Semi-transparent blue
        let fill_color = Color::from_rgba8(59, 130, 246, 25);
        self.scene.fill(Fill::NonZero, transform, fill_color, None, &path);

        // Border stays one pixel wide at any zoom
        let stroke_width = 1.0 / self.zoom;
        let dash_len = 4.0 / self.zoom;
        let stroke = Stroke::new(stroke_width).with_dashes(0.0, &[dash_len, dash_len]);
        self.scene
            .stroke(&stroke, transform, self.selection_color, None, &path);
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) -> RenderResult<()> {
        if let Err(err) = ctx.check_surface() {
            log::warn!("skipping frame: {err}");
            return Err(err);
        }

        self.scene.reset();
        self.selection_color = ctx.selection_color;
        self.zoom = ctx.frame.zoom();
        self.view_size = Some(ctx.viewport_size);
        self.grid_style = ctx.grid_style;

        let frame = &ctx.frame;
        let viewport = ctx.viewport();
        let screen = Affine::scale(ctx.scale_factor);
        let transform = ctx.transform();

        self.scene
            .fill(Fill::NonZero, screen, ctx.background_color(), None, &viewport);

        let grid_color = Color::from(frame.grid_color);
        let device_viewport = screen.transform_rect_bbox(viewport);
        match ctx.grid_style {
            GridStyle::None => {}
            GridStyle::Lines => {
                self.render_grid_lines(device_viewport, transform, frame.grid_size, grid_color)
            }
            GridStyle::Dots => {
                self.render_grid_dots(device_viewport, transform, frame.grid_size, grid_color)
            }
        }

        for element in frame.scene.iter() {
            self.render_element(element, transform);
        }

        if let Some(element) = frame.in_progress {
            self.render_element(element, transform);
        }

        if let Some(bounds) = frame.selection_bounds.filter(|_| frame.show_selection()) {
            self.render_selection_box(bounds, transform);
        }

        if let Some(rect) = frame.marquee {
            self.render_marquee(rect, transform);
        }

        Ok(())
    }
}

impl FrameExporter for VelloRenderer {
    type Output = ExportedScene;
    type Error = RendererError;

    /// Draw the frame the way it appears on screen: same viewport, camera,
    /// grid and overlays, at `export_scale` pixels per screen pixel.
    ///
    /// The on-screen scene is left as it was.
    fn export(&mut self, frame: &RenderFrame<'_>) -> Result<ExportedScene, RendererError> {
        if !(self.export_scale > 0.0) {
            return Err(RendererError::RenderFailed(format!(
                "invalid export scale {}",
                self.export_scale
            )));
        }
        let Some(viewport_size) = self.view_size else {
            return Err(RendererError::Surface("no viewport to export".into()));
        };

        let ctx = RenderContext::new(*frame, viewport_size)
            .with_scale_factor(self.export_scale)
            .with_grid(self.grid_style)
            .with_selection_color(self.selection_color);
        let view = frame.camera.inverse_transform().transform_rect_bbox(ctx.viewport());

        let on_screen = std::mem::take(&mut self.scene);
        let built = self.build_scene(&ctx);
        let scene = std::mem::replace(&mut self.scene, on_screen);
        built?;

        let size = Size::new(
            viewport_size.width * self.export_scale,
            viewport_size.height * self.export_scale,
        );
        log::debug!("exported view {view:?} at {}x{} px", size.width, size.height);
        Ok(ExportedScene { scene, size, view })
    }
}
