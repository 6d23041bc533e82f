//! The interaction engine: scene, history, selection and viewport behind a
//! pointer/keyboard event interface.

use crate::camera::Camera;
use crate::config::CanvasConfig;
use crate::error::CoreResult;
use crate::frame::{Dirty, FrameExporter, RenderFrame, TextInputRequest, TextInputSurface};
use crate::geometry;
use crate::gesture::{GestureState, ResizeState, drag_delta};
use crate::history::History;
use crate::input::{KeyEvent, Modifiers, MouseButton, PointerEvent};
use crate::scene::Scene;
use crate::selection::{CursorHint, HoverTarget, MarqueeRect, Selection};
use crate::shapes::{DrawingElement, ElementId};
use crate::shortcuts::{ShortcutAction, ShortcutRegistry};
use crate::tools::{ToolKind, ToolManager};
use kurbo::{Point, Vec2};

/// A drawing surface.
///
/// The canvas exclusively owns the scene, its history, the selection, the
/// viewport and the gesture in flight. Hosts feed it events in arrival order
/// and read back [`RenderFrame`]s; nothing else mutates its state.
pub struct Canvas {
    config: CanvasConfig,
    scene: Scene,
    history: History,
    selection: Selection,
    camera: Camera,
    tools: ToolManager,
    gesture: GestureState,
    hover: HoverTarget,
    dirty: Dirty,
    text_input: Option<Box<dyn TextInputSurface>>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create an empty canvas with the default configuration.
    pub fn new() -> Self {
        Self::build(CanvasConfig::default(), Scene::new())
    }

    /// Create an empty canvas with a validated configuration.
    pub fn with_config(config: CanvasConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self::build(config, Scene::new()))
    }

    /// Create a canvas whose initial history snapshot is `scene`.
    pub fn from_scene(scene: Scene, config: CanvasConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self::build(config, scene))
    }

    fn build(config: CanvasConfig, scene: Scene) -> Self {
        let mut tools = ToolManager::new();
        tools.font_size = config.default_font_size;
        tools.background = config.background_color;
        Self {
            history: History::with_initial(scene.clone(), config.max_history),
            camera: Camera::with_limits(config.min_zoom, config.max_zoom),
            scene,
            selection: Selection::new(),
            tools,
            gesture: GestureState::Idle,
            hover: HoverTarget::Outside,
            dirty: Dirty::default(),
            text_input: None,
            config,
        }
    }

    /// Attach the host's text-input field.
    pub fn with_text_input(mut self, surface: Box<dyn TextInputSurface>) -> Self {
        self.text_input = Some(surface);
        self
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn tools(&self) -> &ToolManager {
        &self.tools
    }

    pub fn tool(&self) -> ToolKind {
        self.tools.current_tool
    }

    pub fn gesture(&self) -> &GestureState {
        &self.gesture
    }

    pub fn hover(&self) -> HoverTarget {
        self.hover
    }

    // --- Tool settings ---

    /// Switch tools. Cancels the gesture in flight and clears the selection.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if tool == self.tools.current_tool {
            return;
        }
        self.cancel_gesture();
        if !self.selection.is_empty() {
            self.selection.clear();
            self.dirty.selection = true;
        }
        self.hover = HoverTarget::Outside;
        self.tools.set_tool(tool);
        self.dirty.overlay = true;
        log::debug!("tool set to {tool}");
    }

    /// Switch tools by name (`"select"`, `"pen"`, ...).
    pub fn set_tool_name(&mut self, name: &str) -> CoreResult<()> {
        let tool = name.parse()?;
        self.set_tool(tool);
        Ok(())
    }

    pub fn set_color(&mut self, color: &str) -> CoreResult<()> {
        self.tools.set_color_hex(color)
    }

    pub fn set_stroke_weight(&mut self, weight: f64) -> CoreResult<()> {
        self.tools.set_stroke_weight(weight)
    }

    pub fn set_font_size(&mut self, size: f64) -> CoreResult<()> {
        self.tools.set_font_size(size)?;
        self.refresh_text_input();
        Ok(())
    }

    pub fn set_background(&mut self, color: &str) -> CoreResult<()> {
        self.tools.set_background_hex(color)?;
        self.dirty.overlay = true;
        Ok(())
    }

    // --- Pointer input ---

    /// Dispatch a pointer event.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down {
                position,
                button,
                modifiers,
            } => self.pointer_down(position, button, modifiers),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position, button } => self.pointer_up(position, button),
            PointerEvent::Leave { position } => self.pointer_leave(position),
            PointerEvent::Wheel { position, delta } => self.wheel(position, delta),
        }
    }

    /// Pointer pressed at `screen`.
    pub fn pointer_down(&mut self, screen: Point, button: MouseButton, modifiers: Modifiers) {
        if button == MouseButton::Right {
            return;
        }
        match self.gesture {
            GestureState::Idle => {}
            // Only one pending text slot: a new press drops it.
            GestureState::EditingText { .. } => self.cancel_text(),
            // A press mid-gesture means the release was lost.
            _ => self.finish_gesture(),
        }

        let world = self.camera.screen_to_world(screen);
        let tool = self.tools.current_tool;

        let panning = tool == ToolKind::Pan
            || button == MouseButton::Middle
            || (button == MouseButton::Left && modifiers.shift);

        let next = if panning {
            GestureState::Panning { anchor: screen }
        } else {
            match tool {
                ToolKind::Select => self.begin_select(world),
                ToolKind::Text => GestureState::EditingText { anchor: world },
                _ => match tool.element_kind() {
                    Some(kind) => GestureState::Drawing {
                        element: DrawingElement::new(kind, world, self.tools.current_style.clone()),
                    },
                    None => GestureState::Idle,
                },
            }
        };
        self.gesture = next;
        self.refresh_text_input();
        self.dirty.overlay = true;
        log::debug!("pointer down ({tool}): {}", self.gesture.name());
    }

    /// Resolve a select-tool press: handle, then body, then topmost element,
    /// then empty space.
    fn begin_select(&mut self, world: Point) -> GestureState {
        if let Some(bounds) = self.selection.bounds(&self.scene) {
            if let Some(handle) = geometry::resize_handle_at_with_tolerance(
                world,
                bounds,
                self.camera.zoom,
                self.config.handle_hit_tolerance,
            ) {
                let originals = self.selected_elements();
                return GestureState::Resizing(ResizeState::new(handle, world, bounds, originals));
            }
            if geometry::point_in_bounds(world, bounds) {
                return GestureState::Dragging {
                    anchor: world,
                    originals: self.selected_elements(),
                    moved: false,
                };
            }
        }

        if let Some(id) = self.scene.element_at(world).map(|e| e.id()) {
            self.selection.select_only(id);
            self.dirty.selection = true;
            return GestureState::Dragging {
                anchor: world,
                originals: self.selected_elements(),
                moved: false,
            };
        }

        if !self.selection.is_empty() {
            self.selection.clear();
            self.dirty.selection = true;
        }
        GestureState::MarqueeSelecting(MarqueeRect::new(world))
    }

    fn selected_elements(&self) -> Vec<DrawingElement> {
        self.scene.select(self.selection.ids()).cloned().collect()
    }

    /// Pointer moved to `screen`.
    pub fn pointer_move(&mut self, screen: Point) {
        let world = self.camera.screen_to_world(screen);
        let gesture = std::mem::take(&mut self.gesture);
        self.gesture = match gesture {
            GestureState::Idle => {
                self.update_hover(world);
                GestureState::Idle
            }
            GestureState::Panning { anchor } => {
                self.camera.pan(screen - anchor);
                self.dirty.viewport = true;
                GestureState::Panning { anchor: screen }
            }
            GestureState::MarqueeSelecting(mut marquee) => {
                marquee.current = world;
                self.dirty.overlay = true;
                GestureState::MarqueeSelecting(marquee)
            }
            GestureState::Dragging {
                anchor,
                originals,
                moved,
            } => {
                let delta = drag_delta(anchor, world);
                let mut moved = moved;
                if delta != Vec2::ZERO {
                    for element in self.scene.select_mut(self.selection.ids()) {
                        element.translate(delta);
                    }
                    moved = true;
                    self.dirty.scene = true;
                }
                GestureState::Dragging {
                    anchor: world,
                    originals,
                    moved,
                }
            }
            GestureState::Resizing(mut state) => {
                // Until the cursor leaves the press point the scene is untouched.
                if state.moved || world != state.start_point {
                    for resized in state.resized_elements(world) {
                        if let Some(element) = self.scene.get_mut(resized.id()) {
                            *element = resized;
                        }
                    }
                    state.moved = true;
                    self.dirty.scene = true;
                }
                GestureState::Resizing(state)
            }
            GestureState::Drawing { mut element } => {
                if element.track_pointer(world, self.config.min_sample_distance) {
                    self.dirty.overlay = true;
                }
                GestureState::Drawing { element }
            }
            editing @ GestureState::EditingText { .. } => editing,
        };
    }

    /// Pointer released at `screen`.
    pub fn pointer_up(&mut self, screen: Point, button: MouseButton) {
        if button == MouseButton::Right {
            return;
        }
        self.finish_gesture();
        self.update_hover(self.camera.screen_to_world(screen));
    }

    /// Pointer left the surface. Ends the gesture exactly like a release.
    pub fn pointer_leave(&mut self, _screen: Point) {
        self.finish_gesture();
        if self.hover != HoverTarget::Outside {
            self.hover = HoverTarget::Outside;
            self.dirty.overlay = true;
        }
    }

    /// Complete the gesture in flight, committing what it produced.
    fn finish_gesture(&mut self) {
        let gesture = std::mem::take(&mut self.gesture);
        let name = gesture.name();
        self.gesture = match gesture {
            GestureState::Idle => GestureState::Idle,
            GestureState::Panning { .. } => GestureState::Idle,
            GestureState::MarqueeSelecting(marquee) => {
                let hits = self.scene.elements_in_rect(marquee.rect());
                log::debug!("marquee selected {} elements", hits.len());
                self.selection.set(hits);
                self.dirty.selection = true;
                self.dirty.overlay = true;
                GestureState::Idle
            }
            GestureState::Dragging { moved, .. } => {
                if moved {
                    self.commit();
                }
                GestureState::Idle
            }
            GestureState::Resizing(state) => {
                if state.moved {
                    self.commit();
                }
                GestureState::Idle
            }
            GestureState::Drawing { element } => {
                self.scene.push(element);
                self.dirty.scene = true;
                self.dirty.overlay = true;
                self.commit();
                GestureState::Idle
            }
            // Text editing outlives the press that started it.
            editing @ GestureState::EditingText { .. } => editing,
        };
        if name != self.gesture.name() {
            log::debug!("gesture {name} finished");
        }
    }

    /// Discard the gesture in flight without touching history.
    pub fn cancel_gesture(&mut self) {
        let gesture = std::mem::take(&mut self.gesture);
        let name = gesture.name();
        match gesture {
            GestureState::Idle => return,
            GestureState::Dragging { originals, .. } => self.restore(originals),
            GestureState::Resizing(state) => self.restore(state.originals),
            GestureState::EditingText { .. } => self.dismiss_text_input(),
            GestureState::Drawing { .. }
            | GestureState::Panning { .. }
            | GestureState::MarqueeSelecting(_) => {}
        }
        self.dirty.overlay = true;
        log::debug!("gesture {name} cancelled");
    }

    fn restore(&mut self, originals: Vec<DrawingElement>) {
        for original in originals {
            if let Some(element) = self.scene.get_mut(original.id()) {
                *element = original;
            }
        }
        self.dirty.scene = true;
    }

    /// Wheel scroll at `screen`. Positive `delta.y` zooms out, anything else zooms in.
    pub fn wheel(&mut self, screen: Point, delta: Vec2) {
        let factor = if delta.y > 0.0 {
            self.config.zoom_out_factor
        } else {
            self.config.zoom_in_factor
        };
        if self.camera.zoom_at(screen, factor) {
            self.dirty.viewport = true;
            self.refresh_text_input();
        }
    }

    fn update_hover(&mut self, world: Point) {
        let hover = match self.selection.bounds(&self.scene) {
            Some(bounds) if self.tools.current_tool == ToolKind::Select => HoverTarget::classify(
                world,
                bounds,
                self.camera.zoom,
                self.config.handle_hit_tolerance,
            ),
            _ => HoverTarget::Outside,
        };
        if hover != self.hover {
            self.hover = hover;
            self.dirty.overlay = true;
        }
    }

    /// Cursor the host should display for the current tool and gesture.
    pub fn cursor_hint(&self) -> CursorHint {
        match &self.gesture {
            GestureState::Panning { .. } => return CursorHint::Grabbing,
            GestureState::Dragging { .. } => return CursorHint::Move,
            GestureState::Resizing(state) => return CursorHint::Resize(state.handle),
            _ => {}
        }
        match self.tools.current_tool {
            ToolKind::Pan => CursorHint::Grab,
            ToolKind::Text => CursorHint::Text,
            ToolKind::Select => match self.hover {
                HoverTarget::Handle(handle) => CursorHint::Resize(handle),
                HoverTarget::Inside => CursorHint::Move,
                HoverTarget::Outside => CursorHint::Default,
            },
            tool if tool.is_drawing_tool() => CursorHint::Crosshair,
            _ => CursorHint::Default,
        }
    }

    // --- Viewport ---

    /// Pan by a screen-space delta.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.camera.pan(delta);
        self.dirty.viewport = true;
        self.refresh_text_input();
    }

    /// Zoom by `factor` around a screen point.
    pub fn zoom_at(&mut self, screen: Point, factor: f64) {
        if self.camera.zoom_at(screen, factor) {
            self.dirty.viewport = true;
            self.refresh_text_input();
        }
    }

    /// Back to zoom 1 with no pan.
    pub fn reset_view(&mut self) {
        self.camera.reset();
        self.dirty.viewport = true;
        self.refresh_text_input();
    }

    // --- Text editing ---

    /// Placement for the text field while a text edit is pending.
    pub fn text_input_request(&self) -> Option<TextInputRequest> {
        let anchor = self.gesture.text_anchor()?;
        Some(TextInputRequest {
            screen_position: self.camera.world_to_screen(anchor),
            anchor,
            font_size: self.tools.font_size * self.camera.zoom,
            color: self.tools.current_style.stroke_color,
        })
    }

    fn refresh_text_input(&mut self) {
        if let Some(request) = self.text_input_request() {
            if let Some(surface) = self.text_input.as_mut() {
                surface.show(&request);
            }
            self.dirty.overlay = true;
        }
    }

    fn dismiss_text_input(&mut self) {
        if let Some(surface) = self.text_input.as_mut() {
            surface.dismiss();
        }
    }

    /// The text field reported a committed string.
    ///
    /// Blank text is discarded. Returns the new element's ID when one was created.
    pub fn submit_text(&mut self, text: &str) -> Option<ElementId> {
        let anchor = self.gesture.text_anchor()?;
        self.gesture = GestureState::Idle;
        self.dismiss_text_input();
        self.dirty.overlay = true;

        if text.trim().is_empty() {
            log::debug!("empty text discarded");
            return None;
        }
        let element = DrawingElement::text(
            anchor,
            text,
            self.tools.font_size,
            self.tools.current_style.clone(),
        );
        let id = element.id();
        self.scene.push(element);
        self.dirty.scene = true;
        self.commit();
        Some(id)
    }

    /// The text field was cancelled.
    pub fn cancel_text(&mut self) {
        if self.gesture.text_anchor().is_some() {
            self.gesture = GestureState::Idle;
            self.dismiss_text_input();
            self.dirty.overlay = true;
        }
    }

    // --- Keyboard ---

    /// Handle a key press. Returns `true` when the key was consumed and the
    /// host should suppress its default behavior.
    pub fn handle_key(&mut self, event: &KeyEvent) -> bool {
        let Some(action) = ShortcutRegistry::action_for(event) else {
            return false;
        };
        let editing_text = self.gesture.text_anchor().is_some();
        match action {
            ShortcutAction::Undo => {
                self.undo();
                true
            }
            ShortcutAction::Redo => {
                self.redo();
                true
            }
            ShortcutAction::Cancel => {
                let active = !self.gesture.is_idle();
                self.cancel_gesture();
                active
            }
            ShortcutAction::DeleteSelection => {
                if editing_text
                    || self.tools.current_tool != ToolKind::Select
                    || !self.gesture.is_idle()
                {
                    return false;
                }
                self.delete_selected() > 0
            }
            ShortcutAction::SelectAll => {
                if editing_text || self.tools.current_tool != ToolKind::Select {
                    return false;
                }
                self.select_all();
                true
            }
        }
    }

    // --- History ---

    /// Record the current scene as a history snapshot.
    pub fn commit(&mut self) {
        self.history.commit(&self.scene);
        self.dirty.history = true;
    }

    /// Step back one snapshot. Returns whether anything changed.
    pub fn undo(&mut self) -> bool {
        self.cancel_gesture();
        let Some(scene) = self.history.undo() else {
            return false;
        };
        self.scene = scene.clone();
        self.after_history_step();
        true
    }

    /// Step forward one snapshot. Returns whether anything changed.
    pub fn redo(&mut self) -> bool {
        self.cancel_gesture();
        let Some(scene) = self.history.redo() else {
            return false;
        };
        self.scene = scene.clone();
        self.after_history_step();
        true
    }

    fn after_history_step(&mut self) {
        if self.selection.retain_existing(&self.scene) {
            self.dirty.selection = true;
        }
        self.dirty.scene = true;
        self.dirty.history = true;
        log::debug!(
            "history at {}/{}",
            self.history.cursor(),
            self.history.len() - 1
        );
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // --- Scene edits ---

    /// Insert an element on top without recording history.
    ///
    /// Call [`commit`](Self::commit) to make the insertion undoable.
    pub fn add_element(&mut self, element: DrawingElement) -> ElementId {
        let id = element.id();
        self.scene.push(element);
        self.dirty.scene = true;
        id
    }

    /// Remove the selected elements in one history step. Returns how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        if self.selection.is_empty() {
            return 0;
        }
        let removed = self.scene.remove_all(self.selection.ids());
        self.selection.clear();
        self.dirty.selection = true;
        if removed > 0 {
            self.dirty.scene = true;
            self.commit();
        }
        removed
    }

    /// Select every element in the scene.
    pub fn select_all(&mut self) {
        self.selection.set(self.scene.ids());
        self.dirty.selection = true;
    }

    /// Replace the selection.
    pub fn select(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        self.selection.set(ids);
        self.selection.retain_existing(&self.scene);
        self.dirty.selection = true;
    }

    pub fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.dirty.selection = true;
        }
    }

    // --- Output ---

    /// Read-only view of everything the render-sink draws.
    pub fn frame(&self) -> RenderFrame<'_> {
        RenderFrame {
            scene: &self.scene,
            in_progress: self.gesture.in_progress(),
            selection: self.selection.ids(),
            selection_bounds: self.selection.bounds(&self.scene),
            marquee: self.gesture.marquee(),
            camera: &self.camera,
            tool: self.tools.current_tool,
            hover: self.hover,
            background: self.tools.background,
            grid_size: self.config.grid_size,
            grid_color: self.config.grid_color,
        }
    }

    /// Render the current frame through `exporter`.
    pub fn export<E: FrameExporter>(&self, exporter: &mut E) -> Result<E::Output, E::Error> {
        exporter.export(&self.frame())
    }

    /// Drain pending change notifications.
    pub fn take_dirty(&mut self) -> Dirty {
        std::mem::take(&mut self.dirty)
    }

    /// Check pending change notifications without draining them.
    pub fn dirty(&self) -> Dirty {
        self.dirty
    }
}
