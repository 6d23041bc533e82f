//! Sketchboard Core Library
//!
//! Scene model, geometry, gesture state machine and undo history for the
//! Sketchboard drawing surface. Rendering lives in `sketchboard-render`.

pub mod camera;
pub mod canvas;
pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod gesture;
pub mod history;
pub mod input;
pub mod scene;
pub mod selection;
pub mod shapes;
pub mod shortcuts;
pub mod tools;

pub use camera::Camera;
pub use canvas::Canvas;
pub use config::CanvasConfig;
pub use error::{CoreError, CoreResult};
pub use frame::{Dirty, FrameExporter, RenderFrame, TextInputRequest, TextInputSurface};
pub use geometry::{
    HandleKind, bounds_of, combined_bounds, point_in_bounds, rects_intersect, resize_handle_at,
};
pub use gesture::GestureState;
pub use history::History;
pub use input::{Key, KeyEvent, Modifiers, MouseButton, PointerEvent};
pub use scene::Scene;
pub use selection::{CursorHint, HoverTarget, MarqueeRect, Selection};
pub use shapes::{
    DrawingElement, ElementId, ElementKind, ElementStyle, SerializableColor, TextContent,
};
pub use shortcuts::{ShortcutAction, ShortcutRegistry};
pub use tools::{ToolKind, ToolManager};
