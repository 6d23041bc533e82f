//! Sketchboard Render Library
//!
//! Renderer abstraction for Sketchboard frames.
//! The default implementation uses Vello for GPU-accelerated rendering.

mod renderer;

#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use renderer::{GridStyle, RenderContext, RenderResult, Renderer, RendererError, grid_bounds};

#[cfg(feature = "vello-renderer")]
pub use vello_impl::{ExportedScene, VelloRenderer};
