//! Error types for the core crate.

use thiserror::Error;

/// Errors surfaced at the boundary between the engine and its host.
///
/// Gesture edge cases (undo at the bottom of history, empty text, degenerate
/// shapes) are no-ops and never produce one of these.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid color: {0}")]
    InvalidColor(String),
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
