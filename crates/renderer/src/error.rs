//! Error types for vector tile rendering.

use grid::GridError;
use thiserror::Error;

/// Errors that can occur while building a vector tile.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The grid descriptor could not be turned into a grid.
    #[error("grid error: {0}")]
    Grid(#[from] GridError),

    /// The request is inconsistent (missing inputs, mismatched lengths).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Clip polygons or bounds are unusable.
    #[error("clipping error: {0}")]
    Clipping(String),

    /// Clip GeoJSON failed to parse.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RenderError {
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }
}

/// Result type for rendering operations.
pub type Result<T> = std::result::Result<T, RenderError>;
