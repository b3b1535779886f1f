//! Error types for grid construction.

use projection::ProjectionError;
use thiserror::Error;

/// Errors raised while building a grid from its descriptor.
#[derive(Error, Debug)]
pub enum GridError {
    /// The descriptor's projection could not be built.
    #[error("projection error: {0}")]
    Projection(#[from] ProjectionError),

    /// The descriptor is well-formed JSON but describes an unusable grid.
    #[error("invalid grid descriptor: {0}")]
    InvalidDescriptor(String),

    /// The descriptor could not be parsed.
    #[error("failed to parse grid descriptor: {0}")]
    Json(#[from] serde_json::Error),
}

impl GridError {
    /// Create an InvalidDescriptor error.
    pub fn invalid_descriptor(msg: impl Into<String>) -> Self {
        Self::InvalidDescriptor(msg.into())
    }
}

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
