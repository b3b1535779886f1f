//! Error types for projection construction.

use thiserror::Error;

/// Errors raised while building a projection from its parameters.
///
/// Transforms themselves never fail; singular inputs produce non-finite
/// coordinates instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    /// The `name` tag does not match any supported projection.
    #[error("unknown projection: {0}")]
    UnknownProjection(String),

    /// A parameter required by the selected projection is absent.
    #[error("{projection} requires parameter '{parameter}'")]
    MissingParameter {
        projection: &'static str,
        parameter: &'static str,
    },
}

impl ProjectionError {
    pub fn missing(projection: &'static str, parameter: &'static str) -> Self {
        Self::MissingParameter {
            projection,
            parameter,
        }
    }
}

/// Result type for projection construction.
pub type Result<T> = std::result::Result<T, ProjectionError>;
