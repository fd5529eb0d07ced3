//! Error types for mesh fracture

use thiserror::Error;

/// Errors that can occur while configuring or running a fracture
///
/// Degenerate geometry met during slicing is never reported here: it is
/// dropped silently and only shows up as fewer fragments.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FractureError {
    /// Configuration validation failed
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Mesh data is inconsistent (e.g. an index points past the vertex buffer)
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),
    /// A geometric primitive could not be built (e.g. zero-length plane normal)
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),
    /// The source's world matrix has no inverse
    #[error("world transform of `{0}` is not invertible")]
    NonInvertibleTransform(String),
    /// The source is protected or is itself a fragment
    #[error("`{0}` cannot be fractured")]
    NotFracturable(String),
}

/// Result type alias for fracture operations
pub type Result<T> = std::result::Result<T, FractureError>;
