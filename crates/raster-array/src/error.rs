//! Error types for raster operations.

use thiserror::Error;

use crate::dtype::RasterDtype;

/// Result type alias for raster operations.
pub type Result<T> = std::result::Result<T, RasterError>;

/// Boxed error produced by an external codec or transport collaborator.
pub type CodecError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by raster construction and access.
///
/// Every error is raised at the point of construction or call; no operation
/// coerces values, substitutes defaults, or returns a partial object.
#[derive(Debug, Error)]
pub enum RasterError {
    /// Malformed metadata, profile, or band-tag fields.
    #[error("validation error: {0}")]
    Validation(String),

    /// Buffer does not have exactly three dimensions.
    #[error("buffer must have 3 dimensions, has {ndim}")]
    Rank { ndim: usize },

    /// Buffer shape disagrees with the metadata shape.
    #[error("buffer shape {buffer:?} does not match metadata shape {metadata:?}")]
    Shape {
        buffer: (usize, usize, usize),
        metadata: (usize, usize, usize),
    },

    /// Buffer dtype disagrees with the metadata dtype.
    #[error("buffer dtype {buffer} does not match metadata dtype {metadata}")]
    Dtype {
        buffer: RasterDtype,
        metadata: RasterDtype,
    },

    /// Band index outside `[1, count]`.
    #[error("band index {index} is out of range for a raster with {count} band(s)")]
    BandIndex { index: usize, count: usize },

    /// Failure surfaced from the external codec or transport while reading.
    #[error("failed to read raster source: {0}")]
    SourceRead(#[source] CodecError),

    /// Failure surfaced from the external codec while writing.
    #[error("failed to write raster: {0}")]
    Write(#[source] CodecError),
}

impl RasterError {
    /// Create a Validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
