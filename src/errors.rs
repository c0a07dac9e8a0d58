//! Error Types
//!
//! The main error type [`ViewerError`] covers all failure modes of the
//! viewer core:
//! - geometry parsing errors
//! - image decoding errors
//! - GPU resource acquisition failures reported by the host device
//!
//! All fallible public APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, ViewerError>`.
//!
//! Precondition violations (non-positive aspect ratio, empty geometry
//! buffers) are not represented here: they abort construction via an
//! assertion so that no partial object escapes.

use thiserror::Error;

/// The main error type for the viewer core.
#[derive(Error, Debug)]
pub enum ViewerError {
    // ========================================================================
    // Geometry Parsing Errors
    // ========================================================================
    /// A face record referenced a position/UV/normal index outside the
    /// arrays read so far. The legacy parser indexed out of bounds here;
    /// we fail the parse instead.
    #[error("OBJ parse error at line {line}: {message}")]
    ObjParse {
        /// 1-based line number of the offending record
        line: usize,
        /// Description of what was wrong
        message: String,
    },

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// File I/O error (unreadable geometry or texture file).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ========================================================================
    // Image & Texture Errors
    // ========================================================================
    /// Image decoding error.
    #[error("Image decode error: {0}")]
    ImageDecode(String),

    // ========================================================================
    // GPU Resource Acquisition Errors
    // ========================================================================
    /// The host device declined a buffer allocation.
    #[error("Failed to create GPU buffer `{label}`: {reason}")]
    BufferCreate {
        /// Debug label of the requested buffer
        label: String,
        /// Device-reported reason
        reason: String,
    },

    /// The host device declined a texture allocation.
    #[error("Failed to create GPU texture `{label}`: {reason}")]
    TextureCreate {
        /// Debug label of the requested texture
        label: String,
        /// Device-reported reason
        reason: String,
    },
}

impl From<image::ImageError> for ViewerError {
    fn from(err: image::ImageError) -> Self {
        ViewerError::ImageDecode(err.to_string())
    }
}

/// Alias for `Result<T, ViewerError>`.
pub type Result<T> = std::result::Result<T, ViewerError>;
