//! # Error Types

/// Errors from rawbpe operations.
///
/// The four training stopping conditions and the merged-token collision
/// guard are not errors; training ends early with a valid, possibly
/// smaller-than-requested result.
#[derive(Debug, thiserror::Error)]
pub enum RawBpeError {
    /// Vocab size exceeds the capacity of the target token type.
    #[error("vocab size ({size}) exceeds token type capacity")]
    VocabSizeOverflow {
        /// The vocab size that exceeded the capacity.
        size: usize,
    },

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Parse error (hex bytes, merge lines, etc.)
    #[error("parse error: {0}")]
    Parse(String),
}

/// Result type for rawbpe operations.
pub type RbResult<T> = core::result::Result<T, RawBpeError>;
