//! Error types for the wxloop pipeline.

use thiserror::Error;

/// Result type alias using WxError.
pub type WxResult<T> = Result<T, WxError>;

/// Primary error type for pipeline operations.
#[derive(Debug, Error)]
pub enum WxError {
    // === Time window errors ===
    #[error("Invalid time range: {0}")]
    InvalidRange(String),

    // === Archive errors ===
    #[error("No archive product for {0}")]
    NotFound(String),

    #[error("Archive access failed: {0}")]
    TransientFetch(String),

    // === Data errors ===
    #[error("Failed to decode product: {0}")]
    Decode(String),

    #[error("Invalid product selector: {0}")]
    InvalidSelector(String),

    // === Rendering errors ===
    #[error("Rendering failed: {0}")]
    Render(String),

    #[error("Animation requested with zero frames")]
    EmptySequence,

    // === Infrastructure errors ===
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
