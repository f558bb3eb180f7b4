use thiserror::Error;

/// Result type for outline operations
pub type Result<T> = std::result::Result<T, OutlineError>;

/// Errors raised by the fallible surfaces of the outline pipeline.
///
/// Extraction and normalization never return these: they absorb failures
/// into the placeholder tree.
#[derive(Error, Debug)]
pub enum OutlineError {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Marker pattern could not be compiled
    #[error("Invalid payload marker: {0}")]
    InvalidMarker(#[from] regex::Error),

    /// Source document is empty
    #[error("Empty document provided")]
    EmptyDocument,
}

impl OutlineError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

/// Why a structured payload could not be isolated from model output
#[derive(Error, Debug)]
pub enum ExtractError {
    /// No marker pair and no direct payload
    #[error("no structured payload found")]
    MissingPayload,

    /// Marker pair present but nothing between them
    #[error("payload marker is empty")]
    EmptyPayload,

    /// Payload text is not valid JSON
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Payload decoded to a scalar instead of an object or array
    #[error("payload is not an object or array")]
    NotStructured,
}
