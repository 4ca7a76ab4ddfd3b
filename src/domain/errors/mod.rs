// Domain errors - Error types for the domain layer

use thiserror::Error;

use crate::domain::model::ClipId;

/// Domain-specific error types
#[derive(Error, Debug)]
pub enum DomainError {
    /// Invalid arguments provided
    #[error("Bad arguments: {0}")]
    BadArgs(String),

    /// No clip with the given id exists in the timeline
    #[error("Clip not found: {0}")]
    ClipNotFound(ClipId),

    /// Probed or requested duration cannot back a clip
    #[error("Invalid duration: {0} (must be a positive number of seconds)")]
    InvalidDuration(f64),

    /// Export requested with nothing to render
    #[error("Nothing to export: the timeline is empty")]
    EmptyTimeline,

    /// Metadata probe failed
    #[error("Probe failed: {0}")]
    ProbeFailed(String),

    /// Thumbnail or waveform generation failed
    #[error("Preview generation failed: {0}")]
    PreviewFailed(String),

    /// Render service reported an error
    #[error("Render failed: {0}")]
    RenderFailed(String),

    /// No file picking facility is available
    #[error("File picker unavailable: {0}")]
    PickerUnavailable(String),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for domain operations
pub type DomainResult<T> = std::result::Result<T, DomainError>;
