//! Error handling for Schroeder
//!
//! Only the I/O boundary and configuration can fail. Once an engine is
//! constructed, processing a buffer is total.

use thiserror::Error;

/// Result type alias for Schroeder operations
pub type Result<T> = std::result::Result<T, ReverbError>;

/// Main error type for Schroeder operations
#[derive(Error, Debug)]
pub enum ReverbError {
    // Decoder errors
    #[error("Cannot open source '{path}': {reason}")]
    SourceOpen {
        path: String,
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    // Encoder errors
    #[error("Cannot open destination '{path}': {reason}")]
    DestinationOpen {
        path: String,
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Failed writing '{path}'")]
    EncodeFailed {
        path: String,
        #[source]
        source: hound::Error,
    },

    // Configuration errors
    #[error("Invalid parameter {param} = {value} (expected {expected})")]
    InvalidParameter {
        param: String,
        value: String,
        expected: String,
    },

    #[error("Delay length {length} of {filter} exceeds delay-line capacity {capacity}")]
    DelayCapacity {
        filter: String,
        length: usize,
        capacity: usize,
    },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ReverbError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            ReverbError::SourceOpen { .. } => "SOURCE_OPEN",
            ReverbError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            ReverbError::DestinationOpen { .. } => "DESTINATION_OPEN",
            ReverbError::EncodeFailed { .. } => "ENCODE_FAILED",
            ReverbError::InvalidParameter { .. } => "INVALID_PARAMETER",
            ReverbError::DelayCapacity { .. } => "DELAY_CAPACITY",
            ReverbError::Io(_) => "IO_ERROR",
            ReverbError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if this error comes from the settings rather than the audio
    ///
    /// Configuration errors surface before any audio is decoded. Every
    /// error, configuration or not, aborts the render.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            ReverbError::InvalidParameter { .. } | ReverbError::DelayCapacity { .. }
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            ReverbError::SourceOpen { .. } => vec![
                "Check the input path is correct",
                "Check if the file plays in another application",
            ],
            ReverbError::UnsupportedFormat { .. } => vec![
                "Convert the input to a stereo WAV or MP3 file",
                "Supported formats: WAV (int or float), MP3",
            ],
            ReverbError::DestinationOpen { .. } | ReverbError::EncodeFailed { .. } => vec![
                "Check the output directory exists and is writable",
                "Free up disk space",
            ],
            ReverbError::InvalidParameter { .. } => vec![
                "Run 'schroeder-cli show-config' to inspect the resolved settings",
            ],
            ReverbError::DelayCapacity { .. } => vec![
                "Increase tuning.capacity in the configuration file",
                "Use shorter delay lengths for high sample rates",
            ],
            _ => vec![],
        }
    }
}
