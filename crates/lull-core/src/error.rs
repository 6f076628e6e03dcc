//! Error types for Lull.

use thiserror::Error;

/// Result type alias using Lull's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Lull.
#[derive(Error, Debug)]
pub enum Error {
    // Audio device / stream errors
    #[error("Audio output error: {0}")]
    AudioOutput(String),

    #[error("Audio engine is not running")]
    EngineUnavailable,

    // Source errors
    #[error("Failed to create sound source: {0}")]
    SourceCreation(String),

    #[error("Failed to load '{path}': {reason}")]
    AudioDecode { path: String, reason: String },

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Generic errors
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Build a decode error that names the failing resource.
    pub fn decode(path: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::AudioDecode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns true if this failure is scoped to a single channel.
    ///
    /// Channel-scoped failures are surfaced on the affected channel and
    /// leave the rest of the mixer running; anything else disables playback
    /// for the whole attempt.
    pub const fn is_channel_scoped(&self) -> bool {
        matches!(
            self,
            Self::SourceCreation(_)
                | Self::AudioDecode { .. }
                | Self::UnsupportedFormat(_)
                | Self::InvalidArgument(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_names_path() {
        let err = Error::decode("assets/sounds/rain.ogg", "not found");
        assert_eq!(
            err.to_string(),
            "Failed to load 'assets/sounds/rain.ogg': not found"
        );
    }

    #[test]
    fn test_error_channel_scoped() {
        assert!(Error::decode("x.ogg", "bad").is_channel_scoped());
        assert!(Error::SourceCreation("oom".into()).is_channel_scoped());
        assert!(!Error::AudioOutput("no device".into()).is_channel_scoped());
        assert!(!Error::EngineUnavailable.is_channel_scoped());
    }
}
