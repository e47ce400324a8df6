//! Speech collaborator error types.

use thiserror::Error;

/// Result type for speech operations.
pub type SpeechResult<T> = Result<T, SpeechError>;

/// Errors from voiceover synthesis and transcription.
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("No text provided for synthesis")]
    EmptyText,

    #[error("API key required for provider {0}")]
    MissingApiKey(&'static str),

    #[error("Synthesis failed ({provider}): {message}")]
    SynthesisFailed {
        provider: &'static str,
        message: String,
    },

    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("{0} not found in PATH")]
    ToolNotFound(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpeechError {
    /// Create a synthesis failure error.
    pub fn synthesis_failed(provider: &'static str, message: impl Into<String>) -> Self {
        Self::SynthesisFailed {
            provider,
            message: message.into(),
        }
    }

    /// Create a transcription failure error.
    pub fn transcription_failed(message: impl Into<String>) -> Self {
        Self::TranscriptionFailed(message.into())
    }
}
