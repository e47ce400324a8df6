//! Pipeline error types.

use std::path::PathBuf;
use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Source file not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Face region {face:?} does not fit inside the {frame} source frame")]
    InvalidFaceRegion {
        face: shortgen_models::Rect,
        frame: shortgen_models::Resolution,
    },

    #[error("Media error: {0}")]
    Media(#[from] shortgen_media::MediaError),

    #[error("Speech error: {0}")]
    Speech(#[from] shortgen_speech::SpeechError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
