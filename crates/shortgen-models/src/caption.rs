//! Timed caption spans.

use serde::{Deserialize, Serialize};

/// A timed caption span produced by the transcription collaborator.
///
/// Spans are assumed non-overlapping and ordered by start time as emitted
/// by the transcriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionSpan {
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds (exclusive)
    pub end: f64,
    /// Spoken text within the span
    pub text: String,
}

impl CaptionSpan {
    /// Create a new caption span.
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Check that the span has a positive duration.
    pub fn is_valid(&self) -> bool {
        self.start >= 0.0 && self.end > self.start
    }

    /// Span duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}
