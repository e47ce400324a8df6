//! Shared data models for the ShortGen pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Pixel geometry (resolutions, crop rectangles, render targets)
//! - Timed caption spans
//! - Encoding configuration
//! - Voiceover provider configuration

pub mod caption;
pub mod encoding;
pub mod geometry;
pub mod voice;

// Re-export common types
pub use caption::CaptionSpan;
pub use encoding::EncodingConfig;
pub use geometry::{Rect, Resolution, TargetDimensions};
pub use voice::{TtsProvider, VoiceConfig};
