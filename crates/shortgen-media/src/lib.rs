#![deny(unreachable_patterns)]
//! Composition layout engine and FFmpeg CLI wrapper.
//!
//! This crate provides:
//! - Crop geometry (centered aspect/square crops, even render targets)
//! - Layer stack building with deterministic z-order and placement
//! - Text overlay and caption timeline planning
//! - Composition plan emission and FFmpeg filter graph serialization
//! - Type-safe FFmpeg command building with progress parsing
//! - ffprobe and yt-dlp wrappers

pub mod captions;
pub mod command;
pub mod compose;
pub mod download;
pub mod error;
pub mod geometry;
pub mod layers;
pub mod overlay;
pub mod plan;
pub mod probe;
pub mod progress;
pub mod transform;

pub use captions::{plan_captions, CaptionChunk, DEFAULT_CHUNK_WORDS};
pub use command::{check_ffmpeg, check_ffprobe, FfmpegCommand, FfmpegRunner};
pub use compose::{compose_mobile_video, ComposeInputs, ComposeOptions, ImageOverlay};
pub use download::{download_video, sanitize_filename, DEFAULT_FORMAT};
pub use error::{MediaError, MediaResult};
pub use geometry::{center_crop_rect, even_dimensions, square_crop_rect};
pub use layers::{build_stack, Layer, LayerKind};
pub use overlay::{plan_overlay, Anchor, OverlayStyle, TextOverlay};
pub use plan::{emit_plan, AudioOut, CompositionPlan, FilterOp, OpKind, PlanOptions, VoiceoverMix};
pub use probe::{probe_resolution, probe_video, VideoInfo};
pub use progress::{FfmpegProgress, ProgressCallback};
pub use transform::{blur_video, crop_video, scale_video};
