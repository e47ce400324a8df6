//! Single-input video transforms.
//!
//! Thin helpers for producing intermediate layer files: crop+scale,
//! scale, and the blurred 9:16 background preview. Each builds a plain
//! `-filter:v` chain from the same filter primitives the plan emitter
//! uses.

use std::path::Path;

use shortgen_models::{Rect, TargetDimensions};
use tracing::debug;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;
use crate::geometry::center_crop_rect;
use crate::plan::FilterOp;
use crate::probe::probe_resolution;

/// Crop `rect` out of the input and scale the result to `target`.
pub async fn crop_video(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    rect: Rect,
    target: TargetDimensions,
) -> MediaResult<()> {
    let chain = format!(
        "{},{}",
        FilterOp::crop("in", "cropped", rect.w, rect.h, rect.x, rect.y).render_filter(),
        FilterOp::scale("cropped", "out", target.width, target.height).render_filter(),
    );
    debug!(filter = %chain, "Cropping video");

    let cmd = FfmpegCommand::new(input, output).video_filter(chain);
    FfmpegRunner::new().run(&cmd).await
}

/// Scale the input to exact dimensions.
pub async fn scale_video(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    target: TargetDimensions,
) -> MediaResult<()> {
    let chain = FilterOp::scale("in", "out", target.width, target.height).render_filter();
    let cmd = FfmpegCommand::new(input, output).video_filter(chain);
    FfmpegRunner::new().run(&cmd).await
}

/// Extract the centered 9:16 portion of the input and blur it.
pub async fn blur_video(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    blur_strength: u32,
) -> MediaResult<()> {
    let source = probe_resolution(input.as_ref()).await?;
    let rect = center_crop_rect(source, 9, 16)?;

    let chain = format!(
        "{},{}",
        FilterOp::crop("in", "cropped", rect.w, rect.h, rect.x, rect.y).render_filter(),
        FilterOp::boxblur("cropped", "out", blur_strength).render_filter(),
    );
    debug!(filter = %chain, "Blurring video");

    let cmd = FfmpegCommand::new(input, output).video_filter(chain);
    FfmpegRunner::new().run(&cmd).await
}
