//! Mobile video composition.
//!
//! Assembles pre-cropped layer files into the final vertical video:
//! probes each layer, builds the layer stack, plans text overlays and
//! caption chunks, emits the composition plan, and hands the serialized
//! plan to FFmpeg.

use std::path::{Path, PathBuf};

use shortgen_models::{CaptionSpan, EncodingConfig};
use tracing::info;

use crate::captions::{plan_captions, DEFAULT_CHUNK_WORDS};
use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;
use crate::layers::{build_stack, Layer, LayerKind};
use crate::overlay::{plan_overlay, Anchor, DEFAULT_LINE_SPACING, DEFAULT_WRAP_WIDTH, TOP_BASE_OFFSET};
use crate::plan::{emit_plan, PlanOptions, VoiceoverMix};
use crate::probe::probe_resolution;

/// Default gain applied to the voiceover before merging.
pub const DEFAULT_VOICEOVER_VOLUME: f64 = 3.0;

/// A static image overlay with an explicit placement.
#[derive(Debug, Clone)]
pub struct ImageOverlay {
    pub path: PathBuf,
    pub x: i64,
    pub y: i64,
}

/// Layer source files for one composition.
#[derive(Debug, Clone)]
pub struct ComposeInputs {
    /// Full-canvas backdrop (blurred during composition)
    pub background: PathBuf,
    /// Primary content box
    pub content: PathBuf,
    /// Optional picture-in-picture facecam
    pub facecam: Option<PathBuf>,
    /// Static image overlays, drawn above the facecam
    pub static_images: Vec<ImageOverlay>,
    /// Optional watermark image, drawn last before text
    pub watermark: Option<PathBuf>,
    /// Optional voiceover audio track
    pub voiceover: Option<PathBuf>,
}

impl ComposeInputs {
    /// Composition from just background and content.
    pub fn new(background: impl Into<PathBuf>, content: impl Into<PathBuf>) -> Self {
        Self {
            background: background.into(),
            content: content.into(),
            facecam: None,
            static_images: Vec::new(),
            watermark: None,
            voiceover: None,
        }
    }
}

/// Composition options.
#[derive(Debug, Clone)]
pub struct ComposeOptions {
    /// Top banner text
    pub title: Option<String>,
    /// Timed caption spans from the transcriber
    pub captions: Vec<CaptionSpan>,
    /// Lead-in delay added to every caption chunk
    pub caption_offset: f64,
    /// Maximum words per caption chunk
    pub chunk_word_count: usize,
    /// Background blur radius
    pub blur_strength: u32,
    /// Output frame rate
    pub fps: u32,
    /// Facecam vertical position (0 = top of canvas)
    pub facecam_y: i64,
    /// Watermark placement in canvas coordinates
    pub watermark_pos: (i64, i64),
    /// Voiceover gain before merging
    pub voiceover_volume: f64,
    /// Output encoder settings
    pub encoding: EncodingConfig,
}

impl Default for ComposeOptions {
    fn default() -> Self {
        Self {
            title: None,
            captions: Vec::new(),
            caption_offset: 0.0,
            chunk_word_count: DEFAULT_CHUNK_WORDS,
            blur_strength: 20,
            fps: 60,
            facecam_y: 0,
            watermark_pos: (10, 1720),
            voiceover_volume: DEFAULT_VOICEOVER_VOLUME,
            encoding: EncodingConfig::default(),
        }
    }
}

/// Compose the final vertical video from pre-cropped layer files.
pub async fn compose_mobile_video(
    inputs: &ComposeInputs,
    options: &ComposeOptions,
    output: &Path,
) -> MediaResult<()> {
    let canvas = probe_resolution(&inputs.background).await?;
    let content_res = probe_resolution(&inputs.content).await?;

    let mut files: Vec<&Path> = vec![&inputs.background, &inputs.content];
    let background = Layer::new(LayerKind::Background, 0, canvas);
    let content = Layer::new(LayerKind::Content, 1, content_res);

    let mut optional_layers = Vec::new();
    if let Some(facecam) = &inputs.facecam {
        let res = probe_resolution(facecam).await?;
        optional_layers
            .push(Layer::new(LayerKind::Facecam, files.len(), res).at(0, options.facecam_y));
        files.push(facecam);
    }
    for image in &inputs.static_images {
        let res = probe_resolution(&image.path).await?;
        optional_layers
            .push(Layer::new(LayerKind::StaticImage, files.len(), res).at(image.x, image.y));
        files.push(&image.path);
    }
    if let Some(watermark) = &inputs.watermark {
        let res = probe_resolution(watermark).await?;
        let (x, y) = options.watermark_pos;
        optional_layers.push(Layer::new(LayerKind::Watermark, files.len(), res).at(x, y));
        files.push(watermark);
    }

    let stack = build_stack(canvas, Some(background), Some(content), optional_layers)?;

    let mut overlays = Vec::new();
    if let Some(title) = &options.title {
        let overlay = plan_overlay(
            title,
            DEFAULT_WRAP_WIDTH,
            Anchor::Top,
            DEFAULT_LINE_SPACING,
            TOP_BASE_OFFSET,
        );
        if !overlay.is_empty() {
            overlays.push(overlay);
        }
    }

    let chunks = plan_captions(
        &options.captions,
        options.chunk_word_count,
        options.caption_offset,
    );

    let voiceover = inputs.voiceover.as_ref().map(|path| {
        let mix = VoiceoverMix {
            input: files.len(),
            volume: options.voiceover_volume,
        };
        files.push(path);
        mix
    });

    let plan = emit_plan(
        &stack,
        &overlays,
        &chunks,
        &PlanOptions {
            blur_strength: options.blur_strength,
            voiceover,
        },
    )?;

    info!(
        canvas = %canvas,
        layers = stack.len(),
        text_lines = overlays.iter().map(|o| o.lines.len()).sum::<usize>(),
        caption_chunks = chunks.len(),
        voiceover = voiceover.is_some(),
        "Composing mobile video"
    );

    let mut cmd = FfmpegCommand::new(files[0], output);
    for file in &files[1..] {
        cmd = cmd.add_input(file);
    }
    let cmd = cmd
        .filter_complex(plan.to_filter_complex())
        .output_args(plan.map_args())
        .fps(options.fps)
        .output_args(options.encoding.to_ffmpeg_args())
        .pixel_format("yuv420p");

    FfmpegRunner::new().run(&cmd).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = ComposeOptions::default();
        assert_eq!(options.blur_strength, 20);
        assert_eq!(options.fps, 60);
        assert_eq!(options.chunk_word_count, 3);
        assert!((options.voiceover_volume - 3.0).abs() < f64::EPSILON);
        assert_eq!(options.facecam_y, 0);
    }
}
