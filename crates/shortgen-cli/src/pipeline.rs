//! Per-request generation pipeline.
//!
//! Stages run strictly sequentially: each stage's probed resolution or
//! timing feeds the next planning step. Intermediate layer files live in
//! a scoped temp directory and are removed on every exit path.

use std::path::{Path, PathBuf};

use shortgen_media::{
    blur_video, center_crop_rect, compose_mobile_video, crop_video, download_video,
    even_dimensions, probe_video, square_crop_rect, ComposeInputs, ComposeOptions,
};
use shortgen_models::{EncodingConfig, Rect, Resolution, TargetDimensions};
use shortgen_speech::{transcribe_with_model, SpeechSynthesizer};
use tracing::{info, warn};

use crate::cli::GenerateArgs;
use crate::config::AppConfig;
use crate::error::{PipelineError, PipelineResult};

/// Facecam height as a fraction of the canvas height.
pub const FACECAM_HEIGHT_RATIO: f64 = 0.21875;

/// Vertical inset of the content box relative to the canvas width.
pub const CONTENT_BOX_HEIGHT_INSET: u32 = 700;

/// Generate a vertical social video.
pub async fn generate(args: &GenerateArgs, config: &AppConfig) -> PipelineResult<PathBuf> {
    tokio::fs::create_dir_all(&config.work_dir).await?;
    let workdir = tempfile::tempdir_in(&config.work_dir)?;
    let work = workdir.path();

    let source = acquire_source(&args.source, work, args.cookies.as_deref()).await?;

    let src_info = probe_video(&source).await?;
    let src_res = src_info.resolution();
    info!(source = %source.display(), resolution = %src_res, "Source ready");

    let canvas = even_dimensions(args.width, args.height);

    // Facecam layer
    let mut facecam = None;
    if !args.no_facecam {
        match args.face {
            Some(face) => {
                if !face.contained_in(src_res) {
                    return Err(PipelineError::InvalidFaceRegion {
                        face,
                        frame: src_res,
                    });
                }
                let dims = facecam_dimensions(canvas.height, face);
                let path = work.join("face.mp4");
                crop_video(&source, &path, face, dims).await?;
                facecam = Some(path);
            }
            None => warn!("No face region supplied; composing without a facecam"),
        }
    }

    // Background layer: centered 9:16 crop filling the canvas
    let bg_rect = center_crop_rect(src_res, 9, 16)?;
    let background = work.join("background.mp4");
    crop_video(&source, &background, bg_rect, canvas).await?;

    // Content layer: centered square, optionally biased by the caller
    let box_rect = offset_rect(
        square_crop_rect(src_res)?,
        args.x_offset,
        args.y_offset,
        src_res,
    );
    let box_dims = even_dimensions(
        canvas.width,
        canvas.width.saturating_sub(CONTENT_BOX_HEIGHT_INSET),
    );
    let content = work.join("box.mp4");
    crop_video(&source, &content, box_rect, box_dims).await?;

    // Voiceover and its captions
    let mut voiceover = None;
    let mut captions = Vec::new();
    if let Some(narration) = &args.narrate {
        let voice_path = work.join("voice.mp3");
        let synth = SpeechSynthesizer::new(config.voice.clone());
        synth.synthesize(narration, &voice_path).await?;
        captions = transcribe_with_model(&voice_path, work, &config.whisper_model).await?;
        voiceover = Some(voice_path);
    }

    let output = output_path(args);
    let inputs = ComposeInputs {
        background,
        content,
        facecam,
        static_images: Vec::new(),
        watermark: args.watermark.clone(),
        voiceover,
    };
    let mut encoding = EncodingConfig::default();
    if args.nvenc {
        encoding = encoding.with_nvenc();
    }
    let options = ComposeOptions {
        title: args.title.clone(),
        captions,
        caption_offset: args.caption_offset,
        blur_strength: args.blur,
        fps: args.fps,
        facecam_y: args.facecam_y,
        encoding,
        ..Default::default()
    };

    compose_mobile_video(&inputs, &options, &output).await?;

    info!(output = %output.display(), "Video generated");
    Ok(output)
}

/// Blur the centered 9:16 portion of a clip.
pub async fn blur(input: &Path, output: &Path, strength: u32) -> PipelineResult<()> {
    require_file(input)?;
    blur_video(input, output, strength).await?;
    Ok(())
}

/// Extract the centered square of a clip at its native side length.
pub async fn crop_box(input: &Path, output: &Path) -> PipelineResult<()> {
    require_file(input)?;
    let src_res = probe_video(input).await?.resolution();
    let rect = square_crop_rect(src_res)?;
    crop_video(input, output, rect, even_dimensions(rect.w, rect.h)).await?;
    Ok(())
}

/// Place an already-square clip over its own blurred 9:16 background.
pub async fn blur_box(
    input: &Path,
    output: &Path,
    blur_strength: u32,
    width: u32,
    height: u32,
    fps: u32,
    config: &AppConfig,
) -> PipelineResult<()> {
    require_file(input)?;
    tokio::fs::create_dir_all(&config.work_dir).await?;
    let workdir = tempfile::tempdir_in(&config.work_dir)?;

    let src_res = probe_video(input).await?.resolution();
    let bg_rect = center_crop_rect(src_res, 9, 16)?;
    let background = workdir.path().join("background.mp4");
    crop_video(input, &background, bg_rect, even_dimensions(width, height)).await?;

    let options = ComposeOptions {
        blur_strength,
        fps,
        ..Default::default()
    };
    compose_mobile_video(&ComposeInputs::new(background, input), &options, output).await?;
    Ok(())
}

/// Download remote sources into the workspace; accept local files as-is.
async fn acquire_source(
    source: &str,
    work: &Path,
    cookies: Option<&Path>,
) -> PipelineResult<PathBuf> {
    if source.starts_with("http://") || source.starts_with("https://") {
        Ok(download_video(source, work, None, cookies).await?)
    } else {
        let path = PathBuf::from(source);
        require_file(&path)?;
        Ok(path)
    }
}

fn require_file(path: &Path) -> PipelineResult<()> {
    if !path.exists() {
        return Err(PipelineError::SourceNotFound(path.to_path_buf()));
    }
    Ok(())
}

/// Facecam render dimensions: a fixed fraction of the canvas height, with
/// width following the face region's aspect ratio.
fn facecam_dimensions(canvas_height: u32, face: Rect) -> TargetDimensions {
    let target_h = (canvas_height as f64 * FACECAM_HEIGHT_RATIO) as u32;
    let target_w = (target_h as f64 * face.w as f64 / face.h as f64) as u32;
    even_dimensions(target_w, target_h)
}

/// Shift a rectangle by the caller's bias, clamped to stay inside the
/// source frame.
fn offset_rect(rect: Rect, dx: i64, dy: i64, source: Resolution) -> Rect {
    let max_x = (source.width - rect.w) as i64;
    let max_y = (source.height - rect.h) as i64;
    Rect::new(
        (rect.x as i64 + dx).clamp(0, max_x) as u32,
        (rect.y as i64 + dy).clamp(0, max_y) as u32,
        rect.w,
        rect.h,
    )
}

/// Derive the output path from the explicit argument or the title.
fn output_path(args: &GenerateArgs) -> PathBuf {
    if let Some(output) = &args.output {
        return output.clone();
    }
    match &args.title {
        Some(title) if !title.trim().is_empty() => {
            PathBuf::from(format!("{}.mp4", shortgen_media::sanitize_filename(title.trim())))
        }
        _ => PathBuf::from("output.mp4"),
    }
}
