//! Voiceover transcription.
//!
//! Runs the whisper CLI over an audio file and parses the resulting VTT
//! into timed caption spans for the caption planner.

use std::path::Path;
use std::process::Stdio;

use regex::Regex;
use shortgen_models::CaptionSpan;
use tokio::process::Command;
use tracing::{info, warn};

use crate::error::{SpeechError, SpeechResult};

/// Default whisper model.
pub const DEFAULT_WHISPER_MODEL: &str = "base";

/// Transcribe an audio file into timed caption spans.
///
/// `workdir` receives whisper's output files; the caller owns its
/// lifetime (a scoped temp directory in the pipeline).
pub async fn transcribe(audio_path: &Path, workdir: &Path) -> SpeechResult<Vec<CaptionSpan>> {
    transcribe_with_model(audio_path, workdir, DEFAULT_WHISPER_MODEL).await
}

/// Transcribe with a specific whisper model.
pub async fn transcribe_with_model(
    audio_path: &Path,
    workdir: &Path,
    model: &str,
) -> SpeechResult<Vec<CaptionSpan>> {
    which::which("whisper").map_err(|_| SpeechError::ToolNotFound("whisper"))?;

    tokio::fs::create_dir_all(workdir).await?;

    info!(audio = %audio_path.display(), model, "Transcribing voiceover");

    let output = Command::new("whisper")
        .arg(audio_path)
        .args(["--model", model])
        .args(["--output_format", "vtt"])
        .arg("--output_dir")
        .arg(workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SpeechError::transcription_failed(format!(
            "whisper exited with {:?}: {}",
            output.status.code(),
            stderr.trim()
        )));
    }

    let stem = audio_path
        .file_stem()
        .ok_or_else(|| SpeechError::transcription_failed("audio path has no file stem"))?;
    let vtt_path = workdir.join(stem).with_extension("vtt");

    let content = tokio::fs::read_to_string(&vtt_path).await.map_err(|e| {
        SpeechError::transcription_failed(format!(
            "missing transcript {}: {e}",
            vtt_path.display()
        ))
    })?;

    let spans = parse_vtt(&content);
    if spans.is_empty() {
        warn!(vtt = %vtt_path.display(), "Transcript contained no usable cues");
    }
    Ok(spans)
}

/// Parse VTT content into caption spans.
///
/// Cues with empty text or non-positive duration are skipped.
pub fn parse_vtt(content: &str) -> Vec<CaptionSpan> {
    let cue_pattern = Regex::new(
        r"^((?:\d{2}:)?\d{2}:\d{2}\.\d{3})\s+-->\s+((?:\d{2}:)?\d{2}:\d{2}\.\d{3})",
    )
    .expect("valid cue regex");
    let tag_pattern = Regex::new(r"<[^>]+>").expect("valid tag regex");

    let mut spans = Vec::new();
    let mut current: Option<(f64, f64, String)> = None;

    for line in content.lines() {
        let line = tag_pattern.replace_all(line.trim(), "").to_string();

        if let Some(caps) = cue_pattern.captures(&line) {
            flush_cue(&mut spans, current.take());
            let start = parse_timestamp(&caps[1]);
            let end = parse_timestamp(&caps[2]);
            current = Some((start, end, String::new()));
            continue;
        }

        if line.is_empty() || line == "WEBVTT" {
            flush_cue(&mut spans, current.take());
            continue;
        }

        // Skip bare cue numbers
        if line.chars().all(|c| c.is_numeric()) {
            continue;
        }

        if let Some((_, _, text)) = current.as_mut() {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(&line);
        }
    }
    flush_cue(&mut spans, current.take());

    spans
}

fn flush_cue(spans: &mut Vec<CaptionSpan>, cue: Option<(f64, f64, String)>) {
    if let Some((start, end, text)) = cue {
        let span = CaptionSpan::new(start, end, text.trim());
        if span.is_valid() && !span.text.is_empty() {
            spans.push(span);
        }
    }
}

/// Parse a `[HH:]MM:SS.mmm` timestamp into seconds.
fn parse_timestamp(ts: &str) -> f64 {
    let mut seconds = 0.0;
    for part in ts.split(':') {
        seconds = seconds * 60.0 + part.parse::<f64>().unwrap_or(0.0);
    }
    seconds
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_VTT: &str = "\
WEBVTT

00:00.000 --> 00:02.500
Hello there

00:02.500 --> 00:05.000
this is a <b>test</b>
of two lines

00:05.000 --> 00:05.000
zero duration dropped

01:00:01.000 --> 01:00:02.000
hour mark
";

    #[test]
    fn test_parse_timestamp() {
        assert!((parse_timestamp("00:02.500") - 2.5).abs() < 1e-9);
        assert!((parse_timestamp("01:00:01.000") - 3601.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_vtt_spans() {
        let spans = parse_vtt(SAMPLE_VTT);
        assert_eq!(spans.len(), 3);

        assert_eq!(spans[0], CaptionSpan::new(0.0, 2.5, "Hello there"));
        assert_eq!(
            spans[1],
            CaptionSpan::new(2.5, 5.0, "this is a test of two lines")
        );
        assert_eq!(spans[2], CaptionSpan::new(3601.0, 3602.0, "hour mark"));
    }

    #[test]
    fn test_spans_ordered_and_positive() {
        let spans = parse_vtt(SAMPLE_VTT);
        for span in &spans {
            assert!(span.is_valid());
        }
        for pair in spans.windows(2) {
            assert!(pair[0].start <= pair[1].start);
        }
    }

    #[test]
    fn test_empty_content() {
        assert!(parse_vtt("").is_empty());
        assert!(parse_vtt("WEBVTT\n\n").is_empty());
    }
}
