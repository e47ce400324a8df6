//! Video download using yt-dlp.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, warn};

use crate::error::{MediaError, MediaResult};

/// Default format selection: best quality up to 1440p.
pub const DEFAULT_FORMAT: &str = "bestvideo[height<=1440]+bestaudio/best[height<=1440]/best";

/// Download a video from a URL into `output_dir` using yt-dlp.
///
/// The file is named after the video title. Returns the path of the
/// downloaded file after sanitizing shell-hostile characters out of its
/// name.
///
/// # Arguments
///
/// * `url` - Video URL (YouTube, Vimeo, etc.)
/// * `output_dir` - Directory to save into
/// * `format` - yt-dlp format selector, [`DEFAULT_FORMAT`] when `None`
/// * `cookies` - Optional Netscape cookies file for authenticated sites
pub async fn download_video(
    url: &str,
    output_dir: impl AsRef<Path>,
    format: Option<&str>,
    cookies: Option<&Path>,
) -> MediaResult<PathBuf> {
    let output_dir = output_dir.as_ref();

    which::which("yt-dlp").map_err(|_| MediaError::YtDlpNotFound)?;

    tokio::fs::create_dir_all(output_dir).await?;

    let template = output_dir.join("%(title)s.%(ext)s");
    let template_str = template.to_string_lossy().to_string();
    let format = format.unwrap_or(DEFAULT_FORMAT);

    info!(url, format, "Downloading video");

    let mut args = vec![
        "--no-playlist".to_string(),
        "--no-simulate".to_string(),
        // Report the final path on stdout so we don't have to guess the
        // title-derived filename.
        "--print".to_string(),
        "after_move:filepath".to_string(),
        "-f".to_string(),
        format.to_string(),
        "-o".to_string(),
        template_str,
    ];
    if let Some(cookies) = cookies {
        args.push("--cookies".to_string());
        args.push(cookies.to_string_lossy().to_string());
    }
    args.push(url.to_string());

    let output = Command::new("yt-dlp")
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MediaError::download_failed(format!(
            "yt-dlp exited with {:?}: {}",
            output.status.code(),
            stderr.trim()
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let path = stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| MediaError::download_failed("yt-dlp reported no output file"))?;

    if !path.exists() {
        return Err(MediaError::download_failed(format!(
            "downloaded file missing: {}",
            path.display()
        )));
    }

    sanitize_downloaded_file(path).await
}

/// Replace shell-hostile characters in a filename.
///
/// Spaces, `&`, and `|` in title-derived names break downstream tools
/// that receive the path on a command line.
pub fn sanitize_filename(name: &str) -> String {
    name.replace([' ', '&', '|'], "_")
}

/// Rename the file if its name contains shell-hostile characters.
async fn sanitize_downloaded_file(path: PathBuf) -> MediaResult<PathBuf> {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return Ok(path);
    };

    let sanitized = sanitize_filename(name);
    if sanitized == name {
        return Ok(path);
    }

    let new_path = path.with_file_name(&sanitized);
    warn!(
        from = %path.display(),
        to = %new_path.display(),
        "Renaming download to a shell-safe filename"
    );
    tokio::fs::rename(&path, &new_path).await?;
    Ok(new_path)
}
