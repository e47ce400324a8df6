//! Command-line interface definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use shortgen_models::Rect;

#[derive(Debug, Parser)]
#[command(name = "shortgen", version, about = "Short-form vertical video generator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a vertical social video from a source clip or URL
    Generate(GenerateArgs),

    /// Blur the centered 9:16 portion of a clip
    Blur {
        input: PathBuf,
        #[arg(long, default_value = "output.mp4")]
        output: PathBuf,
        /// Box blur radius
        #[arg(long, default_value_t = 15)]
        strength: u32,
    },

    /// Extract the centered square of a clip
    CropBox {
        input: PathBuf,
        #[arg(long, default_value = "output.mp4")]
        output: PathBuf,
    },

    /// Place an already-square clip over its own blurred 9:16 background
    BlurBox {
        input: PathBuf,
        #[arg(long, default_value = "output.mp4")]
        output: PathBuf,
        #[arg(long, default_value_t = 20)]
        blur: u32,
        #[arg(long, default_value_t = 1080)]
        width: u32,
        #[arg(long, default_value_t = 1920)]
        height: u32,
        #[arg(long, default_value_t = 60)]
        fps: u32,
    },
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Local path or URL of the source clip
    pub source: String,

    /// Output file (defaults to the sanitized title, or output.mp4)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Top banner text
    #[arg(long)]
    pub title: Option<String>,

    /// Narration text synthesized into a voiceover with on-screen captions
    #[arg(long)]
    pub narrate: Option<String>,

    /// Face region in source pixels, as x,y,w,h
    #[arg(long, value_parser = parse_face_rect)]
    pub face: Option<Rect>,

    /// Compose without a facecam layer
    #[arg(long)]
    pub no_facecam: bool,

    /// Canvas width
    #[arg(long, default_value_t = 2160)]
    pub width: u32,

    /// Canvas height
    #[arg(long, default_value_t = 3840)]
    pub height: u32,

    /// Output frame rate
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Background blur radius
    #[arg(long, default_value_t = 20)]
    pub blur: u32,

    /// Horizontal bias of the content box crop
    #[arg(long, default_value_t = 0)]
    pub x_offset: i64,

    /// Vertical bias of the content box crop
    #[arg(long, default_value_t = 0)]
    pub y_offset: i64,

    /// Caption lead-in delay in seconds
    #[arg(long, default_value_t = 8.0)]
    pub caption_offset: f64,

    /// Facecam vertical position (0 = top of canvas)
    #[arg(long, default_value_t = 0)]
    pub facecam_y: i64,

    /// Watermark image overlaid last before text
    #[arg(long)]
    pub watermark: Option<PathBuf>,

    /// Netscape cookies file passed to yt-dlp
    #[arg(long)]
    pub cookies: Option<PathBuf>,

    /// Encode with NVENC hardware acceleration
    #[arg(long)]
    pub nvenc: bool,
}

/// Parse a face region given as `x,y,w,h`.
pub fn parse_face_rect(s: &str) -> Result<Rect, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(format!("expected x,y,w,h, got {s:?}"));
    }
    let mut values = [0u32; 4];
    for (slot, part) in values.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| format!("invalid number {part:?} in face region"))?;
    }
    let rect = Rect::new(values[0], values[1], values[2], values[3]);
    if rect.w == 0 || rect.h == 0 {
        return Err("face region must have positive width and height".to_string());
    }
    Ok(rect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_face_rect() {
        assert_eq!(
            parse_face_rect("640, 200, 320, 400"),
            Ok(Rect::new(640, 200, 320, 400))
        );
        assert!(parse_face_rect("640,200,320").is_err());
        assert!(parse_face_rect("a,b,c,d").is_err());
        assert!(parse_face_rect("0,0,0,10").is_err());
    }

    #[test]
    fn test_generate_defaults() {
        let cli = Cli::parse_from(["shortgen", "generate", "clip.mp4"]);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.width, 2160);
        assert_eq!(args.height, 3840);
        assert_eq!(args.fps, 60);
        assert_eq!(args.blur, 20);
        assert!((args.caption_offset - 8.0).abs() < f64::EPSILON);
        assert!(!args.no_facecam);
    }
}
