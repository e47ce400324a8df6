//! Video encoding configuration.

use serde::{Deserialize, Serialize};

/// Default video codec (H.264)
pub const DEFAULT_VIDEO_CODEC: &str = "libx264";
/// Default audio codec
pub const DEFAULT_AUDIO_CODEC: &str = "aac";
/// Default software encoding preset
pub const DEFAULT_PRESET: &str = "fast";
/// NVENC encoding preset (p1 fastest .. p7 best quality)
pub const NVENC_PRESET: &str = "p7";
/// Default quality factor (CRF for software, CQ for NVENC)
pub const DEFAULT_QUALITY: u8 = 19;
/// Default audio bitrate
pub const DEFAULT_AUDIO_BITRATE: &str = "192k";

/// Video encoding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodingConfig {
    /// Video codec (e.g., "libx264", "h264_nvenc")
    #[serde(default = "default_video_codec")]
    pub codec: String,

    /// Encoding preset ("fast", "medium" for software; "p1".."p7" for NVENC)
    #[serde(default = "default_preset")]
    pub preset: String,

    /// Quality factor (0-51, lower is better; CRF or CQ depending on codec)
    #[serde(default = "default_quality")]
    pub quality: u8,

    /// Audio codec
    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    /// Audio bitrate
    #[serde(default = "default_audio_bitrate")]
    pub audio_bitrate: String,

    /// Use hardware acceleration (NVENC)
    #[serde(default)]
    pub use_nvenc: bool,
}

fn default_video_codec() -> String {
    DEFAULT_VIDEO_CODEC.to_string()
}
fn default_preset() -> String {
    DEFAULT_PRESET.to_string()
}
fn default_quality() -> u8 {
    DEFAULT_QUALITY
}
fn default_audio_codec() -> String {
    DEFAULT_AUDIO_CODEC.to_string()
}
fn default_audio_bitrate() -> String {
    DEFAULT_AUDIO_BITRATE.to_string()
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            codec: DEFAULT_VIDEO_CODEC.to_string(),
            preset: DEFAULT_PRESET.to_string(),
            quality: DEFAULT_QUALITY,
            audio_codec: DEFAULT_AUDIO_CODEC.to_string(),
            audio_bitrate: DEFAULT_AUDIO_BITRATE.to_string(),
            use_nvenc: false,
        }
    }
}

impl EncodingConfig {
    /// Create a new encoding configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable NVENC hardware acceleration.
    pub fn with_nvenc(mut self) -> Self {
        self.use_nvenc = true;
        self.codec = "h264_nvenc".to_string();
        self.preset = NVENC_PRESET.to_string();
        self
    }

    /// Returns a new config with updated quality factor.
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    /// Convert to FFmpeg command arguments.
    pub fn to_ffmpeg_args(&self) -> Vec<String> {
        let mut args = vec![
            "-c:v".to_string(),
            self.codec.clone(),
            "-preset".to_string(),
            self.preset.clone(),
        ];

        // NVENC uses variable-bitrate rate control with -cq instead of -crf
        if self.use_nvenc {
            args.extend_from_slice(&[
                "-rc".to_string(),
                "vbr".to_string(),
                "-cq".to_string(),
                self.quality.to_string(),
                "-b:v".to_string(),
                "0".to_string(),
            ]);
        } else {
            args.extend_from_slice(&["-crf".to_string(), self.quality.to_string()]);
        }

        args.extend_from_slice(&[
            "-c:a".to_string(),
            self.audio_codec.clone(),
            "-b:a".to_string(),
            self.audio_bitrate.clone(),
        ]);

        args
    }
}
