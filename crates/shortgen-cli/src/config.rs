//! Generator configuration.

use std::path::PathBuf;

use shortgen_models::{TtsProvider, VoiceConfig, voice::DEFAULT_ELEVENLABS_VOICE_ID};

/// Default Piper model file.
const DEFAULT_PIPER_MODEL: &str = "en_US-amy-medium.onnx";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory for per-request temp workspaces
    pub work_dir: PathBuf,
    /// Voiceover synthesis settings
    pub voice: VoiceConfig,
    /// Whisper model used for caption transcription
    pub whisper_model: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            work_dir: std::env::temp_dir().join("shortgen"),
            voice: VoiceConfig::default(),
            whisper_model: shortgen_speech::DEFAULT_WHISPER_MODEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let provider = std::env::var("TTS_PROVIDER")
            .ok()
            .and_then(|s| TtsProvider::parse(&s))
            .unwrap_or(TtsProvider::CloudTts);

        let voice_id = match provider {
            TtsProvider::ElevenLabs => std::env::var("ELEVENLABS_VOICE_ID")
                .unwrap_or_else(|_| DEFAULT_ELEVENLABS_VOICE_ID.to_string()),
            TtsProvider::LocalTts => std::env::var("PIPER_MODEL")
                .unwrap_or_else(|_| DEFAULT_PIPER_MODEL.to_string()),
            TtsProvider::CloudTts => {
                std::env::var("TTS_LANG").unwrap_or_else(|_| "en".to_string())
            }
        };

        Self {
            work_dir: std::env::var("SHORTGEN_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| std::env::temp_dir().join("shortgen")),
            voice: VoiceConfig {
                provider,
                api_key: std::env::var("ELEVENLABS_API_KEY").ok(),
                voice_id,
            },
            whisper_model: std::env::var("WHISPER_MODEL")
                .unwrap_or_else(|_| shortgen_speech::DEFAULT_WHISPER_MODEL.to_string()),
        }
    }
}
