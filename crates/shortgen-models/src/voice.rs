//! Voiceover provider configuration.
//!
//! Provider selection is an explicit configuration struct handed to the
//! speech synthesizer, not an environment lookup at the call site.

use serde::{Deserialize, Serialize};

/// Default ElevenLabs voice.
pub const DEFAULT_ELEVENLABS_VOICE_ID: &str = "IRHApOXLvnW57QJPQH2P";

/// Supported text-to-speech providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TtsProvider {
    /// ElevenLabs HTTP API (requires an API key)
    ElevenLabs,
    /// Local Piper CLI (voice_id is the model path)
    LocalTts,
    /// gtts-cli wrapper around the Google Translate TTS endpoint
    CloudTts,
}

impl TtsProvider {
    /// Parse a provider name as it appears in configuration.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "elevenlabs" => Some(Self::ElevenLabs),
            "local" | "piper" => Some(Self::LocalTts),
            "cloud" | "gtts" => Some(Self::CloudTts),
            _ => None,
        }
    }

    /// Provider name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ElevenLabs => "elevenlabs",
            Self::LocalTts => "piper",
            Self::CloudTts => "gtts",
        }
    }
}

/// Voiceover synthesis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Which provider to synthesize with
    pub provider: TtsProvider,
    /// API key, required for ElevenLabs
    pub api_key: Option<String>,
    /// Voice identifier (ElevenLabs voice ID, Piper model path, or
    /// language code for gtts)
    pub voice_id: String,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            provider: TtsProvider::CloudTts,
            api_key: None,
            voice_id: "en".to_string(),
        }
    }
}

impl VoiceConfig {
    /// ElevenLabs configuration with the given API key.
    pub fn elevenlabs(api_key: impl Into<String>) -> Self {
        Self {
            provider: TtsProvider::ElevenLabs,
            api_key: Some(api_key.into()),
            voice_id: DEFAULT_ELEVENLABS_VOICE_ID.to_string(),
        }
    }

    /// Override the voice identifier.
    pub fn with_voice(mut self, voice_id: impl Into<String>) -> Self {
        self.voice_id = voice_id.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_parsing() {
        assert_eq!(TtsProvider::parse("elevenlabs"), Some(TtsProvider::ElevenLabs));
        assert_eq!(TtsProvider::parse("ElevenLabs"), Some(TtsProvider::ElevenLabs));
        assert_eq!(TtsProvider::parse("piper"), Some(TtsProvider::LocalTts));
        assert_eq!(TtsProvider::parse("gtts"), Some(TtsProvider::CloudTts));
        assert_eq!(TtsProvider::parse("unknown"), None);
    }

    #[test]
    fn test_elevenlabs_config() {
        let config = VoiceConfig::elevenlabs("key").with_voice("voice-1");
        assert_eq!(config.provider, TtsProvider::ElevenLabs);
        assert_eq!(config.api_key.as_deref(), Some("key"));
        assert_eq!(config.voice_id, "voice-1");
    }
}
