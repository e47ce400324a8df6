//! Voiceover synthesis.
//!
//! Dispatches on the configured [`TtsProvider`]: the ElevenLabs HTTP API,
//! a local Piper model, or the gtts-cli wrapper. Provider selection and
//! credentials come in through [`VoiceConfig`]; nothing here reads the
//! environment.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use serde_json::json;
use shortgen_models::{TtsProvider, VoiceConfig};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::info;

use crate::error::{SpeechError, SpeechResult};

/// Default ElevenLabs API base URL.
pub const ELEVENLABS_API_BASE: &str = "https://api.elevenlabs.io";

/// Voiceover synthesizer.
pub struct SpeechSynthesizer {
    config: VoiceConfig,
    http: reqwest::Client,
    elevenlabs_base: String,
}

impl SpeechSynthesizer {
    /// Create a synthesizer for the given voice configuration.
    pub fn new(config: VoiceConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            elevenlabs_base: ELEVENLABS_API_BASE.to_string(),
        }
    }

    /// Override the ElevenLabs endpoint (used by tests).
    pub fn with_elevenlabs_base(mut self, base: impl Into<String>) -> Self {
        self.elevenlabs_base = base.into();
        self
    }

    /// Synthesize `text` into an audio file at `output`.
    pub async fn synthesize(&self, text: &str, output: &Path) -> SpeechResult<PathBuf> {
        if text.trim().is_empty() {
            return Err(SpeechError::EmptyText);
        }

        info!(
            provider = self.config.provider.name(),
            voice = %self.config.voice_id,
            chars = text.len(),
            "Synthesizing voiceover"
        );

        match self.config.provider {
            TtsProvider::ElevenLabs => self.synthesize_elevenlabs(text, output).await,
            TtsProvider::LocalTts => self.synthesize_piper(text, output).await,
            TtsProvider::CloudTts => self.synthesize_gtts(text, output).await,
        }
    }

    async fn synthesize_elevenlabs(&self, text: &str, output: &Path) -> SpeechResult<PathBuf> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(SpeechError::MissingApiKey("elevenlabs"))?;

        let url = format!(
            "{}/v1/text-to-speech/{}",
            self.elevenlabs_base, self.config.voice_id
        );
        let payload = json!({
            "text": text,
            "voice_settings": {
                "stability": 0.5,
                "similarity_boost": 0.75
            }
        });

        let response = self
            .http
            .post(&url)
            .header("xi-api-key", api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::synthesis_failed(
                "elevenlabs",
                format!("HTTP {status}: {body}"),
            ));
        }

        let audio = response.bytes().await?;
        tokio::fs::write(output, &audio).await?;

        info!(path = %output.display(), bytes = audio.len(), "Voiceover saved");
        Ok(output.to_path_buf())
    }

    async fn synthesize_piper(&self, text: &str, output: &Path) -> SpeechResult<PathBuf> {
        which::which("piper").map_err(|_| SpeechError::ToolNotFound("piper"))?;

        let mut child = Command::new("piper")
            .arg("--model")
            .arg(&self.config.voice_id)
            .arg("--output_file")
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;

        // Piper reads the text to speak from stdin.
        let mut stdin = child.stdin.take().expect("stdin not captured");
        stdin.write_all(text.as_bytes()).await?;
        drop(stdin);

        let result = child.wait_with_output().await?;
        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(SpeechError::synthesis_failed("piper", stderr.trim().to_string()));
        }

        Ok(output.to_path_buf())
    }

    async fn synthesize_gtts(&self, text: &str, output: &Path) -> SpeechResult<PathBuf> {
        which::which("gtts-cli").map_err(|_| SpeechError::ToolNotFound("gtts-cli"))?;

        let result = Command::new("gtts-cli")
            .arg("--lang")
            .arg(&self.config.voice_id)
            .arg("--output")
            .arg(output)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(SpeechError::synthesis_failed("gtts", stderr.trim().to_string()));
        }

        Ok(output.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_empty_text_rejected() {
        let synth = SpeechSynthesizer::new(VoiceConfig::default());
        let err = synth
            .synthesize("  ", Path::new("/tmp/never-written.mp3"))
            .await
            .unwrap_err();
        assert!(matches!(err, SpeechError::EmptyText));
    }

    #[tokio::test]
    async fn test_elevenlabs_requires_api_key() {
        let config = VoiceConfig {
            provider: TtsProvider::ElevenLabs,
            api_key: None,
            voice_id: "voice-1".to_string(),
        };
        let synth = SpeechSynthesizer::new(config);
        let err = synth
            .synthesize("hello", Path::new("/tmp/never-written.mp3"))
            .await
            .unwrap_err();
        assert!(matches!(err, SpeechError::MissingApiKey("elevenlabs")));
    }

    #[tokio::test]
    async fn test_elevenlabs_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/text-to-speech/voice-1"))
            .and(header("xi-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3fake-mp3".to_vec()))
            .mount(&server)
            .await;

        let config = VoiceConfig::elevenlabs("test-key").with_voice("voice-1");
        let synth = SpeechSynthesizer::new(config).with_elevenlabs_base(server.uri());

        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("voice.mp3");
        let path = synth.synthesize("hello world", &output).await.unwrap();

        assert_eq!(path, output);
        assert_eq!(std::fs::read(&output).unwrap(), b"ID3fake-mp3");
    }

    #[tokio::test]
    async fn test_elevenlabs_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let config = VoiceConfig::elevenlabs("wrong-key");
        let synth = SpeechSynthesizer::new(config).with_elevenlabs_base(server.uri());

        let dir = tempfile::TempDir::new().unwrap();
        let err = synth
            .synthesize("hello", &dir.path().join("voice.mp3"))
            .await
            .unwrap_err();
        match err {
            SpeechError::SynthesisFailed { provider, message } => {
                assert_eq!(provider, "elevenlabs");
                assert!(message.contains("401"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
