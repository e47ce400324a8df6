//! Speech collaborators for the ShortGen pipeline.
//!
//! Two external capabilities live behind this crate:
//! - Voiceover synthesis (ElevenLabs API, local Piper, or gtts-cli)
//! - Transcription of a synthesized voiceover into timed caption spans
//!   (whisper CLI)
//!
//! Both are invoked as black boxes; this crate owns only their process
//! and HTTP plumbing plus output parsing.

pub mod error;
pub mod transcribe;
pub mod tts;

pub use error::{SpeechError, SpeechResult};
pub use transcribe::{parse_vtt, transcribe, transcribe_with_model, DEFAULT_WHISPER_MODEL};
pub use tts::{SpeechSynthesizer, ELEVENLABS_API_BASE};
