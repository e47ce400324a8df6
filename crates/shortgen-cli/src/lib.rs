//! Short-form vertical video generator.
//!
//! Orchestrates the generation pipeline: source acquisition, layer
//! cropping, voiceover synthesis and transcription, and final
//! composition through the media crate.

pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;

pub use cli::{Cli, Command, GenerateArgs};
pub use config::AppConfig;
pub use error::{PipelineError, PipelineResult};
