//! interviewer-providers: LLM provider integrations.
//!
//! Implements the `LlmProvider` trait for Gemini plus an offline mock
//! backend, and loads the `interviewer.toml` configuration.

pub mod config;
pub mod error;
pub mod gemini;
pub mod mock;

pub use config::{create_provider, load_config, InterviewerConfig, ProviderConfig, ServerSettings};
pub use error::ProviderError;
