//! Generation engine abstraction and its OpenAI-compatible backend.
//!
//! The session loop only sees [`GenerationEngine`]: a handle that is loaded
//! once and then maps a prompt plus [`GenerationConfig`] to decoded text.

mod client;
mod markup;
mod sse_parser;

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

pub use client::CompletionEngine;
pub use markup::strip_control_markup;

/// Model identifier used when neither the CLI nor the config file names one.
pub const DEFAULT_MODEL: &str = "NousResearch/Llama-2-7b-chat-hf";

/// Server endpoint used when neither the CLI nor a provider supplies one.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";

/// A loaded text-generation capability.
///
/// Implementations hold whatever state the underlying model needs; each call
/// is independent of the previous ones.
pub trait GenerationEngine {
    /// Generates a reply for `prompt`, returning the decoded text with any
    /// control markup removed.
    fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> impl Future<Output = Result<String, EngineError>> + Send;
}

/// How the next token is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SamplingMode {
    /// Random sampling; identical prompts may produce different replies.
    Stochastic { temperature: f32, top_p: f32 },
    /// Always pick the most likely token.
    Greedy,
}

impl Default for SamplingMode {
    fn default() -> Self {
        Self::Stochastic {
            temperature: 1.0,
            top_p: 1.0,
        }
    }
}

/// Per-call generation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    /// Maximum number of tokens to generate.
    pub max_length: u32,
    /// Number of candidate sequences requested. Only the first is used.
    pub num_sequences: u32,
    pub sampling: SamplingMode,
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_length: 200,
            num_sequences: 1,
            sampling: SamplingMode::default(),
            seed: None,
        }
    }
}

/// Connection settings for loading a [`CompletionEngine`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Base URL of the OpenAI-compatible server.
    pub endpoint: String,
    /// Model identifier as served by the endpoint.
    pub model: String,
    pub api_key: Option<String>,
    /// Applies to each whole request, including the streamed body.
    pub timeout: Option<Duration>,
}

/// Errors raised while loading or calling a generation engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to connect to generation server: {url}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Generation server returned status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Model '{model}' is not served by the generation server (available: {})", list_or_none(.available))]
    ModelNotServed {
        model: String,
        available: Vec<String>,
    },

    #[error("Error receiving generation stream: {0}")]
    Stream(String),

    #[error("Error making request: {0}")]
    Request(#[from] reqwest::Error),
}

impl EngineError {
    /// Process exit code for a failure that ends the program.
    pub const fn exit_code(&self) -> exitcode::ExitCode {
        match self {
            Self::Unreachable { .. } | Self::ModelNotServed { .. } => exitcode::UNAVAILABLE,
            Self::Http { .. } | Self::Stream(_) | Self::Request(_) => exitcode::SOFTWARE,
        }
    }
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}
