use clap::{Parser, Subcommand};

use crate::config::ResolveOptions;

#[derive(Parser, Debug)]
#[command(name = "chatloop")]
#[command(about = "Interactive chat with a language model served over an OpenAI-compatible API")]
#[command(version)]
pub struct Args {
    /// Provider name from the config file
    #[arg(short = 'p', long)]
    pub provider: Option<String>,

    /// API endpoint URL (overrides the provider's endpoint)
    #[arg(short = 'e', long)]
    pub endpoint: Option<String>,

    /// Model identifier, e.g. NousResearch/Llama-2-7b-chat-hf
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Maximum number of tokens to generate per reply
    #[arg(long)]
    pub max_length: Option<u32>,

    /// Sampling temperature
    #[arg(long, conflicts_with = "greedy")]
    pub temperature: Option<f32>,

    /// Use greedy decoding instead of sampling
    #[arg(long)]
    pub greedy: bool,

    /// Sampling seed, if the server supports it
    #[arg(long)]
    pub seed: Option<u64>,

    /// Exit on the first failed reply instead of reporting it and continuing
    #[arg(long)]
    pub fail_fast: bool,

    /// Suppress status messages and the spinner
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging on stderr
    #[arg(short = 'v', long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Args {
    /// Collects the options that override config file values.
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            provider: self.provider.clone(),
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
            max_length: self.max_length,
            temperature: self.temperature,
            greedy: self.greedy,
            seed: self.seed,
            fail_fast: self.fail_fast,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List configured providers
    Providers {
        /// Show details for a specific provider
        provider: Option<String>,
    },
}
