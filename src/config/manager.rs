use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::chat::TurnErrorPolicy;
use crate::engine::{DEFAULT_ENDPOINT, DEFAULT_MODEL, EngineConfig, GenerationConfig, SamplingMode};
use crate::paths;

/// Default settings in the `[chatloop]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatloopConfig {
    /// Default provider name.
    pub provider: Option<String>,
    /// Default model identifier.
    pub model: Option<String>,
    /// What to do when a single turn fails to generate.
    pub on_error: Option<TurnErrorPolicy>,
}

/// Sampling strategy as written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplingKind {
    Stochastic,
    Greedy,
}

/// The `[generation]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub max_length: Option<u32>,
    pub num_sequences: Option<u32>,
    pub sampling: Option<SamplingKind>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub seed: Option<u64>,
    /// Per-request timeout in seconds. Unset means no timeout.
    pub timeout_secs: Option<u64>,
}

/// Configuration for a generation server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// The OpenAI-compatible API endpoint URL.
    pub endpoint: String,
    /// API key stored directly in config (not recommended).
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable name containing the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Models served by this provider.
    #[serde(default)]
    pub models: Vec<String>,
}

impl ProviderConfig {
    /// Gets the API key, preferring environment variable over config file.
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(env_var) = &self.api_key_env
            && let Ok(key) = std::env::var(env_var)
            && !key.is_empty()
        {
            return Some(key);
        }
        self.api_key.clone()
    }

    /// Returns `true` if this provider requires an API key.
    pub const fn requires_api_key(&self) -> bool {
        self.api_key.is_some() || self.api_key_env.is_some()
    }
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/chatloop/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Default settings.
    #[serde(default)]
    pub chatloop: ChatloopConfig,
    /// Generation parameters.
    #[serde(default)]
    pub generation: GenerationSettings,
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

/// Configuration problems that stop the program before the chat starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config file: {path}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Provider '{name}' not found\n\n{}", provider_hint(.available))]
    ProviderNotFound { name: String, available: Vec<String> },

    #[error(
        "Provider '{provider}' requires an API key\n\n\
         Set the {env_var} environment variable:\n  \
         export {env_var}=\"your-api-key\"\n\n\
         Or set api_key in ~/.config/chatloop/config.toml"
    )]
    MissingApiKey { provider: String, env_var: String },

    #[error("Invalid generation setting: {0}")]
    InvalidGeneration(String),
}

fn provider_hint(available: &[String]) -> String {
    if available.is_empty() {
        "No providers configured. Add providers to ~/.config/chatloop/config.toml".to_string()
    } else {
        format!(
            "Available providers:\n  - {}\n\nAdd providers to ~/.config/chatloop/config.toml",
            available.join("\n  - ")
        )
    }
}

/// Resolved configuration after merging CLI arguments and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The selected provider name, if any.
    pub provider_name: Option<String>,
    /// Connection settings for the engine.
    pub engine: EngineConfig,
    /// Parameters sent with every turn.
    pub generation: GenerationConfig,
    pub on_error: TurnErrorPolicy,
}

/// Options for resolving configuration.
///
/// Contains CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    pub provider: Option<String>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub max_length: Option<u32>,
    pub temperature: Option<f32>,
    pub greedy: bool,
    pub seed: Option<u64>,
    pub fail_fast: bool,
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// Priority: CLI options, then config file values, then built-in defaults.
pub fn resolve_config(
    options: &ResolveOptions,
    config_file: &ConfigFile,
) -> Result<ResolvedConfig, ConfigError> {
    let provider_name = options
        .provider
        .as_ref()
        .or(config_file.chatloop.provider.as_ref())
        .cloned();

    let provider_config = provider_name
        .as_deref()
        .map(|name| {
            config_file
                .providers
                .get(name)
                .ok_or_else(|| ConfigError::ProviderNotFound {
                    name: name.to_string(),
                    available: sorted_keys(&config_file.providers),
                })
        })
        .transpose()?;

    let model = options
        .model
        .as_ref()
        .or(config_file.chatloop.model.as_ref())
        .cloned()
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let mut api_key = None;
    if let (Some(name), Some(provider)) = (provider_name.as_deref(), provider_config) {
        // Warn if model is not in provider's models list
        if !provider.models.is_empty() && !provider.models.contains(&model) {
            crate::warn!(
                "Model '{model}' is not in the configured models list for '{name}'\n\
                 Configured models: {}\n\
                 Proceeding anyway...\n",
                provider.models.join(", ")
            );
        }

        api_key = provider.get_api_key();
        if provider.requires_api_key() && api_key.is_none() {
            let env_var = provider.api_key_env.as_deref().unwrap_or("API_KEY");
            return Err(ConfigError::MissingApiKey {
                provider: name.to_string(),
                env_var: env_var.to_string(),
            });
        }
    }

    let endpoint = options
        .endpoint
        .clone()
        .or_else(|| provider_config.map(|p| p.endpoint.clone()))
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

    let settings = &config_file.generation;
    let generation = resolve_generation(options, settings)?;

    let on_error = if options.fail_fast {
        TurnErrorPolicy::Abort
    } else {
        config_file.chatloop.on_error.unwrap_or_default()
    };

    Ok(ResolvedConfig {
        provider_name,
        engine: EngineConfig {
            endpoint,
            model,
            api_key,
            timeout: settings.timeout_secs.map(Duration::from_secs),
        },
        generation,
        on_error,
    })
}

fn resolve_generation(
    options: &ResolveOptions,
    settings: &GenerationSettings,
) -> Result<GenerationConfig, ConfigError> {
    let defaults = GenerationConfig::default();

    let max_length = options
        .max_length
        .or(settings.max_length)
        .unwrap_or(defaults.max_length);
    if max_length == 0 {
        return Err(ConfigError::InvalidGeneration(
            "max_length must be at least 1".to_string(),
        ));
    }

    let num_sequences = settings.num_sequences.unwrap_or(defaults.num_sequences);
    if num_sequences != 1 {
        return Err(ConfigError::InvalidGeneration(format!(
            "num_sequences must be 1 (got {num_sequences}); only one reply is printed per turn"
        )));
    }

    let kind = if options.greedy {
        SamplingKind::Greedy
    } else if options.temperature.is_some() {
        SamplingKind::Stochastic
    } else {
        settings.sampling.unwrap_or(SamplingKind::Stochastic)
    };

    let sampling = match kind {
        SamplingKind::Greedy => SamplingMode::Greedy,
        SamplingKind::Stochastic => {
            let temperature = options.temperature.or(settings.temperature).unwrap_or(1.0);
            if !temperature.is_finite() || temperature < 0.0 {
                return Err(ConfigError::InvalidGeneration(format!(
                    "temperature must be a non-negative number (got {temperature})"
                )));
            }

            let top_p = settings.top_p.unwrap_or(1.0);
            if !(top_p > 0.0 && top_p <= 1.0) {
                return Err(ConfigError::InvalidGeneration(format!(
                    "top_p must be in (0, 1] (got {top_p})"
                )));
            }

            SamplingMode::Stochastic { temperature, top_p }
        }
    };

    Ok(GenerationConfig {
        max_length,
        num_sequences,
        sampling,
        seed: options.seed.or(settings.seed),
    })
}

fn sorted_keys(providers: &HashMap<String, ProviderConfig>) -> Vec<String> {
    let mut keys: Vec<String> = providers.keys().cloned().collect();
    keys.sort();
    keys
}

/// Manages loading configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/chatloop/config.toml`
    /// or `~/.config/chatloop/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_file()?,
        })
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile =
            toml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: self.config_path.display().to_string(),
                source,
            })?;

        Ok(config_file)
    }

    /// Loads the config file, treating a missing file as empty.
    ///
    /// A file that exists but cannot be read or parsed is still an error.
    pub fn load_optional(&self) -> Result<ConfigFile> {
        if !self.config_path.exists() {
            tracing::debug!(path = %self.config_path.display(), "no config file, using defaults");
            return Ok(ConfigFile::default());
        }
        self.load()
    }
}
