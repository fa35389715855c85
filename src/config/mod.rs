//! Configuration file management and resolution against CLI options.

mod manager;

pub use manager::{
    ChatloopConfig, ConfigError, ConfigFile, ConfigManager, GenerationSettings, ProviderConfig,
    ResolveOptions, ResolvedConfig, SamplingKind, resolve_config,
};
