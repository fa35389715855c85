//! Where chatloop keeps its configuration.
//!
//! Follows the XDG layout on every platform, so macOS users find the file
//! under `~/.config` as well.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR: &str = "chatloop";
const CONFIG_FILE: &str = "config.toml";

/// `$XDG_CONFIG_HOME/chatloop`, or `~/.config/chatloop` when the variable is
/// unset or empty.
pub fn config_dir() -> Result<PathBuf> {
    let base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => dirs::home_dir()
            .context("Failed to determine home directory")?
            .join(".config"),
    };
    Ok(base.join(APP_DIR))
}

/// Path of the optional `config.toml`.
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE))
}
