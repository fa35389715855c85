//! Provider listing command handler.

use anyhow::{Result, bail};

use crate::config::{ConfigFile, ConfigManager};
use crate::ui::Style;

/// Prints configured providers to stdout.
///
/// If `specific_provider` is provided, shows detailed information for that provider.
/// Otherwise, lists all configured providers with their endpoints and models.
pub fn print_providers(specific_provider: Option<&str>) -> Result<()> {
    let manager = ConfigManager::new()?;
    let config = manager.load_optional()?;
    print!("{}", render_providers(&config, specific_provider)?);
    Ok(())
}

fn render_providers(config: &ConfigFile, specific_provider: Option<&str>) -> Result<String> {
    let mut out = String::new();

    if config.providers.is_empty() {
        out.push_str("No providers configured.\n");
        out.push_str("Add providers to ~/.config/chatloop/config.toml\n");
        return Ok(out);
    }

    let default_provider = config.chatloop.provider.as_deref();
    let marker = |name: &str| {
        if default_provider == Some(name) {
            format!(" {}", Style::default_marker())
        } else {
            String::new()
        }
    };

    if let Some(provider_name) = specific_provider {
        let Some(provider) = config.providers.get(provider_name) else {
            bail!("Provider '{provider_name}' not found");
        };

        out.push_str(&format!(
            "Provider: {}{}\n",
            Style::value(provider_name),
            marker(provider_name)
        ));
        out.push_str(&format!(
            "  {} = {}\n",
            Style::label("endpoint"),
            provider.endpoint
        ));
        if provider.requires_api_key() {
            let has_key = provider.get_api_key().is_some();
            out.push_str(&format!(
                "  {}  = {}\n",
                Style::label("api_key"),
                if has_key { "(set)" } else { "(not set)" }
            ));
        }
        if provider.models.is_empty() {
            out.push_str(&format!("  {}   = (none configured)\n", Style::label("models")));
        } else {
            out.push_str(&format!("  {}:\n", Style::label("models")));
            for model in &provider.models {
                out.push_str(&format!("    - {model}\n"));
            }
        }
    } else {
        out.push_str(&format!("{}\n\n", Style::header("Configured providers:")));
        let mut names: Vec<&String> = config.providers.keys().collect();
        names.sort();
        for name in names {
            let provider = &config.providers[name];
            out.push_str(&format!("  {}{}\n", Style::value(name), marker(name)));
            out.push_str(&format!("    endpoint: {}\n", provider.endpoint));
            if !provider.models.is_empty() {
                out.push_str(&format!("    models: {}\n", provider.models.join(", ")));
            }
        }
    }

    Ok(out)
}
