//! Process-wide output settings.
//!
//! The conversation itself (banner, replies, farewell) is written to stdout.
//! Everything else goes to stderr: load status, the spinner, warnings,
//! errors and logs. Quiet mode hides status lines and the spinner but never
//! warnings or errors.

use std::io::{self, IsTerminal};
use std::sync::OnceLock;

static OUTPUT_CONFIG: OnceLock<OutputConfig> = OnceLock::new();

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputConfig {
    pub quiet: bool,
    pub no_color: bool,
}

impl OutputConfig {
    /// Combines the CLI flags with the environment.
    ///
    /// Colors are turned off by `--no-color`, by a set `NO_COLOR`
    /// (<https://no-color.org/>), or when stdout is not a terminal.
    pub fn detect(quiet: bool, no_color_flag: bool) -> Self {
        Self::from_env(
            quiet,
            no_color_flag,
            std::env::var_os("NO_COLOR").is_some(),
            io::stdout().is_terminal(),
        )
    }

    const fn from_env(quiet: bool, no_color_flag: bool, no_color_env: bool, tty: bool) -> Self {
        Self {
            quiet,
            no_color: no_color_flag || no_color_env || !tty,
        }
    }
}

/// Sets the process-wide configuration. Only the first call takes effect.
pub fn init(config: OutputConfig) {
    let _ = OUTPUT_CONFIG.set(config);
}

/// The active configuration; defaults to loud and colored before [`init`].
pub fn config() -> &'static OutputConfig {
    OUTPUT_CONFIG.get_or_init(OutputConfig::default)
}

pub fn is_quiet() -> bool {
    config().quiet
}

pub fn is_no_color() -> bool {
    config().no_color
}

/// Prints a status line to stderr unless quiet mode is on.
#[macro_export]
macro_rules! status {
    ($($arg:tt)*) => {
        if !$crate::output::is_quiet() {
            eprintln!($($arg)*);
        }
    };
}

/// Prints a `Warning:` line to stderr, even in quiet mode.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        eprintln!("{} {}", $crate::ui::Style::warning("Warning:"), format_args!($($arg)*));
    };
}
