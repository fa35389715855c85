//! Command-line interface definitions and handlers.

/// CLI argument parsing with clap.
pub mod args;

/// Subcommand implementations.
pub mod commands;

pub use args::{Args, Command};

use crate::config::ConfigError;
use crate::engine::EngineError;

/// Maps a fatal error to the process exit code.
///
/// Configuration problems exit with `CONFIG`, an engine that cannot be
/// loaded with `UNAVAILABLE`, and everything else with `SOFTWARE`.
pub fn exit_code_for(err: &anyhow::Error) -> exitcode::ExitCode {
    for cause in err.chain() {
        if cause.downcast_ref::<ConfigError>().is_some() {
            return exitcode::CONFIG;
        }
        if let Some(engine_err) = cause.downcast_ref::<EngineError>() {
            return engine_err.exit_code();
        }
    }
    exitcode::SOFTWARE
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_config_error_code() {
        let err: anyhow::Error = ConfigError::InvalidGeneration("bad".to_string()).into();
        assert_eq!(exit_code_for(&err), exitcode::CONFIG);
    }

    #[test]
    fn test_engine_error_through_context() {
        let result: Result<(), EngineError> = Err(EngineError::ModelNotServed {
            model: "llama".to_string(),
            available: vec![],
        });
        let err = result.context("Failed to load model").unwrap_err();
        assert_eq!(exit_code_for(&err), exitcode::UNAVAILABLE);
    }

    #[test]
    fn test_generation_failure_code() {
        let result: Result<(), EngineError> = Err(EngineError::Http {
            status: 500,
            body: String::new(),
        });
        let err = result.context("Generation failed on turn 1").unwrap_err();
        assert_eq!(exit_code_for(&err), exitcode::SOFTWARE);
    }

    #[test]
    fn test_other_error_code() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(exit_code_for(&err), exitcode::SOFTWARE);
    }
}
