//! Subcommand implementations.

/// Chat mode command handler.
pub mod chat;

/// Provider listing command handler.
pub mod providers;
