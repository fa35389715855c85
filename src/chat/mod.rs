//! Interactive chat loop over a generation engine.
//!
//! Reads one line per turn, forwards it to the engine and prints the reply
//! until the user types `exit` or input ends.

/// Exit keyword detection.
pub mod input;
mod reader;
mod session;
mod ui;

pub use reader::{LineSource, PipedLines, TerminalLines};
pub use session::{ChatSession, SessionConfig, SessionState, Turn, TurnErrorPolicy};
