use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;

use super::input::{Input, parse_input};
use super::reader::LineSource;
use super::ui;
use crate::engine::{GenerationConfig, GenerationEngine};
use crate::ui::Spinner;

/// What the session does when one turn fails to generate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnErrorPolicy {
    /// Report the error and prompt again.
    #[default]
    Continue,
    /// End the session with the error, skipping the farewell.
    Abort,
}

/// Where the session is in its read/generate cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AwaitingInput,
    Generating,
    Terminated,
}

/// One input/reply exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub input_text: String,
    pub reply_text: String,
}

/// Configuration for a chat session.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Parameters sent with every turn.
    pub generation: GenerationConfig,
    pub on_error: TurnErrorPolicy,
}

impl SessionConfig {
    /// Creates a new session configuration.
    pub const fn new(generation: GenerationConfig, on_error: TurnErrorPolicy) -> Self {
        Self {
            generation,
            on_error,
        }
    }
}

/// An interactive chat session.
///
/// Borrows an already loaded engine; every non-exit line becomes exactly one
/// engine call. No history is carried between turns.
pub struct ChatSession<'e, E> {
    engine: &'e E,
    config: SessionConfig,
    state: SessionState,
    turns: usize,
}

impl<'e, E: GenerationEngine> ChatSession<'e, E> {
    /// Creates a new chat session around a loaded engine.
    pub const fn new(engine: &'e E, config: SessionConfig) -> Self {
        Self {
            engine,
            config,
            state: SessionState::AwaitingInput,
            turns: 0,
        }
    }

    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Number of turns sent to the engine so far, failed ones included.
    pub const fn turns(&self) -> usize {
        self.turns
    }

    /// Runs the loop until the exit keyword or the end of input.
    ///
    /// Under [`TurnErrorPolicy::Abort`] a failed turn is returned as the
    /// error and the farewell is not printed.
    pub async fn run(&mut self, lines: &mut impl LineSource, out: &mut impl Write) -> Result<()> {
        ui::print_banner(out)?;

        while let Some(line) = lines.next_line()? {
            match parse_input(&line) {
                Input::Exit => break,
                Input::Prompt(text) => self.take_turn(text, out).await?,
            }
        }

        self.state = SessionState::Terminated;
        ui::print_goodbye(out)?;
        Ok(())
    }

    async fn take_turn(&mut self, input_text: String, out: &mut impl Write) -> Result<()> {
        self.state = SessionState::Generating;
        let result = self.generate_reply(input_text).await;

        match result {
            Ok(turn) => {
                self.state = SessionState::AwaitingInput;
                ui::print_reply(out, &turn.reply_text)?;
            }
            Err(err) => match self.config.on_error {
                TurnErrorPolicy::Continue => {
                    self.state = SessionState::AwaitingInput;
                    tracing::debug!(turn = self.turns, error = %format!("{err:#}"), "turn failed");
                    ui::print_error(&format!("{err:#}"));
                }
                TurnErrorPolicy::Abort => {
                    self.state = SessionState::Terminated;
                    return Err(err);
                }
            },
        }

        Ok(())
    }

    async fn generate_reply(&mut self, input_text: String) -> Result<Turn> {
        self.turns += 1;
        let spinner = Spinner::new("Generating...");

        let reply_text = self
            .engine
            .generate(&input_text, &self.config.generation)
            .await
            .with_context(|| format!("Generation failed on turn {}", self.turns))?;

        spinner.stop();
        Ok(Turn {
            input_text,
            reply_text,
        })
    }
}
