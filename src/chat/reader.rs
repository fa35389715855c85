use anyhow::{Context, Result};
use inquire::{InquireError, Text};
use inquire::ui::{Attributes, Color, RenderConfig, Styled};
use std::io::{BufRead, Write};

use super::ui::USER_LABEL;
use crate::output;
use crate::ui::Style;

/// A source of user input lines, one per turn.
pub trait LineSource {
    /// Reads the next line without its line terminator.
    ///
    /// Returns `Ok(None)` once input is closed (end of file or the user
    /// cancelled the prompt).
    fn next_line(&mut self) -> Result<Option<String>>;
}

/// Interactive line editor for terminals.
///
/// Shows the same `User: ` label as piped input, with line editing on top.
pub struct TerminalLines {
    render_config: RenderConfig<'static>,
}

impl TerminalLines {
    pub fn new() -> Self {
        Self {
            render_config: user_prompt(output::is_no_color()),
        }
    }
}

/// Renders the label as inquire's prompt prefix, which is always followed by
/// one space, so an empty message leaves exactly `User: `.
fn user_prompt(no_color: bool) -> RenderConfig<'static> {
    let label = if no_color {
        Styled::new(USER_LABEL)
    } else {
        Styled::new(USER_LABEL)
            .with_fg(Color::DarkMagenta)
            .with_attr(Attributes::BOLD)
    };
    let base = if no_color {
        RenderConfig::empty()
    } else {
        RenderConfig::default()
    };

    base.with_prompt_prefix(label)
        .with_answered_prompt_prefix(label)
}

impl Default for TerminalLines {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSource for TerminalLines {
    fn next_line(&mut self) -> Result<Option<String>> {
        let input = Text::new("")
            .with_render_config(self.render_config)
            .prompt();

        match input {
            Ok(line) => Ok(Some(line)),
            Err(e) if closed_by_user(&e) => {
                println!(); // Clear line before goodbye message
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Ctrl+C and Esc at the prompt end the session like end of input.
const fn closed_by_user(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

/// Line reader for non-interactive input such as a pipe or a file.
///
/// Writes the `User:` prompt to `prompt_out` before every read.
pub struct PipedLines<R, W> {
    reader: R,
    prompt_out: W,
}

impl<R: BufRead, W: Write> PipedLines<R, W> {
    pub const fn new(reader: R, prompt_out: W) -> Self {
        Self { reader, prompt_out }
    }
}

impl<R: BufRead, W: Write> LineSource for PipedLines<R, W> {
    fn next_line(&mut self) -> Result<Option<String>> {
        write!(self.prompt_out, "{} ", Style::speaker(USER_LABEL))?;
        self.prompt_out.flush()?;

        let mut line = String::new();
        let bytes_read = self
            .reader
            .read_line(&mut line)
            .context("Failed to read from stdin")?;

        if bytes_read == 0 {
            writeln!(self.prompt_out)?;
            return Ok(None);
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }

        Ok(Some(line))
    }
}
