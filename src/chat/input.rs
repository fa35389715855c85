/// The only word that ends a chat session.
pub const EXIT_KEYWORD: &str = "exit";

/// What one line of user input asks the session to do.
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    /// Forward to the engine as-is, including empty text.
    Prompt(String),
    /// Print the farewell and stop without calling the engine.
    Exit,
}

/// Returns `true` if `line` is the exit keyword, ignoring case.
///
/// The line is compared as typed; surrounding whitespace makes it a prompt.
pub fn is_exit_command(line: &str) -> bool {
    line.eq_ignore_ascii_case(EXIT_KEYWORD)
}

pub fn parse_input(line: &str) -> Input {
    if is_exit_command(line) {
        Input::Exit
    } else {
        Input::Prompt(line.to_string())
    }
}
