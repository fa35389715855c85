//! Terminal widgets shared by the chat loop and the subcommands.

mod spinner;
mod style;

pub use spinner::Spinner;
pub use style::Style;
