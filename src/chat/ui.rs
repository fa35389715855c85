//! Chat mode UI components.

use std::io::{self, Write};

use crate::ui::Style;

pub const BOT_LABEL: &str = "Bot:";
pub const USER_LABEL: &str = "User:";

const GREETING: &str = "Hi there! Ask me anything about network protocols or OSPF.";
const FAREWELL: &str = "Goodbye!";

pub fn print_banner(out: &mut impl Write) -> io::Result<()> {
    print_bot_line(out, GREETING)
}

pub fn print_goodbye(out: &mut impl Write) -> io::Result<()> {
    print_bot_line(out, FAREWELL)
}

pub fn print_reply(out: &mut impl Write, reply: &str) -> io::Result<()> {
    print_bot_line(out, reply)
}

fn print_bot_line(out: &mut impl Write, text: &str) -> io::Result<()> {
    writeln!(out, "{} {text}", Style::speaker(BOT_LABEL))?;
    out.flush()
}

pub fn print_error(message: &str) {
    eprintln!("{} {message}", Style::error("Error:"));
}
