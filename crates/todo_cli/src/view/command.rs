//! List-screen command parsing.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub const HELP: &str = "commands: n|new, e|edit <row>, d|delete <row>, r|refresh, h|help, q|quit";

/// Action requested on the list screen. Rows are 1-based as displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    New,
    Edit(usize),
    Delete(usize),
    Refresh,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    Unknown(String),
    MissingRow(&'static str),
    InvalidRow(String),
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "{HELP}"),
            Self::Unknown(word) => write!(f, "unknown command `{word}`; {HELP}"),
            Self::MissingRow(command) => write!(f, "`{command}` needs a row number"),
            Self::InvalidRow(value) => write!(f, "`{value}` is not a row number"),
        }
    }
}

impl Error for CommandError {}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err(CommandError::Empty);
    };

    match head.to_ascii_lowercase().as_str() {
        "n" | "new" => Ok(Command::New),
        "e" | "edit" => parse_row("edit", words.next()).map(Command::Edit),
        "d" | "delete" => parse_row("delete", words.next()).map(Command::Delete),
        "r" | "refresh" => Ok(Command::Refresh),
        "h" | "help" | "?" => Ok(Command::Help),
        "q" | "quit" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn parse_row(command: &'static str, value: Option<&str>) -> Result<usize, CommandError> {
    let value = value.ok_or(CommandError::MissingRow(command))?;
    match value.parse::<usize>() {
        Ok(row) if row > 0 => Ok(row),
        _ => Err(CommandError::InvalidRow(value.to_string())),
    }
}
