//! Structured command line parsing.
//!
//! Converts the text typed after `:` into a `ParsedCommand`. Parsing is
//! pure; unknown input becomes `ParsedCommand::Unknown` which the caller
//! turns into a status message.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    /// `:w` or `:w <path>`
    Write(Option<PathBuf>),
    /// `:q`
    Quit,
    /// `:wq` or `:x`
    WriteQuit,
    /// `:<line>`
    Goto(usize),
    /// Blank command line.
    Empty,
    Unknown(String),
}

pub struct CommandParser;

impl CommandParser {
    /// `raw` is the command line without its `:` prompt; a leading `:` is
    /// tolerated.
    pub fn parse(raw: &str) -> ParsedCommand {
        let s = raw.trim();
        let body = s.strip_prefix(':').unwrap_or(s).trim_start();
        if body.is_empty() {
            return ParsedCommand::Empty;
        }
        if body.chars().all(|c| c.is_ascii_digit()) {
            return match body.parse() {
                Ok(line) => ParsedCommand::Goto(line),
                Err(_) => ParsedCommand::Unknown(body.to_string()),
            };
        }
        let (name, arg) = match body.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (body, ""),
        };
        match (name, arg.is_empty()) {
            ("q" | "quit", true) => ParsedCommand::Quit,
            ("w" | "write", true) => ParsedCommand::Write(None),
            ("w" | "write", false) => ParsedCommand::Write(Some(PathBuf::from(arg))),
            ("wq" | "x", true) => ParsedCommand::WriteQuit,
            _ => ParsedCommand::Unknown(body.to_string()),
        }
    }
}
