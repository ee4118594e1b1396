//! Terminal status notes and colour detection.
//!
//! Notes go to stderr so stdout carries only the rendered analysis.

use std::io::IsTerminal;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";

/// Whether stdout is a colour-capable terminal. `NO_COLOR` always wins.
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() || !std::io::stdout().is_terminal() {
        return false;
    }
    std::env::var_os("COLORTERM").is_some()
        || std::env::var("TERM").is_ok_and(|t| t != "dumb")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Note {
    Info,
    Warn,
    Error,
    Success,
}

impl Note {
    fn symbol(self) -> &'static str {
        match self {
            Note::Info => "ℹ",
            Note::Warn => "⚠",
            Note::Error => "✗",
            Note::Success => "✓",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Note::Info => "INFO",
            Note::Warn => "WARN",
            Note::Error => "ERROR",
            Note::Success => "OK",
        }
    }

    fn color(self) -> &'static str {
        match self {
            Note::Info => "\x1b[36m",
            Note::Warn => "\x1b[33m",
            Note::Error => "\x1b[31m",
            Note::Success => "\x1b[32m",
        }
    }

    /// One formatted line, with or without ANSI styling.
    pub fn format(self, msg: &str, color: bool) -> String {
        if color {
            format!("{}{BOLD}{}{RESET} {msg}", self.color(), self.symbol())
        } else {
            format!("{}: {msg}", self.label())
        }
    }
}

/// Print a status note to stderr.
pub fn note(kind: Note, msg: &str) {
    eprintln!("{}", kind.format(msg, supports_color()));
}
