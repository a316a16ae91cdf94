/// Output sinks and terminal styling.
use std::io::{IsTerminal, Write};

use colored::Colorize;
use serde::{Deserialize, Serialize};

/// Where dispatch writes listings, help, and errors.
///
/// Informational text goes to `info`, failures to `error`. Each call is one
/// message; the sink terminates it with a newline.
pub trait Output: Send {
    fn info(&mut self, text: &str);
    fn error(&mut self, text: &str);
}

/// Writes `info` to stdout and `error` to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stdio;

impl Output for Stdio {
    fn info(&mut self, text: &str) {
        let stdout = std::io::stdout();
        let _ = writeln!(stdout.lock(), "{text}");
    }

    fn error(&mut self, text: &str) {
        let stderr = std::io::stderr();
        let _ = writeln!(stderr.lock(), "{text}");
    }
}

/// Buffers both streams in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captured {
    pub stdout: String,
    pub stderr: String,
}

impl Output for Captured {
    fn info(&mut self, text: &str) {
        self.stdout.push_str(text);
        self.stdout.push('\n');
    }

    fn error(&mut self, text: &str) {
        self.stderr.push_str(text);
        self.stderr.push('\n');
    }
}

/// Whether listings and help use bold/dim styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    /// Style when stdout is a terminal; `colored` also honors `NO_COLOR`/`CLICOLOR`.
    #[default]
    Auto,
    /// Always plain text.
    Never,
}

/// Applies (or skips) bold/dim styling.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    enabled: bool,
}

impl Style {
    /// Resolve a [`ColorChoice`] against the current stdout.
    #[must_use]
    pub fn new(choice: ColorChoice) -> Self {
        let enabled = match choice {
            ColorChoice::Auto => std::io::stdout().is_terminal(),
            ColorChoice::Never => false,
        };
        Self { enabled }
    }

    #[must_use]
    pub fn plain() -> Self {
        Self { enabled: false }
    }

    #[must_use]
    pub fn bold(&self, text: &str) -> String {
        if self.enabled {
            text.bold().to_string()
        } else {
            text.to_owned()
        }
    }

    #[must_use]
    pub fn dim(&self, text: &str) -> String {
        if self.enabled {
            text.dimmed().to_string()
        } else {
            text.to_owned()
        }
    }
}
