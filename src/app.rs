/// Top-level invocation options: the command tree plus program metadata.
use std::ffi::OsString;

use serde::{Deserialize, Serialize};

use crate::cli::{ColorChoice, Output, ParseError, Stdio};
use crate::command::{CommandTree, KroshError};
use crate::dispatch::{Outcome, fail, run};

/// Program name shown when none is configured.
pub const UNKNOWN_NAME: &str = "unknown";
/// Version printed when none is configured.
pub const DEFAULT_VERSION: &str = "0.0.0";

/// Program metadata shown in listings, help, and `--version`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Executable name (e.g. "npm").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Meta {
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_NAME)
    }

    #[must_use]
    pub fn version(&self) -> &str {
        self.version.as_deref().unwrap_or(DEFAULT_VERSION)
    }
}

/// Build a [`Meta`] from the calling crate's Cargo package metadata.
#[macro_export]
macro_rules! meta {
    () => {
        $crate::Meta {
            name: Some(env!("CARGO_PKG_NAME").to_owned()),
            description: Some(env!("CARGO_PKG_DESCRIPTION"))
                .filter(|d| !d.is_empty())
                .map(str::to_owned),
            version: Some(env!("CARGO_PKG_VERSION").to_owned()),
        }
    };
}

/// A command tree ready to dispatch.
#[derive(Debug, Clone, Default)]
pub struct App {
    pub commands: CommandTree,
    pub meta: Meta,
    pub color: ColorChoice,
}

impl App {
    #[must_use]
    pub fn new(commands: CommandTree) -> Self {
        Self {
            commands,
            meta: Meta::default(),
            color: ColorChoice::default(),
        }
    }

    #[must_use]
    pub fn meta(mut self, meta: Meta) -> Self {
        self.meta = meta;
        self
    }

    #[must_use]
    pub fn color(mut self, color: ColorChoice) -> Self {
        self.color = color;
        self
    }

    /// Dispatch `argv` (without the program name), reporting to `out`.
    pub async fn run<I, S>(&self, argv: I, out: &mut dyn Output) -> Outcome
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        run(self, &argv, out).await
    }

    /// Dispatch raw OS arguments; a token that is not UTF-8 fails as a parse error.
    pub async fn run_os<I>(&self, argv: I, out: &mut dyn Output) -> Outcome
    where
        I: IntoIterator<Item = OsString>,
    {
        let argv: Result<Vec<String>, OsString> =
            argv.into_iter().map(OsString::into_string).collect();
        match argv {
            Ok(argv) => run(self, &argv, out).await,
            Err(bad) => {
                let err = ParseError::NotUnicode(bad.to_string_lossy().into_owned());
                fail(KroshError::from(err), out)
            }
        }
    }

    /// Dispatch the process arguments, reporting to stdout/stderr.
    pub async fn run_env(&self) -> Outcome {
        self.run_os(std::env::args_os().skip(1), &mut Stdio).await
    }
}
