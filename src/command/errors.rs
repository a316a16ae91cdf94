/// Errors from the dispatch layer.
use thiserror::Error;

use crate::cli::ParseError;

/// Everything that can stop a dispatch before or while a handler runs.
#[derive(Debug, Error)]
pub enum KroshError {
    /// No command path matched the arguments and there was no index fallback.
    #[error("Command not found.")]
    NotFound {
        /// Close command paths, best first.
        suggestions: Vec<String>,
    },

    /// The flag parser rejected the arguments.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The command handler returned an error.
    #[error("{0}")]
    Handler(anyhow::Error),
}

/// Exit code mapping for `KroshError` variants.
impl KroshError {
    /// Return the process exit code a host would typically use for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => 127,
            Self::Parse(_) => 2,
            Self::Handler(_) => 1,
        }
    }
}
