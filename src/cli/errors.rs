/// Errors from the flag parser.
use thiserror::Error;

/// Typed failures while parsing flags against a command's schema.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A flag that the schema does not declare.
    #[error("Unknown option '{0}'")]
    UnknownOption(String),

    /// A string option given without its value.
    #[error("Option '{0}' requires a value")]
    MissingValue(String),

    /// A boolean flag given an inline value (`--force=yes`).
    #[error("Option '{0}' does not take a value")]
    UnexpectedValue(String),

    /// The schema itself is unusable (duplicate short alias, mismatched default).
    #[error("Invalid option '{option}': {reason}")]
    InvalidSchema {
        /// Long name of the offending option.
        option: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A process argument that is not valid UTF-8, shown lossily.
    #[error("Argument '{0}' is not valid UTF-8")]
    NotUnicode(String),

    /// Any other rejection, with the parser's own message.
    #[error("{0}")]
    Invalid(String),
}
