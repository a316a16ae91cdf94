/// CLI layer: flag parsing, help rendering, output sinks.
pub mod args;
pub mod errors;
pub mod help;
pub mod output;

pub use args::{HELP, parse, with_help};
pub use errors::ParseError;
pub use help::{command_help, listing};
pub use output::{Captured, ColorChoice, Output, Stdio, Style};
