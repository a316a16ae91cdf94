#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! krosh — route nested command trees to async handlers.
//!
//! Define commands in a [`CommandTree`], hand it to an [`App`], and dispatch
//! an argument vector. The longest run of leading arguments that names a
//! command wins; the rest are parsed against that command's flag schema and
//! passed to its handler. Every command gets `-h/--help`, and the empty
//! invocation prints a listing of every command.

pub mod app;
pub mod cli;
pub mod command;
pub mod dispatch;
pub mod types;

pub use app::{App, Meta};
pub use cli::{Captured, ColorChoice, Output, ParseError, Stdio};
pub use command::{Command, CommandTree, KroshError, Node, OptionKind, OptionSpec};
pub use dispatch::{Outcome, run};
pub use types::{Arguments, Context, Value};
