#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! krosh — a small demo CLI dispatched by the krosh router.

mod commands;

use krosh::{App, meta};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let app = App::new(commands::tree()).meta(meta!());
    let outcome = app.run_env().await;
    std::process::exit(outcome.exit_code());
}
