/// Demo command tree: routes each path to its handler.
pub mod echo;
pub mod greet;
pub mod remote;

use krosh::{Command, CommandTree};

/// Every command the demo binary knows.
pub fn tree() -> CommandTree {
    CommandTree::new()
        .group("remote", remote::tree())
        .command("echo", echo::command())
        .command("greet", greet::command())
        .command(
            "fail",
            Command::new("Exit with an error.", |_| async {
                Err(anyhow::anyhow!("this command always fails"))
            }),
        )
}
