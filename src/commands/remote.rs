/// `remote` group: list, add, and remove remotes.
use anyhow::Context as _;
use krosh::{Command, CommandTree, OptionSpec};

/// Remotes every demo checkout starts with.
const DEFAULT_REMOTES: &[(&str, &str)] = &[("origin", "https://example.com/repo.git")];

pub fn tree() -> CommandTree {
    CommandTree::new()
        .command("index", list())
        .command("add", add())
        .command("remove", remove())
}

fn list() -> Command {
    Command::new("Show remotes.", |ctx| async move {
        for (name, url) in DEFAULT_REMOTES {
            if ctx.args.flag("verbose") {
                println!("{name}\t{url}");
            } else {
                println!("{name}");
            }
        }
        Ok(())
    })
    .option(
        "verbose",
        OptionSpec::boolean()
            .short('v')
            .description("Show remote URLs."),
    )
}

fn add() -> Command {
    Command::new("Add a remote.", |ctx| async move {
        let name = ctx
            .positionals
            .first()
            .context("usage: remote add <name> --url <url>")?;
        let url = ctx.args.string("url").context("missing --url")?;
        println!("Added remote {name} -> {url}");
        Ok(())
    })
    .alias("a")
    .option(
        "url",
        OptionSpec::string().short('u').description("Remote URL."),
    )
}

fn remove() -> Command {
    Command::new("Remove a remote.", |ctx| async move {
        if ctx.positionals.is_empty() {
            anyhow::bail!("usage: remote remove <name>...");
        }
        for name in &ctx.positionals {
            if ctx.args.flag("dry-run") {
                println!("Would remove remote {name}");
            } else {
                println!("Removed remote {name}");
            }
        }
        Ok(())
    })
    .alias("rm")
    .option(
        "dry-run",
        OptionSpec::boolean()
            .short('n')
            .description("Only show what would be removed."),
    )
}
