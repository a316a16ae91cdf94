/// Dispatch: match arguments to a command, parse its flags, run it.
///
/// Every failure is reported to the output sink and returned as an
/// [`Outcome`]; nothing panics or escapes as an error past this boundary.
use std::sync::Arc;

use tracing::{debug, warn};

use crate::app::App;
use crate::cli::{HELP, Output, Style, command_help, listing, parse, with_help};
use crate::command::{
    Action, Command, CommandTree, FlatTable, INDEX, KroshError, collisions, flatten, resolve,
};

/// Flag the built-in index command reads.
const VERSION: &str = "version";

/// How a dispatch ended.
#[must_use]
#[derive(Debug)]
pub enum Outcome {
    /// A handler, listing, version, or help ran to completion.
    Completed,
    /// The failure, already written to the error sink.
    Failed(KroshError),
}

impl Outcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Process exit code for this outcome.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Completed => 0,
            Self::Failed(err) => err.exit_code(),
        }
    }
}

/// Build the match table: the built-in index, then `commands` with aliases.
///
/// A top-level `index` in `commands` replaces the built-in one.
#[must_use]
pub fn table(commands: &CommandTree) -> FlatTable {
    let mut table = FlatTable::new();
    table.insert(INDEX.to_owned(), Arc::new(Command::index()));
    table.extend(flatten(commands, true));
    table
}

/// Dispatch `argv` (without the program name) against `app`.
pub async fn run(app: &App, argv: &[String], out: &mut dyn Output) -> Outcome {
    match dispatch(app, argv, out).await {
        Ok(()) => Outcome::Completed,
        Err(err) => fail(err, out),
    }
}

/// Report `err` to the error sink and wrap it as a failed [`Outcome`].
pub(crate) fn fail(err: KroshError, out: &mut dyn Output) -> Outcome {
    report(&err, out);
    Outcome::Failed(err)
}

async fn dispatch(app: &App, argv: &[String], out: &mut dyn Output) -> Result<(), KroshError> {
    for path in collisions(&app.commands) {
        warn!(%path, "command path defined more than once; the last definition wins");
    }

    let table = table(&app.commands);
    let found = resolve(&table, argv)?;
    debug!(
        command = found.name.as_deref().unwrap_or(INDEX),
        remaining = ?found.args,
        "matched command"
    );

    let ctx = parse(&with_help(found.command.options()), found.args)?;
    debug!(args = ?ctx.args, positionals = ?ctx.positionals, "parsed arguments");

    let style = Style::new(app.color);
    if ctx.args.is_set(HELP) {
        if let Some(name) = &found.name {
            debug!(command = %name, "rendering help");
            out.info(&command_help(found.command, name, &app.meta, &style));
            return Ok(());
        }
    }

    match found.command.action() {
        Action::Index => {
            if ctx.args.flag(VERSION) {
                out.info(app.meta.version());
            } else {
                out.info(&listing(&app.commands, &app.meta, &style));
            }
            Ok(())
        }
        Action::Run(handler) => handler(ctx).await.map_err(KroshError::Handler),
    }
}

fn report(err: &KroshError, out: &mut dyn Output) {
    out.error(&err.to_string());
    if let KroshError::NotFound { suggestions } = err {
        if !suggestions.is_empty() {
            out.error(&format!("Did you mean: {}?", suggestions.join(", ")));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::app::Meta;
    use crate::cli::{Captured, ColorChoice};
    use crate::command::OptionSpec;
    use crate::types::Context;

    type Calls = Arc<Mutex<Vec<Context>>>;

    fn recording(desc: &str, calls: &Calls) -> Command {
        let calls = Arc::clone(calls);
        Command::new(desc, move |ctx| {
            let calls = Arc::clone(&calls);
            async move {
                calls.lock().unwrap().push(ctx);
                Ok(())
            }
        })
    }

    fn app(commands: CommandTree) -> App {
        App::new(commands)
            .meta(Meta {
                name: Some("git".to_owned()),
                description: None,
                version: Some("2.1.0".to_owned()),
            })
            .color(ColorChoice::Never)
    }

    #[tokio::test]
    async fn test_nested_command_receives_parsed_flags() {
        let calls = Calls::default();
        let tree = CommandTree::new().group(
            "remote",
            CommandTree::new().command(
                "add",
                recording("Add a remote", &calls).option("url", OptionSpec::string()),
            ),
        );
        let mut out = Captured::default();
        let outcome = app(tree)
            .run(["remote", "add", "--url", "http://x"], &mut out)
            .await;

        assert!(outcome.is_success());
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].args.string("url"), Some("http://x"));
        assert!(calls[0].positionals.is_empty());
        assert_eq!(out, Captured::default());
    }

    #[tokio::test]
    async fn test_longest_prefix_and_alias() {
        let short = Calls::default();
        let long = Calls::default();
        let tree = CommandTree::new()
            .command("a", recording("A", &short))
            .command("a b", recording("A B", &long).alias("ab"));
        let app = app(tree);
        let mut out = Captured::default();

        let _ = app.run(["a", "b", "x"], &mut out).await;
        let _ = app.run(["ab"], &mut out).await;

        assert!(short.lock().unwrap().is_empty());
        let long = long.lock().unwrap();
        assert_eq!(long.len(), 2);
        assert_eq!(long[0].positionals, ["x".to_owned()]);
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let mut out = Captured::default();
        let outcome = app(CommandTree::new()).run(["foo"], &mut out).await;

        assert!(matches!(
            outcome,
            Outcome::Failed(KroshError::NotFound { .. })
        ));
        assert_eq!(outcome.exit_code(), 127);
        assert_eq!(out.stderr, "Command not found.\n");
        assert!(out.stdout.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_command_suggests() {
        let calls = Calls::default();
        let tree = CommandTree::new().command("status", recording("Show status", &calls));
        let mut out = Captured::default();
        let _ = app(tree).run(["stat"], &mut out).await;
        assert_eq!(out.stderr, "Command not found.\nDid you mean: status?\n");
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_help_never_runs_handler() {
        let calls = Calls::default();
        let tree = CommandTree::new().command(
            "push",
            recording("Push changes", &calls)
                .option("force", OptionSpec::boolean().short('f').description("Force it")),
        );
        let app = app(tree);

        for flag in ["--help", "-h"] {
            let mut out = Captured::default();
            let outcome = app.run(["push", flag], &mut out).await;
            assert!(outcome.is_success());
            assert_eq!(
                out.stdout,
                "Usage: git push [...flags] [...args]\n\n\
                 Push changes\n\n\
                 Flags:\n  -f, --force     Force it\n\n"
            );
        }
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_help_redefined_as_string_still_shows_help() {
        let calls = Calls::default();
        let tree = CommandTree::new().command(
            "docs",
            recording("Docs", &calls).option("help", OptionSpec::string()),
        );
        let app = app(tree);

        let mut out = Captured::default();
        let outcome = app.run(["docs", "--help", "topic"], &mut out).await;
        assert!(outcome.is_success());
        assert!(out.stdout.starts_with("Usage: git docs [...flags] [...args]\n"));
        assert!(calls.lock().unwrap().is_empty());

        let _ = app.run(["docs"], &mut Captured::default()).await;
        assert_eq!(calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_short_h_option_keeps_long_form() {
        let calls = Calls::default();
        let tree = CommandTree::new().command(
            "connect",
            recording("Connect", &calls).option("host", OptionSpec::string().short('h')),
        );
        let app = app(tree);

        let mut out = Captured::default();
        let outcome = app.run(["connect", "--host", "x"], &mut out).await;
        assert!(outcome.is_success());
        assert_eq!(out, Captured::default());

        let mut out = Captured::default();
        let _ = app.run(["connect", "-h"], &mut out).await;
        assert!(out.stdout.starts_with("Usage: git connect [...flags] [...args]\n"));

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].args.string("host"), Some("x"));
    }

    #[test]
    fn test_run_future_is_send() {
        fn assert_send<T: Send>(_: &T) {}

        let app = app(CommandTree::new());
        let mut out = Captured::default();
        let argv: Vec<String> = Vec::new();
        assert_send(&run(&app, &argv, &mut out));
        assert_send(&app.run(argv.clone(), &mut Captured::default()));
    }

    #[tokio::test]
    async fn test_version_routes_to_index() {
        let mut out = Captured::default();
        let outcome = app(CommandTree::new()).run(["--version"], &mut out).await;
        assert!(outcome.is_success());
        assert_eq!(out.stdout, "2.1.0\n");

        let mut out = Captured::default();
        let _ = App::new(CommandTree::new()).run(["-v"], &mut out).await;
        assert_eq!(out.stdout, "0.0.0\n");
    }

    #[tokio::test]
    async fn test_no_arguments_prints_listing() {
        let calls = Calls::default();
        let tree = CommandTree::new().command("push", recording("Push changes", &calls));
        let app = app(tree);

        for argv in [vec![], vec!["--help"]] {
            let mut out = Captured::default();
            let _ = app.run(argv, &mut out).await;
            assert_eq!(
                out.stdout,
                "(2.1.0)\n\n\
                 Usage: git <command> [...flags] [...args]\n\n\
                 Commands:\n  push      Push changes\n\n"
            );
        }
    }

    #[tokio::test]
    async fn test_explicit_index_shows_help() {
        let mut out = Captured::default();
        let _ = app(CommandTree::new()).run(["index", "--help"], &mut out).await;
        assert!(out.stdout.starts_with("Usage: git index [...flags] [...args]\n"));
        assert!(out.stdout.contains("--version"));
    }

    #[tokio::test]
    async fn test_user_index_replaces_builtin() {
        let calls = Calls::default();
        let tree = CommandTree::new().command("index", recording("Home", &calls));
        let mut out = Captured::default();
        let _ = app(tree).run(Vec::<String>::new(), &mut out).await;
        assert_eq!(calls.lock().unwrap().len(), 1);
        assert!(out.stdout.is_empty());
    }

    #[tokio::test]
    async fn test_parse_error_stops_dispatch() {
        let calls = Calls::default();
        let tree = CommandTree::new().command("push", recording("Push", &calls));
        let mut out = Captured::default();
        let outcome = app(tree).run(["push", "--nope"], &mut out).await;

        assert!(matches!(outcome, Outcome::Failed(KroshError::Parse(_))));
        assert_eq!(outcome.exit_code(), 2);
        assert_eq!(out.stderr, "Unknown option '--nope'\n");
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_handler_error_is_reported() {
        let tree = CommandTree::new().command(
            "fail",
            Command::new("Always fails", |_| async { anyhow::bail!("disk full") }),
        );
        let mut out = Captured::default();
        let outcome = app(tree).run(["fail"], &mut out).await;

        assert!(matches!(outcome, Outcome::Failed(KroshError::Handler(_))));
        assert_eq!(outcome.exit_code(), 1);
        assert_eq!(out.stderr, "disk full\n");
    }

    #[tokio::test]
    async fn test_multiple_flag_through_dispatch() {
        let calls = Calls::default();
        let tree = CommandTree::new()
            .command(
                "many",
                recording("Many", &calls).option("tag", OptionSpec::string().multiple()),
            )
            .command(
                "one",
                recording("One", &calls).option("tag", OptionSpec::string()),
            );
        let app = app(tree);
        let mut out = Captured::default();
        let _ = app.run(["many", "--tag", "foo", "--tag", "bar"], &mut out).await;
        let _ = app.run(["one", "--tag", "foo", "--tag", "bar"], &mut out).await;

        let calls = calls.lock().unwrap();
        assert_eq!(calls[0].args.strings("tag"), ["foo".to_owned(), "bar".to_owned()]);
        assert_eq!(calls[1].args.string("tag"), Some("bar"));
    }

    #[test]
    fn test_table_puts_index_first() {
        let calls = Calls::default();
        let tree = CommandTree::new().command("push", recording("Push", &calls).alias("p"));
        let t = table(&tree);
        let keys: Vec<&str> = t.keys().map(String::as_str).collect();
        assert_eq!(keys, ["index", "push", "p"]);
    }
}
