/// `echo` command: print positionals, optionally tagged or as JSON.
use krosh::{Command, OptionSpec};

pub fn command() -> Command {
    Command::new("Print the arguments.", |ctx| async move {
        if ctx.args.flag("json") {
            println!("{}", serde_json::to_string_pretty(&ctx)?);
            return Ok(());
        }

        let mut line = ctx.positionals.join(" ");
        if ctx.args.flag("upper") {
            line = line.to_uppercase();
        }
        let tags = ctx.args.strings("tag");
        if tags.is_empty() {
            println!("{line}");
        } else {
            println!("[{}] {line}", tags.join(", "));
        }
        Ok(())
    })
    .alias("say")
    .option(
        "tag",
        OptionSpec::string()
            .short('t')
            .multiple()
            .description("Prefix tag; repeatable."),
    )
    .option(
        "upper",
        OptionSpec::boolean()
            .short('u')
            .description("Uppercase the output."),
    )
    .option(
        "json",
        OptionSpec::boolean().description("Print the parsed arguments as JSON."),
    )
}
