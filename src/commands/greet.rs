/// `greet` command.
use krosh::{Command, OptionSpec};

pub fn command() -> Command {
    Command::new("Say hello.", |ctx| async move {
        let name = ctx.args.string("name").unwrap_or("world");
        let greeting = format!("Hello, {name}!");
        if ctx.args.flag("shout") {
            println!("{}", greeting.to_uppercase());
        } else {
            println!("{greeting}");
        }
        Ok(())
    })
    .option(
        "name",
        OptionSpec::string()
            .short('n')
            .default("world")
            .description("Who to greet."),
    )
    .option("shout", OptionSpec::boolean().description("Greet loudly."))
}
