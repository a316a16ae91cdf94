/// Help text: the top-level command listing and per-command help.
use super::args::{shorts, with_help};
use super::output::Style;
use crate::app::Meta;
use crate::command::{Command, CommandTree, flatten};

/// Render `--help` for the command matched as `name` (e.g. `"remote add"`).
#[must_use]
pub fn command_help(command: &Command, name: &str, meta: &Meta, style: &Style) -> String {
    let program = meta.name();
    let parent = name.rsplit_once(' ').map_or("", |(parent, _)| parent);

    let usage = style.bold(&format!(
        "Usage: {program}{} [...flags] [...args]",
        pad_start(name)
    ));

    let aliases = if command.aliases().is_empty() {
        String::new()
    } else {
        let list: Vec<String> = command
            .aliases()
            .iter()
            .map(|alias| format!("{program}{} {alias}", pad_start(parent)))
            .collect();
        format!("{}\n", style.bold(&format!("Alias: {}", list.join(", "))))
    };

    let description = format!("\n{}\n", command.description());

    let options = command.options();
    let flags = if options.is_empty() {
        String::new()
    } else {
        let width = max_width(options.keys()) + 4;
        let merged = with_help(options);
        let shorts = shorts(&merged);
        let lines: Vec<String> = options
            .iter()
            .map(|(long, spec)| {
                let short = shorts
                    .get(long.as_str())
                    .map_or_else(|| "    ".to_owned(), |s| format!("  -{s}"));
                format!(
                    "{}, {} {}",
                    style.bold(&short),
                    style.bold(&format!("--{long:<width$}")),
                    spec.description.as_deref().unwrap_or_default()
                )
            })
            .collect();
        format!("\nFlags:\n{}", lines.join("\n"))
    };

    format!("{usage}\n{aliases}{description}{flags}\n")
}

/// Render the listing the built-in index command prints.
///
/// Columns are padded against the widest path and alias list in the whole
/// table, so rows line up regardless of nesting depth.
#[must_use]
pub fn listing(commands: &CommandTree, meta: &Meta, style: &Style) -> String {
    let table = flatten(commands, false);
    let alias_lists: Vec<String> = table.values().map(|c| c.aliases().join(", ")).collect();
    let name_width = max_width(table.keys()) + 2;
    let alias_width = max_width(&alias_lists) + 4;

    let rows: Vec<String> = if table.is_empty() {
        vec!["  ...".to_owned()]
    } else {
        table
            .iter()
            .zip(&alias_lists)
            .map(|((path, command), aliases)| {
                format!(
                    "  {}{}{}",
                    style.bold(&format!("{path:<name_width$}")),
                    style.dim(&format!("{aliases:<alias_width$}")),
                    command.description()
                )
            })
            .collect()
    };

    let header = format!(
        "{}{}",
        meta.description
            .as_deref()
            .map(|d| format!("{d} "))
            .unwrap_or_default(),
        style.dim(&format!("({})", meta.version()))
    );
    let usage = style.bold(&format!(
        "Usage: {} <command> [...flags] [...args]",
        meta.name()
    ));
    let mut commands_section = vec![style.bold("Commands:")];
    commands_section.extend(rows);
    commands_section.push(String::new());

    [header, usage, commands_section.join("\n")].join("\n\n")
}

fn pad_start(text: &str) -> String {
    if text.is_empty() {
        String::new()
    } else {
        format!(" {text}")
    }
}

fn max_width<I, S>(items: I) -> usize
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| s.as_ref().chars().count())
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::command::OptionSpec;

    fn cmd(desc: &str) -> Command {
        Command::new(desc, |_| async { Ok(()) })
    }

    fn meta() -> Meta {
        Meta {
            name: Some("git".to_owned()),
            description: Some("A tiny git.".to_owned()),
            version: Some("1.2.3".to_owned()),
        }
    }

    #[test]
    fn test_command_help() {
        let command = cmd("Remove a remote")
            .alias("rm")
            .option(
                "force",
                OptionSpec::boolean().short('f').description("Skip checks"),
            )
            .option("dry-run", OptionSpec::boolean());
        let text = command_help(&command, "remote remove", &meta(), &Style::plain());
        assert_eq!(
            text,
            "Usage: git remote remove [...flags] [...args]\n\
             Alias: git remote rm\n\
             \n\
             Remove a remote\n\
             \n\
             Flags:\n  \
             -f, --force       Skip checks\n    \
             , --dry-run     \n"
        );
    }

    #[test]
    fn test_command_help_omits_short_taken_by_help() {
        let command = cmd("Connect").option(
            "host",
            OptionSpec::string().short('h').description("Server"),
        );
        let text = command_help(&command, "connect", &meta(), &Style::plain());
        assert!(text.ends_with("Flags:\n    , --host     Server\n"));
    }

    #[test]
    fn test_command_help_without_flags_or_meta() {
        let text = command_help(&cmd("Build"), "build", &Meta::default(), &Style::plain());
        assert_eq!(text, "Usage: unknown build [...flags] [...args]\n\nBuild\n\n");
    }

    #[test]
    fn test_listing_pads_across_whole_table() {
        let tree = CommandTree::new()
            .command("init", cmd("Create a repo"))
            .group(
                "remote",
                CommandTree::new()
                    .command("remove", cmd("Remove a remote").alias("rm").alias("del")),
            );
        let text = listing(&tree, &meta(), &Style::plain());
        assert_eq!(
            text,
            format!(
                "A tiny git. (1.2.3)\n\n\
                 Usage: git <command> [...flags] [...args]\n\n\
                 Commands:\n\
                 \x20 init{}Create a repo\n\
                 \x20 remote remove  rm, del    Remove a remote\n",
                " ".repeat(22)
            )
        );
    }

    #[test]
    fn test_listing_empty() {
        let text = listing(&CommandTree::new(), &Meta::default(), &Style::plain());
        assert_eq!(
            text,
            "(0.0.0)\n\nUsage: unknown <command> [...flags] [...args]\n\nCommands:\n  ...\n"
        );
    }
}
