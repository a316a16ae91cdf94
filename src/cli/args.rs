/// Flag parsing against a command's declarative schema, via the clap builder.
///
/// Semantics:
///
/// - Flags are accepted as `--name`, `-n`, `--name=value`, `-nvalue`, and
///   clustered shorts (`-fv`). Boolean flags also accept `--no-name`.
/// - Occurrences are replayed in command-line order, so `--x --no-x` ends up
///   `false`, and a `multiple` flag collects every occurrence.
/// - Unset options take their default, or `false` / `[]` for booleans.
/// - Every other token is a positional; `--` ends flag parsing.
use std::collections::HashMap;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{Arg, ArgAction, ArgMatches, ColorChoice};
use indexmap::IndexMap;
use tracing::warn;

use super::errors::ParseError;
use crate::command::{OptionKind, OptionSpec};
use crate::types::{Arguments, Context, Value};

/// Id of the catch-all positional argument.
const POSITIONALS: &str = "[args]";

/// Value clap records for a boolean flag given without `=value`.
/// Real arguments cannot contain NUL, so this never collides with user input.
const FLAG_SET: &str = "\0";

/// Name of the flag every command implicitly accepts.
pub const HELP: &str = "help";

/// The implicit `-h/--help` flag merged into every command's schema.
#[must_use]
pub fn help_option() -> OptionSpec {
    OptionSpec::boolean()
        .short('h')
        .description("Print the help menu")
}

/// `help` first, then the command's own options; a command may redefine `help`.
#[must_use]
pub fn with_help(options: &IndexMap<String, OptionSpec>) -> IndexMap<String, OptionSpec> {
    let mut merged = IndexMap::with_capacity(options.len() + 1);
    merged.insert(HELP.to_owned(), help_option());
    for (name, spec) in options {
        merged.insert(name.clone(), spec.clone());
    }
    merged
}

/// Parse `tokens` against `schema` into handler arguments.
///
/// # Errors
///
/// - `ParseError::InvalidSchema` — the schema cannot be parsed against
/// - `ParseError::UnknownOption` — a flag not in the schema
/// - `ParseError::MissingValue` — a string option without a value
/// - `ParseError::UnexpectedValue` — a boolean flag with an inline value
/// - `ParseError::Invalid` — anything else clap rejects
pub fn parse(
    schema: &IndexMap<String, OptionSpec>,
    tokens: &[String],
) -> Result<Context, ParseError> {
    validate(schema)?;

    let shorts = shorts(schema);
    for (name, spec) in schema {
        if let Some(short) = spec.short {
            if !shorts.contains_key(name.as_str()) {
                warn!(option = %name, %short, "short alias already claimed by another option");
            }
        }
    }

    let matches = build(schema, &shorts)
        .try_get_matches_from(tokens)
        .map_err(from_clap)?;

    let mut args = Arguments::new();
    for (name, spec) in schema {
        let value = match spec.kind {
            OptionKind::String => string_value(&matches, name, spec),
            OptionKind::Boolean => Some(bool_value(&matches, schema, name, spec)?),
        };
        if let Some(value) = value {
            args.insert(name.clone(), value);
        }
    }

    let positionals = matches
        .get_many::<String>(POSITIONALS)
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    Ok(Context { args, positionals })
}

/// Short aliases in effect, keyed by long name.
///
/// The first option to declare a short keeps it; later options declaring the
/// same short are reachable by their long name only. With [`with_help`] this
/// leaves `-h` bound to help.
#[must_use]
pub(crate) fn shorts(schema: &IndexMap<String, OptionSpec>) -> HashMap<&str, char> {
    let mut owners: HashMap<char, &str> = HashMap::new();
    for (name, spec) in schema {
        if let Some(short) = spec.short {
            owners.entry(short).or_insert(name.as_str());
        }
    }
    owners.into_iter().map(|(short, name)| (name, short)).collect()
}

/// Reject schemas clap would refuse or that produce ill-shaped values.
fn validate(schema: &IndexMap<String, OptionSpec>) -> Result<(), ParseError> {
    for (name, spec) in schema {
        let invalid = |reason: &str| ParseError::InvalidSchema {
            option: name.clone(),
            reason: reason.to_owned(),
        };

        if name.is_empty() || name.starts_with('-') || name.contains(['=', ' ']) {
            return Err(invalid("long names must be non-empty words"));
        }
        if let Some(short) = spec.short {
            if short == '-' || short.is_whitespace() {
                return Err(invalid("short alias must be a visible character"));
            }
        }
        if let Some(default) = &spec.default {
            if !spec.accepts(default) {
                return Err(invalid("default does not match the option type"));
            }
        }
    }
    Ok(())
}

fn build(schema: &IndexMap<String, OptionSpec>, shorts: &HashMap<&str, char>) -> clap::Command {
    let mut command = clap::Command::new("krosh")
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .color(ColorChoice::Never)
        .arg(
            Arg::new(POSITIONALS)
                .num_args(1..)
                .action(ArgAction::Append),
        );

    for (name, spec) in schema {
        let mut arg = Arg::new(name.clone())
            .long(name.clone())
            .action(ArgAction::Append);
        if let Some(&short) = shorts.get(name.as_str()) {
            arg = arg.short(short);
        }
        arg = match spec.kind {
            OptionKind::String => arg.num_args(1),
            OptionKind::Boolean => flag(arg),
        };
        command = command.arg(arg);

        if let Some(negated) = negation(schema, name, spec) {
            command = command.arg(flag(Arg::new(negated.clone()).long(negated)).hide(true));
        }
    }
    command
}

/// A boolean flag: no separate value, inline `=value` only so it can be rejected.
fn flag(arg: Arg) -> Arg {
    arg.action(ArgAction::Append)
        .num_args(0..=1)
        .require_equals(true)
        .default_missing_value(FLAG_SET)
}

/// Long name of the `--no-` form, unless the schema already claims it.
fn negation(
    schema: &IndexMap<String, OptionSpec>,
    name: &str,
    spec: &OptionSpec,
) -> Option<String> {
    let negated = format!("no-{name}");
    (spec.kind == OptionKind::Boolean && !schema.contains_key(&negated)).then_some(negated)
}

fn string_value(matches: &ArgMatches, name: &str, spec: &OptionSpec) -> Option<Value> {
    let values: Vec<String> = matches
        .get_many::<String>(name)
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    if values.is_empty() {
        return spec.default.clone();
    }
    if spec.multiple {
        Some(Value::Strings(values))
    } else {
        values.into_iter().last().map(Value::String)
    }
}

fn bool_value(
    matches: &ArgMatches,
    schema: &IndexMap<String, OptionSpec>,
    name: &str,
    spec: &OptionSpec,
) -> Result<Value, ParseError> {
    let mut occurrences = flag_occurrences(matches, name, true)?;
    if let Some(negated) = negation(schema, name, spec) {
        occurrences.extend(flag_occurrences(matches, &negated, false)?);
    }
    occurrences.sort_by_key(|(index, _)| *index);
    let values: Vec<bool> = occurrences.into_iter().map(|(_, value)| value).collect();

    let Some(&last) = values.last() else {
        return Ok(spec.default.clone().unwrap_or(if spec.multiple {
            Value::Bools(Vec::new())
        } else {
            Value::Bool(false)
        }));
    };
    Ok(if spec.multiple {
        Value::Bools(values)
    } else {
        Value::Bool(last)
    })
}

/// `(position, value)` for each time flag `id` appeared.
fn flag_occurrences(
    matches: &ArgMatches,
    id: &str,
    value: bool,
) -> Result<Vec<(usize, bool)>, ParseError> {
    let (Some(raw), Some(indices)) = (matches.get_many::<String>(id), matches.indices_of(id))
    else {
        return Ok(Vec::new());
    };
    raw.zip(indices)
        .map(|(raw, index)| {
            if raw == FLAG_SET {
                Ok((index, value))
            } else {
                Err(ParseError::UnexpectedValue(format!("--{id}")))
            }
        })
        .collect()
}

fn from_clap(err: clap::Error) -> ParseError {
    let invalid_arg = match err.get(ContextKind::InvalidArg) {
        Some(ContextValue::String(arg)) => arg.split_whitespace().next().map(str::to_owned),
        _ => None,
    };
    match (err.kind(), invalid_arg) {
        (ErrorKind::UnknownArgument, Some(arg)) => ParseError::UnknownOption(arg),
        (ErrorKind::InvalidValue | ErrorKind::NoEquals, Some(arg)) => {
            ParseError::MissingValue(arg)
        }
        _ => {
            let rendered = err.to_string();
            let first = rendered.lines().next().unwrap_or_default();
            ParseError::Invalid(first.trim_start_matches("error: ").to_owned())
        }
    }
}
