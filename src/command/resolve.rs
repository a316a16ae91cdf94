/// Command resolution: map raw arguments to an entry in a [`FlatTable`].
///
/// Resolution strategy:
///
/// 1. **Index routing**: no arguments, or a leading flag, goes to the `index`
///    entry with every argument left for the flag parser.
/// 2. **Longest prefix**: try the first `n` tokens joined by spaces, for `n`
///    from all of them down to one. `remote add x` prefers `"remote add"` over
///    a shorter `"remote"`.
/// 3. **Not found**: report fuzzy suggestions for the first token.
use std::sync::Arc;

use nucleo_matcher::{
    Matcher, Utf32Str,
    pattern::{CaseMatching, Normalization, Pattern},
};

use super::errors::KroshError;
use super::flatten::FlatTable;
use super::tree::{Command, INDEX};

/// Maximum number of "did you mean" candidates.
const MAX_SUGGESTIONS: usize = 3;

/// A matched command and the arguments left for its flag parser.
#[derive(Debug)]
pub struct Resolved<'a> {
    pub command: &'a Arc<Command>,
    /// Tokens after the matched path.
    pub args: &'a [String],
    /// The matched path; `None` when routed to `index` without a name.
    pub name: Option<String>,
}

/// Find the command `argv` addresses.
///
/// # Errors
///
/// `KroshError::NotFound` when no prefix of `argv` is a known path, or when a
/// leading flag needs an `index` entry the table lacks.
pub fn resolve<'a>(
    table: &'a FlatTable,
    argv: &'a [String],
) -> Result<Resolved<'a>, KroshError> {
    let routes_to_index = argv.first().is_none_or(|first| first.starts_with('-'));
    if routes_to_index {
        return table
            .get(INDEX)
            .map(|command| Resolved {
                command,
                args: argv,
                name: None,
            })
            .ok_or(KroshError::NotFound {
                suggestions: Vec::new(),
            });
    }

    for i in (1..=argv.len()).rev() {
        let name = argv[..i].join(" ");
        if let Some(command) = table.get(&name) {
            return Ok(Resolved {
                command,
                args: &argv[i..],
                name: Some(name),
            });
        }
    }

    Err(KroshError::NotFound {
        suggestions: suggest(table, &argv[0]),
    })
}

/// Command paths that fuzzily match `query`, best first.
///
/// An alias and the path it expands from share one command; only the better
/// scoring of the two is listed.
#[must_use]
pub fn suggest(table: &FlatTable, query: &str) -> Vec<String> {
    let pattern = Pattern::parse(query, CaseMatching::Smart, Normalization::Smart);
    let mut matcher = Matcher::new(nucleo_matcher::Config::DEFAULT);

    let mut scored: Vec<(&str, &Arc<Command>, u32)> = table
        .iter()
        .filter(|(path, _)| path.as_str() != INDEX)
        .filter_map(|(path, command)| {
            let mut buf = Vec::new();
            let haystack = Utf32Str::new(path, &mut buf);
            pattern
                .score(haystack, &mut matcher)
                .map(|score| (path.as_str(), command, score))
        })
        .collect();

    // Stable sort keeps table order among equal scores.
    scored.sort_by(|a, b| b.2.cmp(&a.2));

    let mut seen: Vec<&Arc<Command>> = Vec::new();
    let mut suggestions = Vec::new();
    for (path, command, _) in scored {
        if seen.iter().any(|prev| Arc::ptr_eq(prev, command)) {
            continue;
        }
        seen.push(command);
        suggestions.push(path.to_owned());
        if suggestions.len() == MAX_SUGGESTIONS {
            break;
        }
    }
    suggestions
}
