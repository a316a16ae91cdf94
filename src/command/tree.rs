/// Command definitions and the recursive command tree.
///
/// A tree maps path segments to either a leaf [`Command`] or a nested group,
/// so `"remote add"` lives at `tree["remote"]["add"]`.
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::{Context, Value};

/// Tree key that anchors a command at its parent group's own path.
pub const INDEX: &str = "index";

/// The type of value a flag carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    String,
    Boolean,
}

/// Declarative description of one flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    pub kind: OptionKind,
    /// Accumulate every occurrence instead of keeping the last one.
    pub multiple: bool,
    pub short: Option<char>,
    /// Pre-set value; must be a sequence when `multiple` is set.
    pub default: Option<Value>,
    pub description: Option<String>,
}

impl OptionSpec {
    #[must_use]
    pub fn string() -> Self {
        Self::of(OptionKind::String)
    }

    #[must_use]
    pub fn boolean() -> Self {
        Self::of(OptionKind::Boolean)
    }

    fn of(kind: OptionKind) -> Self {
        Self {
            kind,
            multiple: false,
            short: None,
            default: None,
            description: None,
        }
    }

    #[must_use]
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    #[must_use]
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether `value` has the shape this option produces.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self.kind, self.multiple, value),
            (OptionKind::String, false, Value::String(_))
                | (OptionKind::String, true, Value::Strings(_))
                | (OptionKind::Boolean, false, Value::Bool(_))
                | (OptionKind::Boolean, true, Value::Bools(_))
        )
    }
}

/// A boxed async command handler.
pub type Handler = Arc<dyn Fn(Context) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// What happens when a command is dispatched.
#[derive(Clone)]
pub enum Action {
    /// Call a user-supplied handler.
    Run(Handler),
    /// Print the command listing or, with `--version`, the version.
    Index,
}

/// A named, invocable leaf with its own flag schema.
#[derive(Clone)]
pub struct Command {
    description: String,
    options: IndexMap<String, OptionSpec>,
    alias: Vec<String>,
    action: Action,
}

impl Command {
    /// Define a command from a description and an async handler.
    pub fn new<F, Fut>(description: impl Into<String>, run: F) -> Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let handler: Handler =
            Arc::new(move |ctx| -> BoxFuture<'static, anyhow::Result<()>> { Box::pin(run(ctx)) });
        Self {
            description: description.into(),
            options: IndexMap::new(),
            alias: Vec::new(),
            action: Action::Run(handler),
        }
    }

    /// The built-in top-level command: listing plus `-v/--version`.
    #[must_use]
    pub fn index() -> Self {
        Self {
            description: "Print the help menu.".to_owned(),
            options: IndexMap::new(),
            alias: Vec::new(),
            action: Action::Index,
        }
        .option(
            "version",
            OptionSpec::boolean()
                .short('v')
                .description("Print the version number."),
        )
    }

    #[must_use]
    pub fn option(mut self, name: impl Into<String>, spec: OptionSpec) -> Self {
        self.options.insert(name.into(), spec);
        self
    }

    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias.push(alias.into());
        self
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn options(&self) -> &IndexMap<String, OptionSpec> {
        &self.options
    }

    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.alias
    }

    #[must_use]
    pub fn action(&self) -> &Action {
        &self.action
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self.action {
            Action::Run(_) => "run",
            Action::Index => "index",
        };
        f.debug_struct("Command")
            .field("description", &self.description)
            .field("options", &self.options)
            .field("alias", &self.alias)
            .field("action", &action)
            .finish()
    }
}

/// A tree entry: a leaf command or a nested group.
#[derive(Debug, Clone)]
pub enum Node {
    Command(Arc<Command>),
    Group(CommandTree),
}

/// An insertion-ordered grouping of commands under path segments.
#[derive(Debug, Clone, Default)]
pub struct CommandTree {
    entries: IndexMap<String, Node>,
}

impl CommandTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a leaf command. Re-using a name replaces the entry in place.
    #[must_use]
    pub fn command(mut self, name: impl Into<String>, command: Command) -> Self {
        self.entries
            .insert(name.into(), Node::Command(Arc::new(command)));
        self
    }

    /// Add a nested group.
    #[must_use]
    pub fn group(mut self, name: impl Into<String>, tree: CommandTree) -> Self {
        self.entries.insert(name.into(), Node::Group(tree));
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, node: Node) {
        self.entries.insert(name.into(), node);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.entries.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
