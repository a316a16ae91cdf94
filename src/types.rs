/// Shared value types handed to command handlers.
///
/// These are what a handler sees after parsing: a map of flag values and the
/// ordered positional arguments. They serialize to plain JSON so handlers can
/// echo or forward them as-is.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single parsed flag value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A boolean flag (`--force`, `--no-force`).
    Bool(bool),
    /// A string option (`--url http://x`).
    String(String),
    /// A repeatable boolean flag, one entry per occurrence.
    Bools(Vec<bool>),
    /// A repeatable string option, one entry per occurrence.
    Strings(Vec<String>),
}

impl Value {
    /// Whether this value holds a sequence rather than a scalar.
    #[must_use]
    pub fn is_multiple(&self) -> bool {
        matches!(self, Self::Bools(_) | Self::Strings(_))
    }

    /// `true`, a non-empty string, or a non-empty sequence.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::String(s) => !s.is_empty(),
            Self::Bools(v) => !v.is_empty(),
            Self::Strings(v) => !v.is_empty(),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<bool>> for Value {
    fn from(value: Vec<bool>) -> Self {
        Self::Bools(value)
    }
}

impl From<Vec<String>> for Value {
    fn from(value: Vec<String>) -> Self {
        Self::Strings(value)
    }
}

impl From<Vec<&str>> for Value {
    fn from(value: Vec<&str>) -> Self {
        Self::Strings(value.into_iter().map(str::to_owned).collect())
    }
}

/// Parsed flag values keyed by long option name, in schema order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arguments(IndexMap<String, Value>);

impl Arguments {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Value of a boolean flag; `false` when absent or not a scalar bool.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.0.get(name), Some(Value::Bool(true)))
    }

    /// Whether `name` holds a truthy value, whatever its type.
    #[must_use]
    pub fn is_set(&self, name: &str) -> bool {
        self.0.get(name).is_some_and(Value::is_truthy)
    }

    /// Value of a scalar string option.
    #[must_use]
    pub fn string(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Every occurrence of a repeatable string option, in command-line order.
    #[must_use]
    pub fn strings(&self, name: &str) -> &[String] {
        match self.0.get(name) {
            Some(Value::Strings(v)) => v,
            _ => &[],
        }
    }

    /// Every occurrence of a repeatable boolean flag, in command-line order.
    #[must_use]
    pub fn bools(&self, name: &str) -> &[bool] {
        match self.0.get(name) {
            Some(Value::Bools(v)) => v,
            _ => &[],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Everything a command handler receives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    /// Parsed flags, including the implicit `help` flag.
    pub args: Arguments,
    /// Non-flag tokens, order preserved.
    pub positionals: Vec<String>,
}
