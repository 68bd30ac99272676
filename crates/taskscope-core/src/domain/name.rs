//! Identifiers used by task declarations and argument scopes.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// A declared parameter name (`ArgName`).
///
/// Implements `Borrow<str>` so maps keyed by `ArgName` can be queried with a
/// plain `&str`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArgName(String);

impl ArgName {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArgName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Borrow<str> for ArgName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ArgName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ArgName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// TaskName - タスク名
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskName(String);

impl TaskName {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Borrow<str> for TaskName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TaskName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Convenience for building a `Vec<ArgName>` from string literals.
pub fn arg_names<I, S>(names: I) -> Vec<ArgName>
where
    I: IntoIterator<Item = S>,
    S: Into<ArgName>,
{
    names.into_iter().map(Into::into).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn arg_name_serializes_as_plain_string() {
        let s = serde_json::to_string(&ArgName::new("target")).unwrap();
        assert_eq!(s, "\"target\"");

        let back: TaskName = serde_json::from_str("\"build\"").unwrap();
        assert_eq!(back.as_str(), "build");
    }

    #[test]
    fn map_keyed_by_arg_name_accepts_str_lookup() {
        let mut m = HashMap::new();
        m.insert(ArgName::new("a"), 1);
        assert_eq!(m.get("a"), Some(&1));
        assert_eq!(m.get("b"), None);
    }

    #[test]
    fn arg_names_collects_in_order() {
        let names = arg_names(["x", "y", "z"]);
        let rendered: Vec<String> = names.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["x", "y", "z"]);
    }
}
