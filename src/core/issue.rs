//! Structured validation issues.
//!
//! An [`Issue`] describes one failure: which unit raised it, what it saw,
//! what it expected and where in the input it happened.

use crate::core::types::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of the unit that raised an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Wrong overall shape or type.
    Schema,
    /// Right shape, failed constraint.
    Validation,
    /// Reserved for pipeline-internal consistency errors.
    Transformation,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IssueKind::Schema => "schema",
            IssueKind::Validation => "validation",
            IssueKind::Transformation => "transformation",
        })
    }
}

/// Kind of container a path item steps into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathKind {
    /// An object entry.
    Object,
    /// An array item.
    Array,
}

/// Key of a path item: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathKey {
    /// Object key.
    Key(String),
    /// Array index.
    Index(usize),
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKey::Key(key) => f.write_str(key),
            PathKey::Index(index) => write!(f, "{}", index),
        }
    }
}

/// One step from a container into one of its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathItem {
    /// Container kind.
    pub kind: PathKind,
    /// Key or index of the child.
    pub key: PathKey,
    /// The container value.
    pub input: Value,
    /// The child value.
    pub value: Value,
}

impl PathItem {
    /// Path item for an object entry.
    pub fn object(key: impl Into<String>, input: Value, value: Value) -> Self {
        Self {
            kind: PathKind::Object,
            key: PathKey::Key(key.into()),
            input,
            value,
        }
    }

    /// Path item for an array element.
    pub fn array(index: usize, input: Value, value: Value) -> Self {
        Self {
            kind: PathKind::Array,
            key: PathKey::Index(index),
            input,
            value,
        }
    }
}

/// Implementation detail of a check, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Requirement {
    /// A length or count limit.
    Length(usize),
    /// A numeric limit.
    Number(f64),
    /// Source of the regular expression the value must match.
    Pattern(String),
    /// A required token algorithm.
    Algorithm(String),
    /// Any other literal requirement.
    Literal(Value),
}

/// One validation failure.
///
/// Issues are appended to a dataset by [`Dataset::raise`] and never modified
/// afterwards, except for path prefixing by enclosing schemas.
///
/// [`Dataset::raise`]: crate::core::dataset::Dataset::raise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Category of the unit that raised the issue.
    pub kind: IssueKind,
    /// Identifier of the unit (e.g. `"min_length"`).
    #[serde(rename = "type")]
    pub type_name: String,
    /// The value being checked at failure time.
    pub input: Value,
    /// What the unit expected, when a single expected form exists.
    pub expected: Option<String>,
    /// Summary of what was received.
    pub received: String,
    /// Resolved human-readable message.
    pub message: String,
    /// Diagnostic detail of the check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirement: Option<Requirement>,
    /// Root-to-leaf path to the failing value.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<PathItem>,
    /// Language in effect when the issue was raised.
    pub lang: Option<String>,
    /// Whether the run was configured to abort early.
    pub abort_early: bool,
    /// Whether the run was configured to abort the current pipe early.
    pub abort_pipe_early: bool,
}

impl Issue {
    /// Dot-separated path of this issue (e.g. `user.tags.0`).
    ///
    /// Returns `None` for root-level issues.
    pub fn dot_path(&self) -> Option<String> {
        if self.path.is_empty() {
            return None;
        }
        let segments: Vec<String> = self.path.iter().map(|item| item.key.to_string()).collect();
        Some(segments.join("."))
    }

    /// Prepend a path item, as done by an enclosing container schema.
    pub(crate) fn prefix_path(&mut self, item: PathItem) {
        self.path.insert(0, item);
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dot_path() {
            Some(path) => write!(f, "{}: {}", path, self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue_at(path: Vec<PathItem>) -> Issue {
        Issue {
            kind: IssueKind::Schema,
            type_name: "string".to_string(),
            input: Value::Integer(1),
            expected: Some("string".to_string()),
            received: "1".to_string(),
            message: "Invalid type".to_string(),
            requirement: None,
            path,
            lang: None,
            abort_early: false,
            abort_pipe_early: false,
        }
    }

    #[test]
    fn test_dot_path() {
        assert_eq!(issue_at(Vec::new()).dot_path(), None);

        let mut issue = issue_at(vec![PathItem::array(0, Value::Null, Value::Integer(1))]);
        issue.prefix_path(PathItem::object("tags", Value::Null, Value::Null));
        assert_eq!(issue.dot_path().as_deref(), Some("tags.0"));
        assert_eq!(issue.to_string(), "tags.0: Invalid type");
    }

    #[test]
    fn test_issue_serializes_type_field() {
        let json = serde_json::to_value(issue_at(Vec::new())).unwrap();
        assert_eq!(json["type"], "string");
        assert_eq!(json["kind"], "schema");
        assert!(json.get("path").is_none());
    }
}
