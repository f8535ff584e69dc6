//! The dataset threaded through a pipeline.
//!
//! A dataset is created per run, moved from unit to unit and turned into a
//! result at the end. [`Dataset::raise`] is the only way issues are added.

use crate::core::config::Config;
use crate::core::issue::{Issue, PathItem};
use crate::core::message::{self, default_message, ErrorMessage};
use crate::core::types::Value;
use crate::core::unit::{UnitKind, UnitMetadata};
use log::trace;
use serde::{Deserialize, Serialize};

/// Value in flight plus its typing state and the issues collected so far.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    /// Whether `value` conforms to the declared output type.
    pub typed: bool,
    /// The current value.
    pub value: Value,
    /// Issues in the order they were raised.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<Issue>,
}

/// Per-failure overrides for [`Dataset::raise`].
///
/// Anything left unset is taken from the unit metadata or the dataset.
#[derive(Debug, Clone, Default)]
pub struct IssueDetails {
    input: Option<Value>,
    expected: Option<String>,
    received: Option<String>,
    message: Option<ErrorMessage>,
    path: Option<PathItem>,
}

impl IssueDetails {
    /// No overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Input to record instead of the dataset value.
    pub fn input(mut self, input: Value) -> Self {
        self.input = Some(input);
        self
    }

    /// Expected description instead of the unit's `expects`.
    pub fn expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    /// Received summary instead of the one derived from the input.
    pub fn received(mut self, received: impl Into<String>) -> Self {
        self.received = Some(received.into());
        self
    }

    /// Message taking precedence over every store.
    pub fn message(mut self, message: impl Into<ErrorMessage>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Single path segment for the issue.
    pub fn path(mut self, item: PathItem) -> Self {
        self.path = Some(item);
        self
    }
}

impl Dataset {
    /// Create an untyped dataset.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            typed: false,
            value: value.into(),
            issues: Vec::new(),
        }
    }

    /// Create a dataset the caller asserts is already typed.
    pub fn typed(value: impl Into<Value>) -> Self {
        Self {
            typed: true,
            value: value.into(),
            issues: Vec::new(),
        }
    }

    /// Whether any unit reported a failure.
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Record a failure of `unit`.
    ///
    /// `label` names the failed property in the generic message (e.g.
    /// `"length"` for `min_length`). Schema failures also clear `typed`.
    pub fn raise(
        &mut self,
        unit: &UnitMetadata,
        label: &str,
        config: &Config,
        details: IssueDetails,
    ) {
        let IssueDetails {
            input,
            expected,
            received,
            message: override_message,
            path,
        } = details;

        let input = input.unwrap_or_else(|| self.value.clone());
        let expected = expected.or_else(|| unit.expects.clone());
        let received = received.unwrap_or_else(|| input.received());
        let generic = default_message(label, expected.as_deref(), &received);

        let mut issue = Issue {
            kind: unit.kind.issue_kind(),
            type_name: unit.type_name.to_string(),
            input,
            expected,
            received,
            message: generic,
            requirement: unit.requirement.clone(),
            path: path.into_iter().collect(),
            lang: config.lang.clone(),
            abort_early: config.abort_early(),
            abort_pipe_early: config.abort_pipe_early(),
        };

        let is_schema = unit.kind == UnitKind::Schema;
        let lang = config.lang.as_deref();
        let resolved = override_message
            .or_else(|| unit.message.clone())
            .or_else(|| message::specific_message(unit.reference, lang))
            .or_else(|| if is_schema { message::schema_message(lang) } else { None })
            .or_else(|| config.message.clone())
            .or_else(|| message::global_message(lang));
        if let Some(resolved) = resolved {
            issue.message = resolved.resolve(&issue);
        }

        trace!("{} issue raised by '{}': {}", issue.kind, issue.type_name, issue.message);

        if is_schema {
            self.typed = false;
        }
        self.issues.push(issue);
    }

    /// Merge the issues of a child run, prefixing each with `item`.
    pub fn absorb(&mut self, item: &PathItem, issues: Vec<Issue>) {
        for mut issue in issues {
            issue.prefix_path(item.clone());
            self.issues.push(issue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::issue::{IssueKind, Requirement};

    fn min_length() -> UnitMetadata {
        UnitMetadata::validation("min_length")
            .expects(">=1")
            .requirement(Requirement::Length(1))
    }

    #[test]
    fn test_raise_builds_issue_from_metadata() {
        let mut dataset = Dataset::typed("");
        dataset.raise(&min_length(), "length", &Config::new(), IssueDetails::new().received("0"));

        assert!(dataset.typed);
        assert_eq!(dataset.issues.len(), 1);
        let issue = &dataset.issues[0];
        assert_eq!(issue.kind, IssueKind::Validation);
        assert_eq!(issue.type_name, "min_length");
        assert_eq!(issue.input, Value::from(""));
        assert_eq!(issue.expected.as_deref(), Some(">=1"));
        assert_eq!(issue.received, "0");
        assert_eq!(issue.message, "Invalid length: Expected >=1 but received 0");
        assert_eq!(issue.requirement, Some(Requirement::Length(1)));
        assert!(issue.path.is_empty());
    }

    #[test]
    fn test_raise_schema_clears_typed() {
        let mut dataset = Dataset::typed(Value::Null);
        let unit = UnitMetadata::schema("string").expects("string");
        dataset.raise(&unit, "type", &Config::new(), IssueDetails::new());

        assert!(!dataset.typed);
        assert_eq!(dataset.issues[0].kind, IssueKind::Schema);
        assert_eq!(dataset.issues[0].received, "null");
    }

    #[test]
    fn test_raise_captures_config_flags() {
        let mut dataset = Dataset::typed("x");
        let config = Config::new().with_abort_early().with_lang("x-ds-flags");
        dataset.raise(&min_length(), "length", &config, IssueDetails::new());

        let issue = &dataset.issues[0];
        assert!(issue.abort_early);
        assert!(!issue.abort_pipe_early);
        assert_eq!(issue.lang.as_deref(), Some("x-ds-flags"));
    }

    #[test]
    fn test_message_precedence() {
        let lang = "x-ds-precedence";
        let config = Config::new().with_lang(lang).with_message("from config");

        let mut dataset = Dataset::typed("x");
        dataset.raise(&min_length(), "length", &config, IssueDetails::new());
        assert_eq!(dataset.issues[0].message, "from config");

        message::set_specific_message("min_length", "from specific store", Some(lang));
        dataset.raise(&min_length(), "length", &config, IssueDetails::new());
        assert_eq!(dataset.issues[1].message, "from specific store");

        let unit = min_length().message(Some("from unit".into()));
        dataset.raise(&unit, "length", &config, IssueDetails::new());
        assert_eq!(dataset.issues[2].message, "from unit");

        dataset.raise(&unit, "length", &config, IssueDetails::new().message("from details"));
        assert_eq!(dataset.issues[3].message, "from details");

        message::delete_specific_message("min_length", Some(lang));
    }

    #[test]
    fn test_dynamic_message_sees_issue() {
        let unit = min_length().message(Some(ErrorMessage::dynamic(|issue| {
            format!("need {} got {}", issue.expected.clone().unwrap_or_default(), issue.received)
        })));
        let mut dataset = Dataset::typed("");
        dataset.raise(&unit, "length", &Config::new(), IssueDetails::new().received("0"));
        assert_eq!(dataset.issues[0].message, "need >=1 got 0");
    }

    #[test]
    fn test_absorb_prefixes_paths() {
        let mut child = Dataset::new(Value::Integer(1));
        let unit = UnitMetadata::schema("string").expects("string");
        child.raise(&unit, "type", &Config::new(), IssueDetails::new());

        let mut parent = Dataset::new(Value::Null);
        let item = PathItem::object("name", Value::Null, Value::Integer(1));
        parent.absorb(&item, child.issues);

        assert_eq!(parent.issues.len(), 1);
        assert_eq!(parent.issues[0].dot_path().as_deref(), Some("name"));
    }
}
