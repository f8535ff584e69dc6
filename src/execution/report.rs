//! Human-readable issue reports.

use crate::core::issue::Issue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Issues grouped by where they occurred.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueReport {
    /// Whether there were no issues at all.
    pub success: bool,
    /// Messages of issues raised at the root.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub root: Vec<String>,
    /// Messages of nested issues keyed by dot path (e.g. `user.name`).
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub nested: IndexMap<String, Vec<String>>,
    #[serde(skip)]
    lines: Vec<String>,
}

impl IssueReport {
    /// Group `issues`, keeping their order within each group.
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut report = Self {
            success: issues.is_empty(),
            ..Self::default()
        };
        for (i, issue) in issues.iter().enumerate() {
            match issue.dot_path() {
                Some(path) => report.nested.entry(path).or_default().push(issue.message.clone()),
                None => report.root.push(issue.message.clone()),
            }

            let mut line = format!("{}. {}", i + 1, issue);
            if let Some(expected) = &issue.expected {
                line.push_str(&format!("\n   → Expected {}, received {}", expected, issue.received));
            }
            report.lines.push(line);
        }
        report
    }

    /// Number of issues in the report.
    pub fn issue_count(&self) -> usize {
        self.root.len() + self.nested.values().map(Vec::len).sum::<usize>()
    }

    /// Get a human-readable summary.
    pub fn summary(&self) -> String {
        if self.success {
            "✓ Input is valid".to_string()
        } else {
            format!("✗ Validation failed with {} issue(s)", self.issue_count())
        }
    }

    /// Get one numbered line per issue, in raise order.
    pub fn detailed(&self) -> Vec<String> {
        self.lines.clone()
    }
}
