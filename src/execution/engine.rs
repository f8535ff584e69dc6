//! Execution entry points.
//!
//! The engine creates a dataset from raw input, runs a schema over it and
//! turns the terminal dataset into a [`ParseResult`].

use crate::core::config::{global_config, Config};
use crate::core::dataset::Dataset;
use crate::core::error::{ParseError, PramanaResult};
use crate::core::issue::Issue;
use crate::core::types::Value;
use crate::core::unit::{AsyncUnit, Unit, UnitMetadata};
use crate::execution::report::IssueReport;
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Result of executing a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseResult {
    /// Whether the output conforms to the schema's type.
    pub typed: bool,
    /// Whether no issue was raised.
    pub success: bool,
    /// The output value, transformed by the schema.
    pub output: Value,
    /// Issues in execution order. Empty on success.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<Issue>,
}

impl ParseResult {
    fn from_dataset(dataset: Dataset, config: &Config) -> Self {
        let mut issues = dataset.issues;
        if !config.path.is_empty() {
            for issue in &mut issues {
                for item in config.path.iter().rev() {
                    issue.prefix_path(item.clone());
                }
            }
        }
        Self {
            typed: dataset.typed,
            success: issues.is_empty(),
            output: dataset.value,
            issues,
        }
    }

    /// Convert into the output value, or the issues on failure.
    pub fn into_result(self) -> Result<Value, ParseError> {
        if self.success {
            Ok(self.output)
        } else {
            Err(ParseError::new(self.issues))
        }
    }

    /// Group the issues for display.
    pub fn report(&self) -> IssueReport {
        IssueReport::from_issues(&self.issues)
    }
}

fn finish(meta: &UnitMetadata, dataset: Dataset, config: &Config, elapsed: Duration) -> ParseResult {
    debug!(
        "executed '{}' in {:?}: typed={}, {} issue(s)",
        meta.type_name,
        elapsed,
        dataset.typed,
        dataset.issues.len()
    );
    ParseResult::from_dataset(dataset, config)
}

/// Run `schema` over `input`.
///
/// `None` uses the process-wide configuration set with
/// [`set_global_config`](crate::core::config::set_global_config).
pub fn execute<U>(schema: &U, input: impl Into<Value>, config: Option<Config>) -> ParseResult
where
    U: Unit + ?Sized,
{
    let config = config.unwrap_or_else(global_config);
    let start = Instant::now();
    let dataset = schema.run(Dataset::new(input), &config);
    finish(schema.metadata(), dataset, &config, start.elapsed())
}

/// Run `schema` over JSON text.
pub fn execute_json<U>(schema: &U, json: &str, config: Option<Config>) -> PramanaResult<ParseResult>
where
    U: Unit + ?Sized,
{
    let input: serde_json::Value = serde_json::from_str(json)?;
    Ok(execute(schema, Value::from(input), config))
}

/// Run an asynchronous `schema` over `input`.
pub async fn execute_async<U>(schema: &U, input: impl Into<Value>, config: Option<Config>) -> ParseResult
where
    U: AsyncUnit + ?Sized,
{
    let config = config.unwrap_or_else(global_config);
    let start = Instant::now();
    let dataset = schema.run_async(Dataset::new(input), &config).await;
    finish(schema.metadata(), dataset, &config, start.elapsed())
}

/// Run an asynchronous `schema` to completion on the current thread.
pub fn execute_blocking<U>(schema: &U, input: impl Into<Value>, config: Option<Config>) -> ParseResult
where
    U: AsyncUnit + ?Sized,
{
    pollster::block_on(execute_async(schema, input, config))
}

/// Run `schema` and return the output, or the issues as an error.
pub fn parse<U>(schema: &U, input: impl Into<Value>, config: Option<Config>) -> Result<Value, ParseError>
where
    U: Unit + ?Sized,
{
    execute(schema, input, config).into_result()
}

/// Asynchronous [`parse`].
pub async fn parse_async<U>(
    schema: &U,
    input: impl Into<Value>,
    config: Option<Config>,
) -> Result<Value, ParseError>
where
    U: AsyncUnit + ?Sized,
{
    execute_async(schema, input, config).await.into_result()
}

/// Whether `input` passes `schema` without issues.
pub fn is_valid<U>(schema: &U, input: impl Into<Value>, config: Option<Config>) -> bool
where
    U: Unit + ?Sized,
{
    execute(schema, input, config).success
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        check, decimal, max_length, min_length, number, object, string, to_lower_case, trim,
    };
    use crate::core::config::{delete_global_config, set_global_config, AbortPolicy, GlobalConfig};
    use crate::core::issue::{PathItem, PathKey};
    use crate::core::types::object as obj;
    use crate::pipeline::{Fallback, Pipe, PipeAsync};
    use proptest::prelude::*;

    fn text_pipe() -> Pipe {
        Pipe::new(string()).then(trim()).then(min_length(1)).then(decimal())
    }

    fn local() -> Option<Config> {
        Some(Config::new())
    }

    #[test]
    fn test_execute_success() {
        let result = execute(&text_pipe(), " 42 ", local());
        assert!(result.success);
        assert!(result.typed);
        assert_eq!(result.output, Value::from("42"));
        assert!(result.issues.is_empty());
        assert_eq!(result.report().summary(), "✓ Input is valid");
    }

    #[test]
    fn test_execute_whitespace_scenario() {
        let result = execute(&text_pipe(), "  ", local());
        assert!(!result.success);
        assert!(result.typed);
        assert_eq!(result.output, Value::from(""));
        let types: Vec<_> = result.issues.iter().map(|i| i.type_name.as_str()).collect();
        assert_eq!(types, vec!["min_length", "decimal"]);

        let result = execute(&text_pipe(), "  ", Some(Config::new().with_abort_early()));
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].type_name, "min_length");
        assert!(result.issues[0].abort_early);
    }

    #[test]
    fn test_config_path_prefixes_issues() {
        let prefix = vec![
            PathItem::object("form", Value::Null, Value::Null),
            PathItem::array(3, Value::Null, Value::Null),
        ];
        let result = execute(&string(), 1, Some(Config::new().with_path(prefix)));
        assert_eq!(result.issues[0].dot_path().as_deref(), Some("form.3"));
        assert_eq!(result.issues[0].path[1].key, PathKey::Index(3));
    }

    #[test]
    fn test_parse_and_is_valid() {
        assert_eq!(parse(&text_pipe(), "1.5", local()).unwrap(), Value::from("1.5"));
        assert!(is_valid(&text_pipe(), "7", local()));
        assert!(!is_valid(&text_pipe(), "x", local()));

        let error = parse(&text_pipe(), "  ", local()).unwrap_err();
        assert_eq!(error.issues.len(), 2);
        assert_eq!(
            error.to_string(),
            "Invalid length: Expected >=1 but received 0 (and 1 more)"
        );
    }

    #[test]
    fn test_execute_json() {
        let schema = object().entry("n", Pipe::new(string()).then(decimal()));
        let result = execute_json(&schema, r#"{"n": "1.5", "x": true}"#, local()).unwrap();
        assert!(result.success);
        assert_eq!(result.output, obj([("n", Value::from("1.5"))]));

        let error = execute_json(&schema, "{\"n\":", local()).unwrap_err();
        assert!(matches!(error, crate::core::error::PramanaError::Serialization(_)));
    }

    #[test]
    fn test_execute_async() {
        let schema = PipeAsync::from(text_pipe());
        let result = execute_blocking(&schema, " 3 ", local());
        assert_eq!(result.output, Value::from("3"));

        let error = pollster::block_on(parse_async(&schema, "", local())).unwrap_err();
        assert_eq!(error.first().map(|i| i.type_name.as_str()), Some("min_length"));
    }

    #[test]
    fn test_global_config_is_default() {
        let config = GlobalConfig {
            lang: Some("x-engine-global".into()),
            abort: Some(AbortPolicy::Early),
        };
        set_global_config(config);
        let result = execute(&text_pipe(), "  ", None);
        delete_global_config();

        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].lang.as_deref(), Some("x-engine-global"));
        assert!(result.issues[0].abort_early);
    }

    fn failing_units() -> Pipe {
        Pipe::new(string())
            .then(min_length(100))
            .then(max_length(0))
            .then(check(|_| false))
    }

    proptest! {
        /// Running the same schema twice yields identical results.
        #[test]
        fn prop_execute_is_idempotent(input in "[ a-zA-Z0-9.]{0,12}") {
            let schema = Pipe::new(string()).then(trim()).then(to_lower_case()).then(min_length(2)).then(decimal());
            let first = execute(&schema, input.as_str(), local());
            let second = execute(&schema, input.as_str(), local());
            prop_assert_eq!(first, second);
        }

        /// Passing inputs succeed with an empty issue list.
        #[test]
        fn prop_valid_input_succeeds(n in 0u32..1_000_000) {
            let result = execute(&text_pipe(), n.to_string(), local());
            prop_assert!(result.success);
            prop_assert!(result.issues.is_empty());
            prop_assert_eq!(result.output, Value::from(n.to_string()));
        }

        /// Exactly one failing unit among independent validations yields one issue.
        #[test]
        fn prop_single_failure_single_issue(input in "[a-z]{1,8}") {
            let schema = Pipe::new(string())
                .then(min_length(1))
                .then(max_length(8))
                .then(decimal());
            let result = execute(&schema, input.as_str(), local());
            prop_assert_eq!(result.issues.len(), 1);
            prop_assert_eq!(result.issues[0].type_name.as_str(), "decimal");
        }

        /// Aborting early leaves exactly one issue, flagged.
        #[test]
        fn prop_abort_early_keeps_one_issue(input in "[a-z]{1,20}") {
            let collected = execute(&failing_units(), input.as_str(), local());
            prop_assert_eq!(collected.issues.len(), 3);
            prop_assert!(collected.issues.iter().all(|i| !i.abort_early));

            let aborted = execute(&failing_units(), input.as_str(), Some(Config::new().with_abort_early()));
            prop_assert_eq!(aborted.issues.len(), 1);
            prop_assert!(aborted.issues[0].abort_early);
        }

        /// A failure two levels deep has a two-segment, root-to-leaf path.
        #[test]
        fn prop_nested_failure_path(age in any::<i64>()) {
            let schema = object().entry("user", object().entry("name", string()));
            let input = obj([("user", obj([("name", Value::Integer(age))]))]);
            let result = execute(&schema, input, local());

            prop_assert_eq!(result.issues.len(), 1);
            let path = &result.issues[0].path;
            prop_assert_eq!(path.len(), 2);
            prop_assert_eq!(&path[0].key, &PathKey::Key("user".into()));
            prop_assert_eq!(&path[1].key, &PathKey::Key("name".into()));
        }

        /// A fallback replaces any failing result in full.
        #[test]
        fn prop_fallback_replaces_failure(input in "[a-z]{0,20}", fallback in any::<i64>()) {
            let schema = Fallback::new(failing_units(), Value::Integer(fallback));
            let result = execute(&schema, input.as_str(), local());
            prop_assert!(result.success);
            prop_assert!(result.typed);
            prop_assert_eq!(result.output, Value::Integer(fallback));

            let numeric = Fallback::new(number(), Value::Integer(fallback));
            prop_assert_eq!(execute(&numeric, input.as_str(), local()).output, Value::Integer(fallback));
        }
    }
}
