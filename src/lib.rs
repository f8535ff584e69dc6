//! # Pramana - Composable Validation Pipelines
//!
//! Pramana validates and transforms dynamic values by running them through
//! pipelines of small, reusable units.
//!
//! ## Features
//!
//! - **Pipelines**: Chain type checks, validations and transformations in one pipe
//! - **Issue Aggregation**: Collect every independent failure, or stop at the first
//! - **Nested Paths**: Issues inside objects and arrays carry root-to-leaf paths
//! - **Async Units**: Mix synchronous and asynchronous units with identical semantics
//! - **Fallbacks**: Replace failing results with a substitute value
//! - **Localized Messages**: Global, schema and per-unit message stores keyed by language
//!
//! ## Quick Start
//!
//! ```rust
//! use pramana::prelude::*;
//!
//! let schema = Pipe::new(string())
//!     .then(trim())
//!     .then(min_length(1))
//!     .then(decimal());
//!
//! let result = execute(&schema, "  ", Some(Config::new()));
//! assert!(!result.success);
//! assert_eq!(result.output, Value::from(""));
//! assert_eq!(result.issues.len(), 2);
//!
//! let result = execute(&schema, "  ", Some(Config::new().with_abort_early()));
//! assert_eq!(result.issues.len(), 1);
//! assert!(result.issues[0].abort_early);
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`core`]: Values, datasets, issues, configuration and the unit contract
//! - [`pipeline`]: Pipes and fallback wrappers
//! - [`catalog`]: Built-in units and the named schema registry
//! - [`execution`]: Entry points and issue reports
//!
//! ## Creating Custom Units
//!
//! Implement the [`Unit`](core::unit::Unit) trait:
//!
//! ```rust
//! use pramana::prelude::*;
//!
//! struct Even {
//!     meta: UnitMetadata,
//! }
//!
//! impl Unit for Even {
//!     fn metadata(&self) -> &UnitMetadata {
//!         &self.meta
//!     }
//!
//!     fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
//!         if dataset.typed && dataset.value.as_integer().map_or(false, |n| n % 2 != 0) {
//!             dataset.raise(&self.meta, "parity", config, IssueDetails::new());
//!         }
//!         dataset
//!     }
//! }
//!
//! let schema = Pipe::new(number()).then(Even { meta: UnitMetadata::validation("even") });
//! let result = execute(&schema, 3, Some(Config::new()));
//! assert_eq!(result.issues[0].message, "Invalid parity: Received 3");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod core;
pub mod execution;
pub mod pipeline;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust
/// use pramana::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::types::{object as object_value, Object, Value, ValueKind};

    // Dataset and issues
    pub use crate::core::dataset::{Dataset, IssueDetails};
    pub use crate::core::issue::{Issue, IssueKind, PathItem, PathKey, PathKind, Requirement};

    // Unit contract
    pub use crate::core::unit::{AsyncUnit, Step, Unit, UnitKind, UnitMetadata};

    // Configuration and messages
    pub use crate::core::config::{
        delete_global_config, global_config, set_global_config, AbortPolicy, Config, GlobalConfig,
    };
    pub use crate::core::message::{
        delete_global_message, delete_schema_message, delete_specific_message, set_global_message,
        set_schema_message, set_specific_message, ErrorMessage,
    };

    // Errors
    pub use crate::core::error::{ConfigError, ParseError, PramanaError, PramanaResult};

    // Pipelines
    pub use crate::pipeline::{
        AsyncFallbackSource, Fallback, FallbackAsync, FallbackSource, Pipe, PipeAsync,
    };

    // Execution
    pub use crate::execution::{
        execute, execute_async, execute_blocking, execute_json, is_valid, parse, parse_async, IssueReport,
        ParseResult,
    };

    // Catalog
    pub use crate::catalog::registry::SchemaRegistry;
    pub use crate::catalog::builtin::{
        // Schemas
        any, array, boolean, null, number, object, string,
        // Length and value
        length, max_length, max_value, min_length, min_value,
        // Formats
        base64url, decimal, email, jwt, regex, JwtAlgorithm,
        // Strings and keys
        to_lower_case, to_snake_case, to_upper_case, trim,
        // Words
        max_words, min_words, set_segmenter, word_count, words, Segmenter,
        // Custom
        check, check_async, description, title, transform, transform_async,
        // Messages
        WithMessage,
    };
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::prelude::*;

    const TOKEN: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiIxMjM0NTY3ODkwIn0.c2ln";

    fn local() -> Option<Config> {
        Some(Config::new())
    }

    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
        assert_eq!(super::NAME, "pramana");
    }

    #[test]
    fn test_snake_case_scenario() {
        let input = object_value([("fooBar", Value::from(1))]);

        let schema = Pipe::new(any()).then(to_snake_case(None));
        let result = execute(&schema, input.clone(), local());
        assert_eq!(result.output, object_value([("foo_bar", Value::from(1))]));

        let schema = Pipe::new(any()).then(to_snake_case(Some(vec!["other".into()])));
        let result = execute(&schema, input.clone(), local());
        assert_eq!(result.output, input);
    }

    #[test]
    fn test_token_scenario() {
        let schema = Pipe::new(string()).then(jwt(None));

        let rejected = execute(&schema, "header.payload", local());
        assert_eq!(rejected.issues.len(), 1);
        assert_eq!(rejected.issues[0].type_name, "jwt");

        let accepted = execute(&schema, TOKEN, local());
        assert!(accepted.success);
        assert!(accepted.issues.is_empty());
    }

    #[test]
    fn test_localized_messages() {
        let lang = "x-lib-i18n";
        set_specific_message("min_length", "zu kurz", Some(lang));
        set_schema_message("kein Text", Some(lang));

        let schema = Pipe::new(string()).then(min_length(3));
        let config = Config::new().with_lang(lang);
        let short = execute(&schema, "ab", Some(config.clone()));
        let wrong = execute(&schema, 5, Some(config));

        delete_specific_message("min_length", Some(lang));
        delete_schema_message(Some(lang));

        assert_eq!(short.issues[0].message, "zu kurz");
        assert_eq!(wrong.issues[0].message, "kein Text");
    }

    #[test]
    fn test_nested_report() {
        let schema = object()
            .entry("name", Pipe::new(string()).then(min_length(1)))
            .entry("tags", array(string()));
        let input = object_value([
            ("name", Value::from("")),
            ("tags", Value::Array(vec![Value::from("a"), Value::Null])),
        ]);
        let result = execute(&schema, input, local());
        let report = result.report();

        assert_eq!(report.nested.keys().collect::<Vec<_>>(), vec!["name", "tags.1"]);
        assert_eq!(report.summary(), "✗ Validation failed with 2 issue(s)");
    }

    #[test]
    fn test_async_fallback_pipeline() {
        let schema = FallbackAsync::new(
            Step::asynchronous(
                PipeAsync::new(Step::sync(number())).then_async(transform_async(|value| async move {
                    Value::from(value.to_string())
                })),
            ),
            AsyncFallbackSource::producer(|_, _| async { Value::from("123") }),
        );

        assert_eq!(execute_blocking(&schema, 789, local()).output, Value::from("789"));
        assert_eq!(execute_blocking(&schema, "foo", local()).output, Value::from("123"));
    }

    #[test]
    fn test_registry_with_builtins() {
        let registry = SchemaRegistry::with_builtins();
        assert!(registry.contains("decimal_text"));
        assert!(registry.contains("token"));
        assert!(registry.contains("user"));

        let token = registry.create("token").unwrap();
        assert!(is_valid(&token, TOKEN, local()));
    }
}
