//! The unit contract.
//!
//! Every step of a pipeline is a unit: a schema that establishes the type of
//! a value, a validation that checks a constraint, a transformation that maps
//! the value, or a metadata entry that only documents the pipeline. Units are
//! built once, hold no per-run state, and are shared behind `Arc`.

use crate::core::config::Config;
use crate::core::dataset::Dataset;
use crate::core::issue::{IssueKind, Requirement};
use crate::core::message::ErrorMessage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Category of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Checks the overall shape of a value and sets `typed`.
    Schema,
    /// Checks a constraint on a typed value.
    Validation,
    /// Maps a typed value to a new value. Never fails.
    Transformation,
    /// Documentation only. Skipped at run time.
    Metadata,
}

impl UnitKind {
    /// Issue kind raised by units of this kind.
    pub fn issue_kind(&self) -> IssueKind {
        match self {
            UnitKind::Schema => IssueKind::Schema,
            UnitKind::Transformation => IssueKind::Transformation,
            UnitKind::Validation | UnitKind::Metadata => IssueKind::Validation,
        }
    }
}

/// Static description of a unit.
///
/// Built once at construction and read by the engine and by
/// [`Dataset::raise`] when an issue is recorded.
#[derive(Debug, Clone)]
pub struct UnitMetadata {
    /// Category of the unit.
    pub kind: UnitKind,
    /// Identifier of the unit (e.g. `"min_length"`).
    pub type_name: &'static str,
    /// Identity used for specific-message lookup and debugging.
    pub reference: &'static str,
    /// Description of the expected value, if there is a single one.
    pub expects: Option<String>,
    /// Diagnostic detail of the check.
    pub requirement: Option<Requirement>,
    /// Caller-supplied message.
    pub message: Option<ErrorMessage>,
    /// Whether the unit runs asynchronously.
    pub is_async: bool,
}

impl UnitMetadata {
    /// Create metadata for a unit of the given kind.
    pub fn new(kind: UnitKind, type_name: &'static str) -> Self {
        Self {
            kind,
            type_name,
            reference: type_name,
            expects: None,
            requirement: None,
            message: None,
            is_async: false,
        }
    }

    /// Metadata for a schema unit.
    pub fn schema(type_name: &'static str) -> Self {
        Self::new(UnitKind::Schema, type_name)
    }

    /// Metadata for a validation unit.
    pub fn validation(type_name: &'static str) -> Self {
        Self::new(UnitKind::Validation, type_name)
    }

    /// Metadata for a transformation unit.
    pub fn transformation(type_name: &'static str) -> Self {
        Self::new(UnitKind::Transformation, type_name)
    }

    /// Metadata for a documentation-only unit.
    pub fn metadata(type_name: &'static str) -> Self {
        Self::new(UnitKind::Metadata, type_name)
    }

    /// Set the expected-value description.
    pub fn expects(mut self, expects: impl Into<String>) -> Self {
        self.expects = Some(expects.into());
        self
    }

    /// Set the requirement.
    pub fn requirement(mut self, requirement: Requirement) -> Self {
        self.requirement = Some(requirement);
        self
    }

    /// Set the caller-supplied message.
    pub fn message(mut self, message: Option<ErrorMessage>) -> Self {
        self.message = message;
        self
    }

    /// Override the reference.
    pub fn reference(mut self, reference: &'static str) -> Self {
        self.reference = reference;
        self
    }

    /// Mark the unit as asynchronous.
    pub fn asynchronous(mut self) -> Self {
        self.is_async = true;
        self
    }
}

/// A synchronous unit.
///
/// `run` takes the dataset by value, mutates it and hands it back. A
/// validation must pass an untyped dataset through untouched, and a failing
/// check records an issue through [`Dataset::raise`] instead of returning an
/// error.
pub trait Unit: Send + Sync {
    /// Static description of the unit.
    fn metadata(&self) -> &UnitMetadata;

    /// Run the unit.
    fn run(&self, dataset: Dataset, config: &Config) -> Dataset;
}

/// An asynchronous unit. Same contract as [`Unit`], awaited by the caller.
#[async_trait]
pub trait AsyncUnit: Send + Sync {
    /// Static description of the unit.
    fn metadata(&self) -> &UnitMetadata;

    /// Run the unit.
    async fn run_async(&self, dataset: Dataset, config: &Config) -> Dataset;
}

impl<U: Unit + ?Sized> Unit for Arc<U> {
    fn metadata(&self) -> &UnitMetadata {
        (**self).metadata()
    }

    fn run(&self, dataset: Dataset, config: &Config) -> Dataset {
        (**self).run(dataset, config)
    }
}

#[async_trait]
impl<U: AsyncUnit + ?Sized> AsyncUnit for Arc<U> {
    fn metadata(&self) -> &UnitMetadata {
        (**self).metadata()
    }

    async fn run_async(&self, dataset: Dataset, config: &Config) -> Dataset {
        (**self).run_async(dataset, config).await
    }
}

/// One step of an asynchronous pipe: either kind of unit.
#[derive(Clone)]
pub enum Step {
    /// A synchronous unit, completed inline.
    Sync(Arc<dyn Unit>),
    /// An asynchronous unit.
    Async(Arc<dyn AsyncUnit>),
}

impl Step {
    /// Wrap a synchronous unit.
    pub fn sync<U: Unit + 'static>(unit: U) -> Self {
        Step::Sync(Arc::new(unit))
    }

    /// Wrap an asynchronous unit.
    pub fn asynchronous<U: AsyncUnit + 'static>(unit: U) -> Self {
        Step::Async(Arc::new(unit))
    }

    /// Static description of the wrapped unit.
    pub fn metadata(&self) -> &UnitMetadata {
        match self {
            Step::Sync(unit) => unit.metadata(),
            Step::Async(unit) => unit.metadata(),
        }
    }

    /// Category of the wrapped unit.
    pub fn kind(&self) -> UnitKind {
        self.metadata().kind
    }

    /// Run the wrapped unit. Synchronous units complete immediately.
    pub async fn run(&self, dataset: Dataset, config: &Config) -> Dataset {
        match self {
            Step::Sync(unit) => unit.run(dataset, config),
            Step::Async(unit) => unit.run_async(dataset, config).await,
        }
    }
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = if matches!(self, Step::Sync(_)) { "Sync" } else { "Async" };
        f.debug_tuple(label).field(&self.metadata().type_name).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Value;

    struct Upper {
        meta: UnitMetadata,
    }

    impl Unit for Upper {
        fn metadata(&self) -> &UnitMetadata {
            &self.meta
        }

        fn run(&self, mut dataset: Dataset, _config: &Config) -> Dataset {
            if let Value::String(s) = &dataset.value {
                dataset.value = Value::String(s.to_uppercase());
            }
            dataset
        }
    }

    #[test]
    fn test_metadata_builder() {
        let meta = UnitMetadata::validation("min_length")
            .expects(">=3")
            .requirement(Requirement::Length(3));
        assert_eq!(meta.kind, UnitKind::Validation);
        assert_eq!(meta.reference, "min_length");
        assert_eq!(meta.expects.as_deref(), Some(">=3"));
        assert!(!meta.is_async);
        assert_eq!(UnitKind::Schema.issue_kind(), IssueKind::Schema);
    }

    #[test]
    fn test_sync_step_runs_inline() {
        let step = Step::sync(Upper {
            meta: UnitMetadata::transformation("upper"),
        });
        assert_eq!(step.kind(), UnitKind::Transformation);

        let config = Config::new();
        let dataset = pollster::block_on(step.run(Dataset::typed("abc"), &config));
        assert_eq!(dataset.value, Value::from("ABC"));
        assert_eq!(format!("{:?}", step), "Sync(\"upper\")");
    }
}
