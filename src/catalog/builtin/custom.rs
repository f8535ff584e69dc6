//! Caller-defined checks, transformations and metadata.

use super::WithMessage;
use crate::core::config::Config;
use crate::core::dataset::{Dataset, IssueDetails};
use crate::core::types::Value;
use crate::core::unit::{AsyncUnit, Unit, UnitMetadata};
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::sync::Arc;

type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;
type AsyncPredicate = Arc<dyn Fn(Value) -> BoxFuture<'static, bool> + Send + Sync>;
type Mapping = Arc<dyn Fn(Value) -> Value + Send + Sync>;
type AsyncMapping = Arc<dyn Fn(Value) -> BoxFuture<'static, Value> + Send + Sync>;

// ============================================================================
// Checks
// ============================================================================

/// Validation backed by a predicate.
#[derive(Clone)]
pub struct Check {
    meta: UnitMetadata,
    predicate: Predicate,
}

impl WithMessage for Check {
    fn metadata_mut(&mut self) -> &mut UnitMetadata {
        &mut self.meta
    }
}

impl Unit for Check {
    fn metadata(&self) -> &UnitMetadata {
        &self.meta
    }

    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if dataset.typed && !(self.predicate)(&dataset.value) {
            dataset.raise(&self.meta, "input", config, IssueDetails::new());
        }
        dataset
    }
}

/// Fail when `predicate` returns `false`.
pub fn check<F>(predicate: F) -> Check
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    Check {
        meta: UnitMetadata::validation("check"),
        predicate: Arc::new(predicate),
    }
}

/// Validation backed by an asynchronous predicate.
#[derive(Clone)]
pub struct CheckAsync {
    meta: UnitMetadata,
    predicate: AsyncPredicate,
}

impl WithMessage for CheckAsync {
    fn metadata_mut(&mut self) -> &mut UnitMetadata {
        &mut self.meta
    }
}

#[async_trait]
impl AsyncUnit for CheckAsync {
    fn metadata(&self) -> &UnitMetadata {
        &self.meta
    }

    async fn run_async(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if dataset.typed && !(self.predicate)(dataset.value.clone()).await {
            dataset.raise(&self.meta, "input", config, IssueDetails::new());
        }
        dataset
    }
}

/// Fail when the future returned by `predicate` resolves to `false`.
pub fn check_async<F, Fut>(predicate: F) -> CheckAsync
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    CheckAsync {
        meta: UnitMetadata::validation("check").asynchronous(),
        predicate: Arc::new(move |value| predicate(value).boxed()),
    }
}

// ============================================================================
// Transformations
// ============================================================================

/// Transformation backed by a function.
///
/// The function must be total over the values it can receive.
#[derive(Clone)]
pub struct Transform {
    meta: UnitMetadata,
    map: Mapping,
}

impl Unit for Transform {
    fn metadata(&self) -> &UnitMetadata {
        &self.meta
    }

    fn run(&self, mut dataset: Dataset, _config: &Config) -> Dataset {
        let value = std::mem::take(&mut dataset.value);
        dataset.value = (self.map)(value);
        dataset
    }
}

/// Replace the value with `map(value)`.
pub fn transform<F>(map: F) -> Transform
where
    F: Fn(Value) -> Value + Send + Sync + 'static,
{
    Transform {
        meta: UnitMetadata::transformation("transform"),
        map: Arc::new(map),
    }
}

/// Transformation backed by an asynchronous function.
#[derive(Clone)]
pub struct TransformAsync {
    meta: UnitMetadata,
    map: AsyncMapping,
}

#[async_trait]
impl AsyncUnit for TransformAsync {
    fn metadata(&self) -> &UnitMetadata {
        &self.meta
    }

    async fn run_async(&self, mut dataset: Dataset, _config: &Config) -> Dataset {
        let value = std::mem::take(&mut dataset.value);
        dataset.value = (self.map)(value).await;
        dataset
    }
}

/// Replace the value with the output of the future returned by `map`.
pub fn transform_async<F, Fut>(map: F) -> TransformAsync
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Value> + Send + 'static,
{
    TransformAsync {
        meta: UnitMetadata::transformation("transform").asynchronous(),
        map: Arc::new(move |value| map(value).boxed()),
    }
}

// ============================================================================
// Metadata
// ============================================================================

/// Documentation attached to a pipe. Never runs.
#[derive(Debug, Clone)]
pub struct Annotation {
    meta: UnitMetadata,
    text: String,
}

impl Annotation {
    /// The annotation text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Unit for Annotation {
    fn metadata(&self) -> &UnitMetadata {
        &self.meta
    }

    fn run(&self, dataset: Dataset, _config: &Config) -> Dataset {
        dataset
    }
}

/// Human-readable description.
pub fn description(text: impl Into<String>) -> Annotation {
    Annotation {
        meta: UnitMetadata::metadata("description"),
        text: text.into(),
    }
}

/// Short title.
pub fn title(text: impl Into<String>) -> Annotation {
    Annotation {
        meta: UnitMetadata::metadata("title"),
        text: text.into(),
    }
}
