//! Fallback wrappers.
//!
//! A fallback replaces the result of a failing schema with a substitute
//! value. The replacement is total: the substitute dataset is typed and
//! carries none of the inner issues.

use crate::core::config::Config;
use crate::core::dataset::Dataset;
use crate::core::types::Value;
use crate::core::unit::{AsyncUnit, Step, Unit, UnitKind, UnitMetadata};
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use log::debug;
use std::future::Future;
use std::sync::Arc;

/// Produces a fallback from the failing dataset and the run configuration.
pub type FallbackFn = Arc<dyn Fn(&Dataset, &Config) -> Value + Send + Sync>;

/// Asynchronous fallback producer.
pub type AsyncFallbackFn = Arc<dyn Fn(Dataset, Config) -> BoxFuture<'static, Value> + Send + Sync>;

/// Source of a fallback value for [`Fallback`].
#[derive(Clone)]
pub enum FallbackSource {
    /// A literal value.
    Value(Value),
    /// A synchronous producer.
    Producer(FallbackFn),
}

impl FallbackSource {
    /// Synchronous producer from a closure.
    pub fn producer<F>(f: F) -> Self
    where
        F: Fn(&Dataset, &Config) -> Value + Send + Sync + 'static,
    {
        FallbackSource::Producer(Arc::new(f))
    }

    fn resolve(&self, dataset: &Dataset, config: &Config) -> Value {
        match self {
            FallbackSource::Value(value) => value.clone(),
            FallbackSource::Producer(f) => f(dataset, config),
        }
    }
}

impl From<Value> for FallbackSource {
    fn from(value: Value) -> Self {
        FallbackSource::Value(value)
    }
}

impl std::fmt::Debug for FallbackSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FallbackSource::Value(v) => f.debug_tuple("Value").field(v).finish(),
            FallbackSource::Producer(_) => write!(f, "Producer(<closure>)"),
        }
    }
}

/// Source of a fallback value for [`FallbackAsync`].
///
/// Every [`FallbackSource`] converts into one.
#[derive(Clone)]
pub enum AsyncFallbackSource {
    /// A literal or synchronous source.
    Sync(FallbackSource),
    /// An asynchronous producer.
    Producer(AsyncFallbackFn),
}

impl AsyncFallbackSource {
    /// Asynchronous producer from a closure returning a future.
    pub fn producer<F, Fut>(f: F) -> Self
    where
        F: Fn(Dataset, Config) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Value> + Send + 'static,
    {
        AsyncFallbackSource::Producer(Arc::new(move |dataset, config| f(dataset, config).boxed()))
    }
}

impl From<FallbackSource> for AsyncFallbackSource {
    fn from(source: FallbackSource) -> Self {
        AsyncFallbackSource::Sync(source)
    }
}

impl From<Value> for AsyncFallbackSource {
    fn from(value: Value) -> Self {
        AsyncFallbackSource::Sync(FallbackSource::Value(value))
    }
}

impl std::fmt::Debug for AsyncFallbackSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AsyncFallbackSource::Sync(source) => f.debug_tuple("Sync").field(source).finish(),
            AsyncFallbackSource::Producer(_) => write!(f, "Producer(<closure>)"),
        }
    }
}

fn fallback_metadata(inner: &UnitMetadata) -> UnitMetadata {
    let mut meta = inner.clone();
    meta.kind = UnitKind::Schema;
    meta
}

fn is_failure(dataset: &Dataset, on_untyped: bool) -> bool {
    dataset.has_issues() || (on_untyped && !dataset.typed)
}

// ============================================================================
// Synchronous Fallback
// ============================================================================

/// Schema wrapper that substitutes a fallback value on failure.
pub struct Fallback<S> {
    schema: S,
    source: FallbackSource,
    on_untyped: bool,
    meta: UnitMetadata,
}

impl<S: Unit> Fallback<S> {
    /// Wrap `schema` with a literal or synchronous fallback.
    pub fn new(schema: S, source: impl Into<FallbackSource>) -> Self {
        let meta = fallback_metadata(schema.metadata());
        Self {
            schema,
            source: source.into(),
            on_untyped: false,
            meta,
        }
    }

    /// Also treat an untyped result without issues as a failure.
    pub fn on_untyped(mut self) -> Self {
        self.on_untyped = true;
        self
    }

    /// The wrapped schema.
    pub fn inner(&self) -> &S {
        &self.schema
    }

    /// Resolve the fallback value for a failing dataset.
    pub fn get_fallback(&self, dataset: &Dataset, config: &Config) -> Value {
        self.source.resolve(dataset, config)
    }
}

impl<S: Unit> Unit for Fallback<S> {
    fn metadata(&self) -> &UnitMetadata {
        &self.meta
    }

    fn run(&self, dataset: Dataset, config: &Config) -> Dataset {
        let output = self.schema.run(dataset, config);
        if !is_failure(&output, self.on_untyped) {
            return output;
        }
        debug!(
            "fallback for '{}' replaces result with {} issue(s)",
            self.meta.type_name,
            output.issues.len()
        );
        Dataset::typed(self.get_fallback(&output, config))
    }
}

// ============================================================================
// Asynchronous Fallback
// ============================================================================

/// Asynchronous schema wrapper that substitutes a fallback value on failure.
///
/// Wraps any step, so synchronous schemas can use asynchronous producers.
pub struct FallbackAsync {
    schema: Step,
    source: AsyncFallbackSource,
    on_untyped: bool,
    meta: UnitMetadata,
}

impl FallbackAsync {
    /// Wrap `schema` with any fallback source.
    pub fn new(schema: Step, source: impl Into<AsyncFallbackSource>) -> Self {
        let meta = fallback_metadata(schema.metadata()).asynchronous();
        Self {
            schema,
            source: source.into(),
            on_untyped: false,
            meta,
        }
    }

    /// Also treat an untyped result without issues as a failure.
    pub fn on_untyped(mut self) -> Self {
        self.on_untyped = true;
        self
    }

    /// Resolve the fallback value for a failing dataset.
    pub async fn get_fallback(&self, dataset: &Dataset, config: &Config) -> Value {
        match &self.source {
            AsyncFallbackSource::Sync(source) => source.resolve(dataset, config),
            AsyncFallbackSource::Producer(f) => f(dataset.clone(), config.clone()).await,
        }
    }
}

#[async_trait]
impl AsyncUnit for FallbackAsync {
    fn metadata(&self) -> &UnitMetadata {
        &self.meta
    }

    async fn run_async(&self, dataset: Dataset, config: &Config) -> Dataset {
        let output = self.schema.run(dataset, config).await;
        if !is_failure(&output, self.on_untyped) {
            return output;
        }
        debug!(
            "async fallback for '{}' replaces result with {} issue(s)",
            self.meta.type_name,
            output.issues.len()
        );
        Dataset::typed(self.get_fallback(&output, config).await)
    }
}
