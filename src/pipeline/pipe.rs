//! Pipe implementation.
//!
//! A pipe is an ordered list of units led by a root schema. It is itself a
//! schema, so pipes nest inside objects, arrays and other pipes.

use crate::core::config::Config;
use crate::core::dataset::Dataset;
use crate::core::unit::{AsyncUnit, Step, Unit, UnitKind, UnitMetadata};
use async_trait::async_trait;
use log::trace;
use std::sync::Arc;

/// What the engine does with the next unit of a pipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    /// Run the unit.
    Run,
    /// Do not run the unit, keep going.
    Skip,
    /// Mark the dataset untyped and leave the pipe.
    Halt,
}

/// Decide the flow for a unit of `kind` given the dataset so far.
///
/// Schemas and transformations never run over a dataset that already
/// carries issues, and under an abort policy nothing runs after the first
/// issue. Validations otherwise keep running so independent failures are all
/// reported.
pub(crate) fn next_flow(kind: UnitKind, dataset: &Dataset, config: &Config) -> Flow {
    if kind == UnitKind::Metadata {
        return Flow::Skip;
    }
    if dataset.has_issues() {
        if matches!(kind, UnitKind::Schema | UnitKind::Transformation) {
            return Flow::Halt;
        }
        if config.aborts() {
            return Flow::Skip;
        }
    }
    Flow::Run
}

fn pipe_metadata(root: &UnitMetadata) -> UnitMetadata {
    let mut meta = root.clone();
    meta.kind = UnitKind::Schema;
    meta
}

// ============================================================================
// Synchronous Pipe
// ============================================================================

/// Synchronous pipe.
///
/// ```
/// use pramana::prelude::*;
///
/// let schema = Pipe::new(string()).then(trim()).then(min_length(1)).then(decimal());
/// let result = execute(&schema, Value::from(" 12.5 "), None);
/// assert!(result.success);
/// assert_eq!(result.output, Value::from("12.5"));
/// ```
#[derive(Clone)]
pub struct Pipe {
    meta: UnitMetadata,
    items: Vec<Arc<dyn Unit>>,
}

impl Pipe {
    /// Create a pipe led by a root schema.
    pub fn new<U: Unit + 'static>(root: U) -> Self {
        Self {
            meta: pipe_metadata(root.metadata()),
            items: vec![Arc::new(root)],
        }
    }

    /// Append a unit.
    pub fn then<U: Unit + 'static>(mut self, unit: U) -> Self {
        self.items.push(Arc::new(unit));
        self
    }

    /// Append a shared unit.
    pub fn then_shared(mut self, unit: Arc<dyn Unit>) -> Self {
        self.items.push(unit);
        self
    }

    /// Units in execution order.
    pub fn items(&self) -> &[Arc<dyn Unit>] {
        &self.items
    }

    /// Number of units, including the root schema.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// A pipe always holds at least its root.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Unit for Pipe {
    fn metadata(&self) -> &UnitMetadata {
        &self.meta
    }

    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        for item in &self.items {
            let meta = item.metadata();
            match next_flow(meta.kind, &dataset, config) {
                Flow::Run => dataset = item.run(dataset, config),
                Flow::Skip => continue,
                Flow::Halt => {
                    trace!("pipe '{}' halted before '{}'", self.meta.type_name, meta.type_name);
                    dataset.typed = false;
                    break;
                }
            }
        }
        dataset
    }
}

// ============================================================================
// Asynchronous Pipe
// ============================================================================

/// Asynchronous pipe.
///
/// Mixes synchronous and asynchronous units. Units are awaited one at a
/// time, so ordering and abort behavior match [`Pipe`] exactly.
#[derive(Clone)]
pub struct PipeAsync {
    meta: UnitMetadata,
    items: Vec<Step>,
}

impl PipeAsync {
    /// Create a pipe led by a root step.
    pub fn new(root: Step) -> Self {
        let meta = pipe_metadata(root.metadata()).asynchronous();
        Self {
            meta,
            items: vec![root],
        }
    }

    /// Append a synchronous unit.
    pub fn then<U: Unit + 'static>(mut self, unit: U) -> Self {
        self.items.push(Step::sync(unit));
        self
    }

    /// Append an asynchronous unit.
    pub fn then_async<U: AsyncUnit + 'static>(mut self, unit: U) -> Self {
        self.items.push(Step::asynchronous(unit));
        self
    }

    /// Append a step.
    pub fn then_step(mut self, step: Step) -> Self {
        self.items.push(step);
        self
    }

    /// Steps in execution order.
    pub fn items(&self) -> &[Step] {
        &self.items
    }
}

impl From<Pipe> for PipeAsync {
    fn from(pipe: Pipe) -> Self {
        Self {
            meta: pipe.meta.asynchronous(),
            items: pipe.items.into_iter().map(Step::Sync).collect(),
        }
    }
}

#[async_trait]
impl AsyncUnit for PipeAsync {
    fn metadata(&self) -> &UnitMetadata {
        &self.meta
    }

    async fn run_async(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        for item in &self.items {
            match next_flow(item.kind(), &dataset, config) {
                Flow::Run => dataset = item.run(dataset, config).await,
                Flow::Skip => continue,
                Flow::Halt => {
                    trace!(
                        "async pipe '{}' halted before '{}'",
                        self.meta.type_name,
                        item.metadata().type_name
                    );
                    dataset.typed = false;
                    break;
                }
            }
        }
        dataset
    }
}
