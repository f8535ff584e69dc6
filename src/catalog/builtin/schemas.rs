//! Type schemas.
//!
//! Schemas establish the shape of a value and set `typed`. Container schemas
//! run their child schemas on each entry and prefix child issue paths with
//! the entry's key or index.

use super::WithMessage;
use crate::core::config::Config;
use crate::core::dataset::{Dataset, IssueDetails};
use crate::core::issue::PathItem;
use crate::core::types::{Object, Value, ValueKind};
use crate::core::unit::{Unit, UnitMetadata};
use std::sync::Arc;

// ============================================================================
// Primitive Schemas
// ============================================================================

/// Schema matching a single value kind.
#[derive(Debug, Clone)]
pub struct TypeSchema {
    meta: UnitMetadata,
    kind: ValueKind,
}

impl TypeSchema {
    fn new(type_name: &'static str, kind: ValueKind) -> Self {
        Self {
            meta: UnitMetadata::schema(type_name).expects(kind.to_string()),
            kind,
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match value {
            Value::Float(f) if self.kind == ValueKind::Number => !f.is_nan(),
            other => other.kind() == self.kind,
        }
    }
}

impl WithMessage for TypeSchema {
    fn metadata_mut(&mut self) -> &mut UnitMetadata {
        &mut self.meta
    }
}

impl Unit for TypeSchema {
    fn metadata(&self) -> &UnitMetadata {
        &self.meta
    }

    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if self.accepts(&dataset.value) {
            dataset.typed = true;
        } else {
            dataset.raise(&self.meta, "type", config, IssueDetails::new());
        }
        dataset
    }
}

/// Strings.
pub fn string() -> TypeSchema {
    TypeSchema::new("string", ValueKind::String)
}

/// Numbers, integer or float. `NaN` is rejected.
pub fn number() -> TypeSchema {
    TypeSchema::new("number", ValueKind::Number)
}

/// Booleans.
pub fn boolean() -> TypeSchema {
    TypeSchema::new("boolean", ValueKind::Boolean)
}

/// Null.
pub fn null() -> TypeSchema {
    TypeSchema::new("null", ValueKind::Null)
}

/// Schema accepting every value.
#[derive(Debug, Clone)]
pub struct AnySchema {
    meta: UnitMetadata,
}

impl Unit for AnySchema {
    fn metadata(&self) -> &UnitMetadata {
        &self.meta
    }

    fn run(&self, mut dataset: Dataset, _config: &Config) -> Dataset {
        dataset.typed = true;
        dataset
    }
}

/// Any value.
pub fn any() -> AnySchema {
    AnySchema {
        meta: UnitMetadata::schema("any").expects("any"),
    }
}

// ============================================================================
// Object Schema
// ============================================================================

/// Plain object schema with a fixed set of entries.
///
/// Entries run in declaration order and the output holds exactly the
/// declared keys; unknown keys are stripped.
#[derive(Clone)]
pub struct ObjectSchema {
    meta: UnitMetadata,
    entries: Vec<(String, Arc<dyn Unit>)>,
}

impl ObjectSchema {
    /// Add an entry.
    pub fn entry<U: Unit + 'static>(mut self, key: impl Into<String>, schema: U) -> Self {
        self.entries.push((key.into(), Arc::new(schema)));
        self
    }

    /// Declared keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }
}

impl WithMessage for ObjectSchema {
    fn metadata_mut(&mut self) -> &mut UnitMetadata {
        &mut self.meta
    }
}

impl Unit for ObjectSchema {
    fn metadata(&self) -> &UnitMetadata {
        &self.meta
    }

    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        let whole = dataset.value.clone();
        let Value::Object(input) = &whole else {
            dataset.raise(&self.meta, "type", config, IssueDetails::new());
            return dataset;
        };

        dataset.typed = true;
        let mut output = Object::with_capacity(self.entries.len());

        for (key, schema) in &self.entries {
            match input.get(key) {
                Some(value) => {
                    let child = schema.run(Dataset::new(value.clone()), config);
                    if child.has_issues() {
                        let item = PathItem::object(key.clone(), whole.clone(), value.clone());
                        dataset.absorb(&item, child.issues);
                    }
                    if !child.typed {
                        dataset.typed = false;
                    }
                    output.insert(key.clone(), child.value);
                }
                None => {
                    let item = PathItem::object(key.clone(), whole.clone(), Value::Null);
                    dataset.raise(
                        &self.meta,
                        "key",
                        config,
                        IssueDetails::new()
                            .input(Value::Null)
                            .expected(format!("\"{}\"", key))
                            .received("undefined")
                            .path(item),
                    );
                }
            }

            if dataset.has_issues() && config.abort_early() {
                dataset.typed = false;
                break;
            }
        }

        dataset.value = Value::Object(output);
        dataset
    }
}

/// Object with no entries yet. Add them with [`ObjectSchema::entry`].
pub fn object() -> ObjectSchema {
    ObjectSchema {
        meta: UnitMetadata::schema("object").expects("Object"),
        entries: Vec::new(),
    }
}

// ============================================================================
// Array Schema
// ============================================================================

/// Array schema running one item schema over every element.
#[derive(Clone)]
pub struct ArraySchema {
    meta: UnitMetadata,
    item: Arc<dyn Unit>,
}

impl WithMessage for ArraySchema {
    fn metadata_mut(&mut self) -> &mut UnitMetadata {
        &mut self.meta
    }
}

impl Unit for ArraySchema {
    fn metadata(&self) -> &UnitMetadata {
        &self.meta
    }

    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        let whole = dataset.value.clone();
        let Value::Array(input) = &whole else {
            dataset.raise(&self.meta, "type", config, IssueDetails::new());
            return dataset;
        };

        dataset.typed = true;
        let mut output = Vec::with_capacity(input.len());

        for (index, value) in input.iter().enumerate() {
            let child = self.item.run(Dataset::new(value.clone()), config);
            if child.has_issues() {
                let item = PathItem::array(index, whole.clone(), value.clone());
                dataset.absorb(&item, child.issues);
            }
            if !child.typed {
                dataset.typed = false;
            }
            output.push(child.value);

            if dataset.has_issues() && config.abort_early() {
                dataset.typed = false;
                break;
            }
        }

        dataset.value = Value::Array(output);
        dataset
    }
}

/// Array whose items all match `item`.
pub fn array<U: Unit + 'static>(item: U) -> ArraySchema {
    ArraySchema {
        meta: UnitMetadata::schema("array").expects("Array"),
        item: Arc::new(item),
    }
}
