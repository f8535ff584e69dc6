//! Length and value bounds.

use super::{Bound, WithMessage};
use crate::core::config::Config;
use crate::core::dataset::{Dataset, IssueDetails};
use crate::core::issue::Requirement;
use crate::core::types::Value;
use crate::core::unit::{Unit, UnitMetadata};

// ============================================================================
// Length
// ============================================================================

/// Bound on the length of a string (in chars) or an array.
#[derive(Debug, Clone)]
pub struct LengthCheck {
    meta: UnitMetadata,
    bound: Bound,
    limit: usize,
}

impl LengthCheck {
    fn new(type_name: &'static str, bound: Bound, limit: usize) -> Self {
        Self {
            meta: UnitMetadata::validation(type_name)
                .expects(bound.expects(&limit.to_string()))
                .requirement(Requirement::Length(limit)),
            bound,
            limit,
        }
    }
}

impl WithMessage for LengthCheck {
    fn metadata_mut(&mut self) -> &mut UnitMetadata {
        &mut self.meta
    }
}

impl Unit for LengthCheck {
    fn metadata(&self) -> &UnitMetadata {
        &self.meta
    }

    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if !dataset.typed {
            return dataset;
        }
        if let Some(actual) = dataset.value.length() {
            if !self.bound.holds(actual, self.limit) {
                let details = IssueDetails::new().received(actual.to_string());
                dataset.raise(&self.meta, "length", config, details);
            }
        }
        dataset
    }
}

/// Length of at least `limit`.
pub fn min_length(limit: usize) -> LengthCheck {
    LengthCheck::new("min_length", Bound::Min, limit)
}

/// Length of at most `limit`.
pub fn max_length(limit: usize) -> LengthCheck {
    LengthCheck::new("max_length", Bound::Max, limit)
}

/// Length of exactly `limit`.
pub fn length(limit: usize) -> LengthCheck {
    LengthCheck::new("length", Bound::Exact, limit)
}

// ============================================================================
// Value
// ============================================================================

/// Bound on a number.
#[derive(Debug, Clone)]
pub struct ValueCheck {
    meta: UnitMetadata,
    bound: Bound,
    limit: f64,
}

impl ValueCheck {
    fn new(type_name: &'static str, bound: Bound, limit: f64) -> Self {
        let shown = Value::Float(limit).received();
        Self {
            meta: UnitMetadata::validation(type_name)
                .expects(bound.expects(&shown))
                .requirement(Requirement::Number(limit)),
            bound,
            limit,
        }
    }
}

impl WithMessage for ValueCheck {
    fn metadata_mut(&mut self) -> &mut UnitMetadata {
        &mut self.meta
    }
}

impl Unit for ValueCheck {
    fn metadata(&self) -> &UnitMetadata {
        &self.meta
    }

    fn run(&self, mut dataset: Dataset, config: &Config) -> Dataset {
        if !dataset.typed {
            return dataset;
        }
        if let Some(actual) = dataset.value.as_float() {
            if !self.bound.holds(actual, self.limit) {
                dataset.raise(&self.meta, "value", config, IssueDetails::new());
            }
        }
        dataset
    }
}

/// Number of at least `limit`.
pub fn min_value(limit: f64) -> ValueCheck {
    ValueCheck::new("min_value", Bound::Min, limit)
}

/// Number of at most `limit`.
pub fn max_value(limit: f64) -> ValueCheck {
    ValueCheck::new("max_value", Bound::Max, limit)
}
