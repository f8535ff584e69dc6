//! String transformations.

use crate::core::config::Config;
use crate::core::dataset::Dataset;
use crate::core::types::Value;
use crate::core::unit::{Unit, UnitMetadata};

/// Transformation mapping a string value. Other values pass through.
#[derive(Debug, Clone)]
pub struct StringTransform {
    meta: UnitMetadata,
    map: fn(&str) -> String,
}

impl Unit for StringTransform {
    fn metadata(&self) -> &UnitMetadata {
        &self.meta
    }

    fn run(&self, mut dataset: Dataset, _config: &Config) -> Dataset {
        if let Value::String(text) = &dataset.value {
            dataset.value = Value::String((self.map)(text));
        }
        dataset
    }
}

/// Remove leading and trailing whitespace.
pub fn trim() -> StringTransform {
    StringTransform {
        meta: UnitMetadata::transformation("trim"),
        map: |s| s.trim().to_string(),
    }
}

/// Lowercase the string.
pub fn to_lower_case() -> StringTransform {
    StringTransform {
        meta: UnitMetadata::transformation("to_lower_case"),
        map: str::to_lowercase,
    }
}

/// Uppercase the string.
pub fn to_upper_case() -> StringTransform {
    StringTransform {
        meta: UnitMetadata::transformation("to_upper_case"),
        map: str::to_uppercase,
    }
}
