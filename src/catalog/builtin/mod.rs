//! Built-in unit implementations.
//!
//! This module contains the standard schemas, validations and
//! transformations that ship with Pramana.

mod schemas;
mod length;
mod format;
mod strings;
mod keys;
mod words;
mod custom;

use crate::core::message::ErrorMessage;
use crate::core::unit::UnitMetadata;

/// Units that accept a caller-supplied error message.
pub trait WithMessage: Sized {
    /// Mutable access to the unit metadata.
    fn metadata_mut(&mut self) -> &mut UnitMetadata;

    /// Use `message` for every issue this unit raises.
    fn with_message(mut self, message: impl Into<ErrorMessage>) -> Self {
        self.metadata_mut().message = Some(message.into());
        self
    }
}

/// Comparison applied by bound checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Bound {
    Min,
    Max,
    Exact,
}

impl Bound {
    pub(crate) fn holds<T: PartialOrd>(&self, actual: T, limit: T) -> bool {
        match self {
            Bound::Min => actual >= limit,
            Bound::Max => actual <= limit,
            Bound::Exact => actual == limit,
        }
    }

    pub(crate) fn expects(&self, limit: &str) -> String {
        match self {
            Bound::Min => format!(">={}", limit),
            Bound::Max => format!("<={}", limit),
            Bound::Exact => limit.to_string(),
        }
    }
}

// Re-export for direct access
pub use schemas::{
    any, array, boolean, null, number, object, string, AnySchema, ArraySchema, ObjectSchema,
    TypeSchema,
};
pub use length::{length, max_length, max_value, min_length, min_value, LengthCheck, ValueCheck};
pub use format::{
    base64url, decimal, email, jwt, regex, JwtAlgorithm, JwtCheck, PatternCheck,
};
pub use strings::{to_lower_case, to_upper_case, trim, StringTransform};
pub use keys::{snake_case, to_snake_case, ToSnakeCase};
pub use words::{
    max_words, min_words, segmenter, set_segmenter, word_count, words, DefaultSegmenter,
    Segmenter, WordCheck,
};
pub use custom::{
    check, check_async, description, title, transform, transform_async, Annotation, Check,
    CheckAsync, Transform, TransformAsync,
};
