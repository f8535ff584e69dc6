//! Core types and traits of the validation engine.
//!
//! This module contains the pieces every unit and pipeline shares:
//! - Dynamic values
//! - The dataset threaded through a run and the issues it collects
//! - Run configuration and message stores
//! - The unit contract
//! - Error types

pub mod types;
pub mod issue;
pub mod error;
pub mod message;
pub mod config;
pub mod dataset;
pub mod unit;

// Re-export commonly used types
pub use types::{Value, ValueKind, Object};
pub use issue::{Issue, IssueKind, PathItem, PathKey, PathKind, Requirement};
pub use error::{PramanaError, ConfigError, ParseError};
pub use message::ErrorMessage;
pub use config::{AbortPolicy, Config, GlobalConfig};
pub use dataset::{Dataset, IssueDetails};
pub use unit::{AsyncUnit, Step, Unit, UnitKind, UnitMetadata};
