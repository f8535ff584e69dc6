//! Execution module.
//!
//! Entry points that run a schema over raw input and report the result.

pub mod engine;
pub mod report;

pub use engine::{execute, execute_async, execute_blocking, execute_json, is_valid, parse, parse_async, ParseResult};
pub use report::IssueReport;
