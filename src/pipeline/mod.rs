//! Pipeline module.
//!
//! Pipes chain units in order under the engine's abort policy, and fallback
//! wrappers replace failing results.

pub mod pipe;
pub mod fallback;

pub use pipe::{Pipe, PipeAsync};
pub use fallback::{
    AsyncFallbackFn, AsyncFallbackSource, Fallback, FallbackAsync, FallbackFn, FallbackSource,
};
