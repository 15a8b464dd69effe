//! Ribbon Core
//!
//! Shared plumbing for the Ribbon crates: logging setup, frame profiling and
//! the hash collections used for series bookkeeping.

pub mod alloc;
pub mod logging;
pub mod profiling;
