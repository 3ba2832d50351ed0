//! Tessera Core
//!
//! Shared utilities for the Tessera batch renderer: logging bootstrap,
//! profiling scopes, math re-exports and generational storage.

pub mod alloc;
pub mod logging;
pub mod math;
pub mod profiling;
