//! Allocation and collection types.
//!
//! - Re-exports of AHash-backed hash collections
//! - [`SparseSet`], a generational slot map used for stable resource handles

pub mod sparse_set;

pub use ahash::{AHashMap as HashMap, AHashSet as HashSet, RandomState};
pub use sparse_set::{IndexSlot, SparseSet};
