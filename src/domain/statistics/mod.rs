//! Statistics invariants:
//!
//! 1. Statistics are ALWAYS derived, NEVER persisted
//! 2. Statistics can be recalculated at any time from the collection
//! 3. Statistics NEVER alter the collection

pub mod entity;
pub use entity::{LibraryStatistics, RatingBucket};
