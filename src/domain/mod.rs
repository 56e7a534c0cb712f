// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// All other modules import from `crate::domain::*`

pub mod media;
pub mod statistics;

pub use media::{validate_media_record, validate_record_id, MediaCategory, MediaRecord, MediaStatus};

pub use statistics::{LibraryStatistics, RatingBucket};

use thiserror::Error;

/// Domain-level errors
/// These represent violations of business rules and invariants
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Progress of {id} is already at its total of {total}")]
    ProgressComplete { id: String, total: u32 },
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;
