use super::entity::MediaRecord;
use crate::domain::{DomainError, DomainResult};

/// Validates all MediaRecord invariants that can be checked on a single record
pub fn validate_media_record(record: &MediaRecord) -> DomainResult<()> {
    validate_record_id(&record.id)?;
    validate_title(&record.title)?;
    validate_rating(record.rating)?;
    Ok(())
}

/// Id must be present for every update and delete
pub fn validate_record_id(id: &str) -> DomainResult<()> {
    if id.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Record id cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_title(title: &str) -> DomainResult<()> {
    if title.trim().is_empty() {
        return Err(DomainError::InvariantViolation(
            "Title cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Rating lives in [0, 10] with 0.5 granularity
fn validate_rating(rating: f64) -> DomainResult<()> {
    if !rating.is_finite() || !(0.0..=10.0).contains(&rating) {
        return Err(DomainError::InvariantViolation(format!(
            "Rating {} is outside 0..=10",
            rating
        )));
    }
    if (rating * 2.0).fract() != 0.0 {
        return Err(DomainError::InvariantViolation(format!(
            "Rating {} is not a multiple of 0.5",
            rating
        )));
    }
    Ok(())
}

/// Invariants that must hold true for the collection:
///
/// 1. Id is unique across the collection
/// 2. Id never changes after creation
/// 3. Progress is never negative (enforced by the unsigned type)
/// 4. lastModifiedAt changes on every create/update, never on read
/// 5. Reaching the known total is display state, not a stored status
