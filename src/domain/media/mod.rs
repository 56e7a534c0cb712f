pub mod entity;
pub mod invariants;

pub use entity::{MediaCategory, MediaRecord, MediaStatus};
pub use invariants::{validate_media_record, validate_record_id};
