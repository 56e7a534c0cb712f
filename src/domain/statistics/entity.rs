use serde::{Deserialize, Serialize};

use crate::domain::media::{MediaCategory, MediaStatus};

/// Summary over the whole collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryStatistics {
    pub total_titles: usize,

    /// Sum of episodes watched and chapters read
    pub total_progress: u64,

    /// Mean rating, 0 for an empty collection
    pub average_rating: f64,

    /// Only statuses with at least one record, in declaration order
    pub by_status: Vec<(MediaStatus, usize)>,

    /// Only categories with at least one record, in declaration order
    pub by_category: Vec<(MediaCategory, usize)>,

    /// Always 11 buckets, ratings 0 through 10
    pub rating_distribution: Vec<RatingBucket>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingBucket {
    pub rating: u8,
    pub count: usize,
}

impl LibraryStatistics {
    pub fn is_empty(&self) -> bool {
        self.total_titles == 0
    }
}
