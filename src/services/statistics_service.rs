// src/services/statistics_service.rs
//
// Derived statistics over the in-memory collection. Pure: nothing is stored.

use crate::domain::{LibraryStatistics, MediaCategory, MediaRecord, MediaStatus, RatingBucket};

pub fn compute_statistics(records: &[MediaRecord]) -> LibraryStatistics {
    let total_titles = records.len();
    let total_progress = records.iter().map(|r| r.current_progress as u64).sum();

    let average_rating = if total_titles > 0 {
        records.iter().map(|r| r.rating).sum::<f64>() / total_titles as f64
    } else {
        0.0
    };

    let by_status = MediaStatus::ALL
        .iter()
        .map(|status| (*status, records.iter().filter(|r| r.status == *status).count()))
        .filter(|(_, count)| *count > 0)
        .collect();

    let by_category = MediaCategory::ALL
        .iter()
        .map(|category| (*category, records.iter().filter(|r| r.category == *category).count()))
        .filter(|(_, count)| *count > 0)
        .collect();

    // Half-ratings round up: 7.5 lands in bucket 8.
    let rating_distribution = (0u8..=10)
        .map(|rating| RatingBucket {
            rating,
            count: records
                .iter()
                .filter(|r| r.rating.round() as i64 == rating as i64)
                .count(),
        })
        .collect();

    LibraryStatistics {
        total_titles,
        total_progress,
        average_rating,
        by_status,
        by_category,
        rating_distribution,
    }
}
