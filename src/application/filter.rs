// src/application/filter.rs
//
// Derived display view: category selection plus case-insensitive title search.
// A pure projection; the collection is never touched.

use crate::domain::{MediaCategory, MediaRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(MediaCategory),
}

impl CategoryFilter {
    pub fn matches(&self, record: &MediaRecord) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => record.category == *category,
        }
    }
}

pub fn filter_records<'a>(
    records: &'a [MediaRecord],
    category: CategoryFilter,
    search: &str,
) -> Vec<&'a MediaRecord> {
    let needle = search.to_lowercase();

    records
        .iter()
        .filter(|r| category.matches(r))
        .filter(|r| needle.is_empty() || r.title.to_lowercase().contains(&needle))
        .collect()
}
