// src/application/controller.rs
//
// Library controller - owns the in-memory collection
//
// RULES:
// - Seeded once from the gateway, reloaded only on an explicit retry
// - Every mutation is applied in memory first, then persisted
// - The gateway absorbs transport failures, so the only error that can come
//   back from a write is a validation refusal; the optimistic change is then
//   reverted
// - Display views are derived on demand and never mutate the collection

use chrono::Utc;
use log::{debug, info};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::error_handling::ErrorResponse;
use crate::application::filter::{filter_records, CategoryFilter};
use crate::domain::{
    DomainError, LibraryStatistics, MediaCategory, MediaRecord, MediaStatus,
};
use crate::error::{AppError, AppResult};
use crate::integrations::Enrichment;
use crate::services::{compute_statistics, PersistenceGateway, StorageMode};

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Ready,
    /// Initial load failed; `load()` again is the retry action
    Failed { message: String },
}

/// Form payload: everything in a record except id and timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct MediaInput {
    pub title: String,
    pub category: MediaCategory,
    pub status: MediaStatus,
    pub current_progress: u32,
    pub total_progress: Option<u32>,
    pub rating: f64,
    pub cover_image_url: Option<String>,
    pub genres: Option<Vec<String>>,
    pub description: Option<String>,
    pub external_link: Option<String>,
}

impl MediaInput {
    pub fn new(title: impl Into<String>, category: MediaCategory) -> Self {
        Self {
            title: title.into(),
            category,
            status: MediaStatus::Ongoing,
            current_progress: 0,
            total_progress: None,
            rating: 0.0,
            cover_image_url: None,
            genres: None,
            description: None,
            external_link: None,
        }
    }

    /// Pre-filled form for editing an existing record
    pub fn from_record(record: &MediaRecord) -> Self {
        Self {
            title: record.title.clone(),
            category: record.category,
            status: record.status,
            current_progress: record.current_progress,
            total_progress: record.total_progress,
            rating: record.rating,
            cover_image_url: record.cover_image_url.clone(),
            genres: record.genres.clone(),
            description: record.description.clone(),
            external_link: record.external_link.clone(),
        }
    }

    /// Copy AI-suggested metadata into the form
    pub fn apply_enrichment(&mut self, enrichment: &Enrichment) {
        if !enrichment.genres.is_empty() {
            self.genres = Some(enrichment.genres.clone());
        }
        if !enrichment.description.trim().is_empty() {
            self.description = Some(enrichment.description.clone());
        }
        if let Some(total) = enrichment.total_episodes_or_chapters {
            self.total_progress = Some(total);
        }
    }

    fn into_record(self, id: String, last_modified_at: i64) -> MediaRecord {
        MediaRecord {
            id,
            title: self.title.trim().to_string(),
            category: self.category,
            status: self.status,
            current_progress: self.current_progress,
            total_progress: self.total_progress.filter(|total| *total > 0),
            rating: self.rating,
            cover_image_url: non_blank(self.cover_image_url),
            genres: self.genres.filter(|genres| !genres.is_empty()),
            description: non_blank(self.description),
            external_link: non_blank(self.external_link),
            last_modified_at,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub struct LibraryController {
    gateway: Arc<PersistenceGateway>,
    items: Vec<MediaRecord>,
    load_state: LoadState,
    category: CategoryFilter,
    search: String,
    last_stamp: i64,
}

impl LibraryController {
    pub fn new(gateway: Arc<PersistenceGateway>) -> Self {
        Self {
            gateway,
            items: Vec::new(),
            load_state: LoadState::Loading,
            category: CategoryFilter::All,
            search: String::new(),
            last_stamp: 0,
        }
    }

    /// Seed (or re-seed, on retry) the collection from the gateway
    pub async fn load(&mut self) -> AppResult<()> {
        self.load_state = LoadState::Loading;

        match self.gateway.load().await {
            Ok(records) => {
                self.last_stamp = records
                    .iter()
                    .map(|r| r.last_modified_at)
                    .max()
                    .unwrap_or(0)
                    .max(self.last_stamp);
                self.items = records;
                self.load_state = LoadState::Ready;
                info!(
                    "Library loaded with {} records ({} mode)",
                    self.items.len(),
                    self.gateway.mode()
                );
                Ok(())
            }
            Err(e) => {
                self.load_state = LoadState::Failed {
                    message: ErrorResponse::from_app_error(&e).to_string(),
                };
                Err(e)
            }
        }
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn storage_mode(&self) -> StorageMode {
        self.gateway.mode()
    }

    pub fn items(&self) -> &[MediaRecord] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&MediaRecord> {
        self.items.iter().find(|r| r.id == id)
    }

    /// Create a record, or replace the one with `editing_id`
    pub async fn add_or_edit(
        &mut self,
        input: MediaInput,
        editing_id: Option<&str>,
    ) -> AppResult<MediaRecord> {
        let id = match editing_id {
            Some(id) => {
                if self.get(id).is_none() {
                    return Err(AppError::NotFound);
                }
                id.to_string()
            }
            None => Uuid::new_v4().to_string(),
        };

        let record = input.into_record(id, self.next_stamp());
        let snapshot = self.items.clone();

        let persisted = if editing_id.is_some() {
            self.replace(record.clone());
            self.gateway.update(&record).await
        } else {
            self.items.insert(0, record.clone());
            self.gateway.create(&record).await
        };

        self.settle(persisted, snapshot)?;
        debug!("Saved {} ({})", record.id, record.title);
        Ok(record)
    }

    /// Whether the quick +1 action is available for this record
    pub fn can_increment(&self, id: &str) -> bool {
        self.get(id).map_or(false, |r| !r.is_complete())
    }

    /// Advance progress by exactly one episode or chapter
    pub async fn increment_progress(&mut self, id: &str) -> AppResult<MediaRecord> {
        let current = self.get(id).ok_or(AppError::NotFound)?;

        if let Some(total) = current.known_total().filter(|_| current.is_complete()) {
            return Err(DomainError::ProgressComplete {
                id: id.to_string(),
                total,
            }
            .into());
        }

        let next = current.current_progress.checked_add(1).ok_or_else(|| {
            DomainError::InvariantViolation(format!("Progress of {} cannot go any higher", id))
        })?;

        let mut updated = current.clone();
        updated.current_progress = next;
        updated.last_modified_at = self.next_stamp();

        let snapshot = self.items.clone();
        self.replace(updated.clone());
        let persisted = self.gateway.update(&updated).await;
        self.settle(persisted, snapshot)?;

        Ok(updated)
    }

    pub async fn remove(&mut self, id: &str) -> AppResult<()> {
        if self.get(id).is_none() {
            return Err(AppError::NotFound);
        }

        let snapshot = self.items.clone();
        self.items.retain(|r| r.id != id);
        let persisted = self.gateway.delete(id).await;
        self.settle(persisted, snapshot)
    }

    pub fn set_category_filter(&mut self, category: CategoryFilter) {
        self.category = category;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Records matching the current category and search
    pub fn visible(&self) -> Vec<&MediaRecord> {
        filter_records(&self.items, self.category, &self.search)
    }

    pub fn statistics(&self) -> LibraryStatistics {
        compute_statistics(&self.items)
    }

    fn replace(&mut self, record: MediaRecord) {
        if let Some(existing) = self.items.iter_mut().find(|r| r.id == record.id) {
            *existing = record;
        }
    }

    /// Revert the optimistic change if the gateway refused the write
    fn settle(&mut self, persisted: AppResult<()>, snapshot: Vec<MediaRecord>) -> AppResult<()> {
        if persisted.is_err() {
            self.items = snapshot;
        }
        persisted
    }

    /// Milliseconds since epoch, strictly increasing across this controller
    fn next_stamp(&mut self) -> i64 {
        let stamp = Utc::now().timestamp_millis().max(self.last_stamp + 1);
        self.last_stamp = stamp;
        stamp
    }
}
