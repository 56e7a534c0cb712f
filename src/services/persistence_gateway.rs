// src/services/persistence_gateway.rs
//
// Persistence Gateway - routes every read and write to the remote store or
// the durable local store, depending on a sticky storage mode.
//
// STATE MACHINE:
//   Remote ──(RemoteError::Unavailable, or any error from list)──▶ LocalFallback
//   LocalFallback is terminal for the lifetime of the gateway.
//
// GUARANTEES:
// - An accepted write always lands in at least one durable store, and the
//   next load() from this or a fresh gateway over the same local store sees it
// - A successful remote load is mirrored into the local store verbatim
// - Validation-class refusals of a mutation never change the mode
// - Mutations and loads share one FIFO queue, so within this gateway the
//   local read-modify-write cycle and the load mirror never interleave

use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{validate_media_record, validate_record_id, DomainError, MediaRecord};
use crate::error::{AppError, AppResult};
use crate::integrations::remote::{RemoteError, RemoteStore};
use crate::repositories::LocalStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    Remote,
    LocalFallback,
}

impl std::fmt::Display for StorageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageMode::Remote => write!(f, "remote"),
            StorageMode::LocalFallback => write!(f, "local-fallback"),
        }
    }
}

/// One mutation, applicable to either store
#[derive(Debug, Clone)]
enum Mutation<'a> {
    Create(&'a MediaRecord),
    Update(&'a MediaRecord),
    Delete(&'a str),
}

impl Mutation<'_> {
    fn name(&self) -> &'static str {
        match self {
            Mutation::Create(_) => "create",
            Mutation::Update(_) => "update",
            Mutation::Delete(_) => "delete",
        }
    }

    fn record_id(&self) -> &str {
        match self {
            Mutation::Create(record) | Mutation::Update(record) => &record.id,
            Mutation::Delete(id) => id,
        }
    }

    /// Apply to an in-memory copy of the local collection
    fn apply_to(&self, records: &mut Vec<MediaRecord>) {
        match self {
            Mutation::Create(record) => {
                records.retain(|r| r.id != record.id);
                records.insert(0, (*record).clone());
            }
            Mutation::Update(record) => {
                match records.iter_mut().find(|r| r.id == record.id) {
                    Some(existing) => *existing = (*record).clone(),
                    // Upsert: the write must land even if the cache never saw the record.
                    None => records.insert(0, (*record).clone()),
                }
            }
            Mutation::Delete(id) => records.retain(|r| r.id != *id),
        }
    }
}

pub struct PersistenceGateway {
    remote: Option<Arc<dyn RemoteStore>>,
    local: Arc<dyn LocalStore>,
    fallback: AtomicBool,
    write_queue: Mutex<()>,
}

impl PersistenceGateway {
    /// Gateway starting in `Remote` mode
    pub fn new(remote: Arc<dyn RemoteStore>, local: Arc<dyn LocalStore>) -> Self {
        Self {
            remote: Some(remote),
            local,
            fallback: AtomicBool::new(false),
            write_queue: Mutex::new(()),
        }
    }

    /// Gateway with no remote store, permanently in `LocalFallback` mode
    pub fn local_only(local: Arc<dyn LocalStore>) -> Self {
        Self {
            remote: None,
            local,
            fallback: AtomicBool::new(true),
            write_queue: Mutex::new(()),
        }
    }

    pub fn mode(&self) -> StorageMode {
        if self.fallback.load(Ordering::SeqCst) {
            StorageMode::LocalFallback
        } else {
            StorageMode::Remote
        }
    }

    /// Remote store to use, or None once degraded
    fn active_remote(&self) -> Option<&Arc<dyn RemoteStore>> {
        match self.mode() {
            StorageMode::Remote => self.remote.as_ref(),
            StorageMode::LocalFallback => None,
        }
    }

    fn degrade(&self, operation: &str, reason: &str) {
        if !self.fallback.swap(true, Ordering::SeqCst) {
            warn!(
                "Remote store unavailable during {} ({}); switching to local-fallback",
                operation, reason
            );
        }
    }

    /// Load the whole collection
    ///
    /// Any remote failure on list, including a 400/422 refusal, degrades to
    /// the local store. The write queue is held across the remote call so a
    /// concurrent mutation cannot be overwritten by a stale mirror.
    pub async fn load(&self) -> AppResult<Vec<MediaRecord>> {
        let _guard = self.write_queue.lock().await;

        let Some(remote) = self.active_remote() else {
            return Ok(self.local.read_all());
        };

        match remote.list().await {
            Ok(records) => {
                self.local.write_all(&records);
                info!("Loaded {} records from remote store", records.len());
                Ok(records)
            }
            Err(RemoteError::Unavailable(reason)) => {
                self.degrade("load", &reason);
                Ok(self.local.read_all())
            }
            Err(RemoteError::Rejected { status, message }) => {
                self.degrade("load", &format!("list refused ({}): {}", status, message));
                Ok(self.local.read_all())
            }
        }
    }

    pub async fn create(&self, record: &MediaRecord) -> AppResult<()> {
        validate_media_record(record).map_err(invalid)?;
        self.mutate(Mutation::Create(record)).await
    }

    pub async fn update(&self, record: &MediaRecord) -> AppResult<()> {
        validate_media_record(record).map_err(invalid)?;
        self.mutate(Mutation::Update(record)).await
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        validate_record_id(id).map_err(invalid)?;
        self.mutate(Mutation::Delete(id)).await
    }

    async fn mutate(&self, mutation: Mutation<'_>) -> AppResult<()> {
        let _guard = self.write_queue.lock().await;

        if let Some(remote) = self.active_remote() {
            let outcome = match &mutation {
                Mutation::Create(record) => remote.create(record).await,
                Mutation::Update(record) => remote.update(record).await,
                Mutation::Delete(id) => remote.delete(id).await,
            };

            match outcome {
                Ok(()) => {
                    debug!("Remote {} of {} succeeded", mutation.name(), mutation.record_id());
                }
                Err(RemoteError::Unavailable(reason)) => {
                    self.degrade(mutation.name(), &reason);
                }
                Err(RemoteError::Rejected { status, message }) => {
                    return Err(AppError::Validation(format!(
                        "Remote store refused {} of {} ({}): {}",
                        mutation.name(),
                        mutation.record_id(),
                        status,
                        message
                    )));
                }
            }
        }

        // Local fallback, or mirroring a successful remote write.
        let mut records = self.local.read_all();
        mutation.apply_to(&mut records);
        self.local.write_all(&records);

        Ok(())
    }
}

/// Input problems are reported before any store is touched
fn invalid(err: DomainError) -> AppError {
    AppError::Validation(err.to_string())
}
