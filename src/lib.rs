// src/lib.rs
// AniManga - Local-first anime and manga progress tracker
//
// Architecture:
// - Domain: the MediaRecord entity, its invariants, derived statistics
// - Persistence: one gateway in front of a remote store and a durable local
//   store, degrading to local-only on the first remote failure
// - Application: the in-memory collection with optimistic updates
// - Integrations: remote items endpoint, AI metadata enrichment

pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod integrations;
pub mod repositories;
pub mod services;

// ============================================================================
// PUBLIC API - Domain
// ============================================================================

pub use domain::{
    validate_media_record, DomainError, LibraryStatistics, MediaCategory, MediaRecord,
    MediaStatus, RatingBucket,
};

// ============================================================================
// PUBLIC API - Errors & Config
// ============================================================================

pub use config::{AppConfig, ConfigArgs};
pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Persistence
// ============================================================================

pub use db::{create_connection_pool, create_memory_pool, initialize_database, ConnectionPool};
pub use repositories::{LocalStore, SqliteLocalStore};
pub use services::{compute_statistics, PersistenceGateway, StorageMode};

// ============================================================================
// PUBLIC API - Integrations
// ============================================================================

pub use integrations::{
    Enrichment, GeminiClient, HttpRemoteStore, MetadataEnricher, Recommendation, RemoteError,
    RemoteStore,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::{
    AppState, CategoryFilter, ErrorResponse, LibraryController, LoadState, MediaInput,
};
