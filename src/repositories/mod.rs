// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO invariant enforcement
// - Explicit SQL only

pub mod local_store;

pub use local_store::{LocalStore, SqliteLocalStore, DEFAULT_STORAGE_KEY};
