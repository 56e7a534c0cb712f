// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod persistence_gateway;
pub mod statistics_service;


pub use persistence_gateway::{PersistenceGateway, StorageMode};
pub use statistics_service::compute_statistics;
