// src/integrations/mod.rs
//
// External Integrations Module

pub mod gemini;
pub mod remote;

pub use gemini::{Enrichment, GeminiClient, MetadataEnricher, Recommendation};
pub use remote::{HttpRemoteStore, RemoteError, RemoteStore};
