pub mod client;

pub use client::{
    favourites_summary, Enrichment, GeminiClient, MetadataEnricher, Recommendation,
    DEFAULT_GEMINI_MODEL,
};
