// src/integrations/gemini/client.rs
//
// AI metadata enrichment via the Gemini generateContent REST API
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Never touches the collection or the persistence gateway
// - Every failure collapses to "no enrichment available" and is only logged

use async_trait::async_trait;
use log::{debug, error};
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use crate::domain::{MediaCategory, MediaRecord};
use crate::error::{AppError, AppResult};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Favourites are records rated at least this high
const FAVOURITE_MIN_RATING: f64 = 8.0;

/// Cap on favourites sent in a recommendation prompt
const MAX_FAVOURITES: usize = 15;

/// Metadata suggested for a title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrichment {
    pub genres: Vec<String>,
    pub description: String,
    /// None when the model did not know a positive total
    pub total_episodes_or_chapters: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    #[serde(rename = "type")]
    pub category: MediaCategory,
    pub reason: String,
    pub genres: Vec<String>,
}

#[async_trait]
pub trait MetadataEnricher: Send + Sync {
    async fn enrich(&self, title: &str, category: MediaCategory) -> Option<Enrichment>;

    /// Up to three titles the user is likely to enjoy, based on their favourites
    async fn recommend(&self, records: &[MediaRecord]) -> Vec<Recommendation>;
}

/// Shape the model is asked to produce for `enrich`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnrichmentPayload {
    genres: Vec<String>,
    description: String,
    total_episodes_or_chapters: f64,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: Option<String>,
    http_client: Client,
}

impl GeminiClient {
    /// Create a client; without an API key every call returns nothing
    pub fn new(api_key: Option<String>, model: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: model.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            http_client,
        })
    }

    /// Point the client at another host (used by tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn enrichment_schema() -> serde_json::Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "genres": { "type": "ARRAY", "items": { "type": "STRING" } },
                "description": { "type": "STRING" },
                "totalEpisodesOrChapters": { "type": "NUMBER" }
            },
            "required": ["genres", "description", "totalEpisodesOrChapters"]
        })
    }

    fn recommendation_schema() -> serde_json::Value {
        json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "title": { "type": "STRING" },
                    "type": { "type": "STRING", "enum": ["Anime", "Manga"] },
                    "reason": { "type": "STRING" },
                    "genres": { "type": "ARRAY", "items": { "type": "STRING" } }
                },
                "required": ["title", "type", "reason", "genres"]
            }
        })
    }

    /// Run one prompt and decode the JSON text the model returns
    async fn generate<T>(&self, prompt: &str, schema: serde_json::Value) -> AppResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Other("Gemini API key is not configured".to_string()))?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema
            }
        });

        let response = self
            .http_client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Other(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Other(format!(
                "Gemini returned status: {}",
                response.status()
            )));
        }

        let generated: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::Other(format!("Failed to parse Gemini response: {}", e)))?;

        let text = generated
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AppError::Other("Gemini returned no text".to_string()))?;

        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl MetadataEnricher for GeminiClient {
    async fn enrich(&self, title: &str, category: MediaCategory) -> Option<Enrichment> {
        if !self.is_configured() {
            debug!("No Gemini API key, skipping enrichment of '{}'", title);
            return None;
        }

        let prompt = format!("Give detailed information about the {} titled \"{}\".", category, title);

        match self
            .generate::<EnrichmentPayload>(&prompt, Self::enrichment_schema())
            .await
        {
            Ok(payload) => {
                debug!("Enrichment for '{}' returned {} genres", title, payload.genres.len());
                Some(Enrichment {
                    genres: payload.genres,
                    description: payload.description,
                    total_episodes_or_chapters: positive_count(payload.total_episodes_or_chapters),
                })
            }
            Err(e) => {
                error!("Gemini enrichment error: {}", e);
                None
            }
        }
    }

    async fn recommend(&self, records: &[MediaRecord]) -> Vec<Recommendation> {
        if !self.is_configured() || records.is_empty() {
            return Vec::new();
        }

        let prompt = format!(
            "Based on this user's favourites: [{}], recommend 3 anime or manga they might enjoy. \
             Make sure none of the titles are already in that list.",
            favourites_summary(records)
        );

        match self
            .generate::<Vec<Recommendation>>(&prompt, Self::recommendation_schema())
            .await
        {
            Ok(recommendations) => recommendations,
            Err(e) => {
                error!("Gemini recommendation error: {}", e);
                Vec::new()
            }
        }
    }
}

/// "Title (Category)" for the first favourites, comma separated
pub fn favourites_summary(records: &[MediaRecord]) -> String {
    records
        .iter()
        .filter(|r| r.rating >= FAVOURITE_MIN_RATING)
        .take(MAX_FAVOURITES)
        .map(|r| format!("{} ({})", r.title, r.category))
        .collect::<Vec<_>>()
        .join(", ")
}

fn positive_count(value: f64) -> Option<u32> {
    if value.is_finite() && value >= 1.0 {
        Some(value.round().min(u32::MAX as f64) as u32)
    } else {
        None
    }
}
