// src/integrations/remote/client.rs
//
// Remote record store over HTTP
//
// ARCHITECTURE:
// - One resource path; the HTTP method selects the operation
// - Every call is a single stateless round-trip: no retry, no batching
// - Failure detail is reduced to two classes the gateway can act on

use async_trait::async_trait;
use log::debug;
use reqwest::{header, Client, Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::domain::MediaRecord;
use crate::error::{AppError, AppResult};

#[cfg(test)]
use mockall::automock;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    /// Transport failure, non-success status, or an unusable payload
    #[error("remote store unavailable: {0}")]
    Unavailable(String),

    /// The request itself was refused as invalid (400/422)
    #[error("remote store rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// All records, newest modification first
    async fn list(&self) -> Result<Vec<MediaRecord>, RemoteError>;
    async fn create(&self, record: &MediaRecord) -> Result<(), RemoteError>;
    async fn update(&self, record: &MediaRecord) -> Result<(), RemoteError>;
    async fn delete(&self, id: &str) -> Result<(), RemoteError>;
}

/// Error body returned by the endpoint for refused requests
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

pub struct HttpRemoteStore {
    endpoint: String,
    http_client: Client,
}

impl HttpRemoteStore {
    /// Create a client for the items endpoint, e.g. `https://host/api/items`
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            http_client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Map a response to success or one of the two failure classes
    async fn check_status(response: Response) -> Result<Response, RemoteError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| status.to_string());

            return Err(RemoteError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Err(RemoteError::Unavailable(format!("status {}", status)))
    }

    fn transport_error(operation: &str, err: reqwest::Error) -> RemoteError {
        RemoteError::Unavailable(format!("{} request failed: {}", operation, err))
    }
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn list(&self) -> Result<Vec<MediaRecord>, RemoteError> {
        let response = self
            .http_client
            .get(&self.endpoint)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| Self::transport_error("list", e))?;

        let records: Vec<MediaRecord> = Self::check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| RemoteError::Unavailable(format!("malformed list payload: {}", e)))?;

        debug!("Remote list returned {} records", records.len());
        Ok(records)
    }

    async fn create(&self, record: &MediaRecord) -> Result<(), RemoteError> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .json(record)
            .send()
            .await
            .map_err(|e| Self::transport_error("create", e))?;

        Self::check_status(response).await?;
        debug!("Remote create accepted {}", record.id);
        Ok(())
    }

    async fn update(&self, record: &MediaRecord) -> Result<(), RemoteError> {
        let response = self
            .http_client
            .put(&self.endpoint)
            .json(record)
            .send()
            .await
            .map_err(|e| Self::transport_error("update", e))?;

        Self::check_status(response).await?;
        debug!("Remote update accepted {}", record.id);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        let response = self
            .http_client
            .delete(&self.endpoint)
            .query(&[("id", id)])
            .send()
            .await
            .map_err(|e| Self::transport_error("delete", e))?;

        Self::check_status(response).await?;
        debug!("Remote delete accepted {}", id);
        Ok(())
    }
}
