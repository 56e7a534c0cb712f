// src/application/error_handling.rs
//
// Maps internal errors to user-facing responses
//
// - Consistent error format for any presentation layer
// - Never exposes internal implementation details
// - Logs the full error for debugging

use log::error;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Standard error response for the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error_type: ErrorType,
    pub message: String,
    pub details: Option<String>,
}

/// Error categories for the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    NotFound,

    /// Invalid input, rejected before or by the remote store
    Validation,

    /// Domain rule violation, e.g. progress already at its total
    DomainError,

    Database,

    FileSystem,

    Internal,
}

impl ErrorResponse {
    pub fn from_app_error(err: &AppError) -> Self {
        match err {
            AppError::NotFound => Self::new(ErrorType::NotFound, "Record not found", None),

            AppError::Validation(message) => {
                Self::new(ErrorType::Validation, "Invalid input", Some(message.clone()))
            }

            AppError::Domain(domain_error) => Self::new(
                ErrorType::DomainError,
                "Action not allowed",
                Some(domain_error.to_string()),
            ),

            AppError::Database(_) | AppError::Pool(_) => {
                error!("Database error: {:?}", err);
                Self::new(
                    ErrorType::Database,
                    "Database operation failed",
                    Some("Check logs for details".to_string()),
                )
            }

            AppError::Io(io_error) => {
                error!("IO error: {:?}", io_error);
                Self::new(
                    ErrorType::FileSystem,
                    "File system operation failed",
                    Some(io_error.to_string()),
                )
            }

            AppError::Serialization(_) | AppError::Other(_) => {
                error!("Internal error: {:?}", err);
                Self::new(ErrorType::Internal, &err.to_string(), None)
            }
        }
    }

    fn new(error_type: ErrorType, message: &str, details: Option<String>) -> Self {
        Self {
            error_type,
            message: message.to_string(),
            details,
        }
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{}: {}", self.message, details),
            None => write!(f, "{}", self.message),
        }
    }
}
