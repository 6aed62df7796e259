//! Unified error handling for the insurance service
//!
//! This module provides a single error type covering persistence, the claim
//! store, and the downstream calls made while reconciling billing, with
//! automatic HTTP response mapping.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Main application error type
///
/// All errors in the application should be converted to this type.
/// It implements `ResponseError` for automatic HTTP response generation.
#[derive(Error, Debug)]
pub enum AppError {
    // ==================== Database Errors ====================
    #[error("Database error: {0}")]
    Database(String),

    #[error("Database pool error: {0}")]
    Pool(String),

    // ==================== Claim Store Errors ====================
    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Cache connection failed: {0}")]
    CacheConnection(String),

    // ==================== Service Resolution Errors ====================
    /// The registry answered but listed no instance for the service.
    #[error("No instance found for service '{0}'")]
    ServiceResolution(String),

    /// The registry itself could not be queried.
    #[error("Service discovery failed for {service}: {message}")]
    Discovery { service: String, message: String },

    // ==================== Downstream Call Errors ====================
    #[error("Owner {0} not found")]
    OwnerNotFound(String),

    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("Billing check at {url} failed with status {status}")]
    BillingCheckFailed { url: String, status: u16 },

    #[error("Billing service rejected request to {url} with status {status}")]
    BillingRejected { url: String, status: u16 },

    // ==================== Validation Errors ====================
    #[error("Validation error: {0}")]
    Validation(String),

    // ==================== Resource Errors ====================
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    // ==================== Internal Errors ====================
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl AppError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::Validation(_) => StatusCode::BAD_REQUEST,

            // 404 Not Found
            AppError::NotFound(_) | AppError::OwnerNotFound(_) => StatusCode::NOT_FOUND,

            // 409 Conflict
            AppError::Conflict(_) | AppError::AlreadyExists(_) => StatusCode::CONFLICT,

            // 502 Bad Gateway
            AppError::Transport { .. }
            | AppError::BillingCheckFailed { .. }
            | AppError::BillingRejected { .. } => StatusCode::BAD_GATEWAY,

            // 503 Service Unavailable
            AppError::ServiceResolution(_) | AppError::Discovery { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }

            // 500 Internal Server Error
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "database_error",
            AppError::Pool(_) => "pool_error",
            AppError::Cache(_) => "cache_error",
            AppError::CacheConnection(_) => "cache_connection_error",
            AppError::ServiceResolution(_) => "service_resolution_error",
            AppError::Discovery { .. } => "discovery_error",
            AppError::OwnerNotFound(_) => "owner_not_found",
            AppError::Transport { .. } => "transport_error",
            AppError::BillingCheckFailed { .. } => "billing_check_failed",
            AppError::BillingRejected { .. } => "billing_rejected",
            AppError::Validation(_) => "validation_error",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::AlreadyExists(_) => "already_exists",
            AppError::Internal(_) => "internal_error",
            AppError::Config(_) => "config_error",
            AppError::Serialization(_) => "serialization_error",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        AppError::status_code(self)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = json!({
            "error": self.error_code(),
            "message": self.to_string(),
            "status": status.as_u16(),
        });

        HttpResponse::build(status).json(body)
    }
}

// ==================== From implementations ====================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}
