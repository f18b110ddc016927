//! Typed error handling for blogflow
//!
//! The listing pipeline itself cannot fail; every error here originates at
//! a boundary collaborator (persistence, auth, request validation,
//! configuration).
//!
//! # Error Categories
//!
//! - [`EntityError`]: lookups and mutations against missing or duplicate ids
//! - [`ValidationError`]: request payload validation
//! - [`StorageError`]: persisted collection and backend failures
//! - [`AuthError`]: credential checks and role requirements
//! - [`ConfigError`]: configuration parsing and validation
//!
//! # Example
//!
//! ```rust,ignore
//! match service.update("42", patch).await {
//!     Ok(post) => println!("updated {}", post.id),
//!     Err(BlogError::Entity(EntityError::NotFound { id, .. })) => {
//!         println!("post {} not found", id);
//!     }
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Result alias used across the library
pub type Result<T, E = BlogError> = std::result::Result<T, E>;

/// The main error type for blogflow
#[derive(Debug, Error)]
pub enum BlogError {
    /// Entity-related errors (lookups, mutations)
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// Validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Storage backend errors
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Authentication and authorization errors
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Internal errors (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl BlogError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            BlogError::Entity(e) => e.status_code(),
            BlogError::Validation(_) => StatusCode::BAD_REQUEST,
            BlogError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BlogError::Auth(e) => e.status_code(),
            BlogError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BlogError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            BlogError::Entity(e) => e.error_code(),
            BlogError::Validation(_) => "VALIDATION_ERROR",
            BlogError::Storage(StorageError::Corrupt { .. }) => "STORAGE_CORRUPT",
            BlogError::Storage(_) => "STORAGE_ERROR",
            BlogError::Auth(e) => e.error_code(),
            BlogError::Config(_) => "CONFIG_ERROR",
            BlogError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    /// Get additional details for the error
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            BlogError::Entity(EntityError::NotFound { entity_type, id })
            | BlogError::Entity(EntityError::AlreadyExists { entity_type, id }) => {
                Some(serde_json::json!({
                    "entity_type": entity_type,
                    "id": id,
                }))
            }
            BlogError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }

    /// Shorthand for a not-found entity error
    pub fn not_found(entity_type: &str, id: &str) -> Self {
        BlogError::Entity(EntityError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        })
    }
}

impl IntoResponse for BlogError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Entity Errors
// =============================================================================

/// Errors related to entity operations
#[derive(Debug, Error)]
pub enum EntityError {
    /// Entity was not found
    #[error("{entity_type} not found: {id}")]
    NotFound { entity_type: String, id: String },

    /// Entity with this id already exists
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists { entity_type: String, id: String },
}

impl EntityError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            EntityError::NotFound { .. } => StatusCode::NOT_FOUND,
            EntityError::AlreadyExists { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            EntityError::NotFound { .. } => "ENTITY_NOT_FOUND",
            EntityError::AlreadyExists { .. } => "ENTITY_ALREADY_EXISTS",
        }
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors related to input validation
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A single field failed validation
    #[error("Validation failed for '{field}': {message}")]
    FieldError { field: String, message: String },

    /// Several fields failed validation
    #[error("Validation failed for {} field(s)", .0.len())]
    FieldErrors(BTreeMap<String, Vec<String>>),
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();
        ValidationError::FieldErrors(fields)
    }
}

impl From<validator::ValidationErrors> for BlogError {
    fn from(errors: validator::ValidationErrors) -> Self {
        BlogError::Validation(errors.into())
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors related to storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    /// The persisted collection could not be decoded
    #[error("Stored collection under '{key}' is malformed: {message}")]
    Corrupt { key: String, message: String },

    /// The backend failed (lock poisoned, write rejected, ...)
    #[error("Storage backend error: {0}")]
    Backend(String),
}

// =============================================================================
// Auth Errors
// =============================================================================

/// Errors related to authentication and authorization
#[derive(Debug, Error)]
pub enum AuthError {
    /// E-mail / password pair did not match any account
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The request carries no valid session
    #[error("Authentication required")]
    Unauthenticated,

    /// The session's user lacks the required role
    #[error("Insufficient permissions: requires {required}")]
    Forbidden { required: String },

    /// Registration collided with an existing username or e-mail
    #[error("Username or email already registered")]
    Duplicate,
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials | AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AuthError::Duplicate => StatusCode::CONFLICT,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::Unauthenticated => "UNAUTHORIZED",
            AuthError::Forbidden { .. } => "FORBIDDEN",
            AuthError::Duplicate => "ALREADY_REGISTERED",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the configuration
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A value is out of its allowed range
    #[error("Invalid config value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<serde_json::Error> for BlogError {
    fn from(err: serde_json::Error) -> Self {
        BlogError::Internal(format!("JSON error: {}", err))
    }
}
