//! Structured API error responses with error codes
//!
//! One error shape shared by every endpoint, with machine-readable codes and
//! human-readable messages.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::infra::StoreError;

// ============================================================================
// Error Codes
// ============================================================================

/// Error codes for API responses
///
/// These codes are stable and can be used by clients for programmatic error
/// handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (1xxx)
    /// Required query or path parameter is missing
    MissingRequiredParam,
    /// Parameter value is invalid
    InvalidParam,

    // Resource errors (2xxx)
    /// Fault record not found
    RecordNotFound,
    /// VIN has no NFT link
    VinNotFound,
    /// Requested resource not found
    ResourceNotFound,

    // Infrastructure errors (3xxx)
    /// Upstream store query failed
    StoreError,
    /// Internal server error
    InternalError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn numeric_code(&self) -> u32 {
        match self {
            ErrorCode::MissingRequiredParam => 1001,
            ErrorCode::InvalidParam => 1002,
            ErrorCode::RecordNotFound => 2001,
            ErrorCode::VinNotFound => 2002,
            ErrorCode::ResourceNotFound => 2003,
            ErrorCode::StoreError => 3001,
            ErrorCode::InternalError => 3999,
        }
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        match self {
            ErrorCode::MissingRequiredParam => StatusCode::BAD_REQUEST,
            ErrorCode::InvalidParam => StatusCode::BAD_REQUEST,
            ErrorCode::RecordNotFound => StatusCode::NOT_FOUND,
            ErrorCode::VinNotFound => StatusCode::NOT_FOUND,
            ErrorCode::ResourceNotFound => StatusCode::NOT_FOUND,
            ErrorCode::StoreError => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code_str = match self {
            ErrorCode::MissingRequiredParam => "MISSING_REQUIRED_PARAM",
            ErrorCode::InvalidParam => "INVALID_PARAM",
            ErrorCode::RecordNotFound => "RECORD_NOT_FOUND",
            ErrorCode::VinNotFound => "VIN_NOT_FOUND",
            ErrorCode::ResourceNotFound => "RESOURCE_NOT_FOUND",
            ErrorCode::StoreError => "STORE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", code_str)
    }
}

// ============================================================================
// Structured Error Response
// ============================================================================

/// Structured error response for API endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error details
    pub error: ErrorDetails,
}

/// Detailed error information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Numeric error code for easy categorization
    pub numeric_code: u32,

    /// Human-readable error message
    pub message: String,

    /// Related resource ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
}

impl ApiError {
    /// Create a new API error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetails {
                code,
                numeric_code: code.numeric_code(),
                message: message.into(),
                resource_id: None,
            },
        }
    }

    /// Set related resource ID
    pub fn with_resource_id(mut self, id: impl Into<String>) -> Self {
        self.error.resource_id = Some(id.into());
        self
    }

    /// Get the HTTP status code
    pub fn status(&self) -> StatusCode {
        self.error.code.http_status()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code_str = self.error.code.to_string();
        let mut response = (status, Json(self)).into_response();

        // Error code header for easier debugging
        if let Ok(code_value) = axum::http::HeaderValue::from_str(&code_str) {
            response.headers_mut().insert(
                axum::http::HeaderName::from_static("x-error-code"),
                code_value,
            );
        }

        response
    }
}

// ============================================================================
// Conversion from StoreError
// ============================================================================

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Http(e) => {
                ApiError::new(ErrorCode::StoreError, format!("Store request failed: {}", e))
            }
            StoreError::Status { status, .. } => ApiError::new(
                ErrorCode::StoreError,
                format!("Store returned status {}", status),
            ),
            StoreError::Decode(msg) => {
                ApiError::new(ErrorCode::StoreError, format!("Invalid row data: {}", msg))
            }
            StoreError::RecordNotFound(id) => {
                ApiError::new(ErrorCode::RecordNotFound, format!("Record not found: {}", id))
                    .with_resource_id(id)
            }
            StoreError::VinNotFound(vin) => {
                ApiError::new(ErrorCode::VinNotFound, format!("VIN not found: {}", vin))
                    .with_resource_id(vin)
            }
            StoreError::Configuration(msg) => {
                ApiError::new(ErrorCode::InternalError, format!("Configuration error: {}", msg))
            }
            StoreError::Internal(msg) => ApiError::new(ErrorCode::InternalError, msg),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Create a not found error for a specific resource type
pub fn not_found(resource_type: &str, id: impl std::fmt::Display) -> ApiError {
    ApiError::new(
        ErrorCode::ResourceNotFound,
        format!("{} not found: {}", resource_type, id),
    )
    .with_resource_id(id.to_string())
}

/// Create a validation error for a parameter
pub fn invalid_param(param: &str, message: impl Into<String>) -> ApiError {
    ApiError::new(
        ErrorCode::InvalidParam,
        format!("{}: {}", param, message.into()),
    )
}

/// Create a missing-parameter error
pub fn missing_param(param: &str) -> ApiError {
    ApiError::new(
        ErrorCode::MissingRequiredParam,
        format!("Missing required parameter: {}", param),
    )
}

// ============================================================================
// Tests
// ============================================================================
