use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::error::DbErr;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use utoipa::ToSchema;

fn current_request_id() -> Option<String> {
    crate::tracing::current_request_id().map(|rid| rid.as_str().to_string())
}

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "error": "Unprocessable Entity",
    "code": "insufficient_stock",
    "message": "Insufficient stock for part 2: 25 available, 30 requested",
    "details": {"partNo": 2, "available": 25, "requested": 30},
    "request_id": "req-abc123xyz",
    "timestamp": "2025-03-01T10:30:00.000Z"
}))]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Bad Request", "Internal Server Error")
    #[schema(example = "Not Found")]
    pub error: String,
    /// Machine-readable error code
    #[schema(example = "client_not_found")]
    pub code: String,
    /// Human-readable error description
    #[schema(example = "Client 999 not found")]
    pub message: String,
    /// Structured context for the failure, when there is any
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
    /// Unique request identifier for support and debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "req-abc123xyz")]
    pub request_id: Option<String>,
    /// ISO 8601 timestamp when error occurred
    #[schema(example = "2025-03-01T10:30:00.000Z")]
    pub timestamp: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::error::DbErr),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid line {line}: {reason}")]
    InvalidLine { line: usize, reason: String },

    #[error("Client {0} not found")]
    ClientNotFound(i32),

    #[error("Part {0} not found")]
    PartNotFound(i32),

    #[error("Insufficient stock for part {part_id}: {available} available, {requested} requested")]
    InsufficientStock {
        part_id: i32,
        available: i64,
        requested: i64,
    },

    #[error("Purchase order {0} not found")]
    OrderNotFound(i32),

}

pub trait IntoDbErr {
    fn into_db_err(self) -> DbErr;
}

impl IntoDbErr for String {
    fn into_db_err(self) -> DbErr {
        DbErr::Custom(self)
    }
}

impl IntoDbErr for &str {
    fn into_db_err(self) -> DbErr {
        DbErr::Custom(self.to_string())
    }
}

impl ServiceError {
    /// Generic constructor that normalizes any supported database error input.
    pub fn db_error<E: IntoDbErr>(error: E) -> Self {
        ServiceError::DatabaseError(error.into_db_err())
    }

    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidLine { .. } => StatusCode::BAD_REQUEST,
            Self::ClientNotFound(_) | Self::PartNotFound(_) | Self::OrderNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::InsufficientStock { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code, also used as a metrics label.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DatabaseError(_) => "storage_failure",
            Self::InvalidRequest(_) => "invalid_request",
            Self::InvalidLine { .. } => "invalid_line",
            Self::ClientNotFound(_) => "client_not_found",
            Self::PartNotFound(_) => "part_not_found",
            Self::InsufficientStock { .. } => "insufficient_stock",
            Self::OrderNotFound(_) => "order_not_found",
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Internal errors return generic messages to avoid leaking implementation details.
    pub fn response_message(&self) -> String {
        match self {
            Self::DatabaseError(_) => "Database error".to_string(),
            _ => self.to_string(),
        }
    }

    /// Structured details for errors that carry more than a message.
    pub fn details(&self) -> Option<Value> {
        match self {
            Self::InvalidLine { line, reason } => Some(json!({ "line": line, "reason": reason })),
            Self::ClientNotFound(id) => Some(json!({ "clientId": id })),
            Self::PartNotFound(id) => Some(json!({ "partNo": id })),
            Self::InsufficientStock {
                part_id,
                available,
                requested,
            } => Some(json!({
                "partNo": part_id,
                "available": available,
                "requested": requested,
            })),
            Self::OrderNotFound(id) => Some(json!({ "poNo": id })),
            _ => None,
        }
    }

    /// True for failures caused by the caller's input rather than the system.
    pub fn is_rejection(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, code = self.code(), "Request failed");
        }

        let err = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            code: self.code().to_string(),
            message: self.response_message(),
            details: self.details(),
            request_id: current_request_id(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(err)).into_response()
    }
}
