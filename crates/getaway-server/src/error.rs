use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use getaway_core::error::CoreError;
use getaway_export::error::ExportError;

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    /// Required trip fields were missing; carries their wire names.
    Validation { missing: Vec<String> },
    /// PDF generation failed; the message is returned to the caller.
    Generation(String),
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
}

#[derive(Serialize)]
struct ValidationBody {
    error: &'static str,
    missing: Vec<String>,
    received: Received,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Received {
    customer_name: bool,
    destination: bool,
}

fn now() -> Option<String> {
    Some(jiff::Timestamp::now().to_string())
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: msg,
                    timestamp: None,
                },
            ),
            ApiError::Validation { missing } => {
                tracing::info!(missing = ?missing, "validation failed");
                let received = Received {
                    customer_name: !missing.iter().any(|f| f == "customerName"),
                    destination: !missing.iter().any(|f| f == "destination"),
                };
                let body = ValidationBody {
                    error: "Customer name and destination are required",
                    missing,
                    received,
                };
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
            ApiError::Generation(msg) => {
                tracing::error!("PDF generation error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: format!("Failed to generate PDF: {msg}"),
                        timestamp: now(),
                    },
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "internal server error".to_string(),
                        timestamp: now(),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ExportError> for ApiError {
    fn from(e: ExportError) -> Self {
        match e {
            ExportError::InvalidInput(CoreError::MissingFields { fields }) => {
                ApiError::Validation { missing: fields }
            }
            other => ApiError::Generation(other.to_string()),
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(e: axum::extract::multipart::MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::BadRequest(crate::routes::logo::TOO_LARGE.to_string())
        } else {
            ApiError::BadRequest(e.body_text())
        }
    }
}

impl From<axum::extract::rejection::JsonRejection> for ApiError {
    fn from(e: axum::extract::rejection::JsonRejection) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        ApiError::Generation(format!("generation task failed: {e}"))
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        ApiError::Internal(e.to_string())
    }
}
