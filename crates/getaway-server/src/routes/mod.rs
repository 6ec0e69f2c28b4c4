pub mod generate;
pub mod health;
pub mod logo;

use axum::Json;
use axum::http::{Method, StatusCode, Uri};
use axum::response::IntoResponse;
use serde::Serialize;

#[derive(Serialize)]
struct NotFoundBody {
    error: &'static str,
    path: String,
    method: String,
    timestamp: String,
}

/// Fallback for unmatched routes.
pub async fn not_found(method: Method, uri: Uri) -> impl IntoResponse {
    tracing::info!(method = %method, path = %uri.path(), "route not found");
    let body = NotFoundBody {
        error: "Route not found",
        path: uri.path().to_string(),
        method: method.to_string(),
        timestamp: jiff::Timestamp::now().to_string(),
    };
    (StatusCode::NOT_FOUND, Json(body))
}
