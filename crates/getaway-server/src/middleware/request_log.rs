use std::time::Instant;

use axum::Json;
use axum::body::Body;
use axum::extract::Request;
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value};

use crate::MAX_BODY_BYTES;

/// Request logging middleware.
///
/// Logs each request on arrival, with the top-level keys of a JSON body
/// when there is one, and again with status and timing once the response
/// is ready. Values are never logged.
pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let req = if is_json(&req) {
        let (parts, body) = req.into_parts();
        let bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(method = %method, path = %path, error = %e, "request body rejected");
                let body = serde_json::json!({ "error": "Request body too large" });
                return (StatusCode::PAYLOAD_TOO_LARGE, Json(body)).into_response();
            }
        };
        match json_body_keys(&bytes) {
            Some(keys) => tracing::info!(method = %method, path = %path, body_keys = ?keys, "request received"),
            None => tracing::info!(method = %method, path = %path, "request received"),
        }
        Request::from_parts(parts, Body::from(bytes))
    } else {
        tracing::info!(method = %method, path = %path, "request received");
        req
    };

    let response = next.run(req).await;

    tracing::info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "api_request"
    );

    response
}

/// Top-level keys of a JSON object body, sorted. `None` for anything that is
/// not a non-empty object.
pub fn json_body_keys(body: &[u8]) -> Option<Vec<String>> {
    let object: Map<String, Value> = serde_json::from_slice(body).ok()?;
    (!object.is_empty()).then(|| object.keys().cloned().collect())
}

fn is_json(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}
