use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, header};
use axum::response::{IntoResponse, Response};

use getaway_core::models::trip::TripRecord;

use crate::error::ApiError;
use crate::state::AppState;

/// Render the itinerary for the posted trip and return it as a PDF download.
pub async fn generate_pdf(
    State(state): State<AppState>,
    payload: Result<Json<TripRecord>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(trip) = payload?;
    let generator = state.generator.clone();
    let unix_millis = jiff::Timestamp::now().as_millisecond();

    let pdf = tokio::task::spawn_blocking(move || generator.generate(&trip, unix_millis)).await??;

    tracing::info!(
        filename = %pdf.filename,
        size = pdf.bytes.len(),
        merged = pdf.merged(),
        "PDF generated"
    );

    // Non-ASCII customer names are passed through as raw header bytes.
    let disposition =
        HeaderValue::from_bytes(format!("attachment; filename=\"{}\"", pdf.filename).as_bytes())
            .map_err(|e| ApiError::Internal(e.to_string()))?;
    let headers = [
        (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
        (header::CONTENT_DISPOSITION, disposition),
    ];

    Ok((headers, pdf.bytes).into_response())
}
