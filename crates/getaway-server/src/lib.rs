pub mod config;
pub mod error;
pub mod logo;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use state::AppState;

/// Request bodies (JSON and multipart) are capped at 10 MB.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check))
        .route("/api/check-logo", get(routes::logo::check_logo))
        .route("/api/upload-logo", post(routes::logo::upload_logo))
        .route("/api/generate-pdf", post(routes::generate::generate_pdf))
        .nest_service("/public", ServeDir::new(&state.config.public_dir))
        .fallback(routes::not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(axum_mw::from_fn(middleware::request_log::log_request))
        .layer(cors)
        .with_state(state)
}
