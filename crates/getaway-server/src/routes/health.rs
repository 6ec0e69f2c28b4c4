use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct ServiceInfo {
    pub message: &'static str,
    pub status: &'static str,
    pub timestamp: String,
    pub environment: String,
}

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: String,
    pub uptime: f64,
}

pub async fn root(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Travel Itinerary Generator API",
        status: "Running",
        timestamp: jiff::Timestamp::now().to_string(),
        environment: state.config.environment.clone(),
    })
}

/// Liveness probe; `uptime` is in seconds.
pub async fn health_check(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "OK",
        timestamp: jiff::Timestamp::now().to_string(),
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}
