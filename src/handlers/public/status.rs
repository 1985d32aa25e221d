// handlers/public/status.rs - GET /health and GET /api/v1/status

use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::api::Status;
use crate::state::AppState;

/// GET /health - liveness probe
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": Status::Healthy,
        "timestamp": chrono::Utc::now(),
    }))
}

/// GET /api/v1/status - service status with the current in-flight count
pub async fn api_status(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": Status::Healthy,
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now(),
        "in_flight_operations": state.operations.in_flight(),
    }))
}
