use axum::{
    extract::State,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use crate::error::{ApiError, AppJson};

use super::{
    page,
    state::{RobotState, SensorUpdate, TelemetryState},
};

#[derive(Debug, Deserialize)]
pub struct ControlRequest {
    pub state: bool,
}

#[derive(Debug, Serialize)]
pub struct ControlResponse {
    pub success: bool,
    pub power: bool,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

pub fn telemetry_routes() -> Router<TelemetryState> {
    Router::new()
        .route("/", get(index))
        .route("/control", post(control))
        .route("/send-data", post(send_data))
        .route("/get-data", get(get_data))
}

pub async fn index(State(state): State<TelemetryState>) -> Html<String> {
    Html(page::render(&state.snapshot().await))
}

#[instrument(skip(state, payload))]
pub async fn control(
    State(state): State<TelemetryState>,
    AppJson(payload): AppJson<ControlRequest>,
) -> Result<Json<ControlResponse>, ApiError> {
    let power = state.set_power(payload.state).await;
    info!(power, "power switched");
    Ok(Json(ControlResponse {
        success: true,
        power,
    }))
}

#[instrument(skip(state, payload))]
pub async fn send_data(
    State(state): State<TelemetryState>,
    AppJson(payload): AppJson<Map<String, Value>>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let update = SensorUpdate::from(payload);
    debug!(?update, "sensor reading");
    state.ingest(update).await;
    Ok(Json(SuccessResponse { success: true }))
}

pub async fn get_data(State(state): State<TelemetryState>) -> Json<RobotState> {
    Json(state.snapshot().await)
}
