use axum::{extract::State, routing::get, Json, Router};
use tracing::{debug, info, instrument};

use crate::{
    auth::dto::MessageResponse,
    detections::{dto::CreateDetectionRequest, repo::DetectionLog},
    error::{ApiError, AppJson},
    state::AppState,
};

pub fn detection_routes() -> Router<AppState> {
    Router::new().route("/detections", get(list_detections).post(create_detection))
}

#[instrument(skip(state, payload))]
pub async fn create_detection(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateDetectionRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let row = DetectionLog::create(
        &state.db,
        payload.user_id,
        &payload.object_type,
        &payload.image_url,
    )
    .await?;

    info!(
        detection_id = row.id,
        user_id = ?payload.user_id,
        object_type = %row.object_type,
        "detection logged"
    );
    Ok(Json(MessageResponse {
        message: "Detection logged",
    }))
}

#[instrument(skip(state))]
pub async fn list_detections(
    State(state): State<AppState>,
) -> Result<Json<Vec<DetectionLog>>, ApiError> {
    let rows = DetectionLog::list_all(&state.db).await?;
    debug!(count = rows.len(), "detections listed");
    Ok(Json(rows))
}
