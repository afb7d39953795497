use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::{error::AppError, services::notifications::Notification, state::SharedState};

pub async fn list_handler(State(state): State<SharedState>) -> Json<Vec<Notification>> {
    Json(state.notifications.list().await)
}

pub async fn unread_count_handler(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({ "count": state.notifications.unread_count().await }))
}

pub async fn mark_read_handler(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
) -> Result<Json<Notification>, AppError> {
    state
        .notifications
        .mark_read(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("notification {id} not found")))
}

pub async fn mark_all_read_handler(State(state): State<SharedState>) -> Json<Value> {
    state.notifications.mark_all_read().await;
    Json(json!({ "message": "All notifications marked as read" }))
}
