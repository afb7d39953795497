use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    error::AppError,
    message::{
        Acknowledgement, ChatMessage, ChatReply, ChatSession, ChatbotConfig, SendMessageRequest,
        SessionId, SessionWithMessages,
    },
    services::{metrics_manager::MetricsData, store::ChatStore},
    state::SharedState,
};

use super::Admin;

pub async fn create_session_handler(
    State(state): State<SharedState>,
) -> Result<Json<ChatSession>, AppError> {
    Ok(Json(state.sessions.create_session().await?))
}

pub async fn list_sessions_handler(
    State(state): State<SharedState>,
) -> Result<Json<Vec<ChatSession>>, AppError> {
    Ok(Json(state.sessions.list_sessions().await?))
}

pub async fn get_session_handler(
    State(state): State<SharedState>,
    Path(id): Path<SessionId>,
) -> Result<Json<SessionWithMessages>, AppError> {
    Ok(Json(state.sessions.get_session(id).await?))
}

pub async fn send_message_handler(
    State(state): State<SharedState>,
    Path(id): Path<SessionId>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let reply = state.sessions.send_message(id, &payload.content).await?;
    Ok(Json(reply))
}

pub async fn history_handler(
    State(state): State<SharedState>,
    Path(id): Path<SessionId>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    Ok(Json(state.sessions.get_history(id).await?))
}

pub async fn end_session_handler(
    State(state): State<SharedState>,
    Path(id): Path<SessionId>,
) -> Result<Json<Acknowledgement>, AppError> {
    if state.sessions.end(id).await? {
        state
            .notifications
            .push(
                "Chat session ended",
                format!("Your chat session #{id} has ended. Its transcript stays available."),
            )
            .await;
    }
    Ok(Json(Acknowledgement {
        message: "Chat session ended successfully".to_string(),
    }))
}

pub async fn config_handler(
    State(state): State<SharedState>,
) -> Result<Json<ChatbotConfig>, AppError> {
    Ok(Json(state.sessions.get_config().await?))
}

pub async fn get_metrics_handler(
    _admin: Admin,
    State(state): State<SharedState>,
) -> Json<MetricsData> {
    Json(state.metrics.get_metrics().await)
}
