// src/routes/mod.rs
pub mod chat;
pub mod notifications;

use crate::{error::AppError, state::SharedState};
use axum::{
    Router,
    extract::FromRequestParts,
    http::request::Parts,
    routing::{get, post, put},
};
use chat::{
    config_handler, create_session_handler, end_session_handler, get_metrics_handler,
    get_session_handler, history_handler, list_sessions_handler, send_message_handler,
};
use tower_http::trace::TraceLayer;

pub fn create_router() -> Router<SharedState> {
    let chat_routes = Router::new()
        .route(
            "/sessions",
            post(create_session_handler).get(list_sessions_handler),
        )
        .route("/sessions/{id}", get(get_session_handler))
        .route("/sessions/{id}/messages", post(send_message_handler))
        .route("/sessions/{id}/history", get(history_handler))
        .route("/sessions/{id}/end", post(end_session_handler))
        .route("/config", get(config_handler));

    let notification_routes = Router::new()
        .route("/", get(notifications::list_handler))
        .route("/unread-count", get(notifications::unread_count_handler))
        .route("/read-all", put(notifications::mark_all_read_handler))
        .route("/{id}/read", put(notifications::mark_read_handler));

    Router::new()
        .nest("/chat", chat_routes)
        .nest("/notifications", notification_routes)
        .route("/admin/metrics", get(get_metrics_handler))
        .route("/health", get(|| async { "OK" }))
        .layer(TraceLayer::new_for_http())
}

/// Extractor guarding admin routes with the `x-admin-key` header.
pub struct Admin;

impl FromRequestParts<SharedState> for Admin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        match parts.headers.get("x-admin-key") {
            Some(val) if val.as_bytes() == state.admin_key.as_bytes() => Ok(Admin),
            _ => Err(AppError::Unauthorized),
        }
    }
}
