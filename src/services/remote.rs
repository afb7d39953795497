// src/services/remote.rs
//! `ChatStore` backed by the REST chat endpoints of a remote server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use super::store::{ChatStore, validate_content};
use crate::error::ChatError;
use crate::message::{
    Acknowledgement, ChatMessage, ChatReply, ChatSession, ChatbotConfig, SendMessageRequest,
    SessionId, SessionWithMessages,
};

#[derive(Debug, Clone)]
pub struct HttpChatClient {
    client: Client,
    base_url: String,
}

impl HttpChatClient {
    /// `base_url` is the server root, e.g. `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::Unreachable(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/chat{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(
        resp: Response,
        session: Option<SessionId>,
    ) -> Result<T, ChatError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp.json::<T>().await?);
        }

        let detail = resp
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned))
            .unwrap_or_else(|| status.to_string());

        tracing::debug!(%status, detail = %detail, "chat backend returned an error");
        Err(match session {
            Some(id) if status == StatusCode::NOT_FOUND => ChatError::NotFound(id),
            Some(id) if status == StatusCode::CONFLICT => ChatError::SessionEnded(id),
            _ if status == StatusCode::BAD_REQUEST => ChatError::Validation(detail),
            _ if status == StatusCode::SERVICE_UNAVAILABLE
                || status == StatusCode::GATEWAY_TIMEOUT =>
            {
                ChatError::Unreachable(detail)
            }
            _ => ChatError::Upstream(detail),
        })
    }
}

#[async_trait]
impl ChatStore for HttpChatClient {
    async fn create_session(&self) -> Result<ChatSession, ChatError> {
        let resp = self.client.post(self.url("/sessions")).send().await?;
        Self::decode(resp, None).await
    }

    async fn list_sessions(&self) -> Result<Vec<ChatSession>, ChatError> {
        let resp = self.client.get(self.url("/sessions")).send().await?;
        Self::decode(resp, None).await
    }

    async fn get_session(&self, id: SessionId) -> Result<SessionWithMessages, ChatError> {
        let resp = self
            .client
            .get(self.url(&format!("/sessions/{id}")))
            .send()
            .await?;
        Self::decode(resp, Some(id)).await
    }

    async fn send_message(&self, id: SessionId, content: &str) -> Result<ChatReply, ChatError> {
        let content = validate_content(content)?;
        let resp = self
            .client
            .post(self.url(&format!("/sessions/{id}/messages")))
            .json(&SendMessageRequest {
                content: content.to_string(),
            })
            .send()
            .await?;
        Self::decode(resp, Some(id)).await
    }

    async fn get_history(&self, id: SessionId) -> Result<Vec<ChatMessage>, ChatError> {
        let resp = self
            .client
            .get(self.url(&format!("/sessions/{id}/history")))
            .send()
            .await?;
        Self::decode(resp, Some(id)).await
    }

    async fn end_session(&self, id: SessionId) -> Result<(), ChatError> {
        let resp = self
            .client
            .post(self.url(&format!("/sessions/{id}/end")))
            .send()
            .await?;
        let ack: Acknowledgement = Self::decode(resp, Some(id)).await?;
        tracing::debug!(session_id = id, message = %ack.message, "session end acknowledged");
        Ok(())
    }

    async fn get_config(&self) -> Result<ChatbotConfig, ChatError> {
        let resp = self.client.get(self.url("/config")).send().await?;
        Self::decode(resp, None).await
    }
}
