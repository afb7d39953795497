// src/services/responder.rs
//! Reply strategies used by the in-process session store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::fallback::{self, ResponseKind};
use super::metrics_manager::MetricsManager;
use crate::error::ChatError;
use crate::message::SessionId;

#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, session_id: SessionId, content: &str) -> Result<String, ChatError>;
}

/// Network-free answers from the static knowledge table.
#[derive(Debug, Clone, Default)]
pub struct FallbackResponder {
    metrics: MetricsManager,
}

impl FallbackResponder {
    pub fn new(metrics: MetricsManager) -> Self {
        Self { metrics }
    }
}

#[async_trait]
impl Responder for FallbackResponder {
    async fn respond(&self, session_id: SessionId, content: &str) -> Result<String, ChatError> {
        let (kind, text) = fallback::answer(content);
        tracing::debug!(session_id, kind = kind.label(), "fallback reply");

        let condition = match kind {
            ResponseKind::Knowledge(key) => Some(key),
            _ => None,
        };
        self.metrics.record(kind.label(), condition).await;
        Ok(text)
    }
}

#[derive(Serialize)]
struct UpstreamRequest<'a> {
    message: &'a str,
    session_id: String,
    context: &'static str,
    include_disclaimer: bool,
}

#[derive(Deserialize)]
struct UpstreamResponse {
    response: Option<String>,
}

/// Forwards each message to an external chatbot API.
#[derive(Debug, Clone)]
pub struct UpstreamResponder {
    client: Client,
    url: String,
    api_key: Option<String>,
    metrics: MetricsManager,
}

impl UpstreamResponder {
    pub fn new(
        url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
        metrics: MetricsManager,
    ) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::Unreachable(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
            api_key,
            metrics,
        })
    }
}

#[async_trait]
impl Responder for UpstreamResponder {
    async fn respond(&self, session_id: SessionId, content: &str) -> Result<String, ChatError> {
        let body = UpstreamRequest {
            message: content,
            session_id: session_id.to_string(),
            context: "medical",
            include_disclaimer: true,
        };

        let request_id = Uuid::new_v4().to_string();
        let mut req = self
            .client
            .post(&self.url)
            .header("x-request-id", &request_id)
            .json(&body);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(%status, request_id = %request_id, "upstream chatbot rejected request");
            return Err(ChatError::Upstream(format!("upstream returned {status}")));
        }

        let text = resp
            .json::<UpstreamResponse>()
            .await?
            .response
            .filter(|r| !r.trim().is_empty())
            .ok_or_else(|| ChatError::Upstream("upstream reply had no response".to_string()))?;

        self.metrics.record("upstream", None).await;

        // Every reply carries the disclaimer, whoever wrote it.
        Ok(fallback::ensure_disclaimer(text))
    }
}

/// Sends health questions to the knowledge table and everything else to
/// the external chatbot.
pub struct HybridResponder {
    local: Arc<dyn Responder>,
    remote: Arc<dyn Responder>,
}

impl HybridResponder {
    pub fn new(local: Arc<dyn Responder>, remote: Arc<dyn Responder>) -> Self {
        Self { local, remote }
    }
}

#[async_trait]
impl Responder for HybridResponder {
    async fn respond(&self, session_id: SessionId, content: &str) -> Result<String, ChatError> {
        let medical = fallback::is_medical_query(content);
        tracing::debug!(session_id, medical, "routing reply");

        let text = if medical {
            self.local.respond(session_id, content).await?
        } else {
            self.remote.respond(session_id, content).await?
        };
        Ok(fallback::ensure_disclaimer(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fallback_counts_knowledge_hits() {
        let metrics = MetricsManager::new();
        let responder = FallbackResponder::new(metrics.clone());

        let text = responder.respond(1, "I have a headache").await.unwrap();
        assert!(text.contains("Headache"));

        let data = metrics.get_metrics().await;
        assert_eq!(data.response_kinds.get("knowledge"), Some(&1));
        assert_eq!(data.conditions.get("headache"), Some(&1));
    }

    struct Canned(&'static str);

    #[async_trait]
    impl Responder for Canned {
        async fn respond(&self, _: SessionId, _: &str) -> Result<String, ChatError> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn hybrid_routes_by_medical_keywords() {
        let hybrid = HybridResponder::new(
            Arc::new(FallbackResponder::default()),
            Arc::new(Canned("Our office opens at nine.")),
        );

        let medical = hybrid.respond(1, "I have a fever and a cough").await.unwrap();
        assert!(medical.contains("Here's information about"));

        let other = hybrid.respond(1, "When are you open?").await.unwrap();
        assert!(other.starts_with("Our office opens at nine."));
        assert!(fallback::has_disclaimer(&other));
    }
}
