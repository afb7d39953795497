// src/services/store.rs
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::error::ChatError;
use crate::message::{ChatMessage, ChatReply, ChatSession, ChatbotConfig, SessionId, SessionWithMessages};

/// Session store contract shared by the in-process manager and the HTTP client.
#[async_trait]
pub trait ChatStore: Send + Sync {
    async fn create_session(&self) -> Result<ChatSession, ChatError>;

    async fn list_sessions(&self) -> Result<Vec<ChatSession>, ChatError>;

    async fn get_session(&self, id: SessionId) -> Result<SessionWithMessages, ChatError>;

    /// Append a USER message and its BOT reply, in that order.
    async fn send_message(&self, id: SessionId, content: &str) -> Result<ChatReply, ChatError>;

    async fn get_history(&self, id: SessionId) -> Result<Vec<ChatMessage>, ChatError>;

    /// Ending an already ended session succeeds without changing it.
    async fn end_session(&self, id: SessionId) -> Result<(), ChatError>;

    async fn get_config(&self) -> Result<ChatbotConfig, ChatError>;
}

/// Source of fresh identifiers, owned by a single store.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> u64;
}

/// Monotonic counter starting at 1.
#[derive(Debug)]
pub struct SequentialIds(AtomicU64);

impl SequentialIds {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self(AtomicU64::new(first))
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> u64 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

/// Reject blank content before it reaches any store or network.
pub fn validate_content(content: &str) -> Result<&str, ChatError> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(ChatError::Validation("Message cannot be empty".to_string()));
    }
    Ok(trimmed)
}
