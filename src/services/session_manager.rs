// src/services/session_manager.rs
use std::{collections::HashMap, fmt::Debug, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, RwLock};

use super::responder::{FallbackResponder, Responder};
use super::store::{ChatStore, IdGenerator, SequentialIds, validate_content};
use crate::error::ChatError;
use crate::message::{
    ChatMessage, ChatReply, ChatSession, ChatbotConfig, Sender, SessionId, SessionWithMessages,
};

/// One session's state, split so reading the header never waits on a reply.
///
/// `log` is held for the whole of a send, which serializes sends on the
/// session. `info` is only locked briefly to read or update the header.
#[derive(Debug)]
struct Slot {
    info: RwLock<ChatSession>,
    log: Mutex<Vec<ChatMessage>>,
}

impl Slot {
    fn new(info: ChatSession) -> Self {
        Self {
            info: RwLock::new(info),
            log: Mutex::new(Vec::new()),
        }
    }
}

/// In-process chat store.
///
/// Sends on one session run one at a time. Listing sessions and every
/// operation on other sessions proceed while a reply is being produced.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<RwLock<HashMap<SessionId, Arc<Slot>>>>,
    session_ids: Arc<dyn IdGenerator>,
    message_ids: Arc<dyn IdGenerator>,
    responder: Arc<dyn Responder>,
    config: ChatbotConfig,
}

impl Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("config", &self.config)
            .finish()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(Arc::new(FallbackResponder::default()))
    }
}

impl SessionManager {
    pub fn new(responder: Arc<dyn Responder>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            session_ids: Arc::new(SequentialIds::new()),
            message_ids: Arc::new(SequentialIds::new()),
            responder,
            config: ChatbotConfig::default(),
        }
    }

    pub fn with_id_generators(
        mut self,
        session_ids: Arc<dyn IdGenerator>,
        message_ids: Arc<dyn IdGenerator>,
    ) -> Self {
        self.session_ids = session_ids;
        self.message_ids = message_ids;
        self
    }

    pub fn with_config(mut self, config: ChatbotConfig) -> Self {
        self.config = config.or_defaults();
        self
    }

    async fn slot(&self, id: SessionId) -> Result<Arc<Slot>, ChatError> {
        let guard = self.inner.read().await;
        guard.get(&id).cloned().ok_or(ChatError::NotFound(id))
    }

    /// Number of sessions, ended ones included.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// End a session. Returns `true` only for the call that actually ended it.
    pub async fn end(&self, id: SessionId) -> Result<bool, ChatError> {
        let slot = self.slot(id).await?;
        // wait for any in-flight send so its exchange lands before the end
        let _log = slot.log.lock().await;
        let mut info = slot.info.write().await;

        if !info.is_active {
            tracing::debug!(session_id = id, "chat session already ended");
            return Ok(false);
        }
        info.is_active = false;
        info.end_time = Some(Utc::now());
        tracing::info!(session_id = id, "chat session ended");
        Ok(true)
    }
}

#[async_trait]
impl ChatStore for SessionManager {
    async fn create_session(&self) -> Result<ChatSession, ChatError> {
        let id = self.session_ids.next_id();
        let info = ChatSession::new(id, Utc::now());

        let mut guard = self.inner.write().await;
        guard.insert(id, Arc::new(Slot::new(info.clone())));
        tracing::info!(session_id = id, "chat session created");
        Ok(info)
    }

    async fn list_sessions(&self) -> Result<Vec<ChatSession>, ChatError> {
        let slots: Vec<_> = self.inner.read().await.values().cloned().collect();

        let mut sessions = Vec::with_capacity(slots.len());
        for slot in slots {
            sessions.push(slot.info.read().await.clone());
        }
        sessions.sort_by_key(|s| s.id);
        Ok(sessions)
    }

    async fn get_session(&self, id: SessionId) -> Result<SessionWithMessages, ChatError> {
        let slot = self.slot(id).await?;
        let log = slot.log.lock().await;
        let session = slot.info.read().await.clone();
        Ok(SessionWithMessages {
            session,
            messages: log.clone(),
        })
    }

    async fn send_message(&self, id: SessionId, content: &str) -> Result<ChatReply, ChatError> {
        let content = validate_content(content)?;
        let slot = self.slot(id).await?;
        let mut log = slot.log.lock().await;

        if !slot.info.read().await.is_active {
            return Err(ChatError::SessionEnded(id));
        }

        let last = log.last().map(|m| m.timestamp);
        let user_time = last.map_or_else(Utc::now, |t| Utc::now().max(t));

        // Nothing is appended unless the responder succeeds.
        let response = self.responder.respond(id, content).await?;
        let bot_time = Utc::now().max(user_time);

        log.push(ChatMessage {
            id: Some(self.message_ids.next_id()),
            content: content.to_string(),
            sender: Sender::User,
            timestamp: user_time,
        });
        log.push(ChatMessage {
            id: Some(self.message_ids.next_id()),
            content: response.clone(),
            sender: Sender::Bot,
            timestamp: bot_time,
        });
        slot.info.write().await.last_activity_time = Some(bot_time);

        tracing::debug!(session_id = id, messages = log.len(), "message exchanged");
        Ok(ChatReply {
            response,
            timestamp: bot_time,
        })
    }

    async fn get_history(&self, id: SessionId) -> Result<Vec<ChatMessage>, ChatError> {
        let slot = self.slot(id).await?;
        let log = slot.log.lock().await;
        Ok(log.clone())
    }

    async fn end_session(&self, id: SessionId) -> Result<(), ChatError> {
        self.end(id).await.map(|_| ())
    }

    async fn get_config(&self) -> Result<ChatbotConfig, ChatError> {
        Ok(self.config.clone())
    }
}
