// src/services/chat_state.rs
//! View-facing chat state.
//!
//! `ChatState` wraps a [`ChatStore`] and keeps what a chat window renders:
//! the known sessions, the open session and its messages, a loading flag,
//! the last error, and the disclaimers/sources to display.
//!
//! A failed operation records its error and clears `loading`, but leaves the
//! current session and message list exactly as they were.

use std::time::{Duration, Instant};

use chrono::Utc;

use super::fallback;
use super::store::{ChatStore, validate_content};
use crate::error::ChatError;
use crate::message::{ChatMessage, ChatSession, ChatbotConfig, Sender, SessionId};

/// How long an error stays visible before [`ChatState::clear_expired_error`] drops it.
pub const ERROR_DISPLAY_DURATION: Duration = Duration::from_secs(5);

/// Where bot replies come from. Chosen up front, never switched on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReplyStrategy {
    /// Ask the store, which owns the history.
    #[default]
    Store,
    /// Answer from the local knowledge table without touching the network.
    /// Messages are kept only in this state.
    LocalFallback,
}

#[derive(Debug)]
pub struct ChatState<S> {
    store: S,
    strategy: ReplyStrategy,
    pub sessions: Vec<ChatSession>,
    pub current_session: Option<ChatSession>,
    pub messages: Vec<ChatMessage>,
    pub loading: bool,
    pub error: Option<String>,
    error_at: Option<Instant>,
    pub disclaimers: Vec<String>,
    pub medical_sources: Vec<String>,
}

impl<S: ChatStore> ChatState<S> {
    pub fn new(store: S) -> Self {
        let defaults = ChatbotConfig::default();
        Self {
            store,
            strategy: ReplyStrategy::default(),
            sessions: Vec::new(),
            current_session: None,
            messages: Vec::new(),
            loading: false,
            error: None,
            error_at: None,
            disclaimers: defaults.disclaimers,
            medical_sources: defaults.medical_sources,
        }
    }

    pub fn with_strategy(mut self, strategy: ReplyStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn strategy(&self) -> ReplyStrategy {
        self.strategy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn begin(&mut self) {
        self.loading = true;
        self.error = None;
        self.error_at = None;
    }

    fn fail(&mut self, op: &str, e: ChatError) -> ChatError {
        tracing::warn!(op, error = %e, "chat operation failed");
        self.loading = false;
        self.error = Some(e.to_string());
        self.error_at = Some(Instant::now());
        e
    }

    /// Create a session and make it current with an empty message list.
    pub async fn create_session(&mut self) -> Result<ChatSession, ChatError> {
        self.begin();
        match self.store.create_session().await {
            Ok(session) => {
                self.loading = false;
                self.sessions.push(session.clone());
                self.current_session = Some(session.clone());
                self.messages.clear();
                Ok(session)
            }
            Err(e) => Err(self.fail("create_session", e)),
        }
    }

    pub async fn fetch_sessions(&mut self) -> Result<(), ChatError> {
        self.begin();
        match self.store.list_sessions().await {
            Ok(sessions) => {
                self.loading = false;
                self.sessions = sessions;
                Ok(())
            }
            Err(e) => Err(self.fail("fetch_sessions", e)),
        }
    }

    /// Load a session with its messages and make it current.
    pub async fn fetch_session(&mut self, id: SessionId) -> Result<(), ChatError> {
        self.begin();
        match self.store.get_session(id).await {
            Ok(found) => {
                self.loading = false;
                self.current_session = Some(found.session);
                self.messages = found.messages;
                Ok(())
            }
            Err(e) => Err(self.fail("fetch_session", e)),
        }
    }

    /// Send `content` in the current session and append both sides of the exchange.
    pub async fn send(&mut self, content: &str) -> Result<String, ChatError> {
        let content = match validate_content(content) {
            Ok(c) => c.to_string(),
            Err(e) => return Err(self.fail("send", e)),
        };
        let Some(session) = self.current_session.clone() else {
            return Err(self.fail(
                "send",
                ChatError::Validation("no chat session is open".to_string()),
            ));
        };

        self.begin();
        let user_time = match self.messages.last() {
            Some(last) => Utc::now().max(last.timestamp),
            None => Utc::now(),
        };

        let (response, bot_time) = match self.strategy {
            ReplyStrategy::Store => match self.store.send_message(session.id, &content).await {
                Ok(reply) => (reply.response, reply.timestamp.max(user_time)),
                Err(e) => return Err(self.fail("send", e)),
            },
            ReplyStrategy::LocalFallback => {
                if !session.is_active {
                    return Err(self.fail("send", ChatError::SessionEnded(session.id)));
                }
                (fallback::generate_response(&content), Utc::now().max(user_time))
            }
        };

        self.loading = false;
        self.messages.push(ChatMessage {
            id: None,
            content,
            sender: Sender::User,
            timestamp: user_time,
        });
        self.messages.push(ChatMessage {
            id: None,
            content: response.clone(),
            sender: Sender::Bot,
            timestamp: bot_time,
        });
        if let Some(current) = self.current_session.as_mut() {
            current.last_activity_time = Some(bot_time);
        }
        Ok(response)
    }

    pub async fn fetch_history(&mut self, id: SessionId) -> Result<(), ChatError> {
        self.begin();
        match self.store.get_history(id).await {
            Ok(messages) => {
                self.loading = false;
                self.messages = messages;
                Ok(())
            }
            Err(e) => Err(self.fail("fetch_history", e)),
        }
    }

    pub async fn end_session(&mut self, id: SessionId) -> Result<(), ChatError> {
        self.begin();
        if let Err(e) = self.store.end_session(id).await {
            return Err(self.fail("end_session", e));
        }

        self.loading = false;
        let now = Utc::now();
        let current = self.current_session.as_mut().filter(|s| s.id == id);
        for session in self.sessions.iter_mut().filter(|s| s.id == id).chain(current) {
            session.is_active = false;
            session.end_time.get_or_insert(now);
        }
        Ok(())
    }

    /// Fetch disclaimers and sources; defaults fill in whatever is missing.
    pub async fn load_config(&mut self) -> Result<(), ChatError> {
        self.begin();
        match self.store.get_config().await {
            Ok(config) => {
                self.loading = false;
                let config = config.or_defaults();
                self.disclaimers = config.disclaimers;
                self.medical_sources = config.medical_sources;
                Ok(())
            }
            Err(e) => {
                let defaults = ChatbotConfig::default();
                self.disclaimers = defaults.disclaimers;
                self.medical_sources = defaults.medical_sources;
                Err(self.fail("load_config", e))
            }
        }
    }

    /// Start a chat: create a session, then load the config. Also the retry path.
    pub async fn open(&mut self) -> Result<ChatSession, ChatError> {
        let session = self.create_session().await?;
        // The config falls back to defaults on its own; the session is usable either way.
        let _ = self.load_config().await;
        Ok(session)
    }

    pub fn clear_current_session(&mut self) {
        self.current_session = None;
        self.messages.clear();
    }

    pub fn clear_error(&mut self) {
        self.error = None;
        self.error_at = None;
    }

    /// Drop the error once it has been shown for [`ERROR_DISPLAY_DURATION`].
    pub fn clear_expired_error(&mut self, now: Instant) -> bool {
        match self.error_at {
            Some(at) if now.saturating_duration_since(at) >= ERROR_DISPLAY_DURATION => {
                self.clear_error();
                true
            }
            _ => false,
        }
    }
}
