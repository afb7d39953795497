// src/message.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type SessionId = u64;
pub type MessageId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MessageId>,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: SessionId,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity_time: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl ChatSession {
    pub fn new(id: SessionId, start_time: DateTime<Utc>) -> Self {
        Self {
            id,
            start_time,
            end_time: None,
            last_activity_time: None,
            is_active: true,
        }
    }
}

/// `GET /chat/sessions/{id}` body: the session plus its messages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionWithMessages {
    #[serde(flatten)]
    pub session: ChatSession,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub message: String,
}

pub const DEFAULT_DISCLAIMERS: [&str; 3] = [
    "The information provided by this chatbot is for general informational purposes only and is not a substitute for professional medical advice.",
    "Always consult with a qualified healthcare provider for medical advice, diagnosis, or treatment.",
    "If you are experiencing a medical emergency, call your local emergency services immediately.",
];

pub const DEFAULT_MEDICAL_SOURCES: [&str; 4] = [
    "Mayo Clinic",
    "Centers for Disease Control and Prevention (CDC)",
    "World Health Organization (WHO)",
    "National Institutes of Health (NIH)",
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatbotConfig {
    #[serde(default)]
    pub disclaimers: Vec<String>,
    #[serde(default)]
    pub medical_sources: Vec<String>,
}

impl Default for ChatbotConfig {
    fn default() -> Self {
        Self {
            disclaimers: DEFAULT_DISCLAIMERS.iter().map(|s| s.to_string()).collect(),
            medical_sources: DEFAULT_MEDICAL_SOURCES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ChatbotConfig {
    /// Replace any empty list with the built-in defaults.
    pub fn or_defaults(self) -> Self {
        let defaults = Self::default();
        Self {
            disclaimers: if self.disclaimers.is_empty() {
                defaults.disclaimers
            } else {
                self.disclaimers
            },
            medical_sources: if self.medical_sources.is_empty() {
                defaults.medical_sources
            } else {
                self.medical_sources
            },
        }
    }
}
