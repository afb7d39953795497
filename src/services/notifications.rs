// src/services/notifications.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use super::store::{IdGenerator, SequentialIds};

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: u64,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Inbox {
    items: Vec<Notification>,
    unread: u64,
}

/// In-memory notifications with an unread counter.
///
/// The counter only goes down when one notification flips from unread to
/// read, and only `mark_all_read` resets it to zero.
#[derive(Clone)]
pub struct NotificationInbox {
    inner: Arc<RwLock<Inbox>>,
    ids: Arc<dyn IdGenerator>,
}

impl Default for NotificationInbox {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationInbox {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inbox::default())),
            ids: Arc::new(SequentialIds::new()),
        }
    }

    pub async fn push(&self, title: impl Into<String>, message: impl Into<String>) -> Notification {
        let notification = Notification {
            id: self.ids.next_id(),
            title: title.into(),
            message: message.into(),
            is_read: false,
            created_at: Utc::now(),
        };
        let mut inbox = self.inner.write().await;
        inbox.items.push(notification.clone());
        inbox.unread += 1;
        notification
    }

    pub async fn list(&self) -> Vec<Notification> {
        self.inner.read().await.items.clone()
    }

    /// Returns the updated notification, or `None` for an unknown id.
    pub async fn mark_read(&self, id: u64) -> Option<Notification> {
        let mut inbox = self.inner.write().await;
        let item = inbox.items.iter_mut().find(|n| n.id == id)?;
        let flipped = !item.is_read;
        item.is_read = true;
        let item = item.clone();
        if flipped {
            inbox.unread = inbox.unread.saturating_sub(1);
        }
        Some(item)
    }

    pub async fn mark_all_read(&self) {
        let mut inbox = self.inner.write().await;
        inbox.items.iter_mut().for_each(|n| n.is_read = true);
        inbox.unread = 0;
    }

    pub async fn unread_count(&self) -> u64 {
        self.inner.read().await.unread
    }
}
