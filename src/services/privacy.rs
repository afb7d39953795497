//! Persisted acceptance of the chatbot privacy notice.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const PRIVACY_ACCEPTED_KEY: &str = "chatbot_privacy_accepted";

/// A JSON key/value file holding the acceptance flag.
#[derive(Debug, Clone)]
pub struct PrivacyNotice {
    path: PathBuf,
}

impl PrivacyNotice {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> HashMap<String, serde_json::Value> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable privacy file");
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        }
    }

    /// False when the file is missing, unreadable, or holds anything but `true`.
    pub async fn is_accepted(&self) -> bool {
        self.read_all()
            .await
            .get(PRIVACY_ACCEPTED_KEY)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    pub async fn accept(&self) -> std::io::Result<()> {
        let mut values = self.read_all().await;
        values.insert(PRIVACY_ACCEPTED_KEY.to_string(), serde_json::Value::Bool(true));

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        let json = serde_json::to_string_pretty(&values)?;
        tokio::fs::write(&self.path, json).await?;
        tracing::info!(path = %self.path.display(), "privacy notice accepted");
        Ok(())
    }
}
