// src/services/metrics_manager.rs
use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

/// Reply counters exposed on `/admin/metrics`.
#[derive(Debug, Default, Clone, Serialize)]
pub struct MetricsData {
    pub total_replies: u64,
    /// By source: knowledge, symptoms, treatment, prevention, default, upstream.
    pub response_kinds: HashMap<String, u64>,
    /// Knowledge-base hits by condition keyword.
    pub conditions: HashMap<String, u64>,
}

#[derive(Debug, Clone, Default)]
pub struct MetricsManager {
    inner: Arc<RwLock<MetricsData>>,
}

impl MetricsManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one reply of `kind`, and the knowledge entry it came from, if any.
    pub async fn record(&self, kind: &str, condition: Option<&str>) {
        let mut data = self.inner.write().await;
        data.total_replies += 1;
        *data.response_kinds.entry(kind.to_owned()).or_default() += 1;
        if let Some(condition) = condition {
            *data.conditions.entry(condition.to_owned()).or_default() += 1;
        }
    }

    pub async fn get_metrics(&self) -> MetricsData {
        self.inner.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn conditions_only_counted_when_present() {
        let metrics = MetricsManager::new();
        metrics.record("knowledge", Some("flu")).await;
        metrics.record("default", None).await;

        let data = metrics.get_metrics().await;
        assert_eq!(data.total_replies, 2);
        assert_eq!(data.response_kinds.len(), 2);
        assert_eq!(data.conditions.get("flu"), Some(&1));
        assert_eq!(data.conditions.len(), 1);
    }
}
