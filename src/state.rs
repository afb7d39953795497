// src/state.rs
use std::sync::Arc;

use anyhow::Context;

use crate::config::{Config, ResponderKind};
use crate::services::metrics_manager::MetricsManager;
use crate::services::notifications::NotificationInbox;
use crate::services::responder::{
    FallbackResponder, HybridResponder, Responder, UpstreamResponder,
};
use crate::services::session_manager::SessionManager;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub sessions: SessionManager,
    pub metrics: MetricsManager,
    pub notifications: NotificationInbox,
    pub admin_key: String,
}

impl AppState {
    /// State backed by the local fallback responder.
    pub fn new(admin_key: impl Into<String>) -> Self {
        let metrics = MetricsManager::new();
        let responder = Arc::new(FallbackResponder::new(metrics.clone()));
        Self {
            sessions: SessionManager::new(responder),
            metrics,
            notifications: NotificationInbox::new(),
            admin_key: admin_key.into(),
        }
    }

    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let metrics = MetricsManager::new();
        let local = Arc::new(FallbackResponder::new(metrics.clone()));

        let responder: Arc<dyn Responder> = match cfg.responder {
            ResponderKind::Fallback => local,
            ResponderKind::Upstream => Arc::new(upstream(cfg, &metrics)?),
            ResponderKind::Hybrid => {
                Arc::new(HybridResponder::new(local, Arc::new(upstream(cfg, &metrics)?)))
            }
        };

        Ok(Self {
            sessions: SessionManager::new(responder).with_config(cfg.load_chatbot_config()),
            metrics,
            notifications: NotificationInbox::new(),
            admin_key: cfg.admin_key.clone(),
        })
    }
}

fn upstream(cfg: &Config, metrics: &MetricsManager) -> anyhow::Result<UpstreamResponder> {
    let url = cfg.upstream_url.clone().with_context(|| {
        format!("MEDCHAT_UPSTREAM_URL is required for the {:?} responder", cfg.responder)
    })?;
    let responder = UpstreamResponder::new(
        url,
        cfg.upstream_api_key.clone(),
        cfg.timeout,
        metrics.clone(),
    )
    .context("building upstream chat client")?;
    Ok(responder)
}
