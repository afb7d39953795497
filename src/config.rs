//! Server configuration, loaded from environment variables at startup.

use std::path::PathBuf;
use std::time::Duration;

use crate::message::ChatbotConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponderKind {
    /// Local knowledge-table answers.
    Fallback,
    /// Forward to the chatbot API at `upstream_url`.
    Upstream,
    /// Health questions go to the knowledge table, the rest upstream.
    Hybrid,
}

impl std::str::FromStr for ResponderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fallback" | "local" => Ok(ResponderKind::Fallback),
            "upstream" | "remote" => Ok(ResponderKind::Upstream),
            "hybrid" => Ok(ResponderKind::Hybrid),
            other => Err(format!("unknown responder '{other}'")),
        }
    }
}

/// Every field has a default so the server runs with no environment set.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:3000"`).
    pub bind_address: String,

    pub responder: ResponderKind,

    /// External chatbot endpoint, required unless the responder is `Fallback`.
    pub upstream_url: Option<String>,
    pub upstream_api_key: Option<String>,

    /// Timeout for outbound chat calls.
    pub timeout: Duration,

    /// Value expected in the `x-admin-key` header on `/admin` routes.
    pub admin_key: String,

    /// Optional JSON file with `disclaimers` and `medicalSources`.
    pub chatbot_config_path: Option<PathBuf>,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// Emit newline-delimited JSON log records.
    pub log_json: bool,
}

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let responder = std::env::var("MEDCHAT_RESPONDER")
            .ok()
            .and_then(|v| match v.parse() {
                Ok(kind) => Some(kind),
                Err(e) => {
                    eprintln!("WARN: MEDCHAT_RESPONDER: {e}; using the local fallback");
                    None
                }
            })
            .unwrap_or(ResponderKind::Fallback);

        Self {
            bind_address: env_or("MEDCHAT_BIND", "0.0.0.0:3000"),
            responder,
            upstream_url: std::env::var("MEDCHAT_UPSTREAM_URL").ok(),
            upstream_api_key: std::env::var("MEDCHAT_UPSTREAM_KEY").ok(),
            timeout: Duration::from_secs(parse_env("MEDCHAT_TIMEOUT_SECS", 5)),
            admin_key: env_or("MEDCHAT_ADMIN_KEY", "secret123"),
            chatbot_config_path: std::env::var("MEDCHAT_BOT_CONFIG").ok().map(PathBuf::from),
            log_level: env_or("MEDCHAT_LOG", "info"),
            log_json: std::env::var("MEDCHAT_LOG_JSON")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    /// Read the disclaimer/source file if one is configured. Any problem
    /// yields the built-in defaults.
    pub fn load_chatbot_config(&self) -> ChatbotConfig {
        let Some(path) = &self.chatbot_config_path else {
            return ChatbotConfig::default();
        };

        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|raw| serde_json::from_str::<ChatbotConfig>(&raw).map_err(|e| e.to_string()));

        match parsed {
            Ok(cfg) => cfg.or_defaults(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "using default chatbot config");
                ChatbotConfig::default()
            }
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn responder_kind_parses() {
        assert_eq!("Fallback".parse::<ResponderKind>(), Ok(ResponderKind::Fallback));
        assert_eq!(" upstream ".parse::<ResponderKind>(), Ok(ResponderKind::Upstream));
        assert_eq!("HYBRID".parse::<ResponderKind>(), Ok(ResponderKind::Hybrid));
        assert!("magic".parse::<ResponderKind>().is_err());
    }

    #[test]
    fn missing_config_file_gives_defaults() {
        let mut cfg = Config::from_env();
        cfg.chatbot_config_path = Some(PathBuf::from("/definitely/not/here.json"));
        assert_eq!(cfg.load_chatbot_config(), ChatbotConfig::default());
    }
}
