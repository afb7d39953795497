pub mod chat_state;
pub mod fallback;
pub mod formatter;
pub mod knowledge;
pub mod metrics_manager;
pub mod notifications;
pub mod privacy;
pub mod remote;
pub mod responder;
pub mod session_manager;
pub mod store;
