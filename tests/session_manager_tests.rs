use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use medchat_backend::error::ChatError;
use medchat_backend::message::{ChatbotConfig, Sender, SessionId};
use medchat_backend::services::responder::Responder;
use medchat_backend::services::session_manager::SessionManager;
use medchat_backend::services::store::{ChatStore, SequentialIds};
use tokio::sync::Notify;
use tokio::time::{sleep, timeout};

struct FailingResponder;

#[async_trait]
impl Responder for FailingResponder {
    async fn respond(&self, _: SessionId, _: &str) -> Result<String, ChatError> {
        Err(ChatError::Unreachable("connection refused".to_string()))
    }
}

/// Echoes after a delay, to expose interleaving between concurrent sends.
struct SlowEcho;

#[async_trait]
impl Responder for SlowEcho {
    async fn respond(&self, _: SessionId, content: &str) -> Result<String, ChatError> {
        sleep(Duration::from_millis(20)).await;
        Ok(format!("echo: {content}"))
    }
}

#[tokio::test]
async fn test_ids_are_distinct_and_increasing() {
    let mgr = SessionManager::default();
    let first = mgr.create_session().await.unwrap();
    let second = mgr.create_session().await.unwrap();
    assert!(second.id > first.id);
}

#[tokio::test]
async fn test_injected_id_generator() {
    let mgr = SessionManager::default().with_id_generators(
        Arc::new(SequentialIds::starting_at(100)),
        Arc::new(SequentialIds::starting_at(500)),
    );
    let session = mgr.create_session().await.unwrap();
    assert_eq!(session.id, 100);

    mgr.send_message(session.id, "hello").await.unwrap();
    let history = mgr.get_history(session.id).await.unwrap();
    assert_eq!(history[0].id, Some(500));
    assert_eq!(history[1].id, Some(501));
}

#[tokio::test]
async fn test_fresh_session_has_empty_history() {
    let mgr = SessionManager::default();
    let session = mgr.create_session().await.unwrap();
    assert!(session.is_active);
    assert!(session.end_time.is_none());
    assert!(mgr.get_history(session.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_send_appends_user_then_bot() {
    let mgr = SessionManager::default();
    let sid = mgr.create_session().await.unwrap().id;

    let reply = mgr.send_message(sid, "I have a headache").await.unwrap();
    let history = mgr.get_history(sid).await.unwrap();

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].sender, Sender::User);
    assert_eq!(history[0].content, "I have a headache");
    assert_eq!(history[1].sender, Sender::Bot);
    assert_eq!(history[1].content, reply.response);
    assert_eq!(history[1].timestamp, reply.timestamp);
    assert!(history[0].timestamp <= history[1].timestamp);

    let session = mgr.get_session(sid).await.unwrap();
    assert_eq!(session.session.last_activity_time, Some(reply.timestamp));
    assert_eq!(session.messages, history);

    mgr.send_message(sid, "what about flu?").await.unwrap();
    let history = mgr.get_history(sid).await.unwrap();
    assert_eq!(history.len(), 4);
    assert!(history.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

#[tokio::test]
async fn test_history_is_repeatable() {
    let mgr = SessionManager::default();
    let sid = mgr.create_session().await.unwrap().id;
    mgr.send_message(sid, "cold").await.unwrap();

    let a = mgr.get_history(sid).await.unwrap();
    let b = mgr.get_history(sid).await.unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let mgr = SessionManager::default();
    assert_eq!(mgr.get_history(42).await, Err(ChatError::NotFound(42)));
    assert_eq!(
        mgr.send_message(42, "hi").await.unwrap_err(),
        ChatError::NotFound(42)
    );
    assert_eq!(mgr.end_session(42).await, Err(ChatError::NotFound(42)));
    assert!(mgr.get_session(42).await.is_err());
}

#[tokio::test]
async fn test_blank_message_rejected() {
    let mgr = SessionManager::default();
    let sid = mgr.create_session().await.unwrap().id;
    assert!(matches!(
        mgr.send_message(sid, "   ").await,
        Err(ChatError::Validation(_))
    ));
    assert!(mgr.get_history(sid).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_end_session_is_idempotent() {
    let mgr = SessionManager::default();
    let sid = mgr.create_session().await.unwrap().id;

    mgr.end_session(sid).await.unwrap();
    let ended = mgr.get_session(sid).await.unwrap().session;
    assert!(!ended.is_active);
    assert!(ended.end_time.is_some());

    mgr.end_session(sid).await.unwrap();
    let again = mgr.get_session(sid).await.unwrap().session;
    assert!(!again.is_active);
    assert_eq!(again.end_time, ended.end_time);
}

#[tokio::test]
async fn test_ended_session_rejects_messages() {
    let mgr = SessionManager::default();
    let sid = mgr.create_session().await.unwrap().id;
    mgr.end_session(sid).await.unwrap();

    assert_eq!(
        mgr.send_message(sid, "hello").await.unwrap_err(),
        ChatError::SessionEnded(sid)
    );
    // still listed, never deleted
    assert_eq!(mgr.list_sessions().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_failed_reply_leaves_history_untouched() {
    let mgr = SessionManager::new(Arc::new(FailingResponder));
    let sid = mgr.create_session().await.unwrap().id;

    let err = mgr.send_message(sid, "hello").await.unwrap_err();
    assert!(matches!(err, ChatError::Unreachable(_)));
    assert!(mgr.get_history(sid).await.unwrap().is_empty());
    let session = mgr.get_session(sid).await.unwrap().session;
    assert!(session.last_activity_time.is_none());
}

#[tokio::test]
async fn test_concurrent_sends_on_one_session_are_serialized() {
    let mgr = SessionManager::new(Arc::new(SlowEcho));
    let sid = mgr.create_session().await.unwrap().id;

    let (a, b) = tokio::join!(mgr.send_message(sid, "one"), mgr.send_message(sid, "two"));
    a.unwrap();
    b.unwrap();

    let history = mgr.get_history(sid).await.unwrap();
    assert_eq!(history.len(), 4);
    for pair in history.chunks(2) {
        assert_eq!(pair[0].sender, Sender::User);
        assert_eq!(pair[1].sender, Sender::Bot);
        assert_eq!(pair[1].content, format!("echo: {}", pair[0].content));
    }
}

#[tokio::test]
async fn test_list_sessions_sorted() {
    let mgr = SessionManager::default();
    for _ in 0..3 {
        mgr.create_session().await.unwrap();
    }
    let ids: Vec<_> = mgr.list_sessions().await.unwrap().iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_config_defaults() {
    let mgr = SessionManager::default().with_config(ChatbotConfig {
        disclaimers: vec!["Custom".into()],
        medical_sources: vec![],
    });
    let cfg = mgr.get_config().await.unwrap();
    assert_eq!(cfg.disclaimers, vec!["Custom".to_string()]);
    assert_eq!(cfg.medical_sources, ChatbotConfig::default().medical_sources);
}

/// Holds a reply open until the test releases it.
#[derive(Default)]
struct Gate {
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl Responder for Gate {
    async fn respond(&self, _: SessionId, _: &str) -> Result<String, ChatError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok("done".to_string())
    }
}

#[tokio::test]
async fn test_pending_reply_does_not_block_other_reads() {
    let gate = Arc::new(Gate::default());
    let mgr = SessionManager::new(gate.clone());
    let busy = mgr.create_session().await.unwrap().id;
    let idle = mgr.create_session().await.unwrap().id;

    let sender = {
        let mgr = mgr.clone();
        tokio::spawn(async move { mgr.send_message(busy, "hello").await })
    };
    gate.entered.notified().await;

    let listed = timeout(Duration::from_millis(500), mgr.list_sessions())
        .await
        .expect("list_sessions waited on a pending reply")
        .unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|s| s.last_activity_time.is_none()));

    timeout(Duration::from_millis(500), mgr.end_session(idle))
        .await
        .expect("other session waited on a pending reply")
        .unwrap();

    gate.release.notify_one();
    sender.await.unwrap().unwrap();

    let history = mgr.get_history(busy).await.unwrap();
    assert_eq!(history.len(), 2);
    let listed = mgr.list_sessions().await.unwrap();
    assert!(listed[0].last_activity_time.is_some());
    assert!(!listed[1].is_active);
}

#[tokio::test]
async fn test_end_waits_for_pending_reply() {
    let gate = Arc::new(Gate::default());
    let mgr = SessionManager::new(gate.clone());
    let sid = mgr.create_session().await.unwrap().id;

    let sender = {
        let mgr = mgr.clone();
        tokio::spawn(async move { mgr.send_message(sid, "hello").await })
    };
    gate.entered.notified().await;

    let ender = {
        let mgr = mgr.clone();
        tokio::spawn(async move { mgr.end(sid).await })
    };
    gate.release.notify_one();

    sender.await.unwrap().unwrap();
    assert!(ender.await.unwrap().unwrap());
    assert!(!mgr.end(sid).await.unwrap());

    let found = mgr.get_session(sid).await.unwrap();
    assert!(!found.session.is_active);
    assert_eq!(found.messages.len(), 2);
}
