//! Shared test harness: an in-memory `Transport` mock plus group/member
//! bootstrap helpers, used by every integration test in this directory.

use async_trait::async_trait;
use maskrelay::db::Database;
use maskrelay::engine::{GroupRegistry, StatusAggregator};
use maskrelay::error::TransportError;
use maskrelay::transport::Transport;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Copy { to: String, content: String, reply_to_mid: Option<i64> },
    Edit { to: String, mid: i64, content: String },
    Delete { to: String, mid: i64 },
    Pin { to: String, mid: i64 },
    Unpin { to: String, mid: i64 },
}

/// Records every call it receives and can be told to make specific users
/// act as if they've blocked the bot.
pub struct MockTransport {
    calls: Mutex<Vec<Call>>,
    next_mid: AtomicI64,
    blocked: Mutex<HashSet<String>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            next_mid: AtomicI64::new(1000),
            blocked: Mutex::new(HashSet::new()),
        })
    }

    pub fn block(&self, to_user_id: &str) {
        self.blocked.lock().insert(to_user_id.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn copy_count(&self) -> usize {
        self.calls.lock().iter().filter(|c| matches!(c, Call::Copy { .. })).count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn copy(
        &self,
        to_user_id: &str,
        content: &str,
        reply_to_mid: Option<i64>,
    ) -> Result<i64, TransportError> {
        if self.blocked.lock().contains(to_user_id) {
            return Err(TransportError::UserIsBlocked);
        }
        let mid = self.next_mid.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().push(Call::Copy {
            to: to_user_id.to_string(),
            content: content.to_string(),
            reply_to_mid,
        });
        Ok(mid)
    }

    async fn edit_message_text(&self, to_user_id: &str, mid: i64, content: &str) -> Result<(), TransportError> {
        if self.blocked.lock().contains(to_user_id) {
            return Err(TransportError::UserIsBlocked);
        }
        self.calls.lock().push(Call::Edit { to: to_user_id.to_string(), mid, content: content.to_string() });
        Ok(())
    }

    async fn delete_messages(&self, to_user_id: &str, mid: i64) -> Result<(), TransportError> {
        self.calls.lock().push(Call::Delete { to: to_user_id.to_string(), mid });
        Ok(())
    }

    async fn pin_chat_message(&self, to_user_id: &str, mid: i64, _disable_notification: bool) -> Result<(), TransportError> {
        self.calls.lock().push(Call::Pin { to: to_user_id.to_string(), mid });
        Ok(())
    }

    async fn unpin_chat_message(&self, to_user_id: &str, mid: i64) -> Result<(), TransportError> {
        self.calls.lock().push(Call::Unpin { to: to_user_id.to_string(), mid });
        Ok(())
    }
}

pub struct Harness {
    pub db: Database,
    pub transport: Arc<MockTransport>,
    pub registry: Arc<GroupRegistry>,
}

impl Harness {
    pub async fn new() -> Self {
        let db = Database::new(":memory:").await.expect("in-memory db");
        let transport = MockTransport::new();
        let engine_config = maskrelay::config::EngineConfig::default();
        let registry = Arc::new(GroupRegistry::new(
            db.clone(),
            transport.clone(),
            engine_config,
            StatusAggregator::new(),
        ));
        Self { db, transport, registry }
    }

    pub fn context(&self, group_id: i64) -> maskrelay::handlers::Context {
        maskrelay::handlers::Context::new(self.db.clone(), self.registry.clone(), self.transport.clone(), group_id)
    }
}
