//! Command handler context, passed to every `/command` handler.

use crate::db::{Database, Group, Member};
use crate::engine::GroupRegistry;
use crate::error::OperationResult;
use crate::transport::Transport;
use std::sync::Arc;

/// Everything a command handler needs: the repository layer, the fan-out
/// engine's registry, the transport, and which group this command arrived
/// on.
pub struct Context {
    pub db: Database,
    pub registry: Arc<GroupRegistry>,
    pub transport: Arc<dyn Transport>,
    pub group_id: i64,
}

impl Context {
    pub fn new(
        db: Database,
        registry: Arc<GroupRegistry>,
        transport: Arc<dyn Transport>,
        group_id: i64,
    ) -> Self {
        Self { db, registry, transport, group_id }
    }

    pub async fn group(&self) -> OperationResult<Group> {
        self.db.groups().find_by_id(self.group_id).await.map_err(|e| crate::error::OperationError::msg(e.to_string()))
    }

    /// Resolve the acting member for a transport-level user, joining them as
    /// a fresh GUEST if this is their first appearance in the group.
    pub async fn actor(&self, transport_uid: &str, display_name: &str) -> OperationResult<Member> {
        let user = self
            .db
            .users()
            .find_or_create(transport_uid, display_name)
            .await
            .map_err(|e| crate::error::OperationError::msg(e.to_string()))?;

        self.db
            .members()
            .join_or_get(user.id, self.group_id)
            .await
            .map_err(|e| crate::error::OperationError::msg(e.to_string()))
    }
}
