//! The per-group worker: a single long-lived task draining one group's
//! operation queue. Mirrors `ChannelActor::run`'s
//! `while let Some(event) = rx.recv().await` loop generalized from channel
//! events to fan-out operations.

use super::operation::{Operation, OperationKind, OperationOutcome};
use super::{strategies, MaskPool, StatusAggregator};
use crate::db::{BanType, Database};
use crate::transport::Transport;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

pub struct GroupWorker {
    group_id: i64,
    db: Database,
    transport: Arc<dyn Transport>,
    #[allow(dead_code)]
    mask_pool: Arc<MaskPool>,
    status: StatusAggregator,
    local: super::AggregateStatus,
}

impl GroupWorker {
    pub fn new(
        group_id: i64,
        db: Database,
        transport: Arc<dyn Transport>,
        mask_pool: Arc<MaskPool>,
        status: StatusAggregator,
    ) -> Self {
        Self {
            group_id,
            db,
            transport,
            mask_pool,
            status,
            local: super::AggregateStatus::default(),
        }
    }

    pub async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Operation>) {
        info!(group_id = self.group_id, "group worker starting");

        while let Some(operation) = rx.recv().await {
            self.handle(operation).await;
        }

        info!(group_id = self.group_id, "group worker drained and stopped");
    }

    async fn handle(&mut self, operation: Operation) {
        let Operation { group_id, kind, created, done } = operation;
        let label = kind.label();

        let group = match self.db.groups().find_by_id(group_id).await {
            Ok(group) => group,
            Err(e) => {
                warn!(group_id, error = %e, "worker could not load group, dropping operation");
                let _ = done.send(OperationOutcome::default());
                return;
            }
        };

        // Global per-operation guard: a group-wide RECEIVE ban short-circuits
        // the whole operation with no recipients walked.
        if group.group_wide_ban(BanType::Receive) {
            let _ = done.send(OperationOutcome::default());
            return;
        }

        let outcome = match kind {
            OperationKind::Broadcast {
                message_id,
                originator_member_id,
                mask,
                text,
                media_caption,
                reply_to_message_id,
            } => {
                strategies::dispatch_broadcast(
                    &self.db,
                    self.transport.as_ref(),
                    &group,
                    message_id,
                    originator_member_id,
                    &mask,
                    text.as_deref(),
                    media_caption.as_deref(),
                    reply_to_message_id,
                )
                .await
            }
            OperationKind::Edit { message_id, mask, text } => {
                strategies::dispatch_edit(&self.db, self.transport.as_ref(), &group, message_id, &mask, &text)
                    .await
            }
            OperationKind::Delete { message_id } => {
                strategies::dispatch_delete(&self.db, self.transport.as_ref(), message_id).await
            }
            OperationKind::Pin { message_id } => {
                strategies::dispatch_pin(&self.db, self.transport.as_ref(), &group, message_id).await
            }
            OperationKind::Unpin { message_id } => {
                strategies::dispatch_unpin(&self.db, self.transport.as_ref(), &group, message_id).await
            }
        };

        let duration_ms = (Utc::now() - created).num_milliseconds();
        let outcome = OperationOutcome { duration_ms, ..outcome };

        self.local.operations += 1;
        self.local.requests += outcome.requests;
        self.local.errors += outcome.errors;
        self.local.total_duration_ms += duration_ms;
        self.status.record(outcome);

        crate::metrics::record_operation(label, outcome.requests, outcome.errors);

        // The done-signal fires even though nothing here can panic mid-loop:
        // every recipient's transport error is caught inside the strategy, so
        // the only way this send fails is the caller having stopped waiting.
        let _ = done.send(outcome);
    }
}
