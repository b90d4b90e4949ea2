//! Lazy per-group worker registry.
//!
//! A `DashMap` keyed by group id holds each group's queue handle, spawning a
//! worker task on first use rather than up front.

use super::operation::{Operation, OperationKind, OperationOutcome};
use super::worker::GroupWorker;
use super::{MaskPool, StatusAggregator};
use crate::config::EngineConfig;
use crate::db::Database;
use crate::error::EngineError;
use crate::transport::Transport;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

pub struct GroupRegistry {
    workers: DashMap<i64, mpsc::UnboundedSender<Operation>>,
    mask_pools: DashMap<i64, Arc<MaskPool>>,
    db: Database,
    transport: Arc<dyn Transport>,
    status: StatusAggregator,
    engine_config: EngineConfig,
}

impl GroupRegistry {
    pub fn new(
        db: Database,
        transport: Arc<dyn Transport>,
        engine_config: EngineConfig,
        status: StatusAggregator,
    ) -> Self {
        Self {
            workers: DashMap::new(),
            mask_pools: DashMap::new(),
            db,
            transport,
            status,
            engine_config,
        }
    }

    /// Get this group's mask pool, creating it on first use.
    pub fn mask_pool(&self, group_id: i64) -> Arc<MaskPool> {
        self.mask_pools
            .entry(group_id)
            .or_insert_with(|| {
                Arc::new(MaskPool::new(
                    self.engine_config.mask_universe.clone(),
                    self.engine_config.mask_ttl_secs,
                ))
            })
            .clone()
    }

    fn get_or_spawn(&self, group_id: i64) -> mpsc::UnboundedSender<Operation> {
        if let Some(tx) = self.workers.get(&group_id) {
            return tx.clone();
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let worker = GroupWorker::new(
            group_id,
            self.db.clone(),
            self.transport.clone(),
            self.mask_pool(group_id),
            self.status.clone(),
        );
        tokio::spawn(worker.run(rx));
        self.workers.insert(group_id, tx.clone());
        tx
    }

    /// Enqueue an operation, spawning the group's worker if it isn't already
    /// running. Returns a receiver resolved once the worker completes it.
    pub fn enqueue(
        &self,
        group_id: i64,
        kind: OperationKind,
    ) -> Result<oneshot::Receiver<OperationOutcome>, EngineError> {
        let tx = self.get_or_spawn(group_id);
        let (operation, rx) = Operation::new(group_id, kind);
        tx.send(operation).map_err(|_| EngineError::GroupNotRunning(group_id))?;
        Ok(rx)
    }

    /// Wait for an operation's completion with the configured timeout. The
    /// worker itself is not aborted on timeout, only the wait.
    pub async fn wait_for(
        &self,
        rx: oneshot::Receiver<OperationOutcome>,
    ) -> Result<OperationOutcome, EngineError> {
        let timeout = std::time::Duration::from_secs(self.engine_config.operation_timeout_secs);
        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(_)) => Err(EngineError::Timeout),
            Err(_) => Err(EngineError::Timeout),
        }
    }

    /// Stop accepting new operations for a group. The worker drains whatever
    /// is already queued and exits once this was the last sender clone —
    /// the dropped map entry acts as the shutdown sentinel.
    pub fn retire(&self, group_id: i64) {
        self.workers.remove(&group_id);
        self.mask_pools.remove(&group_id);
    }

    pub fn status(&self) -> &StatusAggregator {
        &self.status
    }

    pub fn active_group_count(&self) -> usize {
        self.workers.len()
    }
}
