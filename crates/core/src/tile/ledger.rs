//! Request-scoped ledger of uploaded assets.
//!
//! The object store has no multi-object transaction, so every asset uploaded
//! while handling a request is recorded here. The request either commits the
//! ledger (the assets now belong to a persisted record) or rolls it back,
//! deleting every tracked asset. A ledger dropped with uncommitted assets
//! (e.g. the handler future was cancelled) schedules the same rollback on
//! the Tokio runtime.

use std::sync::Arc;

use futures::future::join_all;

use crate::assets::{AssetRef, ObjectStore};

/// Lifecycle of one mutation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowPhase {
    Idle,
    Uploading,
    Validating,
    Persisting,
    Committed,
    Failed,
    CleaningUp,
    FailedReported,
}

impl WorkflowPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Committed | Self::FailedReported)
    }
}

pub struct AssetLedger {
    store: Arc<dyn ObjectStore>,
    tracked: Vec<AssetRef>,
    phase: WorkflowPhase,
}

impl AssetLedger {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            tracked: Vec::new(),
            phase: WorkflowPhase::Idle,
        }
    }

    pub fn advance(&mut self, phase: WorkflowPhase) {
        tracing::trace!(from = ?self.phase, to = ?phase, "Workflow phase change");
        self.phase = phase;
    }

    pub fn track(&mut self, asset: AssetRef) {
        self.tracked.push(asset);
    }

    /// The tracked assets are now owned by a persisted record.
    pub fn commit(mut self) {
        self.tracked.clear();
        self.advance(WorkflowPhase::Committed);
    }

    /// Delete every tracked asset. Deletion errors are logged, not returned.
    ///
    /// Returns the number of assets that could not be deleted.
    pub async fn rollback(mut self) -> usize {
        self.advance(WorkflowPhase::Failed);
        let assets = std::mem::take(&mut self.tracked);
        self.advance(WorkflowPhase::CleaningUp);
        let failures = purge(self.store.as_ref(), &assets).await;
        if !assets.is_empty() {
            tracing::info!(
                assets = assets.len(),
                failures,
                "Rolled back uploaded assets"
            );
        }
        self.advance(WorkflowPhase::FailedReported);
        failures
    }
}

impl Drop for AssetLedger {
    fn drop(&mut self) {
        if self.tracked.is_empty() || self.phase.is_terminal() {
            return;
        }
        let assets = std::mem::take(&mut self.tracked);
        let store = Arc::clone(&self.store);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                tracing::warn!(
                    assets = assets.len(),
                    phase = ?self.phase,
                    "Asset ledger dropped before completion, scheduling cleanup"
                );
                handle.spawn(async move {
                    purge(store.as_ref(), &assets).await;
                });
            }
            Err(_) => {
                let handles: Vec<&str> =
                    assets.iter().map(|a| a.deletion_handle.as_str()).collect();
                tracing::error!(
                    ?handles,
                    "Asset ledger dropped outside a runtime, assets orphaned"
                );
            }
        }
    }
}

/// Delete `assets` concurrently, logging each failure.
///
/// Returns the number of failed deletions.
pub async fn purge(store: &dyn ObjectStore, assets: &[AssetRef]) -> usize {
    let results = join_all(assets.iter().map(|a| store.delete(&a.deletion_handle))).await;
    let mut failures = 0;
    for (asset, result) in assets.iter().zip(results) {
        if let Err(e) = result {
            failures += 1;
            tracing::warn!(
                handle = %asset.deletion_handle,
                error = %e,
                "Failed to delete stored asset"
            );
        }
    }
    failures
}
