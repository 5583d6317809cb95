//! Minimal add/remove reconciliation of a selection against its baseline.
//!
//! Saving is two remote calls, add first and remove second. They are not
//! transactional: if the add succeeds and the remove fails, the remote side
//! keeps the added tables while the local baseline stays at its pre-save
//! value. A retry recomputes the diff from scratch and relies on both calls
//! being idempotent. A single batched "set tables" call would close this gap.

use crate::error::{ReconciliationStage, Result, SeatmapError};
use crate::session::{Session, TableReconciliationApi};
use crate::table::{TableId, TableSet};
use std::sync::Arc;

/// Tables to assign and unassign to turn a baseline into a selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableDiff {
    pub to_add: TableSet,
    pub to_remove: TableSet,
}

impl TableDiff {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }

    /// Computes `baseline ∪ to_add \ to_remove`.
    pub fn apply_to(&self, baseline: &TableSet) -> TableSet {
        baseline
            .union(&self.to_add)
            .filter(|id| !self.to_remove.contains(*id))
            .cloned()
            .collect()
    }
}

/// `to_add = selection − baseline`, `to_remove = baseline − selection`.
pub fn compute_diff(selection: &TableSet, baseline: &TableSet) -> TableDiff {
    TableDiff {
        to_add: selection.difference(baseline).cloned().collect(),
        to_remove: baseline.difference(selection).cloned().collect(),
    }
}

/// Drives the two remote calls that persist a diff.
#[derive(Clone)]
pub struct ReconciliationEngine {
    api: Arc<dyn TableReconciliationApi>,
}

impl ReconciliationEngine {
    pub fn new(api: Arc<dyn TableReconciliationApi>) -> Self {
        Self { api }
    }

    /// Applies `diff` to the session remotely.
    ///
    /// An empty add half is skipped. The remove call is always issued since
    /// its response is the authoritative post-update session.
    ///
    /// # Errors
    ///
    /// Returns `SeatmapError::Reconciliation` naming the failed stage. No
    /// retry is attempted.
    pub async fn apply(&self, session_id: &str, diff: &TableDiff) -> Result<Session> {
        if !diff.to_add.is_empty() {
            let to_add: Vec<TableId> = diff.to_add.iter().cloned().collect();
            tracing::debug!(
                "[Reconciliation] Adding {} tables to session {}",
                to_add.len(),
                session_id
            );
            self.api
                .add_tables(session_id, &to_add)
                .await
                .map_err(|e| stage_error(ReconciliationStage::AddTables, e))?;
        }

        let to_remove: Vec<TableId> = diff.to_remove.iter().cloned().collect();
        tracing::debug!(
            "[Reconciliation] Removing {} tables from session {}",
            to_remove.len(),
            session_id
        );
        self.api
            .remove_tables(session_id, &to_remove)
            .await
            .map_err(|e| stage_error(ReconciliationStage::RemoveTables, e))
    }
}

fn stage_error(stage: ReconciliationStage, err: SeatmapError) -> SeatmapError {
    tracing::warn!("[Reconciliation] {} failed: {}", stage, err);
    match err {
        SeatmapError::Reconciliation { .. } => err,
        other => SeatmapError::reconciliation(stage, other.to_string()),
    }
}
