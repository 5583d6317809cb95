//! Session provider and table reconciliation traits.
//!
//! Defines the remote contracts the seating map consumes for session data.

use super::model::Session;
use crate::error::Result;
use crate::table::TableId;
use async_trait::async_trait;

/// Source of session records.
///
/// Decouples the engine from the transport (HTTP, fixtures, ...).
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Fetches a session by its ID.
    ///
    /// # Arguments
    ///
    /// * `session_id` - The ID of the session to fetch
    ///
    /// # Returns
    ///
    /// - `Ok(Session)`: Session found; its `tables` seed the baseline
    /// - `Err(SeatmapError::NotFound)`: No such session
    /// - `Err(_)`: Error occurred during retrieval
    async fn fetch_session(&self, session_id: &str) -> Result<Session>;
}

/// Remote operations that change the tables persisted for a session.
///
/// # Implementation Notes
///
/// Both table operations must be idempotent: re-adding an assigned table or
/// re-removing an unassigned one is a no-op, not an error.
#[async_trait]
pub trait TableReconciliationApi: Send + Sync {
    /// Assigns the given tables to the session.
    async fn add_tables(&self, session_id: &str, tables: &[TableId]) -> Result<()>;

    /// Unassigns the given tables and returns the updated session.
    ///
    /// # Returns
    ///
    /// - `Ok(Session)`: The authoritative post-update session
    /// - `Err(_)`: The call was rejected
    async fn remove_tables(&self, session_id: &str, tables: &[TableId]) -> Result<Session>;

    /// Ends the session and returns it with its end timestamp set.
    async fn end_session(&self, session_id: &str) -> Result<Session>;
}
