//! Session view use case implementation.
//!
//! This module provides the `SessionViewUseCase` which drives one
//! `SeatingMap` against the remote providers: loading the session and its
//! venue layout, saving the table selection, and ending the session.

use seatmap_core::error::{Result, SeatmapError};
use seatmap_core::interaction::{DispatchOutcome, PointerEvent};
use seatmap_core::layout::LayoutProvider;
use seatmap_core::notification::{Notification, NotificationSink};
use seatmap_core::reconciliation::ReconciliationEngine;
use seatmap_core::selection::ToggleOutcome;
use seatmap_core::session::{SessionProvider, TableReconciliationApi};
use seatmap_core::viewport::ViewportDelta;
use seatmap_core::{SeatingMap, TableId, ViewSnapshot};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Result of [`SessionViewUseCase::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Selection already matched the baseline; nothing was sent.
    Clean,
    /// Both remote calls succeeded and the baseline was refreshed.
    Saved { added: usize, removed: usize },
    /// The remote calls succeeded but the view was closed or reopened in
    /// the meantime, so the response was not applied.
    Discarded,
}

/// Use case for one interactive session view.
///
/// # Responsibilities
///
/// - Fetching the session, then the layout of its venue
/// - Routing pointer input and camera commands into the `SeatingMap`
/// - Persisting the selection as a minimal add/remove diff
/// - Ending the session
/// - Reporting save/end results through the notification sink
///
/// # Concurrency
///
/// The seating map sits behind a `tokio::sync::Mutex` that is never held
/// across a remote call. Each remote result is applied with the generation
/// captured before the call, so responses for a closed view are dropped.
pub struct SessionViewUseCase {
    /// Source of session records
    session_provider: Arc<dyn SessionProvider>,
    /// Source of venue layout markup
    layout_provider: Arc<dyn LayoutProvider>,
    /// Remote table operations (also used to end the session)
    table_api: Arc<dyn TableReconciliationApi>,
    /// Two-call save driver built on `table_api`
    reconciliation: ReconciliationEngine,
    /// User-facing notifications
    notifications: Arc<dyn NotificationSink>,
    /// State of the current view
    map: Arc<Mutex<SeatingMap>>,
}

impl SessionViewUseCase {
    /// Creates a new `SessionViewUseCase` instance.
    ///
    /// # Arguments
    ///
    /// * `session_provider` - Fetches session records
    /// * `layout_provider` - Fetches venue layouts
    /// * `table_api` - Adds/removes tables and ends sessions
    /// * `notifications` - Receives success/failure messages
    /// * `map` - The seating map this view drives
    pub fn new(
        session_provider: Arc<dyn SessionProvider>,
        layout_provider: Arc<dyn LayoutProvider>,
        table_api: Arc<dyn TableReconciliationApi>,
        notifications: Arc<dyn NotificationSink>,
        map: SeatingMap,
    ) -> Self {
        Self {
            session_provider,
            layout_provider,
            reconciliation: ReconciliationEngine::new(table_api.clone()),
            table_api,
            notifications,
            map: Arc::new(Mutex::new(map)),
        }
    }

    /// Opens the view for a session.
    ///
    /// Any previous view is discarded. The session is fetched first and the
    /// layout of its venue second. Load failures are recorded on the map as
    /// a passive status rather than returned.
    ///
    /// # Returns
    ///
    /// A snapshot of the view after both loads resolved.
    pub async fn open(&self, session_id: &str) -> ViewSnapshot {
        let generation = self.map.lock().await.begin_view();
        tracing::info!("[SessionView] Opening session {}", session_id);

        let session = match self.session_provider.fetch_session(session_id).await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!("[SessionView] Error whilst fetching session: {}", e);
                let mut map = self.map.lock().await;
                map.apply_load_failure(generation, SeatmapError::SessionLoad(e.to_string()));
                return map.snapshot();
            }
        };
        let venue_id = session.venue.id.clone();
        let venue_name = session.venue.name.clone();

        {
            let mut map = self.map.lock().await;
            if !map.apply_session(generation, session) {
                return map.snapshot();
            }
        }

        let layout = self.layout_provider.fetch_layout(&venue_id).await;
        let mut map = self.map.lock().await;
        match layout {
            Ok(markup) => {
                if map.apply_layout(generation, &markup) {
                    tracing::info!("[SessionView] Fetched layout from {}", venue_name);
                }
            }
            Err(e) => {
                tracing::error!("[SessionView] Error whilst fetching layout: {}", e);
                map.apply_load_failure(generation, SeatmapError::LayoutLoad(e.to_string()));
            }
        }
        map.snapshot()
    }

    /// Closes the view. Responses still in flight are discarded.
    pub async fn close(&self) {
        self.map.lock().await.teardown();
    }

    pub async fn dispatch(&self, event: PointerEvent) -> DispatchOutcome {
        self.map.lock().await.dispatch(event)
    }

    pub async fn toggle(&self, id: &TableId) -> ToggleOutcome {
        self.map.lock().await.toggle(id)
    }

    pub async fn move_camera(&self, delta: ViewportDelta) -> bool {
        self.map.lock().await.move_camera(delta)
    }

    pub async fn reset_view(&self) {
        self.map.lock().await.reset_view();
    }

    pub async fn snapshot(&self) -> ViewSnapshot {
        self.map.lock().await.snapshot()
    }

    pub async fn render(&self) -> Result<Option<String>> {
        self.map.lock().await.render()
    }

    /// Persists the current selection.
    ///
    /// Computes the diff against the baseline afresh, issues "add" then
    /// "remove", and on success replaces the baseline with the server's
    /// table list. On failure nothing local changes and the failure is
    /// reported once; there is no automatic retry.
    ///
    /// # Errors
    ///
    /// - `SeatmapError::SessionEnded` if the session is read-only
    /// - `SeatmapError::Reconciliation` if either remote call failed
    pub async fn save(&self) -> Result<SaveOutcome> {
        let plan = self.map.lock().await.plan_save()?;
        let Some(plan) = plan else {
            tracing::debug!("[SessionView] Selection is clean, nothing to save");
            return Ok(SaveOutcome::Clean);
        };

        let added = plan.diff.to_add.len();
        let removed = plan.diff.to_remove.len();
        tracing::info!(
            "[SessionView] Saving session {}: +{} -{}",
            plan.session_id,
            added,
            removed
        );

        match self.reconciliation.apply(&plan.session_id, &plan.diff).await {
            Ok(updated) => {
                let applied = self
                    .map
                    .lock()
                    .await
                    .apply_authoritative_session(plan.generation, updated);
                if !applied {
                    return Ok(SaveOutcome::Discarded);
                }
                self.notifications
                    .notify(Notification::success("Successfully updated session tables!"));
                Ok(SaveOutcome::Saved { added, removed })
            }
            Err(e) => {
                tracing::error!("[SessionView] Saving tables failed: {}", e);
                self.notifications
                    .notify(Notification::failure(format!("Could not update tables: {}", e)));
                Err(e)
            }
        }
    }

    /// Ends the session, which locks the view.
    ///
    /// # Errors
    ///
    /// - `SeatmapError::SessionEnded` if it has already ended
    /// - `SeatmapError::Internal` if no session is loaded
    /// - Any error from the remote call
    pub async fn end_session(&self) -> Result<ViewSnapshot> {
        let (generation, session_id) = {
            let map = self.map.lock().await;
            let session = map
                .session()
                .ok_or_else(|| SeatmapError::internal("session is not loaded"))?;
            if map.is_ended() {
                return Err(SeatmapError::SessionEnded(session.id.clone()));
            }
            (map.generation(), session.id.clone())
        };

        match self.table_api.end_session(&session_id).await {
            Ok(updated) => {
                let mut map = self.map.lock().await;
                if map.apply_authoritative_session(generation, updated) {
                    self.notifications
                        .notify(Notification::success("Successfully ended session!"));
                }
                Ok(map.snapshot())
            }
            Err(e) => {
                tracing::error!("[SessionView] Ending session {} failed: {}", session_id, e);
                self.notifications
                    .notify(Notification::failure(format!("Could not end session: {}", e)));
                Err(e)
            }
        }
    }
}
