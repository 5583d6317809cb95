//! The seating map of one session view.
//!
//! `SeatingMap` owns the scene, camera, selection and baseline for a single
//! view and is mutated synchronously, one event at a time. Asynchronous
//! results (session, layout, save responses) are applied through methods
//! that take the [`Generation`] captured when the request was issued;
//! results from a superseded generation are dropped.

use crate::config::SeatmapConfig;
use crate::error::{Result, SeatmapError};
use crate::interaction::{DispatchContext, DispatchOutcome, InteractionDispatcher, PointerEvent};
use crate::layout::{MountOutcome, Scene, SceneMount};
use crate::lock::LockGate;
use crate::reconciliation::{TableDiff, compute_diff};
use crate::selection::{SelectionStore, ToggleOutcome};
use crate::session::{Session, SessionState};
use crate::table::{TableId, TableSet};
use crate::viewport::{Camera, ViewportController, ViewportDelta};
use serde::Serialize;

/// Identifies one lifetime of a view. Bumped on every (re)open and teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// A save prepared from the current selection and baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavePlan {
    pub generation: Generation,
    pub session_id: String,
    pub diff: TableDiff,
}

/// Coarse state of the view for the surrounding UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ViewStatus {
    /// Session or layout still outstanding.
    Loading,
    /// Session or layout could not be fetched; nothing is interactive.
    LoadFailed(String),
    /// Layout is blank or has no table regions.
    NoTables,
    Ready,
}

impl ViewStatus {
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Loading => None,
            Self::LoadFailed(reason) => Some(format!("Could not load the seating map: {}", reason)),
            Self::NoTables => Some("There are no tables in this layout".to_string()),
            Self::Ready => None,
        }
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// Read-only view of the observable flags and sets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    pub status: ViewStatus,
    pub session_state: Option<SessionState>,
    pub selection_dirty: bool,
    pub view_dirty: bool,
    pub ended: bool,
    pub can_save: bool,
    pub selected: Vec<TableId>,
    pub baseline: Vec<TableId>,
    pub camera: Camera,
    pub hint: Option<String>,
}

/// Aggregate of all seating-map state for one session view.
#[derive(Debug)]
pub struct SeatingMap {
    config: SeatmapConfig,
    generation: Generation,
    session: Option<Session>,
    baseline: Option<TableSet>,
    mount: SceneMount,
    viewport: ViewportController,
    selection: SelectionStore,
    dispatcher: InteractionDispatcher,
    lock: LockGate,
    load_error: Option<SeatmapError>,
}

impl SeatingMap {
    pub fn new(config: SeatmapConfig, lock: LockGate) -> Self {
        let viewport = ViewportController::new(&config.viewport);
        let dispatcher = InteractionDispatcher::new(&config.interaction);
        Self {
            config,
            generation: Generation::default(),
            session: None,
            baseline: None,
            mount: SceneMount::new(),
            viewport,
            selection: SelectionStore::new(),
            dispatcher,
            lock,
            load_error: None,
        }
    }

    // ============================================================================
    // View lifecycle
    // ============================================================================

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.generation == generation
    }

    /// Starts a fresh view, discarding all state, and returns its generation.
    pub fn begin_view(&mut self) -> Generation {
        self.clear();
        self.generation = self.generation.next();
        tracing::debug!("[SeatingMap] Began view generation {:?}", self.generation);
        self.generation
    }

    /// Tears the view down. In-flight results for it will be discarded.
    pub fn teardown(&mut self) {
        self.clear();
        self.generation = self.generation.next();
        tracing::debug!("[SeatingMap] View torn down");
    }

    fn clear(&mut self) {
        self.session = None;
        self.baseline = None;
        self.mount.unmount();
        self.viewport = ViewportController::new(&self.config.viewport);
        self.selection = SelectionStore::new();
        self.dispatcher.reset();
        self.load_error = None;
    }

    fn accept(&self, generation: Generation, what: &str) -> bool {
        if self.is_current(generation) {
            true
        } else {
            tracing::debug!(
                "[SeatingMap] Discarding stale {} (generation {:?}, current {:?})",
                what,
                generation,
                self.generation
            );
            false
        }
    }

    /// Applies a fetched session record.
    ///
    /// The first record of a view sets the baseline; later records only
    /// refresh the session (timestamps, names) and leave the baseline alone.
    pub fn apply_session(&mut self, generation: Generation, session: Session) -> bool {
        if !self.accept(generation, "session") {
            return false;
        }
        if self.baseline.is_none() {
            self.baseline = Some(session.table_ids());
        }
        self.session = Some(session);
        self.try_seed();
        true
    }

    /// Mounts fetched layout markup.
    pub fn apply_layout(&mut self, generation: Generation, markup: &str) -> bool {
        if !self.accept(generation, "layout") {
            return false;
        }
        if self.mount.mount(markup) == MountOutcome::Mounted {
            self.dispatcher.reset();
            if let Some(scene) = self.mount.scene_mut() {
                if self.selection.is_seeded() {
                    self.selection.retain_in(scene);
                }
            }
        }
        self.try_seed();
        true
    }

    /// Records a failed session or layout fetch.
    pub fn apply_load_failure(&mut self, generation: Generation, error: SeatmapError) -> bool {
        if !self.accept(generation, "load failure") {
            return false;
        }
        tracing::warn!("[SeatingMap] Load failed: {}", error);
        self.load_error = Some(error);
        true
    }

    fn try_seed(&mut self) {
        let (Some(session), Some(scene)) = (&self.session, self.mount.scene_mut()) else {
            return;
        };
        if self.selection.is_seeded() {
            return;
        }
        self.selection.seed(scene, session.table_ids());
    }

    // ============================================================================
    // Interaction
    // ============================================================================

    /// Routes a pointer event. Lock state is evaluated for every event.
    ///
    /// Nothing is interactive until both the session and the layout are
    /// present, since the lock state and the seed depend on the session.
    pub fn dispatch(&mut self, event: PointerEvent) -> DispatchOutcome {
        let locked = self.is_ended();
        let scene = if self.load_error.is_none() && self.session.is_some() {
            self.mount.scene_mut()
        } else {
            None
        };
        self.dispatcher.dispatch(
            event,
            DispatchContext {
                scene,
                selection: &mut self.selection,
                viewport: &mut self.viewport,
                locked,
            },
        )
    }

    /// Toggles a table directly (keyboard, CLI). No-op once ended.
    pub fn toggle(&mut self, id: &TableId) -> ToggleOutcome {
        if self.session.is_none() || self.is_ended() || self.load_error.is_some() {
            return ToggleOutcome::Ignored;
        }
        match self.mount.scene_mut() {
            Some(scene) => self.selection.toggle(scene, id),
            None => ToggleOutcome::Ignored,
        }
    }

    /// Moves the camera directly, honouring the locked-view policy.
    pub fn move_camera(&mut self, delta: ViewportDelta) -> bool {
        if self.is_ended() && !self.dispatcher.allows_view_when_locked() {
            return false;
        }
        self.viewport.apply(delta);
        true
    }

    /// Returns the camera to home. Never touches the selection.
    pub fn reset_view(&mut self) {
        self.viewport.reset_to_home();
    }

    // ============================================================================
    // Saving
    // ============================================================================

    /// Prepares a save of the current selection.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(plan))`: There is something to persist
    /// - `Ok(None)`: Selection matches the baseline
    /// - `Err(SessionEnded)`: The session is read-only
    /// - `Err(Internal)`: Session or layout not loaded yet
    pub fn plan_save(&self) -> Result<Option<SavePlan>> {
        let Some(session) = &self.session else {
            return Err(SeatmapError::internal("session is not loaded"));
        };
        if self.lock.is_ended(session) {
            return Err(SeatmapError::SessionEnded(session.id.clone()));
        }
        let Some(baseline) = self.reconcilable_baseline() else {
            return Err(SeatmapError::internal("layout is not mounted"));
        };
        let diff = compute_diff(self.selection.selected(), &baseline);
        if diff.is_empty() {
            return Ok(None);
        }
        Ok(Some(SavePlan {
            generation: self.generation,
            session_id: session.id.clone(),
            diff,
        }))
    }

    /// Adopts the server's post-update session as the new baseline.
    ///
    /// Used after a successful save and after ending a session. The
    /// selection is left as is.
    pub fn apply_authoritative_session(&mut self, generation: Generation, session: Session) -> bool {
        if !self.accept(generation, "authoritative session") {
            return false;
        }
        self.baseline = Some(session.table_ids());
        self.session = Some(session);
        true
    }

    // ============================================================================
    // Observables
    // ============================================================================

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.mount.scene()
    }

    pub fn selection(&self) -> &TableSet {
        self.selection.selected()
    }

    pub fn baseline(&self) -> Option<&TableSet> {
        self.baseline.as_ref()
    }

    pub fn camera(&self) -> Camera {
        self.viewport.camera()
    }

    pub fn load_error(&self) -> Option<&SeatmapError> {
        self.load_error.as_ref()
    }

    pub fn session_state(&self) -> Option<SessionState> {
        self.session.as_ref().map(|s| self.lock.state(s))
    }

    /// Derived on every call from the session's end and the clock.
    pub fn is_ended(&self) -> bool {
        self.session
            .as_ref()
            .map(|s| self.lock.is_ended(s))
            .unwrap_or(false)
    }

    /// Selection differs from the baseline (as sets).
    ///
    /// Persisted ids the mounted layout lacks are left out of the
    /// comparison: they can never be toggled, so they are never removed.
    pub fn selection_dirty(&self) -> bool {
        match self.reconcilable_baseline() {
            Some(baseline) => self.selection.selected() != &baseline,
            None => false,
        }
    }

    /// The baseline restricted to the regions of the mounted scene.
    fn reconcilable_baseline(&self) -> Option<TableSet> {
        let (Some(baseline), Some(scene)) = (&self.baseline, self.mount.scene()) else {
            return None;
        };
        Some(
            baseline
                .iter()
                .filter(|id| scene.contains(id))
                .cloned()
                .collect(),
        )
    }

    pub fn view_dirty(&self) -> bool {
        self.viewport.is_view_dirty()
    }

    pub fn can_save(&self) -> bool {
        self.load_error.is_none() && self.selection_dirty() && !self.is_ended()
    }

    pub fn status(&self) -> ViewStatus {
        if let Some(error) = &self.load_error {
            return ViewStatus::LoadFailed(error.to_string());
        }
        match (&self.session, self.mount.scene()) {
            (Some(_), Some(scene)) if scene.is_blank() || scene.has_no_tables() => {
                ViewStatus::NoTables
            }
            (Some(_), Some(_)) => ViewStatus::Ready,
            _ => ViewStatus::Loading,
        }
    }

    /// Hint shown when the session has no table assigned.
    pub fn hint(&self) -> Option<String> {
        let state = self.session_state()?;
        if !self.selection.is_empty() {
            return None;
        }
        let hint = match state {
            SessionState::Pending => "The session does not yet have a table assigned",
            _ => "The session does not have a table assigned",
        };
        Some(hint.to_string())
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            status: self.status(),
            session_state: self.session_state(),
            selection_dirty: self.selection_dirty(),
            view_dirty: self.view_dirty(),
            ended: self.is_ended(),
            can_save: self.can_save(),
            selected: self.selection.selected().iter().cloned().collect(),
            baseline: self
                .baseline
                .as_ref()
                .map(|b| b.iter().cloned().collect())
                .unwrap_or_default(),
            camera: self.viewport.camera(),
            hint: self.hint(),
        }
    }

    /// Renders the mounted layout with markers and camera transform.
    pub fn render(&self) -> Result<Option<String>> {
        match self.mount.scene() {
            Some(scene) if self.load_error.is_none() => {
                scene.render(Some(&self.viewport.transform()))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::{IgnoreReason, PointerTarget};
    use crate::lock::ManualClock;
    use crate::session::{GroupRef, TableRef, VenueRef};
    use crate::table::table_set;
    use crate::viewport::Point;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::sync::Arc;

    const LAYOUT: &str = r#"<svg><g><rect id="T1" class="table"/><rect id="T2" class="table"/><rect id="T3" class="table"/></g></svg>"#;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 2, 12, 0, 0).unwrap()
    }

    fn session(tables: &[&str], end: Option<DateTime<Utc>>) -> Session {
        Session {
            id: "6f1c2a4e-0000-4000-8000-000000000001".into(),
            start: noon() - Duration::minutes(15),
            end,
            venue: VenueRef { id: "venue-1".into(), name: "Polymensa".into() },
            group: GroupRef { id: "group-1".into(), name: "Lunch crew".into() },
            tables: tables.iter().map(|t| TableRef { id: (*t).into() }).collect(),
        }
    }

    fn map_at(now: DateTime<Utc>) -> (SeatingMap, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(now));
        let map = SeatingMap::new(SeatmapConfig::default(), LockGate::new(clock.clone()));
        (map, clock)
    }

    fn loaded(tables: &[&str]) -> SeatingMap {
        let (mut map, _) = map_at(noon());
        let generation = map.begin_view();
        map.apply_session(generation, session(tables, None));
        map.apply_layout(generation, LAYOUT);
        map
    }

    fn tap(map: &mut SeatingMap, id: &str) -> DispatchOutcome {
        let at = Point::new(1.0, 1.0);
        map.dispatch(PointerEvent::Down {
            target: PointerTarget::Region(TableId::from(id)),
            position: at,
        });
        map.dispatch(PointerEvent::Up { position: at })
    }

    #[test]
    fn test_seed_after_session_then_layout() {
        let map = loaded(&["T1", "T2"]);
        assert_eq!(map.selection(), &table_set(["T1", "T2"]));
        assert!(!map.selection_dirty());
        assert_eq!(map.status(), ViewStatus::Ready);
        let scene = map.scene().unwrap();
        assert!(scene.region(&TableId::from("T1")).unwrap().is_marked());
        assert!(!scene.region(&TableId::from("T3")).unwrap().is_marked());
    }

    #[test]
    fn test_seed_when_layout_arrives_before_session() {
        let (mut map, _) = map_at(noon());
        let generation = map.begin_view();
        map.apply_layout(generation, LAYOUT);
        assert!(map.selection().is_empty());
        assert_eq!(map.status(), ViewStatus::Loading);

        map.apply_session(generation, session(&["T3"], None));
        assert_eq!(map.selection(), &table_set(["T3"]));
    }

    #[test]
    fn test_persisted_tables_missing_from_layout_are_never_removed() {
        let (mut map, _) = map_at(noon());
        let generation = map.begin_view();
        map.apply_session(generation, session(&["T1", "T9"], None));
        map.apply_layout(generation, LAYOUT);

        assert_eq!(map.selection(), &table_set(["T1"]));
        assert!(!map.selection_dirty());
        assert!(!map.can_save());
        assert_eq!(map.plan_save().unwrap(), None);

        tap(&mut map, "T2");
        let plan = map.plan_save().unwrap().unwrap();
        assert_eq!(plan.diff.to_add, table_set(["T2"]));
        assert!(plan.diff.to_remove.is_empty());

        map.apply_authoritative_session(plan.generation, session(&["T1", "T2", "T9"], None));
        assert!(!map.selection_dirty());
    }

    #[test]
    fn test_no_interaction_before_session_arrives() {
        let (mut map, _) = map_at(noon());
        let generation = map.begin_view();
        map.apply_layout(generation, LAYOUT);
        assert_eq!(map.status(), ViewStatus::Loading);

        assert_eq!(tap(&mut map, "T2"), DispatchOutcome::Ignored(IgnoreReason::NotMounted));
        assert_eq!(map.toggle(&TableId::from("T3")), ToggleOutcome::Ignored);
        assert!(map.selection().is_empty());

        map.apply_session(generation, session(&["T1"], Some(noon() - Duration::minutes(1))));

        assert!(map.is_ended());
        assert_eq!(map.selection(), &table_set(["T1"]));
        assert!(map.scene().unwrap().region(&TableId::from("T1")).unwrap().is_marked());
        assert!(!map.scene().unwrap().region(&TableId::from("T2")).unwrap().is_marked());
        assert!(!map.selection_dirty());
    }

    #[test]
    fn test_late_session_refresh_does_not_reseed() {
        let mut map = loaded(&["T1"]);
        let generation = map.generation();
        tap(&mut map, "T1");
        assert!(map.selection().is_empty());

        map.apply_session(generation, session(&["T1", "T2"], None));

        assert!(map.selection().is_empty());
        assert_eq!(map.baseline(), Some(&table_set(["T1"])));
    }

    #[test]
    fn test_scenario_toggle_and_plan() {
        let mut map = loaded(&["T1", "T2"]);
        tap(&mut map, "T2");
        tap(&mut map, "T3");

        assert_eq!(map.selection(), &table_set(["T1", "T3"]));
        assert!(map.selection_dirty());
        assert!(map.can_save());

        let plan = map.plan_save().unwrap().unwrap();
        assert_eq!(plan.diff.to_add, table_set(["T3"]));
        assert_eq!(plan.diff.to_remove, table_set(["T2"]));
        assert_eq!(plan.generation, map.generation());
    }

    #[test]
    fn test_double_toggle_returns_to_clean() {
        let mut map = loaded(&["T1"]);
        tap(&mut map, "T2");
        tap(&mut map, "T2");
        assert!(!map.selection_dirty());
        assert_eq!(map.plan_save().unwrap(), None);
    }

    #[test]
    fn test_commit_save_replaces_baseline_with_server_list() {
        let mut map = loaded(&["T1", "T2"]);
        tap(&mut map, "T2");
        let plan = map.plan_save().unwrap().unwrap();

        assert!(map.apply_authoritative_session(plan.generation, session(&["T1"], None)));

        assert_eq!(map.baseline(), Some(&table_set(["T1"])));
        assert!(!map.selection_dirty());
        assert!(!map.can_save());
    }

    #[test]
    fn test_server_normalisation_keeps_selection_dirty() {
        let mut map = loaded(&["T1"]);
        tap(&mut map, "T3");
        let plan = map.plan_save().unwrap().unwrap();

        map.apply_authoritative_session(plan.generation, session(&["T1"], None));

        assert!(map.selection_dirty());
        assert_eq!(map.selection(), &table_set(["T1", "T3"]));
    }

    #[test]
    fn test_ended_session_locks_toggles_and_save() {
        let (mut map, _) = map_at(noon());
        let generation = map.begin_view();
        map.apply_session(generation, session(&["T1"], Some(noon() - Duration::minutes(1))));
        map.apply_layout(generation, LAYOUT);

        assert!(map.is_ended());
        assert_eq!(tap(&mut map, "T1"), DispatchOutcome::Ignored(IgnoreReason::Locked));
        assert_eq!(map.toggle(&TableId::from("T2")), ToggleOutcome::Ignored);
        assert_eq!(map.selection(), &table_set(["T1"]));
        assert!(matches!(map.plan_save(), Err(SeatmapError::SessionEnded(_))));
        assert!(!map.can_save());
    }

    #[test]
    fn test_lock_is_recomputed_as_time_passes() {
        let (mut map, clock) = map_at(noon());
        let generation = map.begin_view();
        map.apply_session(generation, session(&[], Some(noon() + Duration::minutes(5))));
        map.apply_layout(generation, LAYOUT);

        assert!(matches!(map.toggle(&TableId::from("T1")), ToggleOutcome::Selected(_)));
        clock.advance(Duration::minutes(10));
        assert!(map.is_ended());
        assert_eq!(map.toggle(&TableId::from("T1")), ToggleOutcome::Ignored);
        assert_eq!(map.selection(), &table_set(["T1"]));
    }

    #[test]
    fn test_reset_view_keeps_selection() {
        let mut map = loaded(&["T1"]);
        tap(&mut map, "T2");
        map.move_camera(ViewportDelta::Pan { dx: 10.0, dy: 0.0 });
        assert!(map.view_dirty());

        map.reset_view();

        assert!(!map.view_dirty());
        assert_eq!(map.selection(), &table_set(["T1", "T2"]));
        assert!(map.selection_dirty());
    }

    #[test]
    fn test_stale_generation_results_are_discarded() {
        let (mut map, _) = map_at(noon());
        let old = map.begin_view();
        let current = map.begin_view();

        assert!(!map.apply_session(old, session(&["T1"], None)));
        assert!(!map.apply_layout(old, LAYOUT));
        assert!(map.session().is_none());
        assert!(map.scene().is_none());

        assert!(map.apply_session(current, session(&["T2"], None)));
        map.teardown();
        assert!(!map.apply_layout(current, LAYOUT));
        assert!(map.session().is_none());
    }

    #[test]
    fn test_load_failure_is_passive() {
        let (mut map, _) = map_at(noon());
        let generation = map.begin_view();
        map.apply_session(generation, session(&["T1"], None));
        map.apply_load_failure(generation, SeatmapError::LayoutLoad("503".into()));

        assert!(matches!(map.status(), ViewStatus::LoadFailed(_)));
        assert_eq!(tap(&mut map, "T1"), DispatchOutcome::Ignored(IgnoreReason::NotMounted));
        assert_eq!(map.render().unwrap(), None);
        assert!(!map.can_save());
    }

    #[test]
    fn test_layout_without_tables_reports_no_tables() {
        let (mut map, _) = map_at(noon());
        let generation = map.begin_view();
        map.apply_session(generation, session(&["T1"], None));
        map.apply_layout(generation, "<svg><g/></svg>");

        assert_eq!(map.status(), ViewStatus::NoTables);
        assert_eq!(
            map.status().message().as_deref(),
            Some("There are no tables in this layout")
        );
        assert!(map.selection().is_empty());
    }

    #[test]
    fn test_hint_for_pending_session_without_tables() {
        let (mut map, _) = map_at(noon() - Duration::hours(2));
        let generation = map.begin_view();
        map.apply_session(generation, session(&[], None));
        map.apply_layout(generation, LAYOUT);

        assert_eq!(map.session_state(), Some(SessionState::Pending));
        assert_eq!(
            map.hint().as_deref(),
            Some("The session does not yet have a table assigned")
        );
    }

    #[test]
    fn test_render_reflects_selection_and_camera() {
        let mut map = loaded(&["T2"]);
        map.move_camera(ViewportDelta::Pan { dx: 3.0, dy: 4.0 });
        let svg = map.render().unwrap().unwrap();
        assert!(svg.contains(r#"<g transform="translate(3,4) scale(1)">"#));
        assert!(svg.contains(r#"<rect id="T2" class="table" data-selected="true"/>"#));
        assert!(svg.contains(r#"<rect id="T1" class="table"/>"#));
    }
}
