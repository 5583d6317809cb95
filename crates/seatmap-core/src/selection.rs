//! Working table selection and its projection onto scene markers.
//!
//! The store is the single source of truth. Markers on the scene are only
//! ever written from here and never read back.

use crate::layout::Scene;
use crate::table::{TableId, TableSet};

/// Result of a toggle request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    Selected(TableId),
    Deselected(TableId),
    /// The id does not name a region of the mounted scene.
    Ignored,
}

/// The set of currently selected tables.
#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    selected: TableSet,
    seeded: bool,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> &TableSet {
        &self.selected
    }

    pub fn contains(&self, id: &TableId) -> bool {
        self.selected.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    /// Flips one table in or out of the selection, updating its marker.
    ///
    /// Ids that are not regions of `scene` are ignored so the selection
    /// never holds a table the layout does not show.
    pub fn toggle(&mut self, scene: &mut Scene, id: &TableId) -> ToggleOutcome {
        if !scene.contains(id) {
            tracing::debug!("[SelectionStore] Ignoring toggle of unknown table '{}'", id);
            return ToggleOutcome::Ignored;
        }

        if self.selected.remove(id) {
            scene.set_marker(id, false);
            ToggleOutcome::Deselected(id.clone())
        } else {
            self.selected.insert(id.clone());
            scene.set_marker(id, true);
            ToggleOutcome::Selected(id.clone())
        }
    }

    /// Seeds the selection from persisted tables.
    ///
    /// Runs at most once, and only while the selection is empty, so a late
    /// load can never overwrite user edits. Ids missing from the layout are
    /// dropped.
    ///
    /// # Returns
    ///
    /// `true` if the seed was applied.
    pub fn seed<I>(&mut self, scene: &mut Scene, initial: I) -> bool
    where
        I: IntoIterator<Item = TableId>,
    {
        if self.seeded || !self.selected.is_empty() {
            tracing::debug!("[SelectionStore] Seed skipped: selection already initialised");
            return false;
        }

        for id in initial {
            if scene.contains(&id) {
                self.selected.insert(id);
            } else {
                tracing::warn!(
                    "[SelectionStore] Persisted table '{}' is not part of the layout, dropping",
                    id
                );
            }
        }
        self.seeded = true;
        self.sync(scene);

        tracing::debug!("[SelectionStore] Seeded with {} tables", self.selected.len());
        true
    }

    /// Re-projects the selection onto every region marker of `scene`.
    pub fn sync(&self, scene: &mut Scene) {
        let ids: Vec<TableId> = scene.regions().map(|r| r.id.clone()).collect();
        for id in ids {
            let marked = self.selected.contains(&id);
            scene.set_marker(&id, marked);
        }
    }

    /// Drops selected ids the scene no longer contains, then re-projects.
    ///
    /// Used after a different layout was mounted.
    pub fn retain_in(&mut self, scene: &mut Scene) {
        self.selected.retain(|id| scene.contains(id));
        self.sync(scene);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::table_set;

    fn scene() -> Scene {
        Scene::parse(
            r#"<svg><g><rect id="T1" class="table"/><rect id="T2" class="table"/><rect id="T3" class="table"/></g></svg>"#,
        )
    }

    fn marked(scene: &Scene) -> TableSet {
        scene
            .regions()
            .filter(|r| r.is_marked())
            .map(|r| r.id.clone())
            .collect()
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut scene = scene();
        let mut store = SelectionStore::new();
        let t1 = TableId::from("T1");

        assert_eq!(store.toggle(&mut scene, &t1), ToggleOutcome::Selected(t1.clone()));
        assert!(store.contains(&t1));
        assert!(scene.region(&t1).unwrap().is_marked());

        assert_eq!(store.toggle(&mut scene, &t1), ToggleOutcome::Deselected(t1.clone()));
        assert!(store.is_empty());
        assert!(!scene.region(&t1).unwrap().is_marked());
    }

    #[test]
    fn test_toggle_sequence_reduces_to_symmetric_difference() {
        let mut scene = scene();
        let mut store = SelectionStore::new();
        for id in ["T1", "T2", "T1", "T3", "T2", "T2"] {
            store.toggle(&mut scene, &TableId::from(id));
        }
        // T1 twice (out), T2 three times (in), T3 once (in).
        assert_eq!(store.selected(), &table_set(["T2", "T3"]));
        assert_eq!(marked(&scene), table_set(["T2", "T3"]));
    }

    #[test]
    fn test_toggle_unknown_id_is_ignored() {
        let mut scene = scene();
        let mut store = SelectionStore::new();
        assert_eq!(store.toggle(&mut scene, &TableId::from("T9")), ToggleOutcome::Ignored);
        assert!(store.is_empty());
    }

    #[test]
    fn test_seed_applies_markers_and_drops_unknown_ids() {
        let mut scene = scene();
        let mut store = SelectionStore::new();
        assert!(store.seed(&mut scene, table_set(["T1", "T3", "gone"])));
        assert_eq!(store.selected(), &table_set(["T1", "T3"]));
        assert_eq!(marked(&scene), table_set(["T1", "T3"]));
    }

    #[test]
    fn test_seed_is_noop_once_selection_non_empty() {
        let mut scene = scene();
        let mut store = SelectionStore::new();
        store.toggle(&mut scene, &TableId::from("T2"));

        assert!(!store.seed(&mut scene, table_set(["T1"])));
        assert_eq!(store.selected(), &table_set(["T2"]));
    }

    #[test]
    fn test_seed_runs_only_once_even_when_empty() {
        let mut scene = scene();
        let mut store = SelectionStore::new();
        assert!(store.seed(&mut scene, TableSet::new()));
        assert!(!store.seed(&mut scene, table_set(["T1"])));
        assert!(store.is_empty());
    }

    #[test]
    fn test_retain_in_new_layout() {
        let mut scene = scene();
        let mut store = SelectionStore::new();
        store.seed(&mut scene, table_set(["T1", "T2"]));

        let mut smaller = Scene::parse(r#"<svg><rect id="T2" class="table"/></svg>"#);
        store.retain_in(&mut smaller);

        assert_eq!(store.selected(), &table_set(["T2"]));
        assert_eq!(marked(&smaller), table_set(["T2"]));
    }
}
