//! Mounted venue layouts.
//!
//! A [`Scene`] is the parsed form of a venue's SVG markup. Every element whose
//! `class` list contains `table` and that carries an `id` is a table region,
//! addressable by that id. Regions carry a single visual marker
//! (`data-selected`) that is written back out when the scene is rendered.

use crate::error::{Result, SeatmapError};
use crate::table::TableId;
use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::collections::BTreeMap;

/// Class token identifying table regions.
pub const TABLE_CLASS: &str = "table";

/// Attribute mirroring the selection state onto a region.
pub const SELECTED_ATTR: &str = "data-selected";

/// A selectable sub-area of a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRegion {
    pub id: TableId,
    marked: bool,
}

impl TableRegion {
    fn new(id: TableId) -> Self {
        Self { id, marked: false }
    }

    /// Whether the region currently carries the selected marker.
    pub fn is_marked(&self) -> bool {
        self.marked
    }
}

/// Parsed, addressable layout.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    markup: String,
    regions: BTreeMap<TableId, TableRegion>,
    blank: bool,
}

impl Scene {
    /// A scene that renders nothing and has no regions.
    pub fn blank() -> Self {
        Self {
            markup: String::new(),
            regions: BTreeMap::new(),
            blank: true,
        }
    }

    /// Parses layout markup.
    ///
    /// Empty or malformed markup yields a [`Scene::blank`] scene; this never
    /// fails so that a broken layout degrades to a non-interactive view.
    pub fn parse(markup: &str) -> Self {
        if markup.trim().is_empty() {
            tracing::debug!("[Scene] Empty layout markup, mounting blank scene");
            return Self::blank();
        }

        match collect_region_ids(markup) {
            Ok(ids) => {
                let mut regions = BTreeMap::new();
                for id in ids {
                    if regions.contains_key(&id) {
                        tracing::warn!("[Scene] Duplicate table region id '{}' ignored", id);
                        continue;
                    }
                    regions.insert(id.clone(), TableRegion::new(id));
                }
                tracing::debug!("[Scene] Parsed layout with {} table regions", regions.len());
                Self {
                    markup: markup.to_string(),
                    regions,
                    blank: false,
                }
            }
            Err(e) => {
                tracing::warn!("[Scene] Malformed layout markup, mounting blank scene: {}", e);
                Self::blank()
            }
        }
    }

    /// Raw markup this scene was mounted from (empty for blank scenes).
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// True when nothing renders (empty or malformed markup).
    pub fn is_blank(&self) -> bool {
        self.blank
    }

    /// True when the layout contains no identifiable table regions.
    pub fn has_no_tables(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn contains(&self, id: &TableId) -> bool {
        self.regions.contains_key(id)
    }

    pub fn region(&self, id: &TableId) -> Option<&TableRegion> {
        self.regions.get(id)
    }

    pub fn regions(&self) -> impl Iterator<Item = &TableRegion> {
        self.regions.values()
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Writes the selected marker of a region.
    ///
    /// Only the selection store calls this, so markers never drift from the
    /// selection. Returns `false` when no such region exists.
    pub(crate) fn set_marker(&mut self, id: &TableId, marked: bool) -> bool {
        match self.regions.get_mut(id) {
            Some(region) => {
                region.marked = marked;
                true
            }
            None => false,
        }
    }

    /// Serializes the scene with current markers and an optional transform.
    ///
    /// Each region gets `data-selected="true"` when marked and loses the
    /// attribute otherwise. The transform is written onto the first `<g>`
    /// element, which holds the drawable content.
    ///
    /// # Returns
    ///
    /// - `Ok(None)`: The scene is blank
    /// - `Ok(Some(svg))`: Rendered markup
    pub fn render(&self, transform: Option<&str>) -> Result<Option<String>> {
        if self.blank {
            return Ok(None);
        }

        let mut reader = Reader::from_str(&self.markup);
        let mut writer = Writer::new(Vec::new());
        let mut transform_pending = transform;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| SeatmapError::internal(format!("layout re-read failed: {}", e)))?;
            let event = match event {
                Event::Eof => break,
                Event::Start(e) => Event::Start(self.rewrite_element(&e, &mut transform_pending)),
                Event::Empty(e) => Event::Empty(self.rewrite_element(&e, &mut transform_pending)),
                other => other,
            };
            writer
                .write_event(event)
                .map_err(|e| SeatmapError::internal(format!("layout render failed: {}", e)))?;
        }

        let bytes = writer.into_inner();
        String::from_utf8(bytes)
            .map(Some)
            .map_err(|e| SeatmapError::internal(format!("rendered layout is not UTF-8: {}", e)))
    }

    fn rewrite_element(
        &self,
        element: &BytesStart<'_>,
        transform_pending: &mut Option<&str>,
    ) -> BytesStart<'static> {
        let region = region_id(element).and_then(|id| self.regions.get(&id));
        let transform = if element.name().as_ref() == b"g" {
            transform_pending.take()
        } else {
            None
        };

        let name = String::from_utf8_lossy(element.name().as_ref()).into_owned();
        let mut out = BytesStart::new(name);
        for attr in element.attributes().flatten() {
            let key = attr.key.as_ref();
            let overridden = (region.is_some() && key == SELECTED_ATTR.as_bytes())
                || (transform.is_some() && key == b"transform");
            if !overridden {
                out.push_attribute(attr);
            }
        }
        if let Some(region) = region {
            if region.marked {
                out.push_attribute((SELECTED_ATTR, "true"));
            }
        }
        if let Some(transform) = transform {
            out.push_attribute(("transform", transform));
        }
        out
    }
}

/// Returns the table id of an element when it is a table region.
fn region_id(element: &BytesStart<'_>) -> Option<TableId> {
    let mut id = None;
    let mut is_table = false;
    for attr in element.attributes().flatten() {
        match attr.key.as_ref() {
            b"id" => {
                let value = String::from_utf8_lossy(&attr.value).trim().to_string();
                if !value.is_empty() {
                    id = Some(TableId::new(value));
                }
            }
            b"class" => {
                is_table = String::from_utf8_lossy(&attr.value)
                    .split_whitespace()
                    .any(|class| class == TABLE_CLASS);
            }
            _ => {}
        }
    }
    if is_table { id } else { None }
}

/// Walks the markup once, collecting region ids in document order.
fn collect_region_ids(markup: &str) -> std::result::Result<Vec<TableId>, String> {
    let mut reader = Reader::from_str(markup);
    let mut ids = Vec::new();
    let mut depth: usize = 0;
    let mut saw_element = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                saw_element = true;
                depth += 1;
                ids.extend(region_id(&e));
            }
            Ok(Event::Empty(e)) => {
                saw_element = true;
                ids.extend(region_id(&e));
            }
            Ok(Event::End(_)) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| "unexpected closing tag".to_string())?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                let pos = reader.buffer_position();
                return Err(format!("XML parse error at byte {}: {}", pos, e));
            }
        }
    }

    if !saw_element {
        return Err("no elements in markup".to_string());
    }
    if depth != 0 {
        return Err(format!("{} unclosed element(s) at end of markup", depth));
    }
    Ok(ids)
}

/// Outcome of [`SceneMount::mount`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
    /// New markup was parsed and replaced the previous scene.
    Mounted,
    /// Identical markup was already mounted; nothing changed.
    Unchanged,
}

/// Holds the live scene and re-mounts only when the markup changes.
#[derive(Debug, Default)]
pub struct SceneMount {
    scene: Option<Scene>,
}

impl SceneMount {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounts markup, parsing it only when it differs from the current one.
    pub fn mount(&mut self, markup: &str) -> MountOutcome {
        if let Some(scene) = &self.scene {
            let same = if scene.is_blank() {
                markup.trim().is_empty()
            } else {
                scene.markup() == markup
            };
            if same {
                return MountOutcome::Unchanged;
            }
        }
        self.scene = Some(Scene::parse(markup));
        MountOutcome::Mounted
    }

    pub fn is_mounted(&self) -> bool {
        self.scene.is_some()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn scene_mut(&mut self) -> Option<&mut Scene> {
        self.scene.as_mut()
    }

    /// Drops the mounted scene.
    pub fn unmount(&mut self) {
        self.scene = None;
    }
}
