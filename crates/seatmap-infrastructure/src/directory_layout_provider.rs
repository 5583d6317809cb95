//! Layout provider backed by a directory of SVG files.

use async_trait::async_trait;
use seatmap_core::error::{Result, SeatmapError};
use seatmap_core::layout::LayoutProvider;
use std::path::{Path, PathBuf};

/// Reads `<root>/<venue_id>.svg`.
#[derive(Debug, Clone)]
pub struct DirectoryLayoutProvider {
    root: PathBuf,
}

impl DirectoryLayoutProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn layout_path(&self, venue_id: &str) -> Result<PathBuf> {
        // Venue ids become file names; refuse anything that could leave the root.
        if venue_id.is_empty()
            || venue_id.contains(['/', '\\'])
            || venue_id.starts_with('.')
        {
            return Err(SeatmapError::not_found("Venue", venue_id));
        }
        Ok(self.root.join(format!("{}.svg", venue_id)))
    }
}

#[async_trait]
impl LayoutProvider for DirectoryLayoutProvider {
    async fn fetch_layout(&self, venue_id: &str) -> Result<String> {
        let path = self.layout_path(venue_id)?;
        tracing::debug!("[DirectoryLayoutProvider] Reading {}", path.display());
        match tokio::fs::read_to_string(&path).await {
            Ok(markup) => Ok(markup),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(SeatmapError::not_found("Venue", venue_id))
            }
            Err(e) => Err(SeatmapError::io(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
