use anyhow::{Context, Result};
use seatmap_application::SessionViewUseCase;
use seatmap_core::config::SeatmapConfig;
use seatmap_core::layout::LayoutProvider;
use seatmap_core::lock::LockGate;
use seatmap_core::{SeatingMap, ViewSnapshot};
use seatmap_infrastructure::{
    DirectoryLayoutProvider, HttpBackendClient, TracingNotificationSink, load_config,
    load_config_from,
};
use std::path::Path;
use std::sync::Arc;

pub fn read_config(path: Option<&Path>) -> Result<SeatmapConfig> {
    let config = match path {
        Some(path) => load_config_from(path),
        None => load_config(),
    };
    config.context("Failed to load configuration")
}

/// Wires the use case to the backend. Layouts come from disk when a layout
/// directory is configured.
pub fn build_usecase(config: SeatmapConfig) -> SessionViewUseCase {
    let backend = Arc::new(HttpBackendClient::new(&config.api));
    let layouts: Arc<dyn LayoutProvider> = match &config.layouts.directory {
        Some(dir) => Arc::new(DirectoryLayoutProvider::new(dir.clone())),
        None => backend.clone() as Arc<dyn LayoutProvider>,
    };
    let map = SeatingMap::new(config, LockGate::default());
    SessionViewUseCase::new(
        backend.clone(),
        layouts,
        backend,
        Arc::new(TracingNotificationSink),
        map,
    )
}

pub fn join_ids<'a>(ids: impl IntoIterator<Item = &'a seatmap_core::TableId>) -> String {
    let joined: Vec<&str> = ids.into_iter().map(|id| id.as_str()).collect();
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined.join(", ")
    }
}

pub fn print_snapshot(session_id: &str, snapshot: &ViewSnapshot) {
    println!("Session:   {}", session_id);
    if let Some(state) = snapshot.session_state {
        println!("State:     {}", state.label());
    }
    if let Some(message) = snapshot.status.message() {
        println!("Status:    {}", message);
    }
    println!("Selected:  {}", join_ids(&snapshot.selected));
    println!("Persisted: {}", join_ids(&snapshot.baseline));
    if snapshot.selection_dirty {
        println!("Unsaved changes");
    }
    if let Some(hint) = &snapshot.hint {
        println!("{}", hint);
    }
}
