//! Loading of `config.toml`.

use crate::paths::SeatmapPaths;
use seatmap_core::config::SeatmapConfig;
use seatmap_core::error::{Result, SeatmapError};
use std::path::Path;

/// Loads the configuration from the default location.
///
/// A missing file yields the defaults.
///
/// # Errors
///
/// - `SeatmapError::Config` if the config directory cannot be resolved or
///   the file does not parse
/// - `SeatmapError::Io` if the file exists but cannot be read
pub fn load_config() -> Result<SeatmapConfig> {
    let path = SeatmapPaths::config_file().map_err(|e| SeatmapError::config(e.to_string()))?;
    load_config_from(&path)
}

/// Loads the configuration from an explicit path.
///
/// Missing and empty files both yield the defaults.
pub fn load_config_from(path: &Path) -> Result<SeatmapConfig> {
    if !path.exists() {
        tracing::debug!("[Config] {} not found, using defaults", path.display());
        return Ok(SeatmapConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| SeatmapError::io(format!("Failed to read {}: {}", path.display(), e)))?;
    if content.trim().is_empty() {
        return Ok(SeatmapConfig::default());
    }

    let config: SeatmapConfig = toml::from_str(&content)
        .map_err(|e| SeatmapError::config(format!("Invalid {}: {}", path.display(), e)))?;
    if config.viewport.min_scale <= 0.0 || config.viewport.min_scale > config.viewport.max_scale {
        return Err(SeatmapError::config(format!(
            "viewport scale range [{}, {}] is invalid",
            config.viewport.min_scale, config.viewport.max_scale
        )));
    }

    tracing::debug!("[Config] Loaded {}", path.display());
    Ok(config)
}
