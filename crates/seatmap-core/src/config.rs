use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root of `config.toml`.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct SeatmapConfig {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub viewport: ViewportSettings,
    #[serde(default)]
    pub interaction: InteractionSettings,
    #[serde(default)]
    pub layouts: LayoutSettings,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ViewportSettings {
    #[serde(default = "default_min_scale")]
    pub min_scale: f64,
    #[serde(default = "default_max_scale")]
    pub max_scale: f64,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            min_scale: default_min_scale(),
            max_scale: default_max_scale(),
        }
    }
}

fn default_min_scale() -> f64 {
    0.25
}

fn default_max_scale() -> f64 {
    8.0
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct InteractionSettings {
    /// Pointer travel (screen px) after which a press becomes a drag.
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold: f64,
    /// Whether panning/zooming stays available once the session has ended.
    #[serde(default = "default_allow_view_when_locked")]
    pub allow_view_when_locked: bool,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            drag_threshold: default_drag_threshold(),
            allow_view_when_locked: default_allow_view_when_locked(),
        }
    }
}

fn default_drag_threshold() -> f64 {
    4.0
}

fn default_allow_view_when_locked() -> bool {
    true
}

/// Offline layout source.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct LayoutSettings {
    /// Directory holding `<venue_id>.svg` files. When set, layouts are read
    /// from disk instead of the backend.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}
