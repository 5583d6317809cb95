//! Path management for seatmap configuration files.
//!
//! Paths are resolved with the `dirs` crate so the layout follows the
//! platform conventions (XDG on Linux, Application Support on macOS,
//! AppData on Windows).

use std::path::PathBuf;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Path management for seatmap.
///
/// # Directory Structure
///
/// ```text
/// ~/.config/seatmap/           # Config directory
/// ├── config.toml              # Application configuration
/// └── layouts/                 # Default offline layouts (<venue_id>.svg)
/// ```
pub struct SeatmapPaths;

impl SeatmapPaths {
    const APP_DIR: &'static str = "seatmap";

    /// Returns the seatmap configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/seatmap/`)
    /// - `Err(PathError::ConfigDirNotFound)`: Could not determine directory
    pub fn config_dir() -> Result<PathBuf, PathError> {
        dirs::config_dir()
            .map(|dir| dir.join(Self::APP_DIR))
            .ok_or(PathError::ConfigDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the default directory for offline layouts.
    pub fn layouts_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("layouts"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_is_inside_config_dir() {
        let (Ok(dir), Ok(file)) = (SeatmapPaths::config_dir(), SeatmapPaths::config_file()) else {
            return;
        };
        assert!(dir.ends_with("seatmap"));
        assert_eq!(file.parent(), Some(dir.as_path()));
        assert!(file.ends_with("config.toml"));
    }
}
