use seatmap_core::layout::LayoutProvider;
use seatmap_core::SeatmapError;
use seatmap_infrastructure::{DirectoryLayoutProvider, load_config_from};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_missing_config_yields_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config = load_config_from(&temp_dir.path().join("config.toml")).unwrap();
    assert_eq!(config, Default::default());
}

#[test]
fn test_empty_config_yields_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "  \n").unwrap();

    let config = load_config_from(&path).unwrap();
    assert_eq!(config.api.timeout_secs, 10);
    assert_eq!(config.viewport.max_scale, 8.0);
}

#[test]
fn test_partial_config_keeps_other_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[api]
base_url = "https://mensa.example"

[interaction]
allow_view_when_locked = false

[layouts]
directory = "/srv/layouts"
"#,
    )
    .unwrap();

    let config = load_config_from(&path).unwrap();
    assert_eq!(config.api.base_url, "https://mensa.example");
    assert_eq!(config.api.timeout_secs, 10);
    assert!(!config.interaction.allow_view_when_locked);
    assert_eq!(config.interaction.drag_threshold, 4.0);
    assert_eq!(
        config.layouts.directory.as_deref(),
        Some(std::path::Path::new("/srv/layouts"))
    );
}

#[test]
fn test_malformed_config_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "[api\nbase_url = 3").unwrap();

    let err = load_config_from(&path).unwrap_err();
    assert!(err.is_config());
}

#[test]
fn test_inverted_scale_range_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, "[viewport]\nmin_scale = 4.0\nmax_scale = 2.0\n").unwrap();

    assert!(load_config_from(&path).unwrap_err().is_config());
}

#[tokio::test]
async fn test_directory_provider_reads_venue_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("venue-1.svg"),
        r#"<svg><g><rect id="T1" class="table"/></g></svg>"#,
    )
    .unwrap();
    let provider = DirectoryLayoutProvider::new(temp_dir.path());

    let markup = provider.fetch_layout("venue-1").await.unwrap();
    assert!(markup.contains(r#"id="T1""#));
}

#[tokio::test]
async fn test_directory_provider_unknown_venue_is_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let provider = DirectoryLayoutProvider::new(temp_dir.path());

    let err = provider.fetch_layout("venue-9").await.unwrap_err();
    assert_eq!(err, SeatmapError::not_found("Venue", "venue-9"));

    let err = provider.fetch_layout("../secrets").await.unwrap_err();
    assert!(err.is_not_found());
}
