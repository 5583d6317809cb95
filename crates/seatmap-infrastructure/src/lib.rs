//! Infrastructure layer for Seatmap.
//!
//! Backend transport, file-based layouts, configuration loading and
//! notification output.

pub mod config_loader;
pub mod directory_layout_provider;
pub mod dto;
pub mod http_client;
pub mod paths;
pub mod tracing_notification_sink;

pub use config_loader::{load_config, load_config_from};
pub use directory_layout_provider::DirectoryLayoutProvider;
pub use http_client::HttpBackendClient;
pub use paths::SeatmapPaths;
pub use tracing_notification_sink::TracingNotificationSink;
