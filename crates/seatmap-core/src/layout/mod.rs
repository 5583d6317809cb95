//! Venue layouts.
//!
//! - `provider`: Trait for fetching raw layout markup by venue id
//! - `scene`: Parsed, addressable layouts and the mount that owns them

mod provider;
pub mod scene;

pub use provider::LayoutProvider;
pub use scene::{MountOutcome, Scene, SceneMount, TableRegion};
