//! Core domain of the seating-map selection engine.
//!
//! A venue layout is mounted as a [`layout::Scene`]; the user toggles table
//! regions, pans and zooms the camera, and the selection is reconciled
//! against the tables persisted for the session. [`SeatingMap`] ties these
//! together for one session view.

pub mod config;
pub mod error;
pub mod interaction;
pub mod layout;
pub mod lock;
pub mod notification;
pub mod reconciliation;
pub mod seating_map;
pub mod selection;
pub mod session;
pub mod table;
pub mod viewport;

// Re-export common types
pub use error::{Result, SeatmapError};
pub use seating_map::{Generation, SavePlan, SeatingMap, ViewSnapshot, ViewStatus};
pub use table::{TableId, TableSet};
