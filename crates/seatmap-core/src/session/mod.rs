//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: Session record and its derived interactivity state
//! - `repository`: Provider and reconciliation traits for remote sessions
//!
//! # Usage
//!
//! ```ignore
//! use seatmap_core::session::{Session, SessionState, SessionProvider};
//! ```

mod model;
mod repository;

// Re-export public API
pub use model::{GroupRef, Session, SessionState, TableRef, VenueRef};
pub use repository::{SessionProvider, TableReconciliationApi};
