//! Application layer for Seatmap.
//!
//! This crate provides the use case that coordinates the seating-map domain
//! with the session, layout and table providers supplied by infrastructure.

pub mod session_view_usecase;

pub use session_view_usecase::{SaveOutcome, SessionViewUseCase};
