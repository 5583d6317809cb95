//! Session domain model.
//!
//! A session is a planned gathering of a group at a venue. The seating map
//! only cares about its time window, its venue and the tables persisted for it.

use crate::table::{TableId, TableSet};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference to the venue (mensa) a session takes place at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueRef {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Reference to the group that owns a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRef {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// A table persisted for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    pub id: TableId,
}

/// Represents a session in the application's domain layer.
///
/// This is the "pure" domain model the engine operates on, independent of
/// the wire format the backend uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// When the gathering starts
    pub start: DateTime<Utc>,
    /// When the session was ended, if it has been
    pub end: Option<DateTime<Utc>>,
    /// Venue whose layout is shown
    pub venue: VenueRef,
    /// Owning group
    pub group: GroupRef,
    /// Tables currently persisted for this session
    #[serde(default)]
    pub tables: Vec<TableRef>,
}

impl Session {
    /// Returns the persisted tables as a set, the source of the baseline.
    pub fn table_ids(&self) -> TableSet {
        self.tables.iter().map(|t| t.id.clone()).collect()
    }

    /// Derives the interactivity state at the given instant.
    pub fn state_at(&self, now: DateTime<Utc>) -> SessionState {
        SessionState::derive(self.start, self.end, now)
    }
}

/// Interactivity state of a session, derived from its time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Start lies in the future.
    Pending,
    /// Started and not ended.
    Active,
    /// Terminal, read-only.
    Ended,
}

impl SessionState {
    /// Computes the state from timestamps. An end in the past always wins.
    pub fn derive(
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Self {
        match end {
            Some(end) if end < now => Self::Ended,
            _ if start > now => Self::Pending,
            _ => Self::Active,
        }
    }

    pub fn is_ended(self) -> bool {
        self == Self::Ended
    }

    /// Badge text shown next to the session information.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "planned session",
            Self::Active => "active session",
            Self::Ended => "session ended",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_state_pending_before_start() {
        assert_eq!(SessionState::derive(at(12), None, at(11)), SessionState::Pending);
    }

    #[test]
    fn test_state_active_without_end() {
        assert_eq!(SessionState::derive(at(12), None, at(13)), SessionState::Active);
        assert_eq!(
            SessionState::derive(at(12), Some(at(14)), at(13)),
            SessionState::Active
        );
    }

    #[test]
    fn test_state_ended_once_end_has_passed() {
        let state = SessionState::derive(at(12), Some(at(13)), at(13) + Duration::seconds(1));
        assert_eq!(state, SessionState::Ended);
        assert!(state.is_ended());
        assert_eq!(state.label(), "session ended");
    }

    #[test]
    fn test_table_ids_deduplicates() {
        let session = Session {
            id: "s".into(),
            start: at(12),
            end: None,
            venue: VenueRef { id: "v".into(), name: "Polymensa".into() },
            group: GroupRef { id: "g".into(), name: "Lunch".into() },
            tables: vec![
                TableRef { id: "T1".into() },
                TableRef { id: "T1".into() },
                TableRef { id: "T2".into() },
            ],
        };
        assert_eq!(session.table_ids().len(), 2);
    }
}
