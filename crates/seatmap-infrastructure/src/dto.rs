//! Wire DTOs for the backend REST API.
//!
//! The backend speaks camelCase JSON and calls a venue a `mensa`. These
//! types mirror that shape and convert into the domain model.

use chrono::{DateTime, NaiveDateTime, Utc};
use seatmap_core::error::{Result, SeatmapError};
use seatmap_core::session::{GroupRef, Session, TableRef, VenueRef};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDto {
    pub id: String,
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
    pub mensa: NamedRefDto,
    pub group: NamedRefDto,
    #[serde(default)]
    pub tables: Option<Vec<TableDto>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedRefDto {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// A table as returned by the backend. Only the id is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDto {
    pub id: String,
}

impl SessionDto {
    /// Converts into the domain `Session`.
    ///
    /// # Errors
    ///
    /// Returns `SeatmapError::Serialization` if a timestamp does not parse.
    pub fn into_domain(self) -> Result<Session> {
        let start = parse_timestamp(&self.start)?;
        let end = self.end.as_deref().map(parse_timestamp).transpose()?;
        Ok(Session {
            id: self.id,
            start,
            end,
            venue: VenueRef {
                id: self.mensa.id,
                name: self.mensa.name,
            },
            group: GroupRef {
                id: self.group.id,
                name: self.group.name,
            },
            tables: self
                .tables
                .unwrap_or_default()
                .into_iter()
                .map(|t| TableRef { id: t.id.into() })
                .collect(),
        })
    }
}

/// Parses an RFC 3339 timestamp. Timestamps without an offset are UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| SeatmapError::Serialization {
            format: "timestamp".to_string(),
            message: format!("'{}': {}", raw, e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SESSION_JSON: &str = r#"{
        "id": "6f1c2a4e-0000-4000-8000-000000000001",
        "start": "2026-06-02T11:45:00Z",
        "end": null,
        "mensa": { "id": "3a0b3f5e-0000-4000-8000-0000000000aa", "name": "Polymensa" },
        "group": { "id": "g-1", "name": "Lunch crew", "public": true },
        "tables": [ { "id": "T1", "seats": 6 }, { "id": "T2" } ]
    }"#;

    #[test]
    fn test_session_dto_maps_mensa_to_venue() {
        let dto: SessionDto = serde_json::from_str(SESSION_JSON).unwrap();
        let session = dto.into_domain().unwrap();

        assert_eq!(session.venue.name, "Polymensa");
        assert_eq!(session.group.id, "g-1");
        assert_eq!(session.end, None);
        assert_eq!(session.start, Utc.with_ymd_and_hms(2026, 6, 2, 11, 45, 0).unwrap());
        assert_eq!(session.table_ids().len(), 2);
    }

    #[test]
    fn test_missing_tables_is_empty() {
        let dto: SessionDto = serde_json::from_str(
            r#"{"id":"s","start":"2026-06-02T11:45:00","mensa":{"id":"m"},"group":{"id":"g"}}"#,
        )
        .unwrap();
        let session = dto.into_domain().unwrap();
        assert!(session.tables.is_empty());
        assert_eq!(session.start, Utc.with_ymd_and_hms(2026, 6, 2, 11, 45, 0).unwrap());
    }

    #[test]
    fn test_offset_timestamp_is_normalised() {
        let parsed = parse_timestamp("2026-06-02T13:45:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 6, 2, 11, 45, 0).unwrap());
    }

    #[test]
    fn test_bad_timestamp_is_serialization_error() {
        let err = parse_timestamp("noon").unwrap_err();
        assert!(matches!(err, SeatmapError::Serialization { .. }));
    }
}
