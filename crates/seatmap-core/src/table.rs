//! Table identifiers shared by layouts, selections and persisted sessions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Stable identifier of a table.
///
/// The same value names a table region inside a venue layout (its `id`
/// attribute) and the persisted table record on the backend.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(String);

impl TableId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TableId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TableId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for TableId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Unordered set of table ids. Ordering is only used for deterministic output.
pub type TableSet = BTreeSet<TableId>;

/// Collects any iterator of id-like values into a [`TableSet`].
pub fn table_set<I, T>(ids: I) -> TableSet
where
    I: IntoIterator<Item = T>,
    T: Into<TableId>,
{
    ids.into_iter().map(Into::into).collect()
}
