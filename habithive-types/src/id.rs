//! Identifiers for users and habit records.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one user's habit collection.
///
/// The core never operates across user boundaries; the record store
/// partitions data by this id before the core ever sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub uuid::Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier for a habit record.
///
/// Assigned by the record store on creation, stable, and unique within a
/// user's collection. Nothing outside the store interprets its contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HabitId(String);

impl HabitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for HabitId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for HabitId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
