//! The habit record and its creation / partial-update forms.
//!
//! Wire field names are camelCase, matching the record store's document
//! fields.

use crate::{DateKey, HabitId};
use serde::{Deserialize, Serialize};

/// A habit document as held by the record store.
///
/// `streak_days` counts consecutive completed days, including today when
/// `is_done_today` is set. `last_completed_date` is `None` only before the
/// first-ever completion, which forces `streak_days == 0` and
/// `is_done_today == false`. The counter only changes on a completion
/// transition; un-completing today never touches it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: HabitId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_done_today: bool,
    #[serde(default)]
    pub streak_days: u32,
    #[serde(default)]
    pub last_completed_date: Option<DateKey>,
}

impl Habit {
    /// Merges a partial update over this record, returning the next state.
    ///
    /// Matches the store's per-call semantics: listed fields replace,
    /// unlisted fields are untouched, no field-level merge beyond that.
    pub fn apply(&self, patch: &HabitPatch) -> Habit {
        Habit {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            is_done_today: patch.is_done_today.unwrap_or(self.is_done_today),
            streak_days: patch.streak_days.unwrap_or(self.streak_days),
            last_completed_date: patch.last_completed_date.or(self.last_completed_date),
        }
    }
}

/// Fields for creating a new habit.
///
/// A fresh habit always starts incomplete with no streak; the store assigns
/// the id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl HabitDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Materializes the stored record for a newly assigned id.
    pub fn into_habit(self, id: HabitId) -> Habit {
        Habit {
            id,
            name: self.name,
            description: self.description,
            is_done_today: false,
            streak_days: 0,
            last_completed_date: None,
        }
    }
}

/// Partial-field update for a habit document. `None` fields are untouched
/// and skipped on the wire.
///
/// `last_completed_date` is only ever written to a concrete day (the
/// completion path) and never cleared, so a single `Option` is enough.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_done_today: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streak_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_completed_date: Option<DateKey>,
}

impl HabitPatch {
    /// True when no field would be touched.
    pub fn is_empty(&self) -> bool {
        self.is_done_today.is_none()
            && self.streak_days.is_none()
            && self.last_completed_date.is_none()
    }
}
