//! Read-only projection of habit records for display.

use habithive_types::{DateKey, Habit, HabitId};

/// Display entity for one habit.
///
/// Identical fields to the stored record. Owned exclusively by the
/// controller and replaced wholesale on every pushed snapshot; nothing
/// merges into it locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitView {
    pub id: HabitId,
    pub name: String,
    pub description: String,
    pub is_done_today: bool,
    pub streak_days: u32,
    pub last_completed_date: Option<DateKey>,
}

impl From<&Habit> for HabitView {
    fn from(habit: &Habit) -> Self {
        Self {
            id: habit.id.clone(),
            name: habit.name.clone(),
            description: habit.description.clone(),
            is_done_today: habit.is_done_today,
            streak_days: habit.streak_days,
            last_completed_date: habit.last_completed_date,
        }
    }
}

impl From<Habit> for HabitView {
    fn from(habit: Habit) -> Self {
        Self::from(&habit)
    }
}

impl HabitView {
    /// "Streak: N days"
    pub fn streak_label(&self) -> String {
        format!("Streak: {} days", self.streak_days)
    }

    /// "Done" once completed for today, "Today" otherwise.
    pub fn status_label(&self) -> &'static str {
        if self.is_done_today { "Done" } else { "Today" }
    }

    /// "Last done: YYYY-MM-DD", or `None` before the first completion.
    pub fn last_done_label(&self) -> Option<String> {
        self.last_completed_date.map(|d| format!("Last done: {d}"))
    }
}

/// Completed-today count over a snapshot, for the progress line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyProgress {
    pub completed: usize,
    pub total: usize,
}

impl DailyProgress {
    pub fn of(habits: &[HabitView]) -> Self {
        Self {
            completed: habits.iter().filter(|h| h.is_done_today).count(),
            total: habits.len(),
        }
    }

    /// "Progress: X / Y habits done"
    pub fn label(&self) -> String {
        format!("Progress: {} / {} habits done", self.completed, self.total)
    }
}
