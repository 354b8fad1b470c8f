//! Pure streak decision logic.
//!
//! Given a habit's persisted state and the current date keys, computes what
//! a completion toggle writes. No I/O, no clock access, no store access:
//! the functions here are total and deterministic over their inputs, so the
//! controller stays a thin I/O layer and the rules are unit-testable on
//! their own.

use habithive_types::{DateKey, Habit, HabitPatch};

/// Computes the partial update a completion toggle must write.
///
/// Marking complete sets `is_done_today`, moves `last_completed_date` to
/// `today`, and advances the streak:
///
/// - last completion was today → counter unchanged (already counted by
///   some other path)
/// - last completion was yesterday → `+1`
/// - gap of two or more days, or first-ever completion → reset to `1`
///
/// Un-marking writes `is_done_today` only. The streak and the
/// last-completed marker stay put, so re-checking on the same day lands in
/// the already-counted branch and the counter never double-increments.
pub fn toggle_patch(habit: &Habit, today: DateKey, yesterday: DateKey) -> HabitPatch {
    if habit.is_done_today {
        // Display-only rollback for the current day, not a streak penalty.
        return HabitPatch {
            is_done_today: Some(false),
            ..HabitPatch::default()
        };
    }

    let streak_days = match habit.last_completed_date {
        Some(last) if last == today => habit.streak_days,
        Some(last) if last == yesterday => habit.streak_days.saturating_add(1),
        _ => 1,
    };

    HabitPatch {
        is_done_today: Some(true),
        streak_days: Some(streak_days),
        last_completed_date: Some(today),
    }
}

/// The full next state after a completion toggle.
pub fn apply_toggle(habit: &Habit, today: DateKey, yesterday: DateKey) -> Habit {
    habit.apply(&toggle_patch(habit, today, yesterday))
}
