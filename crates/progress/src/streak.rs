//! Daily streak arithmetic.

use chrono::Duration;
use studyhub_core::Day;

/// Compute the streak after a session on `today`.
///
/// Returns `None` when the streak was already refreshed today.
pub fn next_streak(last_active: Option<Day>, today: Day, current: u32) -> Option<u32> {
    match last_active {
        Some(last) if last == today => None,
        Some(last) if last + Duration::days(1) == today => Some(current.saturating_add(1)),
        _ => Some(1),
    }
}

/// Streak bonus in percent: two points per day, capped at `max`.
pub fn streak_bonus(streak: u32, max: u32) -> u32 {
    streak.saturating_mul(2).min(max)
}
