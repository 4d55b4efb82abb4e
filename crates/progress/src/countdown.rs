//! Exam countdown and reading-trainer timer.
//!
//! Both are display helpers; neither feeds back into scoring or stats.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use studyhub_core::{Day, Time};

/// Time left until an exam, broken down for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remaining {
    /// Whole days
    pub days: i64,
    /// Hours after whole days
    pub hours: i64,
    /// Minutes after whole hours
    pub minutes: i64,
    /// Seconds after whole minutes
    pub seconds: i64,
}

impl Remaining {
    fn from_duration(left: Duration) -> Self {
        let total = left.num_seconds();
        Self {
            days: total / 86_400,
            hours: (total % 86_400) / 3_600,
            minutes: (total % 3_600) / 60,
            seconds: total % 60,
        }
    }
}

impl std::fmt::Display for Remaining {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d {:02}h {:02}m {:02}s", self.days, self.hours, self.minutes, self.seconds)
    }
}

/// Countdown to a named exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamCountdown {
    /// Exam name
    pub name: String,
    /// When the exam starts
    pub exam_at: Time,
}

impl ExamCountdown {
    /// Create a countdown.
    pub fn new(name: impl Into<String>, exam_at: Time) -> Self {
        Self {
            name: name.into(),
            exam_at,
        }
    }

    /// Time left at `now`; `None` once the exam has started.
    pub fn remaining(&self, now: Time) -> Option<Remaining> {
        let left = self.exam_at - now;
        if left <= Duration::zero() {
            return None;
        }
        Some(Remaining::from_duration(left))
    }

    /// Calendar days from `today` to the exam day; negative once past.
    pub fn days_until(&self, today: Day) -> i64 {
        (self.exam_at.date_naive() - today).num_days()
    }
}

/// Per-second countdown for a timed reading session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredTimer")]
pub struct ReadingTimer {
    limit_secs: u32,
    remaining_secs: u32,
}

#[derive(Deserialize)]
struct StoredTimer {
    limit_secs: u32,
    remaining_secs: u32,
}

impl From<StoredTimer> for ReadingTimer {
    fn from(stored: StoredTimer) -> Self {
        Self {
            limit_secs: stored.limit_secs,
            remaining_secs: stored.remaining_secs.min(stored.limit_secs),
        }
    }
}

impl ReadingTimer {
    /// Start a timer with a limit in seconds.
    pub fn new(limit_secs: u32) -> Self {
        Self {
            limit_secs,
            remaining_secs: limit_secs,
        }
    }

    /// Advance one second. Returns the seconds left.
    pub fn tick(&mut self) -> u32 {
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        self.remaining_secs
    }

    /// Seconds left.
    pub fn remaining(&self) -> u32 {
        self.remaining_secs
    }

    /// Seconds spent so far.
    pub fn elapsed(&self) -> u32 {
        self.limit_secs.saturating_sub(self.remaining_secs)
    }

    /// Whether time is up.
    pub fn is_expired(&self) -> bool {
        self.remaining_secs == 0
    }

    /// Restart from the full limit.
    pub fn reset(&mut self) {
        self.remaining_secs = self.limit_secs;
    }

    /// `mm:ss` display.
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }
}
