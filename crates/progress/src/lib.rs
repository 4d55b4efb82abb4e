//! Progress Tracking
//!
//! Gamification engine (missions, achievements, badges, levels, streaks),
//! quiz scoring, and exam countdowns.

#![warn(missing_docs)]

pub mod catalog;
pub mod engine;
pub mod streak;
pub mod scoring;
pub mod countdown;
pub mod tracker;

pub use catalog::{Catalog, BadgeRule, AchievementRule, BadgeDef, AchievementDef};
pub use engine::{ProgressEngine, Transition};
pub use streak::{next_streak, streak_bonus};
pub use scoring::{score, QuizResult, QuestionReview, ScoreError};
pub use countdown::{ExamCountdown, ReadingTimer, Remaining};
pub use tracker::{ProgressTracker, StatsTracker};
