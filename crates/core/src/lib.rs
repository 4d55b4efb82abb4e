//! StudyHub core data models.
//!
//! This crate defines the records shared by the progression engine,
//! local storage, and the backend client.

#![warn(missing_docs)]

// Identities
mod id;

// Progression
mod stats;
mod mission;
mod event;

// Study material
mod quiz;
mod study;
mod flashcard;

// Configuration
mod config;

// Re-exports
pub use id::*;

// Progression
pub use stats::{UserStats, StatsError, DEFAULT_NEXT_LEVEL_XP};
pub use mission::{Mission, MissionType, Achievement, Badge};
pub use event::ProgressEvent;

// Study material
pub use quiz::{Quiz, Question, Answers};
pub use study::{Note, Resource, ResourceKind, Session};
pub use flashcard::{FlashcardDeck, Flashcard};

// Configuration
pub use config::{AppConfig, EngineConfig, ConfigError, MIN_GROWTH_PERCENT};

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;

/// Calendar day type used for streaks and badge dates
pub type Day = chrono::NaiveDate;
