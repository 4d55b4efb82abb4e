//! Progress events - discrete outcomes of a stats transition.

use serde::{Deserialize, Serialize};
use crate::id::{AchievementId, MissionId};
use crate::Day;

/// Something a transition unlocked or changed, reported to the caller so it
/// can sequence notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// A mission was completed and its XP credited
    MissionCompleted {
        /// Mission completed
        id: MissionId,
        /// XP credited
        xp: u32,
    },

    /// A level threshold was crossed
    LevelUp {
        /// Level reached
        level: u32,
    },

    /// A badge was earned
    BadgeUnlocked {
        /// Badge name
        name: String,
        /// Day it was earned
        date: Day,
    },

    /// An achievement was completed
    AchievementUnlocked {
        /// Achievement completed
        id: AchievementId,
    },

    /// The daily streak moved
    StreakUpdated {
        /// New streak length
        streak: u32,
    },
}

impl ProgressEvent {
    /// Whether the event deserves a celebratory notification.
    pub fn is_celebration(&self) -> bool {
        matches!(
            self,
            ProgressEvent::LevelUp { .. }
                | ProgressEvent::BadgeUnlocked { .. }
                | ProgressEvent::AchievementUnlocked { .. }
        )
    }
}

impl std::fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProgressEvent::MissionCompleted { id, xp } => write!(f, "Mission '{}' completed (+{} XP)", id, xp),
            ProgressEvent::LevelUp { level } => write!(f, "Level up! Now level {}", level),
            ProgressEvent::BadgeUnlocked { name, .. } => write!(f, "Badge unlocked: {}", name),
            ProgressEvent::AchievementUnlocked { id } => write!(f, "Achievement unlocked: {}", id),
            ProgressEvent::StreakUpdated { streak } => write!(f, "Streak: {} day(s)", streak),
        }
    }
}
