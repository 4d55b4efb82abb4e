//! Missions, achievements and badges held in a stats snapshot.

use serde::{Deserialize, Serialize};
use crate::id::{AchievementId, MissionId};
use crate::Day;

/// A discrete, single-completion task rewarding XP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    /// Unique identifier
    pub id: MissionId,

    /// Display title
    pub title: String,

    /// XP granted on completion (always > 0)
    pub xp_reward: u32,

    /// Completion flag; never reverts
    #[serde(default)]
    pub completed: bool,

    /// Activity the mission belongs to
    pub mission_type: MissionType,
}

impl Mission {
    /// Create an uncompleted mission.
    pub fn new(
        id: impl Into<MissionId>,
        title: impl Into<String>,
        xp_reward: u32,
        mission_type: MissionType,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            xp_reward,
            completed: false,
            mission_type,
        }
    }
}

/// Activity a mission is tied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionType {
    /// Review flashcards
    Flashcards,
    /// Take a quiz
    Quiz,
    /// Write or review notes
    Notes,
    /// Reading-comprehension session
    Reading,
    /// Post in the discussion forum
    Forum,
    /// Multi-activity daily combo
    Combo,
}

impl MissionType {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MissionType::Flashcards => "flashcards",
            MissionType::Quiz => "quiz",
            MissionType::Notes => "notes",
            MissionType::Reading => "reading",
            MissionType::Forum => "forum",
            MissionType::Combo => "combo",
        }
    }
}

/// A higher-order unlock gated on aggregate mission state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    /// Unique identifier
    pub id: AchievementId,

    /// Display title
    pub title: String,

    /// XP attached to the achievement
    pub xp_reward: u32,

    /// Completion flag; never reverts
    #[serde(default)]
    pub completed: bool,
}

impl Achievement {
    /// Create a locked achievement.
    pub fn new(id: impl Into<AchievementId>, title: impl Into<String>, xp_reward: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            xp_reward,
            completed: false,
        }
    }
}

/// A non-revocable unlock marker. Present `earned_date` means unlocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    /// Badge name, unique within a snapshot
    pub name: String,

    /// Day the badge was earned
    #[serde(default)]
    pub earned_date: Option<Day>,
}

impl Badge {
    /// Create a locked badge.
    pub fn locked(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            earned_date: None,
        }
    }

    /// Whether the badge has been earned.
    pub fn is_earned(&self) -> bool {
        self.earned_date.is_some()
    }
}
