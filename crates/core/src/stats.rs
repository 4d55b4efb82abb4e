//! User stats snapshot - the single progression record of a session.

use serde::{Deserialize, Serialize};
use crate::id::{AchievementId, MissionId};
use crate::mission::{Achievement, Badge, Mission};
use crate::Day;

/// XP needed to leave level 1.
pub const DEFAULT_NEXT_LEVEL_XP: u32 = 100;

/// Errors raised when a snapshot violates its invariants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatsError {
    /// Level must start at 1
    #[error("level must be at least 1, got {0}")]
    InvalidLevel(u32),

    /// Threshold must be positive
    #[error("next level threshold must be positive")]
    ZeroThreshold,

    /// XP must stay below the threshold
    #[error("xp {xp} must be below the next level threshold {next_level_xp}")]
    XpOverflow {
        /// Current xp
        xp: u32,
        /// Current threshold
        next_level_xp: u32,
    },

    /// Mission rewards must be positive
    #[error("mission '{0}' has no xp reward")]
    ZeroReward(MissionId),

    /// Mission ids must be unique
    #[error("duplicate mission id '{0}'")]
    DuplicateMission(MissionId),

    /// Badge names must be unique
    #[error("duplicate badge '{0}'")]
    DuplicateBadge(String),
}

/// Progression state: level, xp, streak and unlock collections.
///
/// Snapshots are treated as immutable values. Transitions clone and return
/// a new snapshot rather than mutating the caller's copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStats {
    /// Current level (>= 1)
    pub level: u32,

    /// XP accumulated inside the current level
    pub xp: u32,

    /// XP needed to reach the next level
    pub next_level_xp: u32,

    /// Consecutive active days
    pub streak: u32,

    /// Last day the streak was refreshed; `None` before the first session
    pub last_active_date: Option<Day>,

    /// Badges, locked and earned
    pub badges: Vec<Badge>,

    /// Missions in display order
    pub missions: Vec<Mission>,

    /// Achievements in display order
    pub achievements: Vec<Achievement>,
}

impl UserStats {
    /// Create a snapshot, rejecting values that break the invariants.
    pub fn new(
        level: u32,
        xp: u32,
        next_level_xp: u32,
        missions: Vec<Mission>,
        achievements: Vec<Achievement>,
        badges: Vec<Badge>,
    ) -> Result<Self, StatsError> {
        let stats = Self {
            level,
            xp,
            next_level_xp,
            streak: 0,
            last_active_date: None,
            badges,
            missions,
            achievements,
        };
        stats.validate()?;
        Ok(stats)
    }

    /// Check every snapshot invariant.
    pub fn validate(&self) -> Result<(), StatsError> {
        if self.level < 1 {
            return Err(StatsError::InvalidLevel(self.level));
        }
        if self.next_level_xp == 0 {
            return Err(StatsError::ZeroThreshold);
        }
        if self.xp >= self.next_level_xp {
            return Err(StatsError::XpOverflow {
                xp: self.xp,
                next_level_xp: self.next_level_xp,
            });
        }

        let mut seen = std::collections::HashSet::new();
        for mission in &self.missions {
            if mission.xp_reward == 0 {
                return Err(StatsError::ZeroReward(mission.id.clone()));
            }
            if !seen.insert(&mission.id) {
                return Err(StatsError::DuplicateMission(mission.id.clone()));
            }
        }

        let mut names = std::collections::HashSet::new();
        for badge in &self.badges {
            if !names.insert(badge.name.as_str()) {
                return Err(StatsError::DuplicateBadge(badge.name.clone()));
            }
        }

        Ok(())
    }

    /// Look up a mission by id.
    pub fn mission(&self, id: &MissionId) -> Option<&Mission> {
        self.missions.iter().find(|m| &m.id == id)
    }

    /// Look up an achievement by id.
    pub fn achievement(&self, id: &AchievementId) -> Option<&Achievement> {
        self.achievements.iter().find(|a| &a.id == id)
    }

    /// Look up a badge by name.
    pub fn badge(&self, name: &str) -> Option<&Badge> {
        self.badges.iter().find(|b| b.name == name)
    }

    /// Number of completed missions.
    pub fn completed_missions(&self) -> usize {
        self.missions.iter().filter(|m| m.completed).count()
    }

    /// Whether every mission is completed. False when there are none.
    pub fn all_missions_completed(&self) -> bool {
        !self.missions.is_empty() && self.missions.iter().all(|m| m.completed)
    }

    /// Earned badges only.
    pub fn earned_badges(&self) -> impl Iterator<Item = &Badge> {
        self.badges.iter().filter(|b| b.is_earned())
    }

    /// Progress towards the next level (0.0 - 1.0).
    pub fn level_progress(&self) -> f32 {
        if self.next_level_xp == 0 {
            return 0.0;
        }
        (self.xp as f32 / self.next_level_xp as f32).clamp(0.0, 1.0)
    }
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            next_level_xp: DEFAULT_NEXT_LEVEL_XP,
            streak: 0,
            last_active_date: None,
            badges: Vec::new(),
            missions: Vec::new(),
            achievements: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MissionType;

    #[test]
    fn test_default_is_valid() {
        let stats = UserStats::default();
        assert_eq!(stats.level, 1);
        assert_eq!(stats.next_level_xp, DEFAULT_NEXT_LEVEL_XP);
        assert!(stats.validate().is_ok());
    }

    #[test]
    fn test_new_rejects_xp_overflow() {
        let err = UserStats::new(1, 100, 100, vec![], vec![], vec![]).unwrap_err();
        assert_eq!(err, StatsError::XpOverflow { xp: 100, next_level_xp: 100 });
    }

    #[test]
    fn test_new_rejects_level_zero() {
        let err = UserStats::new(0, 0, 100, vec![], vec![], vec![]).unwrap_err();
        assert_eq!(err, StatsError::InvalidLevel(0));
    }

    #[test]
    fn test_new_rejects_zero_threshold() {
        let err = UserStats::new(1, 0, 0, vec![], vec![], vec![]).unwrap_err();
        assert_eq!(err, StatsError::ZeroThreshold);
    }

    #[test]
    fn test_new_rejects_bad_missions() {
        let zero = Mission::new("m1", "Nothing", 0, MissionType::Notes);
        assert!(matches!(
            UserStats::new(1, 0, 100, vec![zero], vec![], vec![]),
            Err(StatsError::ZeroReward(_))
        ));

        let a = Mission::new("m1", "A", 10, MissionType::Notes);
        let b = Mission::new("m1", "B", 10, MissionType::Quiz);
        assert!(matches!(
            UserStats::new(1, 0, 100, vec![a, b], vec![], vec![]),
            Err(StatsError::DuplicateMission(_))
        ));
    }

    #[test]
    fn test_new_rejects_duplicate_badges() {
        let badges = vec![Badge::locked("Quiz Master"), Badge::locked("Quiz Master")];
        assert!(matches!(
            UserStats::new(1, 0, 100, vec![], vec![], badges),
            Err(StatsError::DuplicateBadge(_))
        ));
    }

    #[test]
    fn test_all_missions_completed_requires_missions() {
        let mut stats = UserStats::default();
        assert!(!stats.all_missions_completed());

        let mut mission = Mission::new("m1", "Review", 10, MissionType::Flashcards);
        mission.completed = true;
        stats.missions.push(mission);
        assert!(stats.all_missions_completed());
        assert_eq!(stats.completed_missions(), 1);
    }

    #[test]
    fn test_level_progress() {
        let stats = UserStats::new(2, 75, 150, vec![], vec![], vec![]).unwrap();
        assert!((stats.level_progress() - 0.5).abs() < f32::EPSILON);
    }
}
