//! Mission, achievement and badge catalogs.
//!
//! The catalog owns the unlock rules; a [`UserStats`] snapshot only records
//! what has been completed or earned.

use studyhub_core::{
    Achievement, AchievementId, Badge, Mission, MissionId, MissionType, UserStats,
};

/// Mission id of the daily combo.
pub const COMBO_MISSION: &str = "daily-combo";

/// Badge earned by the first completed quiz mission.
pub const QUIZ_MASTER: &str = "Quiz Master";

/// Badge earned by completing the daily combo.
pub const DAILY_CHAMPION: &str = "Daily Champion";

/// Achievement earned when every mission is completed.
pub const OVERACHIEVER: &str = "overachiever";

/// Condition under which a badge unlocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BadgeRule {
    /// Any completed mission of this type
    FirstMissionOfType(MissionType),
    /// A specific mission completed
    MissionCompleted(MissionId),
    /// Streak reached this many days
    StreakAtLeast(u32),
    /// Level reached
    LevelAtLeast(u32),
}

impl BadgeRule {
    /// Evaluate the rule against a snapshot.
    pub fn is_met(&self, stats: &UserStats) -> bool {
        match self {
            BadgeRule::FirstMissionOfType(kind) => stats
                .missions
                .iter()
                .any(|m| m.completed && m.mission_type == *kind),
            BadgeRule::MissionCompleted(id) => stats.mission(id).is_some_and(|m| m.completed),
            BadgeRule::StreakAtLeast(days) => stats.streak >= *days,
            BadgeRule::LevelAtLeast(level) => stats.level >= *level,
        }
    }
}

/// Condition under which an achievement unlocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AchievementRule {
    /// Every mission in the snapshot is completed
    AllMissionsCompleted,
    /// At least this many missions completed
    MissionsCompleted(usize),
}

impl AchievementRule {
    /// Evaluate the rule against a snapshot.
    pub fn is_met(&self, stats: &UserStats) -> bool {
        match self {
            AchievementRule::AllMissionsCompleted => stats.all_missions_completed(),
            AchievementRule::MissionsCompleted(n) => stats.completed_missions() >= *n,
        }
    }
}

/// Badge definition.
#[derive(Debug, Clone)]
pub struct BadgeDef {
    /// Badge name
    pub name: String,
    /// Unlock rule
    pub rule: BadgeRule,
}

/// Achievement definition.
#[derive(Debug, Clone)]
pub struct AchievementDef {
    /// Achievement id
    pub id: AchievementId,
    /// Display title
    pub title: String,
    /// XP attached to the achievement
    pub xp_reward: u32,
    /// Unlock rule
    pub rule: AchievementRule,
}

/// Static definitions the engine evaluates snapshots against.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Missions offered, in display order
    pub missions: Vec<Mission>,
    /// Achievements, in display order
    pub achievements: Vec<AchievementDef>,
    /// Badges, in display order
    pub badges: Vec<BadgeDef>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mission.
    pub fn mission(mut self, mission: Mission) -> Self {
        self.missions.push(mission);
        self
    }

    /// Add an achievement.
    pub fn achievement(
        mut self,
        id: impl Into<AchievementId>,
        title: impl Into<String>,
        xp_reward: u32,
        rule: AchievementRule,
    ) -> Self {
        self.achievements.push(AchievementDef {
            id: id.into(),
            title: title.into(),
            xp_reward,
            rule,
        });
        self
    }

    /// Add a badge.
    pub fn badge(mut self, name: impl Into<String>, rule: BadgeRule) -> Self {
        self.badges.push(BadgeDef {
            name: name.into(),
            rule,
        });
        self
    }

    /// The catalog shipped with StudyHub.
    pub fn standard() -> Self {
        Self::new()
            .mission(Mission::new("daily-flashcards", "Review 20 flashcards", 50, MissionType::Flashcards))
            .mission(Mission::new("daily-quiz", "Complete a quiz", 100, MissionType::Quiz))
            .mission(Mission::new("daily-notes", "Write a study note", 30, MissionType::Notes))
            .mission(Mission::new("daily-reading", "Finish a reading session", 60, MissionType::Reading))
            .mission(Mission::new("daily-forum", "Answer a forum question", 40, MissionType::Forum))
            .mission(Mission::new(COMBO_MISSION, "Complete the daily combo", 150, MissionType::Combo))
            .achievement("first-steps", "First Steps", 25, AchievementRule::MissionsCompleted(1))
            .achievement(OVERACHIEVER, "Overachiever", 200, AchievementRule::AllMissionsCompleted)
            .badge(QUIZ_MASTER, BadgeRule::FirstMissionOfType(MissionType::Quiz))
            .badge(DAILY_CHAMPION, BadgeRule::MissionCompleted(MissionId::new(COMBO_MISSION)))
            .badge("Week Warrior", BadgeRule::StreakAtLeast(7))
            .badge("Rising Star", BadgeRule::LevelAtLeast(5))
    }

    /// A fresh level-1 snapshot holding every catalog entry, all locked.
    pub fn seed_stats(&self) -> UserStats {
        self.reconcile(&UserStats::default())
    }

    /// Add catalog entries missing from a snapshot, keeping existing
    /// progress. Entries no longer in the catalog are kept as they are.
    pub fn reconcile(&self, stats: &UserStats) -> UserStats {
        let mut next = stats.clone();

        for mission in &self.missions {
            if next.mission(&mission.id).is_none() {
                next.missions.push(mission.clone());
            }
        }
        for def in &self.achievements {
            if next.achievement(&def.id).is_none() {
                next.achievements
                    .push(Achievement::new(def.id.clone(), def.title.clone(), def.xp_reward));
            }
        }
        for def in &self.badges {
            if next.badge(&def.name).is_none() {
                next.badges.push(Badge::locked(def.name.clone()));
            }
        }

        next
    }
}
