//! Progression engine.
//!
//! Pure transitions over [`UserStats`] snapshots. Each operation takes the
//! current snapshot by reference and returns a new one together with the
//! events it produced; nothing is persisted or announced here.

use studyhub_core::{Day, EngineConfig, MissionId, ProgressEvent, UserStats, MIN_GROWTH_PERCENT};
use tracing::debug;

use crate::catalog::Catalog;
use crate::streak;

/// Outcome of a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Snapshot after the transition
    pub stats: UserStats,
    /// Events in the order they happened
    pub events: Vec<ProgressEvent>,
}

impl Transition {
    fn unchanged(stats: &UserStats) -> Self {
        Self {
            stats: stats.clone(),
            events: Vec::new(),
        }
    }

    /// Whether the transition changed anything.
    pub fn changed(&self) -> bool {
        !self.events.is_empty()
    }

    /// Highest level reached, if the transition levelled up.
    pub fn level_up(&self) -> Option<u32> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::LevelUp { level } => Some(*level),
                _ => None,
            })
            .max()
    }

    /// Names of badges unlocked by the transition.
    pub fn unlocked_badges(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::BadgeUnlocked { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Applies missions and streak refreshes to stats snapshots.
#[derive(Debug, Clone)]
pub struct ProgressEngine {
    catalog: Catalog,
    config: EngineConfig,
}

impl ProgressEngine {
    /// Create an engine over a catalog.
    pub fn new(catalog: Catalog, config: EngineConfig) -> Self {
        Self { catalog, config }
    }

    /// Engine over the standard catalog with default settings.
    pub fn standard() -> Self {
        Self::new(Catalog::standard(), EngineConfig::default())
    }

    /// The catalog this engine evaluates.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Engine settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Complete a mission.
    ///
    /// Unknown or already completed missions leave the snapshot untouched
    /// and produce no events.
    pub fn complete_mission(&self, stats: &UserStats, mission_id: &MissionId, today: Day) -> Transition {
        let Some(index) = stats.missions.iter().position(|m| &m.id == mission_id) else {
            debug!(mission = %mission_id, "Unknown mission, ignoring");
            return Transition::unchanged(stats);
        };
        if stats.missions[index].completed {
            debug!(mission = %mission_id, "Mission already completed, ignoring");
            return Transition::unchanged(stats);
        }

        let mut next = stats.clone();
        let mut events = Vec::new();

        let reward = next.missions[index].xp_reward;
        next.missions[index].completed = true;
        events.push(ProgressEvent::MissionCompleted {
            id: mission_id.clone(),
            xp: reward,
        });
        self.credit_xp(&mut next, reward, &mut events);

        self.unlock_achievements(&mut next, &mut events);
        self.unlock_badges(&mut next, today, &mut events);

        Transition { stats: next, events }
    }

    /// Refresh the daily streak for a session starting on `today`.
    pub fn refresh_streak(&self, stats: &UserStats, today: Day) -> Transition {
        let Some(streak) = streak::next_streak(stats.last_active_date, today, stats.streak) else {
            return Transition::unchanged(stats);
        };

        let mut next = stats.clone();
        let mut events = vec![ProgressEvent::StreakUpdated { streak }];
        next.streak = streak;
        next.last_active_date = Some(today);

        self.unlock_badges(&mut next, today, &mut events);

        Transition { stats: next, events }
    }

    /// Streak bonus for display, in percent.
    pub fn streak_bonus(&self, stats: &UserStats) -> u32 {
        streak::streak_bonus(stats.streak, self.config.max_streak_bonus)
    }

    /// Next threshold after a level-up. Thresholds never shrink.
    fn grow_threshold(&self, threshold: u32) -> u32 {
        let growth = self.config.threshold_growth_percent.max(MIN_GROWTH_PERCENT);
        let grown = u64::from(threshold) * u64::from(growth) / 100;
        u32::try_from(grown).unwrap_or(u32::MAX).max(1)
    }

    /// Add xp, rolling over as many levels as the total covers.
    fn credit_xp(&self, stats: &mut UserStats, amount: u32, events: &mut Vec<ProgressEvent>) {
        stats.xp = stats.xp.saturating_add(amount);
        while stats.xp >= stats.next_level_xp {
            stats.xp -= stats.next_level_xp;
            stats.level += 1;
            stats.next_level_xp = self.grow_threshold(stats.next_level_xp);
            events.push(ProgressEvent::LevelUp { level: stats.level });
        }
    }

    fn unlock_achievements(&self, stats: &mut UserStats, events: &mut Vec<ProgressEvent>) {
        for def in &self.catalog.achievements {
            let Some(index) = stats.achievements.iter().position(|a| a.id == def.id) else {
                continue;
            };
            if stats.achievements[index].completed || !def.rule.is_met(stats) {
                continue;
            }

            stats.achievements[index].completed = true;
            events.push(ProgressEvent::AchievementUnlocked { id: def.id.clone() });

            if self.config.credit_achievement_xp {
                let reward = stats.achievements[index].xp_reward;
                self.credit_xp(stats, reward, events);
            }
        }
    }

    fn unlock_badges(&self, stats: &mut UserStats, today: Day, events: &mut Vec<ProgressEvent>) {
        for def in &self.catalog.badges {
            if stats.badge(&def.name).is_some_and(|b| b.is_earned()) || !def.rule.is_met(stats) {
                continue;
            }

            match stats.badges.iter_mut().find(|b| b.name == def.name) {
                Some(badge) => badge.earned_date = Some(today),
                None => stats.badges.push(studyhub_core::Badge {
                    name: def.name.clone(),
                    earned_date: Some(today),
                }),
            }
            events.push(ProgressEvent::BadgeUnlocked {
                name: def.name.clone(),
                date: today,
            });
        }
    }
}

impl Default for ProgressEngine {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AchievementRule, BadgeRule, COMBO_MISSION, DAILY_CHAMPION, OVERACHIEVER, QUIZ_MASTER};
    use chrono::NaiveDate;
    use studyhub_core::{Mission, MissionType};

    fn today() -> Day {
        NaiveDate::from_ymd_opt(2026, 5, 12).unwrap()
    }

    fn single_mission_engine(reward: u32) -> (ProgressEngine, UserStats) {
        let catalog = Catalog::new()
            .mission(Mission::new("big", "Big mission", reward, MissionType::Reading))
            .mission(Mission::new("other", "Other mission", 10, MissionType::Notes));
        let stats = catalog.seed_stats();
        (ProgressEngine::new(catalog, EngineConfig::default()), stats)
    }

    #[test]
    fn test_level_up_scenario() {
        let (engine, stats) = single_mission_engine(150);
        let t = engine.complete_mission(&stats, &MissionId::new("big"), today());

        assert_eq!(t.stats.level, 2);
        assert_eq!(t.stats.xp, 50);
        assert_eq!(t.stats.next_level_xp, 150);
        assert_eq!(t.level_up(), Some(2));
        assert_eq!(
            t.events[0],
            ProgressEvent::MissionCompleted { id: MissionId::new("big"), xp: 150 }
        );
    }

    #[test]
    fn test_multi_level_rollover() {
        // 100 + 150 + 225 = 475 crosses three thresholds.
        let (engine, stats) = single_mission_engine(500);
        let t = engine.complete_mission(&stats, &MissionId::new("big"), today());

        assert_eq!(t.stats.level, 4);
        assert_eq!(t.stats.xp, 25);
        assert_eq!(t.stats.next_level_xp, 337);
        assert!(t.stats.xp < t.stats.next_level_xp);
        let levels: Vec<_> = t
            .events
            .iter()
            .filter(|e| matches!(e, ProgressEvent::LevelUp { .. }))
            .collect();
        assert_eq!(levels.len(), 3);
        assert_eq!(t.level_up(), Some(4));
    }

    #[test]
    fn test_xp_below_threshold_does_not_level() {
        let (engine, stats) = single_mission_engine(99);
        let t = engine.complete_mission(&stats, &MissionId::new("big"), today());

        assert_eq!(t.stats.level, 1);
        assert_eq!(t.stats.xp, 99);
        assert_eq!(t.level_up(), None);
    }

    #[test]
    fn test_exact_threshold_levels_up() {
        let (engine, stats) = single_mission_engine(100);
        let t = engine.complete_mission(&stats, &MissionId::new("big"), today());

        assert_eq!(t.stats.level, 2);
        assert_eq!(t.stats.xp, 0);
        assert_eq!(t.stats.next_level_xp, 150);
    }

    #[test]
    fn test_complete_twice_is_idempotent() {
        let (engine, stats) = single_mission_engine(40);
        let id = MissionId::new("big");

        let first = engine.complete_mission(&stats, &id, today());
        let second = engine.complete_mission(&first.stats, &id, today());

        assert!(first.changed());
        assert!(!second.changed());
        assert_eq!(second.stats, first.stats);
        assert_eq!(second.stats.xp, 40);
    }

    #[test]
    fn test_unknown_mission_is_noop() {
        let (engine, stats) = single_mission_engine(40);
        let t = engine.complete_mission(&stats, &MissionId::new("missing"), today());

        assert!(!t.changed());
        assert_eq!(t.stats, stats);
    }

    #[test]
    fn test_input_snapshot_is_not_mutated() {
        let (engine, stats) = single_mission_engine(40);
        let before = stats.clone();
        let _ = engine.complete_mission(&stats, &MissionId::new("big"), today());
        assert_eq!(stats, before);
    }

    #[test]
    fn test_quiz_master_on_first_quiz() {
        let engine = ProgressEngine::standard();
        let stats = engine.catalog().seed_stats();

        let t = engine.complete_mission(&stats, &MissionId::new("daily-quiz"), today());
        assert_eq!(t.unlocked_badges(), vec![QUIZ_MASTER]);
        assert_eq!(t.stats.badge(QUIZ_MASTER).unwrap().earned_date, Some(today()));
        assert!(t.stats.badge(DAILY_CHAMPION).unwrap().earned_date.is_none());
    }

    #[test]
    fn test_daily_champion_on_combo() {
        let engine = ProgressEngine::standard();
        let stats = engine.catalog().seed_stats();

        let t = engine.complete_mission(&stats, &MissionId::new(COMBO_MISSION), today());
        assert!(t.unlocked_badges().contains(&DAILY_CHAMPION));
        assert!(!t.unlocked_badges().contains(&QUIZ_MASTER));
    }

    #[test]
    fn test_badges_are_monotonic() {
        let engine = ProgressEngine::standard();
        let stats = engine.catalog().seed_stats();
        let earned_on = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();

        let t = engine.complete_mission(&stats, &MissionId::new("daily-quiz"), earned_on);
        let later = engine.complete_mission(&t.stats, &MissionId::new("daily-notes"), today());
        let refreshed = engine.refresh_streak(&later.stats, today());

        for snapshot in [&later.stats, &refreshed.stats] {
            assert_eq!(snapshot.badge(QUIZ_MASTER).unwrap().earned_date, Some(earned_on));
        }
        assert!(!later.unlocked_badges().contains(&QUIZ_MASTER));
    }

    #[test]
    fn test_overachiever_when_all_complete() {
        let engine = ProgressEngine::standard();
        let mut stats = engine.catalog().seed_stats();
        let ids: Vec<MissionId> = stats.missions.iter().map(|m| m.id.clone()).collect();

        let mut unlocked = Vec::new();
        for id in &ids {
            let t = engine.complete_mission(&stats, id, today());
            unlocked.extend(t.events.iter().filter_map(|e| match e {
                ProgressEvent::AchievementUnlocked { id } => Some(id.as_str().to_string()),
                _ => None,
            }));
            stats = t.stats;
        }

        assert_eq!(unlocked, vec!["first-steps".to_string(), OVERACHIEVER.to_string()]);
        assert!(stats.achievements.iter().all(|a| a.completed));
        // Achievement xp is not credited by default: 430 mission xp total.
        assert_eq!(stats.level, 3);
        assert_eq!(stats.xp, 180);
        assert_eq!(stats.next_level_xp, 225);
    }

    #[test]
    fn test_achievement_xp_credit_when_enabled() {
        let catalog = Catalog::new()
            .mission(Mission::new("only", "Only mission", 60, MissionType::Notes))
            .achievement("done", "Done", 50, AchievementRule::AllMissionsCompleted);
        let stats = catalog.seed_stats();
        let engine = ProgressEngine::new(
            catalog,
            EngineConfig { credit_achievement_xp: true, ..EngineConfig::default() },
        );

        let t = engine.complete_mission(&stats, &MissionId::new("only"), today());
        assert_eq!(t.stats.level, 2);
        assert_eq!(t.stats.xp, 10);
        assert!(matches!(t.events.last(), Some(ProgressEvent::LevelUp { level: 2 })));
    }

    #[test]
    fn test_shrinking_growth_is_clamped() {
        let catalog = Catalog::new()
            .mission(Mission::new("big", "Big mission", 400, MissionType::Reading));
        let stats = catalog.seed_stats();
        let engine = ProgressEngine::new(
            catalog,
            EngineConfig { threshold_growth_percent: 50, ..EngineConfig::default() },
        );

        // Flat 100 xp per level: 400 xp is exactly four levels.
        let t = engine.complete_mission(&stats, &MissionId::new("big"), today());
        assert_eq!(t.stats.level, 5);
        assert_eq!(t.stats.xp, 0);
        assert_eq!(t.stats.next_level_xp, 100);
    }

    #[test]
    fn test_refresh_streak_yesterday_and_gap() {
        let engine = ProgressEngine::standard();
        let mut stats = engine.catalog().seed_stats();
        stats.streak = 3;

        stats.last_active_date = today().pred_opt();
        let t = engine.refresh_streak(&stats, today());
        assert_eq!(t.stats.streak, 4);
        assert_eq!(t.stats.last_active_date, Some(today()));

        stats.last_active_date = Some(today() - chrono::Duration::days(3));
        let t = engine.refresh_streak(&stats, today());
        assert_eq!(t.stats.streak, 1);
        assert_eq!(t.stats.last_active_date, Some(today()));
    }

    #[test]
    fn test_refresh_streak_same_day_unchanged() {
        let engine = ProgressEngine::standard();
        let mut stats = engine.catalog().seed_stats();
        stats.streak = 5;
        stats.last_active_date = Some(today());

        let t = engine.refresh_streak(&stats, today());
        assert!(!t.changed());
        assert_eq!(t.stats.streak, 5);
    }

    #[test]
    fn test_streak_badge_unlocks_on_refresh() {
        let catalog = Catalog::new().badge("Week Warrior", BadgeRule::StreakAtLeast(7));
        let engine = ProgressEngine::new(catalog.clone(), EngineConfig::default());
        let mut stats = catalog.seed_stats();
        stats.streak = 6;
        stats.last_active_date = today().pred_opt();

        let t = engine.refresh_streak(&stats, today());
        assert_eq!(t.stats.streak, 7);
        assert_eq!(t.unlocked_badges(), vec!["Week Warrior"]);
    }

    #[test]
    fn test_streak_bonus_uses_config_cap() {
        let engine = ProgressEngine::standard();
        let mut stats = UserStats::default();
        stats.streak = 4;
        assert_eq!(engine.streak_bonus(&stats), 8);
        stats.streak = 30;
        assert_eq!(engine.streak_bonus(&stats), 20);
    }

    #[test]
    fn test_missing_badge_entry_is_added_when_earned() {
        let catalog = Catalog::new()
            .mission(Mission::new("q", "Quiz", 10, MissionType::Quiz))
            .badge(QUIZ_MASTER, BadgeRule::FirstMissionOfType(MissionType::Quiz));
        let engine = ProgressEngine::new(catalog, EngineConfig::default());
        let stats = UserStats {
            missions: vec![Mission::new("q", "Quiz", 10, MissionType::Quiz)],
            ..UserStats::default()
        };

        let t = engine.complete_mission(&stats, &MissionId::new("q"), today());
        assert!(t.stats.badge(QUIZ_MASTER).unwrap().is_earned());
    }
}
