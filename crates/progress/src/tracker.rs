//! Stats tracking service: the engine wired to local storage.

use async_trait::async_trait;
use studyhub_core::{Day, MissionId, UserStats};
use studyhub_storage::{Result, Storage};
use tracing::{info, warn};

use crate::engine::{ProgressEngine, Transition};

/// Stats tracking service.
#[async_trait]
pub trait ProgressTracker: Send + Sync {
    /// Current snapshot, seeded from the catalog when nothing usable is stored.
    async fn stats(&self) -> Result<UserStats>;

    /// Complete a mission and persist the outcome.
    async fn complete_mission(&mut self, mission_id: &MissionId, today: Day) -> Result<Transition>;

    /// Refresh the daily streak and persist the outcome.
    async fn refresh_streak(&mut self, today: Day) -> Result<Transition>;

    /// Discard stored progress and start over.
    async fn reset(&mut self) -> Result<UserStats>;
}

/// Progress tracker backed by a [`Storage`].
pub struct StatsTracker<S: Storage> {
    storage: S,
    engine: ProgressEngine,
}

impl<S: Storage> StatsTracker<S> {
    /// Create a tracker.
    pub fn new(storage: S, engine: ProgressEngine) -> Self {
        Self { storage, engine }
    }

    /// The engine in use.
    pub fn engine(&self) -> &ProgressEngine {
        &self.engine
    }

    /// Underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the tracker, returning its storage.
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Load the stored snapshot. Returns the snapshot and whether it has to
    /// be written back (fresh seed, reset, or catalog additions).
    ///
    /// Corrupt or invalid data fails closed to a fresh seed.
    async fn load(&self) -> Result<(UserStats, bool)> {
        let stored = match self.storage.load_stats().await {
            Ok(stored) => stored,
            Err(e) if e.is_corrupt() => {
                warn!(error = %e, "Stored stats unreadable, resetting to defaults");
                None
            }
            Err(e) => return Err(e),
        };

        Ok(match stored {
            Some(stats) => {
                let reconciled = self.engine.catalog().reconcile(&stats);
                let dirty = reconciled != stats;
                (reconciled, dirty)
            }
            None => (self.engine.catalog().seed_stats(), true),
        })
    }

    async fn persist(&mut self, transition: &Transition, dirty: bool) -> Result<()> {
        if transition.changed() || dirty {
            self.storage.save_stats(&transition.stats).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl<S: Storage + 'static> ProgressTracker for StatsTracker<S> {
    async fn stats(&self) -> Result<UserStats> {
        Ok(self.load().await?.0)
    }

    async fn complete_mission(&mut self, mission_id: &MissionId, today: Day) -> Result<Transition> {
        let (stats, dirty) = self.load().await?;
        let transition = self.engine.complete_mission(&stats, mission_id, today);
        self.persist(&transition, dirty).await?;

        for event in transition.events.iter().filter(|e| e.is_celebration()) {
            info!(%event, "Progress");
        }
        Ok(transition)
    }

    async fn refresh_streak(&mut self, today: Day) -> Result<Transition> {
        let (stats, dirty) = self.load().await?;
        let transition = self.engine.refresh_streak(&stats, today);
        self.persist(&transition, dirty).await?;

        if transition.changed() {
            info!(streak = transition.stats.streak, "Streak refreshed");
        }
        Ok(transition)
    }

    async fn reset(&mut self) -> Result<UserStats> {
        let stats = self.engine.catalog().seed_stats();
        self.storage.save_stats(&stats).await?;
        info!("Progress reset");
        Ok(stats)
    }
}
