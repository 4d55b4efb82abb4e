//! In-memory storage, used by tests and ephemeral sessions.

use studyhub_core::{FlashcardDeck, Session, UserStats};
use super::{Storage, Result};

/// Storage that lives only as long as the value.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    stats: Option<UserStats>,
    decks: Option<Vec<FlashcardDeck>>,
    session: Option<Session>,
}

impl MemoryStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage pre-seeded with a stats snapshot, valid or not.
    pub fn with_stats(stats: UserStats) -> Self {
        Self {
            stats: Some(stats),
            ..Self::default()
        }
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn load_stats(&self) -> Result<Option<UserStats>> {
        if let Some(stats) = &self.stats {
            stats.validate()?;
        }
        Ok(self.stats.clone())
    }

    async fn save_stats(&mut self, stats: &UserStats) -> Result<()> {
        stats.validate()?;
        self.stats = Some(stats.clone());
        Ok(())
    }

    async fn load_decks(&self) -> Result<Option<Vec<FlashcardDeck>>> {
        Ok(self.decks.clone())
    }

    async fn save_decks(&mut self, decks: &[FlashcardDeck]) -> Result<()> {
        self.decks = Some(decks.to_vec());
        Ok(())
    }

    async fn load_session(&self) -> Result<Option<Session>> {
        Ok(self.session.clone())
    }

    async fn save_session(&mut self, session: &Session) -> Result<()> {
        self.session = Some(session.clone());
        Ok(())
    }

    async fn clear_session(&mut self) -> Result<()> {
        self.session = None;
        Ok(())
    }
}
