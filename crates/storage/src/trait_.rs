//! Storage trait abstraction.

use async_trait::async_trait;
use studyhub_core::{FlashcardDeck, Session, StatsError, UserStats};
use tracing::warn;

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Stored snapshot violates its invariants
    #[error("Invalid stats: {0}")]
    Invalid(#[from] StatsError),
}

impl StorageError {
    /// Whether the error comes from unreadable or invalid stored data, as
    /// opposed to a failing medium.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StorageError::Json(_) | StorageError::Invalid(_))
    }
}

/// Key/value storage for locally persisted StudyHub data.
///
/// Missing keys read as `None`; saves overwrite.
#[async_trait]
pub trait Storage: Send + Sync {
    // === Stats ===

    /// Load the stats snapshot.
    async fn load_stats(&self) -> Result<Option<UserStats>>;

    /// Save (overwrite) the stats snapshot.
    async fn save_stats(&mut self, stats: &UserStats) -> Result<()>;

    // === Flashcards ===

    /// Load all flashcard decks.
    async fn load_decks(&self) -> Result<Option<Vec<FlashcardDeck>>>;

    /// Load decks, reading missing or corrupt data as no decks. Other
    /// failures are returned.
    async fn load_decks_or_default(&self) -> Result<Vec<FlashcardDeck>> {
        match self.load_decks().await {
            Ok(decks) => Ok(decks.unwrap_or_default()),
            Err(e) if e.is_corrupt() => {
                warn!(error = %e, "Stored decks unreadable, starting empty");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Save (overwrite) all flashcard decks.
    async fn save_decks(&mut self, decks: &[FlashcardDeck]) -> Result<()>;

    // === Session ===

    /// Load the persisted login session.
    async fn load_session(&self) -> Result<Option<Session>>;

    /// Load the session, reading corrupt data as logged out. Other failures
    /// are returned.
    async fn load_session_or_none(&self) -> Result<Option<Session>> {
        match self.load_session().await {
            Ok(session) => Ok(session),
            Err(e) if e.is_corrupt() => {
                warn!(error = %e, "Stored session unreadable, ignoring");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Save the login session.
    async fn save_session(&mut self, session: &Session) -> Result<()>;

    /// Forget the login session.
    async fn clear_session(&mut self) -> Result<()>;
}
