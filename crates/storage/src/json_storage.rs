//! JSON file storage implementation.
//!
//! Stores each key as a JSON file under a root directory (`.studyhub` by
//! default) and keeps a small per-key meta marker (version + updated_at).

use std::path::Path;
use studyhub_core::{FlashcardDeck, Session, UserStats};
use super::{Storage, Result};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

const STATS_KEY: &str = "stats";
const DECKS_KEY: &str = "decks";
const SESSION_KEY: &str = "session";

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: std::path::PathBuf,
}

impl JsonStorage {
    /// Create storage, creating the root and meta directories if needed.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(&root).await?;
        fs::create_dir_all(root.join("meta")).await?;

        Ok(Self { root })
    }

    /// Root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> std::path::PathBuf {
        self.root.join(format!("{}.json", key))
    }

    fn tmp_path(&self, key: &str) -> std::path::PathBuf {
        self.root.join(format!("{}.json.tmp", key))
    }

    fn meta_path(&self, key: &str) -> std::path::PathBuf {
        self.root.join("meta").join(format!("{}.meta.json", key))
    }

    /// Read and increment the per-key version, return the new version.
    async fn bump_version(&self, key: &str) -> Result<u64> {
        let path = self.meta_path(key);
        let mut version = 0u64;
        if let Ok(s) = fs::read_to_string(&path).await {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(&s) {
                if let Some(v) = json.get("version").and_then(|v| v.as_u64()) {
                    version = v;
                }
            }
        }
        version += 1;
        let meta = serde_json::json!({"version": version, "updated_at": chrono::Utc::now()});
        fs::write(&path, serde_json::to_string_pretty(&meta)?.as_bytes()).await?;
        Ok(version)
    }

    /// Current version of a key, 0 if it was never written.
    pub async fn version(&self, key: &str) -> u64 {
        match fs::read_to_string(self.meta_path(key)).await {
            Ok(s) => serde_json::from_str::<serde_json::Value>(&s)
                .ok()
                .and_then(|json| json.get("version").and_then(|v| v.as_u64()))
                .unwrap_or(0),
            Err(_) => 0,
        }
    }

    async fn put<T: serde::Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        let tmp = self.tmp_path(key);
        let mut file = fs::File::create(&tmp).await?;
        file.write_all(json.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);
        fs::rename(&tmp, self.key_path(key)).await?;
        let version = self.bump_version(key).await?;
        debug!(key, version, "Saved");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        for path in [self.key_path(key), self.meta_path(key)] {
            fs::remove_file(path).await.or_else(|e| {
                if e.kind() == std::io::ErrorKind::NotFound { Ok(()) } else { Err(e) }
            })?;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn load_stats(&self) -> Result<Option<UserStats>> {
        let stats: Option<UserStats> = read_json(&self.key_path(STATS_KEY)).await?;
        if let Some(stats) = &stats {
            stats.validate()?;
        }
        Ok(stats)
    }

    async fn save_stats(&mut self, stats: &UserStats) -> Result<()> {
        stats.validate()?;
        self.put(STATS_KEY, stats).await
    }

    async fn load_decks(&self) -> Result<Option<Vec<FlashcardDeck>>> {
        read_json(&self.key_path(DECKS_KEY)).await
    }

    async fn save_decks(&mut self, decks: &[FlashcardDeck]) -> Result<()> {
        self.put(DECKS_KEY, decks).await
    }

    async fn load_session(&self) -> Result<Option<Session>> {
        read_json(&self.key_path(SESSION_KEY)).await
    }

    async fn save_session(&mut self, session: &Session) -> Result<()> {
        self.put(SESSION_KEY, session).await
    }

    async fn clear_session(&mut self) -> Result<()> {
        self.remove(SESSION_KEY).await
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &std::path::Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studyhub_core::{Mission, MissionType};

    #[tokio::test]
    async fn test_missing_keys_read_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();

        assert!(storage.load_stats().await.unwrap().is_none());
        assert!(storage.load_decks().await.unwrap().is_none());
        assert!(storage.load_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_stats_overwrite_and_version() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let mut stats = UserStats::default();
        stats.missions.push(Mission::new("m1", "Review deck", 50, MissionType::Flashcards));
        storage.save_stats(&stats).await.unwrap();

        stats.xp = 40;
        storage.save_stats(&stats).await.unwrap();

        let loaded = storage.load_stats().await.unwrap().unwrap();
        assert_eq!(loaded, stats);
        assert_eq!(storage.version(STATS_KEY).await, 2);
    }

    #[tokio::test]
    async fn test_corrupt_stats_is_reported_as_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();
        fs::write(dir.path().join("stats.json"), b"{ not json").await.unwrap();

        let err = storage.load_stats().await.unwrap_err();
        assert!(err.is_corrupt());
    }

    #[tokio::test]
    async fn test_invalid_stats_is_reported_as_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();

        let mut stats = UserStats::default();
        stats.xp = 500;
        fs::write(dir.path().join("stats.json"), serde_json::to_vec(&stats).unwrap())
            .await
            .unwrap();

        let err = storage.load_stats().await.unwrap_err();
        assert!(matches!(err, crate::StorageError::Invalid(_)));
        assert!(err.is_corrupt());
    }

    #[tokio::test]
    async fn test_session_clear() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let session = Session { token: "abc".to_string(), username: "sam".to_string() };
        storage.save_session(&session).await.unwrap();
        assert_eq!(storage.load_session().await.unwrap(), Some(session));

        storage.clear_session().await.unwrap();
        assert!(storage.load_session().await.unwrap().is_none());
        storage.clear_session().await.unwrap();
    }

    #[tokio::test]
    async fn test_decks_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let mut deck = FlashcardDeck::new("Chemistry");
        deck.add_card("H2O", "Water");
        storage.save_decks(std::slice::from_ref(&deck)).await.unwrap();

        let reopened = JsonStorage::new(dir.path()).await.unwrap();
        let decks = reopened.load_decks().await.unwrap().unwrap();
        assert_eq!(decks, vec![deck]);
    }

    #[tokio::test]
    async fn test_save_replaces_file_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        fs::write(dir.path().join("decks.json"), b"[]").await.unwrap();
        let deck = FlashcardDeck::new("History");
        storage.save_decks(std::slice::from_ref(&deck)).await.unwrap();

        assert!(!dir.path().join("decks.json.tmp").exists());
        assert_eq!(storage.load_decks().await.unwrap(), Some(vec![deck]));
        assert_eq!(storage.version(DECKS_KEY).await, 1);
    }

    #[tokio::test]
    async fn test_corrupt_decks_and_session_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();
        fs::write(dir.path().join("decks.json"), b"[{ broken").await.unwrap();
        fs::write(dir.path().join("session.json"), b"nope").await.unwrap();

        assert!(storage.load_decks_or_default().await.unwrap().is_empty());
        assert!(storage.load_session_or_none().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unreadable_decks_and_session_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonStorage::new(dir.path()).await.unwrap();
        // A directory in place of the file fails with an I/O error, not NotFound.
        fs::create_dir(dir.path().join("decks.json")).await.unwrap();
        fs::create_dir(dir.path().join("session.json")).await.unwrap();

        let err = storage.load_decks_or_default().await.unwrap_err();
        assert!(matches!(err, crate::StorageError::Io(_)));
        assert!(!err.is_corrupt());
        let err = storage.load_session_or_none().await.unwrap_err();
        assert!(matches!(err, crate::StorageError::Io(_)));
    }
}
