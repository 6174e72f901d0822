use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use vocab_core::model::{GameResult, GameResultId, UserId, WordEntry, WordId};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape for a vocabulary entry.
///
/// Field names match the remote store's documents exactly; renaming any of
/// them would orphan existing data. Timestamps are kept as strings because
/// documents written by older clients carry naive (offset-less) values, and
/// because the store is sorted lexicographically on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordRecord {
    pub word: String,
    #[serde(default)]
    pub translation: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub example1: String,
    #[serde(default)]
    pub example2: String,
    pub created_at: String,
    pub id: WordId,
    pub user_id: UserId,
}

impl WordRecord {
    #[must_use]
    pub fn from_entry(entry: &WordEntry) -> Self {
        Self {
            word: entry.word().to_owned(),
            translation: entry.translation().to_owned(),
            definition: entry.definition().to_owned(),
            example1: entry.example1().to_owned(),
            example2: entry.example2().to_owned(),
            created_at: entry.created_at().to_rfc3339(),
            id: entry.id(),
            user_id: entry.owner().clone(),
        }
    }

    /// Convert the record back into a domain `WordEntry`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for an unparseable timestamp or
    /// a blank word.
    pub fn into_entry(self) -> Result<WordEntry, StorageError> {
        let created_at = parse_timestamp(&self.created_at)?;
        WordEntry::from_persisted(
            self.id,
            self.user_id,
            self.word,
            self.translation,
            self.definition,
            self.example1,
            self.example2,
            created_at,
        )
        .map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

/// Persisted shape for a game result. Same field-name contract as
/// [`WordRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResultRecord {
    pub score: u32,
    pub total_questions: u32,
    pub percentage: f64,
    pub played_at: String,
    pub id: GameResultId,
    pub user_id: UserId,
}

impl GameResultRecord {
    #[must_use]
    pub fn from_result(result: &GameResult) -> Self {
        Self {
            score: result.score(),
            total_questions: result.total_questions(),
            percentage: result.percentage(),
            played_at: result.played_at().to_rfc3339(),
            id: result.id(),
            user_id: result.owner().clone(),
        }
    }

    /// Convert the record back into a domain `GameResult`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for an unparseable timestamp or
    /// an inconsistent score/percentage pair.
    pub fn into_result(self) -> Result<GameResult, StorageError> {
        let played_at = parse_timestamp(&self.played_at)?;
        GameResult::from_persisted(
            self.id,
            self.user_id,
            self.score,
            self.total_questions,
            self.percentage,
            played_at,
        )
        .map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StorageError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    // Documents written by older clients carry naive timestamps; read them
    // as UTC.
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| StorageError::Serialization(format!("invalid timestamp {raw:?}: {e}")))
}

/// Repository contract for the per-user vocabulary collection.
#[async_trait]
pub trait WordRepository: Send + Sync {
    /// Append a new word document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the document cannot be stored.
    async fn add_word(&self, record: &WordRecord) -> Result<(), StorageError>;

    /// List the owner's words, newest first.
    ///
    /// An owner with no words yields an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the store is unreachable.
    async fn list_words(&self, owner: &UserId) -> Result<Vec<WordRecord>, StorageError>;
}

/// Repository contract for persisted game results.
#[async_trait]
pub trait GameResultRepository: Send + Sync {
    /// Append a new result document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the document cannot be stored.
    async fn save_result(&self, record: &GameResultRecord) -> Result<(), StorageError>;

    /// List the owner's game results.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the store is unreachable.
    async fn list_results(&self, owner: &UserId) -> Result<Vec<GameResultRecord>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
///
/// Mirrors the remote store's shape: flat collections filtered by owner at
/// read time.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    words: Arc<Mutex<Vec<WordRecord>>>,
    results: Arc<Mutex<Vec<GameResultRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WordRepository for InMemoryRepository {
    async fn add_word(&self, record: &WordRecord) -> Result<(), StorageError> {
        let mut guard = self
            .words
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(record.clone());
        Ok(())
    }

    async fn list_words(&self, owner: &UserId) -> Result<Vec<WordRecord>, StorageError> {
        let guard = self
            .words
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut words: Vec<WordRecord> = guard
            .iter()
            .filter(|record| &record.user_id == owner)
            .cloned()
            .collect();
        words.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(words)
    }
}

#[async_trait]
impl GameResultRepository for InMemoryRepository {
    async fn save_result(&self, record: &GameResultRecord) -> Result<(), StorageError> {
        let mut guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(record.clone());
        Ok(())
    }

    async fn list_results(&self, owner: &UserId) -> Result<Vec<GameResultRecord>, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .filter(|record| &record.user_id == owner)
            .cloned()
            .collect())
    }
}

/// Aggregates the word and result repositories behind trait objects for
/// easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub words: Arc<dyn WordRepository>,
    pub results: Arc<dyn GameResultRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let words: Arc<dyn WordRepository> = Arc::new(repo.clone());
        let results: Arc<dyn GameResultRepository> = Arc::new(repo);
        Self { words, results }
    }

    /// Storage backed by the hosted Realtime Database REST endpoint.
    #[must_use]
    pub fn firebase(database_url: &str) -> Self {
        let repo = crate::firebase::FirebaseRepository::new(database_url);
        let words: Arc<dyn WordRepository> = Arc::new(repo.clone());
        let results: Arc<dyn GameResultRepository> = Arc::new(repo);
        Self { words, results }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vocab_core::model::WordDraft;
    use vocab_core::time::fixed_now;

    fn build_record(word: &str, owner: &str, created_at: &str) -> WordRecord {
        WordRecord {
            word: word.to_owned(),
            translation: "mot".to_owned(),
            definition: String::new(),
            example1: String::new(),
            example2: String::new(),
            created_at: created_at.to_owned(),
            id: WordId::random(),
            user_id: UserId::new(owner),
        }
    }

    #[tokio::test]
    async fn lists_only_the_owners_words_newest_first() {
        let repo = InMemoryRepository::new();
        repo.add_word(&build_record("old", "u1", "2024-01-01T00:00:00+00:00"))
            .await
            .unwrap();
        repo.add_word(&build_record("new", "u1", "2024-03-01T00:00:00+00:00"))
            .await
            .unwrap();
        repo.add_word(&build_record("other", "u2", "2024-02-01T00:00:00+00:00"))
            .await
            .unwrap();

        let words = repo.list_words(&UserId::new("u1")).await.unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].word, "new");
        assert_eq!(words[1].word, "old");
    }

    #[tokio::test]
    async fn unknown_owner_gets_an_empty_list() {
        let repo = InMemoryRepository::new();
        let words = repo.list_words(&UserId::new("nobody")).await.unwrap();
        assert!(words.is_empty());
    }

    #[test]
    fn word_record_round_trips_through_the_domain() {
        let entry = WordDraft {
            word: "beautiful".to_owned(),
            translation: "beau".to_owned(),
            definition: "pleasing the senses".to_owned(),
            example1: "A beautiful garden.".to_owned(),
            example2: String::new(),
        }
        .validate(fixed_now())
        .unwrap()
        .assign(WordId::random(), UserId::new("u1"));

        let record = WordRecord::from_entry(&entry);
        let back = record.into_entry().unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn word_record_serializes_with_store_field_names() {
        let record = build_record("beautiful", "u1", "2024-01-01T00:00:00+00:00");
        let json = serde_json::to_value(&record).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        for expected in [
            "word",
            "translation",
            "definition",
            "example1",
            "example2",
            "created_at",
            "id",
            "user_id",
        ] {
            assert!(keys.contains(&expected), "missing field {expected}");
        }
    }

    #[test]
    fn naive_timestamps_from_older_documents_parse_as_utc() {
        let record = build_record("legacy", "u1", "2024-05-02T09:30:00.123456");
        let entry = record.into_entry().unwrap();
        assert_eq!(entry.created_at().to_rfc3339(), "2024-05-02T09:30:00.123456+00:00");
    }

    #[test]
    fn result_record_serializes_with_store_field_names() {
        let result = GameResult::new(
            GameResultId::random(),
            UserId::new("u1"),
            7,
            10,
            fixed_now(),
        )
        .unwrap();
        let json = serde_json::to_value(GameResultRecord::from_result(&result)).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        for expected in [
            "score",
            "total_questions",
            "percentage",
            "played_at",
            "id",
            "user_id",
        ] {
            assert!(keys.contains(&expected), "missing field {expected}");
        }
    }

    #[test]
    fn result_record_round_trips_through_the_domain() {
        let result = GameResult::new(
            GameResultId::random(),
            UserId::new("u1"),
            7,
            10,
            fixed_now(),
        )
        .unwrap();
        let back = GameResultRecord::from_result(&result).into_result().unwrap();
        assert_eq!(back, result);
    }
}
