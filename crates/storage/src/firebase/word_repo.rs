use async_trait::async_trait;

use vocab_core::model::UserId;

use super::FirebaseRepository;
use crate::repository::{StorageError, WordRecord, WordRepository};

const WORDS_COLLECTION: &str = "words";

#[async_trait]
impl WordRepository for FirebaseRepository {
    async fn add_word(&self, record: &WordRecord) -> Result<(), StorageError> {
        self.push_document(WORDS_COLLECTION, record).await
    }

    async fn list_words(&self, owner: &UserId) -> Result<Vec<WordRecord>, StorageError> {
        let mut words: Vec<WordRecord> = self
            .fetch_collection(WORDS_COLLECTION)
            .await?
            .into_iter()
            .filter(|record: &WordRecord| &record.user_id == owner)
            .collect();

        // Newest first; the timestamp format sorts lexicographically.
        words.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(words)
    }
}
