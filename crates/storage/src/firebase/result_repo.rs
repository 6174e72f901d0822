use async_trait::async_trait;

use vocab_core::model::UserId;

use super::FirebaseRepository;
use crate::repository::{GameResultRecord, GameResultRepository, StorageError};

const RESULTS_COLLECTION: &str = "game_results";

#[async_trait]
impl GameResultRepository for FirebaseRepository {
    async fn save_result(&self, record: &GameResultRecord) -> Result<(), StorageError> {
        self.push_document(RESULTS_COLLECTION, record).await
    }

    async fn list_results(&self, owner: &UserId) -> Result<Vec<GameResultRecord>, StorageError> {
        Ok(self
            .fetch_collection(RESULTS_COLLECTION)
            .await?
            .into_iter()
            .filter(|record: &GameResultRecord| &record.user_id == owner)
            .collect())
    }
}
