use std::sync::Arc;

use storage::repository::{GameResultRepository, WordRepository};
use vocab_core::model::{GameResult, UserId, WordEntry};
use vocab_core::stats::{self, GameStats, MonthlyCount};

use crate::error::StatsError;

/// Read side of the learning statistics page: word counts, quiz
/// performance, and monthly progress.
#[derive(Clone)]
pub struct StatsService {
    words: Arc<dyn WordRepository>,
    results: Arc<dyn GameResultRepository>,
}

impl StatsService {
    #[must_use]
    pub fn new(words: Arc<dyn WordRepository>, results: Arc<dyn GameResultRepository>) -> Self {
        Self { words, results }
    }

    /// Aggregate quiz performance for the user.
    ///
    /// A user with no games gets the zero stats, not an error.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the result store is unreachable.
    pub async fn game_stats(&self, owner: &UserId) -> Result<GameStats, StatsError> {
        let results = self.list_results(owner).await?;
        Ok(stats::game_stats(&results))
    }

    /// New-word counts per calendar month, ascending by month.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the word store is unreachable.
    pub async fn monthly_progress(&self, owner: &UserId) -> Result<Vec<MonthlyCount>, StatsError> {
        let entries = self.list_entries(owner).await?;
        Ok(stats::monthly_progress(&entries))
    }

    /// Number of words the user has saved.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the word store is unreachable.
    pub async fn word_count(&self, owner: &UserId) -> Result<usize, StatsError> {
        Ok(self.words.list_words(owner).await?.len())
    }

    async fn list_entries(&self, owner: &UserId) -> Result<Vec<WordEntry>, StatsError> {
        let records = self.words.list_words(owner).await?;
        let mut entries = Vec::with_capacity(records.len());
        for record in records {
            entries.push(record.into_entry()?);
        }
        Ok(entries)
    }

    async fn list_results(&self, owner: &UserId) -> Result<Vec<GameResult>, StatsError> {
        let records = self.results.list_results(owner).await?;
        let mut results = Vec::with_capacity(records.len());
        for record in records {
            results.push(record.into_result()?);
        }
        Ok(results)
    }
}
