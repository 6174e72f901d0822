use std::sync::Arc;

use storage::repository::{WordRecord, WordRepository};
use vocab_core::model::{UserId, WordDraft, WordEntry, WordId};

use crate::error::WordServiceError;
use crate::Clock;

/// Manages a user's saved vocabulary.
#[derive(Clone)]
pub struct WordService {
    clock: Clock,
    words: Arc<dyn WordRepository>,
}

impl WordService {
    #[must_use]
    pub fn new(clock: Clock, words: Arc<dyn WordRepository>) -> Self {
        Self { clock, words }
    }

    /// Save a new word for the user.
    ///
    /// The word must not already exist in the user's collection; the check
    /// is case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns `WordServiceError::Duplicate` for an already-saved word,
    /// `WordServiceError::Word` for invalid content, and storage errors
    /// otherwise.
    pub async fn add_word(
        &self,
        owner: &UserId,
        draft: WordDraft,
    ) -> Result<WordEntry, WordServiceError> {
        let existing = self.list_words(owner).await?;
        if let Some(duplicate) = existing.iter().find(|entry| entry.matches_word(&draft.word)) {
            return Err(WordServiceError::Duplicate {
                word: duplicate.word().to_owned(),
            });
        }

        let entry = draft
            .validate(self.clock.now())?
            .assign(WordId::random(), owner.clone());
        self.words.add_word(&WordRecord::from_entry(&entry)).await?;
        tracing::debug!(word = entry.word(), "word saved");
        Ok(entry)
    }

    /// List the user's words, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the word store is unreachable.
    pub async fn list_words(&self, owner: &UserId) -> Result<Vec<WordEntry>, WordServiceError> {
        let records = self.words.list_words(owner).await?;
        let mut entries = Vec::with_capacity(records.len());
        for record in records {
            entries.push(record.into_entry()?);
        }
        Ok(entries)
    }

    /// Number of words the user has saved.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the word store is unreachable.
    pub async fn word_count(&self, owner: &UserId) -> Result<usize, WordServiceError> {
        Ok(self.words.list_words(owner).await?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;
    use vocab_core::time::fixed_clock;

    fn draft(word: &str) -> WordDraft {
        WordDraft {
            word: word.to_owned(),
            translation: "beau".to_owned(),
            definition: "pleasing the senses".to_owned(),
            example1: "A beautiful garden.".to_owned(),
            example2: "A beautiful day.".to_owned(),
        }
    }

    fn service() -> (WordService, InMemoryRepository) {
        let repo = InMemoryRepository::new();
        (
            WordService::new(fixed_clock(), Arc::new(repo.clone())),
            repo,
        )
    }

    #[tokio::test]
    async fn adds_and_lists_a_word() {
        let (service, _repo) = service();
        let owner = UserId::new("u1");

        let entry = service.add_word(&owner, draft("beautiful")).await.unwrap();
        assert_eq!(entry.word(), "beautiful");

        let listed = service.list_words(&owner).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0], entry);
        assert_eq!(service.word_count(&owner).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn rejects_case_insensitive_duplicates() {
        let (service, repo) = service();
        let owner = UserId::new("u1");
        service.add_word(&owner, draft("apple")).await.unwrap();

        let err = service.add_word(&owner, draft("Apple")).await.unwrap_err();
        assert!(matches!(err, WordServiceError::Duplicate { word } if word == "apple"));

        // The failed add must not have written anything.
        let stored = repo.list_words(&owner).await.unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn same_word_is_fine_for_different_users() {
        let (service, _repo) = service();
        service
            .add_word(&UserId::new("u1"), draft("apple"))
            .await
            .unwrap();
        service
            .add_word(&UserId::new("u2"), draft("apple"))
            .await
            .unwrap();

        assert_eq!(service.word_count(&UserId::new("u1")).await.unwrap(), 1);
        assert_eq!(service.word_count(&UserId::new("u2")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn blank_words_are_rejected() {
        let (service, _repo) = service();
        let err = service
            .add_word(&UserId::new("u1"), draft("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, WordServiceError::Word(_)));
    }
}
