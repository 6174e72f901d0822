use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::{UserId, WordId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WordError {
    #[error("word must not be empty")]
    EmptyWord,
}

/// Unvalidated word content, as produced by the language model or typed in
/// by hand.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WordDraft {
    pub word: String,
    pub translation: String,
    pub definition: String,
    pub example1: String,
    pub example2: String,
}

impl WordDraft {
    /// Validate the draft and stamp it with its creation time.
    ///
    /// The word itself is trimmed and must be non-empty; translation,
    /// definition, and examples are kept as-is (they may be blank).
    ///
    /// # Errors
    ///
    /// Returns `WordError::EmptyWord` when the word is blank after trimming.
    pub fn validate(self, now: DateTime<Utc>) -> Result<ValidatedWord, WordError> {
        let word = self.word.trim().to_owned();
        if word.is_empty() {
            return Err(WordError::EmptyWord);
        }

        Ok(ValidatedWord {
            word,
            translation: self.translation,
            definition: self.definition,
            example1: self.example1,
            example2: self.example2,
            created_at: now,
        })
    }
}

/// Validated content waiting for its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedWord {
    word: String,
    translation: String,
    definition: String,
    example1: String,
    example2: String,
    created_at: DateTime<Utc>,
}

impl ValidatedWord {
    /// Attach an identifier and owner, producing the saved entry.
    #[must_use]
    pub fn assign(self, id: WordId, owner: UserId) -> WordEntry {
        WordEntry {
            id,
            owner,
            word: self.word,
            translation: self.translation,
            definition: self.definition,
            example1: self.example1,
            example2: self.example2,
            created_at: self.created_at,
        }
    }
}

/// A saved vocabulary entry.
///
/// Immutable once created; there is no edit or delete path. Per-owner
/// case-insensitive uniqueness of `word` is enforced at the service layer
/// when adding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordEntry {
    id: WordId,
    owner: UserId,
    word: String,
    translation: String,
    definition: String,
    example1: String,
    example2: String,
    created_at: DateTime<Utc>,
}

impl WordEntry {
    /// Rehydrate an entry from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `WordError::EmptyWord` for a blank word.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        id: WordId,
        owner: UserId,
        word: String,
        translation: String,
        definition: String,
        example1: String,
        example2: String,
        created_at: DateTime<Utc>,
    ) -> Result<Self, WordError> {
        if word.trim().is_empty() {
            return Err(WordError::EmptyWord);
        }

        Ok(Self {
            id,
            owner,
            word,
            translation,
            definition,
            example1,
            example2,
            created_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> WordId {
        self.id
    }

    #[must_use]
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    #[must_use]
    pub fn word(&self) -> &str {
        &self.word
    }

    #[must_use]
    pub fn translation(&self) -> &str {
        &self.translation
    }

    #[must_use]
    pub fn definition(&self) -> &str {
        &self.definition
    }

    #[must_use]
    pub fn example1(&self) -> &str {
        &self.example1
    }

    #[must_use]
    pub fn example2(&self) -> &str {
        &self.example2
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Case-insensitive comparison against another spelling of the word.
    #[must_use]
    pub fn matches_word(&self, other: &str) -> bool {
        self.word.eq_ignore_ascii_case(other.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn draft(word: &str) -> WordDraft {
        WordDraft {
            word: word.to_owned(),
            translation: "beau".to_owned(),
            definition: "pleasing the senses or mind".to_owned(),
            example1: "A beautiful garden.".to_owned(),
            example2: "She has a beautiful voice.".to_owned(),
        }
    }

    #[test]
    fn draft_fails_if_word_blank() {
        let err = draft("   ").validate(fixed_now()).unwrap_err();
        assert_eq!(err, WordError::EmptyWord);
    }

    #[test]
    fn draft_trims_the_word() {
        let entry = draft("  beautiful ")
            .validate(fixed_now())
            .unwrap()
            .assign(WordId::random(), UserId::new("u1"));
        assert_eq!(entry.word(), "beautiful");
        assert_eq!(entry.created_at(), fixed_now());
    }

    #[test]
    fn matches_word_ignores_case_and_whitespace() {
        let entry = draft("beautiful")
            .validate(fixed_now())
            .unwrap()
            .assign(WordId::random(), UserId::new("u1"));
        assert!(entry.matches_word("BEAUTIFUL"));
        assert!(entry.matches_word("  Beautiful "));
        assert!(!entry.matches_word("beauty"));
    }

    #[test]
    fn from_persisted_rejects_blank_word() {
        let err = WordEntry::from_persisted(
            WordId::random(),
            UserId::new("u1"),
            String::new(),
            "beau".to_owned(),
            String::new(),
            String::new(),
            String::new(),
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, WordError::EmptyWord);
    }
}
