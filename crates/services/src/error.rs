//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use vocab_core::model::{GameResultError, QuizQuestionError, WordError};

/// Errors emitted by `AiService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AiError {
    #[error("word content generation is not configured")]
    Disabled,

    #[error("input does not look like an English word or phrase")]
    NotEnglish,

    #[error("the language model returned an empty response")]
    EmptyResponse,

    #[error("content generation request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("identity provider API key is not configured")]
    MissingApiKey,

    #[error("identity provider rejected the request: {code}")]
    Api { code: String },

    #[error("the session token is invalid or expired")]
    InvalidToken,

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl AuthError {
    /// User-facing message, localized for the product's French interface.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Api { code } => match code.as_str() {
                "EMAIL_EXISTS" => "Cette adresse email est déjà utilisée".to_owned(),
                "EMAIL_NOT_FOUND" => "Aucun compte trouvé avec cette adresse email".to_owned(),
                "INVALID_PASSWORD" => "Mot de passe incorrect".to_owned(),
                "INVALID_EMAIL" => "Adresse email invalide".to_owned(),
                "TOO_MANY_ATTEMPTS_TRY_LATER" => {
                    "Trop de tentatives. Réessayez plus tard".to_owned()
                }
                "USER_DISABLED" => "Ce compte a été désactivé".to_owned(),
                // The provider appends detail after a colon for this one.
                code if code.starts_with("WEAK_PASSWORD") => {
                    "Le mot de passe doit contenir au moins 6 caractères".to_owned()
                }
                other => other.to_owned(),
            },
            other => other.to_string(),
        }
    }
}

/// Errors emitted by `TtsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TtsError {
    #[error("nothing to synthesize")]
    EmptyText,

    #[error("text is too long to synthesize in one request ({len} > {max})")]
    TextTooLong { len: usize, max: usize },

    #[error("speech synthesis request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by `WordService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WordServiceError {
    #[error("the word {word:?} is already saved")]
    Duplicate { word: String },

    #[error(transparent)]
    Word(#[from] WordError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the quiz game subsystem.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GameError {
    #[error("at least {required} saved words are needed to play, found {actual}")]
    InsufficientWords { required: usize, actual: usize },

    #[error("the session is already completed")]
    SessionCompleted,

    #[error("the session is not finished yet")]
    SessionNotFinished,

    #[error(transparent)]
    Question(#[from] QuizQuestionError),

    #[error(transparent)]
    Result(#[from] GameResultError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `StatsService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StatsError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}
