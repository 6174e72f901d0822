mod game_result;
mod ids;
mod quiz;
mod word;

pub use game_result::{GameResult, GameResultError};
pub use ids::{GameResultId, ParseIdError, UserId, WordId};
pub use quiz::{
    AnswerRecord, ParseModeError, QuizMode, QuizQuestion, QuizQuestionError, SessionStatus,
    CHOICES_PER_QUESTION,
};
pub use word::{ValidatedWord, WordDraft, WordEntry, WordError};
