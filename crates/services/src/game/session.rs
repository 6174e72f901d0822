use chrono::{DateTime, Utc};
use std::fmt;

use vocab_core::model::{
    AnswerRecord, GameResult, GameResultId, QuizMode, QuizQuestion, SessionStatus, UserId,
};

use super::plan::QuizPlan;
use super::progress::GameProgress;
use crate::error::GameError;

/// In-memory state of one quiz playthrough.
///
/// The session never touches storage; the game loop persists the final
/// tally once the last answer lands. Restarting means discarding the
/// session and building a new one.
pub struct QuizSession {
    mode: QuizMode,
    questions: Vec<QuizQuestion>,
    current: usize,
    score: u32,
    answers: Vec<AnswerRecord>,
    status: SessionStatus,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    result_id: Option<GameResultId>,
}

impl QuizSession {
    /// Create an in-progress session from a built plan.
    ///
    /// `started_at` should come from the services layer clock.
    #[must_use]
    pub fn new(plan: QuizPlan, started_at: DateTime<Utc>) -> Self {
        Self {
            mode: plan.mode,
            questions: plan.questions,
            current: 0,
            score: 0,
            answers: Vec::new(),
            status: SessionStatus::InProgress,
            started_at,
            completed_at: None,
            result_id: None,
        }
    }

    #[must_use]
    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Identifier of the persisted result, once saved.
    #[must_use]
    pub fn result_id(&self) -> Option<GameResultId> {
        self.result_id
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    /// Total number of questions in this session.
    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Number of questions that have already been answered.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// Zero-based index of the question currently shown.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    /// The question awaiting an answer, or `None` once completed.
    #[must_use]
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        if self.status == SessionStatus::InProgress {
            self.questions.get(self.current)
        } else {
            None
        }
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> GameProgress {
        GameProgress {
            total: self.total_questions(),
            answered: self.answered_count(),
            remaining: self.total_questions().saturating_sub(self.answered_count()),
            is_complete: self.is_complete(),
        }
    }

    /// Record an answer for the current question and advance.
    ///
    /// There is no undo: submitting twice counts as two separate answers.
    /// `answered_at` should come from the services layer clock and becomes
    /// the completion time when the last question is answered.
    ///
    /// # Errors
    ///
    /// Returns `GameError::SessionCompleted` when the session is no longer
    /// in progress.
    pub fn submit_answer(
        &mut self,
        selected_choice: &str,
        answered_at: DateTime<Utc>,
    ) -> Result<&AnswerRecord, GameError> {
        if self.status != SessionStatus::InProgress {
            return Err(GameError::SessionCompleted);
        }

        let question = &self.questions[self.current];
        let is_correct = question.is_correct(selected_choice);
        self.answers.push(AnswerRecord {
            source_word: question.source_word().to_owned(),
            selected_choice: selected_choice.to_owned(),
            correct_answer: question.correct_answer().to_owned(),
            is_correct,
        });
        if is_correct {
            self.score += 1;
        }

        if self.current == self.questions.len() - 1 {
            self.status = SessionStatus::Completed;
            self.completed_at = Some(answered_at);
        } else {
            self.current += 1;
        }

        self.answers.last().ok_or(GameError::SessionCompleted)
    }

    /// Final tally for a completed session.
    ///
    /// # Errors
    ///
    /// Returns `GameError::SessionNotFinished` before the last answer.
    pub fn build_result(
        &self,
        owner: UserId,
        played_at: DateTime<Utc>,
    ) -> Result<GameResult, GameError> {
        if !self.is_complete() {
            return Err(GameError::SessionNotFinished);
        }

        let total = u32::try_from(self.questions.len()).unwrap_or(u32::MAX);
        Ok(GameResult::new(
            GameResultId::random(),
            owner,
            self.score,
            total,
            played_at,
        )?)
    }

    pub(crate) fn set_result_id(&mut self, id: GameResultId) {
        self.result_id = Some(id);
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("mode", &self.mode)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("score", &self.score)
            .field("status", &self.status)
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .field("result_id", &self.result_id)
            .finish_non_exhaustive()
    }
}
