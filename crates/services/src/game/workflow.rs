use std::sync::Arc;

use storage::repository::{GameResultRecord, GameResultRepository, WordRepository};
use vocab_core::model::{AnswerRecord, GameResultId, QuizMode, UserId, WordEntry};

use super::plan::QuizBuilder;
use super::session::QuizSession;
use crate::error::GameError;
use crate::Clock;

/// Result of answering a single question through the game loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameAnswerResult {
    pub answer: AnswerRecord,
    pub is_complete: bool,
    pub result_id: Option<GameResultId>,
}

/// Orchestrates quiz start and persisted scoring.
#[derive(Clone)]
pub struct GameLoopService {
    clock: Clock,
    words: Arc<dyn WordRepository>,
    results: Arc<dyn GameResultRepository>,
}

impl GameLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        words: Arc<dyn WordRepository>,
        results: Arc<dyn GameResultRepository>,
    ) -> Self {
        Self {
            clock,
            words,
            results,
        }
    }

    /// Start a new quiz for the given user and mode.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InsufficientWords` when fewer than the minimum
    /// number of words are saved, or `GameError::Storage` when the word
    /// store is unreachable.
    pub async fn start_game(
        &self,
        owner: &UserId,
        mode: QuizMode,
    ) -> Result<QuizSession, GameError> {
        let pool = self.load_pool(owner).await?;
        let plan = QuizBuilder::new(mode).build(&pool, &mut rand::rng())?;
        tracing::debug!(%owner, %mode, pool = pool.len(), "quiz session started");
        Ok(QuizSession::new(plan, self.clock.now()))
    }

    /// Answer the current question and persist the final tally once the
    /// session completes.
    ///
    /// A failed save does not lose the in-memory session; score and answers
    /// stay available and [`Self::finalize_result`] retries persistence.
    ///
    /// # Errors
    ///
    /// Returns `GameError::SessionCompleted` for an already-finished
    /// session and `GameError::Storage` when the result sink fails.
    pub async fn answer_current(
        &self,
        owner: &UserId,
        session: &mut QuizSession,
        selected_choice: &str,
    ) -> Result<GameAnswerResult, GameError> {
        let answered_at = self.clock.now();
        let answer = session.submit_answer(selected_choice, answered_at)?.clone();

        if session.is_complete() && session.result_id().is_none() {
            self.persist_result(owner, session).await?;
        }

        Ok(GameAnswerResult {
            answer,
            is_complete: session.is_complete(),
            result_id: session.result_id(),
        })
    }

    /// Retry persisting the final tally of a completed session.
    ///
    /// Useful when the save at completion failed (e.g. transient store
    /// error); already-persisted sessions return their existing id.
    ///
    /// # Errors
    ///
    /// Returns `GameError::SessionNotFinished` before the last answer and
    /// `GameError::Storage` when the sink still fails.
    pub async fn finalize_result(
        &self,
        owner: &UserId,
        session: &mut QuizSession,
    ) -> Result<GameResultId, GameError> {
        if let Some(id) = session.result_id() {
            return Ok(id);
        }
        self.persist_result(owner, session).await
    }

    async fn load_pool(&self, owner: &UserId) -> Result<Vec<WordEntry>, GameError> {
        let records = self.words.list_words(owner).await?;
        let mut pool = Vec::with_capacity(records.len());
        for record in records {
            pool.push(record.into_entry()?);
        }
        Ok(pool)
    }

    async fn persist_result(
        &self,
        owner: &UserId,
        session: &mut QuizSession,
    ) -> Result<GameResultId, GameError> {
        let played_at = session
            .completed_at()
            .ok_or(GameError::SessionNotFinished)?;
        let result = session.build_result(owner.clone(), played_at)?;
        self.results
            .save_result(&GameResultRecord::from_result(&result))
            .await?;
        session.set_result_id(result.id());
        tracing::info!(
            score = result.score(),
            total = result.total_questions(),
            "game result saved"
        );
        Ok(result.id())
    }
}
