use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::{GameResultId, UserId};

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum GameResultError {
    #[error("a game result needs at least one question")]
    NoQuestions,

    #[error("score ({score}) exceeds total questions ({total})")]
    ScoreExceedsTotal { score: u32, total: u32 },

    #[error("stored percentage {stored} does not match score {score}/{total}")]
    PercentageMismatch { stored: f64, score: u32, total: u32 },
}

/// Final tally of one completed quiz session.
///
/// The percentage is always derived from score and total; a stored value is
/// only cross-checked on rehydration.
#[derive(Debug, Clone, PartialEq)]
pub struct GameResult {
    id: GameResultId,
    owner: UserId,
    score: u32,
    total_questions: u32,
    played_at: DateTime<Utc>,
}

impl GameResult {
    /// Build a result for a finished session.
    ///
    /// # Errors
    ///
    /// Returns `GameResultError::NoQuestions` for an empty session and
    /// `GameResultError::ScoreExceedsTotal` for an impossible score.
    pub fn new(
        id: GameResultId,
        owner: UserId,
        score: u32,
        total_questions: u32,
        played_at: DateTime<Utc>,
    ) -> Result<Self, GameResultError> {
        if total_questions == 0 {
            return Err(GameResultError::NoQuestions);
        }
        if score > total_questions {
            return Err(GameResultError::ScoreExceedsTotal {
                score,
                total: total_questions,
            });
        }

        Ok(Self {
            id,
            owner,
            score,
            total_questions,
            played_at,
        })
    }

    /// Rehydrate a result from persisted storage, cross-checking the stored
    /// percentage against the score.
    ///
    /// # Errors
    ///
    /// Returns `GameResultError::PercentageMismatch` when the stored value
    /// disagrees with the score beyond float round-trip tolerance.
    pub fn from_persisted(
        id: GameResultId,
        owner: UserId,
        score: u32,
        total_questions: u32,
        percentage: f64,
        played_at: DateTime<Utc>,
    ) -> Result<Self, GameResultError> {
        let result = Self::new(id, owner, score, total_questions, played_at)?;
        if (result.percentage() - percentage).abs() > 0.01 {
            return Err(GameResultError::PercentageMismatch {
                stored: percentage,
                score,
                total: total_questions,
            });
        }
        Ok(result)
    }

    #[must_use]
    pub fn id(&self) -> GameResultId {
        self.id
    }

    #[must_use]
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn played_at(&self) -> DateTime<Utc> {
        self.played_at
    }

    /// Share of correct answers, 0.0 to 100.0.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        f64::from(self.score) * 100.0 / f64::from(self.total_questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn owner() -> UserId {
        UserId::new("u1")
    }

    #[test]
    fn perfect_game_is_one_hundred_percent() {
        let result =
            GameResult::new(GameResultId::random(), owner(), 10, 10, fixed_now()).unwrap();
        assert!((result.percentage() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_score_computes_percentage() {
        let result = GameResult::new(GameResultId::random(), owner(), 7, 10, fixed_now()).unwrap();
        assert!((result.percentage() - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn score_cannot_exceed_total() {
        let err =
            GameResult::new(GameResultId::random(), owner(), 11, 10, fixed_now()).unwrap_err();
        assert_eq!(
            err,
            GameResultError::ScoreExceedsTotal {
                score: 11,
                total: 10
            }
        );
    }

    #[test]
    fn empty_game_is_rejected() {
        let err = GameResult::new(GameResultId::random(), owner(), 0, 0, fixed_now()).unwrap_err();
        assert_eq!(err, GameResultError::NoQuestions);
    }

    #[test]
    fn from_persisted_cross_checks_percentage() {
        let id = GameResultId::random();
        let ok = GameResult::from_persisted(id, owner(), 7, 10, 70.0, fixed_now());
        assert!(ok.is_ok());

        let err = GameResult::from_persisted(id, owner(), 7, 10, 90.0, fixed_now()).unwrap_err();
        assert!(matches!(err, GameResultError::PercentageMismatch { .. }));
    }
}
