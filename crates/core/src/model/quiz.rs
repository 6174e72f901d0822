use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::model::word::WordEntry;

/// Number of choices shown for every question.
pub const CHOICES_PER_QUESTION: usize = 4;

/// Which field a quiz session quizzes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizMode {
    /// Guess the French translation of the English word.
    Translation,
    /// Guess the English definition of the word.
    Definition,
}

impl QuizMode {
    /// The answer value this mode quizzes on for the given entry.
    #[must_use]
    pub fn answer_for<'a>(self, entry: &'a WordEntry) -> &'a str {
        match self {
            QuizMode::Translation => entry.translation(),
            QuizMode::Definition => entry.definition(),
        }
    }
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizMode::Translation => write!(f, "translation"),
            QuizMode::Definition => write!(f, "definition"),
        }
    }
}

/// Error type for parsing a quiz mode from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseModeError {
    raw: String,
}

impl fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown quiz mode {:?} (expected \"translation\" or \"definition\")",
            self.raw
        )
    }
}

impl std::error::Error for ParseModeError {}

impl FromStr for QuizMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "translation" => Ok(QuizMode::Translation),
            "definition" => Ok(QuizMode::Definition),
            _ => Err(ParseModeError { raw: s.to_owned() }),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizQuestionError {
    #[error("expected {expected} choices, got {actual}")]
    ChoiceCount { expected: usize, actual: usize },

    #[error("correct answer must appear in the choices exactly once (found {found})")]
    CorrectAnswerCount { found: usize },
}

/// A single multiple-choice question derived from one saved word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    source_word: String,
    correct_answer: String,
    choices: Vec<String>,
    mode: QuizMode,
}

impl QuizQuestion {
    /// Assemble a question from an already-shuffled choice list.
    ///
    /// # Errors
    ///
    /// Returns `QuizQuestionError` unless there are exactly
    /// [`CHOICES_PER_QUESTION`] choices containing `correct_answer` exactly
    /// once.
    pub fn new(
        source_word: String,
        correct_answer: String,
        choices: Vec<String>,
        mode: QuizMode,
    ) -> Result<Self, QuizQuestionError> {
        if choices.len() != CHOICES_PER_QUESTION {
            return Err(QuizQuestionError::ChoiceCount {
                expected: CHOICES_PER_QUESTION,
                actual: choices.len(),
            });
        }
        let found = choices.iter().filter(|c| **c == correct_answer).count();
        if found != 1 {
            return Err(QuizQuestionError::CorrectAnswerCount { found });
        }

        Ok(Self {
            source_word,
            correct_answer,
            choices,
            mode,
        })
    }

    /// The English word being asked about.
    #[must_use]
    pub fn source_word(&self) -> &str {
        &self.source_word
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    /// The shuffled choice list shown to the player.
    #[must_use]
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    #[must_use]
    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    #[must_use]
    pub fn is_correct(&self, selected_choice: &str) -> bool {
        selected_choice == self.correct_answer
    }
}

/// Outcome of a single submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub source_word: String,
    pub selected_choice: String,
    pub correct_answer: String,
    pub is_correct: bool,
}

/// Lifecycle of a quiz session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    #[test]
    fn question_requires_four_choices() {
        let err = QuizQuestion::new(
            "cat".to_owned(),
            "chat".to_owned(),
            choices(&["chat", "chien", "oiseau"]),
            QuizMode::Translation,
        )
        .unwrap_err();
        assert_eq!(
            err,
            QuizQuestionError::ChoiceCount {
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn question_requires_correct_answer_once() {
        let err = QuizQuestion::new(
            "cat".to_owned(),
            "chat".to_owned(),
            choices(&["chien", "oiseau", "poisson", "cheval"]),
            QuizMode::Translation,
        )
        .unwrap_err();
        assert_eq!(err, QuizQuestionError::CorrectAnswerCount { found: 0 });

        let err = QuizQuestion::new(
            "cat".to_owned(),
            "chat".to_owned(),
            choices(&["chat", "chat", "oiseau", "poisson"]),
            QuizMode::Translation,
        )
        .unwrap_err();
        assert_eq!(err, QuizQuestionError::CorrectAnswerCount { found: 2 });
    }

    #[test]
    fn question_checks_answers_exactly() {
        let question = QuizQuestion::new(
            "cat".to_owned(),
            "chat".to_owned(),
            choices(&["chien", "chat", "oiseau", "poisson"]),
            QuizMode::Translation,
        )
        .unwrap();
        assert!(question.is_correct("chat"));
        assert!(!question.is_correct("Chat"));
        assert!(!question.is_correct("chien"));
    }

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("translation".parse::<QuizMode>().unwrap(), QuizMode::Translation);
        assert_eq!("Definition".parse::<QuizMode>().unwrap(), QuizMode::Definition);
        assert!("spelling".parse::<QuizMode>().is_err());
    }
}
