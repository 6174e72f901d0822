use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;

use vocab_core::model::{QuizMode, QuizQuestion, WordEntry};

use super::distractors::generate_distractors;
use crate::error::GameError;

/// Number of questions in one quiz session.
pub const QUESTIONS_PER_SESSION: usize = 10;

/// Smallest pool a quiz can be built from.
pub const MIN_POOL_SIZE: usize = 15;

/// A fully assembled question set, ready to become a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizPlan {
    pub mode: QuizMode,
    pub questions: Vec<QuizQuestion>,
}

impl QuizPlan {
    /// Total number of questions in this plan.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }
}

/// Builds a quiz by sampling words and assembling shuffled choice sets.
///
/// Distractors are drawn from the entire pool, not only the sampled
/// entries, so a large vocabulary keeps producing fresh wrong answers.
pub struct QuizBuilder {
    mode: QuizMode,
    question_count: usize,
    min_pool: usize,
}

impl QuizBuilder {
    #[must_use]
    pub fn new(mode: QuizMode) -> Self {
        Self {
            mode,
            question_count: QUESTIONS_PER_SESSION,
            min_pool: MIN_POOL_SIZE,
        }
    }

    /// Build a quiz plan from the user's full pool.
    ///
    /// Sampling, distractor choice, and choice order all come from `rng`,
    /// so a seeded generator reproduces the exact same plan.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InsufficientWords` when the pool is smaller than
    /// the minimum, and `GameError::Question` if a choice set cannot be
    /// assembled.
    pub fn build<R: Rng + ?Sized>(
        &self,
        pool: &[WordEntry],
        rng: &mut R,
    ) -> Result<QuizPlan, GameError> {
        if pool.len() < self.min_pool {
            return Err(GameError::InsufficientWords {
                required: self.min_pool,
                actual: pool.len(),
            });
        }

        let selected: Vec<&WordEntry> = pool
            .choose_multiple(rng, self.question_count)
            .collect();

        let mut questions = Vec::with_capacity(selected.len());
        for entry in selected {
            let correct_answer = self.mode.answer_for(entry).to_owned();
            let mut choices = generate_distractors(&correct_answer, pool, self.mode, rng);
            choices.push(correct_answer.clone());
            choices.shuffle(rng);

            questions.push(QuizQuestion::new(
                entry.word().to_owned(),
                correct_answer,
                choices,
                self.mode,
            )?);
        }

        Ok(QuizPlan {
            mode: self.mode,
            questions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;
    use vocab_core::model::{UserId, WordDraft, WordId, CHOICES_PER_QUESTION};
    use vocab_core::time::fixed_now;

    fn build_pool(size: usize) -> Vec<WordEntry> {
        (0..size)
            .map(|i| {
                WordDraft {
                    word: format!("word{i}"),
                    translation: format!("mot{i}"),
                    definition: format!("definition of word {i}"),
                    example1: format!("Example with word{i}."),
                    example2: String::new(),
                }
                .validate(fixed_now())
                .unwrap()
                .assign(WordId::random(), UserId::new("u1"))
            })
            .collect()
    }

    #[test]
    fn builder_rejects_small_pools() {
        let pool = build_pool(14);
        let mut rng = StdRng::seed_from_u64(42);
        let err = QuizBuilder::new(QuizMode::Translation)
            .build(&pool, &mut rng)
            .unwrap_err();

        assert!(matches!(
            err,
            GameError::InsufficientWords {
                required: 15,
                actual: 14
            }
        ));
    }

    #[test]
    fn builder_produces_ten_well_formed_questions() {
        let pool = build_pool(15);
        let mut rng = StdRng::seed_from_u64(42);
        let plan = QuizBuilder::new(QuizMode::Translation)
            .build(&pool, &mut rng)
            .unwrap();

        assert_eq!(plan.total(), QUESTIONS_PER_SESSION);
        for question in &plan.questions {
            assert_eq!(question.choices().len(), CHOICES_PER_QUESTION);
            let unique: HashSet<&String> = question.choices().iter().collect();
            assert_eq!(unique.len(), CHOICES_PER_QUESTION, "choices must be distinct");
            assert_eq!(
                question
                    .choices()
                    .iter()
                    .filter(|c| *c == question.correct_answer())
                    .count(),
                1
            );
        }
    }

    #[test]
    fn builder_samples_distinct_source_words() {
        let pool = build_pool(20);
        let mut rng = StdRng::seed_from_u64(9);
        let plan = QuizBuilder::new(QuizMode::Definition)
            .build(&pool, &mut rng)
            .unwrap();

        let words: HashSet<&str> = plan
            .questions
            .iter()
            .map(QuizQuestion::source_word)
            .collect();
        assert_eq!(words.len(), QUESTIONS_PER_SESSION);
    }

    #[test]
    fn same_seed_reproduces_the_same_plan() {
        let pool = build_pool(15);
        let mut first_rng = StdRng::seed_from_u64(42);
        let mut second_rng = StdRng::seed_from_u64(42);

        let first = QuizBuilder::new(QuizMode::Translation)
            .build(&pool, &mut first_rng)
            .unwrap();
        let second = QuizBuilder::new(QuizMode::Translation)
            .build(&pool, &mut second_rng)
            .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn definition_mode_quizzes_on_definitions() {
        let pool = build_pool(15);
        let mut rng = StdRng::seed_from_u64(5);
        let plan = QuizBuilder::new(QuizMode::Definition)
            .build(&pool, &mut rng)
            .unwrap();

        for question in &plan.questions {
            assert!(question.correct_answer().starts_with("definition of word"));
        }
    }
}
