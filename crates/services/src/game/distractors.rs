use rand::seq::IndexedRandom;
use rand::Rng;
use std::collections::HashSet;

use vocab_core::model::{QuizMode, WordEntry};

/// Number of wrong choices shown next to the correct answer.
pub const DISTRACTORS_PER_QUESTION: usize = 3;

/// Generic wrong translations, used when the pool cannot supply three
/// distinct distractors on its own.
const GENERIC_TRANSLATIONS: [&str; 8] = [
    "Un animal domestique",
    "Un objet de cuisine",
    "Une couleur vive",
    "Un moyen de transport",
    "Un sentiment positif",
    "Une action quotidienne",
    "Un élément naturel",
    "Une partie du corps",
];

/// Generic wrong definitions, same role as the translations above.
const GENERIC_DEFINITIONS: [&str; 8] = [
    "A feeling of great pleasure and happiness",
    "The action of traveling in or through an unfamiliar area",
    "A person whom one knows and with whom one has a bond",
    "The ability to do something that frightens one",
    "The quality of having experience, knowledge, and good judgment",
    "A large naturally occurring community of flora and fauna",
    "The practice of being or tendency to be positive or optimistic",
    "Something that is remembered from the past",
];

/// Pick three plausible wrong answers for `correct_answer`.
///
/// Candidates come from the whole pool (translations or definitions
/// depending on `mode`), skipping blanks and anything equal to the correct
/// answer. If fewer than three distinct candidates exist, the shortfall is
/// padded from the generic list for the mode, each padding value used at
/// most once.
pub fn generate_distractors<R: Rng + ?Sized>(
    correct_answer: &str,
    pool: &[WordEntry],
    mode: QuizMode,
    rng: &mut R,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let candidates: Vec<&str> = pool
        .iter()
        .map(|entry| mode.answer_for(entry))
        .filter(|value| !value.is_empty() && *value != correct_answer)
        .filter(|value| seen.insert(*value))
        .collect();

    if candidates.len() >= DISTRACTORS_PER_QUESTION {
        return candidates
            .choose_multiple(rng, DISTRACTORS_PER_QUESTION)
            .map(|value| (*value).to_owned())
            .collect();
    }

    let generic = match mode {
        QuizMode::Translation => &GENERIC_TRANSLATIONS[..],
        QuizMode::Definition => &GENERIC_DEFINITIONS[..],
    };
    let padding: Vec<&str> = generic
        .iter()
        .copied()
        .filter(|value| *value != correct_answer && !seen.contains(value))
        .collect();

    let missing = DISTRACTORS_PER_QUESTION - candidates.len();
    let mut distractors: Vec<String> =
        candidates.into_iter().map(str::to_owned).collect();
    distractors.extend(
        padding
            .choose_multiple(rng, missing)
            .map(|value| (*value).to_owned()),
    );
    distractors
}
