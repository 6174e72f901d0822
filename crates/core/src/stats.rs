//! Aggregate statistics over played games and saved words.

use std::collections::BTreeMap;

use crate::model::{GameResult, WordEntry};

/// Quiz performance across all of a user's games.
///
/// `best_score` and `average_score` are `None` when no games exist, so
/// callers never divide by zero on an empty history.
#[derive(Debug, Clone, PartialEq)]
pub struct GameStats {
    pub total_games: usize,
    pub best_score: Option<f64>,
    pub average_score: Option<f64>,
}

impl GameStats {
    /// Stats for a user who has not played yet.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            total_games: 0,
            best_score: None,
            average_score: None,
        }
    }
}

/// Number of words added within one calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyCount {
    /// Calendar month key, `YYYY-MM`.
    pub month: String,
    pub count: usize,
}

/// Compute total games, best percentage, and mean percentage.
#[must_use]
pub fn game_stats(results: &[GameResult]) -> GameStats {
    if results.is_empty() {
        return GameStats::empty();
    }

    let mut best = f64::MIN;
    let mut sum = 0.0;
    for result in results {
        let percentage = result.percentage();
        if percentage > best {
            best = percentage;
        }
        sum += percentage;
    }

    #[allow(clippy::cast_precision_loss)]
    let average = sum / results.len() as f64;
    GameStats {
        total_games: results.len(),
        best_score: Some(best),
        average_score: Some(average),
    }
}

/// Count new words per calendar month, ascending by month key.
///
/// Months with no additions are not synthesized.
#[must_use]
pub fn monthly_progress(words: &[WordEntry]) -> Vec<MonthlyCount> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for entry in words {
        let month = entry.created_at().format("%Y-%m").to_string();
        *counts.entry(month).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(month, count)| MonthlyCount { month, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GameResultId, UserId, WordDraft, WordId};
    use chrono::{DateTime, Utc};

    fn result(score: u32) -> GameResult {
        GameResult::new(
            GameResultId::random(),
            UserId::new("u1"),
            score,
            10,
            crate::time::fixed_now(),
        )
        .unwrap()
    }

    fn word_created_at(raw: &str) -> WordEntry {
        let created_at: DateTime<Utc> = raw.parse().unwrap();
        WordDraft {
            word: format!("word-{raw}"),
            translation: "mot".to_owned(),
            ..WordDraft::default()
        }
        .validate(created_at)
        .unwrap()
        .assign(WordId::random(), UserId::new("u1"))
    }

    #[test]
    fn stats_over_no_games_use_sentinels() {
        let stats = game_stats(&[]);
        assert_eq!(stats.total_games, 0);
        assert_eq!(stats.best_score, None);
        assert_eq!(stats.average_score, None);
    }

    #[test]
    fn stats_track_best_and_average() {
        let stats = game_stats(&[result(10), result(5), result(8)]);
        assert_eq!(stats.total_games, 3);
        assert_eq!(stats.best_score, Some(100.0));
        let average = stats.average_score.unwrap();
        assert!((average - (100.0 + 50.0 + 80.0) / 3.0).abs() < 1e-9);
    }

    #[test]
    fn monthly_progress_groups_by_calendar_month() {
        let words = vec![
            word_created_at("2024-01-05T10:00:00Z"),
            word_created_at("2024-01-20T10:00:00Z"),
            word_created_at("2024-02-01T10:00:00Z"),
        ];

        let progress = monthly_progress(&words);
        assert_eq!(
            progress,
            vec![
                MonthlyCount {
                    month: "2024-01".to_owned(),
                    count: 2
                },
                MonthlyCount {
                    month: "2024-02".to_owned(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn monthly_progress_is_empty_without_words() {
        assert!(monthly_progress(&[]).is_empty());
    }
}
