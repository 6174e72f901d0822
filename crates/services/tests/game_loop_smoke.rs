use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use services::{Clock, GameError, GameLoopService};
use storage::repository::{
    GameResultRecord, GameResultRepository, InMemoryRepository, StorageError, WordRecord,
    WordRepository,
};
use vocab_core::model::{QuizMode, UserId, WordDraft, WordId};
use vocab_core::time::fixed_now;

async fn seed_words(repo: &InMemoryRepository, owner: &UserId, count: usize) {
    for i in 0..count {
        let entry = WordDraft {
            word: format!("word{i}"),
            translation: format!("mot{i}"),
            definition: format!("definition of word {i}"),
            example1: format!("Example with word{i}."),
            example2: String::new(),
        }
        .validate(fixed_now())
        .unwrap()
        .assign(WordId::random(), owner.clone());
        repo.add_word(&WordRecord::from_entry(&entry)).await.unwrap();
    }
}

#[tokio::test]
async fn full_game_persists_one_result() {
    let repo = InMemoryRepository::new();
    let owner = UserId::new("u1");
    seed_words(&repo, &owner, 15).await;

    let game_loop = GameLoopService::new(
        Clock::fixed(fixed_now()),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
    );

    let mut session = game_loop
        .start_game(&owner, QuizMode::Translation)
        .await
        .unwrap();
    assert_eq!(session.total_questions(), 10);

    let mut last = None;
    while !session.is_complete() {
        let correct = session
            .current_question()
            .unwrap()
            .correct_answer()
            .to_owned();
        last = Some(
            game_loop
                .answer_current(&owner, &mut session, &correct)
                .await
                .unwrap(),
        );
    }

    let last = last.unwrap();
    assert!(last.is_complete);
    assert!(last.result_id.is_some());
    assert_eq!(session.score(), 10);

    let results = repo.list_results(&owner).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].score, 10);
    assert_eq!(results[0].total_questions, 10);
    assert!((results[0].percentage - 100.0).abs() < f64::EPSILON);
    assert_eq!(results[0].user_id, owner);
}

#[tokio::test]
async fn fourteen_words_are_not_enough() {
    let repo = InMemoryRepository::new();
    let owner = UserId::new("u1");
    seed_words(&repo, &owner, 14).await;

    let game_loop = GameLoopService::new(
        Clock::fixed(fixed_now()),
        Arc::new(repo.clone()),
        Arc::new(repo),
    );

    let err = game_loop
        .start_game(&owner, QuizMode::Definition)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GameError::InsufficientWords {
            required: 15,
            actual: 14
        }
    ));
}

/// Result sink that can be toggled to fail, for exercising save retries.
#[derive(Clone)]
struct FlakyResultSink {
    inner: InMemoryRepository,
    failing: Arc<AtomicBool>,
}

#[async_trait]
impl GameResultRepository for FlakyResultSink {
    async fn save_result(&self, record: &GameResultRecord) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::Connection("sink offline".to_owned()));
        }
        self.inner.save_result(record).await
    }

    async fn list_results(&self, owner: &UserId) -> Result<Vec<GameResultRecord>, StorageError> {
        self.inner.list_results(owner).await
    }
}

#[tokio::test]
async fn failed_save_keeps_the_session_and_retry_succeeds() {
    let repo = InMemoryRepository::new();
    let owner = UserId::new("u1");
    seed_words(&repo, &owner, 15).await;

    let failing = Arc::new(AtomicBool::new(true));
    let sink = FlakyResultSink {
        inner: repo.clone(),
        failing: Arc::clone(&failing),
    };

    let game_loop = GameLoopService::new(
        Clock::fixed(fixed_now()),
        Arc::new(repo.clone()),
        Arc::new(sink),
    );

    let mut session = game_loop
        .start_game(&owner, QuizMode::Translation)
        .await
        .unwrap();

    // Answer everything; the save on the last answer fails.
    let mut final_err = None;
    while !session.is_complete() {
        let correct = session
            .current_question()
            .unwrap()
            .correct_answer()
            .to_owned();
        match game_loop.answer_current(&owner, &mut session, &correct).await {
            Ok(_) => {}
            Err(err) => final_err = Some(err),
        }
    }

    assert!(matches!(final_err, Some(GameError::Storage(_))));
    assert!(session.is_complete());
    assert_eq!(session.score(), 10, "score survives the failed save");
    assert_eq!(session.answers().len(), 10);
    assert!(session.result_id().is_none());
    assert!(repo.list_results(&owner).await.unwrap().is_empty());

    // Sink recovers; the retry persists exactly one result.
    failing.store(false, Ordering::SeqCst);
    let id = game_loop
        .finalize_result(&owner, &mut session)
        .await
        .unwrap();
    assert_eq!(session.result_id(), Some(id));

    let again = game_loop
        .finalize_result(&owner, &mut session)
        .await
        .unwrap();
    assert_eq!(again, id);

    let results = repo.list_results(&owner).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].score, 10);
}
