use std::sync::Arc;

use storage::repository::Storage;

use crate::ai_service::AiService;
use crate::auth_service::AuthService;
use crate::game::GameLoopService;
use crate::stats_service::StatsService;
use crate::tts_service::TtsService;
use crate::word_service::WordService;
use crate::Clock;

/// Assembles the app-facing services over a storage backend.
#[derive(Clone)]
pub struct AppServices {
    words: Arc<WordService>,
    game_loop: Arc<GameLoopService>,
    stats: Arc<StatsService>,
    ai: Arc<AiService>,
    auth: Arc<AuthService>,
    tts: Arc<TtsService>,
}

impl AppServices {
    /// Build services backed by the hosted database; the AI and identity
    /// clients read their configuration from the environment.
    #[must_use]
    pub fn new_firebase(database_url: &str, clock: Clock) -> Self {
        Self::new(Storage::firebase(database_url), clock)
    }

    /// Build services over an explicit storage backend (tests use the
    /// in-memory one).
    #[must_use]
    pub fn new(storage: Storage, clock: Clock) -> Self {
        Self {
            words: Arc::new(WordService::new(clock, Arc::clone(&storage.words))),
            game_loop: Arc::new(GameLoopService::new(
                clock,
                Arc::clone(&storage.words),
                Arc::clone(&storage.results),
            )),
            stats: Arc::new(StatsService::new(
                Arc::clone(&storage.words),
                Arc::clone(&storage.results),
            )),
            ai: Arc::new(AiService::from_env()),
            auth: Arc::new(AuthService::from_env()),
            tts: Arc::new(TtsService::new()),
        }
    }

    #[must_use]
    pub fn word_service(&self) -> Arc<WordService> {
        Arc::clone(&self.words)
    }

    #[must_use]
    pub fn game_loop(&self) -> Arc<GameLoopService> {
        Arc::clone(&self.game_loop)
    }

    #[must_use]
    pub fn stats(&self) -> Arc<StatsService> {
        Arc::clone(&self.stats)
    }

    #[must_use]
    pub fn ai(&self) -> Arc<AiService> {
        Arc::clone(&self.ai)
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn tts(&self) -> Arc<TtsService> {
        Arc::clone(&self.tts)
    }
}
