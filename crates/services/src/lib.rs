#![forbid(unsafe_code)]

pub mod ai_service;
pub mod app_services;
pub mod auth_service;
pub mod error;
pub mod game;
pub mod stats_service;
pub mod tts_service;
pub mod word_service;

pub use vocab_core::Clock;

pub use ai_service::{AiConfig, AiService};
pub use app_services::AppServices;
pub use auth_service::{AccountInfo, AuthService, AuthUser, RefreshedTokens};
pub use error::{AiError, AuthError, GameError, StatsError, TtsError, WordServiceError};
pub use game::{GameAnswerResult, GameLoopService, GameProgress, QuizBuilder, QuizPlan, QuizSession};
pub use stats_service::StatsService;
pub use tts_service::TtsService;
pub use word_service::WordService;
