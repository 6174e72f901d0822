use std::env;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use vocab_core::model::WordDraft;

use crate::error::AiError;

/// Connection settings for the hosted language model.
#[derive(Clone, Debug)]
pub struct AiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl AiConfig {
    /// Read the configuration from the environment.
    ///
    /// Returns `None` when `HUGGINGFACE_TOKEN` is unset or blank, which
    /// disables generation.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let api_key = env::var("HUGGINGFACE_TOKEN").ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        let base_url = env::var("VOCAB_AI_BASE_URL")
            .unwrap_or_else(|_| "https://router.huggingface.co/v1".into());
        let model = env::var("VOCAB_AI_MODEL")
            .unwrap_or_else(|_| "mistralai/Mistral-Nemo-Instruct-2407".into());
        Some(Self {
            base_url,
            api_key,
            model,
        })
    }
}

/// Generates a definition, French translation, and example sentences for an
/// English word via the hosted chat-completions endpoint.
#[derive(Clone)]
pub struct AiService {
    client: Client,
    config: Option<AiConfig>,
}

impl AiService {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(AiConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<AiConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    /// Generate learning content for an English word.
    ///
    /// The model is asked for JSON; replies that fail to parse fall back to
    /// a line-scanning extractor and, field by field, to placeholder text,
    /// so a successful call always yields a complete draft.
    ///
    /// # Errors
    ///
    /// Returns `AiError::NotEnglish` for input that does not look like
    /// English, `AiError::Disabled` without an API token, and transport
    /// errors otherwise.
    pub async fn generate_word_content(&self, word: &str) -> Result<WordDraft, AiError> {
        let word = word.trim();
        if !looks_english(word) {
            return Err(AiError::NotEnglish);
        }
        let config = self.config.as_ref().ok_or(AiError::Disabled)?;

        let url = format!("{}/chat/completions", config.base_url.trim_end_matches('/'));
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "You are an English assistant.".to_owned(),
                },
                ChatMessage {
                    role: "user",
                    content: format!(
                        "Provide a definition, French translation, and two English example \
                         sentences for the word \"{word}\". Format as JSON with keys: word, \
                         definition, translation, example1, example2."
                    ),
                },
            ],
            temperature: 0.1,
            max_tokens: 200,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AiError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(AiError::EmptyResponse)?;

        tracing::debug!(word, "word content generated");
        Ok(parse_reply(&content, word))
    }
}

/// Cheap gate against obviously non-English input. Detection accuracy is
/// not a goal; anything plain-ASCII passes.
fn looks_english(word: &str) -> bool {
    !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphabetic() || matches!(c, ' ' | '-' | '\''))
}

fn parse_reply(content: &str, word: &str) -> WordDraft {
    // Models often wrap the JSON in a code fence.
    let trimmed = content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    if let Ok(reply) = serde_json::from_str::<GeneratedContent>(trimmed) {
        if !reply.translation.is_empty() && !reply.definition.is_empty() {
            return WordDraft {
                word: if reply.word.is_empty() {
                    word.to_owned()
                } else {
                    reply.word
                },
                translation: reply.translation,
                definition: reply.definition,
                example1: reply.example1,
                example2: reply.example2,
            };
        }
    }

    extract_manually(content, word)
}

/// Salvage fields from free-form model output when JSON parsing fails.
fn extract_manually(text: &str, word: &str) -> WordDraft {
    let mut examples = quoted_sentences(text).into_iter();

    WordDraft {
        word: word.to_owned(),
        definition: find_labelled(text, "definition")
            .unwrap_or_else(|| format!("Definition for {word}")),
        translation: find_labelled(text, "translation")
            .unwrap_or_else(|| format!("Traduction de {word}")),
        example1: examples
            .next()
            .unwrap_or_else(|| format!("Example sentence with {word}.")),
        example2: examples
            .next()
            .unwrap_or_else(|| format!("Another example with {word}.")),
    }
}

/// First non-empty value following `label` on any line, e.g.
/// `Definition: a small feline`.
fn find_labelled(text: &str, label: &str) -> Option<String> {
    for line in text.lines() {
        let lower = line.to_lowercase();
        let Some(position) = lower.find(label) else {
            continue;
        };
        let rest = &line[position + label.len()..];
        let value = rest
            .trim_start_matches([':', ' ', '*'])
            .trim()
            .trim_matches(['"', ','])
            .trim();
        if !value.is_empty() {
            return Some(value.to_owned());
        }
    }
    None
}

/// Double-quoted fragments long enough to be example sentences.
fn quoted_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find('"') {
        let tail = &rest[start + 1..];
        let Some(end) = tail.find('"') else { break };
        let fragment = tail[..end].trim();
        if fragment.len() > 10 {
            sentences.push(fragment.to_owned());
        }
        rest = &tail[end + 1..];
    }
    sentences
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeneratedContent {
    #[serde(default)]
    word: String,
    #[serde(default)]
    definition: String,
    #[serde(default)]
    translation: String,
    #[serde(default)]
    example1: String,
    #[serde(default)]
    example2: String,
}
