use reqwest::Client;

use crate::error::TtsError;

const TTS_URL: &str = "https://translate.google.com/translate_tts";

/// Longest text the hosted endpoint accepts in a single request.
pub const MAX_TTS_CHARS: usize = 200;

/// Fetches pronunciation audio (MP3) from the hosted speech endpoint.
#[derive(Clone)]
pub struct TtsService {
    client: Client,
    base_url: String,
}

impl TtsService {
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: TTS_URL.to_owned(),
        }
    }

    /// Point the service at a different endpoint (tests).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Synthesize `text` as MP3 bytes. `lang` is an ISO 639-1 code, `"en"`
    /// for the vocabulary itself.
    ///
    /// # Errors
    ///
    /// Returns `TtsError::EmptyText`/`TextTooLong` for unusable input and
    /// transport errors otherwise.
    pub async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>, TtsError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TtsError::EmptyText);
        }
        let len = text.chars().count();
        if len > MAX_TTS_CHARS {
            return Err(TtsError::TextTooLong {
                len,
                max: MAX_TTS_CHARS,
            });
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", lang),
                ("q", text),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TtsError::HttpStatus(response.status()));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

impl Default for TtsService {
    fn default() -> Self {
        Self::new()
    }
}
