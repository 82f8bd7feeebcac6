use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use match_core::HintRequest;

use crate::config::HintConfig;
use crate::error::HintError;

/// Shown in place of a hint whenever the provider fails or times out.
pub const FALLBACK_HINT: &str = "Try matching the terms!";

/// Shown when the provider answers with no usable text.
pub const EMPTY_HINT: &str = "No hint available.";

/// Produces a short usage hint for a vocabulary term.
#[async_trait]
pub trait HintProvider: Send + Sync {
    async fn get_hint(&self, term: &str, part_of_speech: &str) -> Result<String, HintError>;
}

#[must_use]
pub fn hint_prompt(term: &str, part_of_speech: &str) -> String {
    format!(
        "Provide a very short, simple example sentence for the English word \"{term}\" \
         (part of speech: {part_of_speech}). Keep it under 15 words."
    )
}

/// Hint provider backed by an OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct ChatHintProvider {
    client: Client,
    config: Option<HintConfig>,
}

impl ChatHintProvider {
    #[must_use]
    pub fn new(config: Option<HintConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }
}

#[async_trait]
impl HintProvider for ChatHintProvider {
    async fn get_hint(&self, term: &str, part_of_speech: &str) -> Result<String, HintError> {
        let config = self.config.as_ref().ok_or(HintError::Disabled)?;

        let url = format!(
            "{}/chat/completions",
            config.base_url.trim_end_matches('/')
        );
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: hint_prompt(term, part_of_speech),
            }],
            temperature: 0.2,
        };

        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(HintError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());

        Ok(content.unwrap_or_else(|| EMPTY_HINT.to_string()))
    }
}

/// Run one hint fetch to completion, never failing.
///
/// Errors and timeouts are logged and replaced by [`FALLBACK_HINT`], so the
/// caller always has something to show.
pub async fn fetch_hint(
    provider: &dyn HintProvider,
    request: &HintRequest,
    timeout: Duration,
) -> String {
    let outcome = tokio::time::timeout(
        timeout,
        provider.get_hint(&request.term, &request.part_of_speech),
    )
    .await
    .unwrap_or_else(|_elapsed| Err(HintError::TimedOut));

    match outcome {
        Ok(text) => {
            debug!(entry = %request.entry_id, "hint fetched");
            text
        }
        Err(err) => {
            warn!(entry = %request.entry_id, error = %err, "hint fetch failed, using fallback");
            FALLBACK_HINT.to_string()
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
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
