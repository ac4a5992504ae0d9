//! HTTP client for one OpenAI-compatible chat-completion endpoint.
//!
//! Wraps `reqwest` with bearer-token auth, status handling and typed response
//! deserialization. Non-2xx responses surface as [`LlmError::ApiError`] with
//! the status preserved so the retry policy can classify them.

use std::time::Duration;

use copylab_core::ProviderSettings;
use reqwest::{Client, Url};

use crate::error::LlmError;
use crate::types::{ChatMessage, ChatRequest, ChatResponse, Prompt};

const MAX_COMPLETION_TOKENS: u32 = 600;
/// Longest slice of an error body kept in [`LlmError::ApiError`].
const ERROR_BODY_LIMIT: usize = 300;

/// Client for a single chat-completion provider.
///
/// Use [`ChatClient::new`] with configured provider settings, or
/// [`ChatClient::with_base_url`] to point at a mock server in tests.
pub struct ChatClient {
    client: Client,
    name: String,
    api_key: String,
    model: String,
    endpoint: Url,
}

impl ChatClient {
    /// Creates a client for the provider described by `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed, or [`LlmError::InvalidBaseUrl`] if the base URL is invalid.
    pub fn new(settings: &ProviderSettings, timeout_secs: u64) -> Result<Self, LlmError> {
        Self::with_base_url(
            &settings.name,
            &settings.api_key,
            &settings.model,
            timeout_secs,
            &settings.base_url,
        )
    }

    /// Creates a client with explicit connection details.
    ///
    /// `base_url` is the API root, e.g. `https://api.openai.com/v1`;
    /// requests go to `{base_url}/chat/completions`.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed, or [`LlmError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        name: &str,
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("copylab/0.1 (ad-copy-optimizer)")
            .build()?;

        let joined = format!("{}/chat/completions", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&joined).map_err(|e| LlmError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            name: name.to_owned(),
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            endpoint,
        })
    }

    /// Provider name used in logs and errors.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Sends `prompt` and returns the first choice's message content.
    ///
    /// # Errors
    ///
    /// - [`LlmError::Http`] on network failure.
    /// - [`LlmError::ApiError`] on a non-2xx status.
    /// - [`LlmError::Deserialize`] if the body is not a chat-completion response.
    /// - [`LlmError::EmptyCompletion`] if no choice carries non-blank content.
    pub async fn complete(&self, prompt: &Prompt) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            temperature: prompt.temperature,
            max_tokens: MAX_COMPLETION_TOKENS,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(LlmError::ApiError {
                provider: self.name.clone(),
                status: status.as_u16(),
                message: truncate(&body, ERROR_BODY_LIMIT),
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| LlmError::Deserialize {
                context: format!("{} chat completion", self.name),
                source: e,
            })?;

        parsed
            .choices
            .into_iter()
            .filter_map(|choice| choice.message.content)
            .find(|content| !content.trim().is_empty())
            .ok_or_else(|| LlmError::EmptyCompletion {
                provider: self.name.clone(),
            })
    }
}

fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_owned(),
    }
}
