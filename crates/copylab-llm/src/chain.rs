//! Ordered provider fallback.
//!
//! [`ProviderChain`] tries each configured provider in turn. Every provider
//! gets its own retry budget and, when configured, its own slice of the
//! caller's time budget. Once either is spent (or the reply fails to parse)
//! the chain logs a warning and moves to the next provider.

use std::time::Duration;

use async_trait::async_trait;
use copylab_core::{
    AdContent, AnalysisClient, AppConfig, CollaboratorError, CreativeConfig, GeneratedCopy,
    GenerationClient, PlatformProfile, QualityScore,
};

use crate::client::ChatClient;
use crate::error::LlmError;
use crate::prompts;
use crate::retry::retry_with_backoff;
use crate::types::Prompt;

/// Tenths of the caller's call timeout divided among providers. The rest is
/// headroom for the caller's own work on the reply.
const CALL_BUDGET_TENTHS: u32 = 9;

pub struct ProviderChain {
    clients: Vec<ChatClient>,
    max_retries: u32,
    backoff_base_ms: u64,
    provider_budget: Option<Duration>,
}

impl ProviderChain {
    #[must_use]
    pub fn new(clients: Vec<ChatClient>, max_retries: u32, backoff_base_ms: u64) -> Self {
        Self {
            clients,
            max_retries,
            backoff_base_ms,
            provider_budget: None,
        }
    }

    /// Caps the time spent on any one provider, retries included.
    #[must_use]
    pub fn with_provider_budget(mut self, budget: Duration) -> Self {
        self.provider_budget = Some(budget);
        self
    }

    /// Builds the primary client and, if configured, the fallback.
    ///
    /// Each provider gets an equal slice of `call_timeout_secs`, so a hanging
    /// primary leaves the fallback time to answer before the caller gives up.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError`] if any provider's client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, LlmError> {
        let clients = config
            .providers()
            .into_iter()
            .map(|settings| ChatClient::new(&settings, config.llm_request_timeout_secs))
            .collect::<Result<Vec<_>, _>>()?;
        let providers = u32::try_from(clients.len()).unwrap_or(u32::MAX).max(1);
        let budget = Duration::from_secs(config.call_timeout_secs) * CALL_BUDGET_TENTHS
            / providers.saturating_mul(10);
        Ok(Self::new(
            clients,
            config.llm_max_retries,
            config.llm_retry_backoff_base_ms,
        )
        .with_provider_budget(budget))
    }

    /// Provider names in the order they are tried.
    #[must_use]
    pub fn provider_names(&self) -> Vec<&str> {
        self.clients.iter().map(ChatClient::name).collect()
    }

    /// Sends `prompt` to each provider in order until one returns a reply
    /// that `parse` accepts.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::NoProviders`] if the chain is empty, or
    /// [`LlmError::Exhausted`] carrying the last provider's error.
    pub async fn complete_with<T, P>(&self, prompt: &Prompt, parse: P) -> Result<T, LlmError>
    where
        P: Fn(&str, &str) -> Result<T, LlmError>,
    {
        if self.clients.is_empty() {
            return Err(LlmError::NoProviders);
        }

        let mut last_error = None;
        for client in &self.clients {
            let attempt = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
                client.complete(prompt)
            });
            let reply = match self.provider_budget {
                Some(budget) => tokio::time::timeout(budget, attempt)
                    .await
                    .unwrap_or_else(|_| {
                        Err(LlmError::Timeout {
                            provider: client.name().to_owned(),
                            budget_ms: u64::try_from(budget.as_millis()).unwrap_or(u64::MAX),
                        })
                    }),
                None => attempt.await,
            };
            let result = reply.and_then(|reply| parse(client.name(), &reply));

            match result {
                Ok(value) => return Ok(value),
                Err(e) => {
                    tracing::warn!(
                        provider = client.name(),
                        error = %e,
                        "provider failed, trying next"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(LlmError::Exhausted {
            attempted: self.clients.len(),
            last: last_error.map(|e| e.to_string()).unwrap_or_default(),
        })
    }
}

#[async_trait]
impl GenerationClient for ProviderChain {
    async fn generate(
        &self,
        content: &AdContent,
        config: &CreativeConfig,
    ) -> Result<GeneratedCopy, CollaboratorError> {
        let prompt = prompts::generation_prompt(content, config);
        Ok(self
            .complete_with(&prompt, prompts::parse_generated_copy)
            .await?)
    }
}

#[async_trait]
impl AnalysisClient for ProviderChain {
    async fn assess(
        &self,
        content: &AdContent,
        profile: &PlatformProfile,
    ) -> Result<String, CollaboratorError> {
        let prompt = prompts::assessment_prompt(content, profile);
        Ok(self
            .complete_with(&prompt, prompts::check_assessment_reply)
            .await?)
    }

    async fn advise(
        &self,
        content: &AdContent,
        baseline: &QualityScore,
        profile: &PlatformProfile,
    ) -> Result<String, CollaboratorError> {
        let prompt = prompts::advice_prompt(content, baseline, profile);
        Ok(self
            .complete_with(&prompt, prompts::check_advice_reply)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use copylab_core::{Environment, ProviderSettings};

    use super::*;

    fn provider(name: &str) -> ProviderSettings {
        ProviderSettings {
            name: name.to_owned(),
            base_url: "http://127.0.0.1:1/v1".to_owned(),
            api_key: "k".to_owned(),
            model: "m".to_owned(),
        }
    }

    fn config(fallback: Option<ProviderSettings>) -> AppConfig {
        AppConfig {
            env: Environment::Test,
            log_level: "info".to_owned(),
            primary_provider: provider("primary"),
            fallback_provider: fallback,
            llm_request_timeout_secs: 30,
            llm_max_retries: 2,
            llm_retry_backoff_base_ms: 500,
            call_timeout_secs: 40,
            platforms_path: None,
        }
    }

    #[tokio::test]
    async fn empty_chain_reports_no_providers() {
        let chain = ProviderChain::new(Vec::new(), 0, 0);
        let prompt = Prompt {
            system: "s".to_owned(),
            user: "u".to_owned(),
            temperature: 0.2,
        };
        let err = chain
            .complete_with(&prompt, prompts::check_advice_reply)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::NoProviders));
    }

    #[test]
    fn provider_names_keep_order() {
        let clients = vec![
            ChatClient::with_base_url("primary", "k", "m", 5, "http://127.0.0.1:1").unwrap(),
            ChatClient::with_base_url("fallback", "k", "m", 5, "http://127.0.0.1:2").unwrap(),
        ];
        let chain = ProviderChain::new(clients, 0, 0);
        assert_eq!(chain.provider_names(), vec!["primary", "fallback"]);
    }

    #[test]
    fn call_timeout_is_split_across_providers() {
        let single = ProviderChain::from_config(&config(None)).unwrap();
        assert_eq!(single.provider_budget, Some(Duration::from_secs(36)));

        let pair = ProviderChain::from_config(&config(Some(provider("fallback")))).unwrap();
        assert_eq!(pair.provider_names(), vec!["primary", "fallback"]);
        assert_eq!(pair.provider_budget, Some(Duration::from_secs(18)));
    }
}
