use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Connection details for one OpenAI-compatible chat-completion provider.
#[derive(Clone)]
pub struct ProviderSettings {
    pub name: String,
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("api_key", &"[redacted]")
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub primary_provider: ProviderSettings,
    pub fallback_provider: Option<ProviderSettings>,
    pub llm_request_timeout_secs: u64,
    pub llm_max_retries: u32,
    pub llm_retry_backoff_base_ms: u64,
    /// Upper bound on any single generation, scoring or strategy call.
    pub call_timeout_secs: u64,
    pub platforms_path: Option<PathBuf>,
}

impl AppConfig {
    /// Providers in the order they should be tried.
    #[must_use]
    pub fn providers(&self) -> Vec<ProviderSettings> {
        std::iter::once(self.primary_provider.clone())
            .chain(self.fallback_provider.clone())
            .collect()
    }
}
