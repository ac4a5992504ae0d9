use crate::app_config::{AppConfig, Environment, ProviderSettings};
use crate::ConfigError;

const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

/// Load application configuration from environment variables already in the process.
///
/// Does NOT load `.env` files; the binary does that before parsing arguments.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let env = parse_environment(&or_default("COPYLAB_ENV", "development"))?;
    let log_level = or_default("COPYLAB_LOG_LEVEL", "info");

    let primary_provider = ProviderSettings {
        name: "primary".to_string(),
        base_url: or_default("COPYLAB_LLM_BASE_URL", DEFAULT_LLM_BASE_URL),
        api_key: require("COPYLAB_LLM_API_KEY")?,
        model: or_default("COPYLAB_LLM_MODEL", DEFAULT_LLM_MODEL),
    };

    let fallback_provider = lookup("COPYLAB_FALLBACK_LLM_API_KEY")
        .ok()
        .filter(|key| !key.trim().is_empty())
        .map(|api_key| ProviderSettings {
            name: "fallback".to_string(),
            base_url: or_default("COPYLAB_FALLBACK_LLM_BASE_URL", &primary_provider.base_url),
            api_key,
            model: or_default("COPYLAB_FALLBACK_LLM_MODEL", &primary_provider.model),
        });

    let llm_request_timeout_secs = parse_u64("COPYLAB_LLM_REQUEST_TIMEOUT_SECS", "30")?;
    let llm_max_retries = parse_u32("COPYLAB_LLM_MAX_RETRIES", "2")?;
    let llm_retry_backoff_base_ms = parse_u64("COPYLAB_LLM_RETRY_BACKOFF_BASE_MS", "500")?;
    let call_timeout_secs = parse_u64("COPYLAB_CALL_TIMEOUT_SECS", "45")?;
    if call_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "COPYLAB_CALL_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let platforms_path = lookup("COPYLAB_PLATFORMS_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    Ok(AppConfig {
        env,
        log_level,
        primary_provider,
        fallback_provider,
        llm_request_timeout_secs,
        llm_max_retries,
        llm_retry_backoff_base_ms,
        call_timeout_secs,
        platforms_path,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "COPYLAB_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    /// Returns a map with all required env vars populated with valid defaults.
    fn full_env<'a>() -> HashMap<&'a str, &'a str> {
        let mut m = HashMap::new();
        m.insert("COPYLAB_LLM_API_KEY", "sk-test");
        m
    }

    #[test]
    fn parse_environment_known_values() {
        assert_eq!(
            parse_environment("development").unwrap(),
            Environment::Development
        );
        assert_eq!(parse_environment("test").unwrap(), Environment::Test);
        assert_eq!(
            parse_environment("production").unwrap(),
            Environment::Production
        );
    }

    #[test]
    fn parse_environment_unknown_fails() {
        let err = parse_environment("staging").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "COPYLAB_ENV"));
    }

    #[test]
    fn build_app_config_fails_without_api_key() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "COPYLAB_LLM_API_KEY"),
            "expected MissingEnvVar(COPYLAB_LLM_API_KEY), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_treats_blank_api_key_as_missing() {
        let mut map = HashMap::new();
        map.insert("COPYLAB_LLM_API_KEY", "   ");
        let result = build_app_config(lookup_from_map(&map));
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
    }

    #[test]
    fn build_app_config_succeeds_with_defaults() {
        let map = full_env();
        let cfg = build_app_config(lookup_from_map(&map)).expect("config should build");
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.primary_provider.base_url, "https://api.openai.com/v1");
        assert_eq!(cfg.primary_provider.model, "gpt-4o-mini");
        assert_eq!(cfg.primary_provider.api_key, "sk-test");
        assert!(cfg.fallback_provider.is_none());
        assert_eq!(cfg.llm_request_timeout_secs, 30);
        assert_eq!(cfg.llm_max_retries, 2);
        assert_eq!(cfg.llm_retry_backoff_base_ms, 500);
        assert_eq!(cfg.call_timeout_secs, 45);
        assert!(cfg.platforms_path.is_none());
        assert_eq!(cfg.providers().len(), 1);
    }

    #[test]
    fn fallback_provider_inherits_primary_defaults() {
        let mut map = full_env();
        map.insert("COPYLAB_LLM_BASE_URL", "https://llm.internal/v1");
        map.insert("COPYLAB_LLM_MODEL", "house-model");
        map.insert("COPYLAB_FALLBACK_LLM_API_KEY", "sk-fallback");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let fallback = cfg.fallback_provider.clone().expect("fallback configured");
        assert_eq!(fallback.base_url, "https://llm.internal/v1");
        assert_eq!(fallback.model, "house-model");
        assert_eq!(fallback.api_key, "sk-fallback");
        let names: Vec<String> = cfg.providers().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["primary", "fallback"]);
    }

    #[test]
    fn fallback_provider_overrides() {
        let mut map = full_env();
        map.insert("COPYLAB_FALLBACK_LLM_API_KEY", "sk-fallback");
        map.insert("COPYLAB_FALLBACK_LLM_BASE_URL", "https://api.groq.com/openai/v1");
        map.insert("COPYLAB_FALLBACK_LLM_MODEL", "llama-3.1-70b");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let fallback = cfg.fallback_provider.unwrap();
        assert_eq!(fallback.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(fallback.model, "llama-3.1-70b");
    }

    #[test]
    fn invalid_max_retries_fails() {
        let mut map = full_env();
        map.insert("COPYLAB_LLM_MAX_RETRIES", "many");
        let result = build_app_config(lookup_from_map(&map));
        match result {
            Err(ConfigError::InvalidEnvVar { var, .. }) => {
                assert_eq!(var, "COPYLAB_LLM_MAX_RETRIES");
            }
            other => panic!("expected InvalidEnvVar(COPYLAB_LLM_MAX_RETRIES), got: {other:?}"),
        }
    }

    #[test]
    fn zero_call_timeout_fails() {
        let mut map = full_env();
        map.insert("COPYLAB_CALL_TIMEOUT_SECS", "0");
        let result = build_app_config(lookup_from_map(&map));
        match result {
            Err(ConfigError::InvalidEnvVar { var, .. }) => {
                assert_eq!(var, "COPYLAB_CALL_TIMEOUT_SECS");
            }
            other => panic!("expected InvalidEnvVar(COPYLAB_CALL_TIMEOUT_SECS), got: {other:?}"),
        }
    }

    #[test]
    fn call_timeout_override() {
        let mut map = full_env();
        map.insert("COPYLAB_CALL_TIMEOUT_SECS", "90");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.call_timeout_secs, 90);
    }

    #[test]
    fn platforms_path_is_read() {
        let mut map = full_env();
        map.insert("COPYLAB_PLATFORMS_PATH", "./config/platforms.yaml");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(
            cfg.platforms_path.unwrap().to_str(),
            Some("./config/platforms.yaml")
        );
    }

    #[test]
    fn debug_redacts_api_keys() {
        let map = full_env();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("sk-test"));
        assert!(rendered.contains("[redacted]"));
    }
}
