//! Per-platform character limits and audience hints.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Limits and audience hint for one ad platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformProfile {
    pub name: String,
    pub headline_limit: usize,
    pub body_limit: usize,
    pub cta_limit: usize,
    /// One-line description of how the platform's audience reads ads.
    pub audience_mindset: String,
}

impl PlatformProfile {
    fn new(name: &str, headline: usize, body: usize, cta: usize, mindset: &str) -> Self {
        Self {
            name: name.to_string(),
            headline_limit: headline,
            body_limit: body,
            cta_limit: cta,
            audience_mindset: mindset.to_string(),
        }
    }

    /// Profile used when a platform identifier is unknown.
    #[must_use]
    pub fn generic() -> Self {
        Self::new(
            "generic",
            60,
            150,
            25,
            "general audience skimming quickly; lead with the clearest benefit",
        )
    }
}

/// Source of [`PlatformProfile`]s, keyed by platform identifier.
pub trait PlatformConfigProvider: Send + Sync {
    /// Look up a platform. Identifiers are matched case-insensitively.
    fn profile(&self, platform: &str) -> Option<PlatformProfile>;

    /// Like [`PlatformConfigProvider::profile`], but unknown platforms
    /// resolve to [`PlatformProfile::generic`].
    fn resolve(&self, platform: &str) -> PlatformProfile {
        self.profile(platform).unwrap_or_else(|| {
            tracing::debug!(platform, "unknown platform, using generic profile");
            PlatformProfile::generic()
        })
    }
}

/// Shape of the optional platforms YAML file.
#[derive(Debug, Deserialize)]
pub struct PlatformsFile {
    pub platforms: Vec<PlatformProfile>,
}

/// Built-in platform profiles, optionally extended from a YAML file.
#[derive(Debug, Clone)]
pub struct PlatformCatalog {
    profiles: BTreeMap<String, PlatformProfile>,
}

impl PlatformCatalog {
    /// Catalog with the built-in profiles only.
    #[must_use]
    pub fn builtin() -> Self {
        let profiles = [
            PlatformProfile::new(
                "facebook",
                40,
                125,
                20,
                "casual scrollers open to discovery; stop the thumb with emotion and social proof",
            ),
            PlatformProfile::new(
                "instagram",
                40,
                125,
                20,
                "visual-first browsers who reward aspiration and authenticity",
            ),
            PlatformProfile::new(
                "google",
                30,
                90,
                15,
                "high-intent searchers comparing options; answer the query and state the offer",
            ),
            PlatformProfile::new(
                "linkedin",
                70,
                150,
                20,
                "professionals in work mode; speak to outcomes, credibility and career value",
            ),
            PlatformProfile::new(
                "twitter",
                70,
                280,
                20,
                "fast-moving conversational feed; be punchy, timely and direct",
            ),
            PlatformProfile::new(
                "tiktok",
                40,
                100,
                20,
                "entertainment seekers; hook in the first words and keep it playful",
            ),
        ];

        Self {
            profiles: profiles
                .into_iter()
                .map(|p| (p.name.clone(), p))
                .collect(),
        }
    }

    /// Built-in profiles with the YAML file at `path` layered on top.
    ///
    /// Entries in the file replace built-in profiles of the same name and add
    /// new platforms otherwise.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
    pub fn with_overrides(path: &Path) -> Result<Self, ConfigError> {
        let file = load_platforms(path)?;
        let mut catalog = Self::builtin();
        for profile in file.platforms {
            let key = normalize_key(&profile.name);
            catalog.profiles.insert(key, profile);
        }
        Ok(catalog)
    }

    /// Built-in catalog, extended from `path` when one is given.
    ///
    /// # Errors
    ///
    /// See [`PlatformCatalog::with_overrides`].
    pub fn from_optional_path(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::with_overrides(path),
            None => Ok(Self::builtin()),
        }
    }

    /// All profiles, sorted by name.
    pub fn profiles(&self) -> impl Iterator<Item = &PlatformProfile> {
        self.profiles.values()
    }
}

impl PlatformConfigProvider for PlatformCatalog {
    fn profile(&self, platform: &str) -> Option<PlatformProfile> {
        let key = normalize_key(platform);
        let key = match key.as_str() {
            "meta" | "fb" => "facebook",
            "ig" => "instagram",
            "google_ads" | "google-ads" | "adwords" => "google",
            "x" => "twitter",
            other => other,
        };
        self.profiles.get(key).cloned()
    }
}

fn normalize_key(platform: &str) -> String {
    platform.trim().to_lowercase()
}

/// Load and validate a platforms YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_platforms(path: &Path) -> Result<PlatformsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::PlatformsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: PlatformsFile = serde_yaml::from_str(&content)?;

    validate_platforms(&file)?;

    Ok(file)
}

fn validate_platforms(file: &PlatformsFile) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for profile in &file.platforms {
        if profile.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "platform name must be non-empty".to_string(),
            ));
        }

        if profile.headline_limit == 0 || profile.body_limit == 0 || profile.cta_limit == 0 {
            return Err(ConfigError::Validation(format!(
                "platform '{}' has a zero character limit",
                profile.name
            )));
        }

        if !seen.insert(normalize_key(&profile.name)) {
            return Err(ConfigError::Validation(format!(
                "duplicate platform name: '{}'",
                profile.name
            )));
        }
    }

    Ok(())
}
