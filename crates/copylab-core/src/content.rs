//! Ad copy submitted for optimization.

use serde::{Deserialize, Serialize};

use crate::variation::GeneratedCopy;

/// A piece of ad copy submitted for optimization.
///
/// Missing fields deserialize as empty strings so that input validation can
/// report every absent field at once instead of failing on the first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdContent {
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub cta: String,
    /// Platform identifier, e.g. `"facebook"` or `"google"`.
    #[serde(default)]
    pub platform: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
}

impl AdContent {
    #[must_use]
    pub fn new(
        headline: impl Into<String>,
        body: impl Into<String>,
        cta: impl Into<String>,
        platform: impl Into<String>,
    ) -> Self {
        Self {
            headline: headline.into(),
            body: body.into(),
            cta: cta.into(),
            platform: platform.into(),
            industry: None,
            target_audience: None,
        }
    }

    #[must_use]
    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    #[must_use]
    pub fn with_target_audience(mut self, audience: impl Into<String>) -> Self {
        self.target_audience = Some(audience.into());
        self
    }

    /// A new piece of content carrying `copy` in place of this one's
    /// headline, body and CTA. Platform, industry and audience carry over.
    #[must_use]
    pub fn revised(&self, copy: &GeneratedCopy) -> Self {
        Self {
            headline: copy.headline.clone(),
            body: copy.body.clone(),
            cta: copy.cta.clone(),
            platform: self.platform.clone(),
            industry: self.industry.clone(),
            target_audience: self.target_audience.clone(),
        }
    }

    /// Names of required fields that are empty or whitespace-only.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("headline", &self.headline),
            ("body", &self.body),
            ("cta", &self.cta),
            ("platform", &self.platform),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}
