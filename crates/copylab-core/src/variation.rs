//! Variation types and the creative configuration handed to generators.

use serde::{Deserialize, Serialize};

use crate::platforms::PlatformProfile;
use crate::score::QualityScore;
use crate::strategy::Angle;

/// One of the four creative stances every Writer pass produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariationType {
    Improved,
    BenefitFocused,
    ProblemFocused,
    StoryDriven,
}

impl VariationType {
    /// Canonical order; variations are always returned in this order.
    pub const ALL: [VariationType; 4] = [
        VariationType::Improved,
        VariationType::BenefitFocused,
        VariationType::ProblemFocused,
        VariationType::StoryDriven,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            VariationType::Improved => "improved",
            VariationType::BenefitFocused => "benefit_focused",
            VariationType::ProblemFocused => "problem_focused",
            VariationType::StoryDriven => "story_driven",
        }
    }

    /// Position of this type in [`VariationType::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            VariationType::Improved => 0,
            VariationType::BenefitFocused => 1,
            VariationType::ProblemFocused => 2,
            VariationType::StoryDriven => 3,
        }
    }
}

impl std::fmt::Display for VariationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmotionStance {
    Inspiring,
    ProblemSolving,
    TrustBuilding,
}

impl std::fmt::Display for EmotionStance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmotionStance::Inspiring => write!(f, "inspiring"),
            EmotionStance::ProblemSolving => write!(f, "problem-solving"),
            EmotionStance::TrustBuilding => write!(f, "trust-building"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Balanced,
    Aspirational,
    Empathetic,
    Narrative,
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tone::Balanced => write!(f, "balanced"),
            Tone::Aspirational => write!(f, "aspirational"),
            Tone::Empathetic => write!(f, "empathetic"),
            Tone::Narrative => write!(f, "narrative"),
        }
    }
}

/// Everything a [`crate::GenerationClient`] needs to write one variation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreativeConfig {
    pub variation_type: VariationType,
    /// Creativity level on a 1-10 scale.
    pub creativity: u8,
    /// Urgency level on a 1-10 scale.
    pub urgency: u8,
    pub emotion: EmotionStance,
    pub tone: Tone,
    pub angle: Angle,
    pub target_psychology: String,
    pub key_improvements: Vec<String>,
    pub power_words: Vec<String>,
    pub platform: PlatformProfile,
}

/// Raw copy returned by a generator, before scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCopy {
    pub headline: String,
    pub body: String,
    pub cta: String,
}

/// A scored rewrite of the input copy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variation {
    pub variation_type: VariationType,
    pub headline: String,
    pub body: String,
    pub cta: String,
    pub score: QualityScore,
    /// Percent change of `score.overall()` against the baseline this
    /// variation was generated from.
    pub improvement_delta: f64,
    /// Two or three short notes on how the variation was produced.
    pub reasoning: Vec<String>,
}

/// Highest `overall`; ties keep the earliest, so canonical order breaks them.
#[must_use]
pub fn best_variation(variations: &[Variation]) -> Option<&Variation> {
    variations
        .iter()
        .fold(None, |best: Option<&Variation>, v| match best {
            Some(b) if b.score.overall() >= v.score.overall() => Some(b),
            _ => Some(v),
        })
}

impl Variation {
    /// The variation's copy without its score.
    #[must_use]
    pub fn copy(&self) -> GeneratedCopy {
        GeneratedCopy {
            headline: self.headline.clone(),
            body: self.body.clone(),
            cta: self.cta.clone(),
        }
    }
}
