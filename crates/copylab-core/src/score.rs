//! Five-dimension quality scores.

use serde::{Deserialize, Serialize};

/// One of the five scored dimensions of a piece of ad copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Grammar,
    Clarity,
    Emotion,
    CtaStrength,
    PlatformFit,
}

impl Dimension {
    /// All dimensions in their canonical order. Tie-breaks between equally
    /// weak dimensions follow this order.
    pub const ALL: [Dimension; 5] = [
        Dimension::Grammar,
        Dimension::Clarity,
        Dimension::Emotion,
        Dimension::CtaStrength,
        Dimension::PlatformFit,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::Grammar => "grammar",
            Dimension::Clarity => "clarity",
            Dimension::Emotion => "emotion",
            Dimension::CtaStrength => "cta_strength",
            Dimension::PlatformFit => "platform_fit",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Round to one decimal place.
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// A quality assessment of one piece of ad copy.
///
/// Every dimension lies in `[0, 100]` and `overall` is always derived from
/// the five dimensions. Fields are private so neither invariant can be
/// broken after construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityScore {
    grammar: f64,
    clarity: f64,
    emotion: f64,
    cta_strength: f64,
    platform_fit: f64,
    overall: f64,
}

impl QualityScore {
    /// Build a score from raw dimension values.
    ///
    /// Each value is clamped to `[0, 100]` (NaN becomes `0.0`) and rounded to
    /// one decimal before `overall` is computed.
    #[must_use]
    pub fn new(
        grammar: f64,
        clarity: f64,
        emotion: f64,
        cta_strength: f64,
        platform_fit: f64,
    ) -> Self {
        let dims = [grammar, clarity, emotion, cta_strength, platform_fit].map(clamp_dimension);
        Self {
            grammar: dims[0],
            clarity: dims[1],
            emotion: dims[2],
            cta_strength: dims[3],
            platform_fit: dims[4],
            overall: Self::overall_of(&dims),
        }
    }

    /// Composite of the five dimensions: equal-weight mean, one decimal.
    #[must_use]
    pub fn overall_of(dims: &[f64; 5]) -> f64 {
        round1(dims.iter().sum::<f64>() / 5.0)
    }

    #[must_use]
    pub fn grammar(&self) -> f64 {
        self.grammar
    }

    #[must_use]
    pub fn clarity(&self) -> f64 {
        self.clarity
    }

    #[must_use]
    pub fn emotion(&self) -> f64 {
        self.emotion
    }

    #[must_use]
    pub fn cta_strength(&self) -> f64 {
        self.cta_strength
    }

    #[must_use]
    pub fn platform_fit(&self) -> f64 {
        self.platform_fit
    }

    #[must_use]
    pub fn overall(&self) -> f64 {
        self.overall
    }

    /// Value of a single dimension.
    #[must_use]
    pub fn dimension(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Grammar => self.grammar,
            Dimension::Clarity => self.clarity,
            Dimension::Emotion => self.emotion,
            Dimension::CtaStrength => self.cta_strength,
            Dimension::PlatformFit => self.platform_fit,
        }
    }

    /// Dimensions ordered weakest first. Equal values keep canonical order.
    #[must_use]
    pub fn weakest_first(&self) -> Vec<(Dimension, f64)> {
        let mut dims: Vec<(Dimension, f64)> = Dimension::ALL
            .iter()
            .map(|&d| (d, self.dimension(d)))
            .collect();
        // Stable sort keeps canonical order for ties.
        dims.sort_by(|a, b| a.1.total_cmp(&b.1));
        dims
    }
}

fn clamp_dimension(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    round1(value.clamp(0.0, 100.0))
}

/// Which path produced an [`Assessment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    /// The AI scoring collaborator answered with a well-formed reply.
    Model,
    /// The rule-based fallback heuristic.
    Heuristic,
}

impl std::fmt::Display for ScoreSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreSource::Model => write!(f, "model"),
            ScoreSource::Heuristic => write!(f, "heuristic"),
        }
    }
}

/// A [`QualityScore`] together with the issues that drove it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub score: QualityScore,
    /// Up to three short descriptions of the copy's main weaknesses.
    pub key_issues: Vec<String>,
    pub source: ScoreSource,
}
