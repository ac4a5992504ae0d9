//! Strategy plan handed from the Strategist to the Writer.

use serde::{Deserialize, Serialize};

/// The creative angle a rewrite leads with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Angle {
    Benefit,
    Problem,
    Story,
}

impl std::fmt::Display for Angle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Angle::Benefit => write!(f, "benefit"),
            Angle::Problem => write!(f, "problem"),
            Angle::Story => write!(f, "story"),
        }
    }
}

/// Improvement plan derived once per run from the baseline score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyPlan {
    pub primary_angle: Angle,
    /// Short description of what motivates the audience.
    pub target_psychology: String,
    /// Exactly three remediation hints, worst dimension first.
    pub key_improvements: Vec<String>,
    /// Exactly five distinct words to weave into rewrites.
    pub power_words: Vec<String>,
}
