//! Strategist: turns a baseline score into an improvement plan.

use std::sync::Arc;
use std::time::Duration;

use copylab_core::{
    AdContent, AnalysisClient, Angle, Dimension, PlatformConfigProvider, PlatformProfile,
    QualityScore, StageName, StageRecord, StrategyPlan,
};
use serde_json::json;

use crate::error::Degradation;
use crate::parse::{parse_advice, Parsed, ParsedAdvice};

const DEFAULT_PSYCHOLOGY: &str =
    "Busy audience looking for a clear, credible reason to act right now";
const DEFAULT_IMPROVEMENTS: [&str; 3] = [
    "Lead with the single strongest benefit",
    "Make the call to action specific and action-oriented",
    "Tighten wording to fit the platform limits",
];
const DEFAULT_POWER_WORDS: [&str; 5] = ["discover", "exclusive", "proven", "save", "today"];

/// Angle implied by the weakest dimension.
#[must_use]
pub fn angle_for(weakest: Dimension) -> Angle {
    match weakest {
        Dimension::Emotion => Angle::Story,
        Dimension::Clarity | Dimension::CtaStrength => Angle::Problem,
        Dimension::Grammar | Dimension::PlatformFit => Angle::Benefit,
    }
}

/// Remediation hint for one weak dimension.
#[must_use]
pub fn remediation(dimension: Dimension, profile: &PlatformProfile) -> String {
    match dimension {
        Dimension::Grammar => "Fix grammar, capitalization and punctuation".to_string(),
        Dimension::Clarity => "Shorten sentences and lead with one clear message".to_string(),
        Dimension::Emotion => {
            "Add emotional pull with vivid, audience-centred language".to_string()
        }
        Dimension::CtaStrength => {
            "Open the call to action with a strong verb and add urgency".to_string()
        }
        Dimension::PlatformFit => format!(
            "Fit {} limits: headline {}, body {}, call to action {} chars",
            profile.name, profile.headline_limit, profile.body_limit, profile.cta_limit
        ),
    }
}

/// Plan used when the AI advice call fails.
#[must_use]
pub fn default_plan() -> StrategyPlan {
    StrategyPlan {
        primary_angle: Angle::Benefit,
        target_psychology: DEFAULT_PSYCHOLOGY.to_string(),
        key_improvements: DEFAULT_IMPROVEMENTS.iter().map(ToString::to_string).collect(),
        power_words: DEFAULT_POWER_WORDS.iter().map(ToString::to_string).collect(),
    }
}

pub struct Strategist {
    analyst: Arc<dyn AnalysisClient>,
    platforms: Arc<dyn PlatformConfigProvider>,
    call_timeout: Duration,
}

impl Strategist {
    #[must_use]
    pub fn new(
        analyst: Arc<dyn AnalysisClient>,
        platforms: Arc<dyn PlatformConfigProvider>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            analyst,
            platforms,
            call_timeout,
        }
    }

    /// Derive the improvement plan for `content` from its baseline score.
    ///
    /// Never fails: if the AI advice is unavailable the fixed default plan
    /// is returned and the degradation is noted in the stage record.
    pub async fn plan(
        &self,
        content: &AdContent,
        baseline: &QualityScore,
    ) -> (StrategyPlan, StageRecord) {
        let profile = self.platforms.resolve(&content.platform);
        let ranked = baseline.weakest_first();
        let (weakest, weakest_value) = ranked[0];

        let (plan, degradation) = match self.advice(content, baseline, &profile).await {
            Ok(advice) => {
                let plan = StrategyPlan {
                    primary_angle: angle_for(weakest),
                    target_psychology: advice.target_psychology,
                    key_improvements: ranked
                        .iter()
                        .take(3)
                        .map(|&(d, _)| remediation(d, &profile))
                        .collect(),
                    power_words: advice.power_words,
                };
                (plan, None)
            }
            Err(reason) => {
                tracing::warn!(error = %reason, "AI strategy failed, using default plan");
                (default_plan(), Some(Degradation::StrategyDegraded { reason }))
            }
        };

        tracing::debug!(
            angle = %plan.primary_angle,
            weakest = %weakest,
            "strategy planned"
        );

        let mut summary = vec![
            format!(
                "Primary angle: {} (weakest dimension: {weakest} at {weakest_value})",
                plan.primary_angle
            ),
            format!("Top fix: {}", plan.key_improvements[0]),
        ];
        if let Some(d) = &degradation {
            summary.push(d.to_string());
        } else {
            summary.push(format!("Power words: {}", plan.power_words.join(", ")));
        }

        let record = StageRecord::new(
            StageName::Strategist,
            summary,
            json!({
                "plan": plan,
                "weakest_dimension": weakest,
                "degradation": degradation,
            }),
        );
        (plan, record)
    }

    async fn advice(
        &self,
        content: &AdContent,
        baseline: &QualityScore,
        profile: &PlatformProfile,
    ) -> Result<ParsedAdvice, String> {
        let reply = tokio::time::timeout(
            self.call_timeout,
            self.analyst.advise(content, baseline, profile),
        )
        .await
        .map_err(|_| format!("timed out after {:?}", self.call_timeout))?
        .map_err(|e| e.to_string())?;

        match parse_advice(&reply) {
            Parsed::Ok(advice) => Ok(advice),
            Parsed::Failed(reason) => Err(reason),
        }
    }
}
