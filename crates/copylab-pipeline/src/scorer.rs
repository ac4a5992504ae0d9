//! Quality scorer: AI assessment with a heuristic fallback.

use std::sync::Arc;
use std::time::Duration;

use copylab_core::{AdContent, AnalysisClient, Assessment, PlatformConfigProvider, ScoreSource};

use crate::error::Degradation;
use crate::heuristic;
use crate::parse::{parse_assessment, Parsed};

/// Scores ad copy on five dimensions.
///
/// Cheap to clone; every Writer task holds its own copy.
#[derive(Clone)]
pub struct Scorer {
    analyst: Arc<dyn AnalysisClient>,
    platforms: Arc<dyn PlatformConfigProvider>,
    call_timeout: Duration,
}

impl Scorer {
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

    /// Assess `content`, falling back to the heuristic when the AI call
    /// fails, times out, or returns a reply that does not parse.
    ///
    /// Never fails. The returned [`Assessment::source`] tells which path
    /// produced the score.
    pub async fn assess(&self, content: &AdContent) -> Assessment {
        self.evaluate(content).await.0
    }

    /// Like [`Scorer::assess`], also reporting why the AI path was
    /// abandoned when the heuristic was used.
    pub async fn evaluate(&self, content: &AdContent) -> (Assessment, Option<Degradation>) {
        let profile = self.platforms.resolve(&content.platform);

        match self.model_assessment(content, &profile).await {
            Ok(assessment) => (assessment, None),
            Err(reason) => {
                tracing::warn!(
                    platform = %profile.name,
                    error = %reason,
                    "AI scoring failed, using heuristic"
                );
                (
                    heuristic::assess(content, &profile),
                    Some(Degradation::AnalysisDegraded { reason }),
                )
            }
        }
    }

    async fn model_assessment(
        &self,
        content: &AdContent,
        profile: &copylab_core::PlatformProfile,
    ) -> Result<Assessment, String> {
        let reply = tokio::time::timeout(self.call_timeout, self.analyst.assess(content, profile))
            .await
            .map_err(|_| format!("timed out after {:?}", self.call_timeout))?
            .map_err(|e| e.to_string())?;

        match parse_assessment(&reply) {
            Parsed::Ok(parsed) => Ok(Assessment {
                score: parsed.score,
                key_issues: parsed.key_issues,
                source: ScoreSource::Model,
            }),
            Parsed::Failed(reason) => Err(reason),
        }
    }
}
