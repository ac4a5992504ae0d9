//! Writer: four concurrent generate-and-score tasks, one per creative stance.
//!
//! Tasks run in a [`JoinSet`]. The first failure aborts the remaining
//! siblings and fails the whole stage; there is no partial result. Dropping
//! the future returned by [`Writer::generate_variations`] drops the set,
//! which aborts every task still in flight.

use std::sync::Arc;
use std::time::Duration;

use copylab_core::{
    best_variation, round1, AdContent, Assessment, CreativeConfig, EmotionStance, GeneratedCopy,
    GenerationClient, PlatformConfigProvider, PlatformProfile, QualityScore, ScoreSource,
    StageName, StageRecord, StrategyPlan, Tone, Variation, VariationType,
};
use serde_json::json;
use tokio::task::JoinSet;

use crate::error::PipelineError;
use crate::scorer::Scorer;

/// Creative settings for one variation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stance {
    pub creativity: u8,
    pub urgency: u8,
    pub emotion: EmotionStance,
    pub tone: Tone,
}

/// Fixed creative stance for each variation type.
#[must_use]
pub fn stance_for(variation_type: VariationType) -> Stance {
    let (creativity, urgency, emotion, tone) = match variation_type {
        VariationType::Improved => (6, 5, EmotionStance::Inspiring, Tone::Balanced),
        VariationType::BenefitFocused => (5, 4, EmotionStance::Inspiring, Tone::Aspirational),
        VariationType::ProblemFocused => (6, 7, EmotionStance::ProblemSolving, Tone::Empathetic),
        VariationType::StoryDriven => (7, 3, EmotionStance::TrustBuilding, Tone::Narrative),
    };
    Stance {
        creativity,
        urgency,
        emotion,
        tone,
    }
}

/// Percent change of `score` against `baseline`, one decimal.
///
/// A zero baseline yields `100.0` for any positive score and `0.0`
/// otherwise.
#[must_use]
pub fn improvement_delta(baseline: f64, score: f64) -> f64 {
    if baseline.abs() < f64::EPSILON {
        return if score > 0.0 { 100.0 } else { 0.0 };
    }
    round1((score - baseline) / baseline * 100.0)
}

fn creative_config(
    variation_type: VariationType,
    plan: &StrategyPlan,
    platform: &PlatformProfile,
) -> CreativeConfig {
    let stance = stance_for(variation_type);
    CreativeConfig {
        variation_type,
        creativity: stance.creativity,
        urgency: stance.urgency,
        emotion: stance.emotion,
        tone: stance.tone,
        angle: plan.primary_angle,
        target_psychology: plan.target_psychology.clone(),
        key_improvements: plan.key_improvements.clone(),
        power_words: plan.power_words.clone(),
        platform: platform.clone(),
    }
}

type TaskOutput = Result<(VariationType, GeneratedCopy, Assessment), (VariationType, String)>;

pub struct Writer {
    generator: Arc<dyn GenerationClient>,
    scorer: Scorer,
    platforms: Arc<dyn PlatformConfigProvider>,
    call_timeout: Duration,
}

impl Writer {
    #[must_use]
    pub fn new(
        generator: Arc<dyn GenerationClient>,
        scorer: Scorer,
        platforms: Arc<dyn PlatformConfigProvider>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            generator,
            scorer,
            platforms,
            call_timeout,
        }
    }

    /// Generate and score the four variations of `content` concurrently.
    ///
    /// Variations come back in [`VariationType::ALL`] order with their
    /// `improvement_delta` measured against `baseline`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::GenerationFailure`] if any generation call
    /// fails or exceeds the call timeout.
    pub async fn generate_variations(
        &self,
        content: &AdContent,
        plan: &StrategyPlan,
        baseline: &QualityScore,
    ) -> Result<(Vec<Variation>, StageRecord), PipelineError> {
        let profile = self.platforms.resolve(&content.platform);
        let content = Arc::new(content.clone());

        let mut set: JoinSet<TaskOutput> = JoinSet::new();
        for variation_type in VariationType::ALL {
            let config = creative_config(variation_type, plan, &profile);
            let generator = Arc::clone(&self.generator);
            let scorer = self.scorer.clone();
            let content = Arc::clone(&content);
            let call_timeout = self.call_timeout;

            set.spawn(run_task(
                variation_type,
                generator,
                scorer,
                content,
                config,
                call_timeout,
            ));
        }

        let mut slots: [Option<Variation>; 4] = Default::default();
        while let Some(joined) = set.join_next().await {
            let (variation_type, copy, assessment) = match joined {
                Ok(Ok(done)) => done,
                Ok(Err((variation_type, reason))) => {
                    set.abort_all();
                    tracing::warn!(
                        variation = %variation_type,
                        error = %reason,
                        "variation generation failed, aborting writer stage"
                    );
                    return Err(PipelineError::GenerationFailure {
                        variation: Some(variation_type),
                        reason,
                    });
                }
                Err(join_err) => {
                    set.abort_all();
                    return Err(PipelineError::GenerationFailure {
                        variation: None,
                        reason: join_err.to_string(),
                    });
                }
            };

            slots[variation_type.index()] = Some(build_variation(
                variation_type,
                copy,
                &assessment,
                plan,
                baseline,
            ));
        }

        let variations: Vec<Variation> = slots.into_iter().flatten().collect();
        if variations.len() != VariationType::ALL.len() {
            return Err(PipelineError::GenerationFailure {
                variation: None,
                reason: format!("expected 4 variations, got {}", variations.len()),
            });
        }

        let record = writer_record(&variations, baseline);
        Ok((variations, record))
    }
}

async fn run_task(
    variation_type: VariationType,
    generator: Arc<dyn GenerationClient>,
    scorer: Scorer,
    content: Arc<AdContent>,
    config: CreativeConfig,
    call_timeout: Duration,
) -> TaskOutput {
    tracing::debug!(variation = %variation_type, "generating variation");
    let copy = tokio::time::timeout(call_timeout, generator.generate(&content, &config))
        .await
        .map_err(|_| (variation_type, format!("timed out after {call_timeout:?}")))?
        .map_err(|e| (variation_type, e.to_string()))?;

    let assessment = scorer.assess(&content.revised(&copy)).await;
    Ok((variation_type, copy, assessment))
}

fn build_variation(
    variation_type: VariationType,
    copy: GeneratedCopy,
    assessment: &Assessment,
    plan: &StrategyPlan,
    baseline: &QualityScore,
) -> Variation {
    let stance = stance_for(variation_type);
    let mut reasoning = vec![
        format!(
            "{} angle with a {} stance in a {} tone",
            plan.primary_angle, stance.emotion, stance.tone
        ),
        format!(
            "Creativity {}/10, urgency {}/10",
            stance.creativity, stance.urgency
        ),
    ];
    match (assessment.source, assessment.key_issues.first()) {
        (ScoreSource::Heuristic, _) => reasoning.push("Scored by the heuristic fallback".into()),
        (ScoreSource::Model, Some(issue)) => reasoning.push(format!("Remaining issue: {issue}")),
        (ScoreSource::Model, None) => {}
    }

    Variation {
        variation_type,
        headline: copy.headline,
        body: copy.body,
        cta: copy.cta,
        score: assessment.score,
        improvement_delta: improvement_delta(baseline.overall(), assessment.score.overall()),
        reasoning,
    }
}

/// Mean `improvement_delta` of a pass, one decimal.
#[must_use]
pub fn average_improvement(variations: &[Variation]) -> f64 {
    if variations.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let n = variations.len() as f64;
    round1(variations.iter().map(|v| v.improvement_delta).sum::<f64>() / n)
}

fn writer_record(variations: &[Variation], baseline: &QualityScore) -> StageRecord {
    let mut summary = vec![format!(
        "Generated {} variations concurrently",
        variations.len()
    )];
    if let Some(best) = best_variation(variations) {
        summary.push(format!(
            "Best: {} at {} ({:+}% vs {})",
            best.variation_type,
            best.score.overall(),
            best.improvement_delta,
            baseline.overall()
        ));
    }
    summary.push(format!(
        "Average improvement {}%",
        average_improvement(variations)
    ));

    let per_variation: Vec<_> = variations
        .iter()
        .map(|v| {
            json!({
                "variation_type": v.variation_type,
                "overall": v.score.overall(),
                "improvement_delta": v.improvement_delta,
            })
        })
        .collect();

    StageRecord::new(
        StageName::Writer,
        summary,
        json!({
            "baseline_overall": baseline.overall(),
            "variations": per_variation,
        }),
    )
}
