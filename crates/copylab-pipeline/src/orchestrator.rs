//! Pipeline orchestration.
//!
//! Runs analyze → strategize → write → validate once, then refines the best
//! variation through further Writer passes until a pass fails to beat the
//! best score held so far or the iteration cap is reached.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use copylab_core::{
    best_variation, AdContent, AnalysisClient, Assessment, GenerationClient, IterationSnapshot,
    OptimizationResult, PlatformConfigProvider, StageName, StageRecord, Variation,
};
use serde_json::json;
use uuid::Uuid;

use crate::error::{Degradation, PipelineError};
use crate::scorer::Scorer;
use crate::strategist::Strategist;
use crate::validation::validate_input;
use crate::validator::validate;
use crate::writer::{average_improvement, Writer};

/// Fewest Writer passes a run makes.
pub const MIN_ITERATIONS: u32 = 1;
/// Most Writer passes a run makes.
pub const MAX_ITERATIONS: u32 = 4;
/// Default timeout for a single collaborator call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(45);

/// Clamp a requested iteration count to `[MIN_ITERATIONS, MAX_ITERATIONS]`.
#[must_use]
pub fn clamp_iterations(requested: u32) -> u32 {
    requested.clamp(MIN_ITERATIONS, MAX_ITERATIONS)
}

/// Collaborators and limits injected into an [`Optimizer`].
#[derive(Clone)]
pub struct PipelineContext {
    pub generator: Arc<dyn GenerationClient>,
    pub analyst: Arc<dyn AnalysisClient>,
    pub platforms: Arc<dyn PlatformConfigProvider>,
    pub call_timeout: Duration,
}

impl PipelineContext {
    #[must_use]
    pub fn new(
        generator: Arc<dyn GenerationClient>,
        analyst: Arc<dyn AnalysisClient>,
        platforms: Arc<dyn PlatformConfigProvider>,
    ) -> Self {
        Self {
            generator,
            analyst,
            platforms,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Analyzing,
    Strategizing,
    Writing,
    Validating,
    Done,
}

impl Stage {
    fn as_str(self) -> &'static str {
        match self {
            Stage::Analyzing => "analyzing",
            Stage::Strategizing => "strategizing",
            Stage::Writing => "writing",
            Stage::Validating => "validating",
            Stage::Done => "done",
        }
    }

    fn next(self) -> Stage {
        match self {
            Stage::Analyzing => Stage::Strategizing,
            Stage::Strategizing => Stage::Writing,
            Stage::Writing => Stage::Validating,
            Stage::Validating | Stage::Done => Stage::Done,
        }
    }
}

/// Tracks the current stage of one run and logs every transition.
struct StageTracker {
    run_id: Uuid,
    current: Stage,
}

impl StageTracker {
    fn start(run_id: Uuid) -> Self {
        tracing::info!(%run_id, stage = Stage::Analyzing.as_str(), "optimization started");
        Self {
            run_id,
            current: Stage::Analyzing,
        }
    }

    fn advance(&mut self) {
        let next = self.current.next();
        tracing::info!(
            run_id = %self.run_id,
            from = self.current.as_str(),
            to = next.as_str(),
            "stage transition"
        );
        self.current = next;
    }
}

/// Runs the four-stage optimization pipeline.
pub struct Optimizer {
    scorer: Scorer,
    strategist: Strategist,
    writer: Writer,
}

impl Optimizer {
    #[must_use]
    pub fn new(context: PipelineContext) -> Self {
        let scorer = Scorer::new(
            Arc::clone(&context.analyst),
            Arc::clone(&context.platforms),
            context.call_timeout,
        );
        let strategist = Strategist::new(
            Arc::clone(&context.analyst),
            Arc::clone(&context.platforms),
            context.call_timeout,
        );
        let writer = Writer::new(
            context.generator,
            scorer.clone(),
            context.platforms,
            context.call_timeout,
        );
        Self {
            scorer,
            strategist,
            writer,
        }
    }

    /// Validate and score `content` without optimizing it.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidInput`] if the content is rejected.
    pub async fn assess(
        &self,
        content: &AdContent,
    ) -> Result<(Assessment, Option<Degradation>), PipelineError> {
        validate_input(content)?;
        Ok(self.scorer.evaluate(content).await)
    }

    /// Optimize `content` over up to `max_iterations` Writer passes.
    ///
    /// `max_iterations` is clamped to `[1, 4]`. Dropping the returned future
    /// cancels the run and aborts any in-flight generation.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::InvalidInput`] before any collaborator call.
    /// - [`PipelineError::GenerationFailure`] if any Writer task fails, in
    ///   the first pass or a refinement.
    pub async fn optimize(
        &self,
        content: &AdContent,
        max_iterations: u32,
    ) -> Result<OptimizationResult, PipelineError> {
        validate_input(content)?;
        let max_iterations = clamp_iterations(max_iterations);
        let run_id = Uuid::new_v4();
        let mut stage = StageTracker::start(run_id);
        let mut log: BTreeMap<StageName, StageRecord> = BTreeMap::new();

        // Analyze
        let (baseline, degradation) = self.scorer.evaluate(content).await;
        log.insert(
            StageName::Analyzer,
            analyzer_record(&baseline, degradation.as_ref()),
        );
        stage.advance();

        // Strategize
        let (plan, record) = self.strategist.plan(content, &baseline.score).await;
        log.insert(StageName::Strategist, record);
        stage.advance();

        // Write
        let (mut variations, record) = self
            .writer
            .generate_variations(content, &plan, &baseline.score)
            .await?;
        log.insert(StageName::Writer, record);
        stage.advance();

        // Validate
        let (mut report, record) = validate(&variations, content);
        log.insert(StageName::QualityControl, record);

        let mut best = best_or_failure(&variations)?.clone();
        let mut history = vec![IterationSnapshot {
            iteration: 1,
            best_score: best.score.overall(),
            avg_improvement: average_improvement(&variations),
        }];

        for iteration in 2..=max_iterations {
            let working = content.revised(&best.copy());
            tracing::info!(
                %run_id,
                iteration,
                baseline = best.score.overall(),
                "refinement pass"
            );

            let (candidates, record) = self
                .writer
                .generate_variations(&working, &plan, &best.score)
                .await?;
            let candidate = best_or_failure(&candidates)?;

            if candidate.score.overall() <= best.score.overall() {
                tracing::info!(
                    %run_id,
                    iteration,
                    held = best.score.overall(),
                    candidate = candidate.score.overall(),
                    "refinement did not improve, stopping"
                );
                break;
            }

            best = candidate.clone();
            history.push(IterationSnapshot {
                iteration,
                best_score: best.score.overall(),
                avg_improvement: average_improvement(&candidates),
            });
            variations = candidates;
            log.insert(StageName::Writer, record);

            let (revalidated, record) = validate(&variations, content);
            report = revalidated;
            log.insert(StageName::QualityControl, record);
        }
        stage.advance();

        let iteration_count = u32::try_from(history.len()).unwrap_or(max_iterations);
        tracing::info!(
            %run_id,
            original = baseline.score.overall(),
            improved = best.score.overall(),
            iteration_count,
            "optimization complete"
        );

        Ok(OptimizationResult {
            run_id,
            original_score: baseline.score,
            improved_score: best.score,
            variations,
            reasoning_log: log,
            suggestions: report.suggestions,
            iteration_count,
            improvement_history: history,
        })
    }
}

fn best_or_failure(variations: &[Variation]) -> Result<&Variation, PipelineError> {
    best_variation(variations).ok_or_else(|| PipelineError::GenerationFailure {
        variation: None,
        reason: "writer returned no variations".to_string(),
    })
}

fn analyzer_record(baseline: &Assessment, degradation: Option<&Degradation>) -> StageRecord {
    let (weakest, value) = baseline.score.weakest_first()[0];
    let mut summary = vec![
        format!(
            "Baseline overall {} ({} score)",
            baseline.score.overall(),
            baseline.source
        ),
        format!("Weakest dimension: {weakest} ({value})"),
    ];
    if let Some(d) = degradation {
        summary.push(d.to_string());
    } else if !baseline.key_issues.is_empty() {
        summary.push(format!("Key issues: {}", baseline.key_issues.join("; ")));
    }

    StageRecord::new(
        StageName::Analyzer,
        summary,
        json!({
            "score": baseline.score,
            "key_issues": baseline.key_issues,
            "source": baseline.source,
            "degradation": degradation,
        }),
    )
}

#[cfg(test)]
mod tests {
    use copylab_core::{QualityScore, ScoreSource, VariationType};

    use super::*;

    #[test]
    fn clamp_is_idempotent_at_bounds() {
        assert_eq!(clamp_iterations(0), 1);
        assert_eq!(clamp_iterations(1), 1);
        assert_eq!(clamp_iterations(3), 3);
        assert_eq!(clamp_iterations(10), 4);
        assert_eq!(clamp_iterations(clamp_iterations(10)), clamp_iterations(4));
    }

    #[test]
    fn stages_advance_in_order() {
        let mut stage = Stage::Analyzing;
        let mut seen = vec![stage.as_str()];
        while stage != Stage::Done {
            stage = stage.next();
            seen.push(stage.as_str());
        }
        assert_eq!(
            seen,
            vec!["analyzing", "strategizing", "writing", "validating", "done"]
        );
    }

    #[test]
    fn best_pick_prefers_first_on_tie() {
        let mk = |t, overall| Variation {
            variation_type: t,
            headline: "h".into(),
            body: "b".into(),
            cta: "c".into(),
            score: QualityScore::new(overall, overall, overall, overall, overall),
            improvement_delta: 0.0,
            reasoning: vec![],
        };
        let vs = vec![
            mk(VariationType::Improved, 60.0),
            mk(VariationType::BenefitFocused, 75.0),
            mk(VariationType::ProblemFocused, 75.0),
            mk(VariationType::StoryDriven, 70.0),
        ];
        assert_eq!(
            best_or_failure(&vs).unwrap().variation_type,
            VariationType::BenefitFocused
        );
        assert!(matches!(
            best_or_failure(&[]),
            Err(PipelineError::GenerationFailure { variation: None, .. })
        ));
    }

    #[test]
    fn analyzer_record_notes_degradation() {
        let baseline = Assessment {
            score: QualityScore::new(80.0, 70.0, 40.0, 85.0, 100.0),
            key_issues: vec!["Copy lacks emotional pull".into()],
            source: ScoreSource::Heuristic,
        };
        let degradation = Degradation::AnalysisDegraded {
            reason: "timed out".into(),
        };
        let record = analyzer_record(&baseline, Some(&degradation));
        assert_eq!(record.stage_name, StageName::Analyzer);
        assert!(record.decision_summary[0].contains("heuristic"));
        assert!(record.decision_summary[1].contains("emotion"));
        assert_eq!(record.data["degradation"]["kind"], "analysis_degraded");
    }
}
