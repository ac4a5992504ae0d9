use copylab_core::VariationType;
use serde::Serialize;
use thiserror::Error;

/// Errors that end an optimization run without a result.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The submitted copy was rejected before any collaborator call.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A Writer task failed or timed out. Fatal in every pass.
    #[error("generation failed for {}: {reason}", variation_label(.variation))]
    GenerationFailure {
        variation: Option<VariationType>,
        reason: String,
    },
}

fn variation_label(variation: &Option<VariationType>) -> &'static str {
    variation.map_or("an unknown variation", VariationType::as_str)
}

/// A stage whose AI path failed and was recovered locally.
///
/// Never surfaced as an error; logged at `warn` and recorded in the stage's
/// [`copylab_core::StageRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Degradation {
    /// The scorer fell back to the heuristic.
    AnalysisDegraded { reason: String },
    /// The strategist fell back to the default plan.
    StrategyDegraded { reason: String },
}

impl std::fmt::Display for Degradation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Degradation::AnalysisDegraded { reason } => {
                write!(f, "analysis degraded to heuristic: {reason}")
            }
            Degradation::StrategyDegraded { reason } => {
                write!(f, "strategy degraded to default plan: {reason}")
            }
        }
    }
}
