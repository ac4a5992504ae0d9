//! Stage records and the final optimization result.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::score::QualityScore;
use crate::variation::Variation;

/// The four pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageName {
    Analyzer,
    Strategist,
    Writer,
    QualityControl,
}

impl StageName {
    pub const ALL: [StageName; 4] = [
        StageName::Analyzer,
        StageName::Strategist,
        StageName::Writer,
        StageName::QualityControl,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StageName::Analyzer => "analyzer",
            StageName::Strategist => "strategist",
            StageName::Writer => "writer",
            StageName::QualityControl => "quality_control",
        }
    }
}

impl std::fmt::Display for StageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit entry describing what one stage decided and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageRecord {
    pub stage_name: StageName,
    /// One to three short statements, most important first.
    pub decision_summary: Vec<String>,
    /// Stage-specific structured payload.
    pub data: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl StageRecord {
    /// Maximum number of entries kept in `decision_summary`.
    pub const MAX_SUMMARY: usize = 3;

    /// Create a record stamped with the current time. The summary is
    /// truncated to [`StageRecord::MAX_SUMMARY`] entries.
    #[must_use]
    pub fn new(
        stage_name: StageName,
        mut decision_summary: Vec<String>,
        data: serde_json::Value,
    ) -> Self {
        decision_summary.truncate(Self::MAX_SUMMARY);
        Self {
            stage_name,
            decision_summary,
            data,
            timestamp: Utc::now(),
        }
    }
}

/// Progress of the best score across refinement passes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IterationSnapshot {
    pub iteration: u32,
    pub best_score: f64,
    pub avg_improvement: f64,
}

/// Everything one `optimize` run produces.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationResult {
    pub run_id: Uuid,
    pub original_score: QualityScore,
    /// Score of the best variation at the end of the run.
    pub improved_score: QualityScore,
    pub variations: Vec<Variation>,
    pub reasoning_log: BTreeMap<StageName, StageRecord>,
    /// Recommended-variation note first.
    pub suggestions: Vec<String>,
    pub iteration_count: u32,
    pub improvement_history: Vec<IterationSnapshot>,
}

impl OptimizationResult {
    /// The variation with the highest overall score.
    #[must_use]
    pub fn best_variation(&self) -> Option<&Variation> {
        crate::variation::best_variation(&self.variations)
    }
}
