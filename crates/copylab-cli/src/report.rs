//! Plain-text rendering of pipeline output.

use std::fmt::Write as _;

use copylab_core::{Assessment, OptimizationResult, QualityScore};
use copylab_pipeline::Degradation;

fn score_line(score: &QualityScore) -> String {
    format!(
        "overall {} | grammar {} | clarity {} | emotion {} | cta {} | platform fit {}",
        score.overall(),
        score.grammar(),
        score.clarity(),
        score.emotion(),
        score.cta_strength(),
        score.platform_fit()
    )
}

pub(crate) fn render_result(result: &OptimizationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Run {}", result.run_id);
    let _ = writeln!(
        out,
        "Score: {} -> {} after {} pass(es)",
        result.original_score.overall(),
        result.improved_score.overall(),
        result.iteration_count
    );
    let _ = writeln!(out, "Original: {}", score_line(&result.original_score));
    if let Some(best) = result.best_variation() {
        let _ = writeln!(out, "Best:     {} ({})", best.variation_type, score_line(&best.score));
    }

    out.push_str("\nVariations\n");
    for v in &result.variations {
        let _ = writeln!(
            out,
            "  [{}] {} ({:+}%)",
            v.variation_type,
            v.score.overall(),
            v.improvement_delta
        );
        let _ = writeln!(out, "    Headline: {}", v.headline);
        let _ = writeln!(out, "    Body:     {}", v.body);
        let _ = writeln!(out, "    CTA:      {}", v.cta);
    }

    if !result.suggestions.is_empty() {
        out.push_str("\nSuggestions\n");
        for s in &result.suggestions {
            let _ = writeln!(out, "  - {s}");
        }
    }

    out.push_str("\nDecisions\n");
    for (stage, record) in &result.reasoning_log {
        let _ = writeln!(out, "  {stage}: {}", record.decision_summary.join(" / "));
    }
    out
}

pub(crate) fn render_assessment(
    assessment: &Assessment,
    degradation: Option<&Degradation>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Score ({}): {}", assessment.source, score_line(&assessment.score));
    for issue in &assessment.key_issues {
        let _ = writeln!(out, "  - {issue}");
    }
    if let Some(d) = degradation {
        let _ = writeln!(out, "Note: {d}");
    }
    out
}
