//! Rule-based quality control over a set of variations.
//!
//! Pure and infallible: the same variations always yield the same report.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use copylab_core::{best_variation, AdContent, StageName, StageRecord, Variation, VariationType};
use regex::Regex;
use serde::Serialize;
use serde_json::json;

/// `cta_strength` below this earns a suggestion.
pub const CTA_STRENGTH_THRESHOLD: f64 = 75.0;
/// Headlines with fewer words earn a suggestion.
pub const MIN_HEADLINE_WORDS: usize = 3;

static EXAGGERATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:guaranteed|best|perfect|ultimate|revolutionary|never|always|miracle|instantly)\b|\b100%",
    )
    .expect("valid exaggeration regex")
});

/// Output of [`validate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    /// Recommended-primary note first, then per-variation suggestions.
    pub suggestions: Vec<String>,
    /// Problems across the set, such as duplicated headlines.
    pub issues: Vec<String>,
    pub recommended: Option<VariationType>,
}

/// Inspect `variations` and recommend one.
#[must_use]
pub fn validate(variations: &[Variation], original: &AdContent) -> (QualityReport, StageRecord) {
    let mut suggestions = Vec::new();

    for v in variations {
        let terms = exaggerated_terms(&format!("{} {}", v.headline, v.body));
        if !terms.is_empty() {
            suggestions.push(format!(
                "{}: soften absolute claims ({})",
                v.variation_type,
                terms.join(", ")
            ));
        }

        if v.headline.split_whitespace().count() < MIN_HEADLINE_WORDS {
            suggestions.push(format!(
                "{}: headline is under {MIN_HEADLINE_WORDS} words; add a concrete benefit",
                v.variation_type
            ));
        }

        if v.score.cta_strength() < CTA_STRENGTH_THRESHOLD {
            suggestions.push(format!(
                "{}: strengthen the call to action (cta_strength {})",
                v.variation_type,
                v.score.cta_strength()
            ));
        }

        if v.headline.trim() == original.headline.trim() {
            suggestions.push(format!(
                "{}: headline repeats the original unchanged",
                v.variation_type
            ));
        }
    }

    let issues = duplicate_headline_issues(variations);

    let recommended = best_variation(variations);
    if let Some(best) = recommended {
        suggestions.insert(
            0,
            format!(
                "Recommended primary: {} (score: {})",
                best.variation_type,
                best.score.overall()
            ),
        );
    }

    let report = QualityReport {
        suggestions,
        issues,
        recommended: recommended.map(|v| v.variation_type),
    };

    let mut summary = Vec::new();
    if let Some(best) = recommended {
        summary.push(format!(
            "Recommended {} at {}",
            best.variation_type,
            best.score.overall()
        ));
    }
    summary.push(format!(
        "{} suggestion(s), {} issue(s)",
        report.suggestions.len(),
        report.issues.len()
    ));
    if let Some(issue) = report.issues.first() {
        summary.push(issue.clone());
    }

    let record = StageRecord::new(StageName::QualityControl, summary, json!(report));
    (report, record)
}

/// Distinct exaggerated terms in order of first appearance, lowercased.
fn exaggerated_terms(text: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for m in EXAGGERATION.find_iter(text) {
        let term = m.as_str().to_lowercase();
        if !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}

fn normalize_headline(headline: &str) -> String {
    headline
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn duplicate_headline_issues(variations: &[Variation]) -> Vec<String> {
    let mut groups: BTreeMap<String, Vec<VariationType>> = BTreeMap::new();
    for v in variations {
        groups
            .entry(normalize_headline(&v.headline))
            .or_default()
            .push(v.variation_type);
    }

    groups
        .into_iter()
        .filter(|(_, types)| types.len() > 1)
        .map(|(headline, types)| {
            let names: Vec<&str> = types.iter().map(|t| t.as_str()).collect();
            format!(
                "Duplicate headline \"{headline}\" shared by {}",
                names.join(", ")
            )
        })
        .collect()
}
