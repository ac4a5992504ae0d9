//! Strict parsing of AI replies.
//!
//! A reply may sit inside a single markdown code fence; otherwise it must be
//! exactly the declared JSON shape. Anything else is [`Parsed::Failed`],
//! which callers treat the same as a failed call.

use std::collections::HashSet;

use copylab_core::reply::{decode_reply, AdviceReply, AssessmentReply};
use copylab_core::QualityScore;

/// Outcome of parsing one AI reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed<T> {
    Ok(T),
    Failed(String),
}

/// Number of power words a strategy plan carries.
pub const POWER_WORD_COUNT: usize = 5;
const MAX_KEY_ISSUES: usize = 3;

/// Dimension scores and key issues from an assessment reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAssessment {
    pub score: QualityScore,
    pub key_issues: Vec<String>,
}

/// Target psychology and power words from an advice reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAdvice {
    pub target_psychology: String,
    pub power_words: Vec<String>,
}

/// Parse a reply to [`copylab_core::AnalysisClient::assess`].
///
/// Every dimension must be a finite number in `[0, 100]`. Blank issues are
/// dropped and at most three are kept.
#[must_use]
pub fn parse_assessment(reply: &str) -> Parsed<ParsedAssessment> {
    let raw: AssessmentReply = match decode_reply(reply) {
        Ok(raw) => raw,
        Err(e) => return Parsed::Failed(format!("assessment reply is not the expected JSON: {e}")),
    };

    let dims = [
        ("grammar", raw.grammar),
        ("clarity", raw.clarity),
        ("emotion", raw.emotion),
        ("cta_strength", raw.cta_strength),
        ("platform_fit", raw.platform_fit),
    ];
    if let Some((name, value)) = dims
        .iter()
        .find(|(_, v)| !v.is_finite() || !(0.0..=100.0).contains(v))
    {
        return Parsed::Failed(format!("{name} score {value} is outside 0-100"));
    }

    let key_issues = raw
        .key_issues
        .into_iter()
        .map(|issue| issue.trim().to_string())
        .filter(|issue| !issue.is_empty())
        .take(MAX_KEY_ISSUES)
        .collect();

    Parsed::Ok(ParsedAssessment {
        score: QualityScore::new(
            raw.grammar,
            raw.clarity,
            raw.emotion,
            raw.cta_strength,
            raw.platform_fit,
        ),
        key_issues,
    })
}

/// Parse a reply to [`copylab_core::AnalysisClient::advise`].
///
/// Requires a non-blank target psychology and at least five distinct
/// (case-insensitive) non-blank power words; the first five are kept.
#[must_use]
pub fn parse_advice(reply: &str) -> Parsed<ParsedAdvice> {
    let raw: AdviceReply = match decode_reply(reply) {
        Ok(raw) => raw,
        Err(e) => return Parsed::Failed(format!("advice reply is not the expected JSON: {e}")),
    };

    let target_psychology = raw.target_psychology.trim().to_string();
    if target_psychology.is_empty() {
        return Parsed::Failed("target_psychology is blank".to_string());
    }

    let mut seen = HashSet::new();
    let power_words: Vec<String> = raw
        .power_words
        .into_iter()
        .map(|w| w.trim().to_string())
        .filter(|w| !w.is_empty() && seen.insert(w.to_lowercase()))
        .take(POWER_WORD_COUNT)
        .collect();
    if power_words.len() < POWER_WORD_COUNT {
        return Parsed::Failed(format!(
            "expected {POWER_WORD_COUNT} distinct power words, got {}",
            power_words.len()
        ));
    }

    Parsed::Ok(ParsedAdvice {
        target_psychology,
        power_words,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_ASSESSMENT: &str = r#"{"grammar": 90, "clarity": 80, "emotion": 40, "cta_strength": 70, "platform_fit": 95, "key_issues": ["Flat tone", " ", "Weak CTA"]}"#;

    #[test]
    fn parses_assessment() {
        let Parsed::Ok(parsed) = parse_assessment(VALID_ASSESSMENT) else {
            panic!("expected a parsed assessment");
        };
        assert!((parsed.score.overall() - 75.0).abs() < 1e-9);
        assert_eq!(parsed.key_issues, vec!["Flat tone", "Weak CTA"]);
    }

    #[test]
    fn parses_fenced_assessment() {
        let fenced = format!("```json\n{VALID_ASSESSMENT}\n```");
        assert!(matches!(parse_assessment(&fenced), Parsed::Ok(_)));
    }

    #[test]
    fn rejects_prose_around_json() {
        let reply = format!("Here you go: {VALID_ASSESSMENT}");
        assert!(matches!(parse_assessment(&reply), Parsed::Failed(_)));
    }

    #[test]
    fn rejects_missing_dimension() {
        let reply = r#"{"grammar": 90, "clarity": 80, "emotion": 40, "cta_strength": 70, "key_issues": []}"#;
        assert!(matches!(parse_assessment(reply), Parsed::Failed(_)));
    }

    #[test]
    fn rejects_unknown_field() {
        let reply = r#"{"grammar": 90, "clarity": 80, "emotion": 40, "cta_strength": 70, "platform_fit": 95, "key_issues": [], "overall": 99}"#;
        assert!(matches!(parse_assessment(reply), Parsed::Failed(_)));
    }

    #[test]
    fn rejects_out_of_range_score() {
        let reply = r#"{"grammar": 190, "clarity": 80, "emotion": 40, "cta_strength": 70, "platform_fit": 95, "key_issues": []}"#;
        let Parsed::Failed(reason) = parse_assessment(reply) else {
            panic!("expected failure");
        };
        assert!(reason.contains("grammar"));
    }

    #[test]
    fn parses_advice_and_dedupes_words() {
        let reply = r#"{"target_psychology": "Busy parents short on time", "power_words": ["Save", "save", "easy", "fast", "trusted", "today", "extra"]}"#;
        let Parsed::Ok(advice) = parse_advice(reply) else {
            panic!("expected parsed advice");
        };
        assert_eq!(advice.power_words, vec!["Save", "easy", "fast", "trusted", "today"]);
    }

    #[test]
    fn rejects_too_few_distinct_words() {
        let reply = r#"{"target_psychology": "x", "power_words": ["a", "A", "b", "c", "d"]}"#;
        assert!(matches!(parse_advice(reply), Parsed::Failed(_)));
    }

    #[test]
    fn rejects_blank_psychology() {
        let reply = r#"{"target_psychology": "  ", "power_words": ["a", "b", "c", "d", "e"]}"#;
        assert!(matches!(parse_advice(reply), Parsed::Failed(_)));
    }

    #[test]
    fn rejects_extra_fields() {
        let reply = r#"{"target_psychology": "savers", "power_words": ["a", "b", "c", "d", "e"], "tone": "warm"}"#;
        assert!(matches!(parse_advice(reply), Parsed::Failed(_)));
    }
}
