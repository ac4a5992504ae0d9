//! Reply formats shared by the AI collaborators and the pipeline's parsers.
//!
//! The prompt builders ask for exactly these shapes; the parsers accept
//! nothing else.

use serde::de::DeserializeOwned;
use serde::Deserialize;

/// JSON shape expected from [`crate::AnalysisClient::assess`].
pub const ASSESSMENT_REPLY_FORMAT: &str = r#"{"grammar": <0-100>, "clarity": <0-100>, "emotion": <0-100>, "cta_strength": <0-100>, "platform_fit": <0-100>, "key_issues": ["<issue>", "<issue>"]}"#;

/// JSON shape expected from [`crate::AnalysisClient::advise`].
pub const ADVICE_REPLY_FORMAT: &str = r#"{"target_psychology": "<one sentence>", "power_words": ["<word>", "<word>", "<word>", "<word>", "<word>"]}"#;

/// JSON shape expected from [`crate::GenerationClient::generate`].
pub const COPY_REPLY_FORMAT: &str =
    r#"{"headline": "<headline>", "body": "<body>", "cta": "<call to action>"}"#;

/// Strip one surrounding markdown code fence (with optional language tag)
/// and surrounding whitespace. Anything else is returned trimmed but
/// otherwise untouched.
#[must_use]
pub fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = inner.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the language tag line, e.g. "json\n".
    match inner.find('\n') {
        Some(newline) if !inner[..newline].trim_start().starts_with('{') => {
            inner[newline + 1..].trim()
        }
        _ => inner.trim(),
    }
}

/// Raw fields of an assessment reply, before range checks.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssessmentReply {
    pub grammar: f64,
    pub clarity: f64,
    pub emotion: f64,
    pub cta_strength: f64,
    pub platform_fit: f64,
    pub key_issues: Vec<String>,
}

/// Raw fields of an advice reply, before the power-word checks.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdviceReply {
    pub target_psychology: String,
    pub power_words: Vec<String>,
}

/// Decode `reply` as exactly `T`, allowing one surrounding code fence.
///
/// # Errors
///
/// Returns the `serde_json` error when the reply is not that JSON shape.
pub fn decode_reply<T: DeserializeOwned>(reply: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(strip_code_fence(reply))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_json_is_returned_trimmed() {
        assert_eq!(strip_code_fence("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn fenced_json_with_language_tag() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn fenced_json_without_language_tag() {
        assert_eq!(strip_code_fence("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }

    #[test]
    fn decodes_fenced_advice() {
        let reply = "```json\n{\"target_psychology\": \"savers\", \"power_words\": [\"save\"]}\n```";
        let advice: AdviceReply = decode_reply(reply).unwrap();
        assert_eq!(advice.target_psychology, "savers");
        assert_eq!(advice.power_words, vec!["save"]);
    }

    #[test]
    fn prose_and_extra_fields_do_not_decode() {
        assert!(decode_reply::<AdviceReply>("Sure! Try words like save and free.").is_err());
        let extra = r#"{"target_psychology": "savers", "power_words": [], "tone": "warm"}"#;
        assert!(decode_reply::<AdviceReply>(extra).is_err());
        assert!(decode_reply::<AssessmentReply>(r#"{"grammar": 80}"#).is_err());
    }

    #[test]
    fn unterminated_fence_is_left_alone() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}"), "```json\n{\"a\": 1}");
    }
}
