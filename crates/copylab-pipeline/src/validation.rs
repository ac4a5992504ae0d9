//! Input validation run before any collaborator call.

use std::sync::LazyLock;

use copylab_core::AdContent;
use regex::Regex;

use crate::error::PipelineError;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)\blorem\s+ipsum\b|\btest\s+headline\b|\bsample\s+text\b",
        r"|\bplaceholder\s+(?:text|copy|headline|content)\b",
        r"|\bmock[\s-]+(?:data|copy|text|headline|content)\b",
        r"|\{\{[^}]*\}\}|\[\s*insert\b[^\]]*\]|\basdf\b|\bx{3,}\b|\btbd\b",
    ))
    .expect("valid placeholder regex")
});

/// Reject content with blank required fields or placeholder text.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidInput`] naming every blank field, or the
/// first field that looks like placeholder copy.
pub fn validate_input(content: &AdContent) -> Result<(), PipelineError> {
    let missing = content.missing_fields();
    if !missing.is_empty() {
        return Err(PipelineError::InvalidInput(format!(
            "missing required field(s): {}",
            missing.join(", ")
        )));
    }

    for (field, text) in [
        ("headline", &content.headline),
        ("body", &content.body),
        ("cta", &content.cta),
    ] {
        if let Some(m) = PLACEHOLDER.find(text) {
            return Err(PipelineError::InvalidInput(format!(
                "{field} looks like placeholder text (\"{}\")",
                m.as_str()
            )));
        }
    }

    Ok(())
}
