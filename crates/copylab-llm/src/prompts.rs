//! Prompt construction and reply checks.

use copylab_core::reply::{
    decode_reply, strip_code_fence, AdviceReply, AssessmentReply, ADVICE_REPLY_FORMAT,
    ASSESSMENT_REPLY_FORMAT, COPY_REPLY_FORMAT,
};
use copylab_core::{AdContent, CreativeConfig, GeneratedCopy, PlatformProfile, QualityScore};

use crate::error::LlmError;
use crate::types::Prompt;

const ANALYST_SYSTEM: &str = "You are a senior performance-marketing analyst. \
     You answer with a single JSON object and nothing else.";

const COPYWRITER_SYSTEM: &str = "You are an award-winning direct-response copywriter. \
     You answer with a single JSON object and nothing else.";

/// Sampling temperature for a creativity level on a 1-10 scale.
#[must_use]
pub fn temperature_for(creativity: u8) -> f32 {
    0.2 + f32::from(creativity.min(10)) * 0.08
}

fn describe_content(content: &AdContent) -> String {
    let mut text = format!(
        "Headline: {}\nBody: {}\nCall to action: {}\nPlatform: {}",
        content.headline, content.body, content.cta, content.platform
    );
    if let Some(industry) = &content.industry {
        text.push_str(&format!("\nIndustry: {industry}"));
    }
    if let Some(audience) = &content.target_audience {
        text.push_str(&format!("\nTarget audience: {audience}"));
    }
    text
}

fn describe_limits(profile: &PlatformProfile) -> String {
    format!(
        "Platform limits ({}): headline {} chars, body {} chars, call to action {} chars.\n\
         Audience mindset: {}",
        profile.name,
        profile.headline_limit,
        profile.body_limit,
        profile.cta_limit,
        profile.audience_mindset
    )
}

/// Prompt asking for five dimension scores and key issues.
#[must_use]
pub fn assessment_prompt(content: &AdContent, profile: &PlatformProfile) -> Prompt {
    let user = format!(
        "Score this ad copy from 0 to 100 on grammar, clarity, emotion, cta_strength \
         and platform_fit, and list the 2-3 most important issues.\n\n\
         {content}\n\n{limits}\n\n\
         Reply with exactly this JSON shape:\n{format}",
        content = describe_content(content),
        limits = describe_limits(profile),
        format = ASSESSMENT_REPLY_FORMAT,
    );
    Prompt {
        system: ANALYST_SYSTEM.to_owned(),
        user,
        temperature: 0.2,
    }
}

/// Prompt asking for target psychology and five platform-aware power words.
#[must_use]
pub fn advice_prompt(
    content: &AdContent,
    baseline: &QualityScore,
    profile: &PlatformProfile,
) -> Prompt {
    let user = format!(
        "Plan a rewrite of this ad copy.\n\n{content}\n\n{limits}\n\n\
         Current scores: grammar {g}, clarity {c}, emotion {e}, cta_strength {cta}, \
         platform_fit {pf}, overall {o}.\n\n\
         Describe in one sentence the psychology that will move this audience, and \
         choose five distinct power words suited to the platform.\n\n\
         Reply with exactly this JSON shape:\n{format}",
        content = describe_content(content),
        limits = describe_limits(profile),
        g = baseline.grammar(),
        c = baseline.clarity(),
        e = baseline.emotion(),
        cta = baseline.cta_strength(),
        pf = baseline.platform_fit(),
        o = baseline.overall(),
        format = ADVICE_REPLY_FORMAT,
    );
    Prompt {
        system: ANALYST_SYSTEM.to_owned(),
        user,
        temperature: 0.3,
    }
}

/// Prompt asking for one rewrite under a creative configuration.
#[must_use]
pub fn generation_prompt(content: &AdContent, config: &CreativeConfig) -> Prompt {
    let improvements = config
        .key_improvements
        .iter()
        .enumerate()
        .map(|(i, hint)| format!("{}. {hint}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    let user = format!(
        "Rewrite this ad as the \"{variation}\" variation.\n\n{content}\n\n{limits}\n\n\
         Creative direction:\n\
         - Lead with the {angle} angle.\n\
         - Creativity level {creativity}/10, urgency level {urgency}/10.\n\
         - Emotional stance: {emotion}. Tone: {tone}.\n\
         - Audience psychology: {psychology}\n\
         - Work in some of these power words: {words}\n\n\
         Fix these first:\n{improvements}\n\n\
         Stay within the platform limits. Reply with exactly this JSON shape:\n{format}",
        variation = config.variation_type,
        content = describe_content(content),
        limits = describe_limits(&config.platform),
        angle = config.angle,
        creativity = config.creativity,
        urgency = config.urgency,
        emotion = config.emotion,
        tone = config.tone,
        psychology = config.target_psychology,
        words = config.power_words.join(", "),
        format = COPY_REPLY_FORMAT,
    );
    Prompt {
        system: COPYWRITER_SYSTEM.to_owned(),
        user,
        temperature: temperature_for(config.creativity),
    }
}

/// Parse a generation reply into [`GeneratedCopy`].
///
/// The reply must be the JSON object described by [`COPY_REPLY_FORMAT`],
/// optionally inside one code fence, with all three fields non-blank.
///
/// # Errors
///
/// Returns [`LlmError::Deserialize`] if the reply is not that object, or
/// [`LlmError::EmptyCompletion`] if any field is blank.
pub fn parse_generated_copy(provider: &str, reply: &str) -> Result<GeneratedCopy, LlmError> {
    let copy: GeneratedCopy =
        serde_json::from_str(strip_code_fence(reply)).map_err(|e| LlmError::Deserialize {
            context: format!("{provider} generated copy"),
            source: e,
        })?;

    let copy = GeneratedCopy {
        headline: copy.headline.trim().to_owned(),
        body: copy.body.trim().to_owned(),
        cta: copy.cta.trim().to_owned(),
    };

    if copy.headline.is_empty() || copy.body.is_empty() || copy.cta.is_empty() {
        return Err(LlmError::EmptyCompletion {
            provider: provider.to_owned(),
        });
    }

    Ok(copy)
}

/// Accepts an assessment reply only if it has the declared JSON shape.
///
/// Score ranges are left to the pipeline; this only decides whether the
/// provider answered in the right format.
///
/// # Errors
///
/// Returns [`LlmError::Deserialize`] for prose or a different shape.
pub fn check_assessment_reply(provider: &str, reply: &str) -> Result<String, LlmError> {
    decode_reply::<AssessmentReply>(reply).map_err(|e| LlmError::Deserialize {
        context: format!("{provider} assessment"),
        source: e,
    })?;
    Ok(reply.to_owned())
}

/// Accepts an advice reply only if it has the declared JSON shape.
///
/// # Errors
///
/// Returns [`LlmError::Deserialize`] for prose or a different shape.
pub fn check_advice_reply(provider: &str, reply: &str) -> Result<String, LlmError> {
    decode_reply::<AdviceReply>(reply).map_err(|e| LlmError::Deserialize {
        context: format!("{provider} advice"),
        source: e,
    })?;
    Ok(reply.to_owned())
}
