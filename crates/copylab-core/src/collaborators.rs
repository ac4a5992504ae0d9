//! Contracts for the external services the pipeline calls.
//!
//! Implementations own their retry, back-off and provider-fallback policy.
//! The pipeline only sees "eventually succeeds or reports failure".

use async_trait::async_trait;
use thiserror::Error;

use crate::content::AdContent;
use crate::platforms::PlatformProfile;
use crate::score::QualityScore;
use crate::variation::{CreativeConfig, GeneratedCopy};

/// Failure reported by a collaborator after its own recovery attempts.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("all providers failed: {0}")]
    Exhausted(String),
}

/// Writes one candidate rewrite for a creative configuration.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] once every provider and retry is spent.
    async fn generate(
        &self,
        content: &AdContent,
        config: &CreativeConfig,
    ) -> Result<GeneratedCopy, CollaboratorError>;
}

/// AI-backed analysis used by the scorer and the strategist.
///
/// Replies are returned verbatim; the pipeline parses them strictly and
/// treats a malformed reply the same as a failed call.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    /// Ask for the five dimension scores and key issues of `content`.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] if no reply could be obtained.
    async fn assess(
        &self,
        content: &AdContent,
        profile: &PlatformProfile,
    ) -> Result<String, CollaboratorError>;

    /// Ask for target psychology and platform-aware power words.
    ///
    /// # Errors
    ///
    /// Returns [`CollaboratorError`] if no reply could be obtained.
    async fn advise(
        &self,
        content: &AdContent,
        baseline: &QualityScore,
        profile: &PlatformProfile,
    ) -> Result<String, CollaboratorError>;
}
