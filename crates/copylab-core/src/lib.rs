//! Shared domain model for the copylab ad-copy optimizer.
//!
//! Holds the data types that flow between pipeline stages, the collaborator
//! traits the pipeline consumes, the platform catalog, and environment-driven
//! application configuration.

pub mod app_config;
pub mod collaborators;
pub mod config;
pub mod content;
pub mod platforms;
pub mod record;
pub mod reply;
pub mod score;
pub mod strategy;
pub mod variation;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, ProviderSettings};
pub use collaborators::{AnalysisClient, CollaboratorError, GenerationClient};
pub use config::load_app_config_from_env;
pub use content::AdContent;
pub use platforms::{PlatformCatalog, PlatformConfigProvider, PlatformProfile};
pub use record::{IterationSnapshot, OptimizationResult, StageName, StageRecord};
pub use score::{round1, Assessment, Dimension, QualityScore, ScoreSource};
pub use strategy::{Angle, StrategyPlan};
pub use variation::{
    best_variation, CreativeConfig, EmotionStance, GeneratedCopy, Tone, Variation, VariationType,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read platforms file {path}: {source}")]
    PlatformsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse platforms file: {0}")]
    PlatformsFileParse(#[from] serde_yaml::Error),

    #[error("platforms validation error: {0}")]
    Validation(String),
}
