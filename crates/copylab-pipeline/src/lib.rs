//! Ad-copy optimization pipeline.
//!
//! Scores the submitted copy, plans an improvement strategy, writes four
//! concurrent variations, validates them, and refines the best one through
//! further Writer passes while each pass beats the last. Collaborators are
//! injected through [`PipelineContext`].

pub mod error;
pub mod heuristic;
pub mod orchestrator;
pub mod parse;
pub mod scorer;
pub mod strategist;
pub mod validation;
pub mod validator;
pub mod writer;

pub use error::{Degradation, PipelineError};
pub use orchestrator::{
    clamp_iterations, Optimizer, PipelineContext, MAX_ITERATIONS, MIN_ITERATIONS,
};
pub use parse::Parsed;
pub use scorer::Scorer;
pub use validator::QualityReport;
