//! OpenAI-compatible chat-completion client for copylab.
//!
//! [`ProviderChain`] implements the pipeline's [`copylab_core::GenerationClient`]
//! and [`copylab_core::AnalysisClient`] contracts on top of one or more
//! [`ChatClient`]s, retrying transient failures with back-off and falling
//! over to the next provider when one is exhausted.

pub mod chain;
pub mod client;
pub mod error;
pub mod prompts;
pub mod types;

mod retry;

pub use chain::ProviderChain;
pub use client::ChatClient;
pub use error::LlmError;
