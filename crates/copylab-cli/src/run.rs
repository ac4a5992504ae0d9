//! `optimize` and `score` command handlers.

use std::sync::Arc;
use std::time::Duration;

use copylab_core::{AppConfig, PlatformCatalog};
use copylab_llm::ProviderChain;
use copylab_pipeline::{Optimizer, PipelineContext};

use crate::input::CopyArgs;
use crate::report;

/// Wire the HTTP provider chain and platform catalog into an [`Optimizer`].
fn build_optimizer(config: &AppConfig) -> anyhow::Result<Optimizer> {
    let chain = Arc::new(ProviderChain::from_config(config)?);
    tracing::debug!(providers = ?chain.provider_names(), "provider chain ready");

    let platforms = Arc::new(PlatformCatalog::from_optional_path(
        config.platforms_path.as_deref(),
    )?);

    let context = PipelineContext::new(chain.clone(), chain, platforms)
        .with_call_timeout(Duration::from_secs(config.call_timeout_secs));
    Ok(Optimizer::new(context))
}

/// Run the full pipeline. Ctrl-c drops the run, which aborts in-flight
/// generation.
///
/// # Errors
///
/// Returns an error on invalid input, configuration problems, a failed
/// Writer stage, or cancellation.
pub(crate) async fn optimize(
    config: &AppConfig,
    copy: CopyArgs,
    iterations: u32,
    json: bool,
) -> anyhow::Result<()> {
    let content = copy.into_content()?;
    let optimizer = build_optimizer(config)?;

    let result = tokio::select! {
        result = optimizer.optimize(&content, iterations) => result?,
        () = cancel_signal() => anyhow::bail!("optimization cancelled"),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", report::render_result(&result));
    }
    Ok(())
}

/// Score the copy once and print the assessment.
///
/// # Errors
///
/// Returns an error on invalid input or configuration problems.
pub(crate) async fn score(config: &AppConfig, copy: CopyArgs, json: bool) -> anyhow::Result<()> {
    let content = copy.into_content()?;
    let optimizer = build_optimizer(config)?;

    let (assessment, degradation) = tokio::select! {
        outcome = optimizer.assess(&content) => outcome?,
        () = cancel_signal() => anyhow::bail!("scoring cancelled"),
    };

    if json {
        let value = serde_json::json!({
            "assessment": assessment,
            "degradation": degradation,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!(
            "{}",
            report::render_assessment(&assessment, degradation.as_ref())
        );
    }
    Ok(())
}

async fn cancel_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("received ctrl-c, cancelling run");
}
