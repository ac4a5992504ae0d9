//! Ad copy supplied on the command line or in a JSON file.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use copylab_core::AdContent;

/// Copy fields shared by `optimize` and `score`.
///
/// With `--input`, the file is read first and any flags given override
/// its fields.
#[derive(Debug, Default, Args)]
pub struct CopyArgs {
    /// JSON file with headline, body, cta, platform and optional
    /// industry / target_audience
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    #[arg(long)]
    pub headline: Option<String>,

    #[arg(long)]
    pub body: Option<String>,

    /// Call to action
    #[arg(long)]
    pub cta: Option<String>,

    /// Platform identifier, e.g. facebook, google, linkedin
    #[arg(long)]
    pub platform: Option<String>,

    #[arg(long)]
    pub industry: Option<String>,

    /// Target audience description
    #[arg(long)]
    pub audience: Option<String>,
}

impl CopyArgs {
    /// Build the [`AdContent`] to submit. Missing fields are left empty so
    /// the pipeline's input validation reports them.
    ///
    /// # Errors
    ///
    /// Returns an error if `--input` cannot be read or is not valid JSON.
    pub fn into_content(self) -> anyhow::Result<AdContent> {
        let mut content = match &self.input {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                serde_json::from_str::<AdContent>(&raw)
                    .with_context(|| format!("failed to parse {}", path.display()))?
            }
            None => AdContent::new("", "", "", ""),
        };

        if let Some(headline) = self.headline {
            content.headline = headline;
        }
        if let Some(body) = self.body {
            content.body = body;
        }
        if let Some(cta) = self.cta {
            content.cta = cta;
        }
        if let Some(platform) = self.platform {
            content.platform = platform;
        }
        if self.industry.is_some() {
            content.industry = self.industry;
        }
        if self.audience.is_some() {
            content.target_audience = self.audience;
        }

        Ok(content)
    }
}
