//! `platforms` command handler.

use std::fmt::Write as _;
use std::path::Path;

use copylab_core::{PlatformCatalog, PlatformProfile};

/// Print the built-in profiles merged with any overrides in `file`.
///
/// # Errors
///
/// Returns an error if `file` cannot be read, parsed or validated.
pub(crate) fn list(file: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let catalog = PlatformCatalog::from_optional_path(file)?;
    let profiles: Vec<&PlatformProfile> = catalog.profiles().collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&profiles)?);
    } else {
        print!("{}", render_profiles(&profiles));
    }
    Ok(())
}

fn render_profiles(profiles: &[&PlatformProfile]) -> String {
    let mut out = format!(
        "{:<12} {:>8} {:>6} {:>5}  audience\n",
        "platform", "headline", "body", "cta"
    );
    for p in profiles {
        let _ = writeln!(
            out,
            "{:<12} {:>8} {:>6} {:>5}  {}",
            p.name, p.headline_limit, p.body_limit, p.cta_limit, p.audience_mindset
        );
    }
    out
}
