//! Static site build command.

use std::path::Path;

use anyhow::{Context, Result};
use folio_config::{CliSettings, EnvOverrides, SiteConfig};
use folio_static::{BuildReport, SiteBuilder};

/// Load `folio.toml` with environment and CLI overrides applied.
pub fn load_config(config_path: Option<&Path>, cli: &CliSettings) -> Result<SiteConfig> {
    SiteConfig::load(config_path, &EnvOverrides::from_env(), cli).context("Invalid configuration")
}

/// Build once and log the outcome, including every skipped document.
pub fn build_site(config: &SiteConfig) -> Result<BuildReport> {
    let report = SiteBuilder::new(config).build().context("Build failed")?;

    if !report.failures.is_empty() {
        tracing::warn!(
            "{} document(s) skipped because of errors:",
            report.failures.len()
        );
        for failure in &report.failures {
            tracing::warn!("  {}", failure);
        }
    }

    tracing::info!(
        "Built {} pages from {} documents in {}ms",
        report.routes,
        report.documents,
        report.duration_ms
    );
    for artifact in &report.artifacts {
        tracing::debug!("Artifact: {}", artifact.display());
    }

    Ok(report)
}

/// Run the build command.
pub async fn run(config_path: Option<&Path>, cli: CliSettings) -> Result<()> {
    tracing::info!("Building static site...");

    let config = load_config(config_path, &cli)?;
    let report = build_site(&config)?;

    tracing::info!("Output: {}", report.output_dir.display());

    Ok(())
}
