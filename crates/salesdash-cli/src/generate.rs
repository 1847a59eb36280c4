//! Command handlers for the CLI.
//!
//! Both commands fetch every prospect and aggregate before producing any
//! output, so a failed fetch never leaves a partial dashboard behind.

use std::path::Path;

use anyhow::Context;
use salesdash_core::AppConfig;
use salesdash_metrics::MetricsSnapshot;
use salesdash_notion::NotionClient;

use crate::render::render_dashboard;

/// Fetch all prospects from Notion and fold them into a snapshot.
///
/// # Errors
///
/// Returns an error if the client cannot be built or any page request fails.
pub(crate) async fn collect_snapshot(config: &AppConfig) -> anyhow::Result<MetricsSnapshot> {
    let client = NotionClient::from_config(config).context("failed to build Notion client")?;

    let prospects = client
        .fetch_prospects(&config.notion_database_id)
        .await
        .with_context(|| {
            format!(
                "failed to fetch prospects from database {}",
                config.notion_database_id
            )
        })?;

    Ok(salesdash_metrics::compute(&prospects))
}

/// Build the dashboard and write it to `out`, or to the configured output
/// path when `out` is `None`. An existing file is overwritten.
///
/// # Errors
///
/// Returns an error if fetching fails, the snapshot cannot be serialized, or
/// the file cannot be written.
pub(crate) async fn run_generate(config: &AppConfig, out: Option<&Path>) -> anyhow::Result<()> {
    let snapshot = collect_snapshot(config).await?;
    let html = render_dashboard(&snapshot).context("failed to serialize KPIs for the page")?;

    let path = out.unwrap_or(&config.output_path);
    tokio::fs::write(path, html)
        .await
        .with_context(|| format!("failed to write dashboard to {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        total = snapshot.total,
        last_update = %snapshot.last_update,
        "dashboard written"
    );
    Ok(())
}

/// Print the snapshot as pretty JSON on stdout.
///
/// # Errors
///
/// Returns an error if fetching fails or the snapshot cannot be serialized.
pub(crate) async fn run_summary(config: &AppConfig) -> anyhow::Result<()> {
    let snapshot = collect_snapshot(config).await?;
    let json = serde_json::to_string_pretty(&snapshot).context("failed to serialize KPIs")?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
#[path = "generate_test.rs"]
mod tests;
