//! Batch orchestration
//!
//! Discovers assets, then processes them one at a time in discovery order.

use crate::asset::{search_assets, AssetOutcome, Dispatcher};
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::gcp::http::format_gcp_error;
use crate::labels::{format_labels, LabelSet};
use crate::provider::ProviderRegistry;

/// What to do when an asset fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failed asset
    #[default]
    Abort,
    /// Record the failure and move on to the next asset
    Continue,
}

/// An asset that could not be updated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFailure {
    pub name: String,
    pub message: String,
}

/// Tally of one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Ids of updated assets
    pub updated: Vec<String>,
    /// Names of assets with unsupported types
    pub skipped: Vec<String>,
    pub failed: Vec<AssetFailure>,
    /// True when the run stopped early on a failure
    pub aborted: bool,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn summary_line(&self) -> String {
        format!(
            "Summary: {} updated, {} skipped, {} failed",
            self.updated.len(),
            self.skipped.len(),
            self.failed.len()
        )
    }
}

fn processing_line(name: &str, asset_type: &str) -> String {
    format!("Processing : {}  --> {}", name, asset_type)
}

fn updated_line(asset_id: &str, labels: &LabelSet) -> String {
    format!("{} labels updated to -> {}", asset_id, format_labels(labels))
}

fn failure_message(err: &Error) -> String {
    match err {
        Error::Provider { source, .. } => format_gcp_error(source),
        other => other.to_string(),
    }
}

/// Discover and label every asset of the configured project.
///
/// Config and discovery failures return `Err`; per-asset failures are
/// recorded in the summary.
pub async fn run_batch(
    registry: &ProviderRegistry,
    settings: &Settings,
    failure_policy: FailurePolicy,
) -> Result<RunSummary> {
    tracing::info!(
        "Labeling project {} (overwrite: {})",
        settings.project_id,
        settings.overwrite_existing
    );

    let assets = search_assets(
        registry.client(),
        &settings.project_id,
        &settings.search_asset_types,
    )
    .await?;
    println!("Asset discovery completed.");

    let dispatcher = Dispatcher::new(
        registry,
        &settings.project_id,
        &settings.labels,
        settings.overwrite_existing,
    );
    let mut summary = RunSummary::default();

    for asset in &assets {
        println!("{}", processing_line(&asset.name, &asset.asset_type));

        match dispatcher.process(asset).await {
            Ok(AssetOutcome::Updated { asset_id, labels }) => {
                println!("{}", updated_line(&asset_id, &labels));
                tracing::info!("Updated {}", asset.name);
                summary.updated.push(asset_id);
            }
            Ok(AssetOutcome::Skipped { .. }) => {
                summary.skipped.push(asset.name.clone());
            }
            Err(err) => {
                let message = failure_message(&err);
                tracing::warn!("Failed to update {}: {}", asset.name, err);
                eprintln!("Failed to update {}: {}", asset.name, message);
                summary.failed.push(AssetFailure {
                    name: asset.name.clone(),
                    message,
                });

                if failure_policy == FailurePolicy::Abort {
                    summary.aborted = true;
                    break;
                }
            }
        }
    }

    if summary.aborted {
        println!("Asset label updates aborted.");
    } else {
        println!("Asset label updates completed.");
    }
    println!("{}", summary.summary_line());

    Ok(summary)
}
