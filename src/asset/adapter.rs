//! Per-type label adapters
//!
//! Each adapter binds one resource's identifiers to its provider handle and
//! exposes the same three calls: read, clear and write. [`reconcile`] drives
//! them according to the type's [`OverwritePolicy`].

use async_trait::async_trait;

use super::kind::AssetKind;
use crate::error::{Error, Result};
use crate::labels::{plan_labels, LabelSet, OverwritePolicy, WriteSet};
use crate::provider::{
    BigQueryApi, BigtableAdminApi, ComputeApi, PublisherApi, StorageApi, SubscriberApi,
};

/// Uniform label operations over one resource
#[async_trait]
pub trait LabelAdapter: Send + Sync {
    /// Identifier shown in the success line
    fn asset_id(&self) -> &str;

    fn kind(&self) -> AssetKind;

    fn policy(&self) -> OverwritePolicy {
        self.kind().overwrite_policy()
    }

    async fn read_labels(&self) -> anyhow::Result<LabelSet>;

    /// Remove every label. Only called for [`OverwritePolicy::ClearFirst`].
    async fn clear_labels(&self) -> anyhow::Result<()>;

    async fn write_labels(&self, write: &WriteSet) -> anyhow::Result<()>;
}

/// Keep typed errors (e.g. operation timeouts) raised below the adapter
fn into_asset_error(asset: &str, err: anyhow::Error) -> Error {
    match err.downcast::<Error>() {
        Ok(err) => err,
        Err(err) => Error::provider(asset, err),
    }
}

/// Bring one resource's labels in line with `desired`.
///
/// Returns the label set the resource carries afterwards.
pub async fn reconcile(
    adapter: &dyn LabelAdapter,
    desired: &LabelSet,
    overwrite: bool,
) -> Result<LabelSet> {
    let asset = adapter.asset_id();
    let policy = adapter.policy();

    let existing = if overwrite && policy == OverwritePolicy::Discard {
        None
    } else {
        let labels = adapter
            .read_labels()
            .await
            .map_err(|e| into_asset_error(asset, e))?;
        tracing::debug!("{} has {} existing labels", asset, labels.len());
        Some(labels)
    };

    let plan = plan_labels(policy, existing.as_ref(), desired, overwrite);

    if plan.clear_first {
        tracing::debug!("Clearing labels on {}", asset);
        adapter
            .clear_labels()
            .await
            .map_err(|e| into_asset_error(asset, e))?;
    }

    adapter
        .write_labels(&plan.write)
        .await
        .map_err(|e| into_asset_error(asset, e))?;

    Ok(plan.write.resulting_labels())
}

fn unsupported_clear(asset: &str) -> anyhow::Result<()> {
    Err(anyhow::anyhow!("{} has no separate clear call", asset))
}

// =============================================================================
// BigQuery
// =============================================================================

pub struct DatasetAdapter<'a> {
    pub api: &'a BigQueryApi,
    pub dataset_ref: String,
}

#[async_trait]
impl LabelAdapter for DatasetAdapter<'_> {
    fn asset_id(&self) -> &str {
        &self.dataset_ref
    }

    fn kind(&self) -> AssetKind {
        AssetKind::BigQueryDataset
    }

    async fn read_labels(&self) -> anyhow::Result<LabelSet> {
        self.api.get_labels(&self.dataset_ref).await
    }

    async fn clear_labels(&self) -> anyhow::Result<()> {
        unsupported_clear(&self.dataset_ref)
    }

    async fn write_labels(&self, write: &WriteSet) -> anyhow::Result<()> {
        self.api.patch_labels(&self.dataset_ref, write.to_json()).await
    }
}

// =============================================================================
// Cloud Storage
// =============================================================================

pub struct BucketAdapter<'a> {
    pub api: &'a StorageApi,
    pub bucket: String,
}

#[async_trait]
impl LabelAdapter for BucketAdapter<'_> {
    fn asset_id(&self) -> &str {
        &self.bucket
    }

    fn kind(&self) -> AssetKind {
        AssetKind::StorageBucket
    }

    async fn read_labels(&self) -> anyhow::Result<LabelSet> {
        self.api.get_labels(&self.bucket).await
    }

    async fn clear_labels(&self) -> anyhow::Result<()> {
        unsupported_clear(&self.bucket)
    }

    async fn write_labels(&self, write: &WriteSet) -> anyhow::Result<()> {
        self.api
            .set_labels(&self.bucket, &write.resulting_labels())
            .await
    }
}

// =============================================================================
// Pub/Sub
// =============================================================================

pub struct TopicAdapter<'a> {
    pub api: &'a PublisherApi,
    pub project_id: String,
    pub topic_id: String,
}

#[async_trait]
impl LabelAdapter for TopicAdapter<'_> {
    fn asset_id(&self) -> &str {
        &self.topic_id
    }

    fn kind(&self) -> AssetKind {
        AssetKind::PubsubTopic
    }

    async fn read_labels(&self) -> anyhow::Result<LabelSet> {
        self.api.get_labels(&self.project_id, &self.topic_id).await
    }

    async fn clear_labels(&self) -> anyhow::Result<()> {
        self.api.clear_labels(&self.project_id, &self.topic_id).await
    }

    async fn write_labels(&self, write: &WriteSet) -> anyhow::Result<()> {
        self.api
            .update_labels(&self.project_id, &self.topic_id, &write.resulting_labels())
            .await
    }
}

pub struct SubscriptionAdapter<'a> {
    pub api: &'a SubscriberApi,
    pub project_id: String,
    pub subscription_id: String,
}

#[async_trait]
impl LabelAdapter for SubscriptionAdapter<'_> {
    fn asset_id(&self) -> &str {
        &self.subscription_id
    }

    fn kind(&self) -> AssetKind {
        AssetKind::PubsubSubscription
    }

    async fn read_labels(&self) -> anyhow::Result<LabelSet> {
        self.api
            .get_labels(&self.project_id, &self.subscription_id)
            .await
    }

    async fn clear_labels(&self) -> anyhow::Result<()> {
        self.api
            .clear_labels(&self.project_id, &self.subscription_id)
            .await
    }

    async fn write_labels(&self, write: &WriteSet) -> anyhow::Result<()> {
        self.api
            .update_labels(
                &self.project_id,
                &self.subscription_id,
                &write.resulting_labels(),
            )
            .await
    }
}

// =============================================================================
// Bigtable
// =============================================================================

pub struct BigtableInstanceAdapter<'a> {
    pub api: &'a BigtableAdminApi,
    pub project_id: String,
    pub instance_id: String,
}

#[async_trait]
impl LabelAdapter for BigtableInstanceAdapter<'_> {
    fn asset_id(&self) -> &str {
        &self.instance_id
    }

    fn kind(&self) -> AssetKind {
        AssetKind::BigtableInstance
    }

    async fn read_labels(&self) -> anyhow::Result<LabelSet> {
        self.api.get_labels(&self.project_id, &self.instance_id).await
    }

    async fn clear_labels(&self) -> anyhow::Result<()> {
        self.api
            .clear_labels(&self.project_id, &self.instance_id)
            .await
    }

    async fn write_labels(&self, write: &WriteSet) -> anyhow::Result<()> {
        self.api
            .update_labels(&self.project_id, &self.instance_id, &write.resulting_labels())
            .await
    }
}

// =============================================================================
// Compute Engine
// =============================================================================

pub struct ComputeInstanceAdapter<'a> {
    pub api: &'a ComputeApi,
    pub project_id: String,
    pub zone: String,
    pub instance_id: String,
}

#[async_trait]
impl LabelAdapter for ComputeInstanceAdapter<'_> {
    fn asset_id(&self) -> &str {
        &self.instance_id
    }

    fn kind(&self) -> AssetKind {
        AssetKind::ComputeInstance
    }

    async fn read_labels(&self) -> anyhow::Result<LabelSet> {
        let current = self
            .api
            .get_labels(&self.project_id, &self.zone, &self.instance_id)
            .await?;
        Ok(current.labels)
    }

    /// Compute has no clear call; an empty `setLabels` does the job
    async fn clear_labels(&self) -> anyhow::Result<()> {
        self.api
            .set_labels(&self.project_id, &self.zone, &self.instance_id, &LabelSet::new())
            .await
    }

    async fn write_labels(&self, write: &WriteSet) -> anyhow::Result<()> {
        self.api
            .set_labels(
                &self.project_id,
                &self.zone,
                &self.instance_id,
                &write.resulting_labels(),
            )
            .await
    }
}
