//! Supported asset types
//!
//! Maps Cloud Asset Inventory type tags to the asset kinds the labeler knows
//! how to update.

use std::fmt;

use crate::labels::OverwritePolicy;

/// An asset type the labeler can update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    BigQueryDataset,
    StorageBucket,
    PubsubTopic,
    PubsubSubscription,
    BigtableInstance,
    ComputeInstance,
}

impl AssetKind {
    pub const ALL: [AssetKind; 6] = [
        AssetKind::BigQueryDataset,
        AssetKind::StorageBucket,
        AssetKind::PubsubTopic,
        AssetKind::PubsubSubscription,
        AssetKind::BigtableInstance,
        AssetKind::ComputeInstance,
    ];

    /// Look up a kind by its exact type tag
    pub fn from_type_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_tag() == tag)
    }

    /// The Cloud Asset Inventory type tag
    pub fn type_tag(self) -> &'static str {
        match self {
            AssetKind::BigQueryDataset => "bigquery.googleapis.com/Dataset",
            AssetKind::StorageBucket => "storage.googleapis.com/Bucket",
            AssetKind::PubsubTopic => "pubsub.googleapis.com/Topic",
            AssetKind::PubsubSubscription => "pubsub.googleapis.com/Subscription",
            AssetKind::BigtableInstance => "bigtableadmin.googleapis.com/Instance",
            AssetKind::ComputeInstance => "compute.googleapis.com/Instance",
        }
    }

    /// Prefix stripped from the full resource name. `$PROJECT_ID` is
    /// replaced with the active project before matching.
    pub fn name_prefix(self) -> &'static str {
        match self {
            AssetKind::BigQueryDataset => "//bigquery.googleapis.com/projects/",
            AssetKind::StorageBucket => "//storage.googleapis.com/",
            AssetKind::PubsubTopic => "//pubsub.googleapis.com/projects/$PROJECT_ID/topics/",
            AssetKind::PubsubSubscription => {
                "//pubsub.googleapis.com/projects/$PROJECT_ID/subscriptions/"
            }
            AssetKind::BigtableInstance => {
                "//bigtable.googleapis.com/projects/$PROJECT_ID/instances/"
            }
            AssetKind::ComputeInstance => "//compute.googleapis.com/projects/$PROJECT_ID/zones/",
        }
    }

    /// Overwrite behaviour of this kind's provider
    pub fn overwrite_policy(self) -> OverwritePolicy {
        match self {
            AssetKind::BigQueryDataset => OverwritePolicy::Tombstone,
            AssetKind::StorageBucket => OverwritePolicy::Discard,
            AssetKind::PubsubTopic
            | AssetKind::PubsubSubscription
            | AssetKind::BigtableInstance
            | AssetKind::ComputeInstance => OverwritePolicy::ClearFirst,
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_tag())
    }
}

/// Type tags of every supported kind, the default discovery filter
pub fn supported_type_tags() -> Vec<String> {
    AssetKind::ALL
        .iter()
        .map(|kind| kind.type_tag().to_string())
        .collect()
}
