//! Asset dispatch
//!
//! Picks the adapter for a discovered asset by its type tag, builds it from
//! the parsed resource name and runs the reconciliation.

use super::adapter::{
    reconcile, BigtableInstanceAdapter, BucketAdapter, ComputeInstanceAdapter, DatasetAdapter,
    LabelAdapter, SubscriptionAdapter, TopicAdapter,
};
use super::discovery::DiscoveredAsset;
use super::kind::AssetKind;
use super::name::{parse_resource_name, ResourceId};
use crate::error::Result;
use crate::labels::LabelSet;
use crate::provider::ProviderRegistry;

/// What the dispatcher decided for one asset
pub enum Dispatch<'a> {
    Adapter(Box<dyn LabelAdapter + 'a>),
    /// The type tag is not one the labeler handles
    Skipped(String),
}

/// Result of processing one asset
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetOutcome {
    Updated { asset_id: String, labels: LabelSet },
    Skipped { asset_type: String },
}

/// Routes assets to adapters for one run
pub struct Dispatcher<'a> {
    registry: &'a ProviderRegistry,
    project_id: &'a str,
    desired: &'a LabelSet,
    overwrite: bool,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        registry: &'a ProviderRegistry,
        project_id: &'a str,
        desired: &'a LabelSet,
        overwrite: bool,
    ) -> Self {
        Self {
            registry,
            project_id,
            desired,
            overwrite,
        }
    }

    /// Build the adapter for `asset`, or skip it when its type is unknown
    pub fn dispatch(&self, asset: &DiscoveredAsset) -> Result<Dispatch<'a>> {
        let Some(kind) = AssetKind::from_type_tag(&asset.asset_type) else {
            return Ok(Dispatch::Skipped(asset.asset_type.clone()));
        };

        let project_id = self.project_id.to_string();
        let registry = self.registry;

        let adapter: Box<dyn LabelAdapter + 'a> =
            match parse_resource_name(kind, &asset.name, self.project_id)? {
                ResourceId::Dataset { dataset_ref } => Box::new(DatasetAdapter {
                    api: registry.bigquery(),
                    dataset_ref,
                }),
                ResourceId::Bucket { bucket } => Box::new(BucketAdapter {
                    api: registry.storage(),
                    bucket,
                }),
                ResourceId::Topic { topic_id } => Box::new(TopicAdapter {
                    api: registry.publisher(),
                    project_id,
                    topic_id,
                }),
                ResourceId::Subscription { subscription_id } => Box::new(SubscriptionAdapter {
                    api: registry.subscriber(),
                    project_id,
                    subscription_id,
                }),
                ResourceId::BigtableInstance { instance_id } => {
                    Box::new(BigtableInstanceAdapter {
                        api: registry.bigtable(),
                        project_id,
                        instance_id,
                    })
                }
                ResourceId::ComputeInstance { zone, instance_id } => {
                    Box::new(ComputeInstanceAdapter {
                        api: registry.compute(),
                        project_id,
                        zone,
                        instance_id,
                    })
                }
            };

        Ok(Dispatch::Adapter(adapter))
    }

    /// Dispatch and reconcile one asset
    pub async fn process(&self, asset: &DiscoveredAsset) -> Result<AssetOutcome> {
        match self.dispatch(asset)? {
            Dispatch::Skipped(asset_type) => {
                tracing::warn!("Skipping {}: unsupported asset type {}", asset.name, asset_type);
                Ok(AssetOutcome::Skipped { asset_type })
            }
            Dispatch::Adapter(adapter) => {
                let labels = reconcile(adapter.as_ref(), self.desired, self.overwrite).await?;
                Ok(AssetOutcome::Updated {
                    asset_id: adapter.asset_id().to_string(),
                    labels,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::gcp::auth::GcpCredentials;
    use crate::gcp::client::{Endpoints, GcpClient};
    use crate::labels::OverwritePolicy;

    fn registry() -> ProviderRegistry {
        let client = GcpClient::with_credentials(
            GcpCredentials::from_token("t"),
            Endpoints::uniform("http://localhost:1"),
        )
        .unwrap();
        ProviderRegistry::new(client)
    }

    fn asset(name: &str, asset_type: &str) -> DiscoveredAsset {
        DiscoveredAsset {
            name: name.to_string(),
            asset_type: asset_type.to_string(),
        }
    }

    #[test]
    fn test_dispatch_builds_adapter_per_type() {
        let registry = registry();
        let desired = LabelSet::new();
        let dispatcher = Dispatcher::new(&registry, "p1", &desired, false);

        let cases = [
            (
                "//bigquery.googleapis.com/projects/p1/datasets/ds1",
                "bigquery.googleapis.com/Dataset",
                "p1.ds1",
                OverwritePolicy::Tombstone,
            ),
            (
                "//storage.googleapis.com/b1",
                "storage.googleapis.com/Bucket",
                "b1",
                OverwritePolicy::Discard,
            ),
            (
                "//pubsub.googleapis.com/projects/p1/topics/t1",
                "pubsub.googleapis.com/Topic",
                "t1",
                OverwritePolicy::ClearFirst,
            ),
            (
                "//pubsub.googleapis.com/projects/p1/subscriptions/s1",
                "pubsub.googleapis.com/Subscription",
                "s1",
                OverwritePolicy::ClearFirst,
            ),
            (
                "//bigtable.googleapis.com/projects/p1/instances/bt1",
                "bigtableadmin.googleapis.com/Instance",
                "bt1",
                OverwritePolicy::ClearFirst,
            ),
            (
                "//compute.googleapis.com/projects/p1/zones/us-east1-b/instances/vm1",
                "compute.googleapis.com/Instance",
                "vm1",
                OverwritePolicy::ClearFirst,
            ),
        ];

        for (name, asset_type, expected_id, expected_policy) in cases {
            match dispatcher.dispatch(&asset(name, asset_type)).unwrap() {
                Dispatch::Adapter(adapter) => {
                    assert_eq!(adapter.asset_id(), expected_id);
                    assert_eq!(adapter.kind().type_tag(), asset_type);
                    assert_eq!(adapter.policy(), expected_policy);
                }
                Dispatch::Skipped(_) => panic!("{asset_type} should be handled"),
            }
        }
    }

    #[test]
    fn test_unknown_type_is_skipped() {
        let registry = registry();
        let desired = LabelSet::new();
        let dispatcher = Dispatcher::new(&registry, "p1", &desired, false);

        let result = dispatcher
            .dispatch(&asset(
                "//sqladmin.googleapis.com/projects/p1/instances/db",
                "sqladmin.googleapis.com/Instance",
            ))
            .unwrap();
        assert!(matches!(result, Dispatch::Skipped(t) if t == "sqladmin.googleapis.com/Instance"));
    }

    #[test]
    fn test_malformed_name_is_parse_error() {
        let registry = registry();
        let desired = LabelSet::new();
        let dispatcher = Dispatcher::new(&registry, "p1", &desired, false);

        let result = dispatcher.dispatch(&asset(
            "//compute.googleapis.com/projects/p1/zones/us-east1-b",
            "compute.googleapis.com/Instance",
        ));
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[tokio::test]
    async fn test_process_skips_without_network() {
        let registry = registry();
        let desired = LabelSet::new();
        let dispatcher = Dispatcher::new(&registry, "p1", &desired, false);

        let outcome = dispatcher
            .process(&asset("//run.googleapis.com/x", "run.googleapis.com/Service"))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            AssetOutcome::Skipped {
                asset_type: "run.googleapis.com/Service".to_string()
            }
        );
    }
}
