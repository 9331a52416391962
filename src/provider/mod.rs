//! Provider API handles
//!
//! One handle per Google Cloud service, each wrapping the read and write
//! calls for labels on that service's resources. Handles are created lazily
//! by [`ProviderRegistry`] the first time an asset of that type shows up and
//! are reused for every later asset of the same type.
//!
//! # Module Structure
//!
//! - [`bigquery`] - BigQuery datasets
//! - [`storage`] - Cloud Storage buckets
//! - [`pubsub`] - Pub/Sub topics and subscriptions
//! - [`bigtable`] - Bigtable instances
//! - [`compute`] - Compute Engine VM instances

pub mod bigquery;
pub mod bigtable;
pub mod compute;
pub mod pubsub;
pub mod storage;

use std::sync::OnceLock;
use std::time::Duration;

use crate::gcp::client::GcpClient;

pub use bigquery::BigQueryApi;
pub use bigtable::BigtableAdminApi;
pub use compute::ComputeApi;
pub use pubsub::{PublisherApi, SubscriberApi};
pub use storage::StorageApi;

/// How long a compute label write may take to complete
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Process-wide set of provider handles for one run
pub struct ProviderRegistry {
    client: GcpClient,
    operation_timeout: Duration,
    bigquery: OnceLock<BigQueryApi>,
    storage: OnceLock<StorageApi>,
    publisher: OnceLock<PublisherApi>,
    subscriber: OnceLock<SubscriberApi>,
    bigtable: OnceLock<BigtableAdminApi>,
    compute: OnceLock<ComputeApi>,
}

impl ProviderRegistry {
    pub fn new(client: GcpClient) -> Self {
        Self {
            client,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
            bigquery: OnceLock::new(),
            storage: OnceLock::new(),
            publisher: OnceLock::new(),
            subscriber: OnceLock::new(),
            bigtable: OnceLock::new(),
            compute: OnceLock::new(),
        }
    }

    /// Override the bound on compute operation waits
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// The underlying client, shared by discovery and every handle
    pub fn client(&self) -> &GcpClient {
        &self.client
    }

    pub fn bigquery(&self) -> &BigQueryApi {
        self.bigquery.get_or_init(|| {
            tracing::debug!("Creating BigQuery handle");
            BigQueryApi::new(self.client.clone())
        })
    }

    pub fn storage(&self) -> &StorageApi {
        self.storage.get_or_init(|| {
            tracing::debug!("Creating Cloud Storage handle");
            StorageApi::new(self.client.clone())
        })
    }

    pub fn publisher(&self) -> &PublisherApi {
        self.publisher.get_or_init(|| {
            tracing::debug!("Creating Pub/Sub publisher handle");
            PublisherApi::new(self.client.clone())
        })
    }

    pub fn subscriber(&self) -> &SubscriberApi {
        self.subscriber.get_or_init(|| {
            tracing::debug!("Creating Pub/Sub subscriber handle");
            SubscriberApi::new(self.client.clone())
        })
    }

    pub fn bigtable(&self) -> &BigtableAdminApi {
        self.bigtable.get_or_init(|| {
            tracing::debug!("Creating Bigtable admin handle");
            BigtableAdminApi::new(self.client.clone())
        })
    }

    pub fn compute(&self) -> &ComputeApi {
        self.compute.get_or_init(|| {
            tracing::debug!("Creating Compute Engine handle");
            ComputeApi::new(self.client.clone(), self.operation_timeout)
        })
    }
}
