//! Cloud Storage buckets

use anyhow::{Context, Result};
use serde_json::{json, Map, Value};

use crate::gcp::client::GcpClient;
use crate::labels::{labels_from_json, LabelSet};

pub struct StorageApi {
    client: GcpClient,
}

impl StorageApi {
    pub fn new(client: GcpClient) -> Self {
        Self { client }
    }

    pub async fn get_labels(&self, bucket: &str) -> Result<LabelSet> {
        let url = self.client.storage_bucket_url(bucket);
        let metadata = self
            .client
            .get(&url)
            .await
            .with_context(|| format!("Reading labels of bucket {}", bucket))?;
        Ok(labels_from_json(metadata.get("labels")))
    }

    /// Leave the bucket with exactly `labels`.
    ///
    /// Bucket patches merge into the current labels, so keys the bucket
    /// carries right now but `labels` lacks are sent as `null`.
    pub async fn set_labels(&self, bucket: &str, labels: &LabelSet) -> Result<()> {
        let current = self.get_labels(bucket).await?;

        let mut body = Map::new();
        for key in current.keys().filter(|k| !labels.contains_key(*k)) {
            body.insert(key.clone(), Value::Null);
        }
        for (key, value) in labels {
            body.insert(key.clone(), Value::String(value.clone()));
        }

        let url = self.client.storage_bucket_url(bucket);
        self.client
            .patch(&url, &json!({ "labels": body }))
            .await
            .with_context(|| format!("Updating labels of bucket {}", bucket))?;
        Ok(())
    }
}
