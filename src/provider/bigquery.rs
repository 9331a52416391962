//! BigQuery datasets
//!
//! `datasets.patch` treats a `null` label value as "delete this key", so a
//! single patch can both set and remove labels.

use anyhow::{Context, Result};
use serde_json::{json, Value};

use crate::gcp::client::GcpClient;
use crate::labels::{labels_from_json, LabelSet};

pub struct BigQueryApi {
    client: GcpClient,
}

impl BigQueryApi {
    pub fn new(client: GcpClient) -> Self {
        Self { client }
    }

    /// Split a `project.dataset` reference. Dataset ids never contain a
    /// dot but domain-scoped project ids do.
    fn dataset_url(&self, dataset_ref: &str) -> Result<String> {
        let (project, dataset) = dataset_ref
            .rsplit_once('.')
            .with_context(|| format!("Invalid dataset reference: {}", dataset_ref))?;
        Ok(self.client.bigquery_dataset_url(project, dataset))
    }

    pub async fn get_labels(&self, dataset_ref: &str) -> Result<LabelSet> {
        let url = self.dataset_url(dataset_ref)?;
        let dataset = self
            .client
            .get(&url)
            .await
            .with_context(|| format!("Reading labels of dataset {}", dataset_ref))?;
        Ok(labels_from_json(dataset.get("labels")))
    }

    /// Patch the dataset's labels; `labels` may hold `null` tombstones
    pub async fn patch_labels(&self, dataset_ref: &str, labels: Value) -> Result<()> {
        let url = self.dataset_url(dataset_ref)?;
        self.client
            .patch(&url, &json!({ "labels": labels }))
            .await
            .with_context(|| format!("Updating labels of dataset {}", dataset_ref))?;
        Ok(())
    }
}
