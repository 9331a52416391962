//! Bigtable instances via the Bigtable Admin API

use anyhow::{Context, Result};
use serde_json::json;

use crate::gcp::client::GcpClient;
use crate::labels::{labels_from_json, LabelSet};

pub struct BigtableAdminApi {
    client: GcpClient,
}

impl BigtableAdminApi {
    pub fn new(client: GcpClient) -> Self {
        Self { client }
    }

    pub async fn get_labels(&self, project_id: &str, instance_id: &str) -> Result<LabelSet> {
        let url = self.client.bigtable_instance_url(project_id, instance_id);
        let instance = self
            .client
            .get(&url)
            .await
            .with_context(|| format!("Reading labels of Bigtable instance {}", instance_id))?;
        Ok(labels_from_json(instance.get("labels")))
    }

    /// `partialUpdateInstance` restricted to the `labels` field
    pub async fn update_labels(
        &self,
        project_id: &str,
        instance_id: &str,
        labels: &LabelSet,
    ) -> Result<()> {
        let url = format!(
            "{}?updateMask=labels",
            self.client.bigtable_instance_url(project_id, instance_id)
        );
        self.client
            .patch(&url, &json!({ "labels": labels }))
            .await
            .with_context(|| format!("Updating labels of Bigtable instance {}", instance_id))?;
        Ok(())
    }

    pub async fn clear_labels(&self, project_id: &str, instance_id: &str) -> Result<()> {
        self.update_labels(project_id, instance_id, &LabelSet::new())
            .await
    }
}
