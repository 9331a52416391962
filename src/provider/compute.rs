//! Compute Engine VM instances
//!
//! `instances.setLabels` replaces the whole label map and must carry the
//! `labelFingerprint` from the latest read, otherwise the write is rejected
//! as stale. It returns a zonal operation which we wait on.

use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::{json, Value};

use crate::error::Error;
use crate::gcp::client::GcpClient;
use crate::labels::{labels_from_json, LabelSet};

/// Pause between operation polls
const OPERATION_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Labels of an instance together with its concurrency token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceLabels {
    pub labels: LabelSet,
    pub fingerprint: String,
}

pub struct ComputeApi {
    client: GcpClient,
    operation_timeout: Duration,
}

impl ComputeApi {
    pub fn new(client: GcpClient, operation_timeout: Duration) -> Self {
        Self {
            client,
            operation_timeout,
        }
    }

    pub fn operation_timeout(&self) -> Duration {
        self.operation_timeout
    }

    pub async fn get_labels(
        &self,
        project_id: &str,
        zone: &str,
        instance_id: &str,
    ) -> Result<InstanceLabels> {
        let url = self
            .client
            .compute_zonal_url(project_id, zone, &format!("instances/{}", instance_id));
        let instance = self
            .client
            .get(&url)
            .await
            .with_context(|| format!("Reading labels of instance {}", instance_id))?;

        let fingerprint = instance
            .get("labelFingerprint")
            .and_then(|v| v.as_str())
            .with_context(|| format!("Instance {} has no labelFingerprint", instance_id))?
            .to_string();

        Ok(InstanceLabels {
            labels: labels_from_json(instance.get("labels")),
            fingerprint,
        })
    }

    /// Replace the instance's labels and block until the operation is done
    pub async fn set_labels(
        &self,
        project_id: &str,
        zone: &str,
        instance_id: &str,
        labels: &LabelSet,
    ) -> Result<()> {
        // Fingerprint must come from the read right before the write
        let current = self.get_labels(project_id, zone, instance_id).await?;

        let url = self.client.compute_zonal_url(
            project_id,
            zone,
            &format!("instances/{}/setLabels", instance_id),
        );
        let body = json!({
            "labels": labels,
            "labelFingerprint": current.fingerprint,
        });
        let operation = self
            .client
            .post(&url, Some(&body))
            .await
            .with_context(|| format!("Updating labels of instance {}", instance_id))?;

        self.wait_for_operation(project_id, zone, operation).await
    }

    async fn wait_for_operation(
        &self,
        project_id: &str,
        zone: &str,
        operation: Value,
    ) -> Result<()> {
        let name = operation
            .get("name")
            .and_then(|v| v.as_str())
            .context("setLabels returned an operation without a name")?
            .to_string();

        let wait = self.poll_until_done(project_id, zone, &name, operation);

        match tokio::time::timeout(self.operation_timeout, wait).await {
            Ok(result) => result,
            Err(_) => Err(Error::OperationTimeout {
                operation: name.clone(),
                timeout: self.operation_timeout,
            }
            .into()),
        }
    }

    async fn poll_until_done(
        &self,
        project_id: &str,
        zone: &str,
        name: &str,
        mut operation: Value,
    ) -> Result<()> {
        loop {
            if operation.get("status").and_then(|v| v.as_str()) == Some("DONE") {
                return operation_outcome(name, &operation);
            }
            tracing::debug!("Waiting on operation {}", name);
            tokio::time::sleep(OPERATION_POLL_INTERVAL).await;

            let url = self.client.compute_zonal_url(
                project_id,
                zone,
                &format!("operations/{}/wait", name),
            );
            operation = self
                .client
                .post(&url, None)
                .await
                .with_context(|| format!("Waiting on operation {}", name))?;
        }
    }
}

/// A finished operation may still carry an error payload
fn operation_outcome(name: &str, operation: &Value) -> Result<()> {
    let Some(error) = operation.get("error") else {
        return Ok(());
    };

    let message = error
        .get("errors")
        .and_then(|v| v.as_array())
        .and_then(|errors| errors.first())
        .and_then(|e| e.get("message"))
        .and_then(|v| v.as_str())
        .unwrap_or("unknown error");

    Err(anyhow::anyhow!("Operation {} failed: {}", name, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_outcome_done_without_error() {
        let op = json!({"name": "op-1", "status": "DONE"});
        assert!(operation_outcome("op-1", &op).is_ok());
    }

    #[test]
    fn test_operation_outcome_reports_first_error() {
        let op = json!({
            "name": "op-1",
            "status": "DONE",
            "error": {"errors": [{"code": "CONDITION_NOT_MET", "message": "Labels fingerprint invalid"}]}
        });
        let err = operation_outcome("op-1", &op).unwrap_err();
        assert!(err.to_string().contains("Labels fingerprint invalid"));
    }
}
