//! Pub/Sub topics and subscriptions
//!
//! Both resources take a field-masked patch: the body wraps the resource
//! under its own key and `updateMask` limits the write to `labels`.

use anyhow::{Context, Result};
use serde_json::json;

use crate::gcp::client::GcpClient;
use crate::labels::{labels_from_json, LabelSet};

const LABELS_MASK: &str = "labels";

pub struct PublisherApi {
    client: GcpClient,
}

impl PublisherApi {
    pub fn new(client: GcpClient) -> Self {
        Self { client }
    }

    pub async fn get_labels(&self, project_id: &str, topic_id: &str) -> Result<LabelSet> {
        let url = self.client.pubsub_topic_url(project_id, topic_id);
        let topic = self
            .client
            .get(&url)
            .await
            .with_context(|| format!("Reading labels of topic {}", topic_id))?;
        Ok(labels_from_json(topic.get("labels")))
    }

    pub async fn update_labels(
        &self,
        project_id: &str,
        topic_id: &str,
        labels: &LabelSet,
    ) -> Result<()> {
        let url = self.client.pubsub_topic_url(project_id, topic_id);
        let body = json!({
            "topic": { "labels": labels },
            "updateMask": LABELS_MASK,
        });
        self.client
            .patch(&url, &body)
            .await
            .with_context(|| format!("Updating labels of topic {}", topic_id))?;
        Ok(())
    }

    pub async fn clear_labels(&self, project_id: &str, topic_id: &str) -> Result<()> {
        self.update_labels(project_id, topic_id, &LabelSet::new())
            .await
    }
}

pub struct SubscriberApi {
    client: GcpClient,
}

impl SubscriberApi {
    pub fn new(client: GcpClient) -> Self {
        Self { client }
    }

    pub async fn get_labels(&self, project_id: &str, subscription_id: &str) -> Result<LabelSet> {
        let url = self
            .client
            .pubsub_subscription_url(project_id, subscription_id);
        let subscription = self
            .client
            .get(&url)
            .await
            .with_context(|| format!("Reading labels of subscription {}", subscription_id))?;
        Ok(labels_from_json(subscription.get("labels")))
    }

    pub async fn update_labels(
        &self,
        project_id: &str,
        subscription_id: &str,
        labels: &LabelSet,
    ) -> Result<()> {
        let url = self
            .client
            .pubsub_subscription_url(project_id, subscription_id);
        let body = json!({
            "subscription": { "labels": labels },
            "updateMask": LABELS_MASK,
        });
        self.client
            .patch(&url, &body)
            .await
            .with_context(|| format!("Updating labels of subscription {}", subscription_id))?;
        Ok(())
    }

    pub async fn clear_labels(&self, project_id: &str, subscription_id: &str) -> Result<()> {
        self.update_labels(project_id, subscription_id, &LabelSet::new())
            .await
    }
}
