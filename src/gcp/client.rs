//! GCP Client
//!
//! Main client for interacting with GCP APIs, combining authentication,
//! HTTP functionality and the per-service base URLs.

use super::auth::GcpCredentials;
use super::http::GcpHttpClient;
use anyhow::{Context, Result};
use serde_json::Value;

/// Base URLs of the services the labeler talks to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub cloudasset: String,
    pub bigquery: String,
    pub storage: String,
    pub pubsub: String,
    pub bigtableadmin: String,
    pub compute: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            cloudasset: "https://cloudasset.googleapis.com".to_string(),
            bigquery: "https://bigquery.googleapis.com".to_string(),
            storage: "https://storage.googleapis.com".to_string(),
            pubsub: "https://pubsub.googleapis.com".to_string(),
            bigtableadmin: "https://bigtableadmin.googleapis.com".to_string(),
            compute: "https://compute.googleapis.com".to_string(),
        }
    }
}

impl Endpoints {
    /// Route every service to the same host (used against mock servers)
    pub fn uniform(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_string();
        Self {
            cloudasset: base.clone(),
            bigquery: base.clone(),
            storage: base.clone(),
            pubsub: base.clone(),
            bigtableadmin: base.clone(),
            compute: base,
        }
    }
}

/// Main GCP client
#[derive(Clone)]
pub struct GcpClient {
    pub credentials: GcpCredentials,
    pub http: GcpHttpClient,
    pub endpoints: Endpoints,
}

impl GcpClient {
    /// Create a new GCP client using Application Default Credentials
    pub async fn new() -> Result<Self> {
        let credentials = GcpCredentials::new()
            .await
            .context("Failed to initialize GCP credentials")?;

        Self::with_credentials(credentials, Endpoints::default())
    }

    /// Create a client from explicit credentials and endpoints
    pub fn with_credentials(credentials: GcpCredentials, endpoints: Endpoints) -> Result<Self> {
        Ok(Self {
            credentials,
            http: GcpHttpClient::new()?,
            endpoints,
        })
    }

    /// Get the current access token
    pub async fn get_token(&self) -> Result<String> {
        self.credentials.get_token().await
    }

    /// Make a GET request to a GCP API
    pub async fn get(&self, url: &str) -> Result<Value> {
        let token = self.get_token().await?;
        self.http.get(url, &token).await
    }

    /// Make a POST request to a GCP API
    pub async fn post(&self, url: &str, body: Option<&Value>) -> Result<Value> {
        let token = self.get_token().await?;
        self.http.post(url, &token, body).await
    }

    /// Make a PATCH request to a GCP API
    pub async fn patch(&self, url: &str, body: &Value) -> Result<Value> {
        let token = self.get_token().await?;
        self.http.patch(url, &token, body).await
    }

    // =========================================================================
    // Cloud Asset Inventory
    // =========================================================================

    /// Build the searchAllResources URL for a project scope
    pub fn cloudasset_search_url(&self, project_id: &str) -> String {
        format!(
            "{}/v1/projects/{}:searchAllResources",
            self.endpoints.cloudasset, project_id
        )
    }

    // =========================================================================
    // BigQuery
    // =========================================================================

    /// Build BigQuery dataset URL
    pub fn bigquery_dataset_url(&self, project_id: &str, dataset_id: &str) -> String {
        format!(
            "{}/bigquery/v2/projects/{}/datasets/{}",
            self.endpoints.bigquery,
            project_id,
            urlencoding::encode(dataset_id)
        )
    }

    // =========================================================================
    // Cloud Storage
    // =========================================================================

    /// Build Cloud Storage bucket URL
    pub fn storage_bucket_url(&self, bucket: &str) -> String {
        format!(
            "{}/storage/v1/b/{}",
            self.endpoints.storage,
            urlencoding::encode(bucket)
        )
    }

    // =========================================================================
    // Pub/Sub
    // =========================================================================

    /// Build Pub/Sub topic URL
    pub fn pubsub_topic_url(&self, project_id: &str, topic_id: &str) -> String {
        format!(
            "{}/v1/projects/{}/topics/{}",
            self.endpoints.pubsub,
            project_id,
            urlencoding::encode(topic_id)
        )
    }

    /// Build Pub/Sub subscription URL
    pub fn pubsub_subscription_url(&self, project_id: &str, subscription_id: &str) -> String {
        format!(
            "{}/v1/projects/{}/subscriptions/{}",
            self.endpoints.pubsub,
            project_id,
            urlencoding::encode(subscription_id)
        )
    }

    // =========================================================================
    // Bigtable Admin
    // =========================================================================

    /// Build Bigtable instance URL
    pub fn bigtable_instance_url(&self, project_id: &str, instance_id: &str) -> String {
        format!(
            "{}/v2/projects/{}/instances/{}",
            self.endpoints.bigtableadmin,
            project_id,
            urlencoding::encode(instance_id)
        )
    }

    // =========================================================================
    // Compute Engine
    // =========================================================================

    /// Build zonal Compute Engine API URL
    pub fn compute_zonal_url(&self, project_id: &str, zone: &str, resource: &str) -> String {
        format!(
            "{}/compute/v1/projects/{}/zones/{}/{}",
            self.endpoints.compute, project_id, zone, resource
        )
    }
}
