//! Asset discovery
//!
//! Lists a project's resources through Cloud Asset Inventory
//! `searchAllResources`, following `nextPageToken` until exhausted.

use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};
use crate::gcp::client::GcpClient;

/// Fields requested from the search API
const READ_MASK: &str = "name,assetType,project";

/// One search hit
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredAsset {
    /// Full resource name, e.g. `//storage.googleapis.com/my-bucket`
    pub name: String,
    pub asset_type: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchPage {
    #[serde(default)]
    results: Vec<DiscoveredAsset>,
    #[serde(default)]
    next_page_token: Option<String>,
}

fn search_url(
    client: &GcpClient,
    project_id: &str,
    asset_types: &[String],
    page_token: Option<&str>,
) -> Result<Url> {
    let mut url = Url::parse(&client.cloudasset_search_url(project_id))
        .map_err(|e| Error::Discovery(format!("invalid search URL: {}", e)))?;

    {
        let mut query = url.query_pairs_mut();
        for asset_type in asset_types {
            query.append_pair("assetTypes", asset_type);
        }
        query.append_pair("query", "*");
        query.append_pair("readMask", READ_MASK);
        if let Some(token) = page_token {
            query.append_pair("pageToken", token);
        }
    }

    Ok(url)
}

/// Search `project_id` for resources of the given types
pub async fn search_assets(
    client: &GcpClient,
    project_id: &str,
    asset_types: &[String],
) -> Result<Vec<DiscoveredAsset>> {
    let mut assets = Vec::new();
    let mut page_token: Option<String> = None;

    loop {
        let url = search_url(client, project_id, asset_types, page_token.as_deref())?;
        let response = client
            .get(url.as_str())
            .await
            .map_err(|e| Error::Discovery(format!("{:#}", e)))?;

        let page: SearchPage = if response.is_null() {
            SearchPage::default()
        } else {
            serde_json::from_value(response)
                .map_err(|e| Error::Discovery(format!("unexpected search response: {}", e)))?
        };

        tracing::debug!("Discovery page returned {} assets", page.results.len());
        assets.extend(page.results);

        match page.next_page_token {
            Some(token) if !token.is_empty() => page_token = Some(token),
            _ => break,
        }
    }

    tracing::info!("Discovered {} assets in {}", assets.len(), project_id);
    Ok(assets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gcp::auth::GcpCredentials;
    use crate::gcp::client::Endpoints;

    #[test]
    fn test_search_url_repeats_asset_types() {
        let client = GcpClient::with_credentials(
            GcpCredentials::from_token("t"),
            Endpoints::uniform("https://cloudasset.example"),
        )
        .unwrap();
        let types = vec![
            "storage.googleapis.com/Bucket".to_string(),
            "pubsub.googleapis.com/Topic".to_string(),
        ];

        let url = search_url(&client, "p1", &types, Some("tok")).unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert_eq!(url.path(), "/v1/projects/p1:searchAllResources");
        assert_eq!(pairs.iter().filter(|(k, _)| k == "assetTypes").count(), 2);
        assert!(pairs.contains(&("pageToken".to_string(), "tok".to_string())));
        assert!(pairs.contains(&("readMask".to_string(), READ_MASK.to_string())));
    }

    #[test]
    fn test_search_page_tolerates_empty_response() {
        let page: SearchPage = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(page.results.is_empty());
        assert!(page.next_page_token.is_none());
    }
}
