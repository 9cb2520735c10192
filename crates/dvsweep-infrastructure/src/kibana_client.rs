//! Kibana saved-objects API client.

use async_trait::async_trait;
use dvsweep_core::config::{FIND_PAGE_SIZE, KibanaConfig};
use dvsweep_core::error::{Result, SweepError};
use dvsweep_core::gateway::{DeleteOutcome, SavedObjectGateway};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const SAVED_OBJECT_TYPE: &str = "index-pattern";

/// Gateway implementation over the Kibana saved-objects HTTP API.
pub struct KibanaClient {
    client: Client,
    base_url: String,
    api_token: Option<String>,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct FindResponse {
    #[serde(default)]
    saved_objects: Vec<Value>,
}

impl KibanaClient {
    /// Creates a client for one Kibana instance. `timeout` bounds every
    /// individual request.
    pub fn new(config: &KibanaConfig, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            timeout,
        }
    }

    fn saved_objects_url(&self, space_id: &str, suffix: &str) -> String {
        format!(
            "{}/s/{}/api/saved_objects{}",
            self.base_url, space_id, suffix
        )
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }
}

#[async_trait]
impl SavedObjectGateway for KibanaClient {
    async fn find_index_patterns(&self, space_id: &str) -> Result<Vec<Value>> {
        let url = self.saved_objects_url(space_id, "/_find");
        let per_page = FIND_PAGE_SIZE.to_string();
        let request = self
            .client
            .get(&url)
            .query(&[("type", SAVED_OBJECT_TYPE), ("per_page", per_page.as_str())])
            .timeout(self.timeout);

        let response = self.authorize(request).send().await.map_err(|e| {
            SweepError::retrieval(format!("data view fetch for space '{}' failed: {}", space_id, e))
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SweepError::retrieval(format!(
                "data view fetch for space '{}' returned {}",
                space_id, status
            )));
        }

        let body: FindResponse = response.json().await.map_err(|e| {
            SweepError::retrieval(format!(
                "data view fetch for space '{}' returned an unreadable body: {}",
                space_id, e
            ))
        })?;

        tracing::debug!(
            space = space_id,
            count = body.saved_objects.len(),
            "fetched index-pattern saved objects"
        );
        Ok(body.saved_objects)
    }

    async fn delete_index_pattern(&self, space_id: &str, id: &str) -> Result<DeleteOutcome> {
        let url = self.saved_objects_url(space_id, &format!("/{}/{}", SAVED_OBJECT_TYPE, id));
        let request = self
            .client
            .delete(&url)
            .header("kbn-xsrf", "true")
            .timeout(self.timeout);

        let response = self.authorize(request).send().await.map_err(|e| {
            SweepError::deletion(id, format!("delete request failed: {}", e))
        })?;

        match response.status() {
            StatusCode::OK | StatusCode::ACCEPTED | StatusCode::NO_CONTENT => {
                Ok(DeleteOutcome::Deleted)
            }
            StatusCode::NOT_FOUND => Ok(DeleteOutcome::AlreadyGone),
            status => {
                let detail = response.text().await.unwrap_or_default();
                Err(SweepError::deletion(
                    id,
                    format!("delete returned {}: {}", status, detail),
                ))
            }
        }
    }
}
