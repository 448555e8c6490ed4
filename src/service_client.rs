//! HTTP client for the reporting platform.

use std::time::Duration;

use tracing::{debug, error};

use crate::api_contracts::ApiResponse;
use crate::error::UploadError;
use crate::record::Record;

/// API client that posts record batches to named platform services.
pub struct ServiceClient {
    base_url: String,
    access_token: String,
    client: reqwest::Client,
}

impl ServiceClient {
    /// Create a client with the default 60 second timeout.
    pub fn new(base_url: String, access_token: String) -> Self {
        Self::with_timeout(base_url, access_token, Duration::from_secs(60))
    }

    /// Create a client with an explicit request timeout.
    ///
    /// Includes the crate version in the User-Agent header for tracking.
    pub fn with_timeout(base_url: String, access_token: String, timeout: Duration) -> Self {
        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("BatchUploader/{}", version);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(&user_agent)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url,
            access_token,
            client,
        }
    }

    /// URL for a named service endpoint.
    fn service_url(&self, service_name: &str) -> String {
        format!("{}/api/{}", self.base_url, service_name)
    }

    /// Post one batch to the named service and decode the response envelope.
    ///
    /// The body is always a JSON array, even for a single record — the
    /// platform rejects a bare object.
    pub async fn post(
        &self,
        service_name: &str,
        batch: &[Record],
    ) -> Result<ApiResponse, UploadError> {
        let url = self.service_url(service_name);
        debug!(service = service_name, records = batch.len(), %url, "posting batch");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&batch)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(service = service_name, %status, "service rejected batch: {}", body);
            return Err(UploadError::Service { status, body });
        }

        let envelope: ApiResponse = response.json().await?;
        Ok(envelope)
    }
}
