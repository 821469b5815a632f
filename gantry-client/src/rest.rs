//! REST session-cluster plugin
//!
//! Speaks JSON over HTTP to a cluster manager: the management endpoint
//! answers cluster lookups, and each cluster exposes a data-plane endpoint
//! that accepts job submissions. The management channel lives inside the
//! connection scope; every retrieved client gets its own channel so it can
//! outlive the scope.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use gantry_core::config::{Configuration, keys};
use gantry_core::dto::cluster::ClusterInfo;
use gantry_core::dto::job::{JobDetails, JobSpec, SubmissionReceipt};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::cluster::{ClusterClient, ClusterProvider, ConnectionScope};
use crate::error::{Result, SubmitError, TransportError};

/// Management endpoint used when the configuration sets none
const DEFAULT_ENDPOINT: &str = "http://localhost:8080";

/// Timeout applied to management and submission requests by default
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Cluster-type plugin for REST-managed session clusters
///
/// Reads `cluster.id` and `cluster.endpoint` from the configuration; the
/// identifier is the name the cluster was registered under with its manager.
#[derive(Debug, Default)]
pub struct RestClusterProvider;

impl RestClusterProvider {
    /// Creates a new REST cluster provider
    pub fn new() -> Self {
        Self
    }
}

impl ClusterProvider for RestClusterProvider {
    type Id = String;
    type Scope = RestConnectionScope;

    fn cluster_id(&self, config: &Configuration) -> Option<String> {
        config
            .get(keys::CLUSTER_ID)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    }

    fn create_scope(&self, config: &Configuration) -> Result<RestConnectionScope> {
        let endpoint = config.get(keys::CLUSTER_ENDPOINT).unwrap_or(DEFAULT_ENDPOINT);

        let request_timeout = config
            .get_parsed::<u64>(keys::REQUEST_TIMEOUT_SECS)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        RestConnectionScope::open(endpoint, request_timeout)
    }
}

/// Exclusive management-plane access for one submission
///
/// Holds the HTTP channel to the cluster manager. Dropping the scope
/// releases it; clients retrieved through the scope are unaffected.
pub struct RestConnectionScope {
    management_url: String,
    http: Client,
    request_timeout: Duration,
}

impl RestConnectionScope {
    fn open(management_url: impl Into<String>, request_timeout: Duration) -> Result<Self> {
        let management_url = management_url.into();
        let http = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| {
                SubmitError::Internal(format!("Failed to build management HTTP client: {}", e))
            })?;

        Ok(Self {
            management_url: management_url.trim_end_matches('/').to_string(),
            http,
            request_timeout,
        })
    }

    /// Base URL of the management endpoint this scope is bound to
    pub fn management_url(&self) -> &str {
        &self.management_url
    }
}

#[async_trait]
impl ConnectionScope for RestConnectionScope {
    type Id = String;

    async fn retrieve_client(
        &self,
        id: &String,
    ) -> std::result::Result<Arc<dyn ClusterClient>, TransportError> {
        let url = format!("{}/api/clusters/{}", self.management_url, id);
        debug!("Looking up cluster '{}' at {}", id, url);

        let response = self.http.get(&url).send().await?;
        let info: ClusterInfo = handle_response(response).await?;

        debug!("Cluster '{}' resolved to data plane {}", info.id, info.endpoint);

        let client = RestClusterClient::bind(&info, self.request_timeout)?;
        Ok(Arc::new(client))
    }
}

impl Drop for RestConnectionScope {
    fn drop(&mut self) {
        // The management channel closes with the scope; in-flight
        // submissions run on the client's own channel.
        debug!("Releasing management connection to {}", self.management_url);
    }
}

/// Live client bound to one REST session cluster
#[derive(Debug, Clone)]
pub struct RestClusterClient {
    cluster_id: String,
    base_url: String,
    http: Client,
}

impl RestClusterClient {
    fn bind(
        info: &ClusterInfo,
        request_timeout: Duration,
    ) -> std::result::Result<Self, TransportError> {
        let http = Client::builder().timeout(request_timeout).build()?;

        Ok(Self {
            cluster_id: info.id.clone(),
            base_url: info.endpoint.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Identifier of the cluster this client is bound to
    pub fn cluster_id(&self) -> &str {
        &self.cluster_id
    }

    /// Data-plane base URL of the cluster
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ClusterClient for RestClusterClient {
    async fn submit(
        &self,
        spec: JobSpec,
    ) -> std::result::Result<SubmissionReceipt, TransportError> {
        let url = format!("{}/api/clusters/{}/jobs", self.base_url, self.cluster_id);
        debug!("Submitting job '{}' to {}", spec.name, url);

        let response = self.http.post(&url).json(&spec).send().await?;

        handle_response(response).await
    }

    async fn job_details(
        &self,
        job_id: Uuid,
    ) -> std::result::Result<JobDetails, TransportError> {
        let url = format!(
            "{}/api/clusters/{}/jobs/{}",
            self.base_url, self.cluster_id, job_id
        );
        let response = self.http.get(&url).send().await?;

        handle_response(response).await
    }

    async fn cancel(&self, job_id: Uuid) -> std::result::Result<(), TransportError> {
        let url = format!(
            "{}/api/clusters/{}/jobs/{}/cancel",
            self.base_url, self.cluster_id, job_id
        );
        let response = self.http.post(&url).send().await?;

        handle_empty_response(response).await
    }
}

/// Handle an API response and deserialize JSON
///
/// Checks the status code and returns an appropriate error if the request
/// failed, or deserializes the response body if successful.
async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> std::result::Result<T, TransportError> {
    let status = response.status();

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(TransportError::api(status.as_u16(), error_text));
    }

    response
        .json()
        .await
        .map_err(|e| TransportError::Parse(format!("Failed to parse JSON response: {}", e)))
}

/// Handle an API response that returns no content
async fn handle_empty_response(
    response: reqwest::Response,
) -> std::result::Result<(), TransportError> {
    let status = response.status();

    if !status.is_success() {
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(TransportError::api(status.as_u16(), error_text));
    }

    Ok(())
}
