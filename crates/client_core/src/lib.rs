use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::{
    domain::FilterCatalog,
    error::ErrorBody,
    filters::CandidateQuery,
    protocol::{CandidateSummary, ContactCandidateRequest},
};
use tracing::{debug, warn};

pub mod config;
pub mod contact;
pub mod controller;
pub mod error;
pub mod events;

pub use config::{load_settings, ClientSettings};
pub use contact::{ContactDraft, EmployerIdentity};
pub use controller::{CandidateSearchController, SearchOutcome, SearchSnapshot, SearchTicket};
pub use error::{BackendError, ContactError};
pub use events::{ControllerEvent, Notification, NotificationContext, NotificationLevel, SearchStatus};

pub const SEARCH_CANDIDATES_PATH: &str = "employers/search-candidates";
pub const CONTACT_CANDIDATE_PATH: &str = "employers/contact-candidate";

/// Request/response contract of the alumni portal REST service.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn list_filter_values(&self, catalog: FilterCatalog) -> Result<Vec<String>, BackendError>;
    async fn search_candidates(
        &self,
        query: &CandidateQuery,
    ) -> Result<Vec<CandidateSummary>, BackendError>;
    async fn contact_candidate(&self, request: &ContactCandidateRequest) -> Result<(), BackendError>;
}

pub struct HttpSearchBackend {
    http: Client,
    api_base_url: String,
    request_timeout: Duration,
    result_limit: Option<u32>,
}

impl HttpSearchBackend {
    pub fn new(api_base_url: &str, request_timeout: Duration) -> Result<Self, BackendError> {
        let api_base_url = config::normalize_api_base_url(api_base_url)?;
        let http = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(BackendError::ClientBuild)?;
        Ok(Self {
            http,
            api_base_url,
            request_timeout,
            result_limit: None,
        })
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self, BackendError> {
        Ok(Self::new(&settings.api_base_url, settings.request_timeout())?
            .with_result_limit(settings.result_limit))
    }

    pub fn with_result_limit(mut self, result_limit: Option<u32>) -> Self {
        self.result_limit = result_limit;
        self
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }

    async fn send(&self, path: &str, request: RequestBuilder) -> Result<Vec<u8>, BackendError> {
        let response = request
            .send()
            .await
            .map_err(|err| BackendError::from_reqwest(path, self.request_timeout, err))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| BackendError::from_reqwest(path, self.request_timeout, err))?;

        if !status.is_success() {
            let detail = ErrorBody::from_bytes(&body).detail_text();
            warn!(
                endpoint = path,
                status = status.as_u16(),
                detail = detail.as_deref().unwrap_or(""),
                "portal api returned an error status"
            );
            return Err(BackendError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
                detail,
            });
        }

        Ok(body.to_vec())
    }

    fn decode<T: DeserializeOwned>(path: &str, body: &[u8]) -> Result<T, BackendError> {
        serde_json::from_slice(body).map_err(|err| BackendError::Decode {
            endpoint: path.to_string(),
            reason: err.to_string(),
        })
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn list_filter_values(&self, catalog: FilterCatalog) -> Result<Vec<String>, BackendError> {
        let path = catalog.path();
        let body = self.send(path, self.http.get(self.endpoint(path))).await?;
        Self::decode(path, &body)
    }

    async fn search_candidates(
        &self,
        query: &CandidateQuery,
    ) -> Result<Vec<CandidateSummary>, BackendError> {
        let mut request = self
            .http
            .get(self.endpoint(SEARCH_CANDIDATES_PATH))
            .query(query);
        if let Some(limit) = self.result_limit {
            request = request.query(&[("limit", limit)]);
        }
        debug!(query = %query, limit = ?self.result_limit, "GET {SEARCH_CANDIDATES_PATH}");

        let body = self.send(SEARCH_CANDIDATES_PATH, request).await?;
        Self::decode(SEARCH_CANDIDATES_PATH, &body)
    }

    async fn contact_candidate(&self, request: &ContactCandidateRequest) -> Result<(), BackendError> {
        self.send(
            CONTACT_CANDIDATE_PATH,
            self.http
                .post(self.endpoint(CONTACT_CANDIDATE_PATH))
                .json(request),
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
