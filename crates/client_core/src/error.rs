use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("invalid api base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("failed to build http client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} returned HTTP {status}")]
    Status {
        endpoint: String,
        status: u16,
        detail: Option<String>,
    },
    #[error("could not decode response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },
    #[error("{endpoint} timed out after {}s", .timeout.as_secs_f32())]
    Timeout { endpoint: String, timeout: Duration },
}

impl BackendError {
    pub(crate) fn from_reqwest(endpoint: &str, timeout: Duration, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            BackendError::Timeout {
                endpoint: endpoint.to_string(),
                timeout,
            }
        } else {
            BackendError::Transport {
                endpoint: endpoint.to_string(),
                source,
            }
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, BackendError::Timeout { .. })
    }
}

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("Please fill in subject and message")]
    MissingFields,
    #[error("failed to send contact message: {0}")]
    Backend(#[from] BackendError),
}
