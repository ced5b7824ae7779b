//! Profile-aware page fetching

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::de::DeserializeOwned;
use tracing::{debug, error, warn};

use crate::config::FETCH_TIMEOUT;
use crate::fetch::credentials::CredentialStore;
use crate::fetch::error::FetchError;
use crate::fetch::profile::detect_profile;
use crate::fetch::session::SessionRegistry;

/// Status codes treated as a successful fetch
pub const SUCCESS_STATUSES: &[u16] = &[200, 201, 202, 206, 301, 302, 307, 308];

/// Status reported when no response was received at all
pub const SERVICE_UNAVAILABLE: u16 = 503;

pub fn is_success_status(status: u16) -> bool {
    SUCCESS_STATUSES.contains(&status)
}

/// Outcome of one fetch; failures are data, never errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    url: String,
    status: u16,
    body: String,
}

impl FetchResult {
    pub fn new(url: &str, status: u16, body: String) -> Self {
        Self {
            url: url.to_string(),
            status,
            body,
        }
    }

    /// Result for a request that never got a response
    pub fn unavailable(url: &str) -> Self {
        Self::new(url, SERVICE_UNAVAILABLE, String::new())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn text(&self) -> &str {
        &self.body
    }

    pub fn status_code(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        is_success_status(self.status)
    }

    pub fn has_content(&self) -> bool {
        !self.body.is_empty()
    }

    /// Parse the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_str(&self.body)
            .map_err(|e| FetchError::InvalidResponse(format!("{}: {}", self.url, e)))
    }
}

/// Anything that can turn a URL into a [`FetchResult`]
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchResult;
}

/// HTTP fetcher routing each URL through its profile's session
pub struct Fetcher {
    sessions: SessionRegistry,
    timeout: Duration,
}

impl Fetcher {
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        Self::with_timeout(credentials, FETCH_TIMEOUT)
    }

    pub fn with_timeout(credentials: Arc<dyn CredentialStore>, timeout: Duration) -> Self {
        Self {
            sessions: SessionRegistry::new(credentials, timeout),
            timeout,
        }
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    async fn get(&self, url: &str) -> Result<(u16, String), FetchError> {
        let profile = detect_profile(url);
        let session = self.sessions.session(profile)?;
        debug!("Fetching {} with profile {}", url, profile);

        let response = session
            .client()
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| self.classify(e))?;

        Ok((status, body))
    }

    fn classify(&self, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Network(error)
        }
    }
}

#[async_trait]
impl ContentSource for Fetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        let (status, body) = match self.get(url).await {
            Ok(response) => response,
            Err(e) => {
                error!("Error fetching {}: {}", url, e);
                return FetchResult::unavailable(url);
            }
        };

        let result = FetchResult::new(url, status, body);
        if !result.is_success() {
            error!("Error fetching {}: HTTP {}", url, status);
        } else if !result.has_content() {
            warn!("Empty response from {}", url);
        }

        result
    }
}
