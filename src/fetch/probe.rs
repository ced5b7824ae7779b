//! Distfile digests and Last-Modified probing

use std::sync::Arc;
use std::time::Duration;

use blake2::Blake2b512;
use chrono::DateTime;
use reqwest::header::LAST_MODIFIED;
use serde::Serialize;
use sha2::{Digest, Sha512};
use tracing::{debug, warn};

use crate::config::HASH_CHUNK_SIZE;
use crate::fetch::error::FetchError;
use crate::fetch::memo::MemoCache;
use crate::fetch::profile::Profile;
use crate::fetch::session::{Session, SessionRegistry};

/// Digests of a downloaded artifact
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArtifactDigest {
    /// Lowercase hex BLAKE2b-512 digest (128 chars)
    pub blake2b: String,
    /// Lowercase hex SHA-512 digest (128 chars)
    pub sha512: String,
    /// Number of bytes read
    pub size: u64,
}

impl ArtifactDigest {
    /// The soft-failure value: empty digests, size 0
    pub fn is_empty(&self) -> bool {
        self.blake2b.is_empty() && self.sha512.is_empty() && self.size == 0
    }
}

/// Streams artifacts and reads their headers, memoizing per URL
pub struct ArtifactProbe {
    session: Arc<Session>,
    timeout: Duration,
    digests: MemoCache<String, ArtifactDigest>,
    dates: MemoCache<String, String>,
}

impl ArtifactProbe {
    pub fn new(sessions: &SessionRegistry) -> Result<Self, FetchError> {
        Ok(Self {
            session: sessions.session(Profile::Default)?,
            timeout: sessions.timeout(),
            digests: MemoCache::new(),
            dates: MemoCache::new(),
        })
    }

    /// Download `url` once and compute its digests and size
    ///
    /// Any failure yields an empty [`ArtifactDigest`]. Repeated calls for
    /// one URL reuse the first outcome.
    pub async fn hash_and_size(&self, url: &str) -> ArtifactDigest {
        self.digests
            .get_or_compute(url.to_string(), || async {
                self.download_digest(url).await.unwrap_or_else(|e| {
                    warn!("Failed to hash {}: {}", url, e);
                    ArtifactDigest::default()
                })
            })
            .await
    }

    async fn download_digest(&self, url: &str) -> Result<ArtifactDigest, FetchError> {
        debug!("Hashing {}", url);
        let request = self.session.client().get(url).send();
        let mut response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))??
            .error_for_status()?;

        let mut blake2b = Blake2b512::new();
        let mut sha512 = Sha512::new();
        let mut size = 0u64;

        while let Some(chunk) = tokio::time::timeout(self.timeout, response.chunk())
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))??
        {
            for slice in chunk.chunks(HASH_CHUNK_SIZE) {
                blake2b.update(slice);
                sha512.update(slice);
            }
            size += chunk.len() as u64;
        }

        Ok(ArtifactDigest {
            blake2b: format!("{:x}", blake2b.finalize()),
            sha512: format!("{:x}", sha512.finalize()),
            size,
        })
    }

    /// `Last-Modified` of `url` as `YYYYMMDD`, empty when unavailable
    pub async fn last_modified(&self, url: &str) -> String {
        self.dates
            .get_or_compute(url.to_string(), || async {
                match self.head_last_modified(url).await {
                    Ok(Some(value)) => format_http_date(&value),
                    Ok(None) => {
                        debug!("No Last-Modified header for {}", url);
                        String::new()
                    }
                    Err(e) => {
                        warn!("Failed to read Last-Modified of {}: {}", url, e);
                        String::new()
                    }
                }
            })
            .await
    }

    async fn head_last_modified(&self, url: &str) -> Result<Option<String>, FetchError> {
        let response = self
            .session
            .client()
            .head(url)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        Ok(response
            .headers()
            .get(LAST_MODIFIED)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string))
    }
}

/// Convert an RFC 2822 HTTP date to `YYYYMMDD`, empty if unparseable
pub fn format_http_date(value: &str) -> String {
    match DateTime::parse_from_rfc2822(value.trim()) {
        Ok(date) => date.format("%Y%m%d").to_string(),
        Err(e) => {
            warn!("Unparseable HTTP date {:?}: {}", value, e);
            String::new()
        }
    }
}
