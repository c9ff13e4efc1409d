// Bucket Probe - Checks whether a candidate name exists as a storage bucket
//
// The checker only depends on the BucketProbe trait; S3Probe is the HTTP
// implementation used by the binary.

use super::Result;
use crate::error::PipelineError;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Default S3 endpoint (path-style requests)
pub const DEFAULT_S3_ENDPOINT: &str = "https://s3.amazonaws.com";

/// Default per-request timeout
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Positive probe classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Finding {
    /// Bucket exists and is listable anonymously
    Public,
    /// Bucket exists but access is denied
    Protected,
    /// Bucket exists in another region
    OtherRegion,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Finding::Public => "PUBLIC",
            Finding::Protected => "FORBIDDEN",
            Finding::OtherRegion => "REDIRECT",
        };
        f.write_str(label)
    }
}

/// A bucket existence check
#[async_trait]
pub trait BucketProbe: Send + Sync {
    /// Probe one candidate. An empty vector means nothing was found.
    async fn probe(&self, candidate: &str) -> Result<Vec<Finding>>;
}

/// Map an S3 response status to a finding.
///
/// `Ok(None)` means the bucket does not exist; unexpected statuses are errors.
pub fn classify_status(status: StatusCode) -> std::result::Result<Option<Finding>, StatusCode> {
    match status {
        StatusCode::OK => Ok(Some(Finding::Public)),
        StatusCode::FORBIDDEN => Ok(Some(Finding::Protected)),
        StatusCode::MOVED_PERMANENTLY | StatusCode::TEMPORARY_REDIRECT => {
            Ok(Some(Finding::OtherRegion))
        }
        StatusCode::NOT_FOUND => Ok(None),
        other => Err(other),
    }
}

/// HTTP probe against an S3-compatible endpoint
pub struct S3Probe {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl S3Probe {
    /// Create a probe for `endpoint` (e.g. `https://s3.amazonaws.com`)
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        url::Url::parse(endpoint)?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn bucket_url(&self, candidate: &str) -> String {
        format!("{}/{}", self.endpoint, candidate)
    }
}

#[async_trait]
impl BucketProbe for S3Probe {
    async fn probe(&self, candidate: &str) -> Result<Vec<Finding>> {
        let url = self.bucket_url(candidate);
        let response = self.client.head(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                PipelineError::Timeout {
                    duration: self.timeout,
                }
            } else {
                PipelineError::RequestError(e)
            }
        })?;
        let status = response.status();

        debug!("HEAD {} -> {}", url, status);

        match classify_status(status) {
            Ok(Some(finding)) => Ok(vec![finding]),
            Ok(None) => Ok(Vec::new()),
            Err(status) => Err(PipelineError::Probe {
                candidate: candidate.to_string(),
                details: format!("unexpected status {}", status),
            }),
        }
    }
}
