// Pipeline data types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unvalidated hostname taken from a certificate subject CN
pub type RawEvent = String;

/// Normalized domain produced by the normalizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecord {
    /// ASCII form of the hostname (equal to `original_name` for accepted records)
    pub canonical_name: String,
    /// Registrable label left of the public suffix (e.g. `example`)
    pub registrable_domain: String,
    /// Public suffix (e.g. `com`, `co.uk`)
    pub suffix: String,
    /// Hostname exactly as it appeared in the certificate
    pub original_name: String,
}

/// Bucket-name hypothesis derived from a domain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProbeCandidate(String);

impl ProbeCandidate {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&DomainRecord> for ProbeCandidate {
    fn from(record: &DomainRecord) -> Self {
        Self(format!("{}.{}", record.registrable_domain, record.suffix))
    }
}

impl fmt::Display for ProbeCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProbeCandidate {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
