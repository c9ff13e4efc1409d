// Public Suffix Resolution
//
// Splits a hostname into registrable label and public suffix using the
// Public Suffix List, loaded once at startup.

use super::Result;
use crate::error::PipelineError;
use publicsuffix::{List, Psl};
use std::path::Path;
use tracing::info;

/// Registrable domain / suffix pair (`example` / `com` for `shop.example.com`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainParts {
    pub domain: String,
    pub suffix: String,
}

/// Resolves hostnames against a public suffix database
pub trait SuffixResolver: Send + Sync {
    /// Returns `None` when the name has no registrable part (e.g. a bare suffix)
    fn resolve(&self, host: &str) -> Option<DomainParts>;
}

/// Public Suffix List backed resolver
pub struct SuffixDatabase {
    list: List,
}

impl SuffixDatabase {
    /// Load the list from a `public_suffix_list.dat` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| PipelineError::SuffixDatabase {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let db = Self::parse(&content).map_err(|e| match e {
            PipelineError::SuffixDatabase { reason, .. } => PipelineError::SuffixDatabase {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })?;

        info!("Loaded public suffix database from {}", path.display());
        Ok(db)
    }

    /// Parse list content already in memory
    pub fn parse(content: &str) -> Result<Self> {
        let list: List = content.parse().map_err(|e: publicsuffix::Error| {
            PipelineError::SuffixDatabase {
                path: "<memory>".to_string(),
                reason: e.to_string(),
            }
        })?;

        Ok(Self { list })
    }
}

impl SuffixResolver for SuffixDatabase {
    fn resolve(&self, host: &str) -> Option<DomainParts> {
        let host = host.trim_end_matches('.');
        let domain = self.list.domain(host.as_bytes())?;
        let suffix = std::str::from_utf8(domain.suffix().as_bytes()).ok()?;
        let full = std::str::from_utf8(domain.as_bytes()).ok()?;

        // full is "<label>.<suffix>"
        let label = full.strip_suffix(suffix)?.strip_suffix('.')?;
        if label.is_empty() {
            return None;
        }

        Some(DomainParts {
            domain: label.to_string(),
            suffix: suffix.to_string(),
        })
    }
}
