// src/config/models.rs
use anyhow::{bail, Result};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:9091";
pub const DEFAULT_EMAIL: &str = "john@example.com";
pub const DEFAULT_PASSWORD: &str = "pwd";
pub const DEFAULT_ACCOUNT: &str = "onward";
pub const DEFAULT_REQUESTS_PER_ENDPOINT: u32 = 10;

/// Immutable run configuration, resolved once at startup and shared
/// read-only with every unit of work.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: Url,
    pub credentials: Credentials,
    pub targets: TargetSet,
    pub requests_per_endpoint: u32,
    /// Accept invalid TLS certificates on every constructed client.
    /// Opt-in only.
    pub insecure: bool,
    /// Cap on in-flight requests. `None` launches everything at once.
    pub concurrency: Option<usize>,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.requests_per_endpoint < 1 {
            bail!("requests per endpoint must be at least 1");
        }

        if self.concurrency == Some(0) {
            bail!("concurrency cap must be at least 1 when set");
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub account: String,
}

/// Ordered, non-empty set of computer ids addressed by a run.
/// Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSet(Vec<u64>);

impl TargetSet {
    pub fn new(ids: Vec<u64>) -> Result<Self> {
        if ids.is_empty() {
            bail!("no computer ID(s) provided");
        }

        if ids.contains(&0) {
            bail!("computer ids must be positive");
        }

        Ok(Self(ids))
    }

    pub fn ids(&self) -> &[u64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The sole id when exactly one computer is targeted.
    pub fn single(&self) -> Option<u64> {
        match self.0.as_slice() {
            [id] => Some(*id),
            _ => None,
        }
    }
}

/// Optional on-disk configuration. Every field may be omitted; CLI flags
/// take precedence over anything set here.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub base_url: Option<Url>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub account: Option<String>,
    pub targets: Option<Vec<u64>>,
    pub requests_per_endpoint: Option<u32>,
    pub insecure: Option<bool>,
    pub concurrency: Option<usize>,
}
