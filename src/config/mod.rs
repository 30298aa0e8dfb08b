// src/config/mod.rs
mod models;

pub use models::*;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use url::Url;

/// Command-line surface of the load generator.
#[derive(Parser, Debug, Clone)]
#[command(name = "rust-load-generator")]
#[command(about = "Stress a management API with concurrent restart and remove computer requests")]
pub struct CliArgs {
    /// The id of the computer to target. Ignored if --ids is provided
    #[arg(long)]
    pub id: Option<u64>,

    /// The ids of the computers to target (repeatable)
    #[arg(long)]
    pub ids: Vec<u64>,

    /// The amount of requests to make to both the restart and remove computer(s) endpoints
    #[arg(short = 'r', long)]
    pub requests: Option<u32>,

    /// Base URL of the management API
    #[arg(long)]
    pub base_url: Option<Url>,

    /// Login email
    #[arg(long)]
    pub email: Option<String>,

    /// Login password
    #[arg(long)]
    pub password: Option<String>,

    /// Account to authenticate against
    #[arg(long)]
    pub account: Option<String>,

    /// Accept invalid TLS certificates. Only use against test deployments
    #[arg(long)]
    pub insecure: bool,

    /// Cap on in-flight requests (unbounded when omitted)
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Path to a YAML or JSON config file. Flags override file values
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Resolve the effective configuration from CLI flags, the optional
    /// config file, and built-in defaults, in that order of precedence.
    pub async fn resolve(args: CliArgs) -> Result<Config> {
        let file = match &args.config {
            Some(path) => load_file_config(path).await?,
            None => FileConfig::default(),
        };

        let base_url = match args.base_url.or(file.base_url) {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL).context("invalid default base url")?,
        };

        let credentials = Credentials {
            email: args
                .email
                .or(file.email)
                .unwrap_or_else(|| DEFAULT_EMAIL.to_string()),
            password: args
                .password
                .or(file.password)
                .unwrap_or_else(|| DEFAULT_PASSWORD.to_string()),
            account: args
                .account
                .or(file.account)
                .unwrap_or_else(|| DEFAULT_ACCOUNT.to_string()),
        };

        let ids = if !args.ids.is_empty() {
            args.ids
        } else if let Some(id) = args.id {
            vec![id]
        } else {
            file.targets.unwrap_or_default()
        };
        let targets = TargetSet::new(ids)?;

        let config = Config {
            base_url,
            credentials,
            targets,
            requests_per_endpoint: args
                .requests
                .or(file.requests_per_endpoint)
                .unwrap_or(DEFAULT_REQUESTS_PER_ENDPOINT),
            insecure: args.insecure || file.insecure.unwrap_or(false),
            concurrency: args.concurrency.or(file.concurrency),
        };

        config.validate()?;
        Ok(config)
    }
}

/// Load the optional config file (YAML or JSON, by extension)
pub async fn load_file_config<P: AsRef<Path>>(path: P) -> Result<FileConfig> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .context("Failed to read config file")?;

    parse_file_config(path, &contents)
}

fn parse_file_config(path: &Path, contents: &str) -> Result<FileConfig> {
    let extension = path.extension().and_then(|s| s.to_str());

    if extension == Some("yaml") || extension == Some("yml") {
        serde_yaml::from_str(contents).context("Failed to parse YAML config")
    } else {
        serde_json::from_str(contents).context("Failed to parse JSON config")
    }
}
