// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

mod auth;
mod config;
mod dispatch;
mod report;

use crate::{
    auth::Authenticator,
    config::{CliArgs, Config},
    dispatch::Dispatcher,
    report::{summarize, LogReporter},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rust_load_generator=debug".parse()?),
        )
        .init();

    let args = CliArgs::parse();
    let config = Arc::new(Config::resolve(args).await?);

    // Authenticate once; the token is shared read-only by every unit of work
    let authenticator = Authenticator::new(config.base_url.clone(), config.insecure)?;
    let token = authenticator
        .login(&config.credentials)
        .await
        .context("error logging in")?;

    info!(
        "dispatching {}x restart and {}x remove against {} target(s) at {}",
        config.requests_per_endpoint,
        config.requests_per_endpoint,
        config.targets.len(),
        config.base_url
    );

    let dispatcher = Dispatcher::new(config, token, Arc::new(LogReporter));
    let outcomes = dispatcher.run().await;

    let summary = summarize(&outcomes);
    info!(
        "run complete: {}/{} responses received, {} requests failed",
        summary.delivered,
        summary.total(),
        summary.failed
    );

    Ok(())
}
