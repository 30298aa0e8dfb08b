// src/dispatch/dispatcher.rs
use crate::auth::SessionToken;
use crate::config::Config;
use crate::report::OutcomeSink;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::error;
use uuid::Uuid;

use super::request::{remove_request, restart_request, Operation};

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("error building request: {0}")]
    Build(String),

    #[error("error making request: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("error reading response body: {0}")]
    ReadBody(#[source] reqwest::Error),
}

/// Response delivered by the API, recorded as-is. A non-2xx status is
/// still a delivered response, not a request error.
#[derive(Debug)]
pub struct HttpExchange {
    pub status: StatusCode,
    pub body: String,
}

/// Terminal state of one unit of work.
#[derive(Debug)]
pub struct RequestOutcome {
    pub operation: Operation,
    pub request_id: Uuid,
    pub completed_at: DateTime<Utc>,
    pub latency_ms: u64,
    pub result: Result<HttpExchange, RequestError>,
}

impl RequestOutcome {
    pub fn is_delivered(&self) -> bool {
        self.result.is_ok()
    }
}

/// Fans restart and remove requests out against the configured targets and
/// joins on all of them. Outcomes are pushed to the sink as each unit
/// finishes and returned as one sequence once every unit is terminal.
pub struct Dispatcher {
    config: Arc<Config>,
    token: SessionToken,
    sink: Arc<dyn OutcomeSink>,
}

impl Dispatcher {
    pub fn new(config: Arc<Config>, token: SessionToken, sink: Arc<dyn OutcomeSink>) -> Self {
        Self {
            config,
            token,
            sink,
        }
    }

    /// Launch all 2xN units of work and wait for every one of them.
    ///
    /// A failing unit never cancels or delays its siblings; the returned
    /// sequence carries one terminal outcome per launched unit, in no
    /// particular order.
    pub async fn run(&self) -> Vec<RequestOutcome> {
        let repetitions = self.config.requests_per_endpoint;
        let limiter = self
            .config
            .concurrency
            .map(|cap| Arc::new(Semaphore::new(cap)));

        let mut tasks = Vec::with_capacity(2 * repetitions as usize);

        for _ in 0..repetitions {
            tasks.push(self.spawn_unit(Operation::Restart, limiter.clone()));
            tasks.push(self.spawn_unit(Operation::Remove, limiter.clone()));
        }

        let results = futures::future::join_all(tasks).await;

        let mut outcomes = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => error!("task join error: {}", e),
            }
        }

        outcomes
    }

    fn spawn_unit(
        &self,
        operation: Operation,
        limiter: Option<Arc<Semaphore>>,
    ) -> JoinHandle<RequestOutcome> {
        let config = self.config.clone();
        let token = self.token.clone();
        let sink = self.sink.clone();

        tokio::spawn(async move {
            let _permit = match limiter {
                Some(semaphore) => semaphore.acquire_owned().await.ok(),
                None => None,
            };

            let outcome = execute_unit(&config, &token, operation).await;
            sink.record(&outcome).await;
            outcome
        })
    }
}

async fn execute_unit(
    config: &Config,
    token: &SessionToken,
    operation: Operation,
) -> RequestOutcome {
    let request_id = Uuid::new_v4();
    let started = Instant::now();
    let result = send_request(config, token, operation).await;

    RequestOutcome {
        operation,
        request_id,
        completed_at: Utc::now(),
        latency_ms: started.elapsed().as_millis() as u64,
        result,
    }
}

async fn send_request(
    config: &Config,
    token: &SessionToken,
    operation: Operation,
) -> Result<HttpExchange, RequestError> {
    let spec = match operation {
        Operation::Restart => restart_request(&config.base_url, &config.targets)?,
        Operation::Remove => remove_request(&config.base_url, &config.targets)?,
    };

    // Each unit of work gets its own client.
    let client = Client::builder()
        .danger_accept_invalid_certs(config.insecure)
        .build()
        .map_err(|e| RequestError::Build(e.to_string()))?;

    let mut request = client
        .request(spec.method, spec.url)
        .bearer_auth(token.as_str());

    if let Some(body) = &spec.body {
        request = request.json(body);
    }

    let response = request.send().await.map_err(RequestError::Transport)?;
    let status = response.status();
    let body = response.text().await.map_err(RequestError::ReadBody)?;

    Ok(HttpExchange { status, body })
}
