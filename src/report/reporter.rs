// src/report/reporter.rs
use crate::dispatch::RequestOutcome;
use async_trait::async_trait;
use tracing::{info, warn};

/// Side-effecting sink for completed units of work. Purely observational:
/// nothing recorded here feeds back into dispatch.
#[async_trait]
pub trait OutcomeSink: Send + Sync {
    async fn record(&self, outcome: &RequestOutcome);
}

/// Production sink: one log line per outcome. Delivered responses are
/// logged with status and body regardless of status class.
pub struct LogReporter;

#[async_trait]
impl OutcomeSink for LogReporter {
    async fn record(&self, outcome: &RequestOutcome) {
        match &outcome.result {
            Ok(exchange) => info!(
                request_id = %outcome.request_id,
                status = exchange.status.as_u16(),
                latency_ms = outcome.latency_ms,
                "{} response: {}",
                outcome.operation.name(),
                exchange.body
            ),
            Err(error) => warn!(
                request_id = %outcome.request_id,
                latency_ms = outcome.latency_ms,
                "{} request failed: {}",
                outcome.operation.name(),
                error
            ),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub delivered: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.delivered + self.failed
    }
}

/// Tally delivered responses against transport-level failures, after the
/// join barrier. Status codes are not inspected.
pub fn summarize(outcomes: &[RequestOutcome]) -> RunSummary {
    let mut summary = RunSummary::default();

    for outcome in outcomes {
        if outcome.is_delivered() {
            summary.delivered += 1;
        } else {
            summary.failed += 1;
        }
    }

    summary
}
