use std::io::{self, Write};
use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::api;
use crate::config::probe_config::CORS_LABEL;
use crate::config::{AppConfig, ProbeTarget, default_plan};
use crate::http_probe::prelude::*;
use crate::report;

/// A plan step together with what happened when it ran.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeRecord {
    pub target: ProbeTarget,
    pub outcome: ProbeOutcome,
}

/// Outcomes of a run, in plan order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunSummary {
    pub records: Vec<ProbeRecord>,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.records.len()
    }

    pub fn successful_count(&self) -> usize {
        self.records.iter().filter(|r| r.outcome.success()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ProbeRecord> {
        self.records.iter().filter(|r| !r.outcome.success())
    }

    pub fn cors_supported(&self) -> bool {
        self.records
            .iter()
            .any(|r| r.target.label == CORS_LABEL && r.outcome.success())
    }

    /// The body of the first `method path` step, decoded as `T`.
    pub fn decoded_body<T: DeserializeOwned>(&self, method: &str, path: &str) -> Option<T> {
        self.records
            .iter()
            .find(|r| r.target.method == method && r.target.path == path)
            .and_then(|r| r.outcome.body())
            .and_then(api::decode)
    }
}

/// Runs a plan one step at a time and reports as it goes.
pub struct Runner<T> {
    prober: Prober<T>,
    plan: Vec<ProbeTarget>,
    timeout: Duration,
}

impl<T: Transport> Runner<T> {
    /// A runner for the default seven-step plan.
    pub fn new(config: &AppConfig, transport: T) -> Self {
        Self {
            prober: Prober::new(transport, config.base_url.as_str()),
            plan: default_plan(),
            timeout: config.timeout,
        }
    }

    pub fn with_plan(mut self, plan: Vec<ProbeTarget>) -> Self {
        self.plan = plan;
        self
    }

    pub fn prober(&self) -> &Prober<T> {
        &self.prober
    }

    /// Executes every step in order, writing progress and the final summary to `out`.
    /// Probe failures are part of the summary; only a failed write returns an error.
    pub async fn run<W: Write>(&self, out: &mut W) -> io::Result<RunSummary> {
        let base_url = self.prober.base_url();
        report::write_header(out, base_url, self.timeout)?;

        let mut summary = RunSummary {
            records: Vec::with_capacity(self.plan.len()),
        };

        for (index, target) in self.plan.iter().enumerate() {
            report::write_step(out, index + 1, target, &self.prober.url_for(&target.path))?;

            let outcome = self
                .prober
                .probe(&target.method, &target.path, target.payload.as_ref())
                .await;

            report::write_outcome(out, &outcome, self.timeout)?;
            summary.records.push(ProbeRecord {
                target: target.clone(),
                outcome,
            });
        }

        log::debug!(
            "Run finished: {}/{} probes reached the server",
            summary.successful_count(),
            summary.total()
        );

        report::write_summary(out, &summary, base_url)?;
        Ok(summary)
    }
}
