//! Console rendering for a run. Nothing in here talks to the network.

use std::io::{self, Write};
use std::time::Duration;

use unicode_truncate::UnicodeTruncateStr;

use crate::api::{self, ApiErrorBody, ExamplesResponse, HealthResponse, StickerResponse, TestResponse};
use crate::config::ProbeTarget;
use crate::config::probe_config::{EXAMPLES_PATH, GENERATE_STICKER_PATH, HEALTH_PATH, TEST_PATH};
use crate::http_probe::prelude::*;
use crate::runner::RunSummary;

/// Timeout client apps should use; sticker generation alone can take close to half a minute.
pub const RECOMMENDED_CLIENT_TIMEOUT_SECONDS: u64 = 120;

const LABEL_WIDTH: usize = 20;
const RULE_WIDTH: usize = 50;

fn to_fixed_width(input: &str, width: usize) -> String {
    let (truncated, _) = input.unicode_truncate(width);
    format!("{:<width$}", truncated, width = width)
}

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

fn marker(ok: bool) -> &'static str {
    if ok { "✅" } else { "❌" }
}

pub fn write_header(out: &mut impl Write, base_url: &str, timeout: Duration) -> io::Result<()> {
    writeln!(out, "🚀 Sticker generation server connectivity check")?;
    writeln!(out, "🌐 Server URL: {base_url}")?;
    writeln!(out, "⏰ Timeout: {}s", timeout.as_secs())?;
    writeln!(out, "{}", rule())
}

pub fn write_step(out: &mut impl Write, number: usize, target: &ProbeTarget, url: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{number}. {}", target.label)?;
    writeln!(out, "🔍 Testing {} {url}", target.method)
}

pub fn write_outcome(out: &mut impl Write, outcome: &ProbeOutcome, timeout: Duration) -> io::Result<()> {
    match outcome {
        ProbeOutcome::Reached(response) => {
            writeln!(out, "✅ Status: {}", response.status_code)?;
            writeln!(out, "⏱️ Response time: {:.2}s", response.elapsed.as_secs_f64())
        }
        ProbeOutcome::Failed(ProbeError::Timeout) => {
            writeln!(out, "❌ Timeout after {}s", timeout.as_secs())
        }
        ProbeOutcome::Failed(err @ ProbeError::Connection(_)) => writeln!(out, "❌ {err}"),
        ProbeOutcome::Failed(err) => writeln!(out, "❌ Error: {err}"),
    }
}

pub fn write_summary(out: &mut impl Write, summary: &RunSummary, base_url: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", rule())?;
    writeln!(out, "📊 SUMMARY")?;
    writeln!(out, "{}", rule())?;

    for record in &summary.records {
        let outcome = &record.outcome;
        let status = outcome
            .status_code()
            .map(|code| code.to_string())
            .unwrap_or_else(|| "N/A".to_string());

        writeln!(
            out,
            "{} {} | Status: {} | Time: {:.2}s",
            marker(outcome.success()),
            to_fixed_width(&record.target.label, LABEL_WIDTH),
            status,
            outcome.elapsed_seconds().unwrap_or(0.0)
        )?;

        match outcome {
            ProbeOutcome::Failed(err) => writeln!(out, "   Error: {err}")?,
            ProbeOutcome::Reached(response) => {
                if let Some(message) = server_error_message(response) {
                    writeln!(out, "   Server said: {message}")?;
                }
            }
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "📈 Successful tests: {}/{}",
        summary.successful_count(),
        summary.total()
    )?;

    write_advice(out, summary, base_url)?;
    write_client_notes(out, summary, base_url)
}

fn server_error_message(response: &ProbeResponse) -> Option<String> {
    if response.is_healthy() {
        return None;
    }
    let body: ApiErrorBody = api::decode(response.body.as_ref()?)?;
    body.message().map(str::to_string)
}

fn write_advice(out: &mut impl Write, summary: &RunSummary, base_url: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "💡 RECOMMENDATIONS:")?;

    let successful = summary.successful_count();
    if successful == 0 {
        writeln!(out, "❌ The server is unreachable. Check that:")?;
        writeln!(out, "   - the server is running at {base_url}")?;
        writeln!(out, "   - the server is reachable from your network")?;
        writeln!(out, "   - no firewall is blocking the connection")
    } else if successful < summary.total() {
        writeln!(out, "⚠️ Some endpoints are unavailable:")?;
        for record in summary.failures() {
            let error = record
                .outcome
                .error()
                .map(ToString::to_string)
                .unwrap_or_default();
            writeln!(out, "   - {}: {error}", record.target.label)?;
        }
        Ok(())
    } else {
        writeln!(out, "✅ All tests passed!")?;
        writeln!(out, "   - The server is reachable and responding")?;
        writeln!(out, "   - It can be used for sticker generation")
    }
}

fn write_client_notes(out: &mut impl Write, summary: &RunSummary, base_url: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "📱 CLIENT NOTES:")?;
    writeln!(out, "   - Base URL: \"{base_url}\"")?;
    writeln!(
        out,
        "   - Recommended timeout: {RECOMMENDED_CLIENT_TIMEOUT_SECONDS} seconds"
    )?;
    writeln!(out, "   - CORS supported: {}", marker(summary.cors_supported()))?;

    if let Some(health) = summary.decoded_body::<HealthResponse>("GET", HEALTH_PATH) {
        match health.version {
            Some(version) => writeln!(out, "   - Server health: {} (version {version})", health.status)?,
            None => writeln!(out, "   - Server health: {}", health.status)?,
        }
    }

    if let Some(cors) = summary
        .decoded_body::<TestResponse>("GET", TEST_PATH)
        .and_then(|test| test.cors)
    {
        writeln!(out, "   - Server CORS policy: {cors}")?;
    }

    if let Some(examples) = summary.decoded_body::<ExamplesResponse>("GET", EXAMPLES_PATH) {
        writeln!(
            out,
            "   - Examples available: {} textual, {} visual",
            examples.textual_examples.len(),
            examples.visual_examples.len()
        )?;
    }

    if let Some(sticker) = summary.decoded_body::<StickerResponse>("POST", GENERATE_STICKER_PATH) {
        if let Some(url) = sticker.image_url {
            match sticker.generation_time {
                Some(seconds) => writeln!(out, "   - Sample sticker: {url} (generated in {seconds:.1}s)")?,
                None => writeln!(out, "   - Sample sticker: {url}")?,
            }
        }
    }

    Ok(())
}
