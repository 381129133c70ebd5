use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use probebox::config::load_config;
use probebox::http_probe::prelude::*;
use probebox::runner::Runner;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_logging();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let transport = match ReqwestTransport::new(&config) {
        Ok(transport) => transport,
        Err(e) => {
            log::error!("Failed to create HTTP client: {e}");
            return ExitCode::FAILURE;
        }
    };

    let runner = Runner::new(&config, transport);
    let mut stdout = std::io::stdout().lock();

    // Probe failures are reported in the summary, never through the exit code.
    if let Err(e) = runner.run(&mut stdout).await {
        log::error!("Failed to write report: {e}");
    }

    ExitCode::SUCCESS
}
