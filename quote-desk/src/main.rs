use clap::Parser;
use dotenvy::dotenv;
use quote_desk::commands::{self, Cli};
use quote_desk::config::get_configuration;
use quote_desk::AppState;
use service_core::observability::{init_tracing, shutdown_tracing};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenv().ok();
    let cli = Cli::parse();

    let configuration = get_configuration(cli.config.clone()).map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    let logging = &configuration.logging;
    init_tracing(
        "quote-desk",
        &logging.level,
        logging.format,
        logging.otlp_endpoint.as_deref(),
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {}", e))?;

    tracing::debug!(backend = %configuration.backend.url, "Configuration loaded");
    let state = AppState::new(configuration);
    let outcome = commands::run(cli.command, &state).await;

    let code = match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    };

    shutdown_tracing();
    Ok(code)
}
