//! netcheck — ask about your network in plain language
//!
//! Each request goes to a local language model, which picks one of the
//! diagnostics (`ping_test` or `gateway_ping_test`); the diagnostic runs and
//! its narrative is printed back.

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use netcheck_assistant::{config, llm, repl, router};
use netcheck_tools::NetworkDiagnostics;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let path = config::config_path();
    let config = config::load_config_from(&path)?;

    init_tracing(&config.system.log_level)?;
    info!("netcheck assistant starting...");

    if path.exists() {
        info!(path = %path.display(), "Loaded configuration");
    } else {
        warn!(path = %path.display(), "Config file not found, using defaults");
    }

    let model = llm::OllamaClient::new(&config.model)?;
    info!(
        base_url = %config.model.base_url,
        model = %config.model.model,
        "Using language model"
    );

    let diagnostics = NetworkDiagnostics::new(&config.diagnostics);
    let router = router::IntentRouter::new(Box::new(model), diagnostics);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    repl::run(&router, stdin, std::io::stdout()).await
}

/// Logs go to stderr; stdout carries the conversation.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .context("Invalid log level")?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}
