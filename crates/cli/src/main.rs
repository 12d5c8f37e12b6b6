mod args;
mod commands;
mod config;
mod output;

use std::sync::Arc;

use args::{Cli, Commands};
use clap::Parser;
use config::LogFormat;
use ingest_admin_core::{DashboardController, DashboardEvent, EventBus, HttpDocumentStore};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = config::AppConfig::from_env()
        .map_err(|e| anyhow::anyhow!("Failed to load config: {e}"))?;
    if let Some(url) = cli.url.clone() {
        config.store_url = url;
    }
    if let Some(prefix) = cli.api_prefix.clone() {
        config.api_prefix = prefix;
    }

    init_tracing(&config);
    tracing::debug!(store_url = %config.store_url, api_prefix = %config.api_prefix, "starting ingest-admin");

    let store = HttpDocumentStore::new(config.store_config())
        .map_err(|e| anyhow::anyhow!("Failed to build document store client: {e}"))?;
    let events = EventBus::new(config.event_bus_capacity);
    let dashboard = DashboardController::new(Arc::new(store), events.clone());

    let printer = tokio::spawn(print_notifications(events.subscribe()));

    let result = match cli.command {
        Commands::List { search, json } => commands::list(&dashboard, search, json).await,
        Commands::Search { term, json } => commands::list(&dashboard, Some(term), json).await,
        Commands::Upload { paths } => commands::upload(&dashboard, paths).await,
        Commands::Delete { ids } => commands::delete(&dashboard, ids).await,
    };

    // Dropping the last sender closes the stream so the printer drains and exits.
    drop(dashboard);
    drop(events);
    join_printer(printer).await;

    result
}

/// Logs go to stderr; stdout is reserved for command output.
fn init_tracing(config: &config::AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match config.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

/// Wait for the printer task. Returns whether it finished cleanly.
async fn join_printer(printer: JoinHandle<()>) -> bool {
    match printer.await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "notification printer did not finish cleanly");
            false
        }
    }
}

async fn print_notifications(mut rx: tokio::sync::broadcast::Receiver<DashboardEvent>) {
    loop {
        match rx.recv().await {
            Ok(DashboardEvent::Notification(n)) => eprintln!("{}", output::render_notification(&n)),
            Ok(DashboardEvent::CatalogRefreshed { generation, count }) => {
                tracing::debug!(generation, count, "catalog refreshed");
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "notification printer fell behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
