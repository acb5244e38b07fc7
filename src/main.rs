// src/main.rs - Standalone host for the data exporter
use clap::Parser;
use std::sync::Arc;
use tokio::time::MissedTickBehavior;

use krusty_exportdata::config::{self, SourceConfig};
use krusty_exportdata::exporter::Exporter;
use krusty_exportdata::snapshot::{IdleProvider, JsonFileProvider, PrinterStateProvider};

#[derive(Debug, Parser)]
#[command(name = "exportdata-host", version, about = "Export printer temperature and status to text files")]
struct Cli {
    /// Settings file, re-read periodically to pick up changes
    #[arg(default_value = "exportdata.toml")]
    config: String,

    /// Maximum log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,
}

fn build_provider(source: &SourceConfig) -> Arc<dyn PrinterStateProvider> {
    if source.status_json.is_none() && source.temperatures_json.is_none() {
        tracing::warn!("No snapshot source configured, exporting empty data");
        return Arc::new(IdleProvider);
    }
    Arc::new(JsonFileProvider::new(
        source.status_json.clone(),
        source.temperatures_json.clone(),
    ))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .init();

    tracing::info!("Starting export data host");
    tracing::info!("Loading configuration from: {}", cli.config);

    let config = config::load_config(&cli.config).map_err(|e| {
        tracing::error!("Failed to load config from '{}': {}", cli.config, e);
        Box::new(e) as Box<dyn std::error::Error + Send + Sync + 'static>
    })?;

    let provider = build_provider(&config.source);
    let mut exporter = Exporter::with_interval(provider, config.refresh.interval());
    exporter.on_startup(config.export.clone()).await;

    let mut reload = tokio::time::interval(config.refresh.reload());
    reload.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately; startup already applied it.
    reload.tick().await;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
            _ = reload.tick() => {
                // Failures are logged by load_config; keep the current settings.
                if let Ok(updated) = config::load_config(&cli.config) {
                    let export = updated.export;
                    exporter
                        .on_settings_changed(export.folder, export.temperature_file, export.status_file)
                        .await;
                }
            }
        }
    }

    exporter.shutdown().await;
    Ok(())
}
