//! PulseDB Server - Prometheus remote read/write endpoint

mod api;
mod config;
mod protocol;

use api::AppState;
use config::Config;
use pulsedb_core::storage::{MemoryStorage, Storage};
use pulsedb_core::wal::{system_clock, WalConfig, WalReader, WalWriter};
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{info, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    let config = Config::from_env()?;
    info!(?config, "starting pulsedb server");

    std::fs::create_dir_all(&config.partitions_path)?;

    let storage = Arc::new(MemoryStorage::new());
    let wal = Arc::new(WalWriter::new(
        WalConfig {
            dir: config.partitions_path.clone(),
            partition_size_secs: config.partition_size_secs,
        },
        system_clock(),
    ));

    // Replay the WAL into storage before the ingress endpoint opens
    let entries = WalReader::new(wal.clone()).replay()?;
    let replayed = entries.len();
    for entry in entries {
        storage.write_many(entry.time_series);
    }
    info!(
        entries = replayed,
        series = storage.series_count(),
        "replayed wal"
    );

    let app = api::router(Arc::new(AppState {
        storage: storage.clone(),
        wal: wal.clone(),
    }));

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!(address = %config.listen_addr, "listening");

    let shutdown = Arc::new(Notify::new());
    let wal_lifecycle = tokio::spawn({
        let wal = wal.clone();
        let shutdown = shutdown.clone();
        async move { wal.run(shutdown.notified()).await }
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The server has drained; let the WAL close its open partition
    shutdown.notify_one();
    wal_lifecycle.await?;

    info!("server shutdown gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
