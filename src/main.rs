//! maskrelayd — the anonymous group chat fan-out engine.
//!
//! Boots configuration, database and metrics, then idles until a shutdown
//! signal. Wiring a concrete bot-API `Transport` and the long-poll loop that
//! feeds member actions into `GroupRegistry::enqueue` is left to whatever
//! embeds this binary's companion library crate.

use maskrelay::config::{self, Config};
use maskrelay::db::Database;
use maskrelay::{http, metrics};
use tracing::{error, info};

/// Resolve the configuration path from CLI arguments: `-c <path>`,
/// `--config <path>`, a bare path, or the `config.toml` default.
fn resolve_config_path() -> String {
    let mut args = std::env::args().skip(1);

    match args.next() {
        Some(flag) if flag == "-c" || flag == "--config" => args.next().unwrap_or_else(|| {
            eprintln!("Missing path after {flag}");
            std::process::exit(1);
        }),
        Some(path) => path,
        None => "config.toml".to_string(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = resolve_config_path();

    let config = Config::load(&config_path).map_err(|e| {
        eprintln!("ERROR: failed to load config from {config_path}: {e}");
        e
    })?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match config.server.log_format {
        config::LogFormat::Json => {
            tracing_subscriber::fmt().with_env_filter(env_filter).with_target(true).json().init();
        }
        config::LogFormat::Pretty => {
            tracing_subscriber::fmt().with_env_filter(env_filter).with_target(true).init();
        }
    }

    if let Err(errors) = config::validate(&config) {
        for err in &errors {
            error!(error = %err, "configuration validation failed");
        }
        anyhow::bail!("configuration validation failed with {} error(s)", errors.len());
    }

    info!(server = %config.server.name, "starting maskrelayd");

    let db = Database::new(&config.database.path).await?;
    info!(path = %config.database.path, "database ready");

    metrics::init();

    if config.metrics.enabled {
        let port = config.metrics.port;
        tokio::spawn(async move { http::run_http_server(port).await });
    }

    info!("maskrelayd ready, waiting for shutdown signal");
    wait_for_shutdown_signal().await;
    info!("shutdown signal received, exiting");

    drop(db);
    Ok(())
}

async fn wait_for_shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");
    let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

    tokio::select! {
        _ = sigint.recv() => info!("received SIGINT"),
        _ = sigterm.recv() => info!("received SIGTERM"),
    }
}
