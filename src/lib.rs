pub mod api;
pub mod config;
pub mod db;
pub mod entities;
pub mod services;
pub mod state;
pub mod watchdog;

use std::sync::Arc;
use std::time::Duration;

pub use config::Config;
use state::SharedState;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use watchdog::Watchdog;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    config.validate()?;

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(String::as_str) {
        None | Some("serve" | "-s" | "--serve") => run_server(config).await,

        Some("init" | "--init") => {
            Config::create_default_if_missing()?;
            println!("✓ Config file created. Edit config.toml and run again.");
            Ok(())
        }

        Some("help" | "-h" | "--help") => {
            print_help();
            Ok(())
        }

        Some(other) => {
            println!("Unknown command: {other}");
            println!();
            print_help();
            Ok(())
        }
    }
}

fn print_help() {
    println!("mediaspace - media sharing backend");
    println!();
    println!("USAGE:");
    println!("  mediaspace [COMMAND]");
    println!();
    println!("COMMANDS:");
    println!("  serve             Start the HTTP server (default)");
    println!("  init              Create default config file");
    println!("  help              Show this help message");
    println!();
    println!("CONFIG:");
    println!("  Edit config.toml to configure the database, storage root, etc.");
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    info!(
        "mediaspace v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let shared = Arc::new(SharedState::new(config.clone()).await?);

    // Make sure today's counters exist for the landing pages; an outage here
    // is logged but never blocks startup.
    if let Err(e) = seed_visit_counters(&shared).await {
        warn!("Failed to seed visit counters: {e}");
    }

    let watchdog = Watchdog::new(
        shared.store.clone(),
        Duration::from_secs(config.general.db_probe_interval_seconds),
        Duration::from_secs(config.general.db_retry_delay_seconds),
    );
    let watchdog_handle = tokio::spawn(watchdog.run());

    let state = api::create_app_state(shared);
    let app = api::router(state);

    let port = config.server.port;
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let server_handle = tokio::spawn(async move {
        info!("Web server running at http://0.0.0.0:{port}");
        if let Err(e) = axum::serve(listener, app).await {
            error!("Web server error: {}", e);
        }
    });

    info!("Server running. Press Ctrl+C to stop.");

    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received");
        }
        Err(e) => {
            error!("Error listening for shutdown: {}", e);
        }
    }

    watchdog_handle.abort();
    server_handle.abort();
    info!("Server stopped");

    Ok(())
}

async fn seed_visit_counters(shared: &SharedState) -> anyhow::Result<()> {
    let today = chrono::Local::now().date_naive().to_string();

    for page in &shared.config.stats.seed_pages {
        shared.store.seed_visit_day(page, &today).await?;
    }

    Ok(())
}
