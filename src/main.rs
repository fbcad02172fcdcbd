//! Steak Sync - local daemon that runs synchronized steak grilling sessions
//!
//! This is the main entry point for the steak-sync application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use steak_sync::{
    config::Config,
    state::AppState,
    api::create_router,
    services::{FileStore, LocalNotifier},
    tasks::{countdown_timer_task, recover_session},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("steak_sync={},tower_http=info", config.log_level()))
        .init();

    info!("Starting steak-sync v{}", env!("CARGO_PKG_VERSION"));

    let data_dir = config.data_dir();
    info!("Configuration: host={}, port={}, data_dir={}",
          config.host, config.port, data_dir.display());

    let table = Arc::new(config.cook_time_table()?);
    let store = Arc::new(FileStore::open(&data_dir)?);
    // Re-arms notifications a previous run left pending
    let notifier = Arc::new(LocalNotifier::restore(
        config.notification_permission(),
        store.clone(),
    ));

    // Create application state
    let state = Arc::new(AppState::new(
        store,
        notifier,
        table,
        config.host.clone(),
        config.port,
    ));

    // Pick up a session interrupted by the last shutdown before ticking starts
    recover_session(Arc::clone(&state)).await;

    // Start the countdown background task
    let timer_state = Arc::clone(&state);
    tokio::spawn(async move {
        countdown_timer_task(timer_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET/POST   /steaks               - List or add steaks");
    info!("  PUT/DELETE /steaks/:index        - Edit or remove a steak");
    info!("  GET        /schedule             - Preview place/flip notifications");
    info!("  POST       /session/start        - Start the synchronized countdown");
    info!("  POST       /session/stop         - Stop and cancel notifications");
    info!("  GET        /status               - Countdown, steaks and notices");
    info!("  *          /saved-steaks[/:id]   - Saved steak templates");
    info!("  GET/PUT    /preferences/skip-intro");
    info!("  GET        /health               - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        signal = shutdown_signal() => {
            match signal {
                Ok(_) => info!("Shutdown signal received"),
                Err(e) => tracing::error!("Signal handling failed: {}", e),
            }
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
