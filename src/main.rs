//! Decagone Timer - an audio-synchronized countdown timer
//!
//! Entry point: starts the controller task and serves the control API.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use decagone_timer::{
    api::create_router,
    config::Config,
    state::AppState,
    tasks::launch_timer,
    timer::SessionConfig,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("decagone_timer={},tower_http=info", config.log_level()))
        .init();

    let session = SessionConfig::new();
    info!("Starting decagone-timer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Session: countdown={}s, intro={}s, dev_tools={}",
        session.total_duration, session.intro_duration, config.dev
    );

    let (controller, controller_task) = launch_timer(session, config.runtime_options());
    let state = Arc::new(AppState::new(
        controller,
        session,
        config.dev,
        config.port,
        config.host.clone(),
    ));

    let app = create_router(Arc::clone(&state));

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /play      - Start or resume");
    info!("  POST /pause     - Pause");
    info!("  POST /toggle    - Play/pause");
    info!("  POST /reset     - Reset to the beginning");
    info!("  GET  /status    - Timer status");
    info!("  GET  /health    - Health check");
    if config.dev {
        info!("  POST /jump/:minutes - Jump to a whole minute (dev)");
        info!("  GET  /jump-targets  - Available jump targets (dev)");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutdown signal received");
    state.shutdown();
    controller_task.await?;

    info!("Server shutdown complete");
    Ok(())
}
