//! Session Sentry - A state-managed HTTP service for idle session timeout control
//!
//! This is the main entry point for the session-sentry application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use session_sentry::{
    api::{create_router, ApiContext},
    config::Config,
    session::{LogNavigator, LocalSessionProvider, SessionProvider},
    state::AppState,
    tasks::session_timer_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("session_sentry={},tower_http=info", config.log_level()))
        .init();

    info!("Starting session-sentry v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, timeout={}s, warning={}s",
        config.host, config.port, config.timeout_secs, config.warning_secs
    );

    // Reject invalid timeout/warning combinations before anything starts
    let policy = match config.policy() {
        Ok(policy) => policy,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Create the session provider and application state
    let provider = Arc::new(LocalSessionProvider::new());
    let state = Arc::new(AppState::new(policy));

    // Start the idle timer background task
    let timer_state = Arc::clone(&state);
    let timer_provider = Arc::clone(&provider) as Arc<dyn SessionProvider>;
    tokio::spawn(async move {
        session_timer_task(
            timer_state,
            timer_provider,
            Arc::new(LogNavigator),
            Some(Box::new(|| info!("Idle session timed out"))),
        )
        .await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(ApiContext {
        state: Arc::clone(&state),
        provider,
        host: config.host.clone(),
        port: config.port,
    });

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /login/:user     - Start a session");
    info!("  POST /logout          - End the current session");
    info!("  POST /activity/:kind  - Report a user interaction event");
    info!("  POST /extend          - Continue the session from the warning");
    info!("  GET  /status          - Check session and warning status");
    info!("  GET  /health          - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
