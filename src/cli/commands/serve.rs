use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{debug, error, info, trace};

use crate::config::{Settings, initialize_app_state_with_url};
use crate::router::create_router;
use crate::schemas::AppState;

pub async fn serve(settings: &Settings) -> Result<()> {
    info!("Devoluciones application starting up");
    debug!("Database URL: {}", settings.database_url);

    let state = match initialize_app_state_with_url(&settings.database_url).await {
        Ok(state) => {
            debug!("Application state initialized successfully");
            state
        }
        Err(e) => {
            error!("Failed to initialize application state: {}", e);
            return Err(e);
        }
    };

    run_server(state, settings).await
}

/// Bind the listener and serve the router until shutdown.
pub async fn run_server(state: AppState, settings: &Settings) -> Result<()> {
    trace!("Creating application router");
    let app = create_router(state, &settings.http_config());
    debug!("Router created successfully");

    let bind_address = &settings.bind_address;
    info!("Starting server on {}", bind_address);
    let listener = match TcpListener::bind(bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to address {}: {}", bind_address, e);
            return Err(e.into());
        }
    };

    info!("Devoluciones API server running on http://{}", bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", bind_address);
    if settings.debug {
        info!("Debug mode: CORS allows every origin");
    }

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shutdown gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
