use anyhow::Result;
use tracing::{debug, error, info};

use super::initdb::run_migrations;
use super::serve::run_server;
use crate::config::{Settings, initialize_app_state_with_url};

pub async fn migrate_and_serve(settings: &Settings) -> Result<()> {
    info!("Applying database migrations and starting server");
    debug!("Database URL: {}", settings.database_url);

    let state = match initialize_app_state_with_url(&settings.database_url).await {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize application state: {}", e);
            return Err(e);
        }
    };

    run_migrations(&state.db).await?;
    run_server(state, settings).await
}
