use anyhow::Result;
use sea_orm::Database;

use crate::auth::SessionStore;
use crate::schemas::AppState;

/// Initialize application state for the given database URL
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    // Connect to database
    tracing::info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    // Sessions start empty on every boot; logins populate the store
    let sessions = SessionStore::new();

    Ok(AppState { db, sessions })
}
