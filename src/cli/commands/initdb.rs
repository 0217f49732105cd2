use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use tracing::{error, info};

/// Connect to the database and bring its schema up to date.
pub async fn init_database(database_url: &str) -> Result<()> {
    info!("Initializing database at {}", database_url);

    let db = match Database::connect(database_url).await {
        Ok(connection) => connection,
        Err(e) => {
            error!("Could not connect to '{}': {}", database_url, e);
            return Err(e.into());
        }
    };

    if let Err(e) = Migrator::up(&db, None).await {
        error!("Migration failed: {}", e);
        return Err(e.into());
    }

    info!("Database schema is up to date");
    Ok(())
}
