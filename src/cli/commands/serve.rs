use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{debug, error, info, trace};

use crate::config::initialize_app_state_with_url;
use crate::router::create_router;

/// Connect to the database, build the router and serve it until shutdown.
pub async fn serve(database_url: &str, bind_address: &str) -> Result<()> {
    info!("Keepsake server starting");
    debug!("Database URL: {}", database_url);
    debug!("Bind address: {}", bind_address);

    let state = match initialize_app_state_with_url(database_url).await {
        Ok(state) => state,
        Err(e) => {
            error!("Could not initialize application state: {}", e);
            return Err(e);
        }
    };

    trace!("Building application router");
    let app = create_router(state);

    let listener = match TcpListener::bind(&bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Could not bind to {}: {}", bind_address, e);
            return Err(e.into());
        }
    };

    info!("Keepsake API listening on http://{}", bind_address);
    info!("Swagger UI at http://{}/swagger-ui", bind_address);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shut down");
    Ok(())
}
