use crate::handlers::{
    auth::{login, logout, register},
    health::health_check,
    items::{create_item, delete_item, get_item, list_items, update_item},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Registration and session routes
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", get(logout))
        // Item CRUD routes
        .route("/items", post(create_item))
        .route("/items", get(list_items))
        .route("/items/:item_id", get(get_item))
        .route("/items/:item_id", put(update_item))
        .route("/items/:item_id", delete(delete_item))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
