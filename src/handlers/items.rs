use crate::auth::Identity;
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use model::entities::item;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

/// Request body for creating a new item
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateItemRequest {
    /// Item name
    pub name: String,
    /// Item description
    pub description: Option<String>,
}

/// Request body for updating an item
///
/// Fields left out keep their stored value. There is deliberately no owner
/// field here; ownership is fixed at creation.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateItemRequest {
    /// Item name
    pub name: Option<String>,
    /// Item description
    pub description: Option<String>,
}

/// Item response model
#[derive(Debug, Serialize, ToSchema)]
pub struct ItemResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: i32,
}

impl From<item::Model> for ItemResponse {
    fn from(model: item::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            owner_id: model.owner_id,
        }
    }
}

/// Shared lookup for the single-item routes.
///
/// An absent item and an item owned by someone else are distinct outcomes:
/// the first is 404, the second 403. The existence check runs first, so a
/// caller probing a foreign item learns that it exists but nothing more.
async fn find_owned_item(
    db: &DatabaseConnection,
    item_id: i32,
    identity: &Identity,
) -> Result<item::Model, ApiError> {
    trace!("Looking up item with ID: {}", item_id);
    let item_model = match item::Entity::find_by_id(item_id).one(db).await? {
        Some(item_model) => item_model,
        None => {
            warn!("Item with ID {} not found", item_id);
            return Err(ApiError::ItemNotFound);
        }
    };

    if item_model.owner_id != identity.user_id {
        warn!(
            "User '{}' denied access to item {} owned by user {}",
            identity.username, item_id, item_model.owner_id
        );
        return Err(ApiError::Forbidden);
    }

    debug!("Item {} belongs to caller '{}'", item_id, identity.username);
    Ok(item_model)
}

/// Create a new item owned by the caller
#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created successfully", body = ApiResponse<ItemResponse>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_item(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ItemResponse>>), ApiError> {
    trace!("Entering create_item function");
    debug!(
        "Creating item with name: {} for user: {}",
        request.name, identity.username
    );

    // The owner is always the caller; the request body has no say in it
    let new_item = item::ActiveModel {
        name: Set(request.name.clone()),
        description: Set(request.description.clone()),
        owner_id: Set(identity.user_id),
        ..Default::default()
    };

    trace!("Attempting to insert new item into database");
    match new_item.insert(&state.db).await {
        Ok(item_model) => {
            info!(
                "Item created successfully with ID: {}, name: {}, owner: {}",
                item_model.id, item_model.name, item_model.owner_id
            );
            let response = ApiResponse {
                data: ItemResponse::from(item_model),
                message: "Item created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(db_error) => {
            error!(
                "Failed to create item '{}' for user {}: {}",
                request.name, identity.user_id, db_error
            );
            Err(ApiError::Database(db_error))
        }
    }
}

/// Get all items owned by the caller
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    responses(
        (status = 200, description = "Items retrieved successfully", body = ApiResponse<Vec<ItemResponse>>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_items(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<ApiResponse<Vec<ItemResponse>>>, ApiError> {
    trace!("Entering list_items function");
    debug!("Fetching items for user: {}", identity.username);

    // Only the caller's items, in stable id order
    let items = item::Entity::find()
        .filter(item::Column::OwnerId.eq(identity.user_id))
        .order_by_asc(item::Column::Id)
        .all(&state.db)
        .await?;

    let item_count = items.len();
    debug!("Retrieved {} items from database", item_count);

    let item_responses: Vec<ItemResponse> = items.into_iter().map(ItemResponse::from).collect();

    info!(
        "Successfully retrieved {} items for user '{}'",
        item_count, identity.username
    );
    let response = ApiResponse {
        data: item_responses,
        message: "Items retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get a specific item by ID
#[utoipa::path(
    get,
    path = "/items/{item_id}",
    tag = "items",
    params(
        ("item_id" = i32, Path, description = "Item ID"),
    ),
    responses(
        (status = 200, description = "Item retrieved successfully", body = ApiResponse<ItemResponse>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Item belongs to another user", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_item(
    Path(item_id): Path<i32>,
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<ApiResponse<ItemResponse>>, ApiError> {
    trace!("Entering get_item function for item_id: {}", item_id);

    let item_model = find_owned_item(&state.db, item_id, &identity).await?;

    info!(
        "Successfully retrieved item with ID: {}, name: {}",
        item_model.id, item_model.name
    );
    let response = ApiResponse {
        data: ItemResponse::from(item_model),
        message: "Item retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Update an item
#[utoipa::path(
    put,
    path = "/items/{item_id}",
    tag = "items",
    params(
        ("item_id" = i32, Path, description = "Item ID"),
    ),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated successfully", body = ApiResponse<ItemResponse>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Item belongs to another user", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_item(
    Path(item_id): Path<i32>,
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<UpdateItemRequest>,
) -> Result<Json<ApiResponse<ItemResponse>>, ApiError> {
    trace!("Entering update_item function for item_id: {}", item_id);
    debug!("Updating item with ID: {}", item_id);

    let existing_item = find_owned_item(&state.db, item_id, &identity).await?;

    // Create active model for update
    let mut item_active: item::ActiveModel = existing_item.into();
    let mut updated_fields = Vec::new();

    // Update only provided fields. owner_id stays whatever it was.
    if let Some(name) = request.name {
        debug!("Updating name to: {}", name);
        item_active.name = Set(name.clone());
        updated_fields.push(format!("name: {}", name));
    }

    if let Some(description) = request.description {
        debug!("Updating description");
        item_active.description = Set(Some(description.clone()));
        updated_fields.push(format!("description: {}", description));
    }

    if updated_fields.is_empty() {
        debug!("No fields to update for item ID: {}", item_id);
    } else {
        debug!("Updating fields: {}", updated_fields.join(", "));
    }

    trace!("Attempting to update item in database");
    match item_active.update(&state.db).await {
        Ok(updated_item) => {
            info!(
                "Item with ID {} updated successfully. Updated fields: {}",
                item_id,
                if updated_fields.is_empty() {
                    "none".to_string()
                } else {
                    updated_fields.join(", ")
                }
            );
            let response = ApiResponse {
                data: ItemResponse::from(updated_item),
                message: "Item updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to update item with ID {}: {}", item_id, db_error);
            Err(ApiError::Database(db_error))
        }
    }
}

/// Delete an item
#[utoipa::path(
    delete,
    path = "/items/{item_id}",
    tag = "items",
    params(
        ("item_id" = i32, Path, description = "Item ID"),
    ),
    responses(
        (status = 200, description = "Item deleted successfully", body = ApiResponse<String>),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Item belongs to another user", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_item(
    Path(item_id): Path<i32>,
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering delete_item function for item_id: {}", item_id);
    debug!("Attempting to delete item with ID: {}", item_id);

    // The ownership check needs the stored row, so the fetch comes first
    // even though the delete itself only needs the id
    find_owned_item(&state.db, item_id, &identity).await?;

    match item::Entity::delete_by_id(item_id).exec(&state.db).await {
        Ok(delete_result) => {
            debug!(
                "Delete operation completed. Rows affected: {}",
                delete_result.rows_affected
            );
            info!("Item with ID {} deleted successfully", item_id);
            let response = ApiResponse {
                data: format!("Item {} deleted", item_id),
                message: "Item deleted successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to delete item with ID {}: {}", item_id, db_error);
            Err(ApiError::Database(db_error))
        }
    }
}
