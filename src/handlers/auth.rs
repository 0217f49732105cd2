use crate::auth::{hash_password, verify_password, Identity};
use crate::error::ApiError;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{extract::State, http::StatusCode, response::Json};
use model::entities::user;
use sea_orm::{ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

/// Request body for registering a new user
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    /// Username (must be unique)
    pub username: String,
    /// Password (stored only as a salted hash)
    pub password: String,
}

/// Request body for logging in
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    /// Username
    pub username: String,
    /// Password
    pub password: String,
}

/// User response model
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
        }
    }
}

/// Login response model, carrying the session token for later requests
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    /// Session token, to be sent as `Authorization: Bearer <token>`
    pub token: String,
    pub user_id: i32,
    pub username: String,
}

// SQLite reports the violated UNIQUE index, Postgres the constraint name.
fn is_unique_violation(err: &DbErr) -> bool {
    match err {
        DbErr::Exec(exec_err) => {
            let error_msg = exec_err.to_string().to_lowercase();
            error_msg.contains("unique") || error_msg.contains("constraint")
        }
        _ => false,
    }
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = ApiResponse<UserResponse>),
        (status = 409, description = "Username already taken", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), ApiError> {
    trace!("Entering register function");
    debug!("Registering user with username: {}", request.username);

    // Check for an existing user first so the common case gets a clean 409
    trace!("Checking whether username is already taken");
    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(&request.username))
        .one(&state.db)
        .await?;

    if existing.is_some() {
        warn!("Registration rejected, username '{}' already exists", request.username);
        return Err(ApiError::DuplicateUsername(request.username));
    }

    let password_hash = hash_password(&request.password)?;

    let new_user = user::ActiveModel {
        username: Set(request.username.clone()),
        password_hash: Set(password_hash),
        ..Default::default()
    };

    trace!("Attempting to insert new user into database");
    match new_user.insert(&state.db).await {
        Ok(user_model) => {
            info!(
                "User registered successfully with ID: {}, username: {}",
                user_model.id, user_model.username
            );
            let response = ApiResponse {
                data: UserResponse::from(user_model),
                message: "User registered successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        // The unique index catches registrations that raced past the
        // existence check above
        Err(db_error) if is_unique_violation(&db_error) => {
            warn!(
                "Registration rejected by unique index, username '{}' already exists",
                request.username
            );
            Err(ApiError::DuplicateUsername(request.username))
        }
        Err(db_error) => {
            error!("Failed to register user '{}': {}", request.username, db_error);
            Err(ApiError::Database(db_error))
        }
    }
}

/// Log in and receive a session token
///
/// The same failure response comes back whether the username is unknown or
/// the password is wrong.
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in successfully", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid username or password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    trace!("Entering login function");
    debug!("Login attempt for username: {}", request.username);

    trace!("Looking up user by username");
    let user_model = match user::Entity::find()
        .filter(user::Column::Username.eq(&request.username))
        .one(&state.db)
        .await?
    {
        Some(user_model) => user_model,
        None => {
            warn!("Login failed for '{}': user not found", request.username);
            return Err(ApiError::AuthFailure);
        }
    };

    if let Err(verify_error) = verify_password(&request.password, &user_model.password_hash) {
        warn!(
            "Login failed for '{}': {}",
            request.username, verify_error
        );
        return Err(ApiError::AuthFailure);
    }

    let session = state.sessions.create(user_model.id, &user_model.username);
    info!(
        "User '{}' logged in successfully with user ID: {}",
        user_model.username, user_model.id
    );

    let response = ApiResponse {
        data: LoginResponse {
            token: session.token,
            user_id: user_model.id,
            username: user_model.username.clone(),
        },
        message: format!("Logged in as {}", user_model.username),
        success: true,
    };
    Ok(Json(response))
}

/// Log out, destroying the current session
#[utoipa::path(
    get,
    path = "/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logged out successfully", body = ApiResponse<String>),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn logout(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    trace!("Entering logout function");
    debug!("Logging out user: {}", identity.username);

    if !state.sessions.destroy(&identity.token) {
        // The session vanished between extraction and here; the outcome for
        // the caller is the same
        debug!("Session for '{}' was already gone", identity.username);
    }

    info!("User '{}' logged out successfully", identity.username);
    let response = ApiResponse {
        data: identity.username,
        message: "Logged out successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}
