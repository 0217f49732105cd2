use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::{debug, trace};

use crate::error::ApiError;
use crate::schemas::AppState;

/// The authenticated caller of a request.
///
/// Handlers take this as an argument to require a live session; anonymous
/// requests are rejected with 401 before the handler body runs. The whole
/// identity comes from the session store, never from anything the client
/// claims about itself.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Id of the logged-in user.
    pub user_id: i32,
    /// Username of the logged-in user.
    pub username: String,
    /// Token the request authenticated with. Logout destroys exactly this
    /// session.
    pub token: String,
}

#[async_trait]
impl FromRequestParts<AppState> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Get the token from the Authorization header
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|header| header.strip_prefix("Bearer "))
            .ok_or(ApiError::NotAuthenticated)?;

        let session = state.sessions.resolve(token).ok_or_else(|| {
            debug!("Request carried an unknown session token");
            ApiError::NotAuthenticated
        })?;

        trace!(username = %session.username, "Resolved request identity");

        Ok(Identity {
            user_id: session.user_id,
            username: session.username,
            token: session.token,
        })
    }
}
