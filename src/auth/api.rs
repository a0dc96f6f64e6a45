//! Authentication API Endpoints
//! Mission: Expose the register and login flows over HTTP

use crate::auth::models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::auth::service::{AuthError, AuthService};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::warn;

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub auth_service: Arc<AuthService>,
}

impl AuthState {
    pub fn new(auth_service: Arc<AuthService>) -> Self {
        Self { auth_service }
    }
}

/// Register endpoint - POST /auth/register
pub async fn register(
    State(state): State<AuthState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AuthError> {
    let response = state.auth_service.register(Some(payload))?;
    Ok(Json(response))
}

/// Login endpoint - POST /auth/login
pub async fn login(
    State(state): State<AuthState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AuthError> {
    let response = state.auth_service.login(Some(payload))?;
    Ok(Json(response))
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::InvalidRequest(reason) => (StatusCode::BAD_REQUEST, reason),
            AuthError::AuthenticationFailed => {
                (StatusCode::UNAUTHORIZED, "Invalid username or password")
            }
            AuthError::Internal(e) => {
                warn!("Auth request failed: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, message).into_response()
    }
}
