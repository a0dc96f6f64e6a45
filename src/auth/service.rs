//! Authenticator
//! Mission: Registration and credential verification with token issuance

use crate::auth::jwt::JwtHandler;
use crate::auth::models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::auth::password;
use crate::auth::user_store::UserStore;
use std::sync::Arc;
use tracing::{info, warn};

/// Authentication failures surfaced to the HTTP boundary.
#[derive(Debug)]
pub enum AuthError {
    /// Malformed or incomplete input; the caller can resubmit correctly.
    InvalidRequest(&'static str),
    /// Bad credentials. Deliberately undifferentiated: unknown username,
    /// disabled identity, and wrong password are indistinguishable to the
    /// caller.
    AuthenticationFailed,
    /// Infrastructure failure; detail is logged, never returned.
    Internal(anyhow::Error),
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::InvalidRequest(reason) => write!(f, "Invalid request: {}", reason),
            AuthError::AuthenticationFailed => write!(f, "Invalid username or password"),
            AuthError::Internal(_) => write!(f, "Internal error"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Orchestrates registration and login over the credential store, the
/// password hasher, and the token codec.
pub struct AuthService {
    user_store: Arc<UserStore>,
    jwt_handler: Arc<JwtHandler>,
    hash_cost: u32,
}

impl AuthService {
    pub fn new(user_store: Arc<UserStore>, jwt_handler: Arc<JwtHandler>, hash_cost: u32) -> Self {
        Self {
            user_store,
            jwt_handler,
            hash_cost,
        }
    }

    /// Register a new identity with a single role grant.
    ///
    /// Validation short-circuits in order: request, username, password,
    /// role. Blank fields count as missing. A duplicate username is left to
    /// the store's uniqueness constraint and surfaces as an internal
    /// failure, not a distinct error.
    pub fn register(
        &self,
        request: Option<RegisterRequest>,
    ) -> Result<RegisterResponse, AuthError> {
        let request = request.ok_or(AuthError::InvalidRequest("missing request body"))?;
        let username =
            non_blank(request.username).ok_or(AuthError::InvalidRequest("missing username"))?;
        let password =
            non_blank(request.password).ok_or(AuthError::InvalidRequest("missing password"))?;
        let role = non_blank(request.role).ok_or(AuthError::InvalidRequest("missing role"))?;

        let password_hash =
            password::hash_password(&password, self.hash_cost).map_err(AuthError::Internal)?;
        self.user_store
            .create_identity(&username, &password_hash, &role)
            .map_err(AuthError::Internal)?;

        Ok(RegisterResponse { username, role })
    }

    /// Verify credentials and mint a session token.
    ///
    /// On success the response carries the identity's current grants,
    /// sorted for a stable wire shape.
    pub fn login(&self, request: Option<LoginRequest>) -> Result<LoginResponse, AuthError> {
        let request = request.ok_or(AuthError::InvalidRequest("missing request body"))?;

        let identity = self
            .user_store
            .find_by_username(&request.username)
            .map_err(AuthError::Internal)?;

        let verified = identity.as_ref().is_some_and(|identity| {
            identity.enabled && password::verify_password(&request.password, &identity.password_hash)
        });
        let Some(identity) = identity.filter(|_| verified) else {
            warn!("❌ Failed login attempt: {}", request.username);
            return Err(AuthError::AuthenticationFailed);
        };

        let token = self
            .jwt_handler
            .issue(&identity.username)
            .map_err(AuthError::Internal)?;
        let roles = self
            .user_store
            .roles_of(&identity.username)
            .map_err(AuthError::Internal)?;
        let mut roles: Vec<String> = roles.into_iter().collect();
        roles.sort();

        info!("🔐 Login successful: {}", identity.username);

        Ok(LoginResponse {
            username: identity.username,
            roles,
            token,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
