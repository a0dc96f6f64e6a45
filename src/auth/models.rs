//! Authentication Models
//! Mission: Define identity, claims, and auth request/response shapes

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A registered identity as stored in the credential store.
///
/// Deliberately not serializable: the password hash must never leave the
/// process through a response body or a log line.
#[derive(Debug, Clone)]
pub struct Identity {
    pub username: String,
    pub password_hash: String, // bcrypt digest
    pub enabled: bool,
}

/// Signed session-token claims: subject plus issue/expiry instants.
///
/// Roles are intentionally absent. The request gate resolves the current
/// grants from the credential store on every request, so a role granted
/// after the token was issued is visible while the token is still valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Request-scoped authorization context established by the request gate.
///
/// Lives in the request's extension map only; dropped when the request
/// finishes. Never shared across requests.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub username: String,
    pub roles: HashSet<String>,
}

/// Registration request body. Fields are optional so the authenticator can
/// report exactly which one is missing.
#[derive(Debug, Default, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Registration confirmation echoing the username and the granted role.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub username: String,
    pub role: String,
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response: the subject, its current grants, and a fresh token.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub roles: Vec<String>,
    pub token: String,
}
