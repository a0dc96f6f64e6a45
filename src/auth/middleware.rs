//! Request Gate
//! Mission: Establish a request-scoped authorization context from bearer tokens

use crate::auth::jwt::JwtHandler;
use crate::auth::models::AuthContext;
use crate::auth::user_store::UserStore;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, warn};

/// State consumed by the gate: the token codec plus the credential store
/// for lookup-time role resolution.
#[derive(Clone)]
pub struct GateState {
    pub user_store: Arc<UserStore>,
    pub jwt_handler: Arc<JwtHandler>,
}

/// Extract a bearer token from the Authorization header.
///
/// The scheme prefix is the case-sensitive literal `"Bearer "`; a missing
/// header, a different scheme, or an empty remainder all yield "no token".
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?;
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Per-request gate. Never rejects: with no token or an invalid one the
/// request simply continues without an authorization context, and the
/// authorization check denies protected operations downstream.
///
/// On a valid token the context carries the store's grants at lookup time,
/// not at issue time, so a role granted after issuance is visible on the
/// next request with the same still-valid token.
pub async fn auth_gate(State(state): State<GateState>, mut req: Request, next: Next) -> Response {
    let token = bearer_token(req.headers()).map(|t| t.to_string());

    if let Some(token) = token {
        match state.jwt_handler.verify(&token) {
            Some(claims) => match state.user_store.roles_of(&claims.sub) {
                Ok(roles) => {
                    req.extensions_mut().insert(AuthContext {
                        username: claims.sub,
                        roles,
                    });
                }
                Err(e) => {
                    // Degrade to anonymous; the request still proceeds.
                    warn!("Role lookup failed for {}: {}", claims.sub, e);
                }
            },
            None => {
                debug!(
                    "Invalid bearer token (subject {:?}), continuing unauthenticated",
                    state.jwt_handler.subject_of(&token)
                );
            }
        }
    }

    next.run(req).await
}

/// Denial outcomes of the authorization check.
#[derive(Debug, PartialEq, Eq)]
pub enum AccessError {
    /// No authorization context was established for the request.
    Unauthenticated,
    /// A context exists but none of its roles is in the required set.
    Forbidden,
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AccessError::Unauthenticated => (StatusCode::UNAUTHORIZED, "Authentication required"),
            AccessError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Access Denied: You don't have the permission.",
            ),
        };

        (status, message).into_response()
    }
}

/// Allow if `required` is empty, or if a context exists whose role set
/// intersects it. Matching is exact-string and case-sensitive; there is no
/// role hierarchy.
pub fn require_any_role(
    context: Option<&AuthContext>,
    required: &[&str],
) -> Result<(), AccessError> {
    if required.is_empty() {
        return Ok(());
    }

    let context = context.ok_or(AccessError::Unauthenticated)?;
    if required.iter().any(|role| context.roles.contains(*role)) {
        Ok(())
    } else {
        Err(AccessError::Forbidden)
    }
}
