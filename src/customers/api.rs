//! Customer API Endpoints
//! Mission: Role-gated CRUD over customer records

use crate::auth::middleware::{require_any_role, AccessError};
use crate::auth::models::AuthContext;
use crate::customers::models::{CustomerRequest, CustomerResponse};
use crate::customers::store::CustomerStore;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use std::sync::Arc;
use tracing::warn;

/// Roles allowed to read and write individual customer records.
const CUSTOMER_ROLES: &[&str] = &["ROLE_ADMIN", "ROLE_USER"];
/// Deletion is admin-only.
const ADMIN_ROLES: &[&str] = &["ROLE_ADMIN"];

/// Shared customer state
#[derive(Clone)]
pub struct CustomerState {
    pub store: Arc<CustomerStore>,
}

impl CustomerState {
    pub fn new(store: Arc<CustomerStore>) -> Self {
        Self { store }
    }
}

/// List customers - GET /api/v1/customer (unrestricted)
pub async fn list_customers(
    State(state): State<CustomerState>,
) -> Result<Json<Vec<CustomerResponse>>, CustomerApiError> {
    let records = state.store.list().map_err(CustomerApiError::Internal)?;
    let response = records.iter().map(CustomerResponse::from_record).collect();
    Ok(Json(response))
}

/// Get customer - GET /api/v1/customer/:id
pub async fn get_customer(
    State(state): State<CustomerState>,
    context: Option<Extension<AuthContext>>,
    Path(id): Path<i64>,
) -> Result<Json<CustomerResponse>, CustomerApiError> {
    require_any_role(context.as_deref(), CUSTOMER_ROLES)?;

    let record = state
        .store
        .find_by_id(id)
        .map_err(CustomerApiError::Internal)?
        .ok_or(CustomerApiError::NotFound)?;

    Ok(Json(CustomerResponse::from_record(&record)))
}

/// Create customer - POST /api/v1/customer
pub async fn create_customer(
    State(state): State<CustomerState>,
    context: Option<Extension<AuthContext>>,
    Json(payload): Json<CustomerRequest>,
) -> Result<Json<CustomerResponse>, CustomerApiError> {
    require_any_role(context.as_deref(), CUSTOMER_ROLES)?;

    let record = state
        .store
        .insert(&payload)
        .map_err(CustomerApiError::Internal)?;

    Ok(Json(CustomerResponse::from_record(&record)))
}

/// Update customer - PUT /api/v1/customer/:id
pub async fn update_customer(
    State(state): State<CustomerState>,
    context: Option<Extension<AuthContext>>,
    Path(id): Path<i64>,
    Json(payload): Json<CustomerRequest>,
) -> Result<Json<CustomerResponse>, CustomerApiError> {
    require_any_role(context.as_deref(), CUSTOMER_ROLES)?;

    let record = state
        .store
        .update(id, &payload)
        .map_err(CustomerApiError::Internal)?
        .ok_or(CustomerApiError::NotFound)?;

    Ok(Json(CustomerResponse::from_record(&record)))
}

/// Delete customer - DELETE /api/v1/customer/:id (admin only)
///
/// Echoes the boolean deletion result on success.
pub async fn delete_customer(
    State(state): State<CustomerState>,
    context: Option<Extension<AuthContext>>,
    Path(id): Path<i64>,
) -> Result<Json<bool>, CustomerApiError> {
    require_any_role(context.as_deref(), ADMIN_ROLES)?;

    let deleted = state
        .store
        .delete(id)
        .map_err(CustomerApiError::Internal)?;
    if !deleted {
        return Err(CustomerApiError::NotFound);
    }

    Ok(Json(true))
}

/// Customer API errors
#[derive(Debug)]
pub enum CustomerApiError {
    Unauthenticated,
    Forbidden,
    NotFound,
    Internal(anyhow::Error),
}

impl From<AccessError> for CustomerApiError {
    fn from(e: AccessError) -> Self {
        match e {
            AccessError::Unauthenticated => CustomerApiError::Unauthenticated,
            AccessError::Forbidden => CustomerApiError::Forbidden,
        }
    }
}

impl IntoResponse for CustomerApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            CustomerApiError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "Authentication required")
            }
            CustomerApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Access Denied: You don't have the permission.",
            ),
            CustomerApiError::NotFound => (StatusCode::NOT_FOUND, "Customer not found"),
            CustomerApiError::Internal(e) => {
                warn!("Customer request failed: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, message).into_response()
    }
}
