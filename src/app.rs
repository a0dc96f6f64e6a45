//! HTTP surface assembly
//! Mission: Wire routes, the request gate, and the outer layers

use crate::auth::{api as auth_api, auth_gate, AuthState, GateState};
use crate::customers::{api as customer_api, CustomerState};
use crate::middleware::request_logging;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

/// Build the full application router.
///
/// The request gate wraps every route: it establishes the authorization
/// context when a valid token is presented and never rejects by itself.
/// Per-handler role checks own the actual denials.
pub fn build_router(
    auth_state: AuthState,
    gate_state: GateState,
    customer_state: CustomerState,
) -> Router {
    let auth_routes = Router::new()
        .route("/auth/register", post(auth_api::register))
        .route("/auth/login", post(auth_api::login))
        .with_state(auth_state);

    let customer_routes = Router::new()
        .route(
            "/api/v1/customer",
            get(customer_api::list_customers).post(customer_api::create_customer),
        )
        .route(
            "/api/v1/customer/:id",
            get(customer_api::get_customer)
                .put(customer_api::update_customer)
                .delete(customer_api::delete_customer),
        )
        .with_state(customer_state);

    let public_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .merge(public_routes)
        .merge(customer_routes)
        .merge(auth_routes)
        .layer(middleware::from_fn_with_state(gate_state, auth_gate))
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(request_logging))
}

async fn health_check() -> &'static str {
    "Customer backend operational"
}
