//! Customer Backend
//! Mission: Customer-record management with token-authenticated access

use anyhow::{Context, Result};
use customer_backend::app::build_router;
use customer_backend::auth::{AuthService, AuthState, GateState, JwtHandler, UserStore};
use customer_backend::customers::{CustomerState, CustomerStore};
use dotenv::dotenv;
use std::path::{Path, PathBuf};
use std::{env, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    load_env();
    init_tracing();

    info!("🚀 Customer Backend starting");

    let jwt_secret = env::var("JWT_SECRET")
        .unwrap_or_else(|_| "dev-secret-change-in-production-minimum-32-characters".to_string());
    let jwt_ttl_secs = env::var("JWT_TTL_SECS")
        .unwrap_or_else(|_| "86400".to_string())
        .parse::<i64>()
        .context("Invalid JWT_TTL_SECS")?;
    let bcrypt_cost = env::var("BCRYPT_COST")
        .unwrap_or_else(|_| bcrypt::DEFAULT_COST.to_string())
        .parse::<u32>()
        .context("Invalid BCRYPT_COST")?;

    let auth_db_path = resolve_data_path(env::var("AUTH_DB_PATH").ok(), "customer_auth.db");
    let customer_db_path =
        resolve_data_path(env::var("CUSTOMER_DB_PATH").ok(), "customer_records.db");

    let user_store = Arc::new(UserStore::new(&auth_db_path)?);
    let jwt_handler = Arc::new(JwtHandler::new(jwt_secret, jwt_ttl_secs));
    let auth_service = Arc::new(AuthService::new(
        user_store.clone(),
        jwt_handler.clone(),
        bcrypt_cost,
    ));
    let customer_store = Arc::new(CustomerStore::new(&customer_db_path)?);

    info!("🔐 Credential store initialized at: {}", auth_db_path);
    info!("📇 Customer store initialized at: {}", customer_db_path);

    let app = build_router(
        AuthState::new(auth_service),
        GateState {
            user_store,
            jwt_handler,
        },
        CustomerState::new(customer_store),
    );

    let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await?;
    info!("🎯 API server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "customer_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_env() {
    // 1) Standard dotenv search (cwd + parents)
    let _ = dotenv();

    // 2) Also try the manifest directory (common when running with
    //    --manifest-path from elsewhere)
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let candidate = manifest_dir.join(".env");
    if candidate.exists() {
        let _ = dotenv::from_path(&candidate);
    }
}

fn resolve_data_path(env_value: Option<String>, default_filename: &str) -> String {
    let base = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let Some(raw) = env_value.filter(|v| !v.trim().is_empty()) else {
        return base.join(default_filename).to_string_lossy().to_string();
    };

    let p = PathBuf::from(raw);
    if p.is_absolute() {
        return p.to_string_lossy().to_string();
    }

    // Treat relative paths as relative to the manifest dir, not the cwd.
    base.join(p).to_string_lossy().to_string()
}
