use crate::domain::user::driving_ports::UserPort;
use crate::domain::user::{SeedOutcome, SeedUser};
use crate::persistence::db_user_driven_ports::{DbDetectUser, DbUserSeeder};
use anyhow::Context;
use axum::Router;
use axum::extract::State;
use axum::http::{HeaderValue, Method};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub mod api;
pub mod app_env;
pub mod client;
pub mod domain;
pub mod dto;
pub mod external_connections;
pub mod logging;
pub mod persistence;
pub mod routing_utils;

#[cfg(test)]
mod test_util;

/// Application state shared between every request handler
pub struct SharedData {
    pub ext_cxn: persistence::ExternalConnectivity,
}

/// Extractor for the shared application state
pub type AppState = State<Arc<SharedData>>;

/// Assembles every route the service exposes, along with request tracing and CORS handling
pub fn build_router(shared_data: Arc<SharedData>, cors: CorsLayer) -> Router {
    let router = Router::new()
        .nest("/tasks", api::task::task_routes())
        .merge(api::swagger_main::build_documentation())
        .with_state(shared_data);

    logging::attach_tracing_http(router).layer(cors)
}

/// Builds the CORS policy for browser clients. Only the given origin may call the API when one
/// is provided, otherwise any origin may.
pub fn cors_layer(allowed_origin: Option<&str>) -> Result<CorsLayer, anyhow::Error> {
    let origin = match allowed_origin {
        Some(origin) => AllowOrigin::exact(
            HeaderValue::from_str(origin).context("CORS origin is not a valid header value")?,
        ),
        None => AllowOrigin::from(Any),
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any))
}

/// Brings the schema up to date and makes sure the seed user exists. Safe to run on every startup.
pub async fn prepare_database(db: &PgPool, seed: &SeedUser) -> Result<SeedOutcome, anyhow::Error> {
    persistence::run_migrations(db).await?;

    let ext_cxn = persistence::ExternalConnectivity::new(db.clone());
    let outcome = domain::user::UserService {}
        .seed_user(seed, &ext_cxn, &DbDetectUser, &DbUserSeeder)
        .await
        .context("seeding the default user")?;

    Ok(outcome)
}
