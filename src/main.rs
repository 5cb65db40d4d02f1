use anyhow::Context;
use dotenv::dotenv;
use std::env;
use std::sync::Arc;
use task_manager::domain::user::SeedUser;
use task_manager::{SharedData, app_env, domain, logging, persistence};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv().ok();
    logging::setup_logging_and_tracing(
        logging::init_env_filter()?,
        logging::exporters_from_env()?,
    );

    let db_url = env::var(app_env::DB_URL)
        .with_context(|| format!("{} must be set to a PostgreSQL URL", app_env::DB_URL))?;
    let db = persistence::connect_sqlx(&db_url)
        .await
        .context("connecting to the database")?;

    let seed = SeedUser {
        id: domain::DEFAULT_USER_ID,
        email: app_env::var_or(app_env::SEED_USER_EMAIL, app_env::DEFAULT_SEED_USER_EMAIL),
        password: app_env::var_or(app_env::SEED_USER_PASSWORD, app_env::DEFAULT_SEED_USER_PASSWORD),
    };
    let seed_outcome = task_manager::prepare_database(&db, &seed).await?;
    info!("Database ready, seed user: {seed_outcome:?}");

    let shared_data = Arc::new(SharedData {
        ext_cxn: persistence::ExternalConnectivity::new(db),
    });
    let cors = task_manager::cors_layer(env::var(app_env::CORS_ALLOWED_ORIGIN).ok().as_deref())?;
    let router = task_manager::build_router(shared_data, cors);

    let address = app_env::var_or(app_env::SERVER_ADDRESS, app_env::DEFAULT_SERVER_ADDRESS);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding to {address}"))?;
    info!("Starting server on {address}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running the HTTP server")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(signal_err) = tokio::signal::ctrl_c().await {
        tracing::error!("Could not listen for the shutdown signal: {signal_err}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
