use crate::app_env::test::TEST_DB_URL;
use crate::domain::DEFAULT_USER_ID;
use crate::domain::user::SeedUser;
use crate::{SharedData, persistence};
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, header};
use axum::response::Response;
use dotenv::dotenv;
use lazy_static::lazy_static;
use rand::{Rng, thread_rng};
use serde::Serialize;
use sqlx::{Connection, PgConnection, PgPool};
use std::env;
use std::future::Future;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tower::ServiceExt;

lazy_static! {
    static ref TOKIO_RT: Runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Tokio runtime failed to initialize");
}

pub const SEED_EMAIL: &str = "testuser@example.com";
pub const SEED_PASSWORD: &str = "test1234";

pub fn seed_user() -> SeedUser {
    SeedUser {
        id: DEFAULT_USER_ID,
        email: SEED_EMAIL.to_owned(),
        password: SEED_PASSWORD.to_owned(),
    }
}

/// A database created for a single test
struct TestDatabase {
    base_url: String,
    db_name: String,
}

impl TestDatabase {
    async fn create(base_url: &str) -> Result<Self, sqlx::Error> {
        let db_id: u32 = thread_rng().gen_range(10_000..99_999);
        let db_name = format!("test_db_{db_id}");
        let mut conn = PgConnection::connect(base_url).await?;

        sqlx::query(&format!("CREATE DATABASE {db_name}"))
            .execute(&mut conn)
            .await?;
        conn.close().await?;

        Ok(TestDatabase {
            base_url: base_url.trim_end_matches('/').to_owned(),
            db_name,
        })
    }

    fn url(&self) -> String {
        format!("{}/{}", self.base_url, self.db_name)
    }

    async fn destroy(self) {
        let mut conn = match PgConnection::connect(&self.base_url).await {
            Ok(conn) => conn,
            Err(conn_err) => {
                println!(
                    "Failed to reconnect to drop test database {}, please remove it manually. Error: {conn_err}",
                    self.db_name
                );
                return;
            }
        };

        let drop_result = sqlx::query(&format!("DROP DATABASE {} WITH (FORCE)", self.db_name))
            .execute(&mut conn)
            .await;
        if let Err(db_err) = drop_result {
            println!(
                "Failed to drop test database {}, please remove it manually. Error: {db_err}",
                self.db_name
            );
        }
    }
}

/// Creates an empty database for a test and hands a pool for it to [test_fn]. The database is
/// dropped afterwards, even when the test fails.
///
/// Expects that the TEST_DB_URL environment variable is populated
pub fn prepare_db_and_test<F, R>(test_fn: F)
where
    R: Future<Output = ()> + Send + 'static,
    F: FnOnce(PgPool) -> R,
{
    if dotenv().is_err() {
        println!("Test is running without .env file.");
    }

    TOKIO_RT.block_on(async move {
        let base_url = env::var(TEST_DB_URL).unwrap_or_else(|_| {
            panic!("You must provide the {TEST_DB_URL} environment variable as the base postgres connection string")
        });
        let test_db = TestDatabase::create(&base_url)
            .await
            .unwrap_or_else(|db_err| panic!("Failed to create test database: {db_err}"));

        let pool = persistence::connect_sqlx(&test_db.url())
            .await
            .unwrap_or_else(|db_err| panic!("Failed to connect to test database: {db_err}"));
        let test_result = tokio::spawn(test_fn(pool.clone())).await;

        pool.close().await;
        test_db.destroy().await;
        if let Err(join_err) = test_result {
            std::panic::resume_unwind(join_err.into_panic());
        }
    });
}

/// Migrates and seeds [db], then builds the application router on top of it
pub async fn prepared_router(db: PgPool) -> Router {
    crate::prepare_database(&db, &seed_user())
        .await
        .expect("Database preparation failed");
    let shared_data = Arc::new(SharedData {
        ext_cxn: persistence::ExternalConnectivity::new(db),
    });
    let cors = crate::cors_layer(None).expect("Default CORS policy is invalid");

    crate::build_router(shared_data, cors)
}

/// Builds a request carrying [payload] as its JSON body
pub fn json_request(method: Method, uri: &str, payload: &impl Serialize) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            serde_json::to_vec(payload).expect("Request body failed to serialize"),
        ))
        .expect("Request failed to build")
}

pub fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("Request failed to build")
}

/// Sends a single request through [router]
pub async fn send(router: &Router, request: Request<Body>) -> Response {
    router
        .clone()
        .oneshot(request)
        .await
        .expect("Router is infallible")
}
