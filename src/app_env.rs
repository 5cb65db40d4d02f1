/// URL for accessing the PostgreSQL database (should contain a database name in the path)
pub const DB_URL: &str = "DATABASE_URL";
/// Log level configuration for the application. For formatting info, see [tracing_subscriber's EnvFilter documentation](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html)
pub const LOG_LEVEL: &str = "LOG_LEVEL";

/// OpenTelemetry span export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_SPAN_EXPORT_URL: &str = "OTEL_SPAN_EXPORT_URL";
/// OpenTelemetry metrics export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_METRIC_EXPORT_URL: &str = "OTEL_METRIC_EXPORT_URL";

/// Address the HTTP server binds to
pub const SERVER_ADDRESS: &str = "SERVER_ADDRESS";
/// Origin allowed to make cross-origin requests to the API. Any origin is allowed when unset.
pub const CORS_ALLOWED_ORIGIN: &str = "CORS_ALLOWED_ORIGIN";

/// Email of the user seeded into the database on startup
pub const SEED_USER_EMAIL: &str = "SEED_USER_EMAIL";
/// Plaintext password of the seeded user. Only its Argon2 hash is ever stored.
pub const SEED_USER_PASSWORD: &str = "SEED_USER_PASSWORD";

/// Base URL of the task API, used by the console client
pub const TASK_API_URL: &str = "TASK_API_URL";

pub const DEFAULT_SERVER_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_SEED_USER_EMAIL: &str = "testuser@example.com";
pub const DEFAULT_SEED_USER_PASSWORD: &str = "test1234";
pub const DEFAULT_TASK_API_URL: &str = "http://localhost:8080";

/// Reads an environment variable, falling back to [default] when it is unset or not unicode
pub fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_owned())
}
