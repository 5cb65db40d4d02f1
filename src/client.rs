//! Client side of the task manager. [task_api] talks to the HTTP API, [state] holds the mirrored
//! task list as an explicit reducer, and [controller] ties the two together: every user action
//! issues at most one request and only touches state once that request has resolved.

use thiserror::Error;

pub mod console;
pub mod controller;
pub mod state;
pub mod task_api;

pub use controller::TaskListController;
pub use state::{EditMode, TaskAction, TaskListState};
pub use task_api::{HttpTaskApi, TaskApi};

/// Every way a round trip to the API can fail. Callers only care that it failed, so none of
/// these are surfaced beyond a log line.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not build the HTTP client: {0}")]
    Setup(#[source] reqwest::Error),
    #[error("request failed to complete: {0}")]
    Transport(#[from] reqwest_middleware::Error),
    #[error("server responded with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("could not read the server's response: {0}")]
    Decode(#[source] reqwest::Error),
}
