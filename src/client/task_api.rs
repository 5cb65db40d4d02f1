use crate::client::ClientError;
use crate::dto::{NewTask, TaskItem, UpdateTask};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use serde::de::DeserializeOwned;

/// The task API as seen from the client
pub trait TaskApi {
    async fn list_tasks(&self) -> Result<Vec<TaskItem>, ClientError>;
    async fn create_task(&self, new_task: &NewTask) -> Result<TaskItem, ClientError>;
    /// Sends the whole record as the task's new content
    async fn update_task(&self, task: &TaskItem) -> Result<TaskItem, ClientError>;
    async fn delete_task(&self, task_id: i32) -> Result<(), ClientError>;
}

/// [TaskApi] over HTTP. Requests carry trace context so they join the caller's trace.
#[derive(Clone)]
pub struct HttpTaskApi {
    tasks_url: String,
    http_client: ClientWithMiddleware,
}

impl HttpTaskApi {
    /// Creates a client for the API hosted at [base_url], e.g. "http://localhost:8080"
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let base_client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .map_err(ClientError::Setup)?;
        let http_client = ClientBuilder::new(base_client)
            .with(TracingMiddleware::default())
            .build();

        Ok(HttpTaskApi {
            tasks_url: format!("{}/tasks", base_url.trim_end_matches('/')),
            http_client,
        })
    }

    fn task_url(&self, task_id: i32) -> String {
        format!("{}/{task_id}", self.tasks_url)
    }
}

/// Turns non-2xx responses into errors, carrying the body along for diagnostics
async fn require_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ClientError::Status { status, body })
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    require_success(response)
        .await?
        .json::<T>()
        .await
        .map_err(ClientError::Decode)
}

impl TaskApi for HttpTaskApi {
    async fn list_tasks(&self) -> Result<Vec<TaskItem>, ClientError> {
        let response = self.http_client.get(&self.tasks_url).send().await?;

        decode(response).await
    }

    async fn create_task(&self, new_task: &NewTask) -> Result<TaskItem, ClientError> {
        let response = self
            .http_client
            .post(&self.tasks_url)
            .json(new_task)
            .send()
            .await?;

        decode(response).await
    }

    async fn update_task(&self, task: &TaskItem) -> Result<TaskItem, ClientError> {
        let body = UpdateTask::from(task.clone());
        let response = self
            .http_client
            .put(self.task_url(task.id))
            .json(&body)
            .send()
            .await?;

        decode(response).await
    }

    async fn delete_task(&self, task_id: i32) -> Result<(), ClientError> {
        let response = self.http_client.delete(self.task_url(task_id)).send().await?;
        require_success(response).await?;

        Ok(())
    }
}
