use crate::domain::task::driving_ports::{TaskError, TaskPort};
use crate::external_connections::{ExternalConnectivity, Transactable};
use crate::persistence::db_task_driven_ports::{DbTaskReader, DbTaskWriter};
use crate::persistence::db_user_driven_ports::DbDetectUser;
use crate::routing_utils::{
    BadRequestResponse, BasicErrorResponse, GenericErrorResponse, Json, NotFoundResponse,
    ValidationErrorResponse,
};
use crate::{AppState, SharedData, domain, dto};
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{ErrorResponse, IntoResponse, Response};
use axum::routing::get;
use std::sync::Arc;
use tracing::{error, info};
use utoipa::OpenApi;
use validator::Validate;

#[derive(OpenApi)]
#[openapi(paths(list_tasks, get_task, create_task, update_task, delete_task))]
/// Defines the OpenAPI documentation for the tasks API
pub struct TaskApi;
/// Constant used to group task endpoints in OpenAPI documentation
pub const TASK_API_GROUP: &str = "Tasks";

/// Builds a router for everything under "/tasks"
pub fn task_routes() -> Router<Arc<SharedData>> {
    Router::new()
        .route(
            "/",
            get(|State(app_state): AppState| async move {
                let mut ext_cxn = app_state.ext_cxn.clone();
                let task_service = domain::task::TaskService {};

                list_tasks(&mut ext_cxn, &task_service).await
            })
            .post(
                |State(app_state): AppState, Json(new_task): Json<dto::NewTask>| async move {
                    let task_service = domain::task::TaskService {};

                    create_task(new_task, &app_state.ext_cxn, &task_service).await
                },
            ),
        )
        .route(
            "/:task_id",
            get(
                |State(app_state): AppState, Path(task_id): Path<i32>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let task_service = domain::task::TaskService {};

                    get_task(task_id, &mut ext_cxn, &task_service).await
                },
            )
            .put(
                |State(app_state): AppState,
                 Path(task_id): Path<i32>,
                 Json(update): Json<dto::UpdateTask>| async move {
                    let task_service = domain::task::TaskService {};

                    update_task(task_id, update, &app_state.ext_cxn, &task_service).await
                },
            )
            .delete(
                |State(app_state): AppState, Path(task_id): Path<i32>| async move {
                    let mut ext_cxn = app_state.ext_cxn.clone();
                    let task_service = domain::task::TaskService {};

                    delete_task(task_id, &mut ext_cxn, &task_service).await
                },
            ),
        )
}

/// Response type that turns task domain errors into [BasicErrorResponse]s
pub struct TaskErrorResponse(TaskError);

impl From<TaskError> for TaskErrorResponse {
    fn from(value: TaskError) -> Self {
        Self(value)
    }
}

impl IntoResponse for TaskErrorResponse {
    fn into_response(self) -> Response {
        match self.0 {
            TaskError::TaskDoesNotExist(task_id) => {
                NotFoundResponse(format!("Task {task_id} could not be found.")).into_response()
            }
            TaskError::UserDoesNotExist(user_id) => BadRequestResponse {
                error_code: "user_not_found",
                description: format!("User {user_id} does not exist, so it cannot own a task."),
            }
            .into_response(),
            TaskError::PortError(cause) => GenericErrorResponse(cause).into_response(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/tasks",
    tag = TASK_API_GROUP,
    responses(
        (status = 200, description = "Every task, in the order they were stored", body = Vec<dto::TaskItem>),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Lists every task
async fn list_tasks(
    ext_cxn: &mut impl ExternalConnectivity,
    task_service: &impl TaskPort,
) -> Result<Json<Vec<dto::TaskItem>>, ErrorResponse> {
    info!("Requested tasks");
    let task_reader = DbTaskReader;

    let tasks = task_service
        .all_tasks(&mut *ext_cxn, &task_reader)
        .await
        .map_err(TaskErrorResponse::from)?;

    Ok(Json(tasks.into_iter().map(dto::TaskItem::from).collect()))
}

#[utoipa::path(
    get,
    path = "/tasks/{task_id}",
    tag = TASK_API_GROUP,
    params(("task_id" = i32, Path, description = "ID of the task to fetch")),
    responses(
        (status = 200, description = "The requested task", body = dto::TaskItem),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Retrieves a single task
async fn get_task(
    task_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    task_service: &impl TaskPort,
) -> Result<Json<dto::TaskItem>, ErrorResponse> {
    info!("Get task {task_id}");
    let task_reader = DbTaskReader;

    let task = task_service
        .task_by_id(task_id, &mut *ext_cxn, &task_reader)
        .await
        .map_err(TaskErrorResponse::from)?;

    Ok(Json(task.into()))
}

#[utoipa::path(
    post,
    path = "/tasks",
    tag = TASK_API_GROUP,
    request_body = dto::NewTask,
    responses(
        (status = 201, description = "The task was created", body = dto::TaskItem),
        (status = 400, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Creates a task owned by an existing user
async fn create_task(
    task_data: dto::NewTask,
    ext_cxn: &impl Transactable,
    task_service: &impl TaskPort,
) -> Result<(StatusCode, Json<dto::TaskItem>), ErrorResponse> {
    info!("Adding task for user {}", task_data.user_id);
    task_data
        .validate()
        .map_err(ValidationErrorResponse::from)?;

    let domain_task = domain::task::NewTask::from(task_data);
    let user_detect = DbDetectUser;
    let task_writer = DbTaskWriter;

    let created_task = task_service
        .create_task(&domain_task, ext_cxn, &user_detect, &task_writer)
        .await;
    if let Err(ref task_err) = created_task {
        error!("Failed to add task: {task_err}");
    }

    Ok((
        StatusCode::CREATED,
        Json(created_task.map_err(TaskErrorResponse::from)?.into()),
    ))
}

#[utoipa::path(
    put,
    path = "/tasks/{task_id}",
    tag = TASK_API_GROUP,
    params(("task_id" = i32, Path, description = "ID of the task to replace")),
    request_body = dto::UpdateTask,
    responses(
        (status = 200, description = "The task as stored after the update", body = dto::TaskItem),
        (status = 400, response = BasicErrorResponse),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Replaces the content of a task. The last write wins.
async fn update_task(
    task_id: i32,
    task_data: dto::UpdateTask,
    ext_cxn: &impl Transactable,
    task_service: &impl TaskPort,
) -> Result<Json<dto::TaskItem>, ErrorResponse> {
    info!("Updating task {task_id}");
    task_data
        .validate()
        .map_err(ValidationErrorResponse::from)?;
    if let Some(body_id) = task_data.id.filter(|&body_id| body_id != task_id) {
        return Err(BadRequestResponse {
            error_code: "id_mismatch",
            description: format!("Body describes task {body_id} but the path targets task {task_id}."),
        }
        .into());
    }

    let domain_update = domain::task::UpdateTask::from(task_data);
    let user_detect = DbDetectUser;
    let task_reader = DbTaskReader;
    let task_writer = DbTaskWriter;

    let update_result = task_service
        .update_task(
            task_id,
            &domain_update,
            ext_cxn,
            &user_detect,
            &task_reader,
            &task_writer,
        )
        .await;
    match update_result {
        Ok(updated_task) => Ok(Json(updated_task.into())),
        Err(task_err) => {
            error!("Update task failure: {task_err}");
            Err(TaskErrorResponse(task_err).into())
        }
    }
}

#[utoipa::path(
    delete,
    path = "/tasks/{task_id}",
    tag = TASK_API_GROUP,
    params(("task_id" = i32, Path, description = "ID of the task to delete")),
    responses(
        (status = 204, description = "The task was deleted"),
        (status = 404, response = BasicErrorResponse),
        (status = 500, response = BasicErrorResponse),
    ),
)]
/// Deletes a task
async fn delete_task(
    task_id: i32,
    ext_cxn: &mut impl ExternalConnectivity,
    task_service: &impl TaskPort,
) -> Result<StatusCode, ErrorResponse> {
    info!("Deleting task {task_id}");
    let task_writer = DbTaskWriter;

    let delete_result = task_service
        .delete_task(task_id, &mut *ext_cxn, &task_writer)
        .await;
    match delete_result {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(task_err) => {
            error!("Failed to delete task: {task_err}");
            Err(TaskErrorResponse(task_err).into())
        }
    }
}
