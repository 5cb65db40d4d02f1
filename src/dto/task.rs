use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;
use crate::domain;

/// DTO for creating a new task via the API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    #[validate(length(min = 1))]
    #[schema(example = "Buy milk")]
    pub title: String,
    #[serde(default)]
    #[schema(example = false)]
    pub is_done: bool,
    #[schema(example = 1)]
    pub user_id: i32,
}

impl From<NewTask> for domain::task::NewTask {
    fn from(value: NewTask) -> Self {
        domain::task::NewTask {
            title: value.title,
            is_done: value.is_done,
            user_id: value.user_id,
        }
    }
}

/// DTO for a task returned from the API
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskItem {
    #[schema(example = 10)]
    pub id: i32,
    #[schema(example = "Buy milk")]
    pub title: String,
    #[schema(example = false)]
    pub is_done: bool,
    #[schema(example = 1)]
    pub user_id: i32,
}

impl From<domain::task::TaskItem> for TaskItem {
    fn from(value: domain::task::TaskItem) -> Self {
        TaskItem {
            id: value.id,
            title: value.title,
            is_done: value.is_done,
            user_id: value.user_id,
        }
    }
}

/// DTO replacing the full content of a task via the API. The ID is optional, but must match
/// the task being updated when present.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTask {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = 10)]
    pub id: Option<i32>,
    #[validate(length(min = 1))]
    #[schema(example = "Buy oat milk")]
    pub title: String,
    #[schema(example = true)]
    pub is_done: bool,
    #[schema(example = 1)]
    pub user_id: i32,
}

impl From<UpdateTask> for domain::task::UpdateTask {
    fn from(value: UpdateTask) -> Self {
        domain::task::UpdateTask {
            title: value.title,
            is_done: value.is_done,
            user_id: value.user_id,
        }
    }
}

impl From<TaskItem> for UpdateTask {
    fn from(value: TaskItem) -> Self {
        UpdateTask {
            id: Some(value.id),
            title: value.title,
            is_done: value.is_done,
            user_id: value.user_id,
        }
    }
}
