use utoipa::OpenApi;

pub mod task;

pub use task::{NewTask, TaskItem, UpdateTask};

/// Collects the schemas of every DTO exposed on the API so they can be merged into the
/// generated OpenAPI document
#[derive(OpenApi)]
#[openapi(components(
    schemas(
        task::NewTask,
        task::TaskItem,
        task::UpdateTask,
        crate::routing_utils::ExtraInfo,
        crate::routing_utils::ValidationErrorSchema
    ),
    responses(crate::routing_utils::BasicErrorResponse)
))]
pub struct OpenApiSchemas;
