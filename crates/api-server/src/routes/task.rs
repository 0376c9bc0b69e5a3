//! Task API endpoints
//!
//! All task routes funnel through a single dispatcher that interprets the
//! method plus the normalized path remainder, because several outcomes
//! depend on the path shape rather than on a typed route: a missing id on
//! DELETE/PATCH is a 400, extra path segments are a routing error for every
//! method, and POST refuses any path remainder outright.

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::de::DeserializeOwned;
use serde::Serialize;

use tm_core::task::{format_timestamp, NewTask, Task, TaskPatch};
use tm_core::Error;

use crate::response::{ApiError, Envelope};
use crate::state::AppState;

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    #[serde(rename = "task-id")]
    pub id: String,
    #[serde(rename = "task-title")]
    pub title: String,
    #[serde(rename = "task-description")]
    pub description: String,
    #[serde(rename = "task-completed")]
    pub completed: bool,
    #[serde(rename = "task-created-on")]
    pub created_on: String,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            completed: task.completed,
            created_on: format_timestamp(task.created_at),
        }
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Normalize the resource-specific path remainder into segments.
///
/// `""`, `"/"`, and whitespace count as empty; one leading and one trailing
/// `/` are stripped before splitting.
fn path_segments(path_info: &str) -> Vec<&str> {
    let trimmed = path_info.trim();
    let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split('/').collect()
}

/// Decode a request body into its payload type.
///
/// An empty (or whitespace-only, or JSON `null`) body decodes to `None`;
/// the service decides whether that is acceptable. Undecodable JSON is a
/// client error, while a failed body read is an infrastructure fault.
fn decode_body<T: DeserializeOwned>(
    body: Result<Bytes, BytesRejection>,
) -> tm_core::Result<Option<T>> {
    let bytes = body.map_err(|e| Error::Unexpected(e.to_string()))?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice::<Option<T>>(&bytes).map_err(|e| Error::MalformedPayload(e.to_string()))
}

fn envelope<T: Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(Envelope::new(data))).into_response()
}

async fn handle(
    state: &AppState,
    method: &Method,
    path_info: &str,
    body: Result<Bytes, BytesRejection>,
) -> tm_core::Result<Response> {
    let segments = path_segments(path_info);
    tracing::debug!(%method, ?segments, "dispatching task request");

    let service = state.service();
    if *method == Method::GET {
        match segments.as_slice() {
            [] => {
                let tasks = service.list_tasks().await?;
                let tasks: Vec<TaskResponse> = tasks.into_iter().map(TaskResponse::from).collect();
                Ok(envelope(StatusCode::OK, tasks))
            }
            [id] => {
                let task = service.get_task_by_id(id).await?;
                Ok(envelope(StatusCode::OK, TaskResponse::from(task)))
            }
            _ => Err(Error::InvalidUrl),
        }
    } else if *method == Method::POST {
        match segments.as_slice() {
            [] => {
                let payload: Option<NewTask> = decode_body(body)?;
                let task = service.create_task(payload).await?;
                Ok(envelope(StatusCode::CREATED, TaskResponse::from(task)))
            }
            // creation is only exposed at the collection root
            _ => Err(Error::UnknownRoute),
        }
    } else if *method == Method::DELETE {
        match segments.as_slice() {
            [] => Err(Error::MissingId),
            [id] => {
                let task = service.delete_task_by_id(id).await?;
                Ok(envelope(StatusCode::OK, TaskResponse::from(task)))
            }
            _ => Err(Error::InvalidUrl),
        }
    } else if *method == Method::PATCH {
        match segments.as_slice() {
            [] => Err(Error::MissingId),
            [id] => {
                let patch: Option<TaskPatch> = decode_body(body)?;
                let task = service.update_task_by_id(id, patch).await?;
                Ok(envelope(StatusCode::OK, TaskResponse::from(task)))
            }
            _ => Err(Error::InvalidUrl),
        }
    } else {
        // unreachable through the mounted method routers
        Err(Error::UnknownRoute)
    }
}

async fn dispatch_root(
    State(state): State<AppState>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    match handle(&state, &method, "", body).await {
        Ok(response) => response,
        Err(e) => ApiError(e).into_response(),
    }
}

async fn dispatch_sub(
    State(state): State<AppState>,
    Path(path): Path<String>,
    method: Method,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    match handle(&state, &method, &path, body).await {
        Ok(response) => response,
        Err(e) => ApiError(e).into_response(),
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn router() -> Router<AppState> {
    use axum::routing::get;

    let root = get(dispatch_root)
        .post(dispatch_root)
        .delete(dispatch_root)
        .patch(dispatch_root);
    let sub = get(dispatch_sub)
        .post(dispatch_sub)
        .delete(dispatch_sub)
        .patch(dispatch_sub);

    Router::new()
        .route("/tasks", root.clone())
        .route("/tasks/", root)
        .route("/tasks/{*path}", sub)
}
