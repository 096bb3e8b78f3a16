/// Task endpoints
///
/// Owner-scoped CRUD plus the status toggle. Every handler takes the
/// resolved `CurrentUser` injected by the session layer and passes its id
/// into the model layer, so a task belonging to another user is
/// indistinguishable from a missing one: both answer 404, never 403.
///
/// # Endpoints
///
/// - `GET    /tasks` - List the caller's tasks, newest first
/// - `POST   /tasks` - Create a task
/// - `GET    /tasks/:id` - Fetch one task
/// - `PUT    /tasks/:id` - Partially update a task
/// - `DELETE /tasks/:id` - Delete a task
/// - `PATCH  /tasks/:id/toggle` - Flip pending/completed

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use taskdeck_shared::{
    auth::session::CurrentUser,
    models::task::{
        CreateTask, Task, TaskStatus, UpdateTask, MAX_DESCRIPTION_LEN, MAX_TITLE_LEN,
    },
};
use uuid::Uuid;

/// List tasks response
#[derive(Debug, Serialize)]
pub struct ListTasksResponse {
    /// The caller's tasks, newest-created first
    pub tasks: Vec<Task>,
}

/// Create task request
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    /// Task title (required, trimmed, non-empty)
    pub title: Option<String>,

    /// Optional description
    pub description: Option<String>,
}

/// Update task request
///
/// All fields optional; only provided fields are changed. Status arrives
/// as a string so values outside the enum produce our own 400 instead of
/// a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    /// New title
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status, "pending" or "completed"
    pub status: Option<String>,
}

/// Delete task response
#[derive(Debug, Serialize)]
pub struct DeleteTaskResponse {
    /// Whether the task was deleted
    pub deleted: bool,
}

/// Trims a title and rejects empty or oversized values
fn clean_title(raw: &str) -> Result<String, ApiError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(ApiError::BadRequest(
            "Task title cannot be empty".to_string(),
        ));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ApiError::BadRequest(format!(
            "Task title cannot exceed {} characters",
            MAX_TITLE_LEN
        )));
    }
    Ok(title.to_string())
}

/// Trims a description and rejects oversized values
fn clean_description(raw: &str) -> Result<String, ApiError> {
    let description = raw.trim();
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ApiError::BadRequest(format!(
            "Task description cannot exceed {} characters",
            MAX_DESCRIPTION_LEN
        )));
    }
    Ok(description.to_string())
}

/// Parses a status string against the enum
fn parse_status(raw: &str) -> Result<TaskStatus, ApiError> {
    TaskStatus::parse(raw)
        .ok_or_else(|| ApiError::BadRequest("Invalid status value".to_string()))
}

/// List all tasks for the authenticated user
///
/// # Endpoint
///
/// ```text
/// GET /tasks
/// ```
///
/// Returns `{ "tasks": [...] }` ordered newest-created first.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<CurrentUser>,
) -> ApiResult<Json<ListTasksResponse>> {
    let tasks = Task::list_by_owner(&state.db, auth.id).await?;

    Ok(Json(ListTasksResponse { tasks }))
}

/// Get a single task by ID
///
/// # Errors
///
/// - `404 Not Found`: task missing or owned by another user
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = Task::find_by_id_and_owner(&state.db, id, auth.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Create a new task
///
/// Title is required and trimmed; description is trimmed and defaults to
/// the empty string. Status always starts as pending.
///
/// # Endpoint
///
/// ```text
/// POST /tasks
/// Content-Type: application/json
///
/// {
///   "title": "Buy milk",
///   "description": "2 liters"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: missing/empty/oversized title or description
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<CurrentUser>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let title = clean_title(req.title.as_deref().unwrap_or(""))?;
    let description = clean_description(req.description.as_deref().unwrap_or(""))?;

    let task = Task::create(
        &state.db,
        CreateTask {
            user_id: auth.id,
            title,
            description,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Partially update a task
///
/// Only the provided fields change; the rest keep their stored values.
///
/// # Errors
///
/// - `400 Bad Request`: provided title trims to empty, provided status is
///   outside the enum, or a field exceeds its length bound
/// - `404 Not Found`: task missing or owned by another user
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    let mut update = UpdateTask::default();

    if let Some(title) = req.title.as_deref() {
        update.title = Some(clean_title(title)?);
    }
    if let Some(description) = req.description.as_deref() {
        update.description = Some(clean_description(description)?);
    }
    if let Some(status) = req.status.as_deref() {
        update.status = Some(parse_status(status)?);
    }

    let task = Task::update_by_owner(&state.db, id, auth.id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Delete a task
///
/// # Errors
///
/// - `404 Not Found`: task missing or owned by another user
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteTaskResponse>> {
    let deleted = Task::delete_by_owner(&state.db, id, auth.id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }

    Ok(Json(DeleteTaskResponse { deleted }))
}

/// Toggle a task between pending and completed
///
/// The flip is a single statement in the store, so concurrent toggles
/// serialize on the row rather than losing one of the flips.
///
/// # Errors
///
/// - `404 Not Found`: task missing or owned by another user
pub async fn toggle_task(
    State(state): State<AppState>,
    Extension(auth): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = Task::toggle_by_owner(&state.db, id, auth.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}
