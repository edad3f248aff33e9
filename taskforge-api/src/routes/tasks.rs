/// Task endpoints
///
/// Owner-scoped task CRUD plus task comments. Every query is scoped to the
/// authenticated caller at the SQL level; a task belonging to someone else
/// answers 404, exactly like a task that doesn't exist.
///
/// # Endpoints
///
/// - `GET    /api/tasks` - List own tasks, newest first
/// - `POST   /api/tasks` - Create a task
/// - `GET    /api/tasks/:id` - Task detail with comments
/// - `PUT    /api/tasks/:id` - Partial update
/// - `DELETE /api/tasks/:id` - Delete
/// - `POST   /api/tasks/:id/comments` - Add a comment
/// - `PUT    /api/tasks/:id/projects/:project_id` - Link to a project
/// - `DELETE /api/tasks/:id/projects/:project_id` - Unlink from a project

use crate::{
    app::AppState,
    error::{validation_details, ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use taskforge_shared::{
    auth::middleware::AuthContext,
    models::{
        comment::{Comment, CommentWithAuthor, CreateComment},
        project::Project,
        task::{CreateTask, Task, TaskPriority, TaskStatus, TaskWithProject, UpdateTask},
    },
};
use uuid::Uuid;
use validator::Validate;

/// Create task request
///
/// Status and priority arrive as strings and are parsed against the closed
/// enums; anything else is a validation error, never a stored value.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Title (required, non-empty)
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Priority: low | medium | high (default: medium)
    pub priority: Option<String>,

    /// Due date in ISO format (YYYY-MM-DD)
    pub due_date: Option<String>,

    /// Optional project to link the task to (must be caller-owned)
    pub project_id: Option<Uuid>,
}

/// Update task request
///
/// All fields optional; only supplied fields are written.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    /// New title
    #[validate(length(min = 1, max = 255, message = "Title must be 1-255 characters"))]
    pub title: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status: pending | in_progress | completed | cancelled
    pub status: Option<String>,

    /// New priority: low | medium | high
    pub priority: Option<String>,

    /// New due date in ISO format (YYYY-MM-DD)
    pub due_date: Option<String>,
}

/// Create comment request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    /// Comment body (required, non-empty)
    #[validate(length(min = 1, max = 10000, message = "Comment must be 1-10000 characters"))]
    pub comment_text: String,
}

/// Task list response
#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    /// The caller's tasks with linked projects, newest first
    pub tasks: Vec<TaskWithProject>,

    /// Number of tasks returned
    pub count: usize,
}

/// Task detail response
#[derive(Debug, Serialize)]
pub struct TaskDetailResponse {
    /// The task with its linked project, if any
    pub task: TaskWithProject,

    /// Comments on the task, oldest first
    pub comments: Vec<CommentWithAuthor>,
}

fn parse_priority(value: &str) -> Result<TaskPriority, ApiError> {
    TaskPriority::parse(value).ok_or_else(|| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "priority".to_string(),
            message: "Priority must be one of: low, medium, high".to_string(),
        }])
    })
}

fn parse_status(value: &str) -> Result<TaskStatus, ApiError> {
    TaskStatus::parse(value).ok_or_else(|| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "status".to_string(),
            message: "Status must be one of: pending, in_progress, completed, cancelled"
                .to_string(),
        }])
    })
}

fn parse_due_date(value: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "due_date".to_string(),
            message: "Due date must be in YYYY-MM-DD format".to_string(),
        }])
    })
}

/// Lists the caller's tasks, newest first
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<TaskListResponse>> {
    let tasks = Task::list_by_owner(&state.db, auth.user_id).await?;
    let count = tasks.len();

    Ok(Json(TaskListResponse { tasks, count }))
}

/// Gets a single task with its comments
///
/// # Errors
///
/// - `404 Not Found`: Task doesn't exist or belongs to another user
pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskDetailResponse>> {
    let task = Task::find_for_owner_with_project(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let comments = Comment::list_by_task(&state.db, task.id).await?;

    Ok(Json(TaskDetailResponse { task, comments }))
}

/// Creates a task owned by the caller
///
/// The owner is always the authenticated caller; a `user_id` in the request
/// body is ignored. When `project_id` is supplied the project must belong to
/// the caller or the request is rejected.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, or project_id doesn't resolve to
///   a caller-owned project
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate().map_err(validation_details)?;

    let priority = match req.priority.as_deref() {
        Some(value) => parse_priority(value)?,
        None => TaskPriority::Medium,
    };

    let due_date = match req.due_date.as_deref() {
        Some(value) => Some(parse_due_date(value)?),
        None => None,
    };

    // Verify project ownership before the task exists; a project that isn't
    // visible to the caller is indistinguishable from one that doesn't exist
    if let Some(project_id) = req.project_id {
        Project::find_for_owner(&state.db, project_id, auth.user_id)
            .await?
            .ok_or_else(|| {
                ApiError::ValidationError(vec![ValidationErrorDetail {
                    field: "project_id".to_string(),
                    message: "Unknown project".to_string(),
                }])
            })?;
    }

    let task = Task::create(
        &state.db,
        CreateTask {
            user_id: auth.user_id,
            title: req.title,
            description: req.description,
            priority,
            due_date,
        },
    )
    .await?;

    if let Some(project_id) = req.project_id {
        Task::link_project(&state.db, task.id, project_id).await?;
    }

    tracing::info!(task_id = %task.id, user_id = %auth.user_id, "Task created");

    Ok((StatusCode::CREATED, Json(task)))
}

/// Partially updates a task
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or no fields supplied
/// - `404 Not Found`: Task doesn't exist or belongs to another user
pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate().map_err(validation_details)?;

    let status = match req.status.as_deref() {
        Some(value) => Some(parse_status(value)?),
        None => None,
    };

    let priority = match req.priority.as_deref() {
        Some(value) => Some(parse_priority(value)?),
        None => None,
    };

    let due_date = match req.due_date.as_deref() {
        Some(value) => Some(Some(parse_due_date(value)?)),
        None => None,
    };

    let update = UpdateTask {
        title: req.title,
        description: req.description.map(Some),
        status,
        priority,
        due_date,
    };

    if update.is_empty() {
        return Err(ApiError::BadRequest(
            "No updatable fields supplied".to_string(),
        ));
    }

    let task = Task::update_for_owner(&state.db, id, auth.user_id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task))
}

/// Deletes a task
///
/// Comments and project links cascade at the storage layer.
///
/// # Errors
///
/// - `404 Not Found`: Task doesn't exist or belongs to another user
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let deleted = Task::delete_for_owner(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    tracing::info!(task_id = %deleted, user_id = %auth.user_id, "Task deleted");

    Ok(Json(serde_json::json!({ "task_id": deleted })))
}

/// Adds a comment to a task
///
/// The parent task must be visible to the caller, so commenting can't
/// confirm a foreign task's existence.
///
/// # Errors
///
/// - `400 Bad Request`: Empty comment
/// - `404 Not Found`: Task doesn't exist or belongs to another user
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    req.validate().map_err(validation_details)?;

    let task = Task::find_for_owner(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let comment = Comment::create(
        &state.db,
        CreateComment {
            task_id: task.id,
            user_id: auth.user_id,
            comment_text: req.comment_text,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// Links a task to a project
///
/// Both the task and the project must be visible to the caller; either one
/// missing answers 404. Linking an already-linked pair is a no-op.
///
/// # Errors
///
/// - `404 Not Found`: Task or project doesn't exist or belongs to another
///   user
pub async fn link_task_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((id, project_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<serde_json::Value>> {
    let task = Task::find_for_owner(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Project::find_for_owner(&state.db, project_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Task::link_project(&state.db, task.id, project_id).await?;

    tracing::info!(task_id = %task.id, project_id = %project_id, user_id = %auth.user_id, "Task linked to project");

    Ok(Json(serde_json::json!({
        "task_id": task.id,
        "project_id": project_id,
    })))
}

/// Unlinks a task from a project
///
/// Removes only the join row; the task and the project both survive.
///
/// # Errors
///
/// - `404 Not Found`: Task doesn't exist, belongs to another user, or isn't
///   linked to the given project
pub async fn unlink_task_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((id, project_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<serde_json::Value>> {
    let task = Task::find_for_owner(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    let removed = Task::unlink_project(&state.db, task.id, project_id).await?;
    if !removed {
        return Err(ApiError::NotFound("Project link not found".to_string()));
    }

    tracing::info!(task_id = %task.id, project_id = %project_id, user_id = %auth.user_id, "Task unlinked from project");

    Ok(Json(serde_json::json!({
        "task_id": task.id,
        "project_id": project_id,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_rejects_empty_title() {
        let req = CreateTaskRequest {
            title: String::new(),
            description: None,
            priority: None,
            due_date: None,
            project_id: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_parse_priority_rejects_unknown_value() {
        assert!(parse_priority("medium").is_ok());
        assert!(parse_priority("urgent").is_err());
        assert!(parse_priority("high'; DROP TABLE tasks; --").is_err());
    }

    #[test]
    fn test_parse_status_rejects_unknown_value() {
        assert!(parse_status("in_progress").is_ok());
        assert!(parse_status("done").is_err());
    }

    #[test]
    fn test_parse_due_date() {
        assert_eq!(
            parse_due_date("2025-06-01").unwrap(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );
        assert!(parse_due_date("06/01/2025").is_err());
        assert!(parse_due_date("not-a-date").is_err());
    }

    #[test]
    fn test_empty_update_detected() {
        let req = UpdateTaskRequest::default();
        let update = UpdateTask {
            title: req.title,
            description: req.description.map(Some),
            status: None,
            priority: None,
            due_date: None,
        };
        assert!(update.is_empty());
    }

    #[test]
    fn test_comment_request_rejects_empty_body() {
        let req = CreateCommentRequest {
            comment_text: String::new(),
        };
        assert!(req.validate().is_err());
    }
}
