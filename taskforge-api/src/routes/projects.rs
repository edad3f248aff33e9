/// Project endpoints
///
/// Owner-scoped project CRUD, mirroring the task surface. Projects group
/// tasks through a join table; deleting a project unlinks its tasks but
/// never deletes them.
///
/// # Endpoints
///
/// - `GET    /api/projects` - List own projects with task counts
/// - `POST   /api/projects` - Create a project
/// - `GET    /api/projects/:id` - Project detail
/// - `PUT    /api/projects/:id` - Partial update
/// - `DELETE /api/projects/:id` - Delete

use crate::{
    app::AppState,
    error::{validation_details, ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use taskforge_shared::{
    auth::middleware::AuthContext,
    models::project::{
        CreateProject, Project, ProjectStatus, ProjectWithTaskCount, UpdateProject,
    },
};
use uuid::Uuid;
use validator::Validate;

/// Create project request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    /// Name (required, non-empty)
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Optional description
    pub description: Option<String>,
}

/// Update project request
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    /// New name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    /// New description
    pub description: Option<String>,

    /// New status: active | archived | completed
    pub status: Option<String>,
}

/// Project list response
#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    /// The caller's projects with task counts, newest first
    pub projects: Vec<ProjectWithTaskCount>,

    /// Number of projects returned
    pub count: usize,
}

fn parse_status(value: &str) -> Result<ProjectStatus, ApiError> {
    ProjectStatus::parse(value).ok_or_else(|| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "status".to_string(),
            message: "Status must be one of: active, archived, completed".to_string(),
        }])
    })
}

/// Lists the caller's projects with task counts, newest first
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<ProjectListResponse>> {
    let projects = Project::list_by_owner(&state.db, auth.user_id).await?;
    let count = projects.len();

    Ok(Json(ProjectListResponse { projects, count }))
}

/// Gets a single project
///
/// # Errors
///
/// - `404 Not Found`: Project doesn't exist or belongs to another user
pub async fn get_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    let project = Project::find_for_owner(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(project))
}

/// Creates a project owned by the caller
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    req.validate().map_err(validation_details)?;

    let project = Project::create(
        &state.db,
        CreateProject {
            user_id: auth.user_id,
            name: req.name,
            description: req.description,
        },
    )
    .await?;

    tracing::info!(project_id = %project.id, user_id = %auth.user_id, "Project created");

    Ok((StatusCode::CREATED, Json(project)))
}

/// Partially updates a project
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed or no fields supplied
/// - `404 Not Found`: Project doesn't exist or belongs to another user
pub async fn update_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProjectRequest>,
) -> ApiResult<Json<Project>> {
    req.validate().map_err(validation_details)?;

    let status = match req.status.as_deref() {
        Some(value) => Some(parse_status(value)?),
        None => None,
    };

    let update = UpdateProject {
        name: req.name,
        description: req.description.map(Some),
        status,
    };

    if update.is_empty() {
        return Err(ApiError::BadRequest(
            "No updatable fields supplied".to_string(),
        ));
    }

    let project = Project::update_for_owner(&state.db, id, auth.user_id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    Ok(Json(project))
}

/// Deletes a project
///
/// Join rows cascade; linked tasks survive unowned by any project.
///
/// # Errors
///
/// - `404 Not Found`: Project doesn't exist or belongs to another user
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let deleted = Project::delete_for_owner(&state.db, id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))?;

    tracing::info!(project_id = %deleted, user_id = %auth.user_id, "Project deleted");

    Ok(Json(serde_json::json!({ "project_id": deleted })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_rejects_empty_name() {
        let req = CreateProjectRequest {
            name: String::new(),
            description: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_parse_status_rejects_unknown_value() {
        assert!(parse_status("active").is_ok());
        assert!(parse_status("archived").is_ok());
        assert!(parse_status("deleted").is_err());
    }

    #[test]
    fn test_empty_update_detected() {
        let update = UpdateProject {
            name: None,
            description: None,
            status: None,
        };
        assert!(update.is_empty());
    }
}
