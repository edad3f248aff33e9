/// Admin endpoints
///
/// Cross-owner listings and user management. Authentication alone is not
/// enough here: every handler names and checks the capability it exercises
/// before touching data, so a missing check is a missing line in the
/// handler, not a silently-permissive route.
///
/// # Endpoints
///
/// - `GET    /api/admin/stats` - Entity and status counts
/// - `GET    /api/admin/users` - All users with resource counts
/// - `GET    /api/admin/tasks` - All tasks with owner emails
/// - `GET    /api/admin/projects` - All projects with owner emails
/// - `PUT    /api/admin/users/:id/role` - Change a user's role
/// - `DELETE /api/admin/users/:id` - Delete a user and their data

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use taskforge_shared::{
    auth::{
        authorization::{requires, Capability},
        middleware::AuthContext,
    },
    models::{
        comment::Comment,
        project::{Project, ProjectWithOwner},
        task::{Task, TaskStatusCounts, TaskWithOwner},
        user::{User, UserProfile, UserRole, UserWithCounts},
    },
};
use uuid::Uuid;

/// System statistics response
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Total user count
    pub users: i64,

    /// Total task count
    pub tasks: i64,

    /// Total project count
    pub projects: i64,

    /// Total comment count
    pub comments: i64,

    /// Tasks broken down by status
    pub tasks_by_status: TaskStatusCounts,
}

/// Role update request
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    /// New role: user | admin
    pub role: String,
}

/// System statistics
pub async fn stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<StatsResponse>> {
    requires(&auth, Capability::AdminReadAllUsers)?;

    let users = User::count(&state.db).await?;
    let tasks = Task::count(&state.db).await?;
    let projects = Project::count(&state.db).await?;
    let comments = Comment::count(&state.db).await?;
    let tasks_by_status = Task::count_by_status(&state.db).await?;

    Ok(Json(StatsResponse {
        users,
        tasks,
        projects,
        comments,
        tasks_by_status,
    }))
}

/// Lists all users with their task and project counts
pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<UserWithCounts>>> {
    requires(&auth, Capability::AdminReadAllUsers)?;

    let users = User::list_with_counts(&state.db).await?;

    Ok(Json(users))
}

/// Lists all tasks across owners
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<TaskWithOwner>>> {
    requires(&auth, Capability::AdminReadAllTasks)?;

    let tasks = Task::list_all_with_owner(&state.db).await?;

    Ok(Json(tasks))
}

/// Lists all projects across owners
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<ProjectWithOwner>>> {
    requires(&auth, Capability::AdminReadAllProjects)?;

    let projects = Project::list_all_with_owner(&state.db).await?;

    Ok(Json(projects))
}

/// Changes a user's role
///
/// The role arrives as a string and must parse against the closed role
/// enum.
///
/// # Errors
///
/// - `400 Bad Request`: Unknown role value
/// - `403 Forbidden`: Caller lacks the user-management capability
/// - `404 Not Found`: No such user
pub async fn update_user_role(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRoleRequest>,
) -> ApiResult<Json<UserProfile>> {
    requires(&auth, Capability::AdminManageUsers)?;

    let role = UserRole::parse(&req.role).ok_or_else(|| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "role".to_string(),
            message: "Role must be one of: user, admin".to_string(),
        }])
    })?;

    let user = User::update_role(&state.db, id, role)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    tracing::info!(user_id = %user.id, role = %role.as_str(), admin_id = %auth.user_id, "User role changed");

    Ok(Json(user.into()))
}

/// Deletes a user and all their data
///
/// Tasks, projects, and comments cascade at the storage layer. Admins
/// cannot delete their own account through this endpoint.
///
/// # Errors
///
/// - `400 Bad Request`: Attempt to delete own account
/// - `403 Forbidden`: Caller lacks the user-management capability
/// - `404 Not Found`: No such user
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    requires(&auth, Capability::AdminManageUsers)?;

    if id == auth.user_id {
        return Err(ApiError::BadRequest(
            "Cannot delete your own account".to_string(),
        ));
    }

    let deleted = User::delete(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id = %id, admin_id = %auth.user_id, "User deleted");

    Ok(Json(serde_json::json!({ "user_id": id })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn context_with_role(role: UserRole) -> AuthContext {
        AuthContext::from_user(&User {
            id: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            password_hash: "hash".to_string(),
            role,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    #[test]
    fn test_regular_user_denied_every_admin_capability() {
        let auth = context_with_role(UserRole::User);
        assert!(requires(&auth, Capability::AdminReadAllUsers).is_err());
        assert!(requires(&auth, Capability::AdminReadAllTasks).is_err());
        assert!(requires(&auth, Capability::AdminReadAllProjects).is_err());
        assert!(requires(&auth, Capability::AdminManageUsers).is_err());
    }

    #[test]
    fn test_admin_granted_admin_capabilities() {
        let auth = context_with_role(UserRole::Admin);
        assert!(requires(&auth, Capability::AdminReadAllUsers).is_ok());
        assert!(requires(&auth, Capability::AdminManageUsers).is_ok());
    }

    #[test]
    fn test_role_request_rejects_unknown_role() {
        assert!(UserRole::parse("superadmin").is_none());
        assert!(UserRole::parse("admin").is_some());
    }
}
