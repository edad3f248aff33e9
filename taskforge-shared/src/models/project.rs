/// Project model and database operations
///
/// Projects group tasks through the `project_tasks` join table. Like tasks,
/// each project is owned by exactly one user and all non-admin access is
/// scoped to that owner.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE project_status AS ENUM ('active', 'archived', 'completed');
///
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     name VARCHAR(255) NOT NULL,
///     description TEXT,
///     status project_status NOT NULL DEFAULT 'active',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE project_tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (project_id, task_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Project lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Active,
    Archived,
    Completed,
}

impl ProjectStatus {
    /// Converts status to string for responses and logging
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Archived => "archived",
            ProjectStatus::Completed => "completed",
        }
    }

    /// Parses a status from client input
    ///
    /// Returns `None` for anything outside the closed enumeration.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(ProjectStatus::Active),
            "archived" => Some(ProjectStatus::Archived),
            "completed" => Some(ProjectStatus::Completed),
            _ => None,
        }
    }
}

/// Project model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID (UUID v4)
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Project name, non-empty
    pub name: String,

    /// Optional free-text description
    pub description: Option<String>,

    /// Lifecycle status
    pub status: ProjectStatus,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

/// Listing row: project plus how many tasks it groups
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectWithTaskCount {
    /// Project ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Name
    pub name: String,

    /// Description
    pub description: Option<String>,

    /// Status
    pub status: ProjectStatus,

    /// Number of tasks linked to this project
    pub task_count: i64,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Last update time
    pub updated_at: DateTime<Utc>,
}

/// Admin listing row: project plus owner email and task count
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProjectWithOwner {
    /// Project ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Owner's email
    pub user_email: String,

    /// Name
    pub name: String,

    /// Status
    pub status: ProjectStatus,

    /// Number of tasks linked to this project
    pub task_count: i64,

    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    /// Owning user (always the authenticated caller)
    pub user_id: Uuid,

    /// Name, validated non-empty by the caller
    pub name: String,

    /// Optional description
    pub description: Option<String>,
}

/// Input for updating an existing project
///
/// Same allow-list discipline as task updates: the column set is fixed here
/// and client input only ever supplies bound values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProject {
    /// New name
    pub name: Option<String>,

    /// New description (use Some(None) to clear)
    pub description: Option<Option<String>>,

    /// New status
    pub status: Option<ProjectStatus>,
}

impl UpdateProject {
    /// True when no field was supplied
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.status.is_none()
    }
}

impl Project {
    /// Creates a new project
    pub async fn create(pool: &PgPool, data: CreateProject) -> Result<Self, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (user_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, name, description, status, created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.name)
        .bind(data.description)
        .fetch_one(pool)
        .await?;

        Ok(project)
    }

    /// Finds a project by ID, scoped to its owner
    ///
    /// Returns `None` both when the project doesn't exist and when it belongs
    /// to another user.
    pub async fn find_for_owner(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, user_id, name, description, status, created_at, updated_at
            FROM projects
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Lists projects owned by a user with task counts, newest first
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: Uuid,
    ) -> Result<Vec<ProjectWithTaskCount>, sqlx::Error> {
        let projects = sqlx::query_as::<_, ProjectWithTaskCount>(
            r#"
            SELECT p.id, p.user_id, p.name, p.description, p.status,
                   COUNT(pt.task_id) AS task_count,
                   p.created_at, p.updated_at
            FROM projects p
            LEFT JOIN project_tasks pt ON p.id = pt.project_id
            WHERE p.user_id = $1
            GROUP BY p.id
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Updates a project, scoped to its owner
    ///
    /// Only non-None fields are written; `updated_at` is stamped. Returns
    /// `None` when the project doesn't exist or belongs to another user.
    pub async fn update_for_owner(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
        data: UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE projects SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 AND user_id = $2 \
             RETURNING id, user_id, name, description, status, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Project>(&query).bind(id).bind(owner_id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }

        let project = q.fetch_optional(pool).await?;

        Ok(project)
    }

    /// Deletes a project, scoped to its owner
    ///
    /// Join rows cascade at the storage layer; linked tasks survive. Returns
    /// the deleted project's ID, or `None` when not found or not owned.
    pub async fn delete_for_owner(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Uuid>, sqlx::Error> {
        let deleted: Option<(Uuid,)> = sqlx::query_as(
            "DELETE FROM projects WHERE id = $1 AND user_id = $2 RETURNING id",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(deleted.map(|(id,)| id))
    }

    /// Lists all projects across owners with owner email (admin use)
    pub async fn list_all_with_owner(pool: &PgPool) -> Result<Vec<ProjectWithOwner>, sqlx::Error> {
        let projects = sqlx::query_as::<_, ProjectWithOwner>(
            r#"
            SELECT p.id, p.user_id, u.email AS user_email, p.name, p.status,
                   COUNT(pt.task_id) AS task_count,
                   p.created_at
            FROM projects p
            JOIN users u ON p.user_id = u.id
            LEFT JOIN project_tasks pt ON p.id = pt.project_id
            GROUP BY p.id, u.email
            ORDER BY p.created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }

    /// Counts total number of projects
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_closed_enumeration() {
        assert_eq!(ProjectStatus::parse("active"), Some(ProjectStatus::Active));
        assert_eq!(ProjectStatus::parse("archived"), Some(ProjectStatus::Archived));
        assert_eq!(ProjectStatus::parse("completed"), Some(ProjectStatus::Completed));

        assert_eq!(ProjectStatus::parse("deleted"), None);
        assert_eq!(ProjectStatus::parse("Active"), None);
    }

    #[test]
    fn test_update_project_is_empty() {
        assert!(UpdateProject::default().is_empty());

        let update = UpdateProject {
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_status_serde_rename() {
        let json = serde_json::to_string(&ProjectStatus::Archived).unwrap();
        assert_eq!(json, "\"archived\"");

        assert!(serde_json::from_str::<ProjectStatus>("\"paused\"").is_err());
    }
}
