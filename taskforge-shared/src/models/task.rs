/// Task model and database operations
///
/// Tasks are the primary resource of the TaskForge API. Each task is owned by
/// exactly one user; every read or mutation outside admin listings is scoped
/// to that owner.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('pending', 'in_progress', 'completed', 'cancelled');
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'pending',
///     priority task_priority NOT NULL DEFAULT 'medium',
///     due_date DATE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskforge_shared::models::task::{Task, CreateTask, TaskPriority};
/// use taskforge_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example(owner: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     user_id: owner,
///     title: "Write release notes".to_string(),
///     description: None,
///     priority: TaskPriority::High,
///     due_date: None,
/// }).await?;
///
/// // Owner-scoped lookup: returns None for anyone else's task
/// let mine = Task::find_for_owner(&pool, task.id, owner).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Task lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started
    Pending,

    /// Being worked on
    InProgress,

    /// Finished
    Completed,

    /// Abandoned
    Cancelled,
}

impl TaskStatus {
    /// Converts status to string for responses and logging
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    /// Parses a status from client input
    ///
    /// Returns `None` for anything outside the closed enumeration.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(TaskStatus::Pending),
            "in_progress" => Some(TaskStatus::InProgress),
            "completed" => Some(TaskStatus::Completed),
            "cancelled" => Some(TaskStatus::Cancelled),
            _ => None,
        }
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    /// Converts priority to string for responses and logging
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }

    /// Parses a priority from client input
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(TaskPriority::Low),
            "medium" => Some(TaskPriority::Medium),
            "high" => Some(TaskPriority::High),
            _ => None,
        }
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Short title, non-empty
    pub title: String,

    /// Optional free-text description
    pub description: Option<String>,

    /// Lifecycle status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Optional due date
    pub due_date: Option<NaiveDate>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Owning user (always the authenticated caller)
    pub user_id: Uuid,

    /// Title, validated non-empty by the caller
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Priority (defaults to medium at the route layer)
    pub priority: TaskPriority,

    /// Optional due date
    pub due_date: Option<NaiveDate>,
}

/// Input for updating an existing task
///
/// All fields are optional; only supplied fields are written. The set of
/// updatable columns is fixed here — client input never contributes SQL text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTask {
    /// New title
    pub title: Option<String>,

    /// New description (use Some(None) to clear)
    pub description: Option<Option<String>>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New priority
    pub priority: Option<TaskPriority>,

    /// New due date (use Some(None) to clear)
    pub due_date: Option<Option<NaiveDate>>,
}

impl UpdateTask {
    /// True when no field was supplied
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }
}

/// Owner-facing row: task plus its linked project, if any
///
/// The task surface treats a task as linked to at most one project; the
/// join columns come back NULL for unlinked tasks.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskWithProject {
    /// Task ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Optional due date
    pub due_date: Option<NaiveDate>,

    /// Linked project, when the task belongs to one
    pub project_id: Option<Uuid>,

    /// Linked project's name
    pub project_name: Option<String>,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Admin listing row: task plus owner email and comment count
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskWithOwner {
    /// Task ID
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Owner's email
    pub user_email: String,

    /// Title
    pub title: String,

    /// Status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Number of comments on this task
    pub comment_count: i64,

    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Counts of tasks grouped by status, for admin statistics
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskStatusCounts {
    pub pending: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub cancelled: i64,
}

impl Task {
    /// Creates a new task
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, title, description, priority, due_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, title, description, status, priority, due_date,
                      created_at, updated_at
            "#,
        )
        .bind(data.user_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.priority)
        .bind(data.due_date)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID regardless of owner (admin use only)
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, status, priority, due_date,
                   created_at, updated_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID, scoped to its owner
    ///
    /// Returns `None` both when the task doesn't exist and when it belongs to
    /// another user, so callers can answer 404 without leaking existence.
    pub async fn find_for_owner(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, status, priority, due_date,
                   created_at, updated_at
            FROM tasks
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists tasks owned by a user with their linked projects, newest first
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: Uuid,
    ) -> Result<Vec<TaskWithProject>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, TaskWithProject>(
            r#"
            SELECT t.id, t.user_id, t.title, t.description, t.status, t.priority,
                   t.due_date, pt.project_id, p.name AS project_name,
                   t.created_at, t.updated_at
            FROM tasks t
            LEFT JOIN project_tasks pt ON t.id = pt.task_id
            LEFT JOIN projects p ON pt.project_id = p.id
            WHERE t.user_id = $1
            ORDER BY t.created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Finds a task with its linked project, scoped to its owner
    ///
    /// Same visibility rule as [`Task::find_for_owner`]: `None` for absent
    /// and foreign tasks alike.
    pub async fn find_for_owner_with_project(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<TaskWithProject>, sqlx::Error> {
        let task = sqlx::query_as::<_, TaskWithProject>(
            r#"
            SELECT t.id, t.user_id, t.title, t.description, t.status, t.priority,
                   t.due_date, pt.project_id, p.name AS project_name,
                   t.created_at, t.updated_at
            FROM tasks t
            LEFT JOIN project_tasks pt ON t.id = pt.task_id
            LEFT JOIN projects p ON pt.project_id = p.id
            WHERE t.id = $1 AND t.user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Updates a task, scoped to its owner
    ///
    /// Only non-None fields in `data` are written; `updated_at` is stamped.
    /// The column list is fixed at compile time and values are bound, never
    /// interpolated. Returns `None` when the task doesn't exist or belongs to
    /// another user.
    pub async fn update_for_owner(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
        data: UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build the SET clause from the allow-list of updatable columns
        let mut query = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 2;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.status.is_some() {
            bind_count += 1;
            query.push_str(&format!(", status = ${}", bind_count));
        }
        if data.priority.is_some() {
            bind_count += 1;
            query.push_str(&format!(", priority = ${}", bind_count));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            query.push_str(&format!(", due_date = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 AND user_id = $2 \
             RETURNING id, user_id, title, description, status, priority, due_date, \
             created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Task>(&query).bind(id).bind(owner_id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(status) = data.status {
            q = q.bind(status);
        }
        if let Some(priority) = data.priority {
            q = q.bind(priority);
        }
        if let Some(due_date) = data.due_date {
            q = q.bind(due_date);
        }

        let task = q.fetch_optional(pool).await?;

        Ok(task)
    }

    /// Deletes a task, scoped to its owner
    ///
    /// Join rows and comments cascade at the storage layer. Returns the
    /// deleted task's ID, or `None` when it doesn't exist or isn't owned by
    /// the caller.
    pub async fn delete_for_owner(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<Uuid>, sqlx::Error> {
        let deleted: Option<(Uuid,)> = sqlx::query_as(
            "DELETE FROM tasks WHERE id = $1 AND user_id = $2 RETURNING id",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

        Ok(deleted.map(|(id,)| id))
    }

    /// Links a task to a project via the join table
    pub async fn link_project(
        pool: &PgPool,
        task_id: Uuid,
        project_id: Uuid,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO project_tasks (project_id, task_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(project_id)
        .bind(task_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Removes the link between a task and a project
    ///
    /// Returns `false` when no such link existed. Neither the task nor the
    /// project is touched.
    pub async fn unlink_project(
        pool: &PgPool,
        task_id: Uuid,
        project_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM project_tasks WHERE task_id = $1 AND project_id = $2",
        )
        .bind(task_id)
        .bind(project_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists all tasks across owners with owner email (admin use)
    pub async fn list_all_with_owner(pool: &PgPool) -> Result<Vec<TaskWithOwner>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, TaskWithOwner>(
            r#"
            SELECT t.id, t.user_id, u.email AS user_email, t.title, t.status, t.priority,
                   (SELECT COUNT(*) FROM comments c WHERE c.task_id = t.id) AS comment_count,
                   t.created_at
            FROM tasks t
            JOIN users u ON t.user_id = u.id
            ORDER BY t.created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Counts total number of tasks
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Counts tasks grouped by status
    pub async fn count_by_status(pool: &PgPool) -> Result<TaskStatusCounts, sqlx::Error> {
        let counts = sqlx::query_as::<_, TaskStatusCounts>(
            r#"
            SELECT
                COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'in_progress') AS in_progress,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed,
                COUNT(*) FILTER (WHERE status = 'cancelled') AS cancelled
            FROM tasks
            "#,
        )
        .fetch_one(pool)
        .await?;

        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_closed_enumeration() {
        assert_eq!(TaskStatus::parse("pending"), Some(TaskStatus::Pending));
        assert_eq!(TaskStatus::parse("in_progress"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::parse("completed"), Some(TaskStatus::Completed));
        assert_eq!(TaskStatus::parse("cancelled"), Some(TaskStatus::Cancelled));

        assert_eq!(TaskStatus::parse("done"), None);
        assert_eq!(TaskStatus::parse("IN_PROGRESS"), None);
        assert_eq!(TaskStatus::parse(""), None);
    }

    #[test]
    fn test_priority_parse_closed_enumeration() {
        assert_eq!(TaskPriority::parse("low"), Some(TaskPriority::Low));
        assert_eq!(TaskPriority::parse("medium"), Some(TaskPriority::Medium));
        assert_eq!(TaskPriority::parse("high"), Some(TaskPriority::High));

        assert_eq!(TaskPriority::parse("urgent"), None);
        assert_eq!(TaskPriority::parse("'; DROP TABLE tasks; --"), None);
    }

    #[test]
    fn test_status_serde_snake_case() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");

        let status: TaskStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(status, TaskStatus::Cancelled);

        assert!(serde_json::from_str::<TaskStatus>("\"deleted\"").is_err());
    }

    #[test]
    fn test_update_task_is_empty() {
        assert!(UpdateTask::default().is_empty());

        let update = UpdateTask {
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        assert!(!update.is_empty());

        let clear_due = UpdateTask {
            due_date: Some(None),
            ..Default::default()
        };
        assert!(!clear_due.is_empty());
    }

    #[test]
    fn test_unlinked_task_serializes_null_project() {
        let task = TaskWithProject {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "Write release notes".to_string(),
            description: None,
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            due_date: None,
            project_id: None,
            project_name: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&task).unwrap();
        assert!(json["project_id"].is_null());
        assert!(json["project_name"].is_null());
    }
}
