/// Task comment model and database operations
///
/// Comments attach free text to a task. A comment always references an
/// existing task and the user who wrote it; both references cascade on
/// delete at the storage layer.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE comments (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     comment_text TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Comment on a task
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    /// Unique comment ID (UUID v4)
    pub id: Uuid,

    /// Parent task
    pub task_id: Uuid,

    /// Author
    pub user_id: Uuid,

    /// Free-text body, non-empty
    pub comment_text: String,

    /// When the comment was written
    pub created_at: DateTime<Utc>,
}

/// Listing row: comment plus author email
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommentWithAuthor {
    /// Comment ID
    pub id: Uuid,

    /// Parent task
    pub task_id: Uuid,

    /// Author
    pub user_id: Uuid,

    /// Author's email
    pub author_email: String,

    /// Body
    pub comment_text: String,

    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Input for creating a comment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateComment {
    /// Parent task (caller must have verified visibility)
    pub task_id: Uuid,

    /// Author (always the authenticated caller)
    pub user_id: Uuid,

    /// Body, validated non-empty by the caller
    pub comment_text: String,
}

impl Comment {
    /// Creates a new comment
    ///
    /// Callers must verify the parent task is visible to the author before
    /// calling; the foreign key only guarantees the task exists.
    pub async fn create(pool: &PgPool, data: CreateComment) -> Result<Self, sqlx::Error> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (task_id, user_id, comment_text)
            VALUES ($1, $2, $3)
            RETURNING id, task_id, user_id, comment_text, created_at
            "#,
        )
        .bind(data.task_id)
        .bind(data.user_id)
        .bind(data.comment_text)
        .fetch_one(pool)
        .await?;

        Ok(comment)
    }

    /// Lists comments on a task with author emails, oldest first
    pub async fn list_by_task(
        pool: &PgPool,
        task_id: Uuid,
    ) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
        let comments = sqlx::query_as::<_, CommentWithAuthor>(
            r#"
            SELECT c.id, c.task_id, c.user_id, u.email AS author_email,
                   c.comment_text, c.created_at
            FROM comments c
            JOIN users u ON c.user_id = u.id
            WHERE c.task_id = $1
            ORDER BY c.created_at ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(comments)
    }

    /// Counts total number of comments
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM comments")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_comment_struct() {
        let create = CreateComment {
            task_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            comment_text: "Looks good".to_string(),
        };

        assert_eq!(create.comment_text, "Looks good");
    }

    #[test]
    fn test_comment_serializes_body_verbatim() {
        // Storage keeps raw text; encoding happens at the rendering boundary.
        let comment = Comment {
            id: Uuid::new_v4(),
            task_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            comment_text: "<script>alert(1)</script>".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&comment).unwrap();
        assert_eq!(json["comment_text"], "<script>alert(1)</script>");
    }
}
