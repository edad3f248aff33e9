/// Blog models and database operations
///
/// Entities backing the blog front-end: posts, their comments, and blog
/// accounts. Search runs as a prepared statement over title and content;
/// nothing from the query string ever becomes SQL text.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE posts (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(255) NOT NULL,
///     content TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE post_comments (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     post_id UUID NOT NULL REFERENCES posts(id) ON DELETE CASCADE,
///     author VARCHAR(100) NOT NULL DEFAULT 'Anonymous',
///     comment_text TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
///
/// CREATE TABLE blog_users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username VARCHAR(100) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Blog post
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    /// Unique post ID (UUID v4)
    pub id: Uuid,

    /// Title
    pub title: String,

    /// Body text
    pub content: String,

    /// Publication time
    pub created_at: DateTime<Utc>,
}

/// Comment on a blog post
///
/// Blog comments carry a free-form author name rather than an account
/// reference; anonymous commenting is allowed.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PostComment {
    /// Unique comment ID (UUID v4)
    pub id: Uuid,

    /// Parent post
    pub post_id: Uuid,

    /// Display name supplied by the commenter
    pub author: String,

    /// Body
    pub comment_text: String,

    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Blog account used for the admin login page
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BlogUser {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Login name, unique
    pub username: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Account creation time
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Lists all posts, newest first
    pub async fn list_recent(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, created_at
            FROM posts
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(posts)
    }

    /// Searches posts by title or content
    ///
    /// The query string is passed as a bound parameter to a LIKE pattern;
    /// a value containing quotes cannot alter the statement's structure.
    pub async fn search(pool: &PgPool, query: &str) -> Result<Vec<Self>, sqlx::Error> {
        let pattern = format!("%{}%", query);

        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, created_at
            FROM posts
            WHERE title ILIKE $1 OR content ILIKE $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(pattern)
        .fetch_all(pool)
        .await?;

        Ok(posts)
    }

    /// Finds a post by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, content, created_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(post)
    }

    /// Counts total number of posts
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

impl PostComment {
    /// Lists comments on a post, newest first
    pub async fn list_by_post(pool: &PgPool, post_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let comments = sqlx::query_as::<_, PostComment>(
            r#"
            SELECT id, post_id, author, comment_text, created_at
            FROM post_comments
            WHERE post_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(post_id)
        .fetch_all(pool)
        .await?;

        Ok(comments)
    }

    /// Adds a comment to a post
    ///
    /// Returns `None` when the post doesn't exist. Author defaults to
    /// "Anonymous" when not supplied.
    pub async fn create(
        pool: &PgPool,
        post_id: Uuid,
        author: Option<&str>,
        comment_text: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        if Post::find_by_id(pool, post_id).await?.is_none() {
            return Ok(None);
        }

        let comment = sqlx::query_as::<_, PostComment>(
            r#"
            INSERT INTO post_comments (post_id, author, comment_text)
            VALUES ($1, $2, $3)
            RETURNING id, post_id, author, comment_text, created_at
            "#,
        )
        .bind(post_id)
        .bind(author.unwrap_or("Anonymous"))
        .bind(comment_text)
        .fetch_one(pool)
        .await?;

        Ok(Some(comment))
    }
}

impl BlogUser {
    /// Finds a blog account by ID
    ///
    /// Returns `None` when no account exists with the given ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, BlogUser>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM blog_users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a blog account by username
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, BlogUser>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM blog_users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_struct_roundtrip() {
        let post = Post {
            id: Uuid::new_v4(),
            title: "Hello".to_string(),
            content: "World".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&post).unwrap();
        let back: Post = serde_json::from_str(&json).unwrap();
        assert_eq!(back.title, "Hello");
    }

    #[test]
    fn test_search_pattern_keeps_quotes_as_data() {
        // The pattern is bound, not interpolated; this just pins down the
        // shape handed to the driver.
        let query = "' OR '1'='1";
        let pattern = format!("%{}%", query);
        assert_eq!(pattern, "%' OR '1'='1%");
    }
}
