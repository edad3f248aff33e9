/// Database models for TaskForge
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts with role-based access
/// - `task`: Tasks owned by a single user
/// - `project`: Projects grouping tasks via a join table
/// - `comment`: Comments attached to tasks
/// - `post`: Blog posts, blog comments, and blog accounts
///
/// # Example
///
/// ```no_run
/// use taskforge_shared::models::user::{User, CreateUser, UserRole};
/// use taskforge_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: UserRole::User,
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod comment;
pub mod post;
pub mod project;
pub mod task;
pub mod user;
