/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup and cleanup
/// - Test user creation with hashed passwords
/// - JWT token generation
/// - Request/response helpers
///
/// All of it is gated on `DATABASE_URL`: when the variable is unset,
/// `TestContext::try_new` returns `None` and tests skip themselves.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::Duration;
use sqlx::PgPool;
use std::env;
use taskforge_api::app::{build_router, AppState};
use taskforge_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use taskforge_shared::auth::jwt::{create_token, Claims};
use taskforge_shared::auth::password;
use taskforge_shared::db::migrations::run_migrations;
use taskforge_shared::models::user::{CreateUser, User, UserRole};
use tower::Service as _;
use uuid::Uuid;

/// Signing secret for test tokens (32+ chars, matches the config check)
pub const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Password used for accounts created through `create_user`
pub const TEST_PASSWORD: &str = "integration-pass-1";

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: Router,
    pub user: User,
    pub token: String,
}

impl TestContext {
    /// Creates a test context against the database named by `DATABASE_URL`
    ///
    /// Returns `None` when `DATABASE_URL` is unset so the suite can run
    /// without a database.
    pub async fn try_new() -> anyhow::Result<Option<Self>> {
        let Ok(url) = env::var("DATABASE_URL") else {
            eprintln!("DATABASE_URL not set; skipping database integration test");
            return Ok(None);
        };

        let db = PgPool::connect(&url).await?;
        run_migrations(&db).await?;

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
                production: false,
            },
            database: DatabaseConfig {
                url,
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: TEST_JWT_SECRET.to_string(),
                expiry_hours: 1,
            },
        };

        let user = create_user(&db, UserRole::User).await?;
        let token = token_for(&user);

        let state = AppState::new(db.clone(), config);
        let app = build_router(state);

        Ok(Some(TestContext {
            db,
            app,
            user,
            token,
        }))
    }

    /// Returns authorization header value for the context user
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Cleans up test data (cascades to the user's tasks and projects)
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        User::delete(&self.db, self.user.id).await?;
        Ok(())
    }
}

/// Creates a user with a unique email and a properly hashed password
pub async fn create_user(db: &PgPool, role: UserRole) -> anyhow::Result<User> {
    let user = User::create(
        db,
        CreateUser {
            email: format!("test-{}@example.com", Uuid::new_v4()),
            password_hash: password::hash_password(TEST_PASSWORD)?,
            role,
        },
    )
    .await?;

    Ok(user)
}

/// Issues a valid access token for a user
pub fn token_for(user: &User) -> String {
    let claims = Claims::new(user.id, Duration::hours(1));
    create_token(&claims, TEST_JWT_SECRET).expect("token creation failed")
}

/// Sends a request and returns status plus parsed JSON body
///
/// Non-JSON (or empty) bodies come back as `Value::Null`.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }

    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().call(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

    (status, json)
}
