/// Application state and router builder for the blog server

use crate::config::Config;
use axum::{
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared application state
///
/// Cloned per request via Axum's `State` extractor; Arc keeps it cheap.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for session cookie operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt_secret
    }
}

/// Builds the blog router
///
/// ```text
/// /
/// ├── GET  /          # Front page, optional ?search=
/// ├── POST /          # Submit a comment, redirects home
/// ├── GET  /login     # Login form; ?logout=1 clears the session
/// └── POST /login     # Authenticate and set the session cookie
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    Router::new()
        .route("/", get(routes::index))
        .route("/", post(routes::submit_comment))
        .route("/login", get(routes::login_form))
        .route("/login", post(routes::login))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
