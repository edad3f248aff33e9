/// Page handlers for the blog
///
/// All SQL runs through the shared models as prepared statements, every
/// rendered value passes through output encoding, and identity is a signed
/// JWT carried in an HttpOnly cookie. Logging out just clears the cookie;
/// there is no server-side session to tear down.

use crate::{
    app::AppState,
    error::{BlogError, BlogResult},
    render,
};
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use chrono::Duration;
use serde::Deserialize;
use taskforge_shared::{
    auth::{jwt, password},
    models::post::{BlogUser, Post, PostComment},
};
use uuid::Uuid;

/// Session cookie name
const SESSION_COOKIE: &str = "taskforge_session";

/// Session lifetime
const SESSION_HOURS: i64 = 24;

/// Front page query parameters
#[derive(Debug, Deserialize)]
pub struct IndexParams {
    /// Optional search term
    pub search: Option<String>,
}

/// Comment form body
#[derive(Debug, Deserialize)]
pub struct CommentForm {
    /// Post to comment on
    pub post_id: Uuid,

    /// Comment body
    pub comment: String,

    /// Optional author name
    pub author: Option<String>,
}

/// Login page query parameters
#[derive(Debug, Deserialize)]
pub struct LoginParams {
    /// Present when the user asked to log out
    pub logout: Option<String>,
}

/// Login form body
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    /// Username
    pub username: String,

    /// Password
    pub password: String,
}

/// Reads the signed-in username from the session cookie, if any
///
/// An invalid or expired cookie is treated the same as no cookie; pages
/// that don't require identity render anonymously rather than failing.
async fn session_username(state: &AppState, headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;

    let token = cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then_some(value)
    })?;

    let claims = jwt::validate_token(token, state.jwt_secret()).ok()?;

    let user = BlogUser::find_by_id(&state.db, claims.sub).await.ok()??;
    Some(user.username)
}

fn session_cookie(token: &str) -> HeaderValue {
    let value = format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
        SESSION_COOKIE,
        token,
        SESSION_HOURS * 3600
    );
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static(""))
}

fn clear_session_cookie() -> HeaderValue {
    HeaderValue::from_static("taskforge_session=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0")
}

/// Front page: recent posts, or search results when `?search=` is present
///
/// The search term is bound into a prepared LIKE query and HTML-escaped
/// when echoed back above the results.
pub async fn index(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<IndexParams>,
) -> BlogResult<Html<String>> {
    let username = session_username(&state, &headers).await;

    let search = params
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let posts = match search {
        Some(term) => Post::search(&state.db, term).await?,
        None => Post::list_recent(&state.db).await?,
    };

    let mut posts_with_comments = Vec::with_capacity(posts.len());
    for post in posts {
        let comments = PostComment::list_by_post(&state.db, post.id).await?;
        posts_with_comments.push((post, comments));
    }

    Ok(Html(render::index_page(
        username.as_deref(),
        search,
        &posts_with_comments,
    )))
}

/// Accepts a comment submission and redirects back to the front page
///
/// The body and author name are stored verbatim through bound parameters;
/// encoding happens at render time.
pub async fn submit_comment(
    State(state): State<AppState>,
    Form(form): Form<CommentForm>,
) -> BlogResult<Redirect> {
    let comment_text = form.comment.trim();
    if comment_text.is_empty() {
        return Err(BlogError::BadRequest("Comment cannot be empty".to_string()));
    }

    let author = form
        .author
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty());

    PostComment::create(&state.db, form.post_id, author, comment_text)
        .await?
        .ok_or_else(|| BlogError::NotFound("Post not found".to_string()))?;

    Ok(Redirect::to("/"))
}

/// Login form; `?logout=1` clears the session cookie and redirects home
pub async fn login_form(Query(params): Query<LoginParams>) -> Response {
    if params.logout.is_some() {
        let mut response = Redirect::to("/").into_response();
        response
            .headers_mut()
            .insert(header::SET_COOKIE, clear_session_cookie());
        return response;
    }

    Html(render::login_page(None)).into_response()
}

/// Authenticates a blog author and sets the session cookie
///
/// Failures re-render the form with a fixed message; unknown usernames and
/// wrong passwords are indistinguishable.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> BlogResult<Response> {
    let failed = || {
        (
            StatusCode::UNAUTHORIZED,
            Html(render::login_page(Some("Invalid username or password"))),
        )
            .into_response()
    };

    let user = match BlogUser::find_by_username(&state.db, &form.username).await? {
        Some(user) => user,
        None => return Ok(failed()),
    };

    let valid = password::verify_password(&form.password, &user.password_hash)
        .map_err(|e| BlogError::InternalError(format!("Password verification failed: {}", e)))?;

    if !valid {
        return Ok(failed());
    }

    let claims = jwt::Claims::new(user.id, Duration::hours(SESSION_HOURS));
    let token = jwt::create_token(&claims, state.jwt_secret())
        .map_err(|e| BlogError::InternalError(format!("Token creation failed: {}", e)))?;

    tracing::info!(user_id = %user.id, "Blog author signed in");

    let mut response = Redirect::to("/").into_response();
    response
        .headers_mut()
        .insert(header::SET_COOKIE, session_cookie(&token));

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc.def.ghi");
        let value = cookie.to_str().unwrap();
        assert!(value.starts_with("taskforge_session=abc.def.ghi"));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("SameSite=Lax"));
    }

    #[test]
    fn test_clear_cookie_expires_immediately() {
        let cookie = clear_session_cookie();
        let value = cookie.to_str().unwrap();
        assert!(value.contains("Max-Age=0"));
        assert!(value.starts_with("taskforge_session=;"));
    }
}
