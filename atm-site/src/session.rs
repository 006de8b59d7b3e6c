//! Session cookie handling and authentication extractors
//!
//! - [`CurrentUser`]: the logged-in user, if any (never rejects)
//! - [`RequireUser`]: HTML pages for contributors; anonymous requests are
//!   redirected to `/login/?next=<path>`
//! - [`RequireAdmin`]: JSON API endpoints for administrators; others get 403

use atm_common::db::User;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
    response::{IntoResponse, Response},
};
use chrono::Duration;

use crate::db::sessions;
use crate::error::{ApiError, SiteError};
use crate::pages::encode_query;
use crate::site::found;
use crate::AppState;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "atm_session";

/// Session token from the `Cookie` header
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token.to_string())
        .filter(|token| !token.is_empty())
}

/// `Set-Cookie` value establishing a session
pub fn session_cookie(token: &str, ttl: Duration) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        ttl.num_seconds()
    )
}

/// `Set-Cookie` value removing the session cookie
pub fn clear_session_cookie() -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE
    )
}

/// Accept only same-site absolute paths as a post-login destination
pub fn is_safe_next(next: &str) -> bool {
    next.starts_with('/') && !next.starts_with("//") && !next.contains('\\')
}

/// Redirect to the login page, remembering where the user was going
pub fn login_redirect(parts: &Parts) -> Response {
    let next = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    found(&format!("/login/?next={}", encode_query(next)))
}

async fn load_user(parts: &Parts, state: &AppState) -> Result<Option<User>, sqlx::Error> {
    match session_token(&parts.headers) {
        Some(token) => sessions::find_user_by_token(&state.db, &token).await,
        None => Ok(None),
    }
}

/// Logged-in user, `None` for anonymous visitors
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<User>);

impl CurrentUser {
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }

    pub fn id(&self) -> Option<i64> {
        self.0.as_ref().map(|u| u.id)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = SiteError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(load_user(parts, state).await?))
    }
}

/// Logged-in user required
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for RequireUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match load_user(parts, state).await {
            Ok(Some(user)) => Ok(RequireUser(user)),
            Ok(None) => Err(login_redirect(parts)),
            Err(e) => Err(SiteError::from(e).into_response()),
        }
    }
}

/// Logged-in administrator required
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub User);

#[async_trait]
impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match load_user(parts, state).await? {
            Some(user) if user.is_admin => Ok(RequireAdmin(user)),
            Some(_) => Err(ApiError::Forbidden(
                "You do not have permission to perform this action.".to_string(),
            )),
            None => Err(ApiError::Forbidden(
                "Authentication credentials were not provided.".to_string(),
            )),
        }
    }
}
