//! Login, logout, sign-up and password reset pages

use atm_common::db::User;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use tracing::{info, warn};

use super::found;
use crate::db::{sessions, users};
use crate::error::{SiteError, SiteResult};
use crate::form::{FormData, FormErrors};
use crate::forms::accounts::{self, INCORRECT_LOGIN};
use crate::pages;
use crate::session::{clear_session_cookie, is_safe_next, session_cookie, session_token, CurrentUser, RequireUser};
use crate::AppState;

/// Destination after a successful login without `next`
const LOGIN_DESTINATION: &str = "/add-board/";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login/", get(login_form).post(login))
        .route("/logout/", get(logout))
        .route("/create-account/", get(create_account_form).post(create_account))
        .route(
            "/reset-password/:user_id/",
            get(reset_password_form).post(reset_password),
        )
}

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

fn render_login(
    user: Option<&User>,
    form: &FormData,
    errors: &FormErrors,
    message: Option<&str>,
) -> Html<String> {
    let mut fields = accounts::login_fields(form, errors);
    if let Some(next) = form.raw("next").filter(|n| is_safe_next(n)) {
        fields.push(pages::hidden("next", next));
    }
    let body = format!(
        "{}{}<p>No account yet? {}</p>",
        pages::message(message),
        pages::form("/login/", &fields, errors, "Log in"),
        pages::link("/create-account/", "Create one")
    );
    pages::layout("Log in", user, &body)
}

/// GET /login/
pub async fn login_form(current: CurrentUser, Query(query): Query<NextQuery>) -> Html<String> {
    let mut form = FormData::new();
    if let Some(next) = query.next {
        form.push("next", next);
    }
    render_login(current.user(), &form, &FormErrors::new(), None)
}

/// POST /login/
///
/// Wrong credentials re-render the form with one generic message
pub async fn login(
    State(state): State<AppState>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> SiteResult<Response> {
    let form = FormData::from_pairs(pairs);

    let input = match accounts::validate_login(&form) {
        Ok(input) => input,
        Err(errors) => return Ok(render_login(None, &form, &errors, None).into_response()),
    };

    let Some(user) = users::authenticate(&state.db, &input.username, &input.password).await? else {
        warn!("Failed login attempt for user {}", input.username);
        return Ok(render_login(None, &form, &FormErrors::new(), Some(INCORRECT_LOGIN)).into_response());
    };

    let token = sessions::create_session(&state.db, user.id, state.session_ttl).await?;
    info!("User {} logged in", user.username);

    let destination = form
        .raw("next")
        .filter(|next| is_safe_next(next))
        .unwrap_or(LOGIN_DESTINATION)
        .to_string();

    Ok((
        StatusCode::FOUND,
        [
            (header::LOCATION, destination),
            (header::SET_COOKIE, session_cookie(&token, state.session_ttl)),
        ],
    )
        .into_response())
}

/// GET /logout/
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> SiteResult<Response> {
    if let Some(token) = session_token(&headers) {
        sessions::delete_session(&state.db, &token).await?;
    }

    Ok((
        StatusCode::FOUND,
        [
            (header::LOCATION, "/".to_string()),
            (header::SET_COOKIE, clear_session_cookie()),
        ],
    )
        .into_response())
}

fn render_create_account(user: Option<&User>, form: &FormData, errors: &FormErrors) -> Html<String> {
    let body = pages::form(
        "/create-account/",
        &accounts::account_fields(form, errors),
        errors,
        "Create account",
    );
    pages::layout("Create account", user, &body)
}

/// GET /create-account/
pub async fn create_account_form(current: CurrentUser) -> Html<String> {
    render_create_account(current.user(), &FormData::new(), &FormErrors::new())
}

/// POST /create-account/
pub async fn create_account(
    State(state): State<AppState>,
    current: CurrentUser,
    Form(pairs): Form<Vec<(String, String)>>,
) -> SiteResult<Response> {
    let form = FormData::from_pairs(pairs);

    let input = match accounts::validate_account(&state.db, &form).await? {
        Ok(input) => input,
        Err(errors) => {
            return Ok(render_create_account(current.user(), &form, &errors).into_response())
        }
    };

    let id = users::create_user(
        &state.db,
        &users::NewUser {
            username: &input.username,
            email: &input.email,
            first_name: &input.first_name,
            last_name: &input.last_name,
            password: &input.password,
            is_admin: false,
        },
    )
    .await?;
    info!("Account {} created for {}", id, input.username);

    Ok(found("/login/"))
}

fn render_reset(user: &User, target_id: i64, form: &FormData, errors: &FormErrors) -> Html<String> {
    let body = pages::form(
        &format!("/reset-password/{}/", target_id),
        &accounts::password_reset_fields(form, errors),
        errors,
        "Change password",
    );
    pages::layout("Reset password", Some(user), &body)
}

async fn require_target(state: &AppState, user_id: i64) -> SiteResult<User> {
    users::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| SiteError::NotFound(format!("User {} does not exist.", user_id)))
}

/// GET /reset-password/:user_id/
pub async fn reset_password_form(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(user_id): Path<i64>,
) -> SiteResult<Html<String>> {
    let target = require_target(&state, user_id).await?;
    Ok(render_reset(&user, target.id, &FormData::new(), &FormErrors::new()))
}

/// POST /reset-password/:user_id/
///
/// Sets the new password and ends the target's sessions; the caller's
/// cookie is cleared only when they reset their own password
pub async fn reset_password(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(user_id): Path<i64>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> SiteResult<Response> {
    let target = require_target(&state, user_id).await?;
    let form = FormData::from_pairs(pairs);

    let new_password = match accounts::validate_password_reset(&form) {
        Ok(password) => password,
        Err(errors) => return Ok(render_reset(&user, target.id, &form, &errors).into_response()),
    };

    users::set_password(&state.db, target.id, &new_password).await?;
    sessions::delete_for_user(&state.db, target.id).await?;
    info!("Password of {} changed by {}", target.username, user.username);

    // Only a reset of one's own password ends the caller's session
    if target.id != user.id {
        return Ok(found("/login/"));
    }

    Ok((
        StatusCode::FOUND,
        [
            (header::LOCATION, "/login/".to_string()),
            (header::SET_COOKIE, clear_session_cookie()),
        ],
    )
        .into_response())
}
