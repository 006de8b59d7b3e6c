//! Genre pages

use atm_common::db::{Genre, User};
use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use tracing::info;

use super::found;
use crate::db::genres;
use crate::error::{SiteError, SiteResult};
use crate::form::{FormData, FormErrors};
use crate::forms::genre as genre_form;
use crate::pages;
use crate::pagination::{calculate_pagination, PageQuery};
use crate::session::{CurrentUser, RequireUser};
use crate::AppState;

pub const DUPLICATE_GENRE: &str = "This genre already exists!";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bands/genres/", get(list_genres))
        .route("/genre/create/", get(create_form).post(create_genre))
        .route("/genre/update/:id/", get(update_form).post(update_genre))
        .route("/genre/delete/confirm/:id/", get(confirm_delete))
        .route("/genre/delete/:id/", get(delete_genre))
}

async fn require_genre(state: &AppState, id: i64) -> SiteResult<Genre> {
    genres::find(&state.db, id)
        .await?
        .ok_or_else(|| SiteError::NotFound(format!("Genre {} does not exist.", id)))
}

/// Names already in the catalog, shown next to the create form
async fn existing_genres(state: &AppState) -> SiteResult<String> {
    let names: Vec<String> = genres::list_all(&state.db)
        .await?
        .iter()
        .map(|g| pages::escape(&g.name))
        .collect();
    Ok(format!("<h2>Existing genres</h2>{}", pages::list(&names, "None yet.")))
}

fn render_form(
    title: &str,
    action: &str,
    user: &User,
    form: &FormData,
    errors: &FormErrors,
    message: Option<&str>,
    extra: &str,
) -> Html<String> {
    let body = format!(
        "{}{}{}",
        pages::message(message),
        pages::form(action, &genre_form::fields(form, errors), errors, "Save"),
        extra
    );
    pages::layout(title, Some(user), &body)
}

/// GET /bands/genres/?page=
pub async fn list_genres(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<PageQuery>,
) -> SiteResult<Html<String>> {
    let total = genres::count(&state.db).await?;
    let pagination = calculate_pagination(total, query.requested_page());
    let page = genres::page_by_name(&state.db, pagination.offset).await?;
    let logged_in = current.0.is_some();

    let items: Vec<String> = page
        .iter()
        .map(|g| {
            let mut item = pages::link(&format!("/bands/genres/{}/", g.id), &g.name);
            if logged_in {
                item.push_str(&format!(
                    " {} {}",
                    pages::link(&format!("/genre/update/{}/", g.id), "Edit"),
                    pages::link(&format!("/genre/delete/confirm/{}/", g.id), "Delete")
                ));
            }
            item
        })
        .collect();

    let body = format!(
        "{}{}",
        pages::list(&items, "No genres yet."),
        pages::pagination_nav("/bands/genres/", &pagination)
    );
    Ok(pages::layout("Genres", current.user(), &body))
}

/// GET /genre/create/
pub async fn create_form(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> SiteResult<Html<String>> {
    let existing = existing_genres(&state).await?;
    Ok(render_form(
        "Add genre",
        "/genre/create/",
        &user,
        &FormData::new(),
        &FormErrors::new(),
        None,
        &existing,
    ))
}

/// POST /genre/create/
pub async fn create_genre(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Form(pairs): Form<Vec<(String, String)>>,
) -> SiteResult<Response> {
    let form = FormData::from_pairs(pairs);
    let (errors, message) = match genre_form::validate(&form) {
        Err(errors) => (errors, None),
        Ok(input) => {
            if !genres::exists_by_name(&state.db, &input.name).await? {
                let id = genres::create(&state.db, &input.name).await?;
                info!("Genre {} ({}) created by {}", id, input.name, user.username);
                return Ok(found("/add-board/"));
            }
            (FormErrors::new(), Some(DUPLICATE_GENRE))
        }
    };

    let existing = existing_genres(&state).await?;
    Ok(render_form(
        "Add genre",
        "/genre/create/",
        &user,
        &form,
        &errors,
        message,
        &existing,
    )
    .into_response())
}

/// GET /genre/update/:id/
pub async fn update_form(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
) -> SiteResult<Html<String>> {
    let genre = require_genre(&state, id).await?;
    Ok(render_form(
        &format!("Edit {}", genre.name),
        &format!("/genre/update/{}/", id),
        &user,
        &genre_form::initial(&genre),
        &FormErrors::new(),
        None,
        "",
    ))
}

/// POST /genre/update/:id/
pub async fn update_genre(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> SiteResult<Response> {
    let genre = require_genre(&state, id).await?;
    let form = FormData::from_pairs(pairs);

    let input = match genre_form::validate(&form) {
        Ok(input) => input,
        Err(errors) => {
            return Ok(render_form(
                &format!("Edit {}", genre.name),
                &format!("/genre/update/{}/", id),
                &user,
                &form,
                &errors,
                None,
                "",
            )
            .into_response())
        }
    };

    genres::update(&state.db, id, &input.name).await?;
    info!("Genre {} renamed to {} by {}", id, input.name, user.username);

    Ok(found("/bands/genres/"))
}

/// GET /genre/delete/confirm/:id/
pub async fn confirm_delete(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
) -> SiteResult<Html<String>> {
    let genre = require_genre(&state, id).await?;
    let body = pages::confirm_delete(
        &format!("the genre {}", genre.name),
        &format!("/genre/delete/{}/", id),
        "/bands/genres/",
    );
    Ok(pages::layout("Delete genre", Some(&user), &body))
}

/// GET /genre/delete/:id/
pub async fn delete_genre(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
) -> SiteResult<Response> {
    if !genres::delete(&state.db, id).await? {
        return Err(SiteError::NotFound(format!("Genre {} does not exist.", id)));
    }
    info!("Genre {} deleted by {}", id, user.username);
    Ok(found("/bands/genres/"))
}
