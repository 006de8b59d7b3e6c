//! Review pages

use atm_common::db::{Review, User};
use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use tracing::info;

use super::{found, manage_links};
use crate::db::{albums, bands, reviews};
use crate::error::{SiteError, SiteResult};
use crate::form::{FormData, FormErrors};
use crate::forms::review as review_form;
use crate::pages::{self, escape};
use crate::pagination::{calculate_pagination, PageQuery};
use crate::session::{CurrentUser, RequireUser};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reviews/list/", get(list_latest))
        .route("/review/details/:id/", get(review_details))
        .route(
            "/review/create/:album_id/:band_id/",
            get(create_form).post(create_review),
        )
        .route("/review/update/:id/", get(update_form).post(update_review))
        .route("/review/delete/confirm/:id/", get(confirm_delete))
        .route("/review/delete/:id/", get(delete_review))
}

async fn require_review(state: &AppState, id: i64) -> SiteResult<Review> {
    reviews::find(&state.db, id)
        .await?
        .ok_or_else(|| SiteError::NotFound(format!("Review {} does not exist.", id)))
}

fn render_form(
    title: &str,
    action: &str,
    user: &User,
    form: &FormData,
    errors: &FormErrors,
) -> Html<String> {
    let body = pages::form(action, &review_form::fields(form, errors), errors, "Save");
    pages::layout(title, Some(user), &body)
}

/// Album title and band name a new review is about; 404 when either is gone
async fn review_target(state: &AppState, album_id: i64, band_id: i64) -> SiteResult<String> {
    let album = albums::find(&state.db, album_id)
        .await?
        .ok_or_else(|| SiteError::NotFound(format!("Album {} does not exist.", album_id)))?;
    let band = bands::find(&state.db, band_id)
        .await?
        .ok_or_else(|| SiteError::NotFound(format!("Band {} does not exist.", band_id)))?;
    Ok(format!("Review {} - {}", band.name, album.title))
}

/// GET /reviews/list/?page=
pub async fn list_latest(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<PageQuery>,
) -> SiteResult<Html<String>> {
    let total = reviews::count(&state.db).await?;
    let pagination = calculate_pagination(total, query.requested_page());
    let page = reviews::page_latest(&state.db, pagination.offset).await?;

    let items: Vec<String> = page
        .iter()
        .map(|r| {
            format!(
                "{} ({}) - {} / {} by {}",
                pages::link(&format!("/review/details/{}/", r.id), &r.subject),
                r.rating,
                pages::link(&format!("/band/details/{}/", r.band_id), &r.band_name),
                pages::link(&format!("/album/details/{}/", r.album_id), &r.album_title),
                escape(&r.username)
            )
        })
        .collect();

    let body = format!(
        "{}{}",
        pages::list(&items, "No reviews yet."),
        pages::pagination_nav("/reviews/list/", &pagination)
    );
    Ok(pages::layout("Reviews", current.user(), &body))
}

/// GET /review/details/:id/
pub async fn review_details(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> SiteResult<Html<String>> {
    let review = reviews::find_summary(&state.db, id)
        .await?
        .ok_or_else(|| SiteError::NotFound(format!("Review {} does not exist.", id)))?;

    let info = pages::details(&[
        (
            "Band",
            pages::link(&format!("/band/details/{}/", review.band_id), &review.band_name),
        ),
        (
            "Album",
            pages::link(&format!("/album/details/{}/", review.album_id), &review.album_title),
        ),
        ("Rating", review.rating.to_string()),
        ("Author", escape(&review.username)),
        ("Added", review.added.format("%Y-%m-%d").to_string()),
    ]);

    let body = format!(
        "{}<p>{}</p>{}",
        info,
        escape(&review.description),
        manage_links(
            current.0.is_some(),
            &format!("/review/update/{}/", id),
            &format!("/review/delete/confirm/{}/", id)
        )
    );

    Ok(pages::layout(&review.subject, current.user(), &body))
}

/// GET /review/create/:album_id/:band_id/
pub async fn create_form(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path((album_id, band_id)): Path<(i64, i64)>,
) -> SiteResult<Html<String>> {
    let title = review_target(&state, album_id, band_id).await?;
    Ok(render_form(
        &title,
        &format!("/review/create/{}/{}/", album_id, band_id),
        &user,
        &FormData::new(),
        &FormErrors::new(),
    ))
}

/// POST /review/create/:album_id/:band_id/
pub async fn create_review(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path((album_id, band_id)): Path<(i64, i64)>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> SiteResult<Response> {
    let title = review_target(&state, album_id, band_id).await?;
    let form = FormData::from_pairs(pairs);

    let input = match review_form::validate(&form) {
        Ok(input) => input,
        Err(errors) => {
            return Ok(render_form(
                &title,
                &format!("/review/create/{}/{}/", album_id, band_id),
                &user,
                &form,
                &errors,
            )
            .into_response())
        }
    };

    let id = reviews::create(&state.db, &input, album_id, band_id, user.id).await?;
    info!("Review {} of album {} created by {}", id, album_id, user.username);

    Ok(found(&format!("/band/details/{}/", band_id)))
}

/// GET /review/update/:id/
pub async fn update_form(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
) -> SiteResult<Html<String>> {
    let review = require_review(&state, id).await?;
    Ok(render_form(
        &format!("Edit {}", review.subject),
        &format!("/review/update/{}/", id),
        &user,
        &review_form::initial(&review),
        &FormErrors::new(),
    ))
}

/// POST /review/update/:id/
///
/// The editing user becomes the review's author
pub async fn update_review(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> SiteResult<Response> {
    let review = require_review(&state, id).await?;
    let form = FormData::from_pairs(pairs);

    let input = match review_form::validate(&form) {
        Ok(input) => input,
        Err(errors) => {
            return Ok(render_form(
                &format!("Edit {}", review.subject),
                &format!("/review/update/{}/", id),
                &user,
                &form,
                &errors,
            )
            .into_response())
        }
    };

    reviews::update(&state.db, id, &input, user.id).await?;
    info!("Review {} updated by {}", id, user.username);

    Ok(found("/reviews/list/"))
}

/// GET /review/delete/confirm/:id/
pub async fn confirm_delete(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
) -> SiteResult<Html<String>> {
    let review = require_review(&state, id).await?;
    let body = pages::confirm_delete(
        &format!("the review {}", review.subject),
        &format!("/review/delete/{}/", id),
        &format!("/review/details/{}/", id),
    );
    Ok(pages::layout("Delete review", Some(&user), &body))
}

/// GET /review/delete/:id/
pub async fn delete_review(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
) -> SiteResult<Response> {
    if !reviews::delete(&state.db, id).await? {
        return Err(SiteError::NotFound(format!("Review {} does not exist.", id)));
    }
    info!("Review {} deleted by {}", id, user.username);
    Ok(found("/reviews/list/"))
}
