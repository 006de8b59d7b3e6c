//! Album pages

use atm_common::db::{Album, User};
use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use tracing::info;

use super::{found, manage_links};
use crate::db::{albums, bands, genres, labels, reviews};
use crate::error::{SiteError, SiteResult};
use crate::form::{FormData, FormErrors};
use crate::forms::album::{self as album_form, AlbumChoices};
use crate::pages::{self, escape, or_dash};
use crate::pagination::{calculate_pagination, PageQuery};
use crate::session::{CurrentUser, RequireUser};
use crate::AppState;

pub const DUPLICATE_ALBUM: &str = "This album already exists in database!";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/albums/last-added/", get(list_latest))
        .route("/album/details/:id/", get(album_details))
        .route("/album/create/", get(create_form).post(create_album))
        .route("/album/update/:id/", get(update_form).post(update_album))
        .route("/album/delete/confirm/:id/", get(confirm_delete))
        .route("/album/delete/:id/", get(delete_album))
}

async fn load_choices(state: &AppState) -> SiteResult<AlbumChoices> {
    Ok(AlbumChoices {
        bands: bands::choices(&state.db).await?,
        genres: genres::choices(&state.db).await?,
        labels: labels::choices(&state.db).await?,
    })
}

async fn require_album(state: &AppState, id: i64) -> SiteResult<Album> {
    albums::find(&state.db, id)
        .await?
        .ok_or_else(|| SiteError::NotFound(format!("Album {} does not exist.", id)))
}

fn render_form(
    title: &str,
    action: &str,
    user: &User,
    form: &FormData,
    errors: &FormErrors,
    choices: &AlbumChoices,
    message: Option<&str>,
) -> Html<String> {
    let body = format!(
        "{}{}",
        pages::message(message),
        pages::form(action, &album_form::fields(form, errors, choices), errors, "Save")
    );
    pages::layout(title, Some(user), &body)
}

/// GET /albums/last-added/?page=
///
/// Newest additions first
pub async fn list_latest(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<PageQuery>,
) -> SiteResult<Html<String>> {
    let total = albums::count(&state.db).await?;
    let pagination = calculate_pagination(total, query.requested_page());
    let page = albums::page_latest(&state.db, pagination.offset).await?;

    let items: Vec<String> = page
        .iter()
        .map(|a| {
            format!(
                "{} - {} ({}, {})",
                pages::link(&format!("/band/details/{}/", a.band_id), &a.band_name),
                pages::link(&format!("/album/details/{}/", a.id), &a.title),
                a.album_type,
                or_dash(a.release_date)
            )
        })
        .collect();

    let body = format!(
        "{}{}",
        pages::list(&items, "No albums yet."),
        pages::pagination_nav("/albums/last-added/", &pagination)
    );
    Ok(pages::layout("Last added albums", current.user(), &body))
}

/// GET /album/details/:id/
pub async fn album_details(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> SiteResult<Html<String>> {
    let album = albums::find_summary(&state.db, id)
        .await?
        .ok_or_else(|| SiteError::NotFound(format!("Album {} does not exist.", id)))?;
    let album_genres = genres::for_album(&state.db, id).await?;
    let album_reviews = reviews::for_album(&state.db, id).await?;
    let logged_in = current.0.is_some();

    let genre_html = album_genres
        .iter()
        .map(|g| escape(&g.name))
        .collect::<Vec<_>>()
        .join(", ");

    let info = pages::details(&[
        (
            "Band",
            pages::link(&format!("/band/details/{}/", album.band_id), &album.band_name),
        ),
        ("Type", escape(&album.album_type.to_string())),
        ("Release date", or_dash(album.release_date)),
        ("Catalog ID", escape(&album.catalog_id)),
        (
            "Label",
            pages::link(&format!("/label/details/{}/", album.label_id), &album.label_name),
        ),
        ("Format", escape(&album.format.to_string())),
        ("Genre", genre_html),
    ]);

    let review_items: Vec<String> = album_reviews
        .iter()
        .map(|r| {
            format!(
                "{} ({}) by {}",
                pages::link(&format!("/review/details/{}/", r.id), &r.subject),
                r.rating,
                escape(&r.username)
            )
        })
        .collect();

    let write_review = if logged_in {
        format!(
            "<p>{}</p>",
            pages::link(
                &format!("/review/create/{}/{}/", album.id, album.band_id),
                "Write a review"
            )
        )
    } else {
        String::new()
    };

    let body = format!(
        "{}{}<h2>Reviews</h2>{}{}",
        info,
        manage_links(
            logged_in,
            &format!("/album/update/{}/", id),
            &format!("/album/delete/confirm/{}/", id)
        ),
        pages::list(&review_items, "No reviews yet."),
        write_review
    );

    Ok(pages::layout(&album.title, current.user(), &body))
}

/// GET /album/create/
pub async fn create_form(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> SiteResult<Html<String>> {
    let choices = load_choices(&state).await?;
    Ok(render_form(
        "Add album",
        "/album/create/",
        &user,
        &FormData::new(),
        &FormErrors::new(),
        &choices,
        None,
    ))
}

/// POST /album/create/
pub async fn create_album(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Form(pairs): Form<Vec<(String, String)>>,
) -> SiteResult<Response> {
    let form = FormData::from_pairs(pairs);
    let choices = load_choices(&state).await?;

    let input = match album_form::validate(&form, &choices) {
        Ok(input) => input,
        Err(errors) => {
            return Ok(render_form(
                "Add album",
                "/album/create/",
                &user,
                &form,
                &errors,
                &choices,
                None,
            )
            .into_response())
        }
    };

    if albums::exists_by_title(&state.db, &input.title).await? {
        return Ok(render_form(
            "Add album",
            "/album/create/",
            &user,
            &form,
            &FormErrors::new(),
            &choices,
            Some(DUPLICATE_ALBUM),
        )
        .into_response());
    }

    let id = albums::create(&state.db, &input, Some(user.id)).await?;
    info!("Album {} ({}) created by {}", id, input.title, user.username);

    Ok(found(&format!("/album/details/{}/", id)))
}

/// GET /album/update/:id/
pub async fn update_form(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
) -> SiteResult<Html<String>> {
    let album = require_album(&state, id).await?;
    let genre_ids = albums::genre_ids(&state.db, id).await?;
    let choices = load_choices(&state).await?;

    Ok(render_form(
        &format!("Edit {}", album.title),
        &format!("/album/update/{}/", id),
        &user,
        &album_form::initial(&album, &genre_ids),
        &FormErrors::new(),
        &choices,
        None,
    ))
}

/// POST /album/update/:id/
pub async fn update_album(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> SiteResult<Response> {
    let album = require_album(&state, id).await?;
    let form = FormData::from_pairs(pairs);
    let choices = load_choices(&state).await?;

    let input = match album_form::validate(&form, &choices) {
        Ok(input) => input,
        Err(errors) => {
            return Ok(render_form(
                &format!("Edit {}", album.title),
                &format!("/album/update/{}/", id),
                &user,
                &form,
                &errors,
                &choices,
                None,
            )
            .into_response())
        }
    };

    albums::update(&state.db, id, &input, Some(user.id)).await?;
    info!("Album {} updated by {}", id, user.username);

    Ok(found("/"))
}

/// GET /album/delete/confirm/:id/
pub async fn confirm_delete(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
) -> SiteResult<Html<String>> {
    let album = require_album(&state, id).await?;
    let body = pages::confirm_delete(
        &format!("the album {} with its reviews", album.title),
        &format!("/album/delete/{}/", id),
        &format!("/album/details/{}/", id),
    );
    Ok(pages::layout("Delete album", Some(&user), &body))
}

/// GET /album/delete/:id/
pub async fn delete_album(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
) -> SiteResult<Response> {
    if !albums::delete(&state.db, id).await? {
        return Err(SiteError::NotFound(format!("Album {} does not exist.", id)));
    }
    info!("Album {} deleted by {}", id, user.username);
    Ok(found("/"))
}
