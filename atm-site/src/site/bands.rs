//! Band listings, detail page and band CRUD

use atm_common::db::{Band, User};
use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use tracing::info;

use super::{found, manage_links};
use crate::db::{albums, bands, genres, labels, memberships, reviews};
use crate::error::{SiteError, SiteResult};
use crate::form::{FormData, FormErrors};
use crate::forms::band::{self as band_form, BandChoices};
use crate::pages::{self, escape, or_dash};
use crate::pagination::{calculate_pagination, PageQuery};
use crate::session::{CurrentUser, RequireUser};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bands/alphabetical/", get(list_alphabetical))
        .route("/bands/genres/:id/", get(list_by_genre))
        .route("/band/details/:id/", get(band_details))
        .route("/band/create/", get(create_form).post(create_band))
        .route("/band/update/:id/", get(update_form).post(update_band))
        .route("/band/delete/confirm/:id/", get(confirm_delete))
        .route("/band/delete/:id/", get(delete_band))
}

fn band_item(band: &Band) -> String {
    format!(
        "{} ({}, {})",
        pages::link(&format!("/band/details/{}/", band.id), &band.name),
        escape(&band.country_of_origin),
        band.status
    )
}

async fn load_choices(state: &AppState) -> SiteResult<BandChoices> {
    Ok(BandChoices {
        genres: genres::choices(&state.db).await?,
        labels: labels::choices(&state.db).await?,
    })
}

async fn require_band(state: &AppState, id: i64) -> SiteResult<Band> {
    bands::find(&state.db, id)
        .await?
        .ok_or_else(|| SiteError::NotFound(format!("Band {} does not exist.", id)))
}

fn render_form(
    title: &str,
    action: &str,
    user: &User,
    form: &FormData,
    errors: &FormErrors,
    choices: &BandChoices,
) -> Html<String> {
    let body = pages::form(action, &band_form::fields(form, errors, choices), errors, "Save");
    pages::layout(title, Some(user), &body)
}

/// GET /bands/alphabetical/?page=
pub async fn list_alphabetical(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<PageQuery>,
) -> SiteResult<Html<String>> {
    let total = bands::count(&state.db).await?;
    let pagination = calculate_pagination(total, query.requested_page());
    let page = bands::page_by_name(&state.db, pagination.offset).await?;

    let items: Vec<String> = page.iter().map(band_item).collect();
    let body = format!(
        "{}{}",
        pages::list(&items, "No bands yet."),
        pages::pagination_nav("/bands/alphabetical/", &pagination)
    );
    Ok(pages::layout("Bands A-Z", current.user(), &body))
}

/// GET /bands/genres/:id/?page=
///
/// An unknown genre shows an empty listing
pub async fn list_by_genre(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(genre_id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> SiteResult<Html<String>> {
    let title = match genres::find(&state.db, genre_id).await? {
        Some(genre) => format!("Bands playing {}", genre.name),
        None => "Bands by genre".to_string(),
    };

    let total = bands::count_by_genre(&state.db, genre_id).await?;
    let pagination = calculate_pagination(total, query.requested_page());
    let page = bands::page_by_genre(&state.db, genre_id, pagination.offset).await?;

    let items: Vec<String> = page.iter().map(band_item).collect();
    let body = format!(
        "{}{}",
        pages::list(&items, "No bands in this genre."),
        pages::pagination_nav(&format!("/bands/genres/{}/", genre_id), &pagination)
    );
    Ok(pages::layout(&title, current.user(), &body))
}

/// GET /band/details/:id/
///
/// Band with its label, genres, line-up, discography and reviews
pub async fn band_details(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> SiteResult<Html<String>> {
    let band = require_band(&state, id).await?;
    let label = labels::find(&state.db, band.current_label_id).await?;
    let band_genres = genres::for_band(&state.db, id).await?;
    let line_up = memberships::for_band(&state.db, id).await?;
    let discography = albums::for_band(&state.db, id).await?;
    let band_reviews = reviews::for_band(&state.db, id).await?;
    let logged_in = current.0.is_some();

    let label_html = match &label {
        Some(label) => pages::link(&format!("/label/details/{}/", label.id), &label.name),
        None => "-".to_string(),
    };
    let genre_html = band_genres
        .iter()
        .map(|g| pages::link(&format!("/bands/genres/{}/", g.id), &g.name))
        .collect::<Vec<_>>()
        .join(", ");

    let info = pages::details(&[
        ("Country of origin", escape(&band.country_of_origin)),
        ("Location", escape(&band.location)),
        ("Status", escape(&band.status.to_string())),
        ("Formed in", band.formed_in.to_string()),
        ("Ended in", or_dash(band.ended_in)),
        ("Genre", genre_html),
        ("Lyrical themes", escape(&band.lyrical_themes)),
        ("Current label", label_html),
    ]);

    let members: Vec<String> = line_up
        .iter()
        .map(|m| {
            let mut item = format!(
                "{} ({}) {}, {} - {}",
                pages::link(&format!("/musician/details/{}/", m.musician_id), &m.musician_name),
                escape(&m.musician_full_name),
                escape(&m.role),
                or_dash(m.year_from),
                or_dash(m.year_to)
            );
            if logged_in {
                item.push_str(&format!(
                    " {} {}",
                    pages::link(&format!("/update/musician-in-band/{}/", m.id), "Edit"),
                    pages::link(
                        &format!("/delete/musician-from-band/confirm/{}/", m.id),
                        "Remove"
                    )
                ));
            }
            item
        })
        .collect();

    let album_items: Vec<String> = discography
        .iter()
        .map(|a| {
            let mut item = format!(
                "{} ({}, {})",
                pages::link(&format!("/album/details/{}/", a.id), &a.title),
                a.album_type,
                or_dash(a.release_date)
            );
            if logged_in {
                item.push_str(&format!(
                    " {}",
                    pages::link(
                        &format!("/review/create/{}/{}/", a.id, band.id),
                        "Write a review"
                    )
                ));
            }
            item
        })
        .collect();

    let review_items: Vec<String> = band_reviews
        .iter()
        .map(|r| {
            format!(
                "{} ({}) on {} by {}",
                pages::link(&format!("/review/details/{}/", r.id), &r.subject),
                r.rating,
                escape(&r.album_title),
                escape(&r.username)
            )
        })
        .collect();

    let bio = band
        .bio
        .as_deref()
        .map(|b| format!("<p>{}</p>", escape(b)))
        .unwrap_or_default();

    let body = format!(
        "{info}{manage}{bio}<h2>Members</h2>{members}<h2>Discography</h2>{albums}<h2>Reviews</h2>{reviews}",
        info = info,
        manage = manage_links(
            logged_in,
            &format!("/band/update/{}/", band.id),
            &format!("/band/delete/confirm/{}/", band.id)
        ),
        bio = bio,
        members = pages::list(&members, "No members listed."),
        albums = pages::list(&album_items, "No albums listed."),
        reviews = pages::list(&review_items, "No reviews yet."),
    );

    Ok(pages::layout(&band.name, current.user(), &body))
}

/// GET /band/create/
pub async fn create_form(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> SiteResult<Html<String>> {
    let choices = load_choices(&state).await?;
    Ok(render_form(
        "Add band",
        "/band/create/",
        &user,
        &FormData::new(),
        &FormErrors::new(),
        &choices,
    ))
}

/// POST /band/create/
pub async fn create_band(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Form(pairs): Form<Vec<(String, String)>>,
) -> SiteResult<Response> {
    let form = FormData::from_pairs(pairs);
    let choices = load_choices(&state).await?;

    let input = match band_form::validate(&form, &choices) {
        Ok(input) => input,
        Err(errors) => {
            return Ok(
                render_form("Add band", "/band/create/", &user, &form, &errors, &choices)
                    .into_response(),
            )
        }
    };

    let id = bands::create(&state.db, &input, Some(user.id)).await?;
    info!("Band {} ({}) created by {}", id, input.name, user.username);

    Ok(found(&format!("/band/details/{}/", id)))
}

/// GET /band/update/:id/
pub async fn update_form(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
) -> SiteResult<Html<String>> {
    let band = require_band(&state, id).await?;
    let genre_ids = bands::genre_ids(&state.db, id).await?;
    let choices = load_choices(&state).await?;

    Ok(render_form(
        &format!("Edit {}", band.name),
        &format!("/band/update/{}/", id),
        &user,
        &band_form::initial(&band, &genre_ids),
        &FormErrors::new(),
        &choices,
    ))
}

/// POST /band/update/:id/
pub async fn update_band(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> SiteResult<Response> {
    let band = require_band(&state, id).await?;
    let form = FormData::from_pairs(pairs);
    let choices = load_choices(&state).await?;

    let input = match band_form::validate(&form, &choices) {
        Ok(input) => input,
        Err(errors) => {
            return Ok(render_form(
                &format!("Edit {}", band.name),
                &format!("/band/update/{}/", id),
                &user,
                &form,
                &errors,
                &choices,
            )
            .into_response())
        }
    };

    if !bands::update(&state.db, id, &input, Some(user.id)).await? {
        return Err(SiteError::NotFound(format!("Band {} does not exist.", id)));
    }
    info!("Band {} updated by {}", id, user.username);

    Ok(found(&format!("/band/details/{}/", id)))
}

/// GET /band/delete/confirm/:id/
pub async fn confirm_delete(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
) -> SiteResult<Html<String>> {
    let band = require_band(&state, id).await?;
    let body = pages::confirm_delete(
        &format!("the band {} with its albums, reviews and line-up", band.name),
        &format!("/band/delete/{}/", id),
        &format!("/band/details/{}/", id),
    );
    Ok(pages::layout("Delete band", Some(&user), &body))
}

/// GET /band/delete/:id/
pub async fn delete_band(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
) -> SiteResult<Response> {
    if !bands::delete(&state.db, id).await? {
        return Err(SiteError::NotFound(format!("Band {} does not exist.", id)));
    }
    info!("Band {} deleted by {}", id, user.username);
    Ok(found("/"))
}
