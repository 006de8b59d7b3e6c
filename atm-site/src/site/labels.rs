//! Record label pages

use atm_common::db::{Label, User};
use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use tracing::info;

use super::{found, manage_links};
use crate::db::{albums, bands, labels};
use crate::error::{SiteError, SiteResult};
use crate::form::{FormData, FormErrors};
use crate::forms::label as label_form;
use crate::pages::{self, escape, or_dash};
use crate::pagination::{calculate_pagination, PageQuery};
use crate::session::{CurrentUser, RequireUser};
use crate::AppState;

pub const DUPLICATE_LABEL: &str = "This label already exists in database. You can update it!";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/labels/", get(list_labels))
        .route("/label/details/:id/", get(label_details))
        .route("/label/create/", get(create_form).post(create_label))
        .route("/label/update/:id/", get(update_form).post(update_label))
        .route("/label/delete/confirm/:id/", get(confirm_delete))
        .route("/label/delete/:id/", get(delete_label))
}

async fn require_label(state: &AppState, id: i64) -> SiteResult<Label> {
    labels::find(&state.db, id)
        .await?
        .ok_or_else(|| SiteError::NotFound(format!("Label {} does not exist.", id)))
}

fn render_form(
    title: &str,
    action: &str,
    user: &User,
    form: &FormData,
    errors: &FormErrors,
    message: Option<&str>,
) -> Html<String> {
    let body = format!(
        "{}{}",
        pages::message(message),
        pages::form(action, &label_form::fields(form, errors), errors, "Save")
    );
    pages::layout(title, Some(user), &body)
}

/// GET /labels/?page=
pub async fn list_labels(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<PageQuery>,
) -> SiteResult<Html<String>> {
    let total = labels::count(&state.db).await?;
    let pagination = calculate_pagination(total, query.requested_page());
    let page = labels::page_by_name(&state.db, pagination.offset).await?;

    let items: Vec<String> = page
        .iter()
        .map(|l| {
            format!(
                "{} ({}, {})",
                pages::link(&format!("/label/details/{}/", l.id), &l.name),
                escape(&l.country),
                l.status
            )
        })
        .collect();

    let body = format!(
        "{}{}",
        pages::list(&items, "No labels yet."),
        pages::pagination_nav("/labels/", &pagination)
    );
    Ok(pages::layout("Labels", current.user(), &body))
}

/// GET /label/details/:id/
///
/// Label with the bands signed to it and the albums it released
pub async fn label_details(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> SiteResult<Html<String>> {
    let label = require_label(&state, id).await?;
    let roster = bands::for_label(&state.db, id).await?;
    let releases = albums::for_label(&state.db, id).await?;

    let info = pages::details(&[
        ("Address", escape(&label.address)),
        ("Country", escape(&label.country)),
        ("Status", escape(&label.status.to_string())),
        ("Styles", escape(&label.styles)),
        ("Founding year", label.founding_year.to_string()),
    ]);

    let band_items: Vec<String> = roster
        .iter()
        .map(|b| pages::link(&format!("/band/details/{}/", b.id), &b.name))
        .collect();
    let album_items: Vec<String> = releases
        .iter()
        .map(|a| {
            format!(
                "{} - {} ({})",
                escape(&a.band_name),
                pages::link(&format!("/album/details/{}/", a.id), &a.title),
                or_dash(a.release_date)
            )
        })
        .collect();

    let body = format!(
        "{}{}<h2>Current roster</h2>{}<h2>Releases</h2>{}",
        info,
        manage_links(
            current.0.is_some(),
            &format!("/label/update/{}/", id),
            &format!("/label/delete/confirm/{}/", id)
        ),
        pages::list(&band_items, "No bands on this label."),
        pages::list(&album_items, "No albums released.")
    );

    Ok(pages::layout(&label.name, current.user(), &body))
}

/// GET /label/create/
pub async fn create_form(RequireUser(user): RequireUser) -> Html<String> {
    render_form(
        "Add label",
        "/label/create/",
        &user,
        &FormData::new(),
        &FormErrors::new(),
        None,
    )
}

/// POST /label/create/
pub async fn create_label(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Form(pairs): Form<Vec<(String, String)>>,
) -> SiteResult<Response> {
    let form = FormData::from_pairs(pairs);

    let input = match label_form::validate(&form) {
        Ok(input) => input,
        Err(errors) => {
            return Ok(
                render_form("Add label", "/label/create/", &user, &form, &errors, None)
                    .into_response(),
            )
        }
    };

    if labels::exists_by_name(&state.db, &input.name).await? {
        return Ok(render_form(
            "Add label",
            "/label/create/",
            &user,
            &form,
            &FormErrors::new(),
            Some(DUPLICATE_LABEL),
        )
        .into_response());
    }

    let id = labels::create(&state.db, &input, Some(user.id)).await?;
    info!("Label {} ({}) created by {}", id, input.name, user.username);

    Ok(found("/add-board/"))
}

/// GET /label/update/:id/
pub async fn update_form(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
) -> SiteResult<Html<String>> {
    let label = require_label(&state, id).await?;
    Ok(render_form(
        &format!("Edit {}", label.name),
        &format!("/label/update/{}/", id),
        &user,
        &label_form::initial(&label),
        &FormErrors::new(),
        None,
    ))
}

/// POST /label/update/:id/
pub async fn update_label(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> SiteResult<Response> {
    let label = require_label(&state, id).await?;
    let form = FormData::from_pairs(pairs);

    let input = match label_form::validate(&form) {
        Ok(input) => input,
        Err(errors) => {
            return Ok(render_form(
                &format!("Edit {}", label.name),
                &format!("/label/update/{}/", id),
                &user,
                &form,
                &errors,
                None,
            )
            .into_response())
        }
    };

    labels::update(&state.db, id, &input).await?;
    info!("Label {} updated by {}", id, user.username);

    Ok(found("/"))
}

/// GET /label/delete/confirm/:id/
pub async fn confirm_delete(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
) -> SiteResult<Html<String>> {
    let label = require_label(&state, id).await?;
    let body = pages::confirm_delete(
        &format!("the label {} with its bands and albums", label.name),
        &format!("/label/delete/{}/", id),
        &format!("/label/details/{}/", id),
    );
    Ok(pages::layout("Delete label", Some(&user), &body))
}

/// GET /label/delete/:id/
pub async fn delete_label(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
) -> SiteResult<Response> {
    if !labels::delete(&state.db, id).await? {
        return Err(SiteError::NotFound(format!("Label {} does not exist.", id)));
    }
    info!("Label {} deleted by {}", id, user.username);
    Ok(found("/"))
}
