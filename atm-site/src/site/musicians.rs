//! Musician pages

use atm_common::db::{Musician, User};
use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use tracing::info;

use super::{found, manage_links};
use crate::db::{memberships, musicians};
use crate::error::{SiteError, SiteResult};
use crate::form::{FormData, FormErrors};
use crate::forms::musician as musician_form;
use crate::pages::{self, escape, or_dash};
use crate::session::{CurrentUser, RequireUser};
use crate::AppState;

pub const DUPLICATE_MUSICIAN: &str = "This musician already exists in database. You can update it!";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/musician/details/:id/", get(musician_details))
        .route("/musician/create/", get(create_form).post(create_musician))
        .route("/musician/update/:id/", get(update_form).post(update_musician))
        .route("/musician/delete/confirm/:id/", get(confirm_delete))
        .route("/musician/delete/:id/", get(delete_musician))
}

async fn require_musician(state: &AppState, id: i64) -> SiteResult<Musician> {
    musicians::find(&state.db, id)
        .await?
        .ok_or_else(|| SiteError::NotFound(format!("Musician {} does not exist.", id)))
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
        pages::form(action, &musician_form::fields(form, errors), errors, "Save")
    );
    pages::layout(title, Some(user), &body)
}

/// GET /musician/details/:id/
///
/// Musician with every band tenure
pub async fn musician_details(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> SiteResult<Html<String>> {
    let musician = require_musician(&state, id).await?;
    let tenures = memberships::for_musician(&state.db, id).await?;

    let info = pages::details(&[
        ("Full name", escape(&musician.full_name)),
        ("Born", or_dash(musician.born)),
        ("Died", or_dash(musician.died)),
        ("Place of birth", escape(&musician.place_of_birth)),
    ]);

    let bands: Vec<String> = tenures
        .iter()
        .map(|m| {
            format!(
                "{} {}, {} - {}",
                pages::link(&format!("/band/details/{}/", m.band_id), &m.band_name),
                escape(&m.role),
                or_dash(m.year_from),
                or_dash(m.year_to)
            )
        })
        .collect();

    let bio = musician
        .bio
        .as_deref()
        .map(|b| format!("<p>{}</p>", escape(b)))
        .unwrap_or_default();

    let body = format!(
        "{}{}{}<h2>Bands</h2>{}",
        info,
        manage_links(
            current.0.is_some(),
            &format!("/musician/update/{}/", id),
            &format!("/musician/delete/confirm/{}/", id)
        ),
        bio,
        pages::list(&bands, "Not a member of any band yet.")
    );

    Ok(pages::layout(&musician.name, current.user(), &body))
}

/// GET /musician/create/
pub async fn create_form(RequireUser(user): RequireUser) -> Html<String> {
    render_form(
        "Add musician",
        "/musician/create/",
        &user,
        &FormData::new(),
        &FormErrors::new(),
        None,
    )
}

/// POST /musician/create/
///
/// The same name and full name together count as a duplicate
pub async fn create_musician(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Form(pairs): Form<Vec<(String, String)>>,
) -> SiteResult<Response> {
    let form = FormData::from_pairs(pairs);

    let input = match musician_form::validate(&form) {
        Ok(input) => input,
        Err(errors) => {
            return Ok(
                render_form("Add musician", "/musician/create/", &user, &form, &errors, None)
                    .into_response(),
            )
        }
    };

    if musicians::exists_by_names(&state.db, &input.name, &input.full_name).await? {
        return Ok(render_form(
            "Add musician",
            "/musician/create/",
            &user,
            &form,
            &FormErrors::new(),
            Some(DUPLICATE_MUSICIAN),
        )
        .into_response());
    }

    let id = musicians::create(&state.db, &input, Some(user.id)).await?;
    info!("Musician {} ({}) created by {}", id, input.name, user.username);

    Ok(found("/add-board/"))
}

/// GET /musician/update/:id/
pub async fn update_form(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
) -> SiteResult<Html<String>> {
    let musician = require_musician(&state, id).await?;
    Ok(render_form(
        &format!("Edit {}", musician.name),
        &format!("/musician/update/{}/", id),
        &user,
        &musician_form::initial(&musician),
        &FormErrors::new(),
        None,
    ))
}

/// POST /musician/update/:id/
pub async fn update_musician(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> SiteResult<Response> {
    let musician = require_musician(&state, id).await?;
    let form = FormData::from_pairs(pairs);

    let input = match musician_form::validate(&form) {
        Ok(input) => input,
        Err(errors) => {
            return Ok(render_form(
                &format!("Edit {}", musician.name),
                &format!("/musician/update/{}/", id),
                &user,
                &form,
                &errors,
                None,
            )
            .into_response())
        }
    };

    musicians::update(&state.db, id, &input).await?;
    info!("Musician {} updated by {}", id, user.username);

    Ok(found("/"))
}

/// GET /musician/delete/confirm/:id/
pub async fn confirm_delete(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
) -> SiteResult<Html<String>> {
    let musician = require_musician(&state, id).await?;
    let body = pages::confirm_delete(
        &format!("the musician {} ({})", musician.name, musician.full_name),
        &format!("/musician/delete/{}/", id),
        &format!("/musician/details/{}/", id),
    );
    Ok(pages::layout("Delete musician", Some(&user), &body))
}

/// GET /musician/delete/:id/
pub async fn delete_musician(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
) -> SiteResult<Response> {
    if !musicians::delete(&state.db, id).await? {
        return Err(SiteError::NotFound(format!("Musician {} does not exist.", id)));
    }
    info!("Musician {} deleted by {}", id, user.username);
    Ok(found("/"))
}
