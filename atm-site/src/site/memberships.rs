//! Adding musicians to bands, editing and ending their tenure

use atm_common::db::{Membership, User};
use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use tracing::info;

use super::found;
use crate::db::{bands, memberships, musicians};
use crate::error::{SiteError, SiteResult};
use crate::form::{FormData, FormErrors};
use crate::forms::membership::{self as membership_form, MembershipChoices};
use crate::pages;
use crate::session::RequireUser;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/add/musician-to-band/",
            get(create_form).post(create_membership),
        )
        .route(
            "/update/musician-in-band/:id/",
            get(update_form).post(update_membership),
        )
        .route(
            "/delete/musician-from-band/confirm/:id/",
            get(confirm_delete),
        )
        .route("/delete/musician-from-band/:id/", get(delete_membership))
}

async fn load_choices(state: &AppState) -> SiteResult<MembershipChoices> {
    Ok(MembershipChoices {
        musicians: musicians::choices(&state.db).await?,
        bands: bands::choices(&state.db).await?,
    })
}

async fn require_membership(state: &AppState, id: i64) -> SiteResult<Membership> {
    memberships::find(&state.db, id)
        .await?
        .ok_or_else(|| SiteError::NotFound(format!("Membership {} does not exist.", id)))
}

fn render_form(
    title: &str,
    action: &str,
    user: &User,
    form: &FormData,
    errors: &FormErrors,
    choices: &MembershipChoices,
) -> Html<String> {
    let body = pages::form(
        action,
        &membership_form::fields(form, errors, choices),
        errors,
        "Save",
    );
    pages::layout(title, Some(user), &body)
}

/// GET /add/musician-to-band/
pub async fn create_form(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> SiteResult<Html<String>> {
    let choices = load_choices(&state).await?;
    Ok(render_form(
        "Add musician to band",
        "/add/musician-to-band/",
        &user,
        &FormData::new(),
        &FormErrors::new(),
        &choices,
    ))
}

/// POST /add/musician-to-band/
pub async fn create_membership(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Form(pairs): Form<Vec<(String, String)>>,
) -> SiteResult<Response> {
    let form = FormData::from_pairs(pairs);
    let choices = load_choices(&state).await?;

    let input = match membership_form::validate(&form, &choices) {
        Ok(input) => input,
        Err(errors) => {
            return Ok(render_form(
                "Add musician to band",
                "/add/musician-to-band/",
                &user,
                &form,
                &errors,
                &choices,
            )
            .into_response())
        }
    };

    let id = memberships::create(&state.db, &input).await?;
    info!(
        "Membership {} (musician {} in band {}) created by {}",
        id, input.musician_id, input.band_id, user.username
    );

    Ok(found("/add-board/"))
}

/// GET /update/musician-in-band/:id/
pub async fn update_form(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
) -> SiteResult<Html<String>> {
    let membership = require_membership(&state, id).await?;
    let choices = load_choices(&state).await?;
    Ok(render_form(
        "Edit band membership",
        &format!("/update/musician-in-band/{}/", id),
        &user,
        &membership_form::initial(&membership),
        &FormErrors::new(),
        &choices,
    ))
}

/// POST /update/musician-in-band/:id/
pub async fn update_membership(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
    Form(pairs): Form<Vec<(String, String)>>,
) -> SiteResult<Response> {
    require_membership(&state, id).await?;
    let form = FormData::from_pairs(pairs);
    let choices = load_choices(&state).await?;

    let input = match membership_form::validate(&form, &choices) {
        Ok(input) => input,
        Err(errors) => {
            return Ok(render_form(
                "Edit band membership",
                &format!("/update/musician-in-band/{}/", id),
                &user,
                &form,
                &errors,
                &choices,
            )
            .into_response())
        }
    };

    memberships::update(&state.db, id, &input).await?;
    info!("Membership {} updated by {}", id, user.username);

    Ok(found(&format!("/band/details/{}/", input.band_id)))
}

/// GET /delete/musician-from-band/confirm/:id/
pub async fn confirm_delete(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
) -> SiteResult<Html<String>> {
    let membership = memberships::find_summary(&state.db, id)
        .await?
        .ok_or_else(|| SiteError::NotFound(format!("Membership {} does not exist.", id)))?;
    let body = pages::confirm_delete(
        &format!("{} from {}", membership.musician_name, membership.band_name),
        &format!("/delete/musician-from-band/{}/", id),
        &format!("/band/details/{}/", membership.band_id),
    );
    Ok(pages::layout("Remove musician from band", Some(&user), &body))
}

/// GET /delete/musician-from-band/:id/
pub async fn delete_membership(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<i64>,
) -> SiteResult<Response> {
    if !memberships::delete(&state.db, id).await? {
        return Err(SiteError::NotFound(format!("Membership {} does not exist.", id)));
    }
    info!("Membership {} deleted by {}", id, user.username);
    Ok(found("/"))
}
