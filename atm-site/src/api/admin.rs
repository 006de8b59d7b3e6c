//! Administrator-only collections: reviews and users

use atm_common::db::User;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::Value;
use tracing::info;

use super::body_form;
use super::records::ReviewRecord;
use crate::db::{albums, bands, reviews, users};
use crate::error::{ApiError, ApiResult};
use crate::forms::review as review_form;
use crate::session::RequireAdmin;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reviews/", get(list_reviews).post(create_review))
        .route("/users/", get(list_users))
}

/// GET /api/reviews/
pub async fn list_reviews(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> ApiResult<Json<Vec<ReviewRecord>>> {
    let rows = reviews::list_all(&state.db).await?;
    Ok(Json(rows.into_iter().map(ReviewRecord::from).collect()))
}

/// POST /api/reviews/
///
/// The album and band are given by id; the administrator is the author
pub async fn create_review(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<ReviewRecord>)> {
    let form = body_form(&body)?;
    let album_ids = albums::all_ids(&state.db).await?;
    let band_ids = bands::all_ids(&state.db).await?;
    let target = review_form::validate_with_targets(&form, &album_ids, &band_ids)
        .map_err(ApiError::Validation)?;

    let id = reviews::create(
        &state.db,
        &target.review,
        target.album_id,
        target.band_id,
        admin.id,
    )
    .await?;
    info!("Review {} created via API by {}", id, admin.username);

    let review = reviews::find_summary(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::Internal(format!("Review {} vanished after insert", id)))?;
    Ok((StatusCode::CREATED, Json(review.into())))
}

/// GET /api/users/
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(users::list_all(&state.db).await?))
}
