//! /api/genres/ endpoints

use atm_common::db::Genre;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tracing::info;

use super::body_form;
use crate::db::genres;
use crate::error::{ApiError, ApiResult};
use crate::forms::genre as genre_form;
use crate::session::{CurrentUser, RequireAdmin};
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/genres/", get(list_genres).post(create_genre))
        .route(
            "/genres/:id/",
            get(get_genre).put(update_genre).delete(delete_genre),
        )
}

fn genre_not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Genre {} not found", id))
}

/// GET /api/genres/
pub async fn list_genres(State(state): State<AppState>) -> ApiResult<Json<Vec<Genre>>> {
    Ok(Json(genres::list_all(&state.db).await?))
}

/// POST /api/genres/
pub async fn create_genre(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Genre>)> {
    let form = body_form(&body)?;
    let input = genre_form::validate(&form).map_err(ApiError::Validation)?;

    let id = genres::create(&state.db, &input.name).await?;
    info!("Genre {} ({}) created via API by user {:?}", id, input.name, current.id());

    Ok((
        StatusCode::CREATED,
        Json(Genre {
            id,
            name: input.name,
        }),
    ))
}

/// GET /api/genres/:id/ (administrators)
pub async fn get_genre(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
) -> ApiResult<Json<Genre>> {
    genres::find(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| genre_not_found(id))
}

/// PUT /api/genres/:id/ (administrators)
pub async fn update_genre(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Genre>> {
    let form = body_form(&body)?;
    let input = genre_form::validate(&form).map_err(ApiError::Validation)?;

    if !genres::update(&state.db, id, &input.name).await? {
        return Err(genre_not_found(id));
    }
    info!("Genre {} renamed to {} via API by {}", id, input.name, admin.username);

    Ok(Json(Genre {
        id,
        name: input.name,
    }))
}

/// DELETE /api/genres/:id/ (administrators)
pub async fn delete_genre(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    if !genres::delete(&state.db, id).await? {
        return Err(genre_not_found(id));
    }
    info!("Genre {} deleted via API by {}", id, admin.username);
    Ok(StatusCode::NO_CONTENT)
}
