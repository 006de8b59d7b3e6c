//! Open catalog collections: labels, musicians, bands, albums and band
//! memberships
//!
//! Creates take the same fields as the site forms. Related rows are given by
//! id (`current_label`, `band`, `label`, `musician`, `genre: [ids]`), choice
//! fields by label or code.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::Value;
use std::collections::HashMap;
use tracing::info;

use super::body_form;
use super::records::{AlbumRecord, BandRecord, LabelRecord, MembershipRecord, MusicianRecord};
use crate::db::{albums, bands, genres, labels, memberships, musicians};
use crate::error::{ApiError, ApiResult};
use crate::forms::album::{self as album_form, AlbumChoices};
use crate::forms::band::{self as band_form, BandChoices};
use crate::forms::membership::{self as membership_form, MembershipChoices};
use crate::forms::{label as label_form, musician as musician_form};
use crate::session::CurrentUser;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/labels/", get(list_labels).post(create_label))
        .route("/musicians/", get(list_musicians).post(create_musician))
        .route("/bands/", get(list_bands).post(create_band))
        .route("/albums/", get(list_albums).post(create_album))
        .route(
            "/musician-to-band/",
            get(list_memberships).post(create_membership),
        )
}

fn missing_after_insert(what: &str, id: i64) -> ApiError {
    ApiError::Internal(format!("{} {} vanished after insert", what, id))
}

/// GET /api/labels/
pub async fn list_labels(State(state): State<AppState>) -> ApiResult<Json<Vec<LabelRecord>>> {
    let rows = labels::list_all(&state.db).await?;
    Ok(Json(rows.into_iter().map(LabelRecord::from).collect()))
}

/// POST /api/labels/
pub async fn create_label(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<LabelRecord>)> {
    let form = body_form(&body)?;
    let input = label_form::validate(&form).map_err(ApiError::Validation)?;

    let id = labels::create(&state.db, &input, current.id()).await?;
    info!("Label {} ({}) created via API by user {:?}", id, input.name, current.id());

    let label = labels::find(&state.db, id)
        .await?
        .ok_or_else(|| missing_after_insert("Label", id))?;
    Ok((StatusCode::CREATED, Json(label.into())))
}

/// GET /api/musicians/
pub async fn list_musicians(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<MusicianRecord>>> {
    let rows = musicians::list_all(&state.db).await?;
    Ok(Json(rows.into_iter().map(MusicianRecord::from).collect()))
}

/// POST /api/musicians/
pub async fn create_musician(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<MusicianRecord>)> {
    let form = body_form(&body)?;
    let input = musician_form::validate(&form).map_err(ApiError::Validation)?;

    let id = musicians::create(&state.db, &input, current.id()).await?;
    info!("Musician {} ({}) created via API by user {:?}", id, input.name, current.id());

    let musician = musicians::find(&state.db, id)
        .await?
        .ok_or_else(|| missing_after_insert("Musician", id))?;
    Ok((StatusCode::CREATED, Json(musician.into())))
}

/// GET /api/bands/
pub async fn list_bands(State(state): State<AppState>) -> ApiResult<Json<Vec<BandRecord>>> {
    let rows = bands::list_all(&state.db).await?;
    let mut genre_names = genres::names_by_band(&state.db).await?;
    let label_names: HashMap<i64, String> = labels::list_all(&state.db)
        .await?
        .into_iter()
        .map(|l| (l.id, l.name))
        .collect();

    let records = rows
        .into_iter()
        .map(|band| {
            let genre = genre_names.remove(&band.id).unwrap_or_default();
            let label = label_names
                .get(&band.current_label_id)
                .cloned()
                .unwrap_or_default();
            BandRecord::new(band, genre, label)
        })
        .collect();

    Ok(Json(records))
}

/// POST /api/bands/
pub async fn create_band(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<BandRecord>)> {
    let form = body_form(&body)?;
    let choices = BandChoices {
        genres: genres::choices(&state.db).await?,
        labels: labels::choices(&state.db).await?,
    };
    let input = band_form::validate(&form, &choices).map_err(ApiError::Validation)?;

    let id = bands::create(&state.db, &input, current.id()).await?;
    info!("Band {} ({}) created via API by user {:?}", id, input.name, current.id());

    let band = bands::find(&state.db, id)
        .await?
        .ok_or_else(|| missing_after_insert("Band", id))?;
    let genre = genres::for_band(&state.db, id)
        .await?
        .into_iter()
        .map(|g| g.name)
        .collect();
    let label = labels::find(&state.db, band.current_label_id)
        .await?
        .map(|l| l.name)
        .unwrap_or_default();

    Ok((StatusCode::CREATED, Json(BandRecord::new(band, genre, label))))
}

/// GET /api/albums/
pub async fn list_albums(State(state): State<AppState>) -> ApiResult<Json<Vec<AlbumRecord>>> {
    let rows = albums::list_all(&state.db).await?;
    let mut genre_names = genres::names_by_album(&state.db).await?;

    let records = rows
        .into_iter()
        .map(|album| {
            let genre = genre_names.remove(&album.id).unwrap_or_default();
            AlbumRecord::new(album, genre)
        })
        .collect();

    Ok(Json(records))
}

/// POST /api/albums/
pub async fn create_album(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<AlbumRecord>)> {
    let form = body_form(&body)?;
    let choices = AlbumChoices {
        bands: bands::choices(&state.db).await?,
        genres: genres::choices(&state.db).await?,
        labels: labels::choices(&state.db).await?,
    };
    let input = album_form::validate(&form, &choices).map_err(ApiError::Validation)?;

    let id = albums::create(&state.db, &input, current.id()).await?;
    info!("Album {} ({}) created via API by user {:?}", id, input.title, current.id());

    let album = albums::find_summary(&state.db, id)
        .await?
        .ok_or_else(|| missing_after_insert("Album", id))?;
    let genre = genres::for_album(&state.db, id)
        .await?
        .into_iter()
        .map(|g| g.name)
        .collect();

    Ok((StatusCode::CREATED, Json(AlbumRecord::new(album, genre))))
}

/// GET /api/musician-to-band/
pub async fn list_memberships(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<MembershipRecord>>> {
    let rows = memberships::list_all(&state.db).await?;
    Ok(Json(rows.into_iter().map(MembershipRecord::from).collect()))
}

/// POST /api/musician-to-band/
pub async fn create_membership(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<MembershipRecord>)> {
    let form = body_form(&body)?;
    let choices = MembershipChoices {
        musicians: musicians::choices(&state.db).await?,
        bands: bands::choices(&state.db).await?,
    };
    let input = membership_form::validate(&form, &choices).map_err(ApiError::Validation)?;

    let id = memberships::create(&state.db, &input).await?;
    info!(
        "Membership {} (musician {} in band {}) created via API by user {:?}",
        id,
        input.musician_id,
        input.band_id,
        current.id()
    );

    let membership = memberships::find_summary(&state.db, id)
        .await?
        .ok_or_else(|| missing_after_insert("Membership", id))?;
    Ok((StatusCode::CREATED, Json(membership.into())))
}
