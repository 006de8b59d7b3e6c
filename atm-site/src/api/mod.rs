//! JSON API mirror of the catalog
//!
//! Mounted under `/api`. Collections are open for listing and creating,
//! except reviews and users which need an administrator session.

use axum::{routing::get, Router};
use serde_json::Value;
use tower_http::cors::CorsLayer;

use crate::error::{ApiError, ApiResult};
use crate::form::FormData;
use crate::AppState;

pub mod admin;
pub mod catalog;
pub mod genres;
pub mod health;
pub mod records;

pub use health::health_routes;

/// Build `/api` routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(genres::routes())
        .merge(catalog::routes())
        .merge(admin::routes())
        .route("/buildinfo", get(health::get_build_info))
        .layer(CorsLayer::permissive())
}

/// Flatten a JSON request body for the shared form validators
pub(crate) fn body_form(body: &Value) -> ApiResult<FormData> {
    FormData::from_json(body).map_err(ApiError::BadRequest)
}
