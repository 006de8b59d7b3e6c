//! HTML site routes
//!
//! One module per entity, each exposing a `routes()` router. Create, update
//! and delete pages require a logged-in contributor; browsing is open.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Router,
};

use crate::pages;
use crate::AppState;

pub mod accounts;
pub mod albums;
pub mod bands;
pub mod genres;
pub mod home;
pub mod labels;
pub mod memberships;
pub mod musicians;
pub mod reviews;

/// Build HTML page routes
pub fn site_routes() -> Router<AppState> {
    Router::new()
        .merge(home::routes())
        .merge(accounts::routes())
        .merge(bands::routes())
        .merge(musicians::routes())
        .merge(labels::routes())
        .merge(genres::routes())
        .merge(albums::routes())
        .merge(reviews::routes())
        .merge(memberships::routes())
}

/// 302 Found redirect
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// Fallback for unknown paths
pub async fn not_found_page() -> Response {
    (
        StatusCode::NOT_FOUND,
        pages::not_found("The requested page does not exist."),
    )
        .into_response()
}

/// Edit and delete links shown to contributors on detail pages
pub(crate) fn manage_links(logged_in: bool, update_path: &str, delete_path: &str) -> String {
    if !logged_in {
        return String::new();
    }
    format!(
        "<p>{} {}</p>",
        pages::link(update_path, "Edit"),
        pages::link(delete_path, "Delete")
    )
}
