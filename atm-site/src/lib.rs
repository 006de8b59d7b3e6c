//! atm-site library interface
//!
//! The All Time Music catalog site: HTML pages for browsing and maintaining
//! bands, musicians, labels, albums, genres and reviews, plus a JSON API
//! mirroring the same records under `/api`.

pub mod api;
pub mod db;
pub mod error;
pub mod form;
pub mod forms;
pub mod pages;
pub mod pagination;
pub mod session;
pub mod site;

pub use crate::error::{ApiError, ApiResult, SiteError, SiteResult};

use axum::Router;
use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Lifetime of a login session
    pub session_ttl: Duration,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(db: SqlitePool, session_ttl_hours: i64) -> Self {
        Self {
            db,
            session_ttl: Duration::hours(session_ttl_hours.max(1)),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // HTML pages
        .merge(site::site_routes())
        // JSON API mirror
        .nest("/api", api::api_routes())
        .merge(api::health_routes())
        .fallback(site::not_found_page)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
