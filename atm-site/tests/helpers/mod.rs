//! Shared helpers for atm-site integration tests
//!
//! Every test gets its own in-memory database and router.

#![allow(dead_code)]

use atm_common::db::{AlbumType, BandStatus, LabelStatus, MediaFormat};
use atm_site::db::{albums, bands, genres, labels, musicians, reviews, sessions, users};
use atm_site::forms::album::AlbumInput;
use atm_site::forms::band::BandInput;
use atm_site::forms::label::LabelInput;
use atm_site::forms::musician::MusicianInput;
use atm_site::forms::review::ReviewInput;
use atm_site::pages::encode_query;
use atm_site::{build_router, AppState};
use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use chrono::Duration;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::SqlitePool;
use tower::util::ServiceExt; // for `oneshot` method

pub const PASSWORD: &str = "goodpass1!";

pub struct TestApp {
    pub pool: SqlitePool,
    pub router: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        let pool = atm_common::db::init_memory_database()
            .await
            .expect("Should create in-memory database");
        let router = build_router(AppState::new(pool.clone(), 24));
        Self { pool, router }
    }

    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Router should answer")
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(
        &self,
        uri: &str,
        cookie: Option<&str>,
        fields: &[(&str, &str)],
    ) -> Response<Body> {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", encode_query(k), encode_query(v)))
            .collect::<Vec<_>>()
            .join("&");
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body)).unwrap()).await
    }

    pub async fn send_json(
        &self,
        method: &str,
        uri: &str,
        cookie: Option<&str>,
        body: &Value,
    ) -> Response<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// Create a user and return a `Cookie` header value for their session
    pub async fn login_as(&self, username: &str, is_admin: bool) -> String {
        let id = create_user(&self.pool, username, is_admin).await;
        let token = sessions::create_session(&self.pool, id, Duration::hours(1))
            .await
            .expect("Should create session");
        format!("atm_session={}", token)
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await
            .expect("Should count rows")
    }
}

pub async fn create_user(pool: &SqlitePool, username: &str, is_admin: bool) -> i64 {
    users::create_user(
        pool,
        &users::NewUser {
            username,
            email: &format!("{}@example.com", username),
            first_name: "Test",
            last_name: "User",
            password: PASSWORD,
            is_admin,
        },
    )
    .await
    .expect("Should create user")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Should read body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("Body should be UTF-8")
}

pub async fn body_json(response: Response<Body>) -> Value {
    let text = body_text(response).await;
    serde_json::from_str(&text).expect("Should parse JSON")
}

/// Assert a 302 and return its `Location`
pub fn redirect_location(response: &Response<Body>) -> String {
    assert_eq!(response.status(), StatusCode::FOUND);
    response
        .headers()
        .get(header::LOCATION)
        .expect("Redirect should carry Location")
        .to_str()
        .expect("Location should be ASCII")
        .to_string()
}

// =============================================================================
// Seed data
// =============================================================================

pub async fn seed_genre(pool: &SqlitePool, name: &str) -> i64 {
    genres::create(pool, name).await.expect("Should create genre")
}

pub fn label_input(name: &str) -> LabelInput {
    LabelInput {
        name: name.to_string(),
        address: "1 Harbour Street".to_string(),
        country: "Norway".to_string(),
        status: LabelStatus::Active,
        styles: "metal".to_string(),
        founding_year: 1990,
    }
}

pub async fn seed_label(pool: &SqlitePool, name: &str) -> i64 {
    labels::create(pool, &label_input(name), None)
        .await
        .expect("Should create label")
}

pub async fn seed_musician(pool: &SqlitePool, name: &str, full_name: &str) -> i64 {
    let input = MusicianInput {
        name: name.to_string(),
        full_name: full_name.to_string(),
        born: None,
        died: None,
        place_of_birth: "Oslo".to_string(),
        bio: None,
    };
    musicians::create(pool, &input, None)
        .await
        .expect("Should create musician")
}

pub async fn seed_band(pool: &SqlitePool, name: &str, label_id: i64, genre_ids: &[i64]) -> i64 {
    let input = BandInput {
        name: name.to_string(),
        country_of_origin: "Norway".to_string(),
        location: "Oslo".to_string(),
        status: BandStatus::Active,
        formed_in: 1990,
        ended_in: None,
        genre_ids: genre_ids.to_vec(),
        lyrical_themes: "winter".to_string(),
        current_label_id: label_id,
        bio: None,
    };
    bands::create(pool, &input, None)
        .await
        .expect("Should create band")
}

pub async fn seed_album(
    pool: &SqlitePool,
    title: &str,
    band_id: i64,
    label_id: i64,
    genre_ids: &[i64],
) -> i64 {
    let input = AlbumInput {
        title: title.to_string(),
        band_id,
        genre_ids: genre_ids.to_vec(),
        album_type: AlbumType::FullLength,
        release_date: None,
        catalog_id: "CAT-001".to_string(),
        label_id,
        format: MediaFormat::Cd,
    };
    albums::create(pool, &input, None)
        .await
        .expect("Should create album")
}

pub async fn seed_review(pool: &SqlitePool, album_id: i64, band_id: i64, user_id: i64) -> i64 {
    let input = ReviewInput {
        subject: "Cold and raw".to_string(),
        rating: 85,
        description: "A landmark record.".to_string(),
    };
    reviews::create(pool, &input, album_id, band_id, user_id)
        .await
        .expect("Should create review")
}
