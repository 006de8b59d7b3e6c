//! Integration tests for paginated listings and band search

mod helpers;

use axum::http::StatusCode;
use helpers::{body_text, seed_album, seed_band, seed_genre, seed_label, TestApp};

/// Label plus `count` bands named "Band 01", "Band 02", ...
async fn seed_bands(app: &TestApp, count: usize) -> (i64, i64) {
    let genre = seed_genre(&app.pool, "heavy metal").await;
    let label = seed_label(&app.pool, "Metal Blade").await;
    for n in 1..=count {
        seed_band(&app.pool, &format!("Band {:02}", n), label, &[genre]).await;
    }
    (genre, label)
}

#[tokio::test]
async fn test_band_listing_is_alphabetical_and_paginated() {
    let app = TestApp::new().await;
    seed_bands(&app, 25).await;

    let html = body_text(app.get("/bands/alphabetical/", None).await).await;
    assert!(html.contains("Band 01"));
    assert!(html.contains("Band 10"));
    assert!(!html.contains("Band 11"));
    assert!(html.contains("Page 1 of 3."));

    let html = body_text(app.get("/bands/alphabetical/?page=2", None).await).await;
    assert!(html.contains("Band 11"));
    assert!(!html.contains("Band 10<"));
}

#[tokio::test]
async fn test_page_beyond_range_shows_last_page() {
    let app = TestApp::new().await;
    seed_bands(&app, 25).await;

    let response = app.get("/bands/alphabetical/?page=99", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Band 25"));
    assert!(html.contains("Band 21"));
    assert!(!html.contains("Band 20"));
    assert!(html.contains("Page 3 of 3."));
}

#[tokio::test]
async fn test_malformed_page_shows_first_page() {
    let app = TestApp::new().await;
    seed_bands(&app, 12).await;

    for query in ["?page=abc", "?page=", "?page=-3"] {
        let response = app.get(&format!("/bands/alphabetical/{}", query), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Band 01"), "{}", query);
        assert!(html.contains("Page 1 of 2."), "{}", query);
    }
}

#[tokio::test]
async fn test_genre_listing_filters_bands() {
    let app = TestApp::new().await;
    let (genre, label) = seed_bands(&app, 2).await;
    let other = seed_genre(&app.pool, "grindcore").await;
    seed_band(&app.pool, "Napalm Death", label, &[other]).await;

    let html = body_text(app.get(&format!("/bands/genres/{}/", other), None).await).await;
    assert!(html.contains("Napalm Death"));
    assert!(!html.contains("Band 01"));

    let html = body_text(app.get(&format!("/bands/genres/{}/", genre), None).await).await;
    assert!(html.contains("Band 01"));
    assert!(!html.contains("Napalm Death"));
}

#[tokio::test]
async fn test_unknown_genre_listing_is_empty() {
    let app = TestApp::new().await;
    seed_bands(&app, 2).await;

    let response = app.get("/bands/genres/999/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("No bands in this genre."));
}

#[tokio::test]
async fn test_albums_newest_first() {
    let app = TestApp::new().await;
    let (genre, label) = seed_bands(&app, 1).await;
    seed_album(&app.pool, "First Release", 1, label, &[genre]).await;
    seed_album(&app.pool, "Second Release", 1, label, &[genre]).await;

    let html = body_text(app.get("/albums/last-added/", None).await).await;
    let first = html.find("First Release").unwrap();
    let second = html.find("Second Release").unwrap();
    assert!(second < first);
}

#[tokio::test]
async fn test_search_is_case_insensitive_substring() {
    let app = TestApp::new().await;
    let genre = seed_genre(&app.pool, "black metal").await;
    let label = seed_label(&app.pool, "Moonfog").await;
    seed_band(&app.pool, "Darkthrone", label, &[genre]).await;
    seed_band(&app.pool, "Satyricon", label, &[genre]).await;

    let html = body_text(app.get("/bands/search/?query=THRON", None).await).await;
    assert!(html.contains("Darkthrone"));
    assert!(!html.contains("Satyricon"));
}

#[tokio::test]
async fn test_search_without_match() {
    let app = TestApp::new().await;
    let genre = seed_genre(&app.pool, "black metal").await;
    let label = seed_label(&app.pool, "Moonfog").await;
    seed_band(&app.pool, "Darkthrone", label, &[genre]).await;

    let response = app.get("/bands/search/?query=zzz", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("No results"));
}

#[tokio::test]
async fn test_search_without_query_prompts() {
    let app = TestApp::new().await;

    for uri in ["/bands/search/", "/bands/search/?query=", "/bands/search/?query=%20%20"] {
        let response = app.get(uri, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response)
            .await
            .contains("Type a band name before searching."));
    }
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let app = TestApp::new().await;
    let genre = seed_genre(&app.pool, "black metal").await;
    let label = seed_label(&app.pool, "Moonfog").await;
    seed_band(&app.pool, "Darkthrone", label, &[genre]).await;

    let html = body_text(app.get("/bands/search/?query=%25", None).await).await;
    assert!(html.contains("No results"));
}

#[tokio::test]
async fn test_landing_page_features_reviews() {
    let app = TestApp::new().await;
    let user = helpers::create_user(&app.pool, "critic", false).await;
    let (genre, label) = seed_bands(&app, 1).await;
    let album = seed_album(&app.pool, "Under a Funeral Moon", 1, label, &[genre]).await;
    helpers::seed_review(&app.pool, album, 1, user).await;

    let response = app.get("/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Cold and raw"));
}
