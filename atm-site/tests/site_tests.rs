//! Integration tests for the entity pages: create, detail, update, delete

mod helpers;

use axum::http::StatusCode;
use helpers::{
    body_text, create_user, redirect_location, seed_album, seed_band, seed_genre, seed_label,
    seed_musician, seed_review, TestApp,
};

fn label_fields(name: &str) -> Vec<(&str, &str)> {
    vec![
        ("name", name),
        ("address", "Deathlike Silence, Oslo"),
        ("country", "Norway"),
        ("status", "1"),
        ("styles", "black metal"),
        ("founding_year", "1987"),
    ]
}

// =============================================================================
// End to end
// =============================================================================

#[tokio::test]
async fn test_genre_label_band_flow() {
    let app = TestApp::new().await;
    let cookie = app.login_as("euronymous", false).await;

    let response = app
        .post_form("/genre/create/", Some(&cookie), &[("name", "rock")])
        .await;
    assert_eq!(redirect_location(&response), "/add-board/");

    let response = app
        .post_form("/label/create/", Some(&cookie), &label_fields("Posercorpse Music"))
        .await;
    assert_eq!(redirect_location(&response), "/add-board/");

    // Choice lists on the band form come from what was just created
    let form_page = body_text(app.get("/band/create/", Some(&cookie)).await).await;
    assert!(form_page.contains("> rock</label>"));
    assert!(form_page.contains(">Posercorpse Music</option>"));

    let response = app
        .post_form(
            "/band/create/",
            Some(&cookie),
            &[
                ("name", "Mayhem"),
                ("country_of_origin", "Norway"),
                ("location", "Langhus"),
                ("status", "1"),
                ("formed_in", "1984"),
                ("genre", "1"),
                ("lyrical_themes", "death"),
                ("current_label", "1"),
            ],
        )
        .await;
    let location = redirect_location(&response);
    assert_eq!(location, "/band/details/1/");

    let detail = app.get(&location, None).await;
    assert_eq!(detail.status(), StatusCode::OK);
    let html = body_text(detail).await;
    assert!(html.contains("Mayhem"));
    assert!(html.contains(">rock</a>"));
    assert!(html.contains("Posercorpse Music"));

    let added_by: Option<i64> = sqlx::query_scalar("SELECT added_by FROM bands WHERE id = 1")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert!(added_by.is_some());
}

#[tokio::test]
async fn test_band_form_errors_rerender_without_saving() {
    let app = TestApp::new().await;
    let cookie = app.login_as("dead", false).await;
    seed_label(&app.pool, "Voices of Wonder").await;

    let response = app
        .post_form(
            "/band/create/",
            Some(&cookie),
            &[("name", "Mayhem"), ("current_label", "1")],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("This field is required."));
    assert!(html.contains(r#"value="Mayhem""#));
    assert_eq!(app.count("bands").await, 0);
}

// =============================================================================
// Duplicate checks
// =============================================================================

#[tokio::test]
async fn test_duplicate_genre_rejected() {
    let app = TestApp::new().await;
    let cookie = app.login_as("hellhammer", false).await;
    seed_genre(&app.pool, "doom").await;

    let response = app
        .post_form("/genre/create/", Some(&cookie), &[("name", "doom")])
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("This genre already exists!"));
    assert_eq!(app.count("genres").await, 1);
}

#[tokio::test]
async fn test_duplicate_label_rejected() {
    let app = TestApp::new().await;
    let cookie = app.login_as("hellhammer", false).await;
    seed_label(&app.pool, "Peaceville").await;

    let response = app
        .post_form("/label/create/", Some(&cookie), &label_fields("Peaceville"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response)
        .await
        .contains("This label already exists in database. You can update it!"));
    assert_eq!(app.count("labels").await, 1);
}

#[tokio::test]
async fn test_duplicate_musician_needs_both_names() {
    let app = TestApp::new().await;
    let cookie = app.login_as("hellhammer", false).await;
    seed_musician(&app.pool, "Attila", "Attila Csihar").await;

    let fields = |full_name: &'static str| {
        vec![
            ("name", "Attila"),
            ("full_name", full_name),
            ("place_of_birth", "Budapest"),
        ]
    };

    let response = app
        .post_form("/musician/create/", Some(&cookie), &fields("Attila Csihar"))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response)
        .await
        .contains("This musician already exists in database. You can update it!"));
    assert_eq!(app.count("musicians").await, 1);

    // Same stage name, different person
    let response = app
        .post_form("/musician/create/", Some(&cookie), &fields("Attila Other"))
        .await;
    assert_eq!(redirect_location(&response), "/add-board/");
    assert_eq!(app.count("musicians").await, 2);
}

#[tokio::test]
async fn test_duplicate_album_rejected() {
    let app = TestApp::new().await;
    let cookie = app.login_as("hellhammer", false).await;
    let genre = seed_genre(&app.pool, "black metal").await;
    let label = seed_label(&app.pool, "Deathlike Silence").await;
    let band = seed_band(&app.pool, "Mayhem", label, &[genre]).await;
    seed_album(&app.pool, "De Mysteriis Dom Sathanas", band, label, &[genre]).await;

    let band_id = band.to_string();
    let genre_id = genre.to_string();
    let label_id = label.to_string();
    let response = app
        .post_form(
            "/album/create/",
            Some(&cookie),
            &[
                ("title", "De Mysteriis Dom Sathanas"),
                ("band", &band_id),
                ("genre", &genre_id),
                ("type", "1"),
                ("catalog_id", "ANTI-MOSH 006"),
                ("label", &label_id),
                ("format", "2"),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response)
        .await
        .contains("This album already exists in database!"));
    assert_eq!(app.count("albums").await, 1);
}

// =============================================================================
// Detail pages and 404s
// =============================================================================

#[tokio::test]
async fn test_missing_records_are_404() {
    let app = TestApp::new().await;
    let cookie = app.login_as("maniac", false).await;

    for path in [
        "/band/details/42/",
        "/musician/details/42/",
        "/label/details/42/",
        "/album/details/42/",
        "/review/details/42/",
    ] {
        assert_eq!(app.get(path, None).await.status(), StatusCode::NOT_FOUND, "{}", path);
    }
    for path in [
        "/band/update/42/",
        "/genre/delete/confirm/42/",
        "/album/delete/42/",
        "/review/create/42/42/",
        "/update/musician-in-band/42/",
    ] {
        assert_eq!(
            app.get(path, Some(&cookie)).await.status(),
            StatusCode::NOT_FOUND,
            "{}",
            path
        );
    }
}

#[tokio::test]
async fn test_unknown_path_is_404() {
    let app = TestApp::new().await;
    let response = app.get("/no/such/page/", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_label_detail_lists_roster_and_releases() {
    let app = TestApp::new().await;
    let genre = seed_genre(&app.pool, "thrash").await;
    let label = seed_label(&app.pool, "Noise").await;
    let band = seed_band(&app.pool, "Kreator", label, &[genre]).await;
    seed_album(&app.pool, "Pleasure to Kill", band, label, &[genre]).await;

    let html = body_text(app.get(&format!("/label/details/{}/", label), None).await).await;
    assert!(html.contains("Kreator"));
    assert!(html.contains("Pleasure to Kill"));
}

#[tokio::test]
async fn test_musician_detail_lists_bands() {
    let app = TestApp::new().await;
    let cookie = app.login_as("maniac", false).await;
    let genre = seed_genre(&app.pool, "black metal").await;
    let label = seed_label(&app.pool, "Season of Mist").await;
    let band = seed_band(&app.pool, "Mayhem", label, &[genre]).await;
    let musician = seed_musician(&app.pool, "Necrobutcher", "Jørn Stubberud").await;

    let musician_id = musician.to_string();
    let band_id = band.to_string();
    let response = app
        .post_form(
            "/add/musician-to-band/",
            Some(&cookie),
            &[
                ("musician", &musician_id),
                ("band", &band_id),
                ("year_from", "1984"),
                ("role", "bass"),
            ],
        )
        .await;
    assert_eq!(redirect_location(&response), "/add-board/");

    let html = body_text(app.get(&format!("/musician/details/{}/", musician), None).await).await;
    assert!(html.contains("Mayhem"));
    assert!(html.contains("bass"));

    let html = body_text(app.get(&format!("/band/details/{}/", band), None).await).await;
    assert!(html.contains("Necrobutcher"));
}

// =============================================================================
// Update and delete
// =============================================================================

#[tokio::test]
async fn test_band_update_prefills_and_replaces_genres() {
    let app = TestApp::new().await;
    let cookie = app.login_as("blasphemer", false).await;
    let black = seed_genre(&app.pool, "black metal").await;
    let doom = seed_genre(&app.pool, "doom").await;
    let label = seed_label(&app.pool, "Candlelight").await;
    let band = seed_band(&app.pool, "Emperor", label, &[black]).await;

    let form_page = body_text(app.get(&format!("/band/update/{}/", band), Some(&cookie)).await).await;
    assert!(form_page.contains(r#"value="Emperor""#));
    assert!(form_page.contains(&format!(r#"value="{}" checked"#, black)));

    let doom_id = doom.to_string();
    let label_id = label.to_string();
    let response = app
        .post_form(
            &format!("/band/update/{}/", band),
            Some(&cookie),
            &[
                ("name", "Emperor"),
                ("country_of_origin", "Norway"),
                ("location", "Notodden"),
                ("status", "3"),
                ("formed_in", "1991"),
                ("ended_in", "2001"),
                ("genre", &doom_id),
                ("lyrical_themes", "fantasy"),
                ("current_label", &label_id),
            ],
        )
        .await;
    assert_eq!(redirect_location(&response), format!("/band/details/{}/", band));

    let genres: Vec<i64> = sqlx::query_scalar("SELECT genre_id FROM band_genres WHERE band_id = ?")
        .bind(band)
        .fetch_all(&app.pool)
        .await
        .unwrap();
    assert_eq!(genres, vec![doom]);
}

#[tokio::test]
async fn test_delete_band_cascades() {
    let app = TestApp::new().await;
    let cookie = app.login_as("blasphemer", false).await;
    let user = create_user(&app.pool, "reviewer", false).await;
    let genre = seed_genre(&app.pool, "black metal").await;
    let label = seed_label(&app.pool, "Deathlike Silence").await;
    let band = seed_band(&app.pool, "Mayhem", label, &[genre]).await;
    let album = seed_album(&app.pool, "Live in Leipzig", band, label, &[genre]).await;
    seed_review(&app.pool, album, band, user).await;
    let musician = seed_musician(&app.pool, "Dead", "Per Yngve Ohlin").await;
    sqlx::query("INSERT INTO memberships (musician_id, band_id, year_from, role) VALUES (?, ?, 1988, 'vocals')")
        .bind(musician)
        .bind(band)
        .execute(&app.pool)
        .await
        .unwrap();

    let confirm = app
        .get(&format!("/band/delete/confirm/{}/", band), Some(&cookie))
        .await;
    assert_eq!(confirm.status(), StatusCode::OK);
    assert_eq!(app.count("bands").await, 1);

    let response = app.get(&format!("/band/delete/{}/", band), Some(&cookie)).await;
    assert_eq!(redirect_location(&response), "/");

    assert_eq!(app.count("bands").await, 0);
    assert_eq!(app.count("albums").await, 0);
    assert_eq!(app.count("reviews").await, 0);
    assert_eq!(app.count("memberships").await, 0);
    assert_eq!(app.count("musicians").await, 1);
    assert_eq!(app.count("genres").await, 1);
}

#[tokio::test]
async fn test_genre_update_and_delete_redirect_to_genre_list() {
    let app = TestApp::new().await;
    let cookie = app.login_as("blasphemer", false).await;
    let genre = seed_genre(&app.pool, "trash").await;

    let response = app
        .post_form(
            &format!("/genre/update/{}/", genre),
            Some(&cookie),
            &[("name", "thrash")],
        )
        .await;
    assert_eq!(redirect_location(&response), "/bands/genres/");
    assert!(body_text(app.get("/bands/genres/", None).await).await.contains("thrash"));

    let response = app.get(&format!("/genre/delete/{}/", genre), Some(&cookie)).await;
    assert_eq!(redirect_location(&response), "/bands/genres/");
    assert_eq!(app.count("genres").await, 0);
}

// =============================================================================
// Reviews
// =============================================================================

#[tokio::test]
async fn test_review_create_and_update_restamps_author() {
    let app = TestApp::new().await;
    let author = app.login_as("critic", false).await;
    let editor = app.login_as("editor", false).await;
    let genre = seed_genre(&app.pool, "death metal").await;
    let label = seed_label(&app.pool, "Earache").await;
    let band = seed_band(&app.pool, "Morbid Angel", label, &[genre]).await;
    let album = seed_album(&app.pool, "Altars of Madness", band, label, &[genre]).await;

    let response = app
        .post_form(
            &format!("/review/create/{}/{}/", album, band),
            Some(&author),
            &[
                ("subject", "Pure chaos"),
                ("rating", "9.5"),
                ("description", "Riffs from another dimension."),
            ],
        )
        .await;
    assert_eq!(redirect_location(&response), format!("/band/details/{}/", band));

    let html = body_text(app.get("/reviews/list/", None).await).await;
    assert!(html.contains("Pure chaos"));
    assert!(html.contains("(9.5)"));
    assert!(html.contains("critic"));

    let response = app
        .post_form(
            "/review/update/1/",
            Some(&editor),
            &[
                ("subject", "Pure chaos"),
                ("rating", "10"),
                ("description", "Even better on relisten."),
            ],
        )
        .await;
    assert_eq!(redirect_location(&response), "/reviews/list/");

    let html = body_text(app.get("/review/details/1/", None).await).await;
    assert!(html.contains("10.0"));
    assert!(html.contains("editor"));
}

#[tokio::test]
async fn test_review_rating_with_two_decimals_rejected() {
    let app = TestApp::new().await;
    let cookie = app.login_as("critic", false).await;
    let genre = seed_genre(&app.pool, "death metal").await;
    let label = seed_label(&app.pool, "Earache").await;
    let band = seed_band(&app.pool, "Carcass", label, &[genre]).await;
    let album = seed_album(&app.pool, "Heartwork", band, label, &[genre]).await;

    let response = app
        .post_form(
            &format!("/review/create/{}/{}/", album, band),
            Some(&cookie),
            &[
                ("subject", "Melodic"),
                ("rating", "8.25"),
                ("description", "Gateway record."),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.count("reviews").await, 0);
}

#[tokio::test]
async fn test_membership_update_and_removal() {
    let app = TestApp::new().await;
    let cookie = app.login_as("euronymous", false).await;
    let genre = seed_genre(&app.pool, "black metal").await;
    let label = seed_label(&app.pool, "Deathlike Silence").await;
    let band = seed_band(&app.pool, "Mayhem", label, &[genre]).await;
    let musician = seed_musician(&app.pool, "Hellhammer", "Jan Axel Blomberg").await;

    let musician_id = musician.to_string();
    let band_id = band.to_string();
    let response = app
        .post_form(
            "/add/musician-to-band/",
            Some(&cookie),
            &[
                ("musician", &musician_id),
                ("band", &band_id),
                ("year_from", "1988"),
                ("role", "drums"),
            ],
        )
        .await;
    assert_eq!(redirect_location(&response), "/add-board/");

    let id: i64 = sqlx::query_scalar("SELECT id FROM memberships")
        .fetch_one(&app.pool)
        .await
        .unwrap();

    let response = app
        .post_form(
            &format!("/update/musician-in-band/{}/", id),
            Some(&cookie),
            &[
                ("musician", &musician_id),
                ("band", &band_id),
                ("year_from", "1988"),
                ("year_to", "2022"),
                ("role", "drums, percussion"),
            ],
        )
        .await;
    assert_eq!(redirect_location(&response), format!("/band/details/{}/", band));

    let html = body_text(app.get(&format!("/band/details/{}/", band), None).await).await;
    assert!(html.contains("drums, percussion"));

    let response = app
        .get(&format!("/delete/musician-from-band/confirm/{}/", id), Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Hellhammer from Mayhem"));

    let response = app
        .get(&format!("/delete/musician-from-band/{}/", id), Some(&cookie))
        .await;
    assert_eq!(redirect_location(&response), "/");
    assert_eq!(app.count("memberships").await, 0);
    assert_eq!(app.count("musicians").await, 1);
}
