//! Landing page, contributor dashboard and band search

use axum::{
    extract::{Query, State},
    response::Html,
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::db::{bands, reviews};
use crate::error::SiteResult;
use crate::pages::{self, escape};
use crate::session::{CurrentUser, RequireUser};
use crate::AppState;

/// Reviews featured on the landing page
const FEATURED_REVIEWS: usize = 3;

pub const SEARCH_PROMPT: &str = "Type a band name before searching.";
pub const NO_RESULTS: &str = "No results";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(landing_page))
        .route("/add-board/", get(add_board))
        .route("/bands/search/", get(search_bands))
}

fn search_form(query: &str) -> String {
    format!(
        r#"<form method="get" action="/bands/search/">
<input type="text" name="query" value="{}" placeholder="Band name">
<button type="submit">Search</button>
</form>"#,
        escape(query)
    )
}

/// GET /
///
/// Landing page with a few randomly chosen reviews
pub async fn landing_page(
    State(state): State<AppState>,
    current: CurrentUser,
) -> SiteResult<Html<String>> {
    let featured = reviews::random_sample(&state.db, FEATURED_REVIEWS).await?;

    let items: Vec<String> = featured
        .iter()
        .map(|r| {
            format!(
                "{} ({}) - {} / {}",
                pages::link(&format!("/review/details/{}/", r.id), &r.subject),
                r.rating,
                pages::link(&format!("/band/details/{}/", r.band_id), &r.band_name),
                pages::link(&format!("/album/details/{}/", r.album_id), &r.album_title),
            )
        })
        .collect();

    let body = format!(
        "<p>Bands, musicians, labels and albums, reviewed by fans.</p>{}<h2>Reviews</h2>{}",
        search_form(""),
        pages::list(&items, "No reviews yet.")
    );

    Ok(pages::layout("All Time Music", current.user(), &body))
}

/// GET /add-board/
///
/// Contributor dashboard linking every create page
pub async fn add_board(RequireUser(user): RequireUser) -> Html<String> {
    let links = [
        ("/band/create/", "Add band"),
        ("/musician/create/", "Add musician"),
        ("/add/musician-to-band/", "Add musician to band"),
        ("/label/create/", "Add label"),
        ("/genre/create/", "Add genre"),
        ("/album/create/", "Add album"),
    ];
    let items: Vec<String> = links
        .iter()
        .map(|(href, text)| pages::link(href, text))
        .collect();

    let body = format!(
        "{}<p>{}</p>",
        pages::list(&items, ""),
        pages::link(
            &format!("/reset-password/{}/", user.id),
            "Change password"
        )
    );

    pages::layout("Add music", Some(&user), &body)
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

/// GET /bands/search/?query=
///
/// Case-insensitive substring search on band names
pub async fn search_bands(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(params): Query<SearchQuery>,
) -> SiteResult<Html<String>> {
    let query = params.query.as_deref().unwrap_or("").trim();

    let results = if query.is_empty() {
        pages::message(Some(SEARCH_PROMPT))
    } else {
        let found = bands::search_by_name(&state.db, query).await?;
        if found.is_empty() {
            pages::message(Some(NO_RESULTS))
        } else {
            let items: Vec<String> = found
                .iter()
                .map(|b| {
                    format!(
                        "{}, {}",
                        pages::link(&format!("/band/details/{}/", b.id), &b.name),
                        escape(&b.country_of_origin)
                    )
                })
                .collect();
            pages::list(&items, NO_RESULTS)
        }
    };

    let body = format!("{}{}", search_form(query), results);
    Ok(pages::layout("Search results", current.user(), &body))
}
