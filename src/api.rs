use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::catalog::{CatalogClient, MediaInfo, MediaType, PosterCard, WallSections};
use crate::search::{SearchResponse, SearchService};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SearchService>,
    pub catalog: Arc<CatalogClient>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/wall", get(wall))
        .route("/api/wall/search", get(wall_search))
        .route("/api/media/{media_type}/{id}", get(media_detail))
        .route("/api/resources/search/catalog/{id}", get(search_by_catalog))
        .route("/api/resources/search/title", get(search_by_title))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Poster-wall sections. A catalog outage yields empty sections, not an
/// error page — the wall is decoration, not data of record.
async fn wall(State(state): State<AppState>) -> Json<WallSections> {
    match state.catalog.wall_sections().await {
        Ok(sections) => Json(sections),
        Err(err) => {
            warn!(error = ?err, "wall sections unavailable");
            Json(WallSections::default())
        }
    }
}

#[derive(Deserialize)]
struct WallSearchParams {
    #[serde(default)]
    q: String,
}

async fn wall_search(
    State(state): State<AppState>,
    Query(params): Query<WallSearchParams>,
) -> Json<Vec<PosterCard>> {
    if params.q.trim().is_empty() {
        return Json(Vec::new());
    }
    match state.catalog.search_multi(&params.q).await {
        Ok(cards) => Json(cards),
        Err(err) => {
            warn!(error = ?err, "wall search unavailable");
            Json(Vec::new())
        }
    }
}

async fn media_detail(
    State(state): State<AppState>,
    Path((media_type, id)): Path<(String, i64)>,
) -> Result<Json<MediaInfo>, StatusCode> {
    let media_type = MediaType::parse(&media_type).ok_or(StatusCode::NOT_FOUND)?;
    match state.catalog.details(media_type, id).await {
        Ok(Some(info)) => Ok(Json(info)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(err) => {
            warn!(error = ?err, id, "catalog detail failed");
            Err(StatusCode::BAD_GATEWAY)
        }
    }
}

#[derive(Deserialize)]
struct CatalogSearchParams {
    media_type: Option<String>,
    max_results: Option<usize>,
}

async fn search_by_catalog(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<CatalogSearchParams>,
) -> Result<Json<SearchResponse>, StatusCode> {
    let media_type = match params.media_type.as_deref() {
        None => MediaType::Movie,
        Some(raw) => MediaType::parse(raw).ok_or(StatusCode::BAD_REQUEST)?,
    };
    Ok(Json(
        state
            .service
            .search_by_catalog_id(id, media_type, params.max_results)
            .await,
    ))
}

#[derive(Deserialize)]
struct TitleSearchParams {
    title: String,
    year: Option<i32>,
    max_results: Option<usize>,
}

async fn search_by_title(
    State(state): State<AppState>,
    Query(params): Query<TitleSearchParams>,
) -> Json<SearchResponse> {
    Json(
        state
            .service
            .search_by_title(&params.title, params.year, params.max_results)
            .await,
    )
}
