// src/catalog/mod.rs
//! Media catalog client (TMDB-compatible API): resolves ids and free-text
//! titles to canonical metadata and fetches the poster-wall sections.
//!
//! An external collaborator from the engine's point of view — lookup
//! failures surface as `Ok(None)`/`Err` here and are mapped to degraded or
//! failed envelopes at the service boundary, never inside scoring.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Catalog media kind. The listing side has no such notion; this only steers
/// catalog lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "movie" => Some(Self::Movie),
            "tv" => Some(Self::Tv),
            _ => None,
        }
    }

    /// The other kind, for id lookups that miss on the requested one.
    pub fn other(self) -> Self {
        match self {
            Self::Movie => Self::Tv,
            Self::Tv => Self::Movie,
        }
    }
}

/// Canonical metadata for one matched title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    pub catalog_id: i64,
    pub title: String,
    pub original_title: String,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub overview: String,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub media_type: MediaType,
}

/// One tile of the poster wall.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PosterCard {
    pub catalog_id: i64,
    pub media_type: MediaType,
    pub title: String,
    pub year: Option<i32>,
    pub rating: Option<f64>,
    pub poster_url: Option<String>,
}

/// The homepage sections, in display order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WallSections {
    pub trending: Vec<PosterCard>,
    pub popular: Vec<PosterCard>,
    pub top_rated: Vec<PosterCard>,
    pub now_playing: Vec<PosterCard>,
}

/* ----------------------------
Wire shapes (catalog JSON is sparse; everything optional)
---------------------------- */

#[derive(Debug, Default, Deserialize)]
struct WireItem {
    id: Option<i64>,
    title: Option<String>,
    name: Option<String>,
    original_title: Option<String>,
    original_name: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    vote_average: Option<f64>,
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    media_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireList {
    #[serde(default)]
    results: Vec<WireItem>,
}

fn year_of(date: Option<&str>) -> Option<i32> {
    date?.get(..4)?.parse().ok()
}

pub struct CatalogClient {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    image_base: String,
    language: String,
}

impl CatalogClient {
    pub fn new(api_key: &str, api_base: &str, image_base: &str, language: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
            image_base: image_base.to_string(),
            language: language.to_string(),
        }
    }

    /// Absolute image URL for a catalog-relative path, or `None` when the
    /// item has no artwork.
    pub fn image_url(&self, path: Option<&str>, size: &str) -> Option<String> {
        let p = path?;
        if p.is_empty() {
            return None;
        }
        Some(format!("{}{}{}", self.image_base, size, p))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.api_base, path);
        let resp = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", self.language.as_str())])
            .query(query)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .with_context(|| format!("catalog request {path}"))?;
        resp.json::<T>()
            .await
            .with_context(|| format!("decoding catalog response {path}"))
    }

    fn to_media_info(&self, item: WireItem, media_type: MediaType) -> Option<MediaInfo> {
        let id = item.id?;
        let title = item.title.or(item.name).unwrap_or_default();
        let original_title = item
            .original_title
            .or(item.original_name)
            .unwrap_or_else(|| title.clone());
        let date = item.release_date.as_deref().or(item.first_air_date.as_deref());
        Some(MediaInfo {
            catalog_id: id,
            title,
            original_title,
            year: year_of(date),
            rating: item.vote_average,
            overview: item.overview.unwrap_or_default(),
            poster_url: self.image_url(item.poster_path.as_deref(), "w500"),
            backdrop_url: self.image_url(item.backdrop_path.as_deref(), "w780"),
            media_type,
        })
    }

    fn to_poster_card(&self, item: &WireItem) -> Option<PosterCard> {
        let id = item.id?;
        let media_type = match item.media_type.as_deref() {
            Some("movie") | None => MediaType::Movie,
            Some("tv") => MediaType::Tv,
            _ => return None,
        };
        let title = item.title.clone().or_else(|| item.name.clone())?;
        let date = item.release_date.as_deref().or(item.first_air_date.as_deref());
        Some(PosterCard {
            catalog_id: id,
            media_type,
            title,
            year: year_of(date),
            rating: item.vote_average,
            poster_url: self.image_url(item.poster_path.as_deref(), "w500"),
        })
    }

    /// Fetch canonical details for one id. `Ok(None)` when the catalog has no
    /// such entry under that media type.
    pub async fn details(&self, media_type: MediaType, id: i64) -> Result<Option<MediaInfo>> {
        let path = format!("{}/{}", media_type.as_str(), id);
        match self.get_json::<WireItem>(&path, &[]).await {
            Ok(item) => Ok(self.to_media_info(item, media_type)),
            Err(err) => {
                // a 404 from the catalog is a miss, not a failure
                if err
                    .downcast_ref::<reqwest::Error>()
                    .and_then(reqwest::Error::status)
                    == Some(reqwest::StatusCode::NOT_FOUND)
                {
                    Ok(None)
                } else {
                    Err(err)
                }
            }
        }
    }

    /// Id lookup with movie↔tv fallback: ids are not unique across kinds, and
    /// callers often guess the wrong one.
    pub async fn resolve_by_id(&self, id: i64, media_type: MediaType) -> Result<Option<MediaInfo>> {
        if let Some(info) = self.details(media_type, id).await? {
            return Ok(Some(info));
        }
        self.details(media_type.other(), id).await
    }

    /// Title search: movies first, then series; first hit wins.
    pub async fn search_title(&self, title: &str, year: Option<i32>) -> Result<Option<MediaInfo>> {
        let year_s = year.map(|y| y.to_string());

        let mut movie_query: Vec<(&str, &str)> = vec![("query", title)];
        if let Some(y) = year_s.as_deref() {
            movie_query.push(("year", y));
        }
        let movies: WireList = self.get_json("search/movie", &movie_query).await?;
        if let Some(hit) = movies.results.into_iter().next() {
            if let Some(id) = hit.id {
                return self.details(MediaType::Movie, id).await;
            }
        }

        let mut tv_query: Vec<(&str, &str)> = vec![("query", title)];
        if let Some(y) = year_s.as_deref() {
            tv_query.push(("first_air_date_year", y));
        }
        let series: WireList = self.get_json("search/tv", &tv_query).await?;
        if let Some(hit) = series.results.into_iter().next() {
            if let Some(id) = hit.id {
                return self.details(MediaType::Tv, id).await;
            }
        }

        Ok(None)
    }

    /// Multi search for the wall's search box.
    pub async fn search_multi(&self, query: &str) -> Result<Vec<PosterCard>> {
        let list: WireList = self.get_json("search/multi", &[("query", query)]).await?;
        Ok(list
            .results
            .iter()
            .filter(|item| matches!(item.media_type.as_deref(), Some("movie") | Some("tv")))
            .filter_map(|item| self.to_poster_card(item))
            .collect())
    }

    /// The four homepage sections. Fetched sequentially; the wall refresh is
    /// not latency-critical.
    pub async fn wall_sections(&self) -> Result<WallSections> {
        let trending: WireList = self.get_json("trending/all/week", &[]).await?;
        let popular: WireList = self.get_json("movie/popular", &[]).await?;
        let top_rated: WireList = self.get_json("movie/top_rated", &[]).await?;
        let now_playing: WireList = self.get_json("movie/now_playing", &[]).await?;

        let adapt = |list: WireList| -> Vec<PosterCard> {
            list.results
                .iter()
                .filter_map(|item| self.to_poster_card(item))
                .collect()
        };
        Ok(WallSections {
            trending: adapt(trending),
            popular: adapt(popular),
            top_rated: adapt(top_rated),
            now_playing: adapt(now_playing),
        })
    }
}
