// src/search.rs
//! Search orchestration: cache probe → catalog resolve → listing fetch →
//! ranking engine → response envelope.
//!
//! Upstream I/O failures are mapped to a failed/empty envelope here, at the
//! boundary — the engine itself never sees them. "Nothing survived scoring"
//! is a normal, successful outcome with an explanatory message.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cache::{cache_key, key_digest, TtlCache};
use crate::catalog::{CatalogClient, MediaInfo, MediaType};
use crate::listing::ListingProvider;
use crate::ranking::{self, tags::TagSet, RankedListing};

/// Hard bounds on the per-request result cap.
const MAX_RESULTS_FLOOR: usize = 1;
const MAX_RESULTS_CEIL: usize = 100;

/// One surviving candidate as presented to API consumers: labels up front,
/// the full numeric breakdown behind them for observability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedResourceDto {
    pub name: String,
    pub link: String,
    pub overall_score: f64,
    pub quality_level: String,
    pub resolution: String,
    pub codec: String,
    pub is_best: bool,
    pub confidence: f64,
    pub quality: f64,
    pub alpha: f64,
    pub tags: TagSet,
    pub size_gb: Option<f64>,
    pub text_sim: f64,
    pub intent_score: f64,
    pub plaus_score: f64,
    pub popularity: f64,
    pub freshness: f64,
}

impl From<RankedListing> for RankedResourceDto {
    fn from(ranked: RankedListing) -> Self {
        let b = ranked.breakdown;
        Self {
            name: ranked.listing.name,
            link: ranked.listing.link,
            overall_score: b.score,
            quality_level: ranking::tags::quality_level(&b.tags).to_string(),
            resolution: ranking::tags::resolution_label(&b.tags).to_string(),
            codec: ranking::tags::codec_label(&b.tags).to_string(),
            is_best: ranked.is_best,
            confidence: b.confidence,
            quality: b.quality,
            alpha: b.alpha,
            tags: b.tags,
            size_gb: b.size_gb,
            text_sim: b.text_sim,
            intent_score: b.intent_score,
            plaus_score: b.plaus_score,
            popularity: b.popularity,
            freshness: b.freshness,
        }
    }
}

/// Batch-level envelope for both search endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<MediaInfo>,
    pub results: Vec<RankedResourceDto>,
    pub total: usize,
    pub elapsed_seconds: f64,
}

impl SearchResponse {
    fn failure(message: impl Into<String>, elapsed: f64) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            media: None,
            results: Vec::new(),
            total: 0,
            elapsed_seconds: elapsed,
        }
    }
}

type SearchCache = TtlCache<SearchResponse>;

pub struct SearchService {
    catalog: Arc<CatalogClient>,
    listing: Arc<dyn ListingProvider>,
    cache: SearchCache,
    max_results_default: usize,
}

impl SearchService {
    pub fn new(
        catalog: Arc<CatalogClient>,
        listing: Arc<dyn ListingProvider>,
        cache: SearchCache,
        max_results_default: usize,
    ) -> Self {
        Self {
            catalog,
            listing,
            cache,
            max_results_default,
        }
    }

    fn clamp_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.max_results_default)
            .clamp(MAX_RESULTS_FLOOR, MAX_RESULTS_CEIL)
    }

    /// Search by catalog id: resolve canonical metadata (movie↔tv fallback),
    /// then rank listings found under the canonical title.
    pub async fn search_by_catalog_id(
        &self,
        catalog_id: i64,
        media_type: MediaType,
        max_results: Option<usize>,
    ) -> SearchResponse {
        let started = Instant::now();
        let limit = self.clamp_limit(max_results);
        let id_part = catalog_id.to_string();
        let key = cache_key(
            "search:catalog",
            &[("id", id_part.as_str()), ("type", media_type.as_str())],
        );
        if let Some(hit) = self.cache.get(&key).await {
            counter!("search_cache_hits_total").increment(1);
            debug!(key = %key_digest(&key), "search cache hit");
            return hit;
        }
        counter!("search_cache_misses_total").increment(1);

        let media = match self.catalog.resolve_by_id(catalog_id, media_type).await {
            Ok(Some(media)) => media,
            Ok(None) => {
                return SearchResponse::failure("媒体不存在", elapsed_since(started));
            }
            Err(err) => {
                warn!(error = ?err, catalog_id, "catalog id lookup failed");
                return SearchResponse::failure("catalog lookup failed", elapsed_since(started));
            }
        };

        let keyword = media.title.clone();
        let response = self.search_common(Some(media), &keyword, limit, started).await;
        if response.success {
            self.cache.put(&key, response.clone()).await;
        }
        response
    }

    /// Search by free-text title. A catalog miss (or catalog outage) degrades
    /// to a direct keyword search — the engine ranks either way.
    pub async fn search_by_title(
        &self,
        title: &str,
        year: Option<i32>,
        max_results: Option<usize>,
    ) -> SearchResponse {
        let started = Instant::now();
        let limit = self.clamp_limit(max_results);
        let year_part = year.map(|y| y.to_string()).unwrap_or_default();
        let key = cache_key(
            "search:title",
            &[("title", title), ("year", year_part.as_str())],
        );
        if let Some(hit) = self.cache.get(&key).await {
            counter!("search_cache_hits_total").increment(1);
            debug!(key = %key_digest(&key), "search cache hit");
            return hit;
        }
        counter!("search_cache_misses_total").increment(1);

        let media = match self.catalog.search_title(title, year).await {
            Ok(found) => found,
            Err(err) => {
                warn!(error = ?err, "catalog title search failed; degrading to direct search");
                None
            }
        };

        let response = self.search_common(media, title, limit, started).await;
        if response.success {
            self.cache.put(&key, response.clone()).await;
        }
        response
    }

    async fn search_common(
        &self,
        media: Option<MediaInfo>,
        keyword: &str,
        limit: usize,
        started: Instant,
    ) -> SearchResponse {
        counter!("search_requests_total").increment(1);

        let raw = match self.listing.search(keyword, limit).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = ?err, provider = self.listing.name(), "listing search failed");
                return SearchResponse::failure("搜索失败: listing service error", elapsed_since(started));
            }
        };

        let fetched = raw.len();
        let t_rank = Instant::now();
        let ranked = ranking::rank_listings(keyword, &raw, Utc::now());
        histogram!("ranking_ms").record(t_rank.elapsed().as_secs_f64() * 1_000.0);

        let results: Vec<RankedResourceDto> =
            ranked.into_iter().map(RankedResourceDto::from).collect();
        let total = results.len();
        info!(
            keyword = %keyword,
            fetched,
            survived = total,
            "search ranked"
        );

        let message = if total == 0 {
            Some("未找到相关资源".to_string())
        } else {
            None
        };
        SearchResponse {
            success: true,
            message,
            media,
            results,
            total,
            elapsed_seconds: elapsed_since(started),
        }
    }
}

fn elapsed_since(started: Instant) -> f64 {
    (started.elapsed().as_secs_f64() * 1_000.0).round() / 1_000.0
}
