// src/listing/mod.rs
//! Resource listing client: searches the external, unstructured listing
//! service and yields raw candidates for the ranking engine.
//!
//! The engine owns no network I/O — everything upstream-shaped lives here,
//! behind the `ListingProvider` trait so tests can swap in fixtures.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};

/// One raw candidate as returned by the listing service. Immutable input to
/// the ranking engine; `category_id`/`uploader_id` are opaque pass-throughs
/// that scoring never reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawListing {
    pub name: String,
    pub link: String,
    /// Human-typed size expression; empty when the service omits it.
    #[serde(default)]
    pub size_text: String,
    /// ISO-8601-ish update timestamp, when present.
    pub update_time: Option<String>,
    /// View count; `None` when missing or non-numeric upstream.
    pub views: Option<f64>,
    pub category_id: Option<i64>,
    pub uploader_id: Option<String>,
}

#[async_trait]
pub trait ListingProvider: Send + Sync {
    /// Search the listing service. `limit` bounds how many raw candidates are
    /// requested; the ranking engine sees everything that comes back.
    async fn search(&self, keyword: &str, limit: usize) -> Result<Vec<RawListing>>;
    fn name(&self) -> &'static str;
}

/* ----------------------------
HTTP implementation
---------------------------- */

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    data: WireData,
}

#[derive(Debug, Default, Deserialize)]
struct WireData {
    #[serde(default)]
    list: Vec<WireItem>,
}

#[derive(Debug, Deserialize)]
struct WireItem {
    #[serde(default)]
    name: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    size: String,
    updatetime: Option<String>,
    // the service emits views as a number or a quoted string, inconsistently
    views: Option<serde_json::Value>,
    categoryid: Option<i64>,
    uploaderid: Option<String>,
}

/// Missing/non-numeric views degrade to `None` at this boundary; the engine
/// treats that as zero popularity, never as an error.
fn views_to_f64(raw: Option<serde_json::Value>) -> Option<f64> {
    match raw? {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

impl From<WireItem> for RawListing {
    fn from(item: WireItem) -> Self {
        Self {
            name: item.name,
            link: item.link,
            size_text: item.size,
            update_time: item.updatetime,
            views: views_to_f64(item.views),
            category_id: item.categoryid,
            uploader_id: item.uploaderid,
        }
    }
}

pub struct HttpListingProvider {
    base_url: String,
    client: reqwest::Client,
}

impl HttpListingProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building listing http client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl ListingProvider for HttpListingProvider {
    async fn search(&self, keyword: &str, limit: usize) -> Result<Vec<RawListing>> {
        let t0 = std::time::Instant::now();
        let url = format!("{}/api/search", self.base_url);

        let page_size = limit.to_string();
        let resp = self
            .client
            .get(&url)
            .query(&[("keyword", keyword), ("page_size", page_size.as_str())])
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| {
                counter!("listing_fetch_errors_total").increment(1);
                e
            })
            .with_context(|| format!("listing search for {keyword:?}"))?;

        let wire: WireResponse = resp
            .json()
            .await
            .context("decoding listing search response")?;

        let out: Vec<RawListing> = wire.data.list.into_iter().map(RawListing::from).collect();

        histogram!("listing_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);
        counter!("listing_results_total").increment(out.len() as u64);
        Ok(out)
    }

    fn name(&self) -> &'static str {
        "listing-http"
    }
}

/* ----------------------------
Fixture implementation (tests, offline demos)
---------------------------- */

/// Serves a fixed candidate batch; used by integration tests in place of the
/// network client.
pub struct FixtureListingProvider {
    items: Vec<RawListing>,
}

impl FixtureListingProvider {
    pub fn new(items: Vec<RawListing>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl ListingProvider for FixtureListingProvider {
    async fn search(&self, _keyword: &str, limit: usize) -> Result<Vec<RawListing>> {
        Ok(self.items.iter().take(limit).cloned().collect())
    }

    fn name(&self) -> &'static str {
        "listing-fixture"
    }
}
