// src/ranking/plausibility.rs
//! Plausibility: is the claimed size consistent with the quality the name
//! claims? Each tag tier implies a [min,max] GB band; series releases and 4K
//! within a tier shift the band. Inside the band a candidate scores a bell
//! between 0.8 and 1.0; outside it decays linearly toward 0.

use once_cell::sync::Lazy;
use regex::Regex;

use super::intent::HIGH_TIER;
use super::tags::{Tag, TagSet};

/// Season/episode markers. Runs over the raw name — release groups write
/// `S01`/`S2` with a capital S, and the CJK markers are case-free anyway.
static SERIES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"S\d|全\d+季|全集|全\d+集|季").expect("series regex"));

/// Plausibility score in [0,1]. Unknown size is a neutral 0.4 — no basis to
/// judge, mild penalty for the missing signal.
pub fn plausibility_score(name: &str, size_gb: Option<f64>, tags: &TagSet) -> f64 {
    let Some(size) = size_gb else {
        return 0.4;
    };

    if size < 0.5 && HIGH_TIER.iter().any(|t| tags.contains(t)) {
        return 0.0;
    }

    let is_series = SERIES_RE.is_match(name);

    let (mut min_gb, mut max_gb): (f64, f64);
    if tags.contains(&Tag::Bdmv) || tags.contains(&Tag::Bluray) {
        (min_gb, max_gb) = if is_series { (40.0, 800.0) } else { (25.0, 120.0) };
        if tags.contains(&Tag::Uhd4k) {
            min_gb = if is_series { 80.0 } else { 45.0 };
        }
    } else if tags.contains(&Tag::Remux) {
        (min_gb, max_gb) = if is_series { (40.0, 800.0) } else { (20.0, 120.0) };
        if tags.contains(&Tag::Uhd4k) {
            min_gb = if is_series { 80.0 } else { 35.0 };
        }
    } else if tags.contains(&Tag::Webdl) || tags.contains(&Tag::Webrip) {
        (min_gb, max_gb) = if tags.contains(&Tag::Uhd4k) {
            (2.5, 25.0)
        } else {
            (1.0, 15.0)
        };
        if is_series {
            max_gb = 200.0;
        }
    } else if tags.contains(&Tag::Uhd4k) {
        (min_gb, max_gb) = (4.0, 35.0);
        if tags.contains(&Tag::Dv) || tags.contains(&Tag::Hdr) {
            min_gb = 4.5;
        }
    } else if tags.contains(&Tag::FullHd) {
        (min_gb, max_gb) = (1.2, 18.0);
    } else if tags.contains(&Tag::Hd) {
        (min_gb, max_gb) = (0.6, 8.0);
    } else {
        (min_gb, max_gb) = (0.7, 200.0);
    }

    if size < min_gb {
        return (size / min_gb).max(0.0);
    }
    if size > max_gb {
        return (max_gb / size).max(0.0);
    }
    let mid = (min_gb + max_gb) / 2.0;
    let span = (max_gb - min_gb) / 2.0;
    if span > 0.0 {
        0.8 + 0.2 * (1.0 - (size - mid).abs() / span)
    } else {
        1.0
    }
}
