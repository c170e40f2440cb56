// src/ranking/mod.rs
//! # Resource Ranking & Matching Engine
//! Pure, deterministic scoring that maps `(query, raw candidate)` → a single
//! comparable relevance score, then selects one best candidate per batch.
//! No I/O, no shared state — a pure function of its inputs plus an injected
//! reference instant for freshness.
//!
//! Per candidate: hard-reject filter first (junk never gets a score), then
//! text similarity × intent × plausibility compose into confidence, tags ×
//! size into quality, and an adaptive alpha blends the two with gated
//! popularity/freshness on top.

pub mod confidence;
pub mod intent;
mod normalize;
pub mod plausibility;
pub mod quality;
pub mod signals;
pub mod similarity;
pub mod size;
pub mod tags;

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::listing::RawListing;
use self::tags::TagSet;

/// Full numeric breakdown for one surviving candidate. Everything a caller
/// needs to explain the final score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub score: f64,
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

/// A candidate that survived the filter, with its breakdown and best mark.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedListing {
    pub listing: RawListing,
    pub breakdown: ScoreBreakdown,
    pub is_best: bool,
}

/// Confidence tier → base weight on the confidence term. Strong three-way
/// evidence shifts weight toward quality; an implausible size claim shifts
/// it back toward confidence.
fn alpha_for(confidence: f64, strong_evidence: bool, implausible_size: bool) -> f64 {
    let mut alpha: f64 = if confidence < 0.5 {
        0.7
    } else if confidence < 0.8 {
        0.55
    } else {
        0.4
    };
    if strong_evidence {
        alpha = (alpha - 0.1).max(0.3);
    }
    if implausible_size {
        alpha = (alpha + 0.1).min(0.8);
    }
    alpha
}

/// Popularity/freshness gate: low-confidence matches must not be rescued by
/// view counts.
fn popularity_gate(confidence: f64) -> f64 {
    if confidence >= 0.6 {
        1.0
    } else if confidence >= 0.4 {
        0.3
    } else {
        0.0
    }
}

/// Score one candidate against a query. `None` means the hard filter dropped
/// it — rejected candidates never produce a breakdown.
pub fn score_listing(
    query: &str,
    listing: &RawListing,
    now: DateTime<Utc>,
) -> Option<ScoreBreakdown> {
    let size_gb = size::parse_size_gb(&listing.size_text);
    let tag_set = tags::extract_tags(&listing.name);

    if intent::hard_reject(&listing.name, size_gb, &tag_set) {
        return None;
    }

    let text_sim = similarity::text_similarity(query, &listing.name);
    let intent_score = intent::intent_score(&listing.name, size_gb, &tag_set);
    let plaus_score = plausibility::plausibility_score(&listing.name, size_gb, &tag_set);
    let confidence = confidence::compose_confidence(text_sim, intent_score, plaus_score);
    let quality = quality::quality_score(&tag_set, &listing.name);
    let popularity = signals::popularity_score(listing.views);
    let freshness = signals::freshness_score(listing.update_time.as_deref(), now);

    let strong_evidence = text_sim >= 0.8 && intent_score >= 0.8 && plaus_score >= 0.8;
    let implausible_size = plaus_score < 0.4;
    let alpha = alpha_for(confidence, strong_evidence, implausible_size);
    let gate = popularity_gate(confidence);

    let mut score =
        alpha * confidence + (1.0 - alpha) * quality + gate * (0.10 * popularity + 0.05 * freshness);
    // a near-zero match cannot be inflated by quality or popularity
    if confidence < 0.08 {
        score = confidence;
    }

    Some(ScoreBreakdown {
        score,
        confidence,
        quality,
        alpha,
        tags: tag_set,
        size_gb,
        text_sim,
        intent_score,
        plaus_score,
        popularity,
        freshness,
    })
}

/// Score a whole batch, drop hard-rejected candidates, sort by final score
/// (descending, stable — ties keep input order), and mark the single best.
pub fn rank_listings(
    query: &str,
    listings: &[RawListing],
    now: DateTime<Utc>,
) -> Vec<RankedListing> {
    let mut ranked: Vec<RankedListing> = listings
        .iter()
        .filter_map(|listing| {
            score_listing(query, listing, now).map(|breakdown| RankedListing {
                listing: listing.clone(),
                breakdown,
                is_best: false,
            })
        })
        .collect();

    // stable sort: the first occurrence of the maximum wins the best mark
    ranked.sort_by(|a, b| {
        b.breakdown
            .score
            .partial_cmp(&a.breakdown.score)
            .unwrap_or(Ordering::Equal)
    });
    if let Some(first) = ranked.first_mut() {
        first.is_best = true;
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-08T00:00:00Z")
            .expect("test instant")
            .with_timezone(&Utc)
    }

    fn listing(name: &str, size: &str, views: Option<f64>, updated: Option<&str>) -> RawListing {
        RawListing {
            name: name.to_string(),
            link: format!("https://pan.example/{}", name.len()),
            size_text: size.to_string(),
            update_time: updated.map(str::to_string),
            views,
            category_id: None,
            uploader_id: None,
        }
    }

    #[test]
    fn alpha_tiers_follow_confidence() {
        assert_eq!(alpha_for(0.3, false, false), 0.7);
        assert_eq!(alpha_for(0.6, false, false), 0.55);
        assert_eq!(alpha_for(0.9, false, false), 0.4);
    }

    #[test]
    fn alpha_adjustments_clamp() {
        // strong evidence leans toward quality, floored at 0.3
        assert!((alpha_for(0.9, true, false) - 0.3).abs() < 1e-12);
        // implausible size leans toward confidence, capped at 0.8
        assert!((alpha_for(0.3, false, true) - 0.8).abs() < 1e-12);
        // both adjustments can apply together
        assert!((alpha_for(0.6, true, true) - 0.55).abs() < 1e-12);
    }

    #[test]
    fn gate_tiers() {
        assert_eq!(popularity_gate(0.7), 1.0);
        assert_eq!(popularity_gate(0.5), 0.3);
        assert_eq!(popularity_gate(0.39), 0.0);
    }

    #[test]
    fn scoring_is_deterministic() {
        let item = listing(
            "Dune.Part.Two.2024.2160p.WEB-DL.DDP5.1.DV.HDR",
            "18.4GB",
            Some(88.0),
            Some("2026-01-02T08:00:00Z"),
        );
        let a = score_listing("Dune", &item, fixed_now()).expect("scored");
        let b = score_listing("Dune", &item, fixed_now()).expect("scored");
        assert_eq!(a, b);
    }

    #[test]
    fn breakdown_values_stay_in_range() {
        let batch = vec![
            listing("Inception.2010.2160p.UHD.BluRay.REMUX.HDR.Atmos-X", "45.2GB", Some(120.0), Some("2026-01-05T10:00:00Z")),
            listing("Inception 1080p WEB-DL 中字", "4.2GB", Some(15.0), None),
            listing("盗梦空间 4K REMUX 特效字幕", "52GB", None, Some("2025-10-01")),
            listing("random clutter", "", None, None),
        ];
        for r in rank_listings("Inception", &batch, fixed_now()) {
            let b = &r.breakdown;
            for (label, v) in [
                ("score", b.score),
                ("confidence", b.confidence),
                ("quality", b.quality),
                ("text_sim", b.text_sim),
                ("intent", b.intent_score),
                ("plaus", b.plaus_score),
                ("popularity", b.popularity),
                ("freshness", b.freshness),
            ] {
                assert!((0.0..=1.0).contains(&v), "{label} out of range: {v}");
            }
            assert!((0.3..=0.8).contains(&b.alpha), "alpha out of range");
        }
    }

    #[test]
    fn near_zero_confidence_overrides_blending() {
        // name matches nothing in the query: similarity ~0 → dampened
        // confidence far below 0.08 → final score must equal confidence even
        // though quality alone would be substantial
        let item = listing("Totally.Different.2160p.BluRay.REMUX", "50GB", Some(200.0), None);
        let b = score_listing("Oppenheimer", &item, fixed_now()).expect("scored");
        assert!(b.confidence < 0.08, "got {}", b.confidence);
        assert_eq!(b.score, b.confidence);
    }

    #[test]
    fn best_is_unique_and_maximal() {
        let batch = vec![
            listing("Inception 720p WEBRip", "2.1GB", Some(5.0), None),
            listing("Inception.2010.2160p.UHD.BluRay.REMUX.HDR.Atmos-X", "45.2GB", Some(120.0), Some("2026-01-05T10:00:00Z")),
            listing("Inception 1080p WEB-DL", "6GB", Some(30.0), None),
        ];
        let ranked = rank_listings("Inception", &batch, fixed_now());
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked.iter().filter(|r| r.is_best).count(), 1);
        assert!(ranked[0].is_best);
        for r in &ranked[1..] {
            assert!(ranked[0].breakdown.score >= r.breakdown.score);
        }
    }

    #[test]
    fn ties_keep_input_order() {
        // identical candidates under different links score identically; the
        // stable sort must keep the first one first and give it the mark
        let mut a = listing("Inception 1080p WEB-DL", "6GB", Some(30.0), None);
        let mut b = a.clone();
        a.link = "https://pan.example/first".to_string();
        b.link = "https://pan.example/second".to_string();
        let ranked = rank_listings("Inception", &[a, b], fixed_now());
        assert!(ranked[0].listing.link.ends_with("first"));
        assert!(ranked[0].is_best);
        assert!(!ranked[1].is_best);
    }

    #[test]
    fn empty_batch_has_no_best() {
        let ranked = rank_listings("Inception", &[], fixed_now());
        assert!(ranked.is_empty());
    }

    #[test]
    fn rejected_candidates_never_appear() {
        let batch = vec![
            listing("Inception.Study.Guide.pdf", "0.1GB", Some(999.0), None),
            listing("Inception 1080p WEB-DL", "6GB", Some(30.0), None),
        ];
        let ranked = rank_listings("Inception", &batch, fixed_now());
        assert_eq!(ranked.len(), 1);
        assert!(!ranked[0].listing.name.ends_with(".pdf"));
    }
}
