// tests/ranking_scenarios.rs
//
// End-to-end scenarios for the ranking engine over fixed candidate batches.
// No I/O: the engine is a pure function of (query, candidates, reference now).

use chrono::{DateTime, Utc};

use media_resource_ranker::listing::RawListing;
use media_resource_ranker::ranking::tags::Tag;
use media_resource_ranker::ranking::{rank_listings, score_listing};

fn fixed_now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2026-01-08T00:00:00Z")
        .expect("test instant")
        .with_timezone(&Utc)
}

fn listing(name: &str, size: &str, views: Option<f64>, updated: Option<&str>) -> RawListing {
    RawListing {
        name: name.to_string(),
        link: format!("https://pan.example/{}", name.replace(['.', ' '], "-")),
        size_text: size.to_string(),
        update_time: updated.map(str::to_string),
        views,
        category_id: Some(1),
        uploader_id: Some("up".to_string()),
    }
}

/// A strong UHD remux of the queried title: tags, similarity, intent,
/// plausibility, confidence, quality, and the final score all land in the
/// expected bands, and it wins the best mark.
#[test]
fn uhd_remux_scenario() {
    let premium = listing(
        "Inception.2010.2160p.UHD.BluRay.REMUX.HDR.Atmos-GROUP",
        "45.2GB",
        Some(120.0),
        Some("2026-01-05T10:00:00Z"),
    );
    let breakdown = score_listing("Inception", &premium, fixed_now()).expect("not rejected");

    for tag in [Tag::Uhd4k, Tag::Remux, Tag::Bluray, Tag::Hdr, Tag::Atmos] {
        assert!(breakdown.tags.contains(&tag), "missing {tag:?}");
    }
    assert_eq!(breakdown.text_sim, 1.0, "query is a literal substring");
    assert!(breakdown.intent_score >= 0.9, "got {}", breakdown.intent_score);
    assert!(breakdown.plaus_score >= 0.8, "got {}", breakdown.plaus_score);
    assert!(breakdown.confidence >= 0.8, "got {}", breakdown.confidence);
    assert!(breakdown.quality >= 0.65, "got {}", breakdown.quality);
    assert!(breakdown.score > 0.8, "got {}", breakdown.score);
    assert_eq!(breakdown.size_gb, Some(45.2));

    // against weaker competition it must be the unique best
    let batch = vec![
        listing("Inception 720p WEBRip", "2.3GB", Some(40.0), None),
        premium.clone(),
        listing("Inception 1080p WEB-DL 中字", "5.8GB", Some(60.0), None),
    ];
    let ranked = rank_listings("Inception", &batch, fixed_now());
    assert_eq!(ranked.len(), 3);
    assert!(ranked[0].is_best);
    assert_eq!(ranked[0].listing.name, premium.name);
    assert_eq!(ranked.iter().filter(|r| r.is_best).count(), 1);
}

/// Junk riding on the queried title never reaches the result list.
#[test]
fn study_guide_pdf_is_filtered_out() {
    let batch = vec![
        listing("X.Study.Guide.pdf", "0.1GB", Some(9999.0), None),
        listing("X 1080p WEB-DL", "4.0GB", Some(10.0), None),
    ];
    let ranked = rank_listings("X", &batch, fixed_now());
    assert_eq!(ranked.len(), 1, "the .pdf must not survive");
    assert!(!ranked[0].listing.name.contains(".pdf"));
    assert!(ranked[0].is_best);
}

#[test]
fn scoring_is_deterministic_for_fixed_inputs() {
    let batch = vec![
        listing("盗梦空间 4K REMUX 特效字幕", "52GB", Some(88.0), Some("2025-12-20")),
        listing("Inception 1080p WEB-DL", "6GB", None, None),
    ];
    let a = rank_listings("Inception", &batch, fixed_now());
    let b = rank_listings("Inception", &batch, fixed_now());
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b.iter()) {
        assert_eq!(x.breakdown, y.breakdown);
        assert_eq!(x.is_best, y.is_best);
    }
}

#[test]
fn results_are_sorted_descending_by_score() {
    let batch = vec![
        listing("Inception CAM 屏摄", "0.9GB", None, None),
        listing(
            "Inception.2010.2160p.UHD.BluRay.REMUX.HDR.Atmos-GROUP",
            "45.2GB",
            Some(120.0),
            Some("2026-01-05T10:00:00Z"),
        ),
        listing("Inception 1080p WEB-DL 中字", "5.8GB", Some(60.0), None),
        listing("Inception 720p WEBRip", "2.3GB", Some(5.0), None),
    ];
    let ranked = rank_listings("Inception", &batch, fixed_now());
    for pair in ranked.windows(2) {
        assert!(
            pair[0].breakdown.score >= pair[1].breakdown.score,
            "not descending: {} < {}",
            pair[0].breakdown.score,
            pair[1].breakdown.score
        );
    }
}

/// The dampener: a barely-matching name cannot earn confidence no matter how
/// strong its other signals are.
#[test]
fn weak_similarity_caps_confidence() {
    let item = listing(
        // pristine quality signals, completely different title
        "Oppenheimer.2023.2160p.UHD.BluRay.REMUX.HDR.Atmos",
        "52GB",
        Some(200.0),
        Some("2026-01-07T00:00:00Z"),
    );
    let b = score_listing("海边的曼彻斯特", &item, fixed_now()).expect("not rejected");
    let undamped = b.text_sim * (0.7 + 0.3 * (0.5 * b.intent_score + 0.5 * b.plaus_score));
    assert!(b.text_sim < 0.25, "premise: weak similarity");
    assert!(
        b.confidence <= 0.15 * undamped + 1e-12,
        "confidence {} vs undamped {}",
        b.confidence,
        undamped
    );
}

#[test]
fn all_signals_stay_in_unit_range() {
    let batch = vec![
        listing("Inception.2010.2160p.UHD.BluRay.REMUX.HDR.Atmos-X", "45.2GB", Some(120.0), Some("2026-01-05T10:00:00Z")),
        listing("Inception 全集 合集", "900GB", Some(100000.0), Some("2010-01-01")),
        listing("inception related thing", "", None, Some("not a date")),
        listing("盗梦空间 1080p 高码率 国英双语", "8GB", Some(1.0), None),
    ];
    for r in rank_listings("Inception", &batch, fixed_now()) {
        let b = &r.breakdown;
        for v in [
            b.score,
            b.confidence,
            b.quality,
            b.text_sim,
            b.intent_score,
            b.plaus_score,
            b.popularity,
            b.freshness,
        ] {
            assert!((0.0..=1.0).contains(&v), "out of range: {v} in {b:?}");
        }
    }
}

#[test]
fn empty_batch_ranks_to_nothing() {
    assert!(rank_listings("Inception", &[], fixed_now()).is_empty());
}
