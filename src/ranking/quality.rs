// src/ranking/quality.rs
//! Technical quality from the tag set: a weighted point table summed and
//! normalized to [0,1]. Resolution and source tier count the highest
//! applicable entry only; dynamic range and audio formats are additive.

use super::tags::{Tag, TagSet};

/// Normalization divisor for the point table.
const MAX_POINTS: f64 = 110.0;

/// Quality score in [0,1]. The raw name is consulted only for the literal
/// bitrate marker 高码率, which has no tag of its own.
pub fn quality_score(tags: &TagSet, name: &str) -> f64 {
    let mut pts: i32 = 0;

    if tags.contains(&Tag::Uhd4k) {
        pts += 25;
    } else if tags.contains(&Tag::FullHd) {
        pts += 15;
    } else if tags.contains(&Tag::Hd) {
        pts += 6;
    }

    if tags.contains(&Tag::Bdmv) {
        pts += 35;
    } else if tags.contains(&Tag::Remux) {
        pts += 30;
    } else if tags.contains(&Tag::Bluray) {
        pts += 24;
    } else if tags.contains(&Tag::Webdl) || tags.contains(&Tag::Webrip) {
        pts += 18;
    }

    if tags.contains(&Tag::Dv) {
        pts += 20;
    }
    if tags.contains(&Tag::Hdr) {
        pts += 10;
    }

    if tags.contains(&Tag::Atmos) {
        pts += 10;
    }
    if tags.contains(&Tag::Dtsx) {
        pts += 8;
    }
    if tags.contains(&Tag::Truehd) {
        pts += 6;
    }
    if tags.contains(&Tag::Dtshd) {
        pts += 5;
    }
    if tags.contains(&Tag::Ddp) {
        pts += 3;
    }

    if tags.contains(&Tag::X265) {
        pts += 4;
    }
    if tags.contains(&Tag::X264) {
        pts += 2;
    }

    if tags.contains(&Tag::FxSub) {
        pts += 6;
    } else if tags.contains(&Tag::CnSub) {
        pts += 3;
    }
    if tags.contains(&Tag::MultiAudio) {
        pts += 4;
    }

    if tags.contains(&Tag::Imax) {
        pts += 2;
    }
    if tags.contains(&Tag::Hfr) {
        pts += 2;
    }
    if tags.contains(&Tag::Collection) {
        pts += 2;
    }
    if name.contains("高码率") {
        pts += 4;
    }

    // carrying both 4k and 1080p at once is an ambiguous, suspect name
    if tags.contains(&Tag::Uhd4k) && tags.contains(&Tag::FullHd) {
        pts -= 12;
    }

    (f64::from(pts) / MAX_POINTS).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::tags::extract_tags;

    fn q(name: &str) -> f64 {
        quality_score(&extract_tags(name), name)
    }

    #[test]
    fn remux_uhd_scores_high() {
        // 4k(25) + remux(30) + hdr(10) + atmos(10) = 75
        let s = q("Inception.2010.2160p.UHD.BluRay.REMUX.HDR.Atmos-GROUP");
        assert!((s - 75.0 / 110.0).abs() < 1e-9, "got {s}");
    }

    #[test]
    fn source_tier_takes_highest_only() {
        // bdmv wins over remux and bluray in the same name: 35, not 35+30+24
        let s = q("Movie.BDMV.REMUX.BluRay");
        assert!((s - 35.0 / 110.0).abs() < 1e-9, "got {s}");
    }

    #[test]
    fn audio_formats_are_additive() {
        // 1080p(15) + truehd(6) + atmos(10) + ddp(3) = 34
        let s = q("Movie.1080p.TrueHD.Atmos.DDP");
        assert!((s - 34.0 / 110.0).abs() < 1e-9, "got {s}");
    }

    #[test]
    fn fx_sub_shadows_cn_sub() {
        // fx_sub implies cn_sub via the 字幕 substring; only the 6 counts
        // (1080p 15 + fx_sub 6 = 21)
        let s = q("电影 1080p 特效字幕");
        assert!((s - 21.0 / 110.0).abs() < 1e-9, "got {s}");
    }

    #[test]
    fn bitrate_marker_adds_points() {
        let without = q("电影 1080p");
        let with = q("电影 1080p 高码率");
        assert!((with - without - 4.0 / 110.0).abs() < 1e-9);
    }

    #[test]
    fn ambiguous_dual_resolution_is_penalized() {
        // 4k(25) + 1080p shadowed + penalty(-12) = 13
        let s = q("Movie.4K.1080p");
        assert!((s - 13.0 / 110.0).abs() < 1e-9, "got {s}");
    }

    #[test]
    fn bare_name_scores_zero() {
        assert_eq!(q("unlabeled thing"), 0.0);
    }
}
