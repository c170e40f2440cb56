// src/ranking/tags.rs
//! Tag extraction: a closed categorical vocabulary derived from a resource
//! name, plus the single tag→label decision table used for user-facing
//! quality/resolution/codec labels.
//!
//! Detection is independent keyword/regex presence — a name may carry any
//! subset, and the result is a set (no priority between detectors). Priority
//! only enters the picture when tags are *consumed* (quality points, labels,
//! plausibility bands).

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::normalize::nfkc;

/// One element of the closed tag vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    // resolution
    #[serde(rename = "4k")]
    Uhd4k,
    #[serde(rename = "1080p")]
    FullHd,
    #[serde(rename = "720p")]
    Hd,
    // dynamic range
    Hdr,
    Dv,
    // source tier
    Remux,
    Bdmv,
    Bluray,
    Webdl,
    Webrip,
    // special edition
    Imax,
    // codec
    X265,
    X264,
    // audio
    Ddp,
    Truehd,
    Dtshd,
    Atmos,
    Dtsx,
    // subtitles
    FxSub,
    CnSub,
    // misc markers
    MultiAudio,
    Collection,
    Hfr,
}

/// A set of tags derived from one resource name.
pub type TagSet = BTreeSet<Tag>;

static RES_4K: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b2160p\b|4k|uhd").expect("4k regex"));
static RES_1080P: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b1080p\b").expect("1080p regex"));
static RES_720P: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b720p\b").expect("720p regex"));
static DV_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bdv\b").expect("dv regex"));
static HFR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b60fps\b|\b120fps\b|高帧").expect("hfr regex"));

/// Derive the tag set for a resource name. Deterministic: the same name
/// always yields the same set.
pub fn extract_tags(name: &str) -> TagSet {
    let n = nfkc(name);
    let nl = n.to_lowercase();
    let mut tags = TagSet::new();

    if RES_4K.is_match(&nl) {
        tags.insert(Tag::Uhd4k);
    }
    if RES_1080P.is_match(&nl) {
        tags.insert(Tag::FullHd);
    }
    if RES_720P.is_match(&nl) {
        tags.insert(Tag::Hd);
    }

    if nl.contains("hdr") {
        tags.insert(Tag::Hdr);
    }
    if nl.contains("dolby vision") || n.contains("杜比视界") || DV_WORD.is_match(&nl) {
        tags.insert(Tag::Dv);
    }

    if nl.contains("remux") {
        tags.insert(Tag::Remux);
    }
    if nl.contains("bdmv") {
        tags.insert(Tag::Bdmv);
    }
    if nl.contains("bluray") || n.contains("蓝光") || n.contains("原盘") {
        tags.insert(Tag::Bluray);
    }

    if nl.contains("web-dl") || nl.contains("webdl") {
        tags.insert(Tag::Webdl);
    }
    if nl.contains("webrip") {
        tags.insert(Tag::Webrip);
    }

    if nl.contains("imax") {
        tags.insert(Tag::Imax);
    }

    if nl.contains("x265") || nl.contains("h.265") || nl.contains("hevc") {
        tags.insert(Tag::X265);
    }
    if nl.contains("x264") || nl.contains("h.264") {
        tags.insert(Tag::X264);
    }

    if nl.contains("ddp") || nl.contains("eac3") {
        tags.insert(Tag::Ddp);
    }
    if nl.contains("truehd") {
        tags.insert(Tag::Truehd);
    }
    if nl.contains("dts-hd") || nl.contains("dtshd") {
        tags.insert(Tag::Dtshd);
    }
    if nl.contains("atmos") || n.contains("杜比全景声") {
        tags.insert(Tag::Atmos);
    }
    if nl.contains("dtsx") {
        tags.insert(Tag::Dtsx);
    }

    if n.contains("特效字幕") {
        tags.insert(Tag::FxSub);
    }
    if n.contains("中字") || n.contains("字幕") {
        tags.insert(Tag::CnSub);
    }
    if n.contains("国英") || n.contains("双语") || n.contains("双音") {
        tags.insert(Tag::MultiAudio);
    }
    if n.contains("合集") || n.contains("系列") {
        tags.insert(Tag::Collection);
    }
    if HFR.is_match(&n) {
        tags.insert(Tag::Hfr);
    }

    tags
}

/* ----------------------------
User-facing labels — one decision table
---------------------------- */

/// Coarse quality level shown to users: 极高 / 高 / 中高 / 中 / 低.
pub fn quality_level(tags: &TagSet) -> &'static str {
    if tags.contains(&Tag::Bdmv) || tags.contains(&Tag::Remux) {
        "极高"
    } else if tags.contains(&Tag::Uhd4k) {
        "高"
    } else if tags.contains(&Tag::FullHd) {
        "中高"
    } else if tags.contains(&Tag::Hd) {
        "中"
    } else {
        "低"
    }
}

/// Resolution label: 4K / 1080P / 720P / 未知.
pub fn resolution_label(tags: &TagSet) -> &'static str {
    if tags.contains(&Tag::Uhd4k) {
        "4K"
    } else if tags.contains(&Tag::FullHd) {
        "1080P"
    } else if tags.contains(&Tag::Hd) {
        "720P"
    } else {
        "未知"
    }
}

/// Codec label. Disc-tier sources ship modern codecs; anything else is
/// unknown from the name alone.
pub fn codec_label(tags: &TagSet) -> &'static str {
    if tags.contains(&Tag::Bdmv) || tags.contains(&Tag::Remux) || tags.contains(&Tag::Bluray) {
        "H.265/H.264"
    } else {
        "未知"
    }
}
