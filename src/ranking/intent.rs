// src/ranking/intent.rs
//! Intent classification: is this listing plausibly the wanted *video*
//! content, or text/app/archive/guide junk riding on a popular title?
//!
//! Also home of the hard-reject filter that runs before any scoring — a
//! rejected candidate never enters the ranked list at all.

use super::normalize::nfkc;
use super::tags::{Tag, TagSet};

/// Markers of non-video junk: commentary scripts, patches, cracked apps,
/// courses, e-books and the like. Matched against the NFKC name both
/// case-sensitively and after case fold.
const VIDEO_NEG: &[&str] = &[
    "解说文案",
    "文案",
    "讲解稿",
    "台词",
    "脚本",
    "宣传文案",
    "攻略",
    "补丁",
    "修改器",
    "安装",
    "破解版",
    "内购",
    "加速器",
    "网游",
    "手游",
    "客户端",
    ".apk",
    ".exe",
    ".torrent",
    ".pdf",
    ".doc",
    ".docx",
    ".ppt",
    ".pptx",
    ".xls",
    ".xlsx",
    "课程",
    "教程",
    "小说",
    "听书",
];

/// Document file extensions. Any of these in a name is a certain non-video.
pub(crate) const DOC_EXT: &[&str] = &[
    ".pdf", ".epub", ".mobi", ".azw", ".azw3", ".txt", ".doc", ".docx", ".ppt", ".pptx", ".xls",
    ".xlsx",
];

/// Archive extensions — ambiguous: can wrap a disc image or a pile of junk.
pub(crate) const ARCHIVE_EXT: &[&str] = &[".zip", ".rar", ".7z", ".tar", ".gz", ".bz2"];

/// Markers of genuine video content.
const VIDEO_POS: &[&str] = &[
    "电影",
    "影视",
    "剧集",
    "电视剧",
    "网盘",
    "蓝光",
    "原盘",
    "remux",
    "bdmv",
    "webrip",
    "web-dl",
    "1080p",
    "2160p",
    "4k",
    "720p",
    "x264",
    "x265",
    "hevc",
    "hdr",
    "dv",
    "杜比",
    "atmos",
    "dtsx",
    "中字",
    "字幕",
];

/// Tags whose presence claims high quality — a tiny size contradicts them.
pub(crate) const HIGH_TIER: &[Tag] = &[
    Tag::Uhd4k,
    Tag::Bdmv,
    Tag::Remux,
    Tag::Bluray,
    Tag::Dv,
    Tag::Hdr,
];

fn has_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn has_high_tier(tags: &TagSet) -> bool {
    HIGH_TIER.iter().any(|t| tags.contains(t))
}

/// Intent score in [0,1]. 0.0 means "certainly not the video itself".
pub fn intent_score(name: &str, size_gb: Option<f64>, tags: &TagSet) -> f64 {
    let n = nfkc(name);
    let nl = n.to_lowercase();

    if has_any(&n, VIDEO_NEG) || has_any(&nl, VIDEO_NEG) {
        // An ISO can legitimately be a full disc backup even though "安装"
        // style keywords also fire on installer-looking names.
        if nl.contains(".iso")
            && (tags.contains(&Tag::Bluray) || tags.contains(&Tag::Bdmv) || n.contains("原盘"))
        {
            return 0.7;
        }
        return 0.0;
    }

    if DOC_EXT.iter().any(|ext| nl.contains(ext)) {
        return 0.0;
    }

    if ARCHIVE_EXT.iter().any(|ext| nl.contains(ext)) {
        if tags.contains(&Tag::Remux) || tags.contains(&Tag::Bdmv) || tags.contains(&Tag::Bluray) {
            return 0.6;
        }
        if size_gb.is_some_and(|s| s >= 1.5) {
            return 0.4;
        }
        return 0.0;
    }

    let mut pos: f64 = 0.0;
    if has_any(&n, VIDEO_POS) {
        pos += 0.7;
    }
    if !tags.is_empty() {
        pos += 0.2;
    }
    if size_gb.is_some_and(|s| s >= 0.7) {
        pos += 0.1;
    }
    pos.min(1.0)
}

/// Pre-scoring hard filter. `true` means the candidate is dropped before any
/// score is computed.
pub fn hard_reject(name: &str, size_gb: Option<f64>, tags: &TagSet) -> bool {
    let nl = nfkc(name).to_lowercase();

    if DOC_EXT.iter().any(|ext| nl.contains(ext)) {
        return true;
    }
    if nl.contains(".apk") || nl.contains(".exe") || nl.contains(".torrent") {
        return true;
    }
    // Small or size-less archives are overwhelmingly junk bundles.
    if ARCHIVE_EXT.iter().any(|ext| nl.contains(ext)) && !size_gb.is_some_and(|s| s >= 0.7) {
        return true;
    }
    // A sub-half-gigabyte "4K remux" is an internally inconsistent claim.
    if size_gb.is_some_and(|s| s < 0.5) && has_high_tier(tags) {
        return true;
    }
    false
}
