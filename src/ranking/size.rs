// src/ranking/size.rs
//! Size normalization: free-text size expressions → gigabytes.
//!
//! Listing sizes are human-typed ("12.5GB", "700 MB", "2T", "４５Ｇ"); this
//! parser never fails — anything without a recognizable number+unit pair is
//! simply an unknown size (`None`), which downstream scorers treat as a
//! neutral/penalized signal rather than an error.

use once_cell::sync::Lazy;
use regex::Regex;

use super::normalize::nfkc_lower;

static SIZE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([\d.]+)\s*(tb|t|gb|g|mb|m|kb|k)").expect("size regex"));

/// Parse a free-text size expression into gigabytes.
///
/// Units are case-insensitive and may be abbreviated to a single letter:
/// TB/T ×1024, GB/G ×1, MB/M ÷1024, KB/K ÷1024².
pub fn parse_size_gb(raw: &str) -> Option<f64> {
    if raw.trim().is_empty() {
        return None;
    }
    let s = nfkc_lower(raw);
    let caps = SIZE_RE.captures(&s)?;
    // `[\d.]+` admits things like "1.2.3"; a failed numeric parse is an
    // unknown size, not an error.
    let value: f64 = caps[1].parse().ok()?;
    match &caps[2] {
        "tb" | "t" => Some(value * 1024.0),
        "gb" | "g" => Some(value),
        "mb" | "m" => Some(value / 1024.0),
        "kb" | "k" => Some(value / (1024.0 * 1024.0)),
        _ => None,
    }
}
