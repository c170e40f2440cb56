// src/ranking/signals.rs
//! Popularity and freshness: two independent [0,1] signals from raw view
//! counts and update timestamps.
//!
//! Freshness is computed against an explicitly injected reference instant —
//! callers pass wall-clock now in production and fixed instants in tests, so
//! scoring stays a pure function of its inputs.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Log-scaled view count, saturating at 200 views.
/// Missing or non-numeric views score 0.0.
pub fn popularity_score(views: Option<f64>) -> f64 {
    let v = match views {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        _ => return 0.0,
    };
    ((1.0 + v).ln() / 201f64.ln()).min(1.0)
}

/// Exponential decay of listing age with a 60-day time constant.
/// Missing or unparseable timestamps score a neutral 0.5.
pub fn freshness_score(update_time: Option<&str>, now: DateTime<Utc>) -> f64 {
    let Some(raw) = update_time else {
        return 0.5;
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return 0.5;
    }
    let Some(updated) = parse_timestamp(raw) else {
        return 0.5;
    };
    let age_days = (now - updated).num_seconds() as f64 / 86_400.0;
    (-age_days.max(0.0) / 60.0).exp()
}

/// ISO-8601-ish parsing: full RFC 3339 (with "Z" normalized to a UTC offset),
/// then naive date-times assumed UTC, then a bare date.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.replace('Z', "+00:00");
    if let Ok(dt) = DateTime::parse_from_rfc3339(&s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }
    None
}
