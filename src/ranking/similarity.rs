// src/ranking/similarity.rs
//! Lexical closeness between the search query and a listing name.
//!
//! A literal substring hit (after NFKC fold, case fold, whitespace squash) is
//! a perfect 1.0. Otherwise two weaker signals compete and the better one
//! wins: character-bigram Jaccard similarity, and the fraction of the query's
//! alphanumeric tokens that reappear in the name (down-weighted ×0.9 so that
//! partial token coverage never outranks a true substring/bigram match).

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use super::normalize::{nfkc_lower, squash};

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z0-9]+").expect("token regex"));

/// Character bigrams of a squashed string. Single-character strings degrade
/// to a one-element set so Jaccard stays defined.
fn bigrams(s: &str) -> BTreeSet<String> {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() >= 2 {
        chars.windows(2).map(|w| w.iter().collect()).collect()
    } else {
        std::iter::once(s.to_string()).collect()
    }
}

/// Similarity in [0,1] between a query and a resource name.
pub fn text_similarity(query: &str, name: &str) -> f64 {
    let qn = squash(query);
    let nn = squash(name);
    if qn.is_empty() || nn.is_empty() {
        return 0.0;
    }
    if nn.contains(&qn) {
        return 1.0;
    }

    let qbg = bigrams(&qn);
    let nbg = bigrams(&nn);
    let inter = qbg.intersection(&nbg).count();
    let uni = qbg.union(&nbg).count();
    let jaccard = if uni > 0 {
        inter as f64 / uni as f64
    } else {
        0.0
    };

    let ql = nfkc_lower(query);
    let nl = nfkc_lower(name);
    let query_tokens: Vec<&str> = TOKEN_RE.find_iter(&ql).map(|m| m.as_str()).collect();
    let name_tokens: BTreeSet<&str> = TOKEN_RE.find_iter(&nl).map(|m| m.as_str()).collect();
    let token_hit = if query_tokens.is_empty() {
        0.0
    } else {
        let hits = query_tokens
            .iter()
            .filter(|t| name_tokens.contains(*t))
            .count();
        hits as f64 / query_tokens.len().max(1) as f64
    };

    jaccard.max(token_hit * 0.9)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substring_is_perfect() {
        assert_eq!(text_similarity("Matrix", "The.Matrix.1999.1080p"), 1.0);
        // whitespace and case carry no signal
        assert_eq!(text_similarity("the matrix", "THE MATRIX 1999"), 1.0);
    }

    #[test]
    fn cjk_substring_is_perfect() {
        assert_eq!(text_similarity("流浪地球", "流浪地球2 4K 蓝光原盘"), 1.0);
    }

    #[test]
    fn empty_sides_score_zero() {
        assert_eq!(text_similarity("", "anything"), 0.0);
        assert_eq!(text_similarity("query", "   "), 0.0);
    }

    #[test]
    fn token_coverage_is_downweighted() {
        // both tokens present but not contiguous → token path caps at 0.9
        let sim = text_similarity("inception 2010", "2010.film.inception.bluray");
        assert!(sim <= 0.9 + 1e-9, "got {sim}");
        assert!(sim > 0.5, "got {sim}");
    }

    #[test]
    fn unrelated_names_score_low() {
        let sim = text_similarity("Inception", "Cooking.Masterclass.S02");
        assert!(sim < 0.25, "got {sim}");
    }

    #[test]
    fn single_char_query_degrades_gracefully() {
        // one-char strings use a one-element bigram set; no panic, sane range
        let sim = text_similarity("X", "X.Study.Guide");
        assert!((0.0..=1.0).contains(&sim));
    }
}
