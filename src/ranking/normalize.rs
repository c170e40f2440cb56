// src/ranking/normalize.rs
//! Shared text normalization for the ranking components.
//!
//! Listing names mix scripts, full-width punctuation, and inconsistent case;
//! every matcher works on an NFKC compatibility fold so that e.g. full-width
//! "１０８０Ｐ" and "1080p" compare equal.

use unicode_normalization::UnicodeNormalization;

/// NFKC compatibility fold, original case preserved.
pub(crate) fn nfkc(s: &str) -> String {
    s.nfkc().collect()
}

/// NFKC fold + lowercase. The form most keyword tables match against.
pub(crate) fn nfkc_lower(s: &str) -> String {
    s.nfkc().collect::<String>().to_lowercase()
}

/// NFKC fold + lowercase + all whitespace removed. Used for substring and
/// bigram comparison where spacing conventions carry no signal.
pub(crate) fn squash(s: &str) -> String {
    s.nfkc()
        .collect::<String>()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}
