// src/ranking/confidence.rs
//! Match confidence: text similarity modulated by intent and plausibility,
//! with a hard dampener for low-signal candidates.

/// Compose the [0,1] match confidence.
///
/// Similarity is the carrier; intent and plausibility together swing the
/// result by at most 30%. A candidate whose name barely matches the query
/// (`text_sim < 0.25`) or that is judged not to be video at all
/// (`intent == 0`) is dampened to 15% of its undamped value — no amount of
/// quality or popularity should rescue it.
pub fn compose_confidence(text_sim: f64, intent: f64, plausibility: f64) -> f64 {
    let mut conf = text_sim * (0.7 + 0.3 * (0.5 * intent + 0.5 * plausibility));
    conf = conf.clamp(0.0, 1.0);
    if text_sim < 0.25 || intent == 0.0 {
        conf *= 0.15;
    }
    conf
}
