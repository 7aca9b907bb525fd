//! Raw score to XP conversion.
//!
//! Both functions run on the score-display path, so they are total: any
//! numeric input, including NaN and negative counts, maps to a sane XP
//! amount instead of an error.

use crate::constants::{DEFAULT_TARGET_ITEMS, XP_MULTIPLIER};
use crate::numbers::round_f64_to_i64;

/// Scale a raw in-game score by the global XP multiplier.
///
/// Output is always a non-negative integer; non-finite input counts as 0.
#[must_use]
pub fn scale_points(raw: f64) -> i64 {
    scale_points_with(raw, XP_MULTIPLIER)
}

/// Scale a raw score with an explicit multiplier.
#[must_use]
pub fn scale_points_with(raw: f64, multiplier: f64) -> i64 {
    round_f64_to_i64(sanitize_score(raw) * multiplier.max(0.0)).max(0)
}

/// Normalize a raw score against the vocabulary-set size.
///
/// Sets larger than `target_items` are scaled down proportionally so a
/// 50-word set cannot out-earn a 10-word set on per-word performance alone.
/// Sets at or below the target keep the full raw score; the factor never
/// exceeds 1.
#[must_use]
pub fn normalize_by_set_size(raw: f64, item_count: f64, target_items: u32) -> i64 {
    round_f64_to_i64(sanitize_score(raw) * set_size_factor(item_count, target_items)).max(0)
}

/// Normalize against the default target set size.
#[must_use]
pub fn normalize_by_default_set_size(raw: f64, item_count: f64) -> i64 {
    normalize_by_set_size(raw, item_count, DEFAULT_TARGET_ITEMS)
}

fn sanitize_score(raw: f64) -> f64 {
    if raw.is_finite() { raw.max(0.0) } else { 0.0 }
}

fn set_size_factor(item_count: f64, target_items: u32) -> f64 {
    let count = if item_count.is_finite() {
        item_count.floor().max(1.0)
    } else {
        1.0
    };
    (f64::from(target_items) / count).min(1.0)
}
