//! Level curve generation and lookup.
//!
//! The curve is the contract learners see: per-level XP deltas follow a
//! geometric progression (early levels cheap, late levels expensive) while
//! the cumulative total at the final level matches the configured total XP
//! exactly, so "100 levels, 1,000,000 XP" is a hard guarantee rather than
//! an approximation.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_CURVE_GROWTH_RATE, DEFAULT_CURVE_MAX_LEVEL, DEFAULT_CURVE_TOTAL_XP,
};
use crate::numbers::{i64_to_f64, round_f64_to_i64};

/// Immutable input to curve generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelCurveConfig {
    pub total_xp: i64,
    pub max_level: u32,
    pub growth_rate: f64,
}

impl Default for LevelCurveConfig {
    fn default() -> Self {
        Self {
            total_xp: DEFAULT_CURVE_TOTAL_XP,
            max_level: DEFAULT_CURVE_MAX_LEVEL,
            growth_rate: DEFAULT_CURVE_GROWTH_RATE,
        }
    }
}

impl LevelCurveConfig {
    /// Validate configuration invariants before generation.
    ///
    /// # Errors
    ///
    /// Returns `CurveConfigError` when any field violates the documented
    /// bounds.
    pub fn validate(&self) -> Result<(), CurveConfigError> {
        if self.total_xp <= 0 {
            return Err(CurveConfigError::NonPositiveTotalXp {
                value: self.total_xp,
            });
        }
        if self.max_level == 0 {
            return Err(CurveConfigError::ZeroMaxLevel);
        }
        if !self.growth_rate.is_finite() || self.growth_rate <= 1.0 {
            return Err(CurveConfigError::GrowthRateTooLow {
                value: self.growth_rate,
            });
        }
        Ok(())
    }

    pub(crate) fn cache_key(&self) -> CurveKey {
        (self.total_xp, self.max_level, self.growth_rate.to_bits())
    }
}

/// Configuration errors reported by curve generation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveConfigError {
    #[error("total_xp must be positive (got {value})")]
    NonPositiveTotalXp { value: i64 },
    #[error("max_level must be at least 1")]
    ZeroMaxLevel,
    #[error("growth_rate must be greater than 1 (got {value})")]
    GrowthRateTooLow { value: f64 },
}

/// One level of a generated curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRow {
    /// Level number, 1-based.
    pub level: u32,
    /// XP required to complete this level.
    pub delta_xp: i64,
    /// Running XP total once this level is complete.
    pub cumulative_xp: i64,
}

/// Position of a cumulative XP total within a curve, for progress displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub level: u32,
    pub xp_into_level: i64,
    pub xp_to_next: i64,
}

/// Generate the level curve for a configuration.
///
/// Deltas follow `B * growth_rate^(level-1)` with `B` chosen so the
/// geometric series sums to `total_xp`. Rounding error is absorbed by the
/// final level's delta so the cumulative total matches `total_xp` exactly.
/// When that correction would drive the final delta below 1 it is clamped
/// to 1 and the total deviates by the clamp amount; this only happens for
/// totals smaller than the level count.
///
/// # Errors
///
/// Returns `CurveConfigError` for non-positive `total_xp`, a zero
/// `max_level`, or `growth_rate <= 1`.
pub fn generate(config: &LevelCurveConfig) -> Result<Vec<LevelRow>, CurveConfigError> {
    config.validate()?;

    let levels = config.max_level;
    let total = i64_to_f64(config.total_xp);
    let rate = config.growth_rate;

    let denominator = rate.powf(f64::from(levels)) - 1.0;
    let base = if denominator.abs() < f64::EPSILON {
        total / f64::from(levels)
    } else {
        total * (rate - 1.0) / denominator
    };

    let mut deltas: Vec<i64> = (0..levels)
        .map(|step| round_f64_to_i64(base * rate.powf(f64::from(step))).max(1))
        .collect();

    let sum: i64 = deltas.iter().sum();
    if let Some(last) = deltas.last_mut() {
        *last = last.saturating_add(config.total_xp - sum).max(1);
    }

    let mut cumulative = 0i64;
    let rows = deltas
        .into_iter()
        .enumerate()
        .map(|(index, delta_xp)| {
            cumulative += delta_xp;
            LevelRow {
                level: index as u32 + 1,
                delta_xp,
                cumulative_xp: cumulative,
            }
        })
        .collect();
    Ok(rows)
}

/// Displayed level for a cumulative XP total.
///
/// 0 XP is level 1; completing level `L` (reaching its `cumulative_xp`)
/// advances to `L + 1`, capped at the curve's final level.
#[must_use]
pub fn level_for_xp(rows: &[LevelRow], xp: i64) -> u32 {
    let completed = rows
        .iter()
        .take_while(|row| row.cumulative_xp <= xp)
        .count() as u32;
    (completed + 1).min(rows.len() as u32).max(1)
}

/// Progress-bar math for a cumulative XP total.
#[must_use]
pub fn level_progress(rows: &[LevelRow], xp: i64) -> LevelProgress {
    let xp = xp.max(0);
    let level = level_for_xp(rows, xp);
    let start = if level >= 2 {
        rows[level as usize - 2].cumulative_xp
    } else {
        0
    };
    let end = rows
        .get(level as usize - 1)
        .map_or(start, |row| row.cumulative_xp);
    LevelProgress {
        level,
        xp_into_level: (xp - start).max(0),
        xp_to_next: (end - xp).max(0),
    }
}

pub(crate) type CurveKey = (i64, u32, u64);

/// Explicit memoization of generated curves, keyed by their config.
///
/// Entries are immutable once produced, so handing out shared `Arc` slices
/// is safe. The cache is owned by whichever component constructs the
/// engine rather than living in process-wide state, so independent curves
/// (e.g. per game mode) can coexist.
#[derive(Debug, Default)]
pub struct CurveCache {
    entries: HashMap<CurveKey, Arc<[LevelRow]>>,
}

impl CurveCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the curve for a config, generating and caching it on first use.
    ///
    /// # Errors
    ///
    /// Returns `CurveConfigError` when the config is invalid; nothing is
    /// cached in that case.
    pub fn get_or_generate(
        &mut self,
        config: &LevelCurveConfig,
    ) -> Result<Arc<[LevelRow]>, CurveConfigError> {
        let key = config.cache_key();
        if let Some(rows) = self.entries.get(&key) {
            return Ok(Arc::clone(rows));
        }
        let rows: Arc<[LevelRow]> = generate(config)?.into();
        self.entries.insert(key, Arc::clone(&rows));
        Ok(rows)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
