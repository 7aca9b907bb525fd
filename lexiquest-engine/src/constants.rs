//! Centralized balance and tuning constants for the LexiQuest progression engine.
//!
//! These values define the deterministic math for XP awards, the level
//! curve, and streak bookkeeping. Keeping them together ensures progression
//! can only be adjusted via code changes reviewed in version control, rather
//! than through external assets.

// Points tuning ------------------------------------------------------------
/// Global multiplier applied to every raw in-game score before display.
pub const XP_MULTIPLIER: f64 = 0.25;
/// Reference vocabulary-set size; larger sets are scaled down to this.
pub const DEFAULT_TARGET_ITEMS: u32 = 10;

// Level curve tuning -------------------------------------------------------
/// Total XP spanned by the default level curve.
pub const DEFAULT_CURVE_TOTAL_XP: i64 = 1_000_000;
/// Number of levels in the default curve.
pub const DEFAULT_CURVE_MAX_LEVEL: u32 = 100;
/// Geometric growth rate of per-level XP deltas in the default curve.
pub const DEFAULT_CURVE_GROWTH_RATE: f64 = 1.06;

// Session ordering ---------------------------------------------------------
/// Sort rank assigned to mini-game ids missing from the catalogue.
pub const UNKNOWN_GAME_ORDER: u32 = 999;

// Storage keys -------------------------------------------------------------
/// Key under which streak state is persisted in the injected store.
pub const STREAK_STATE_KEY: &str = "lexiquest.streak";
