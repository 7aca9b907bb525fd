//! LexiQuest Progression Engine
//!
//! Platform-agnostic progression and scoring core for the LexiQuest
//! vocabulary-learning product. This crate converts raw per-session
//! gameplay performance into canonical XP awards, maps cumulative XP to a
//! level via a precomputed curve, and tracks day-granular play streaks,
//! without UI, HTTP, or platform-specific dependencies.

pub mod catalog;
pub mod constants;
pub mod level_curve;
pub mod numbers;
pub mod points;
pub mod streak;

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

// Re-export commonly used types
pub use catalog::{GameCatalog, GameMetadata, default_catalog};
pub use constants::{DEFAULT_TARGET_ITEMS, STREAK_STATE_KEY, UNKNOWN_GAME_ORDER, XP_MULTIPLIER};
pub use level_curve::{
    CurveCache, CurveConfigError, LevelCurveConfig, LevelProgress, LevelRow, level_for_xp,
    level_progress,
};
pub use points::{
    normalize_by_default_set_size, normalize_by_set_size, scale_points, scale_points_with,
};
pub use streak::{StreakOutcome, StreakState, load_streak, record_play, reconcile, save_streak};

/// Trait for abstracting key-value persistence of learner progression data.
/// Platform-specific implementations should provide this (browser storage,
/// a server-side profile record, or a test double).
pub trait KeyValueStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;
}

/// Everything a completed session changed, for display and persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionReward {
    /// XP awarded for this session.
    pub xp_delta: i64,
    /// Cumulative XP after the award.
    pub total_xp: i64,
    /// Displayed level for the new total.
    pub level: u32,
    /// XP remaining until the next level (0 at the final level).
    pub xp_to_next: i64,
    /// Streak value after the session.
    pub streak: u32,
    /// How the session affected the streak.
    pub streak_outcome: StreakOutcome,
}

/// Main engine facade composing the progression components over an
/// injected store.
///
/// Callers own the read-modify-write cycle around XP totals; that cycle is
/// not atomic across devices. Two devices advancing a streak from the same
/// stale state will both compute the same increment and the later write
/// wins. The engine adds no locking because it has no visibility into the
/// storage layer's concurrency control.
pub struct ProgressEngine<S>
where
    S: KeyValueStore,
{
    catalog: GameCatalog,
    curve_config: LevelCurveConfig,
    curve: Arc<[LevelRow]>,
    curves: CurveCache,
    store: S,
}

impl<S> ProgressEngine<S>
where
    S: KeyValueStore,
{
    /// Create an engine with the built-in catalogue and default level curve.
    pub fn new(store: S) -> Self {
        let mut curves = CurveCache::new();
        let curve_config = LevelCurveConfig::default();
        // The default config satisfies every validation bound, so generation
        // cannot fail here.
        let curve = curves
            .get_or_generate(&curve_config)
            .unwrap_or_else(|_| Vec::new().into());
        Self {
            catalog: default_catalog().clone(),
            curve_config,
            curve,
            curves,
            store,
        }
    }

    /// Create an engine with an explicit catalogue and curve configuration.
    ///
    /// # Errors
    ///
    /// Returns `CurveConfigError` when the curve configuration is invalid;
    /// validation happens eagerly so later lookups are infallible.
    pub fn with_config(
        store: S,
        catalog: GameCatalog,
        curve_config: LevelCurveConfig,
    ) -> Result<Self, CurveConfigError> {
        let mut curves = CurveCache::new();
        let curve = curves.get_or_generate(&curve_config)?;
        Ok(Self {
            catalog,
            curve_config,
            curve,
            curves,
            store,
        })
    }

    /// Canonical "today" for streak purposes: the current UTC calendar day.
    ///
    /// A single day-boundary reference keeps streaks from breaking or
    /// double-counting when a device clock crosses midnight differently
    /// from the server.
    #[must_use]
    pub fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    #[must_use]
    pub fn catalog(&self) -> &GameCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn curve_config(&self) -> &LevelCurveConfig {
        &self.curve_config
    }

    /// The engine's level curve, shared read-only.
    #[must_use]
    pub fn level_table(&self) -> Arc<[LevelRow]> {
        Arc::clone(&self.curve)
    }

    /// Fetch (and memoize) the curve for an alternative configuration,
    /// e.g. a separate curve per game mode.
    ///
    /// # Errors
    ///
    /// Returns `CurveConfigError` when the configuration is invalid.
    pub fn curve_for(
        &mut self,
        config: &LevelCurveConfig,
    ) -> Result<Arc<[LevelRow]>, CurveConfigError> {
        self.curves.get_or_generate(config)
    }

    /// Level and progress-bar math for a cumulative XP total.
    #[must_use]
    pub fn progress_for_xp(&self, total_xp: i64) -> LevelProgress {
        level_progress(&self.curve, total_xp)
    }

    /// Order selected mini-game ids by the catalogue's pedagogical sequence.
    #[must_use]
    pub fn recommended_order<I: AsRef<str>>(&self, ids: &[I]) -> Vec<String> {
        self.catalog.order_games(ids)
    }

    /// Record a completed game session.
    ///
    /// Normalizes the raw score against the set size, applies the global
    /// multiplier, advances the persisted streak for the current UTC day,
    /// and reports the learner's new totals for display.
    ///
    /// # Errors
    ///
    /// Returns the store's error when the updated streak cannot be saved.
    pub fn complete_session(
        &self,
        raw_score: f64,
        item_count: f64,
        total_xp_before: i64,
    ) -> Result<SessionReward, S::Error> {
        self.complete_session_on(raw_score, item_count, total_xp_before, Self::today())
    }

    /// `complete_session` with an explicit day, for deterministic callers.
    ///
    /// # Errors
    ///
    /// Returns the store's error when the updated streak cannot be saved.
    pub fn complete_session_on(
        &self,
        raw_score: f64,
        item_count: f64,
        total_xp_before: i64,
        today: NaiveDate,
    ) -> Result<SessionReward, S::Error> {
        let normalized = normalize_by_default_set_size(raw_score, item_count);
        let xp_delta = scale_points(numbers::i64_to_f64(normalized));
        let total_xp = total_xp_before.max(0).saturating_add(xp_delta);

        let before = load_streak(&self.store);
        let (after, streak_outcome) = record_play(&before, today);
        if after != before {
            save_streak(&self.store, &after)?;
        }
        log::debug!(
            "session complete: raw={raw_score} items={item_count} xp_delta={xp_delta} streak={}",
            after.current_streak
        );

        let progress = level_progress(&self.curve, total_xp);
        Ok(SessionReward {
            xp_delta,
            total_xp,
            level: progress.level,
            xp_to_next: progress.xp_to_next,
            streak: after.current_streak,
            streak_outcome,
        })
    }

    /// Reconcile the persisted streak on app load.
    ///
    /// A streak that went stale while the learner was absent is zeroed
    /// immediately instead of lingering until the next play event. The
    /// store is only written when the state actually changed, so repeated
    /// loads within a day are idempotent.
    ///
    /// # Errors
    ///
    /// Returns the store's error when the reconciled state cannot be saved.
    pub fn reconcile_on_load(&self) -> Result<StreakState, S::Error> {
        self.reconcile_on_load_at(Self::today())
    }

    /// `reconcile_on_load` with an explicit day, for deterministic callers.
    ///
    /// # Errors
    ///
    /// Returns the store's error when the reconciled state cannot be saved.
    pub fn reconcile_on_load_at(&self, today: NaiveDate) -> Result<StreakState, S::Error> {
        let before = load_streak(&self.store);
        let after = reconcile(&before, today);
        if after != before {
            save_streak(&self.store, &after)?;
        }
        Ok(after)
    }

    /// Load the persisted streak without the degraded-path fallback.
    ///
    /// The regular load path swallows store and decode failures by design;
    /// this strict variant surfaces them for diagnostics.
    ///
    /// # Errors
    ///
    /// Returns an error when the store read fails or the stored payload is
    /// not valid streak JSON.
    pub fn load_streak_strict(&self) -> Result<Option<StreakState>, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        let Some(payload) = self.store.get(STREAK_STATE_KEY).map_err(Into::into)? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&payload)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::convert::Infallible;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct MemoryStore {
        entries: Rc<RefCell<HashMap<String, String>>>,
    }

    impl KeyValueStore for MemoryStore {
        type Error = Infallible;

        fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
            Ok(self.entries.borrow().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
            self.entries
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn session_reward_composes_normalizer_and_curve() {
        let engine = ProgressEngine::new(MemoryStore::default());
        let today = date(2026, 4, 1);

        // 50-item set: factor 0.2, then the 0.25 multiplier.
        let reward = engine.complete_session_on(100.0, 50.0, 0, today).unwrap();
        assert_eq!(reward.xp_delta, 5);
        assert_eq!(reward.total_xp, 5);
        assert_eq!(reward.level, 1);
        assert_eq!(reward.streak, 1);
        assert_eq!(reward.streak_outcome, StreakOutcome::Fresh);
    }

    #[test]
    fn same_day_sessions_do_not_double_count_streak() {
        let engine = ProgressEngine::new(MemoryStore::default());
        let today = date(2026, 4, 1);

        let first = engine.complete_session_on(80.0, 10.0, 0, today).unwrap();
        let second = engine
            .complete_session_on(40.0, 10.0, first.total_xp, today)
            .unwrap();
        assert_eq!(second.streak, 1);
        assert_eq!(second.streak_outcome, StreakOutcome::ContinuedToday);
        assert_eq!(second.total_xp, 30);
    }

    #[test]
    fn consecutive_days_grow_the_streak() {
        let engine = ProgressEngine::new(MemoryStore::default());
        engine
            .complete_session_on(10.0, 10.0, 0, date(2026, 4, 1))
            .unwrap();
        let next = engine
            .complete_session_on(10.0, 10.0, 0, date(2026, 4, 2))
            .unwrap();
        assert_eq!(next.streak, 2);
        assert_eq!(next.streak_outcome, StreakOutcome::Incremented);
    }

    #[test]
    fn reconcile_on_load_zeroes_stale_streak() {
        let store = MemoryStore::default();
        let engine = ProgressEngine::new(store.clone());
        engine
            .complete_session_on(10.0, 10.0, 0, date(2026, 4, 1))
            .unwrap();

        let state = engine.reconcile_on_load_at(date(2026, 4, 5)).unwrap();
        assert_eq!(state.current_streak, 0);

        // The zeroed state is persisted, not just computed.
        let stored = engine.load_streak_strict().unwrap().unwrap();
        assert_eq!(stored.current_streak, 0);
    }

    #[test]
    fn malformed_store_payload_degrades_to_fresh() {
        let store = MemoryStore::default();
        store.set(STREAK_STATE_KEY, "not json").unwrap();
        let engine = ProgressEngine::new(store);

        assert!(engine.load_streak_strict().is_err());
        let reward = engine
            .complete_session_on(10.0, 10.0, 0, date(2026, 4, 1))
            .unwrap();
        assert_eq!(reward.streak, 1);
        assert_eq!(reward.streak_outcome, StreakOutcome::Fresh);
    }

    #[test]
    fn with_config_rejects_invalid_curves() {
        let result = ProgressEngine::with_config(
            MemoryStore::default(),
            GameCatalog::empty(),
            LevelCurveConfig {
                total_xp: -1,
                ..LevelCurveConfig::default()
            },
        );
        assert!(matches!(
            result,
            Err(CurveConfigError::NonPositiveTotalXp { .. })
        ));
    }

    #[test]
    fn curve_for_memoizes_alternate_modes() {
        let mut engine = ProgressEngine::new(MemoryStore::default());
        let config = LevelCurveConfig {
            total_xp: 10_000,
            max_level: 20,
            growth_rate: 1.1,
        };
        let first = engine.curve_for(&config).unwrap();
        let second = engine.curve_for(&config).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 20);
    }

    #[test]
    fn recommended_order_uses_catalog() {
        let engine = ProgressEngine::new(MemoryStore::default());
        assert_eq!(
            engine.recommended_order(&["translate", "flashcards"]),
            vec!["flashcards", "translate"]
        );
    }
}
