//! Day-granularity play streak tracking.
//!
//! Transitions compare calendar days (`NaiveDate`), never elapsed hours, so
//! a 23:59 play followed by a 00:01 play still counts as consecutive days.
//! The engine computes transitions only; the caller owns storage. Streak
//! data is best-effort: malformed or missing stored state degrades to "no
//! prior play" rather than blocking gameplay.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::KeyValueStore;
use crate::constants::STREAK_STATE_KEY;

/// Per-learner streak record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreakState {
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub last_play_date: Option<NaiveDate>,
}

/// How a play event affected the streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakOutcome {
    /// No prior play recorded; streak starts at 1.
    Fresh,
    /// Already played today; streak unchanged.
    ContinuedToday,
    /// Played yesterday; streak incremented.
    Incremented,
    /// Gap of two or more days; streak restarts at 1.
    Reset,
}

/// Apply a "session played" event for `today`.
///
/// Idempotent within a calendar day: replays after the first play of the
/// day return `ContinuedToday` and leave the streak untouched.
#[must_use]
pub fn record_play(state: &StreakState, today: NaiveDate) -> (StreakState, StreakOutcome) {
    let Some(last) = state.last_play_date else {
        return (
            StreakState {
                current_streak: 1,
                last_play_date: Some(today),
            },
            StreakOutcome::Fresh,
        );
    };

    match (today - last).num_days() {
        0 => (*state, StreakOutcome::ContinuedToday),
        1 => (
            StreakState {
                current_streak: state.current_streak.saturating_add(1),
                last_play_date: Some(today),
            },
            StreakOutcome::Incremented,
        ),
        _ => (
            StreakState {
                current_streak: 1,
                last_play_date: Some(today),
            },
            StreakOutcome::Reset,
        ),
    }
}

/// Zero out a stale streak without waiting for the next play event.
///
/// Run on app load so a learner who has been absent two or more days never
/// sees their old nonzero streak. The last play date is kept for audit;
/// only the displayed count is forced to 0.
#[must_use]
pub fn reconcile(state: &StreakState, today: NaiveDate) -> StreakState {
    match state.last_play_date {
        Some(last) if matches!((today - last).num_days(), 0 | 1) => *state,
        _ => StreakState {
            current_streak: 0,
            last_play_date: state.last_play_date,
        },
    }
}

/// Load streak state from the injected store, degrading to a fresh state
/// on any read or decode failure.
#[must_use]
pub fn load_streak<S: KeyValueStore>(store: &S) -> StreakState {
    match store.get(STREAK_STATE_KEY) {
        Ok(Some(payload)) => match serde_json::from_str(&payload) {
            Ok(state) => state,
            Err(err) => {
                log::warn!("discarding malformed streak payload: {err}");
                StreakState::default()
            }
        },
        Ok(None) => StreakState::default(),
        Err(err) => {
            log::warn!("streak store read failed: {err}");
            StreakState::default()
        }
    }
}

/// Persist streak state to the injected store as JSON.
///
/// # Errors
///
/// Returns the store's error when the write fails.
pub fn save_streak<S: KeyValueStore>(store: &S, state: &StreakState) -> Result<(), S::Error> {
    match serde_json::to_string(state) {
        Ok(payload) => store.set(STREAK_STATE_KEY, &payload),
        Err(err) => {
            log::warn!("failed to encode streak state: {err}");
            Ok(())
        }
    }
}
