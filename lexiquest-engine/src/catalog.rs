//! Static mini-game catalogue and pedagogical session ordering.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::constants::UNKNOWN_GAME_ORDER;

/// Catalogue entry for one mini-game. Read-only reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMetadata {
    pub id: String,
    #[serde(default = "default_order")]
    pub recommended_order: u32,
    #[serde(default)]
    pub keywords: Vec<String>,
}

fn default_order() -> u32 {
    UNKNOWN_GAME_ORDER
}

/// Container for all mini-game metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct GameCatalog {
    pub games: Vec<GameMetadata>,
}

impl GameCatalog {
    /// Create an empty catalogue (useful for tests)
    #[must_use]
    pub fn empty() -> Self {
        Self { games: Vec::new() }
    }

    /// Load catalogue data from JSON string
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid metadata.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Create a catalogue from pre-parsed entries
    #[must_use]
    pub fn from_games(games: Vec<GameMetadata>) -> Self {
        Self { games }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&GameMetadata> {
        self.games.iter().find(|game| game.id == id)
    }

    /// Sort rank for an id; unknown ids rank last.
    #[must_use]
    pub fn recommended_order(&self, id: &str) -> u32 {
        self.get(id)
            .map_or(UNKNOWN_GAME_ORDER, |game| game.recommended_order)
    }

    /// Order selected mini-game ids by the fixed pedagogical sequence.
    ///
    /// The sort is stable: ids sharing a rank (including unknown ids, which
    /// all rank last) keep their input order. Unknown ids are tolerated,
    /// never rejected.
    #[must_use]
    pub fn order_games<S: AsRef<str>>(&self, ids: &[S]) -> Vec<String> {
        let mut ordered: Vec<String> = ids.iter().map(|id| id.as_ref().to_string()).collect();
        ordered.sort_by_key(|id| self.recommended_order(id));
        ordered
    }

    /// All games whose keyword list contains `keyword`.
    #[must_use]
    pub fn games_for_keyword(&self, keyword: &str) -> Vec<&GameMetadata> {
        self.games
            .iter()
            .filter(|game| game.keywords.iter().any(|k| k == keyword))
            .collect()
    }
}

/// Built-in catalogue shipped with the engine.
///
/// Hosts may replace it via `GameCatalog::from_json`, but the ids and
/// ordering here match the product's default mini-game lineup.
pub fn default_catalog() -> &'static GameCatalog {
    static CATALOG: OnceLock<GameCatalog> = OnceLock::new();
    CATALOG.get_or_init(|| {
        GameCatalog::from_games(vec![
            entry("flashcards", 1, &["recall", "recognition"]),
            entry("matching", 2, &["recognition", "pairs"]),
            entry("listening", 3, &["audio", "comprehension"]),
            entry("typing", 4, &["spelling", "production"]),
            entry("translate", 5, &["production", "translation"]),
        ])
    })
}

fn entry(id: &str, recommended_order: u32, keywords: &[&str]) -> GameMetadata {
    GameMetadata {
        id: id.to_string(),
        recommended_order,
        keywords: keywords.iter().map(ToString::to_string).collect(),
    }
}
