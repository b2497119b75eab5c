use serde::{Deserialize, Serialize};

use crate::*;

/// Everything a game can be tuned with; missing fields fall back to their defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub game: GameSettings,
    pub ai: AiConfig,
    pub scoring: ScoringRules,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub difficulty: Difficulty,
    pub start_tile: StartTile,
    /// Fixed seed for reproducible games, random when absent.
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    pub reveal_points: i64,
    pub flag_points: i64,
    pub hint_penalty: i64,
    /// Player actions that have to pass before the next hint.
    pub hint_cooldown_moves: u32,
    /// Seconds-based bonus on a win: `max(0, time_bonus_base - elapsed)`.
    pub time_bonus_base: i64,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            reveal_points: 10,
            flag_points: 5,
            hint_penalty: 20,
            hint_cooldown_moves: 3,
            time_bonus_base: 1000,
        }
    }
}
