//! The assistant that watches the player's moves.
//!
//! After every successful reveal it updates its danger zones, may move mines closer to where the player is
//! working, may transform a hidden tile, and adapts its difficulty factor to the player's success rate. On
//! request it also hands out the lowest-risk safe cell as a hint.
//!
//! The controller never keeps a reference to the board: every operation receives the [`PlayEngine`] it
//! should look at or mutate.

use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

pub use danger::*;
pub use hint::*;
pub use mutation::*;

mod danger;
mod difficulty;
mod hint;
mod mutation;

/// Tunables for the assistant. Every chance is a probability in `[0, 1]` before it is scaled by the difficulty
/// factor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Danger zones farther than this from the latest move are forgotten.
    pub zone_retention_distance: u16,
    /// How many recent moves have to cluster before a zone is created.
    pub cluster_window: usize,
    /// Maximum pairwise distance between clustered moves.
    pub cluster_distance: u16,
    /// Zones within this distance of a cell add to its risk.
    pub risk_radius: u16,
    /// Risk added per mine shown on a revealed neighbor.
    pub number_weight: f64,
    pub mine_move_chance: f64,
    /// Only mines farther than this from a zone get pulled toward it.
    pub mine_far_distance: u16,
    /// Radius of the square around a zone where pulled mines are dropped.
    pub mine_drop_radius: u8,
    pub transform_chance: f64,
    pub mine_spawn_chance: f64,
    pub initial_difficulty: f64,
    pub min_difficulty: f64,
    pub max_difficulty: f64,
    pub difficulty_step: f64,
    pub raise_threshold: f64,
    pub lower_threshold: f64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            zone_retention_distance: 5,
            cluster_window: 3,
            cluster_distance: 3,
            risk_radius: 3,
            number_weight: 0.5,
            mine_move_chance: 0.2,
            mine_far_distance: 5,
            mine_drop_radius: 2,
            transform_chance: 0.1,
            mine_spawn_chance: 0.3,
            initial_difficulty: 1.0,
            min_difficulty: 0.5,
            max_difficulty: 2.0,
            difficulty_step: 0.1,
            raise_threshold: 0.8,
            lower_threshold: 0.5,
        }
    }
}

/// Everything a single [`AiController::update_board`] pass changed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardUpdate {
    pub moved_mines: Vec<MineMove>,
    pub transformation: Option<Transformation>,
    pub difficulty: f64,
}

impl BoardUpdate {
    pub fn has_mutation(&self) -> bool {
        !self.moved_mines.is_empty() || self.transformation.is_some()
    }
}

#[derive(Clone, Debug)]
pub struct AiController {
    config: AiConfig,
    move_history: Vec<Coord2>,
    danger_zones: Vec<Coord2>,
    difficulty: f64,
    rng: SmallRng,
}

impl AiController {
    pub fn new(config: AiConfig, seed: u64) -> Self {
        let difficulty = config
            .initial_difficulty
            .clamp(config.min_difficulty, config.max_difficulty);
        Self {
            config,
            move_history: Vec::new(),
            danger_zones: Vec::new(),
            difficulty,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn difficulty(&self) -> f64 {
        self.difficulty
    }

    pub fn danger_zones(&self) -> &[Coord2] {
        &self.danger_zones
    }

    pub fn move_history(&self) -> &[Coord2] {
        &self.move_history
    }

    /// Runs mine movement, tile transformation and difficulty adjustment, in that order.
    pub fn update_board(&mut self, engine: &mut PlayEngine) -> Result<BoardUpdate> {
        if engine.is_finished() {
            return Ok(BoardUpdate {
                difficulty: self.difficulty,
                ..Default::default()
            });
        }

        let moved_mines = self.move_mines_toward_zones(engine)?;
        let transformation = self.transform_random_tile(engine)?;
        self.adjust_difficulty(engine);

        let update = BoardUpdate {
            moved_mines,
            transformation,
            difficulty: self.difficulty,
        };
        if update.has_mutation() {
            log::debug!("board mutated: {:?}", update);
        }
        Ok(update)
    }

    fn roll(&mut self, chance: f64) -> bool {
        self.rng.random::<f64>() < chance
    }
}
