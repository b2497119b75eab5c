//! Board model and assistant logic for driftmine, a Minesweeper variant whose mines drift toward the
//! player while an assistant hands out hints.

use core::fmt;
use core::ops::{Index, IndexMut};
use core::str::FromStr;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use ai::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use session::*;
pub use settings::*;
pub use tile::*;
pub use types::*;

mod ai;
mod engine;
mod error;
mod generator;
mod session;
mod settings;
mod tile;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    pub fn new((size_x, size_y): Coord2, mines: CellCount) -> Self {
        let size_x = size_x.clamp(1, Coord::MAX);
        let size_y = size_y.clamp(1, Coord::MAX);
        let mines = mines.clamp(1, mult(size_x, size_y));
        Self::new_unchecked((size_x, size_y), mines)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }
}

/// Board presets offered by the start menu.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub const fn config(self) -> GameConfig {
        match self {
            Self::Easy => GameConfig::new_unchecked((10, 10), 10),
            Self::Medium => GameConfig::new_unchecked((16, 16), 40),
            Self::Hard => GameConfig::new_unchecked((20, 20), 80),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown difficulty {0:?}, expected easy, medium or hard")]
pub struct ParseDifficultyError(String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" | "e" => Ok(Self::Easy),
            "medium" | "m" => Ok(Self::Medium),
            "hard" | "h" => Ok(Self::Hard),
            _ => Err(ParseDifficultyError(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Result<Self> {
        let (x, y) = mine_mask.dim();
        let max = usize::from(Coord::MAX);
        if x == 0 || y == 0 || x > max || y > max {
            return Err(GameError::InvalidBoardShape);
        }
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count();
        let mine_count = CellCount::try_from(mine_count).map_err(|_| GameError::TooManyMines)?;
        Ok(Self {
            mine_mask,
            mine_count,
        })
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        if size.0 == 0 || size.1 == 0 {
            return Err(GameError::InvalidBoardShape);
        }
        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Self::from_mine_mask(mine_mask)
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            size: self.size(),
            mines: self.mine_count,
        }
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn size(&self) -> Coord2 {
        // dimensions are checked against Coord::MAX on construction
        let dim = self.mine_mask.dim();
        (dim.0 as Coord, dim.1 as Coord)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        let (x, y) = self.size();
        mult(x, y)
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        // at most 8 neighbors
        self.iter_neighbors(coords).filter(|&pos| self[pos]).count() as u8
    }

    /// Mine coordinates in row-major order.
    pub fn mine_positions(&self) -> impl Iterator<Item = Coord2> + '_ {
        iter_coords(self.size()).filter(|&pos| self[pos])
    }

    /// Moves a single mine, keeping the total count unchanged.
    pub fn move_mine(&mut self, from: Coord2, to: Coord2) -> Result<()> {
        let from = self.validate_coords(from)?;
        let to = self.validate_coords(to)?;
        if !self[from] {
            return Err(GameError::NoMineAt(from));
        }
        if self[to] {
            return Err(GameError::CellOccupied(to));
        }
        self[from] = false;
        self[to] = true;
        Ok(())
    }

    pub(crate) fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        self.mine_mask.iter_neighbors(coords)
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, (x, y): Coord2) -> &Self::Output {
        &self.mine_mask[(x as usize, y as usize)]
    }
}

impl IndexMut<Coord2> for MineLayout {
    fn index_mut(&mut self, (x, y): Coord2) -> &mut Self::Output {
        &mut self.mine_mask[(x as usize, y as usize)]
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_mine_coords_rejects_out_of_bounds() {
        assert_eq!(
            MineLayout::from_mine_coords((2, 2), &[(2, 0)]),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn move_mine_keeps_count_and_updates_adjacency() {
        let mut layout = MineLayout::from_mine_coords((4, 1), &[(0, 0)]).unwrap();
        assert_eq!(layout.adjacent_mine_count((1, 0)), 1);

        layout.move_mine((0, 0), (3, 0)).unwrap();

        assert_eq!(layout.mine_count(), 1);
        assert_eq!(layout.adjacent_mine_count((1, 0)), 0);
        assert_eq!(layout.adjacent_mine_count((2, 0)), 1);
        assert_eq!(layout.mine_positions().collect::<Vec<_>>(), vec![(3, 0)]);
    }

    #[test]
    fn move_mine_requires_mine_source_and_free_target() {
        let mut layout = MineLayout::from_mine_coords((3, 1), &[(0, 0), (1, 0)]).unwrap();

        assert_eq!(
            layout.move_mine((2, 0), (2, 0)),
            Err(GameError::NoMineAt((2, 0)))
        );
        assert_eq!(
            layout.move_mine((0, 0), (1, 0)),
            Err(GameError::CellOccupied((1, 0)))
        );
    }

    #[test]
    fn mine_positions_are_row_major() {
        let layout = MineLayout::from_mine_coords((3, 3), &[(2, 0), (0, 1), (1, 0)]).unwrap();

        assert_eq!(
            layout.mine_positions().collect::<Vec<_>>(),
            vec![(1, 0), (2, 0), (0, 1)]
        );
    }

    #[test]
    fn difficulty_presets_and_parsing() {
        assert_eq!(Difficulty::Easy.config(), GameConfig::new((10, 10), 10));
        assert_eq!(Difficulty::Medium.config().total_cells(), 256);
        assert_eq!(Difficulty::Hard.config().mines, 80);
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("impossible".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::default(), Difficulty::Medium);
    }

    #[test]
    fn game_config_clamps_mines() {
        let config = GameConfig::new((0, 3), 50);

        assert_eq!(config.size, (1, 3));
        assert_eq!(config.mines, 3);
    }
}
