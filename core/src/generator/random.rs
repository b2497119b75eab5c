use super::*;
use rand::prelude::*;

/// Generation strategy that can optionally try to make the starting tile zero or at least safe, but other than that is
/// purely random.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
    start: Coord2,
    start_tile: StartTile,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64, start: Coord2, start_tile: StartTile) -> Self {
        Self {
            seed,
            start,
            start_tile,
        }
    }

    /// Generator without any start guarantee.
    pub fn unprotected(seed: u64) -> Self {
        Self::new(seed, (0, 0), StartTile::Random)
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout> {
        use StartTile::*;

        let total_tiles = config.total_cells();
        let mut mines: Array2<bool> = Array2::default(config.size.to_nd_index());

        // optimize for full boards
        if config.mines >= total_tiles {
            if config.mines > total_tiles {
                log::warn!(
                    "Minefield already full, generated anyway, requested {} but only fits {}",
                    config.mines,
                    total_tiles
                );
            }
            mines.fill(true);
            return MineLayout::from_mine_mask(mines);
        }

        let start_in_bounds = self.start.0 < config.size.0 && self.start.1 < config.size.1;
        let actual_start_tile = match self.start_tile {
            Random => Random,
            Safe | Zero if !start_in_bounds => {
                log::warn!("Start tile {:?} outside the board, fallback to random", self.start);
                Random
            }
            Safe | Zero if config.mines + 1 > total_tiles => {
                log::warn!("Cannot make start tile safe, fallback to random");
                Random
            }
            Safe => Safe,
            Zero if config.mines + 9 > total_tiles => {
                log::warn!("Cannot make start tile zero, fallback to simple safe");
                Safe
            }
            Zero => Zero,
        };

        let protected = |coords: Coord2| match actual_start_tile {
            Random => false,
            Safe => coords == self.start,
            Zero => coords.0.abs_diff(self.start.0) <= 1 && coords.1.abs_diff(self.start.1) <= 1,
        };
        let free_tiles: Vec<Coord2> = iter_coords(config.size)
            .filter(|&coords| !protected(coords))
            .collect();

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let wanted = usize::from(config.mines).min(free_tiles.len());
        for index in rand::seq::index::sample(&mut rng, free_tiles.len(), wanted) {
            mines[free_tiles[index].to_nd_index()] = true;
        }

        let layout = MineLayout::from_mine_mask(mines)?;
        // double check mine count
        if layout.mine_count() != config.mines {
            log::warn!(
                "Generated minefield count mismatch, actual: {}, requested: {}",
                layout.mine_count(),
                config.mines
            );
        }
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn places_requested_mine_count() {
        let config = Difficulty::Medium.config();
        let layout = RandomMinefieldGenerator::unprotected(7)
            .generate(config)
            .unwrap();

        assert_eq!(layout.size(), (16, 16));
        assert_eq!(layout.mine_count(), 40);
        assert_eq!(layout.mine_positions().count(), 40);
    }

    #[test]
    fn same_seed_same_layout() {
        let config = Difficulty::Easy.config();
        let a = RandomMinefieldGenerator::unprotected(42).generate(config).unwrap();
        let b = RandomMinefieldGenerator::unprotected(42).generate(config).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn zero_start_clears_neighborhood() {
        let config = GameConfig::new((5, 5), 16);
        for seed in 0..20 {
            let layout = RandomMinefieldGenerator::new(seed, (2, 2), StartTile::Zero)
                .generate(config)
                .unwrap();

            assert!(!layout.contains_mine((2, 2)));
            assert_eq!(layout.adjacent_mine_count((2, 2)), 0);
            assert_eq!(layout.mine_count(), 16);
        }
    }

    #[test]
    fn zero_start_falls_back_to_safe_when_crowded() {
        let config = GameConfig::new((3, 3), 8);
        let layout = RandomMinefieldGenerator::new(3, (1, 1), StartTile::Zero)
            .generate(config)
            .unwrap();

        assert!(!layout.contains_mine((1, 1)));
        assert_eq!(layout.mine_count(), 8);
    }

    #[test]
    fn full_board_is_all_mines() {
        let config = GameConfig::new((2, 2), 4);
        let layout = RandomMinefieldGenerator::new(0, (0, 0), StartTile::Safe)
            .generate(config)
            .unwrap();

        assert_eq!(layout.mine_count(), 4);
        assert_eq!(layout.safe_cell_count(), 0);
    }
}
