use super::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MineMove {
    pub from: Coord2,
    pub to: Coord2,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transformation {
    /// A hidden mine was swapped out for a safe tile.
    MineCleared(MineMove),
    /// A hidden safe tile received a mine from elsewhere.
    MinePlanted(MineMove),
}

impl AiController {
    /// Gives every danger zone a chance to pull one distant mine next to it.
    pub(super) fn move_mines_toward_zones(
        &mut self,
        engine: &mut PlayEngine,
    ) -> Result<Vec<MineMove>> {
        let mut moved = Vec::new();
        for zone in self.danger_zones.clone() {
            if !self.roll(self.config.mine_move_chance * self.difficulty) {
                continue;
            }
            if let Some(mine_move) = self.pull_mine_toward(engine, zone)? {
                moved.push(mine_move);
            }
        }
        Ok(moved)
    }

    fn pull_mine_toward(&self, engine: &mut PlayEngine, zone: Coord2) -> Result<Option<MineMove>> {
        let far = self.config.mine_far_distance;
        let Some(from) = engine
            .mine_layout()
            .mine_positions()
            .find(|&mine| manhattan_distance(mine, zone) > far)
        else {
            return Ok(None);
        };

        let Some(to) = iter_square(zone, self.config.mine_drop_radius, engine.size())
            .find(|&pos| !engine.cell_at(pos).is_revealed() && !engine.has_mine_at(pos))
        else {
            log::trace!("no room for a mine around zone {:?}", zone);
            return Ok(None);
        };

        engine.move_mine(from, to)?;
        Ok(Some(MineMove { from, to }))
    }

    /// Occasionally flips a random unrevealed tile between mine and safe by relocating a mine.
    pub(super) fn transform_random_tile(
        &mut self,
        engine: &mut PlayEngine,
    ) -> Result<Option<Transformation>> {
        if !self.roll(self.config.transform_chance) {
            return Ok(None);
        }

        let Some(&target) = engine.unrevealed_cells().choose(&mut self.rng) else {
            return Ok(None);
        };

        if engine.has_mine_at(target) {
            let Some(&to) = engine.safe_hidden_cells().choose(&mut self.rng) else {
                return Ok(None);
            };
            engine.move_mine(target, to)?;
            Ok(Some(Transformation::MineCleared(MineMove { from: target, to })))
        } else if self.roll(self.config.mine_spawn_chance * self.difficulty) {
            let Some(from) = engine.mine_layout().mine_positions().next() else {
                return Ok(None);
            };
            engine.move_mine(from, target)?;
            Ok(Some(Transformation::MinePlanted(MineMove { from, to: target })))
        } else {
            Ok(None)
        }
    }
}
