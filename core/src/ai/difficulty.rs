use super::*;

impl AiController {
    /// Success rate is the share of recorded moves still sitting on safe cells over all revealed cells.
    pub(super) fn adjust_difficulty(&mut self, engine: &PlayEngine) {
        let revealed = engine.revealed_count();
        if revealed == 0 {
            return;
        }

        let successes = self
            .move_history
            .iter()
            .filter(|&&coords| !engine.has_mine_at(coords))
            .count();
        let success_rate = successes as f64 / f64::from(revealed);

        let previous = self.difficulty;
        if success_rate > self.config.raise_threshold {
            self.difficulty =
                (self.difficulty + self.config.difficulty_step).min(self.config.max_difficulty);
        } else if success_rate < self.config.lower_threshold {
            self.difficulty =
                (self.difficulty - self.config.difficulty_step).max(self.config.min_difficulty);
        }

        if self.difficulty != previous {
            log::debug!(
                "difficulty {:.1} -> {:.1} (success rate {:.2})",
                previous,
                self.difficulty,
                success_rate
            );
        }
    }
}
