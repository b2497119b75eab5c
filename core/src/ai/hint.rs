use super::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hint {
    pub coords: Coord2,
    pub risk: f64,
}

impl AiController {
    /// Picks the safe move with the lowest risk score, the earliest one in row-major order on ties.
    pub fn hint(&self, engine: &PlayEngine) -> Option<Hint> {
        let hint = engine
            .safe_moves()
            .into_iter()
            .map(|coords| Hint {
                coords,
                risk: self.move_risk(engine, coords),
            })
            .fold(None, |best: Option<Hint>, candidate| match best {
                Some(best) if best.risk <= candidate.risk => Some(best),
                _ => Some(candidate),
            });
        log::debug!("hint: {:?}", hint);
        hint
    }

    /// Risk grows near danger zones and next to revealed numbers.
    pub fn move_risk(&self, engine: &PlayEngine, coords: Coord2) -> f64 {
        let radius = self.config.risk_radius;
        let zone_risk: f64 = self
            .danger_zones
            .iter()
            .map(|&zone| manhattan_distance(coords, zone))
            .filter(|&distance| distance <= radius)
            .map(|distance| (f64::from(radius) + 1.0 - f64::from(distance)) * self.difficulty)
            .sum();

        let number_risk: f64 = iter_square(coords, 1, engine.size())
            .filter_map(|pos| match engine.cell_at(pos) {
                EngineCell::Revealed(count) => Some(f64::from(count) * self.config.number_weight),
                _ => None,
            })
            .sum();

        zone_risk + number_risk
    }
}
