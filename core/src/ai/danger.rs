use super::*;

impl AiController {
    /// Records a successful reveal and re-evaluates the danger zones around it.
    pub fn record_move(&mut self, coords: Coord2) {
        self.move_history.push(coords);
        self.update_danger_zones(coords);
    }

    fn update_danger_zones(&mut self, latest: Coord2) {
        let retention = self.config.zone_retention_distance;
        self.danger_zones
            .retain(|&zone| manhattan_distance(zone, latest) <= retention);

        let window = self.config.cluster_window;
        if window == 0 || self.move_history.len() < window {
            return;
        }

        let recent = &self.move_history[self.move_history.len() - window..];
        if are_clustered(recent, self.config.cluster_distance) {
            let center = cluster_center(recent);
            if !self.danger_zones.contains(&center) {
                log::debug!("new danger zone at {:?}", center);
                self.danger_zones.push(center);
            }
        }
    }
}

/// Whether every pair of `moves` lies within `max_distance` of each other.
pub fn are_clustered(moves: &[Coord2], max_distance: u16) -> bool {
    moves.iter().enumerate().all(|(i, &a)| {
        moves[i + 1..]
            .iter()
            .all(|&b| manhattan_distance(a, b) <= max_distance)
    })
}

/// Integer mean of the coordinates, rounded down.
pub fn cluster_center(moves: &[Coord2]) -> Coord2 {
    if moves.is_empty() {
        return (0, 0);
    }
    let len = moves.len();
    let x = moves.iter().map(|&(x, _)| usize::from(x)).sum::<usize>() / len;
    let y = moves.iter().map(|&(_, y)| usize::from(y)).sum::<usize>() / len;
    // the mean of u8 values fits in a u8
    (x as Coord, y as Coord)
}
