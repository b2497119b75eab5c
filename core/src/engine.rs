use std::collections::{BTreeSet, VecDeque};
use std::num::Saturating;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    #[default]
    Ready,
    Active,
    Won,
    Lost,
}

impl EngineState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayEngine {
    mine_layout: MineLayout,
    board: Array2<EngineCell>,
    revealed_count: Saturating<CellCount>,
    flagged_count: Saturating<CellCount>,
    state: EngineState,
    triggered_mine: Option<Coord2>,
}

impl PlayEngine {
    pub fn new(mine_layout: MineLayout) -> Self {
        let size = mine_layout.size();
        Self {
            mine_layout,
            board: Array2::default(size.to_nd_index()),
            revealed_count: Saturating(0),
            flagged_count: Saturating(0),
            state: Default::default(),
            triggered_mine: None,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn size(&self) -> Coord2 {
        self.mine_layout.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.mine_layout.mine_count()
    }

    pub fn mines_left(&self) -> isize {
        (self.mine_layout.mine_count() as isize) - (self.flagged_count.0 as isize)
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count.0
    }

    pub fn flagged_count(&self) -> CellCount {
        self.flagged_count.0
    }

    pub fn cell_at(&self, coords: Coord2) -> EngineCell {
        self.board[coords.to_nd_index()]
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn has_mine_at(&self, coords: Coord2) -> bool {
        self.mine_layout.contains_mine(coords)
    }

    pub fn mine_layout(&self) -> &MineLayout {
        &self.mine_layout
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        self.mine_layout.validate_coords(coords)
    }

    /// Mine coordinates in row-major order.
    pub fn mine_positions(&self) -> Vec<Coord2> {
        self.mine_layout.mine_positions().collect()
    }

    /// Hidden, unflagged cells without a mine: every move that is safe to make right now.
    pub fn safe_moves(&self) -> Vec<Coord2> {
        self.iter_cells()
            .filter(|&pos| self.cell_at(pos) == EngineCell::Hidden && !self.has_mine_at(pos))
            .collect()
    }

    /// Every cell not yet revealed, flagged ones included.
    pub fn unrevealed_cells(&self) -> Vec<Coord2> {
        self.iter_cells()
            .filter(|&pos| self.cell_at(pos).is_unrevealed())
            .collect()
    }

    /// Unrevealed cells without a mine, flagged ones included.
    pub fn safe_hidden_cells(&self) -> Vec<Coord2> {
        self.iter_cells()
            .filter(|&pos| self.cell_at(pos).is_unrevealed() && !self.has_mine_at(pos))
            .collect()
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        use EngineCell::*;
        use MarkOutcome::*;

        let coords = self.mine_layout.validate_coords(coords)?;
        self.check_not_finished()?;

        Ok(match self.board[coords.to_nd_index()] {
            Hidden => {
                self.board[coords.to_nd_index()] = Flagged;
                self.flagged_count += 1;
                Changed
            }
            Flagged => {
                self.board[coords.to_nd_index()] = Hidden;
                self.flagged_count -= 1;
                Changed
            }
            Revealed(_) => NoChange,
        })
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.mine_layout.validate_coords(coords)?;
        self.check_not_finished()?;

        if matches!(self.board[coords.to_nd_index()], EngineCell::Hidden) {
            Ok(self.reveal_single_cell(coords))
        } else {
            Ok(RevealOutcome::NoChange)
        }
    }

    /// Relocates a mine and refreshes every revealed number around both ends of the move.
    pub fn move_mine(&mut self, from: Coord2, to: Coord2) -> Result<()> {
        let from = self.mine_layout.validate_coords(from)?;
        let to = self.mine_layout.validate_coords(to)?;
        self.check_not_finished()?;

        if self.board[to.to_nd_index()].is_revealed() {
            return Err(GameError::CellRevealed(to));
        }
        self.mine_layout.move_mine(from, to)?;

        let size = self.size();
        for pos in iter_square(from, 1, size).chain(iter_square(to, 1, size)) {
            if let EngineCell::Revealed(_) = self.board[pos.to_nd_index()] {
                let count = self.mine_layout.adjacent_mine_count(pos);
                self.board[pos.to_nd_index()] = EngineCell::Revealed(count);
            }
        }

        log::trace!("mine moved {:?} -> {:?}", from, to);
        Ok(())
    }

    /// Swaps in a fresh layout of the same size; only allowed before anything was revealed.
    pub fn replace_layout(&mut self, mine_layout: MineLayout) -> Result<()> {
        if !self.state.is_ready() {
            return Err(GameError::AlreadyEnded);
        }
        if mine_layout.size() != self.size() {
            return Err(GameError::InvalidBoardShape);
        }
        self.mine_layout = mine_layout;
        Ok(())
    }

    fn reveal_single_cell(&mut self, coords: Coord2) -> RevealOutcome {
        let cell_state = self.board[coords.to_nd_index()];
        let has_mine = self.mine_layout[coords];

        match (cell_state, has_mine) {
            (EngineCell::Hidden, true) => {
                self.triggered_mine = Some(coords);
                self.end_game(false);
                RevealOutcome::HitMine
            }
            (EngineCell::Hidden, false) => {
                let adjacent_mines = self.mine_layout.adjacent_mine_count(coords);
                self.board[coords.to_nd_index()] = EngineCell::Revealed(adjacent_mines);
                self.revealed_count += 1;

                if adjacent_mines == 0 {
                    self.flood_reveal(coords);
                }

                if self.revealed_count == Saturating(self.mine_layout.safe_cell_count()) {
                    self.end_game(true);
                    RevealOutcome::Won
                } else {
                    self.mark_started();
                    RevealOutcome::Revealed
                }
            }
            _ => RevealOutcome::NoChange,
        }
    }

    fn flood_reveal(&mut self, origin: Coord2) {
        let mut visited = BTreeSet::from([origin]);
        let mut to_visit: VecDeque<_> = self
            .mine_layout
            .iter_neighbors(origin)
            .filter(|&pos| matches!(self.board[pos.to_nd_index()], EngineCell::Hidden))
            .collect();

        while let Some(visit_coords) = to_visit.pop_front() {
            if !visited.insert(visit_coords) {
                continue;
            }

            if !matches!(self.board[visit_coords.to_nd_index()], EngineCell::Hidden) {
                continue;
            }

            let visit_adjacent_mines = self.mine_layout.adjacent_mine_count(visit_coords);
            self.board[visit_coords.to_nd_index()] = EngineCell::Revealed(visit_adjacent_mines);
            self.revealed_count += 1;

            if visit_adjacent_mines == 0 {
                to_visit.extend(
                    self.mine_layout
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| matches!(self.board[pos.to_nd_index()], EngineCell::Hidden))
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }
    }

    fn mark_started(&mut self) {
        if matches!(self.state, EngineState::Ready) {
            self.state = EngineState::Active;
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        self.state = if won {
            EngineState::Won
        } else {
            EngineState::Lost
        };
        if won {
            self.triggered_mine = None;
        }
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }

    fn iter_cells(&self) -> impl Iterator<Item = Coord2> + use<> {
        iter_coords(self.size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(size: Coord2, mines: &[Coord2]) -> MineLayout {
        MineLayout::from_mine_coords(size, mines).unwrap()
    }

    #[test]
    fn reveal_hits_mine_and_sets_triggered_cell() {
        let mut engine = PlayEngine::new(layout((2, 2), &[(0, 0)]));

        let outcome = engine.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::HitMine);
        assert_eq!(engine.state(), EngineState::Lost);
        assert_eq!(engine.triggered_mine(), Some((0, 0)));
        assert_eq!(engine.reveal((1, 1)), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn reveal_flood_fill_opens_zero_region() {
        let mut engine = PlayEngine::new(layout((3, 3), &[(2, 2)]));

        let outcome = engine.reveal((0, 0)).unwrap();

        assert_eq!(outcome, RevealOutcome::Won);
        assert_eq!(engine.cell_at((0, 0)), EngineCell::Revealed(0));
        assert_eq!(engine.cell_at((1, 1)), EngineCell::Revealed(1));
        assert_eq!(engine.cell_at((2, 2)), EngineCell::Hidden);
    }

    #[test]
    fn flood_fill_skips_flagged_cells() {
        let mut engine = PlayEngine::new(layout((4, 4), &[(3, 3)]));
        engine.toggle_flag((0, 1)).unwrap();

        assert_eq!(engine.reveal((0, 0)).unwrap(), RevealOutcome::Revealed);

        assert_eq!(engine.cell_at((0, 1)), EngineCell::Flagged);
        assert_eq!(engine.revealed_count(), 14);
    }

    #[test]
    fn revealing_flagged_or_revealed_cell_is_no_change() {
        let mut engine = PlayEngine::new(layout((3, 1), &[(0, 0)]));
        engine.toggle_flag((0, 0)).unwrap();

        assert_eq!(engine.reveal((0, 0)).unwrap(), RevealOutcome::NoChange);
        assert_eq!(engine.reveal((1, 0)).unwrap(), RevealOutcome::Revealed);
        assert_eq!(engine.reveal((1, 0)).unwrap(), RevealOutcome::NoChange);
    }

    #[test]
    fn out_of_bounds_is_an_error() {
        let mut engine = PlayEngine::new(layout((2, 2), &[(0, 0)]));

        assert_eq!(engine.reveal((2, 0)), Err(GameError::InvalidCoords));
        assert_eq!(engine.toggle_flag((0, 9)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn flags_toggle_before_first_reveal() {
        let mut engine = PlayEngine::new(layout((2, 2), &[(0, 0)]));

        assert_eq!(engine.toggle_flag((0, 0)).unwrap(), MarkOutcome::Changed);
        assert_eq!(engine.mines_left(), 0);
        assert_eq!(engine.toggle_flag((0, 0)).unwrap(), MarkOutcome::Changed);
        assert_eq!(engine.mines_left(), 1);
    }

    #[test]
    fn winning_board_transitions_to_won_state() {
        let mut engine = PlayEngine::new(layout((2, 1), &[(0, 0)]));

        assert_eq!(engine.reveal((1, 0)).unwrap(), RevealOutcome::Won);
        assert_eq!(engine.state(), EngineState::Won);
        assert!(engine.is_finished());
        assert_eq!(engine.toggle_flag((0, 0)), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn move_mine_refreshes_revealed_numbers() {
        let mut engine = PlayEngine::new(layout((5, 1), &[(0, 0), (4, 0)]));
        engine.reveal((1, 0)).unwrap();
        assert_eq!(engine.cell_at((1, 0)), EngineCell::Revealed(1));

        engine.move_mine((0, 0), (2, 0)).unwrap();

        assert_eq!(engine.cell_at((1, 0)), EngineCell::Revealed(1));
        assert!(engine.has_mine_at((2, 0)));
        assert_eq!(engine.total_mines(), 2);

        engine.move_mine((2, 0), (0, 0)).unwrap();
        engine.move_mine((4, 0), (2, 0)).unwrap();

        assert_eq!(engine.cell_at((1, 0)), EngineCell::Revealed(2));
    }

    #[test]
    fn move_mine_never_lands_on_revealed_cell() {
        let mut engine = PlayEngine::new(layout((4, 1), &[(0, 0)]));
        assert_eq!(engine.reveal((1, 0)).unwrap(), RevealOutcome::Revealed);

        assert_eq!(
            engine.move_mine((0, 0), (1, 0)),
            Err(GameError::CellRevealed((1, 0)))
        );
        assert_eq!(
            engine.move_mine((2, 0), (3, 0)),
            Err(GameError::NoMineAt((2, 0)))
        );
        assert!(engine.has_mine_at((0, 0)));
    }

    #[test]
    fn safe_moves_exclude_mines_flags_and_revealed() {
        let mut engine = PlayEngine::new(layout((3, 2), &[(0, 0)]));
        engine.toggle_flag((1, 0)).unwrap();
        engine.reveal((1, 1)).unwrap();

        assert_eq!(engine.safe_moves(), vec![(2, 0), (0, 1), (2, 1)]);
        assert_eq!(engine.unrevealed_cells().len(), 5);
        assert_eq!(engine.safe_hidden_cells().len(), 4);
    }

    #[test]
    fn replace_layout_only_before_first_reveal() {
        let mut engine = PlayEngine::new(layout((3, 1), &[(0, 0)]));

        engine.replace_layout(layout((3, 1), &[(2, 0)])).unwrap();
        assert!(engine.has_mine_at((2, 0)));
        assert_eq!(
            engine.replace_layout(layout((2, 1), &[(0, 0)])),
            Err(GameError::InvalidBoardShape)
        );

        engine.reveal((0, 0)).unwrap();
        assert_eq!(
            engine.replace_layout(layout((3, 1), &[(0, 0)])),
            Err(GameError::AlreadyEnded)
        );
    }
}
