use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SessionOutcome {
    Playing,
    Won { score: i64 },
    Lost,
}

impl SessionOutcome {
    pub const fn is_over(self) -> bool {
        !matches!(self, Self::Playing)
    }

    pub const fn score(self) -> Option<i64> {
        match self {
            Self::Won { score } => Some(score),
            Self::Playing | Self::Lost => None,
        }
    }
}

/// What a single player action did to the session.
#[derive(Clone, Debug, PartialEq)]
pub enum MoveReport {
    Ignored,
    Revealed(BoardUpdate),
    Flagged,
    Unflagged,
    HitMine(Coord2),
    Won { score: i64 },
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum HintResponse {
    /// A hint was bought; `None` when no safe cell is left.
    Given(Option<Hint>),
    CoolingDown { remaining: u32 },
}

/// One game from the first move to win or loss, with score, hints and timing layered over the [`PlayEngine`].
#[derive(Clone, Debug)]
pub struct GameSession {
    difficulty: Difficulty,
    start_tile: StartTile,
    scoring: ScoringRules,
    seed: u64,
    engine: PlayEngine,
    ai: AiController,
    flag_mode: bool,
    score: i64,
    hint_cooldown: u32,
    hint: Option<Hint>,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    move_count: u32,
}

impl GameSession {
    pub fn new(
        difficulty: Difficulty,
        settings: &Settings,
        seed: u64,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let layout = RandomMinefieldGenerator::unprotected(seed).generate(difficulty.config())?;
        log::debug!(
            "new {} game, seed {}, {} mines",
            difficulty,
            seed,
            layout.mine_count()
        );
        Ok(Self::with_layout(difficulty, layout, settings, seed, now))
    }

    /// Session over a known layout; first-click protection can still regenerate it.
    pub fn with_layout(
        difficulty: Difficulty,
        layout: MineLayout,
        settings: &Settings,
        seed: u64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            difficulty,
            start_tile: settings.game.start_tile,
            scoring: settings.scoring.clone(),
            seed,
            engine: PlayEngine::new(layout),
            ai: AiController::new(settings.ai.clone(), seed.wrapping_add(1)),
            flag_mode: false,
            score: 0,
            hint_cooldown: 0,
            hint: None,
            started_at: now,
            ended_at: None,
            move_count: 0,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn engine(&self) -> &PlayEngine {
        &self.engine
    }

    pub fn ai(&self) -> &AiController {
        &self.ai
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn flag_mode(&self) -> bool {
        self.flag_mode
    }

    pub fn hint(&self) -> Option<Hint> {
        self.hint
    }

    pub fn hint_cooldown(&self) -> u32 {
        self.hint_cooldown
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> i64 {
        (self.ended_at.unwrap_or(now) - self.started_at)
            .num_seconds()
            .max(0)
    }

    pub fn outcome(&self) -> SessionOutcome {
        match self.engine.state() {
            EngineState::Won => SessionOutcome::Won { score: self.score },
            EngineState::Lost => SessionOutcome::Lost,
            EngineState::Ready | EngineState::Active => SessionOutcome::Playing,
        }
    }

    pub fn toggle_flag_mode(&mut self) -> bool {
        self.flag_mode = !self.flag_mode;
        self.flag_mode
    }

    /// Primary action on a cell: flags in flag mode, reveals otherwise.
    pub fn select(&mut self, coords: Coord2, now: DateTime<Utc>) -> Result<MoveReport> {
        if self.flag_mode {
            self.toggle_flag(coords)
        } else {
            self.reveal(coords, now)
        }
    }

    pub fn reveal(&mut self, coords: Coord2, now: DateTime<Utc>) -> Result<MoveReport> {
        let coords = self.engine.validate_coords(coords)?;
        if self.engine.state().is_ready()
            && self.start_tile != StartTile::Random
            && self.engine.cell_at(coords) == EngineCell::Hidden
        {
            self.protect_first_reveal(coords)?;
        }

        let report = match self.engine.reveal(coords)? {
            RevealOutcome::NoChange => return Ok(MoveReport::Ignored),
            RevealOutcome::HitMine => {
                self.ended_at = Some(now);
                log::info!("hit a mine at {:?} after {} moves", coords, self.move_count);
                MoveReport::HitMine(coords)
            }
            RevealOutcome::Won => {
                self.score += self.scoring.reveal_points;
                let score = self.finish_win(now);
                MoveReport::Won { score }
            }
            RevealOutcome::Revealed => {
                self.score += self.scoring.reveal_points;
                self.ai.record_move(coords);
                MoveReport::Revealed(self.ai.update_board(&mut self.engine)?)
            }
        };

        self.count_action();
        self.refresh_hint();
        Ok(report)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MoveReport> {
        if !self.engine.toggle_flag(coords)?.has_update() {
            return Ok(MoveReport::Ignored);
        }
        self.count_action();

        if self.engine.cell_at(coords) == EngineCell::Flagged {
            self.score += self.scoring.flag_points;
            Ok(MoveReport::Flagged)
        } else {
            Ok(MoveReport::Unflagged)
        }
    }

    /// Buys a hint for `hint_penalty` points unless the cooldown is still running.
    pub fn request_hint(&mut self) -> Result<HintResponse> {
        if self.engine.is_finished() {
            return Err(GameError::AlreadyEnded);
        }
        if self.hint_cooldown > 0 {
            return Ok(HintResponse::CoolingDown {
                remaining: self.hint_cooldown,
            });
        }

        self.hint = self.ai.hint(&self.engine);
        self.score -= self.scoring.hint_penalty;
        self.hint_cooldown = self.scoring.hint_cooldown_moves;
        Ok(HintResponse::Given(self.hint))
    }

    fn protect_first_reveal(&mut self, coords: Coord2) -> Result<()> {
        let config = self.engine.mine_layout().game_config();
        let layout =
            RandomMinefieldGenerator::new(self.seed, coords, self.start_tile).generate(config)?;
        self.engine.replace_layout(layout)?;
        log::debug!("layout regenerated around first reveal {:?}", coords);
        Ok(())
    }

    fn finish_win(&mut self, now: DateTime<Utc>) -> i64 {
        self.ended_at = Some(now);
        let elapsed = self.elapsed_secs(now);
        let bonus = (self.scoring.time_bonus_base - elapsed).max(0);
        self.score += bonus;
        log::info!(
            "won {} in {}s with {} points ({} time bonus)",
            self.difficulty,
            elapsed,
            self.score,
            bonus
        );
        self.score
    }

    fn count_action(&mut self) {
        self.move_count = self.move_count.saturating_add(1);
        self.hint_cooldown = self.hint_cooldown.saturating_sub(1);
    }

    /// Drops a hint whose cell was revealed or has since received a mine.
    fn refresh_hint(&mut self) {
        if let Some(hint) = self.hint {
            let cell = self.engine.cell_at(hint.coords);
            if cell.is_revealed() || self.engine.has_mine_at(hint.coords) {
                self.hint = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn quiet_settings() -> Settings {
        Settings {
            ai: AiConfig {
                mine_move_chance: 0.0,
                transform_chance: 0.0,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn session(size: Coord2, mines: &[Coord2]) -> (GameSession, DateTime<Utc>) {
        let now = Utc::now();
        let layout = MineLayout::from_mine_coords(size, mines).unwrap();
        let session = GameSession::with_layout(Difficulty::Easy, layout, &quiet_settings(), 0, now);
        (session, now)
    }

    #[test]
    fn successful_reveal_scores_and_records_move() {
        let (mut session, now) = session((4, 1), &[(0, 0)]);

        let report = session.reveal((1, 0), now).unwrap();

        assert!(matches!(report, MoveReport::Revealed(_)));
        assert_eq!(session.score(), 10);
        assert_eq!(session.ai().move_history(), &[(1, 0)]);
        assert_eq!(session.outcome(), SessionOutcome::Playing);
    }

    #[test]
    fn hitting_a_mine_loses() {
        let (mut session, now) = session((3, 1), &[(0, 0)]);

        let report = session.reveal((0, 0), now).unwrap();

        assert_eq!(report, MoveReport::HitMine((0, 0)));
        assert_eq!(session.outcome(), SessionOutcome::Lost);
        assert_eq!(session.score(), 0);
        assert_eq!(session.reveal((1, 0), now), Err(GameError::AlreadyEnded));
    }

    #[test]
    fn win_adds_time_bonus() {
        let (mut session, start) = session((3, 1), &[(0, 0)]);
        session.reveal((1, 0), start).unwrap();

        let later = start + TimeDelta::seconds(40);
        let report = session.reveal((2, 0), later).unwrap();

        assert_eq!(report, MoveReport::Won { score: 980 });
        assert_eq!(session.outcome(), SessionOutcome::Won { score: 980 });
        assert_eq!(session.elapsed_secs(later + TimeDelta::seconds(100)), 40);
    }

    #[test]
    fn time_bonus_never_goes_negative() {
        let (mut session, start) = session((2, 1), &[(0, 0)]);

        let report = session.reveal((1, 0), start + TimeDelta::seconds(5000)).unwrap();

        assert_eq!(report, MoveReport::Won { score: 10 });
    }

    #[test]
    fn flags_score_only_when_placed() {
        let (mut session, now) = session((3, 1), &[(0, 0)]);

        assert_eq!(session.toggle_flag((0, 0)).unwrap(), MoveReport::Flagged);
        assert_eq!(session.toggle_flag((0, 0)).unwrap(), MoveReport::Unflagged);
        assert_eq!(session.score(), 5);

        session.reveal((1, 0), now).unwrap();
        assert_eq!(session.toggle_flag((1, 0)).unwrap(), MoveReport::Ignored);
    }

    #[test]
    fn flagged_cells_are_not_revealed() {
        let (mut session, now) = session((3, 1), &[(0, 0)]);
        session.toggle_flag((0, 0)).unwrap();

        assert_eq!(session.reveal((0, 0), now).unwrap(), MoveReport::Ignored);
        assert_eq!(session.outcome(), SessionOutcome::Playing);
    }

    #[test]
    fn flag_mode_turns_select_into_flagging() {
        let (mut session, now) = session((3, 1), &[(0, 0)]);

        assert!(session.toggle_flag_mode());
        assert_eq!(session.select((0, 0), now).unwrap(), MoveReport::Flagged);
        assert!(!session.toggle_flag_mode());
        assert!(matches!(
            session.select((1, 0), now).unwrap(),
            MoveReport::Revealed(_)
        ));
    }

    #[test]
    fn hint_costs_points_and_cools_down() {
        let (mut session, now) = session((6, 1), &[(0, 0)]);

        let HintResponse::Given(Some(hint)) = session.request_hint().unwrap() else {
            panic!("expected a hint");
        };
        assert!(!session.engine().has_mine_at(hint.coords));
        assert_eq!(session.score(), -20);
        assert_eq!(
            session.request_hint().unwrap(),
            HintResponse::CoolingDown { remaining: 3 }
        );

        session.toggle_flag((5, 0)).unwrap();
        session.toggle_flag((5, 0)).unwrap();
        session.toggle_flag((5, 0)).unwrap();

        assert_eq!(session.hint_cooldown(), 0);
        assert!(matches!(
            session.request_hint().unwrap(),
            HintResponse::Given(Some(_))
        ));
        assert_eq!(session.score(), -40 + 5 + 5);

        session.reveal((1, 0), now).unwrap();
        assert_eq!(session.hint_cooldown(), 2);
    }

    #[test]
    fn hint_is_cleared_once_revealed() {
        let (mut session, now) = session((4, 2), &[(0, 0)]);
        let HintResponse::Given(Some(hint)) = session.request_hint().unwrap() else {
            panic!("expected a hint");
        };

        session.reveal(hint.coords, now).unwrap();

        assert_eq!(session.hint(), None);
    }

    #[test]
    fn safe_start_protects_first_reveal() {
        let now = Utc::now();
        let mut settings = quiet_settings();
        settings.game.start_tile = StartTile::Zero;

        for seed in 0..16 {
            let mut session = GameSession::new(Difficulty::Hard, &settings, seed, now).unwrap();

            let report = session.reveal((10, 10), now).unwrap();

            assert!(!matches!(report, MoveReport::HitMine(_)));
            assert_eq!(session.engine().cell_at((10, 10)), EngineCell::Revealed(0));
            assert_eq!(session.engine().total_mines(), 80);
        }
    }

    #[test]
    fn out_of_bounds_is_reported() {
        let (mut session, now) = session((2, 2), &[(0, 0)]);

        assert_eq!(session.reveal((5, 5), now), Err(GameError::InvalidCoords));
    }
}
