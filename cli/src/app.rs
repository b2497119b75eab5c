use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use driftmine_core::{
    Difficulty, GameError, GameSession, HintResponse, MoveReport, SessionOutcome, Settings,
    Transformation,
};

use crate::command::{Command, HELP};
use crate::render::{render_board, render_header, render_menu};
use crate::scores::ScoreBook;

enum Screen {
    Menu,
    Playing(Box<GameSession>),
    Quit,
}

/// Line-driven front end: a start menu, then one command per line until the game ends.
pub struct App<R, W> {
    input: R,
    output: W,
    settings: Settings,
    difficulty: Difficulty,
    scores: ScoreBook,
    scores_path: Option<PathBuf>,
    games_started: u64,
}

impl<R: BufRead, W: Write> App<R, W> {
    pub fn new(input: R, output: W, settings: Settings) -> Self {
        let difficulty = settings.game.difficulty;
        Self {
            input,
            output,
            settings,
            difficulty,
            scores: ScoreBook::default(),
            scores_path: None,
            games_started: 0,
        }
    }

    pub fn with_scores(mut self, scores: ScoreBook, path: Option<PathBuf>) -> Self {
        self.scores = scores;
        self.scores_path = path;
        self
    }

    pub fn scores(&self) -> &ScoreBook {
        &self.scores
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        let mut screen = Screen::Menu;
        loop {
            screen = match screen {
                Screen::Menu => self.menu()?,
                Screen::Playing(session) => self.play(*session)?,
                Screen::Quit => break,
            };
        }
        self.output.flush()?;
        Ok(())
    }

    fn menu(&mut self) -> anyhow::Result<Screen> {
        loop {
            let best = self.scores.best(self.difficulty);
            write!(self.output, "{}> ", render_menu(self.difficulty, best))?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                return Ok(Screen::Quit);
            };
            match line.trim().to_ascii_lowercase().as_str() {
                "" | "s" | "start" => return self.start_game(),
                "q" | "quit" | "exit" => return Ok(Screen::Quit),
                "1" => self.difficulty = Difficulty::Easy,
                "2" => self.difficulty = Difficulty::Medium,
                "3" => self.difficulty = Difficulty::Hard,
                other => match other.parse::<Difficulty>() {
                    Ok(difficulty) => self.difficulty = difficulty,
                    Err(err) => writeln!(self.output, "{err}")?,
                },
            }
        }
    }

    fn start_game(&mut self) -> anyhow::Result<Screen> {
        let seed = match self.settings.game.seed {
            Some(seed) => seed.wrapping_add(self.games_started),
            None => rand::random(),
        };
        self.games_started += 1;
        let session = GameSession::new(self.difficulty, &self.settings, seed, Utc::now())
            .context("failed to set up a new game")?;
        log::info!("starting {} game with seed {}", self.difficulty, seed);
        Ok(Screen::Playing(Box::new(session)))
    }

    fn play(&mut self, mut session: GameSession) -> anyhow::Result<Screen> {
        loop {
            write!(
                self.output,
                "\n{}{}> ",
                render_header(&session),
                render_board(&session)
            )?;
            self.output.flush()?;

            let outcome = session.outcome();
            if outcome.is_over() {
                self.finish(&session, outcome)?;
                writeln!(self.output, "press enter for the menu")?;
                return Ok(match self.read_line()? {
                    Some(_) => Screen::Menu,
                    None => Screen::Quit,
                });
            }

            let Some(line) = self.read_line()? else {
                return Ok(Screen::Quit);
            };
            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(err) => {
                    writeln!(self.output, "{err}")?;
                    continue;
                }
            };

            let now = Utc::now();
            let result = match command {
                Command::Select(coords) => session.select(coords, now).map(Some),
                Command::Reveal(coords) => session.reveal(coords, now).map(Some),
                Command::Flag(coords) => session.toggle_flag(coords).map(Some),
                Command::ToggleFlagMode => {
                    session.toggle_flag_mode();
                    Ok(None)
                }
                Command::Hint => {
                    self.report_hint(session.request_hint())?;
                    Ok(None)
                }
                Command::Restart => return self.start_game(),
                Command::Menu => return Ok(Screen::Menu),
                Command::Help => {
                    writeln!(self.output, "{HELP}")?;
                    Ok(None)
                }
                Command::Quit => return Ok(Screen::Quit),
            };

            match result {
                Ok(Some(report)) => self.report_move(&report)?,
                Ok(None) => {}
                Err(err) => writeln!(self.output, "{err}")?,
            }
        }
    }

    fn report_move(&mut self, report: &MoveReport) -> anyhow::Result<()> {
        match report {
            MoveReport::Revealed(update) => {
                if !update.moved_mines.is_empty() {
                    writeln!(self.output, "The ground shifts near you...")?;
                }
                if let Some(transformation) = update.transformation {
                    let text = match transformation {
                        Transformation::MineCleared(_) => "Something was defused somewhere.",
                        Transformation::MinePlanted(_) => "Something was buried somewhere.",
                    };
                    writeln!(self.output, "{text}")?;
                }
            }
            MoveReport::Ignored => writeln!(self.output, "nothing to do there")?,
            MoveReport::Flagged
            | MoveReport::Unflagged
            | MoveReport::HitMine(_)
            | MoveReport::Won { .. } => {}
        }
        Ok(())
    }

    fn report_hint(&mut self, response: Result<HintResponse, GameError>) -> anyhow::Result<()> {
        match response {
            Ok(HintResponse::Given(Some(hint))) => writeln!(
                self.output,
                "Try {} {} (risk {:.1}), marked with *",
                hint.coords.0, hint.coords.1, hint.risk
            )?,
            Ok(HintResponse::Given(None)) => writeln!(self.output, "No safe cell left to suggest")?,
            Ok(HintResponse::CoolingDown { remaining }) => writeln!(
                self.output,
                "Hint is cooling down, {remaining} more moves"
            )?,
            Err(err) => writeln!(self.output, "{err}")?,
        }
        Ok(())
    }

    fn finish(&mut self, session: &GameSession, outcome: SessionOutcome) -> anyhow::Result<()> {
        let SessionOutcome::Won { score } = outcome else {
            return Ok(());
        };
        if self.scores.record(session.difficulty(), score) {
            writeln!(self.output, "New best score for {}!", session.difficulty())?;
            if let Some(path) = &self.scores_path {
                self.scores.save(path)?;
            }
        }
        Ok(())
    }

    fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }
}
