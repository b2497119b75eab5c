use core::fmt::Write;

use driftmine_core::{Coord2, Difficulty, EngineCell, EngineState, GameSession, SessionOutcome};

/// Glyph shown for one cell; mines are only exposed once the game is over.
pub fn cell_glyph(session: &GameSession, coords: Coord2) -> char {
    let engine = session.engine();
    let cell = engine.cell_at(coords);
    let has_mine = engine.has_mine_at(coords);

    match engine.state() {
        EngineState::Lost => {
            if engine.triggered_mine() == Some(coords) {
                return 'X';
            }
            match (cell, has_mine) {
                (EngineCell::Flagged, true) => return 'F',
                (EngineCell::Flagged, false) => return '!',
                (_, true) => return '@',
                _ => {}
            }
        }
        EngineState::Won if has_mine => return 'F',
        _ => {}
    }

    match cell {
        EngineCell::Hidden if session.hint().is_some_and(|hint| hint.coords == coords) => '*',
        EngineCell::Hidden => '#',
        EngineCell::Flagged => 'F',
        EngineCell::Revealed(0) => '.',
        EngineCell::Revealed(count) => char::from(b'0' + count),
    }
}

pub fn render_header(session: &GameSession) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Score: {}   Difficulty: {}   Mines left: {}   Threat: {:.1}x",
        session.score(),
        session.difficulty(),
        session.engine().mines_left(),
        session.ai().difficulty()
    );

    let hint = match session.hint_cooldown() {
        0 => "h for hint".to_string(),
        n => format!("Hint cooldown: {n}"),
    };
    let flag_mode = if session.flag_mode() { "ON" } else { "OFF" };
    let _ = writeln!(
        out,
        "{hint}   f for flag mode ({flag_mode})   Moves: {}   Flags: {}",
        session.move_count(),
        session.engine().flagged_count()
    );

    match session.outcome() {
        SessionOutcome::Won { score } => {
            let _ = writeln!(out, "You Win! Final score: {score}");
        }
        SessionOutcome::Lost => {
            let _ = writeln!(out, "Game Over!");
        }
        SessionOutcome::Playing => {}
    }
    out
}

pub fn render_board(session: &GameSession) -> String {
    let (width, height) = session.engine().size();
    let mut out = String::from("   ");
    for x in 0..width {
        let _ = write!(out, "{x:>3}");
    }
    out.push('\n');

    for y in 0..height {
        let _ = write!(out, "{y:>3}");
        for x in 0..width {
            let _ = write!(out, "{:>3}", cell_glyph(session, (x, y)));
        }
        out.push('\n');
    }
    out
}

pub fn render_menu(selected: Difficulty, best: Option<i64>) -> String {
    let mut out = String::from("\n  driftmine\n\n");
    for (i, difficulty) in Difficulty::ALL.into_iter().enumerate() {
        let config = difficulty.config();
        let marker = if difficulty == selected { '>' } else { ' ' };
        let _ = writeln!(
            out,
            " {marker} {}. {:<7} {}x{}, {} mines",
            i + 1,
            difficulty.name(),
            config.size.0,
            config.size.1,
            config.mines
        );
    }
    out.push_str("\n  1-3 to pick, enter to start, q to quit\n");
    if let Some(best) = best.filter(|&best| best > 0) {
        let _ = writeln!(out, "  Best Score: {best}");
    }
    out
}
