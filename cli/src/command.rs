use core::str::FromStr;

use driftmine_core::{Coord, Coord2};
use thiserror::Error;

/// One line of player input during a game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Bare coordinates: reveal, or flag while flag mode is on.
    Select(Coord2),
    Reveal(Coord2),
    Flag(Coord2),
    ToggleFlagMode,
    Hint,
    Restart,
    Menu,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty command")]
    Empty,
    #[error("unknown command {0:?}, type ? for help")]
    Unknown(String),
    #[error("bad coordinate {0:?}")]
    BadCoordinate(String),
    #[error("{0} takes exactly two coordinates, x then y")]
    WrongArity(&'static str),
}

pub const HELP: &str = "\
commands:
  <x> <y>      reveal a cell (flag it while flag mode is on)
  r <x> <y>    reveal a cell
  f <x> <y>    toggle a flag
  f | m        toggle flag mode
  h            hint (costs points, then cools down)
  r | n        restart with the same difficulty
  menu         back to the start menu
  ?            this help
  q            quit";

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&head, args)) = words.split_first() else {
            return Err(ParseError::Empty);
        };

        let command = match (head.to_ascii_lowercase().as_str(), args) {
            (_, [y]) if head.chars().all(|c| c.is_ascii_digit()) => {
                Command::Select((parse_coord(head)?, parse_coord(y)?))
            }
            ("r" | "reveal", []) if head.len() == 1 => Command::Restart,
            ("r" | "reveal", args) => Command::Reveal(parse_pair("reveal", args)?),
            ("f" | "m" | "mode", []) => Command::ToggleFlagMode,
            ("f" | "flag", args) => Command::Flag(parse_pair("flag", args)?),
            ("h" | "hint", []) => Command::Hint,
            ("n" | "new" | "restart", []) => Command::Restart,
            ("menu" | "esc", []) => Command::Menu,
            ("?" | "help", []) => Command::Help,
            ("q" | "quit" | "exit", []) => Command::Quit,
            _ => return Err(ParseError::Unknown(line.trim().to_string())),
        };
        Ok(command)
    }
}

fn parse_pair(name: &'static str, args: &[&str]) -> Result<Coord2, ParseError> {
    match args {
        [x, y] => Ok((parse_coord(x)?, parse_coord(y)?)),
        _ => Err(ParseError::WrongArity(name)),
    }
}

fn parse_coord(word: &str) -> Result<Coord, ParseError> {
    word.parse()
        .map_err(|_| ParseError::BadCoordinate(word.to_string()))
}
