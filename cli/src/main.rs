//! Terminal front end for driftmine.
//!
//! - `driftmine` opens the start menu on medium difficulty
//! - `driftmine -d hard --safe-start zero` starts from hard with a guaranteed opening
//! - `driftmine --config driftmine.toml --scores scores.json` tunes the game and keeps best scores

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use driftmine_core::{Difficulty, StartTile};

mod app;
mod command;
mod config;
mod logging;
mod render;
mod scores;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity<clap_verbosity_flag::WarnLevel>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Difficulty preselected in the menu: easy, medium or hard
    #[arg(short, long)]
    difficulty: Option<Difficulty>,

    /// Guarantee for the first revealed cell: random, safe or zero
    #[arg(long)]
    safe_start: Option<StartTile>,

    /// TOML file with game, assistant and scoring settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON file where best scores are kept between runs
    #[arg(long)]
    scores: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init_logging(args.verbose.log_level_filter());
    log::debug!("args: {:?}", args);

    let mut settings = config::load_settings(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        settings.game.seed = Some(seed);
    }
    if let Some(difficulty) = args.difficulty {
        settings.game.difficulty = difficulty;
    }
    if let Some(start_tile) = args.safe_start {
        settings.game.start_tile = start_tile;
    }

    let scores = match &args.scores {
        Some(path) => scores::ScoreBook::load(path)
            .with_context(|| format!("could not load scores from {}", path.display()))?,
        None => Default::default(),
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    app::App::new(stdin.lock(), stdout.lock(), settings)
        .with_scores(scores, args.scores)
        .run()
}
