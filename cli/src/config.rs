use std::fs;
use std::path::{Path, PathBuf};

use driftmine_core::Settings;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Reads settings from a TOML file; without a path every default applies.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };

    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let settings = parse_settings(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("loaded settings from {}", path.display());
    Ok(settings)
}

pub fn parse_settings(text: &str) -> Result<Settings, toml::de::Error> {
    toml::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftmine_core::{Difficulty, StartTile};

    #[test]
    fn empty_config_is_default() {
        assert_eq!(parse_settings("").unwrap(), Settings::default());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let settings = parse_settings(
            r#"
            [game]
            difficulty = "hard"
            start_tile = "zero"
            seed = 99

            [ai]
            transform_chance = 0.0

            [scoring]
            hint_penalty = 50
            "#,
        )
        .unwrap();

        assert_eq!(settings.game.difficulty, Difficulty::Hard);
        assert_eq!(settings.game.start_tile, StartTile::Zero);
        assert_eq!(settings.game.seed, Some(99));
        assert_eq!(settings.ai.transform_chance, 0.0);
        assert_eq!(settings.ai.mine_move_chance, 0.2);
        assert_eq!(settings.scoring.hint_penalty, 50);
        assert_eq!(settings.scoring.reveal_points, 10);
    }

    #[test]
    fn unknown_difficulty_is_rejected() {
        assert!(parse_settings("[game]\ndifficulty = \"nightmare\"").is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_settings(Some(Path::new("/nonexistent/driftmine.toml"))).unwrap_err();

        assert!(err.to_string().contains("/nonexistent/driftmine.toml"));
    }
}
