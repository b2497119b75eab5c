use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::Context;
use driftmine_core::Difficulty;
use serde::{Deserialize, Serialize};

/// Best winning score per difficulty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBook {
    best: BTreeMap<Difficulty, i64>,
}

impl ScoreBook {
    pub fn best(&self, difficulty: Difficulty) -> Option<i64> {
        self.best.get(&difficulty).copied()
    }

    /// Keeps `score` when it beats the previous best; returns whether it did.
    pub fn record(&mut self, difficulty: Difficulty, score: i64) -> bool {
        match self.best.get(&difficulty) {
            Some(&best) if best >= score => false,
            _ => {
                self.best.insert(difficulty, score);
                true
            }
        }
    }

    /// A missing file is an empty book.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text)
                .with_context(|| format!("invalid score file {}", path.display())),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
    }
}
