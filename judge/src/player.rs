use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use clap::ValueEnum;
use getstuck::{Engine, Position, SearchConfig, SearchResult};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// How far ahead a computer player looks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Intermediate,
    Hard,
    Extreme,
}

impl Difficulty {
    /// The search depth in plies.
    pub fn depth(self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Intermediate => 3,
            Difficulty::Hard => 8,
            Difficulty::Extreme => 12,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Hard => "hard",
            Difficulty::Extreme => "extreme",
        };
        write!(f, "{}", name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub nick: String,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub search: SearchConfig,
}

impl PlayerConfig {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self {
            nick: difficulty.to_string(),
            difficulty,
            search: SearchConfig::default(),
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file =
            File::open(path).with_context(|| format!("Could not open '{}'", path.display()))?;
        let config = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Could not parse player config '{}'", path.display()))?;
        Ok(config)
    }

    /// Either a difficulty name like "hard", or the path to a JSON config.
    pub fn from_arg(arg: &str) -> anyhow::Result<Self> {
        match Difficulty::from_str(arg, true) {
            Ok(difficulty) => Ok(Self::from_difficulty(difficulty)),
            Err(_) => Self::load(Path::new(arg)),
        }
    }
}

/// A computer player. Its engine, and with it the cache, lives as long as
/// the player.
pub struct Player {
    pub name: String,
    pub depth: u8,
    engine: Engine,
}

impl Player {
    pub fn from_config(config: &PlayerConfig) -> Self {
        Self {
            name: config.nick.clone(),
            depth: config.difficulty.depth(),
            engine: Engine::new(config.search.clone()),
        }
    }

    pub fn choose_move(&mut self, position: &Position) -> SearchResult {
        let result = self.engine.best_move(position, self.depth);
        trace!(player = &self.name, stats = ?result.stats, "Chose move");
        result
    }
}
