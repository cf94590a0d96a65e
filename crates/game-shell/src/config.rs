use std::io::Read;
use std::path::PathBuf;

use crate::guess::Difficulty;

#[derive(Clone, Debug, PartialEq, serde::Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub twenty48: Twenty48,
    #[serde(default)]
    pub guess: Guess,
    #[serde(default)]
    pub input: Input,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Twenty48 {
    /// SQLite file holding `bestScore`.
    #[serde(default = "defaults::twenty48_store")]
    pub store_path: PathBuf,
    /// Pause before a win/game-over notice, purely cosmetic.
    #[serde(default = "defaults::notify_delay_ms")]
    pub notify_delay_ms: u64,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Guess {
    /// SQLite file holding `bestScore` and `gamesWon`.
    #[serde(default = "defaults::guess_store")]
    pub store_path: PathBuf,
    #[serde(default)]
    pub difficulty: Difficulty,
}

#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Input {
    /// Minimum swipe displacement before a gesture counts as a move.
    #[serde(default = "defaults::swipe_threshold")]
    pub swipe_threshold: f64,
}

impl Default for Twenty48 {
    fn default() -> Self {
        Self {
            store_path: defaults::twenty48_store(),
            notify_delay_ms: defaults::notify_delay_ms(),
        }
    }
}

impl Default for Guess {
    fn default() -> Self {
        Self {
            store_path: defaults::guess_store(),
            difficulty: Difficulty::default(),
        }
    }
}

impl Default for Input {
    fn default() -> Self {
        Self {
            swipe_threshold: defaults::swipe_threshold(),
        }
    }
}

impl Config {
    pub fn from_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut file = std::fs::File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let cfg: Self = toml::from_str(&contents)?;
        Ok(cfg)
    }

    /// Load `path` when given, otherwise fall back to defaults.
    pub fn load(path: Option<&std::path::Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => Self::from_toml(p)
                .map_err(|e| anyhow::anyhow!("failed to load config {}: {e}", p.display())),
            None => Ok(Self::default()),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn twenty48_store() -> PathBuf { PathBuf::from("twenty48.db") }
    pub fn guess_store() -> PathBuf { PathBuf::from("guess.db") }
    pub fn notify_delay_ms() -> u64 { 300 }
    pub fn swipe_threshold() -> f64 { twenty48_core::input::DEFAULT_SWIPE_THRESHOLD }
}
