//! A single named integer read once at startup and written when a finished
//! game beats it. Storage problems are logged and never reach the game.

use std::fs;
use std::io;
use std::path::PathBuf;

use log::{error, info, warn};
use serde::{Deserialize, Serialize};

use crate::constants::HIGH_SCORE_NAME;

pub trait HighScoreStore {
    /// The stored score, or 0 when nothing usable is stored.
    fn load(&mut self) -> u32;
    fn save(&mut self, score: u32);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub name: String,
    pub value: u32,
}

impl HighScoreRecord {
    pub fn new(value: u32) -> Self {
        HighScoreRecord { name: HIGH_SCORE_NAME.to_string(), value }
    }
}

/// JSON file holding one [`HighScoreRecord`].
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    fn read(&self) -> io::Result<HighScoreRecord> {
        let text = fs::read_to_string(&self.path)?;
        serde_json::from_str(&text).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn write(&self, record: &HighScoreRecord) -> io::Result<()> {
        let json = serde_json::to_string_pretty(record).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, json)
    }
}

impl HighScoreStore for JsonFileStore {
    fn load(&mut self) -> u32 {
        match self.read() {
            Ok(record) if record.name == HIGH_SCORE_NAME => {
                info!("Loaded high score {} from {}", record.value, self.path.display());
                record.value
            }
            Ok(record) => {
                warn!("Ignoring high score file {} with name {:?}", self.path.display(), record.name);
                0
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No high score at {}, starting fresh", self.path.display());
                0
            }
            Err(e) => {
                warn!("Could not read high score from {}: {}", self.path.display(), e);
                0
            }
        }
    }

    fn save(&mut self, score: u32) {
        match self.write(&HighScoreRecord::new(score)) {
            Ok(()) => info!("Saved high score {} to {}", score, self.path.display()),
            Err(e) => error!("Failed to save high score to {}: {}", self.path.display(), e),
        }
    }
}

/// Keeps the score in memory only; used for headless runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub value: Option<u32>,
    pub saves: u32,
}

impl MemoryStore {
    pub fn with_value(value: u32) -> Self {
        MemoryStore { value: Some(value), saves: 0 }
    }
}

impl HighScoreStore for MemoryStore {
    fn load(&mut self) -> u32 {
        self.value.unwrap_or(0)
    }

    fn save(&mut self, score: u32) {
        self.value = Some(score);
        self.saves += 1;
    }
}
