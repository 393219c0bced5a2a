//! Best-score table keyed by difficulty and color mode.
//!
//! The in-memory table is authoritative for the running page. Each raise is
//! written through a [`ScoreBackend`]; a failing backend is logged and
//! otherwise ignored so the game stays playable without storage.

use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{ColorMode, Difficulty};
use crate::error::Result;

/// Prefix of every persisted entry.
pub const STORAGE_PREFIX: &str = "bestScore_";

/// One independent best-score slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScoreKey {
    pub difficulty: Difficulty,
    pub color_mode: ColorMode,
}

impl ScoreKey {
    pub fn new(difficulty: Difficulty, color_mode: ColorMode) -> Self {
        Self {
            difficulty,
            color_mode,
        }
    }

    /// Every key the menu can produce.
    pub fn all() -> impl Iterator<Item = ScoreKey> {
        Difficulty::ALL
            .into_iter()
            .flat_map(|d| ColorMode::ALL.into_iter().map(move |m| ScoreKey::new(d, m)))
    }

    /// Key under which the backend stores this slot, e.g. `bestScore_hard_colorblind`.
    pub fn storage_key(&self) -> String {
        format!("{STORAGE_PREFIX}{self}")
    }
}

impl fmt::Display for ScoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.difficulty, self.color_mode)
    }
}

/// Durable string key-value storage.
pub trait ScoreBackend {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Process-local backend; used natively and in tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl ScoreBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

pub struct ScoreStore {
    backend: Box<dyn ScoreBackend>,
    best: HashMap<ScoreKey, u32>,
}

impl fmt::Debug for ScoreStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoreStore").field("best", &self.best).finish()
    }
}

impl ScoreStore {
    /// Loads every known key from `backend`. Missing, unreadable or
    /// non-numeric entries count as 0.
    pub fn load(backend: Box<dyn ScoreBackend>) -> Self {
        let mut best = HashMap::new();
        for key in ScoreKey::all() {
            let value = match backend.read(&key.storage_key()) {
                Ok(raw) => raw.as_deref().map(parse_score).unwrap_or(0),
                Err(e) => {
                    log::warn!("could not read best score for {key}: {e}");
                    0
                }
            };
            best.insert(key, value);
        }
        Self { backend, best }
    }

    pub fn in_memory() -> Self {
        Self::load(Box::new(MemoryBackend::new()))
    }

    pub fn get(&self, key: ScoreKey) -> u32 {
        self.best.get(&key).copied().unwrap_or(0)
    }

    /// Stores `score` unconditionally.
    pub fn set(&mut self, key: ScoreKey, score: u32) {
        self.best.insert(key, score);
        if let Err(e) = self.backend.write(&key.storage_key(), &score.to_string()) {
            log::warn!("best score for {key} kept in memory only: {e}");
        }
    }

    /// Raises the stored value to `candidate` if it is higher. Returns whether
    /// it did.
    pub fn record_if_higher(&mut self, key: ScoreKey, candidate: u32) -> bool {
        if candidate <= self.get(key) {
            return false;
        }
        log::info!("new best score for {key}: {candidate}");
        self.set(key, candidate);
        true
    }

    /// Snapshot of the table as `{"easy_normal": 3, ...}`.
    #[cfg(feature = "serde_json")]
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = ScoreKey::all()
            .map(|k| (k.to_string(), serde_json::Value::from(self.get(k))))
            .collect();
        serde_json::Value::Object(map)
    }
}

// Storage holds whatever the page last wrote; anything that is not a plain
// non-negative integer reads as no score.
fn parse_score(raw: &str) -> u32 {
    raw.trim().parse().unwrap_or(0)
}
