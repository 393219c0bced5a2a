//! Session configuration and gameplay constants.
//!
//! The menu exposes three selects (difficulty, color mode, option count). Their
//! values are parsed into a [`GameConfig`] once, when a session starts; later
//! menu changes never reach a running session.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::palette::PALETTE;

/// Period of the round clock.
pub const TICK_PERIOD: Duration = Duration::from_millis(100);

/// Number of lead-in steps shown before the first round ("3, 2, 1").
pub const COUNTDOWN_STEPS: u8 = 3;

/// Period between lead-in steps.
pub const COUNTDOWN_PERIOD: Duration = Duration::from_secs(1);

/// Smallest option count the menu offers.
pub const MIN_OPTIONS: usize = 2;

/// Largest option count; bounded by the palette.
pub const MAX_OPTIONS: usize = PALETTE.len();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    /// Full duration of the round clock for this difficulty.
    pub fn round_duration(self) -> Duration {
        match self {
            Difficulty::Easy => Duration::from_secs(3),
            Difficulty::Normal => Duration::from_secs(2),
            Difficulty::Hard => Duration::from_secs(1),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            other => Err(GameError::InvalidConfiguration(format!(
                "unknown difficulty '{other}'"
            ))),
        }
    }
}

/// How swatches are presented. Colorblind mode adds the palette number to
/// every swatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ColorMode {
    #[default]
    Normal,
    Colorblind,
}

impl ColorMode {
    pub const ALL: [ColorMode; 2] = [ColorMode::Normal, ColorMode::Colorblind];

    pub fn as_str(self) -> &'static str {
        match self {
            ColorMode::Normal => "normal",
            ColorMode::Colorblind => "colorblind",
        }
    }

    pub fn labels_swatches(self) -> bool {
        matches!(self, ColorMode::Colorblind)
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorMode {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "normal" => Ok(ColorMode::Normal),
            "colorblind" => Ok(ColorMode::Colorblind),
            other => Err(GameError::InvalidConfiguration(format!(
                "unknown color mode '{other}'"
            ))),
        }
    }
}

/// Settings captured at session start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GameConfig {
    pub difficulty: Difficulty,
    pub color_mode: ColorMode,
    pub option_count: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            color_mode: ColorMode::Normal,
            option_count: 4,
        }
    }
}

impl GameConfig {
    /// Builds a validated config.
    pub fn new(difficulty: Difficulty, color_mode: ColorMode, option_count: usize) -> Result<Self> {
        let config = Self {
            difficulty,
            color_mode,
            option_count,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parses the raw select values coming from the menu.
    pub fn from_menu(difficulty: &str, color_mode: &str, option_count: &str) -> Result<Self> {
        let count = option_count.trim().parse::<usize>().map_err(|_| {
            GameError::InvalidConfiguration(format!("option count '{option_count}' is not a number"))
        })?;
        Self::new(difficulty.parse()?, color_mode.parse()?, count)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&self.option_count) {
            return Err(GameError::InvalidConfiguration(format!(
                "option count {} outside {MIN_OPTIONS}..={MAX_OPTIONS}",
                self.option_count
            )));
        }
        Ok(())
    }
}
