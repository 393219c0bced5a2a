//! Fixed color catalog.
//!
//! Palette order is stable: a color's 1-based position is the number printed
//! on its swatch in colorblind mode.

use std::fmt;
use std::str::FromStr;

use crate::error::GameError;

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS form, `#RRGGBB` (uppercase).
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Accepts `#RRGGBB` or `RRGGBB`, any case.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::from_hex(s)
            .ok_or_else(|| GameError::InvalidConfiguration(format!("'{s}' is not a #RRGGBB color")))
    }
}

pub const PALETTE: [Rgb; 12] = [
    Rgb::new(0xFF, 0x00, 0x00), // red
    Rgb::new(0x00, 0xFF, 0x00), // lime
    Rgb::new(0x00, 0x00, 0xFF), // blue
    Rgb::new(0xFF, 0xFF, 0x00), // yellow
    Rgb::new(0x00, 0xFF, 0xFF), // cyan
    Rgb::new(0xFF, 0x00, 0xFF), // magenta
    Rgb::new(0xFF, 0xA5, 0x00), // orange
    Rgb::new(0x80, 0x00, 0x80), // purple
    Rgb::new(0xFF, 0x63, 0x47), // tomato
    Rgb::new(0x7C, 0xFC, 0x00), // lawn green
    Rgb::new(0x99, 0x32, 0xCC), // dark orchid
    Rgb::new(0x00, 0xBF, 0xFF), // deep sky blue
];

/// 1-based palette number of `color`, if it belongs to `palette`.
pub fn label_of(palette: &[Rgb], color: Rgb) -> Option<u8> {
    palette
        .iter()
        .position(|c| *c == color)
        .and_then(|i| u8::try_from(i + 1).ok())
}
