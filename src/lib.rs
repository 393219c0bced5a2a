//! Color Snap core crate.
//!
//! A target color is shown and the player has to click the matching swatch
//! before the round clock runs out. Game rules live in plain Rust modules
//! (`round`, `timer`, `score`, `audio`, `session`) that build and test natively;
//! `web` binds them to the page and is the only module touching browser APIs.

use wasm_bindgen::prelude::*;

pub mod audio;
pub mod config;
pub mod error;
pub mod palette;
pub mod round;
pub mod score;
pub mod session;
pub mod timer;
pub mod web;

pub use config::{ColorMode, Difficulty, GameConfig};
pub use error::{GameError, Result};
pub use palette::{PALETTE, Rgb};
pub use round::{Round, Swatch};
pub use score::{ScoreKey, ScoreStore};
pub use session::{GameSession, Phase, Ports, Selection};
pub use timer::{Tick, TickToken, TimerEngine};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
