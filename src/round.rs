//! Round generation: one target color plus a shuffled set of distinct options.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::ColorMode;
use crate::error::{GameError, Result};
use crate::palette::{Rgb, label_of};

/// A color as presented to the player. `label` is set in colorblind mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    pub color: Rgb,
    pub label: Option<u8>,
}

impl Swatch {
    fn new(palette: &[Rgb], color: Rgb, mode: ColorMode) -> Self {
        let label = if mode.labels_swatches() {
            label_of(palette, color)
        } else {
            None
        };
        Self { color, label }
    }
}

/// One challenge: the target and the options in presentation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    pub target: Swatch,
    pub options: Vec<Swatch>,
}

impl Round {
    pub fn is_target(&self, color: Rgb) -> bool {
        self.target.color == color
    }

    pub fn contains(&self, color: Rgb) -> bool {
        self.options.iter().any(|s| s.color == color)
    }

    pub fn option_colors(&self) -> impl Iterator<Item = Rgb> + '_ {
        self.options.iter().map(|s| s.color)
    }
}

/// Builds a round from `palette`.
///
/// The target is drawn uniformly, distractors are drawn uniformly without
/// repetition, and the option list is Fisher-Yates shuffled.
pub fn generate<R: Rng + ?Sized>(
    palette: &[Rgb],
    option_count: usize,
    mode: ColorMode,
    rng: &mut R,
) -> Result<Round> {
    let distinct = palette.iter().collect::<HashSet<_>>().len();
    if option_count < 1 || option_count > distinct {
        return Err(GameError::InvalidConfiguration(format!(
            "option count {option_count} must be within 1..={distinct}"
        )));
    }

    let target = palette[rng.random_range(0..palette.len())];
    let mut colors = Vec::with_capacity(option_count);
    colors.push(target);
    while colors.len() < option_count {
        let candidate = palette[rng.random_range(0..palette.len())];
        if !colors.contains(&candidate) {
            colors.push(candidate);
        }
    }
    colors.shuffle(rng);

    Ok(Round {
        target: Swatch::new(palette, target, mode),
        options: colors
            .into_iter()
            .map(|c| Swatch::new(palette, c, mode))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::PALETTE;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn every_valid_count_yields_distinct_options_with_one_target() {
        let mut rng = StdRng::seed_from_u64(7);
        for count in 1..=PALETTE.len() {
            for _ in 0..50 {
                let round = generate(&PALETTE, count, ColorMode::Normal, &mut rng).unwrap();
                assert_eq!(round.options.len(), count);
                let unique: HashSet<Rgb> = round.option_colors().collect();
                assert_eq!(unique.len(), count, "duplicate option for count {count}");
                let hits = round.option_colors().filter(|c| round.is_target(*c)).count();
                assert_eq!(hits, 1);
                assert!(round.contains(round.target.color));
            }
        }
    }

    #[test]
    fn out_of_range_counts_fail() {
        let mut rng = StdRng::seed_from_u64(1);
        for bad in [0, PALETTE.len() + 1] {
            let err = generate(&PALETTE, bad, ColorMode::Normal, &mut rng).unwrap_err();
            assert!(matches!(err, GameError::InvalidConfiguration(_)));
        }
    }

    #[test]
    fn duplicate_palette_entries_cannot_stall_generation() {
        let mut rng = StdRng::seed_from_u64(2);
        let palette = [PALETTE[0], PALETTE[0], PALETTE[1]];
        assert!(generate(&palette, 3, ColorMode::Normal, &mut rng).is_err());
        let round = generate(&palette, 2, ColorMode::Normal, &mut rng).unwrap();
        assert!(round.contains(PALETTE[0]) && round.contains(PALETTE[1]));
        assert!(!round.contains(PALETTE[2]));
    }

    #[test]
    fn colorblind_mode_labels_with_palette_position() {
        let mut rng = StdRng::seed_from_u64(3);
        let round = generate(&PALETTE, 5, ColorMode::Colorblind, &mut rng).unwrap();
        assert_eq!(round.target.label, label_of(&PALETTE, round.target.color));
        for swatch in &round.options {
            let label = swatch.label.expect("colorblind swatches are labelled");
            assert_eq!(PALETTE[label as usize - 1], swatch.color);
        }

        let plain = generate(&PALETTE, 5, ColorMode::Normal, &mut rng).unwrap();
        assert!(plain.target.label.is_none());
        assert!(plain.options.iter().all(|s| s.label.is_none()));
    }

    #[test]
    fn positions_are_roughly_uniform() {
        // Fixed three-color palette so every option appears every round.
        let palette = [PALETTE[0], PALETTE[1], PALETTE[2]];
        let mut rng = StdRng::seed_from_u64(42);
        let trials = 30_000;
        let mut counts = [[0u32; 3]; 3];
        for _ in 0..trials {
            let round = generate(&palette, 3, ColorMode::Normal, &mut rng).unwrap();
            for (pos, color) in round.option_colors().enumerate() {
                let idx = palette.iter().position(|c| *c == color).unwrap();
                counts[idx][pos] += 1;
            }
        }
        let expected = f64::from(trials) / 3.0;
        for row in counts {
            for n in row {
                let deviation = (f64::from(n) - expected).abs() / expected;
                assert!(deviation < 0.05, "count {n} too far from {expected}");
            }
        }
    }
}
