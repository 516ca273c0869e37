//! Procedurally derived palettes.
//!
//! - [generate_random_palette]: jittered color wheel from a seed.
//! - [generate_complementary_palette]: LCh gradient from a color to its opposite hue.
//! - [generate_analogous_palette]: LCh gradient across ±30° around a color.
//! - [contrasting_background]: dark or light background for a set of colors.
use tracing::debug;

use crate::color::{Gradient, Rgb};
use crate::error::{Error, Result};
use crate::random::{random_range, shuffle, SeededRandom};

/// Background returned for predominantly light palettes.
pub const DARK_BACKGROUND: &str = "#1e1e2e";
/// Background returned for predominantly dark palettes.
pub const LIGHT_BACKGROUND: &str = "#f5f5f5";

const HUE_JITTER: f64 = 20.0;
const SATURATION: (f64, f64) = (0.5, 0.9);
const LIGHTNESS: (f64, f64) = (0.5, 0.7);

/// `count` colors with hues spaced evenly around a random base hue, each
/// nudged by up to ±20°, then shuffled.
///
/// Draw order per color is hue jitter, saturation, lightness; the final
/// shuffle uses the same generator.
pub fn generate_random_palette(count: usize, seed: Option<u64>) -> Vec<String> {
    let mut rng = SeededRandom::new(seed);
    let base_hue = rng.next_f64() * 360.0;
    debug!(seed = rng.seed(), base_hue, count, "generating random palette");

    let step = 360.0 / count.max(1) as f64;
    let colors: Vec<String> = (0..count)
        .map(|i| {
            let jitter = random_range(&mut rng, -HUE_JITTER, HUE_JITTER);
            let hue = (base_hue + i as f64 * step + jitter) % 360.0;
            let saturation = random_range(&mut rng, SATURATION.0, SATURATION.1);
            let lightness = random_range(&mut rng, LIGHTNESS.0, LIGHTNESS.1);
            Rgb::from_hsl(hue, saturation, lightness).to_hex()
        })
        .collect();

    shuffle(&mut rng, &colors)
}

/// `count` colors from `base_color` to the hue 180° across, interpolated in LCh.
pub fn generate_complementary_palette(base_color: &str, count: usize) -> Result<Vec<String>> {
    let base = Rgb::from_hex(base_color)?;
    let hue = base.hue();
    let gradient = Gradient::new(vec![
        base.with_hue(hue),
        base.with_hue((hue + 180.0) % 360.0),
    ])?;
    Ok(gradient.colors(count))
}

/// `count` colors across `hue - 30°`, `hue`, `hue + 30°` of `base_color`.
pub fn generate_analogous_palette(base_color: &str, count: usize) -> Result<Vec<String>> {
    let base = Rgb::from_hex(base_color)?;
    let hue = base.hue();
    let gradient = Gradient::new(vec![
        base.with_hue((hue - 30.0) % 360.0),
        base.with_hue(hue),
        base.with_hue((hue + 30.0) % 360.0),
    ])?;
    Ok(gradient.colors(count))
}

/// [`DARK_BACKGROUND`] when the mean relative luminance of `colors` is above
/// 0.5, otherwise [`LIGHT_BACKGROUND`].
pub fn contrasting_background<S: AsRef<str>>(colors: &[S]) -> Result<&'static str> {
    if colors.is_empty() {
        return Err(Error::EmptyPalette);
    }

    let total = colors.iter().try_fold(0.0, |sum, c| {
        Rgb::from_hex(c.as_ref()).map(|rgb| sum + rgb.luminance())
    })?;
    let average = total / colors.len() as f64;

    Ok(if average > 0.5 {
        DARK_BACKGROUND
    } else {
        LIGHT_BACKGROUND
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn is_hex(s: &str) -> bool {
        s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
    }

    #[test]
    fn random_palette_has_requested_distinct_hex_colors() {
        let palette = generate_random_palette(7, Some(123));
        assert_eq!(palette.len(), 7);
        assert!(palette.iter().all(|c| is_hex(c)), "{palette:?}");
        let unique: HashSet<_> = palette.iter().collect();
        assert_eq!(unique.len(), 7);
    }

    #[test]
    fn random_palette_reference_output() {
        assert_eq!(
            generate_random_palette(7, Some(123)),
            vec!["#f4e25b", "#631ff1", "#30b0df", "#d555da", "#f2375e", "#98e978", "#26ee6e"]
        );
    }

    #[test]
    fn random_palette_is_deterministic_per_seed() {
        assert_eq!(
            generate_random_palette(5, Some(2025)),
            generate_random_palette(5, Some(2025))
        );
        assert_ne!(
            generate_random_palette(5, Some(1)),
            generate_random_palette(5, Some(2))
        );
    }

    #[test]
    fn random_palette_handles_zero_count() {
        assert!(generate_random_palette(0, Some(9)).is_empty());
    }

    #[test]
    fn complementary_palette_spans_base_to_opposite() {
        let colors = generate_complementary_palette("#ff0000", 5).unwrap();
        assert_eq!(colors.len(), 5);
        assert_eq!(colors[0], "#ff0000");
        assert_eq!(colors[4], "#00ffff");
    }

    #[test]
    fn complementary_palette_reference_output() {
        assert_eq!(
            generate_complementary_palette("#ff0000", 5).unwrap(),
            vec!["#ff0000", "#d08a00", "#91c01d", "#40e59b", "#00ffff"]
        );
    }

    #[test]
    fn analogous_palette_is_centered_on_base() {
        let colors = generate_analogous_palette("#3b82f6", 7).unwrap();
        assert_eq!(colors.len(), 7);
        assert_eq!(colors[3], "#3b82f6");
    }

    #[test]
    fn derived_palettes_reject_bad_input() {
        assert!(generate_complementary_palette("blue", 3).is_err());
        assert!(generate_analogous_palette("#12", 3).is_err());
    }

    #[test]
    fn gray_base_uses_zero_hue() {
        let colors = generate_complementary_palette("#808080", 3).unwrap();
        assert!(colors.iter().all(|c| c == "#808080"), "{colors:?}");
    }

    #[test]
    fn contrasting_background_is_a_binary_threshold() {
        assert_eq!(
            contrasting_background(&["#ffffff", "#f1fa8c"]).unwrap(),
            DARK_BACKGROUND
        );
        assert_eq!(
            contrasting_background(&["#000000", "#282a36"]).unwrap(),
            LIGHT_BACKGROUND
        );
        // Mid-gray sits just under the threshold.
        assert_eq!(contrasting_background(&["#bababa"]).unwrap(), LIGHT_BACKGROUND);
    }

    #[test]
    fn contrasting_background_errors() {
        assert!(matches!(
            contrasting_background::<&str>(&[]),
            Err(Error::EmptyPalette)
        ));
        assert!(matches!(
            contrasting_background(&["nope"]),
            Err(Error::InvalidColor(_))
        ));
    }
}
