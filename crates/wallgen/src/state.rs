//! Flat generator state for share links and saved settings.
//!
//! [`GeneratorState`] is what a front end keeps: percent sliders, a mode
//! switch between gradient and named themes, a resolution preset. It maps to
//! [`GeneratorOptions`] with [`GeneratorState::to_options`] and round-trips
//! through a compact query string:
//!
//! | key    | value                                     |
//! |--------|-------------------------------------------|
//! | `m`    | `gradient` or `themes`                    |
//! | `r`    | resolution preset key                     |
//! | `s`    | shape count, 3..=15                       |
//! | `w`    | shape width in percent, 5..=25            |
//! | `h`    | shape height in percent, 40..=95          |
//! | `o`    | overlap in percent, 0..=60                |
//! | `c`    | comma-separated `#rrggbb`, 2..=10 entries |
//! | `bg`   | background `#rrggbb` (gradient mode)      |
//! | `p`    | palette key (themes mode)                 |
//! | `seed` | integer seed                              |
//!
//! Out-of-range or malformed values are ignored key by key.
use std::fmt;
use std::ops::RangeInclusive;

use url::form_urlencoded;

use crate::layout::{GeneratorOptions, LayoutPolicy};
use crate::palette::PaletteSpec;
use crate::resolution::ResolutionPreset;

pub const SHAPE_COUNT_RANGE: RangeInclusive<i64> = 3..=15;
pub const SHAPE_WIDTH_RANGE: RangeInclusive<i64> = 5..=25;
pub const SHAPE_HEIGHT_RANGE: RangeInclusive<i64> = 40..=95;
pub const OVERLAP_RANGE: RangeInclusive<i64> = 0..=60;
pub const CUSTOM_COLOR_COUNT: RangeInclusive<usize> = 2..=10;

/// Whether shapes use the custom color gradient or a named theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum GeneratorMode {
    #[default]
    Gradient,
    Themes,
}

impl GeneratorMode {
    pub const fn key(self) -> &'static str {
        match self {
            Self::Gradient => "gradient",
            Self::Themes => "themes",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "gradient" => Some(Self::Gradient),
            "themes" => Some(Self::Themes),
            _ => None,
        }
    }
}

impl fmt::Display for GeneratorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Front-end generator settings.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct GeneratorState {
    pub mode: GeneratorMode,
    /// Theme key used in [`GeneratorMode::Themes`].
    pub palette: String,
    /// Gradient stops used in [`GeneratorMode::Gradient`].
    pub custom_colors: Vec<String>,
    /// Background used in [`GeneratorMode::Gradient`].
    pub background_color: String,
    pub resolution: ResolutionPreset,
    pub shape_count: usize,
    /// Percent of canvas width.
    pub shape_width: u32,
    /// Percent of canvas height.
    pub shape_height: u32,
    /// Percent of shape width.
    pub overlap: u32,
    pub seed: Option<u64>,
}

impl Default for GeneratorState {
    fn default() -> Self {
        Self {
            mode: GeneratorMode::Gradient,
            palette: "catppuccinMocha".into(),
            custom_colors: ["#22c55e", "#3b82f6", "#a855f7", "#ef4444", "#eab308"]
                .map(String::from)
                .to_vec(),
            background_color: "#212121".into(),
            resolution: ResolutionPreset::FourK,
            shape_count: 7,
            shape_width: 12,
            shape_height: 75,
            overlap: 35,
            seed: None,
        }
    }
}

impl GeneratorState {
    /// Engine options for this state. The background override is only passed
    /// in gradient mode.
    pub fn to_options(&self) -> GeneratorOptions {
        let (width, height) = self.resolution.dimensions();
        let palette = match self.mode {
            GeneratorMode::Gradient => PaletteSpec::Colors(self.custom_colors.clone()),
            GeneratorMode::Themes => PaletteSpec::Named(self.palette.clone()),
        };

        let mut options = GeneratorOptions::new(width, height, palette)
            .with_shape_count(self.shape_count)
            .with_layout(LayoutPolicy::overlap(
                f64::from(self.shape_width) / 100.0,
                f64::from(self.shape_height) / 100.0,
                f64::from(self.overlap) / 100.0,
            ));
        options.seed = self.seed;
        if self.mode == GeneratorMode::Gradient {
            options = options.with_background_color(self.background_color.clone());
        }
        options
    }

    /// Whether [`GeneratorState::to_query`] encodes every value of this state
    /// in range, so the link reproduces it when applied.
    pub fn is_shareable(&self) -> bool {
        let fits = |value: i64, range: RangeInclusive<i64>| range.contains(&value);
        let sizes_fit = i64::try_from(self.shape_count)
            .is_ok_and(|count| fits(count, SHAPE_COUNT_RANGE))
            && fits(i64::from(self.shape_width), SHAPE_WIDTH_RANGE)
            && fits(i64::from(self.shape_height), SHAPE_HEIGHT_RANGE)
            && fits(i64::from(self.overlap), OVERLAP_RANGE);

        let colors_fit = match self.mode {
            GeneratorMode::Gradient => {
                CUSTOM_COLOR_COUNT.contains(&self.custom_colors.len())
                    && self.custom_colors.iter().all(|c| is_hex_color(c))
                    && is_hex_color(&self.background_color)
            }
            GeneratorMode::Themes => !self.palette.is_empty(),
        };
        sizes_fit && colors_fit
    }

    /// Encode as a share-link query string (without the leading `?`).
    pub fn to_query(&self) -> String {
        let mut query = form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("m", self.mode.key())
            .append_pair("r", self.resolution.key())
            .append_pair("s", &self.shape_count.to_string())
            .append_pair("w", &self.shape_width.to_string())
            .append_pair("h", &self.shape_height.to_string())
            .append_pair("o", &self.overlap.to_string());

        match self.mode {
            GeneratorMode::Gradient => {
                query
                    .append_pair("c", &self.custom_colors.join(","))
                    .append_pair("bg", &self.background_color);
            }
            GeneratorMode::Themes => {
                query.append_pair("p", &self.palette);
            }
        }

        if let Some(seed) = self.seed {
            query.append_pair("seed", &seed.to_string());
        }
        query.finish()
    }

    /// Apply every valid key of a share-link query on top of this state.
    ///
    /// Returns `false` when no key carried a valid value, in which case the
    /// state is untouched.
    pub fn apply_query(&mut self, query: &str) -> bool {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs: Vec<(String, String)> = form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        let get = |key: &str| lookup(&pairs, key);
        let mut applied = false;

        if let Some(mode) = get("m").and_then(GeneratorMode::from_key) {
            self.mode = mode;
            applied = true;
        }
        if let Some(resolution) = get("r").and_then(|r| r.parse().ok()) {
            self.resolution = resolution;
            applied = true;
        }
        if let Some(count) = get("s").and_then(|v| int_in_range(v, SHAPE_COUNT_RANGE)) {
            self.shape_count = count as usize;
            applied = true;
        }
        if let Some(width) = get("w").and_then(|v| int_in_range(v, SHAPE_WIDTH_RANGE)) {
            self.shape_width = width as u32;
            applied = true;
        }
        if let Some(height) = get("h").and_then(|v| int_in_range(v, SHAPE_HEIGHT_RANGE)) {
            self.shape_height = height as u32;
            applied = true;
        }
        if let Some(overlap) = get("o").and_then(|v| int_in_range(v, OVERLAP_RANGE)) {
            self.overlap = overlap as u32;
            applied = true;
        }
        if let Some(colors) = get("c") {
            let colors: Vec<String> = colors
                .split(',')
                .filter(|c| is_hex_color(c))
                .map(String::from)
                .collect();
            if CUSTOM_COLOR_COUNT.contains(&colors.len()) {
                self.custom_colors = colors;
                applied = true;
            }
        }
        if let Some(bg) = get("bg").filter(|bg| is_hex_color(bg)) {
            self.background_color = bg.to_owned();
            applied = true;
        }
        if let Some(palette) = get("p").filter(|p| !p.is_empty()) {
            self.palette = palette.to_owned();
            applied = true;
        }
        if let Some(seed) = get("seed")
            .and_then(leading_int)
            .and_then(|seed| u64::try_from(seed).ok())
        {
            self.seed = Some(seed);
            applied = true;
        }
        applied
    }

    /// Default state with a share-link query applied; `None` if no share key
    /// carried a valid value.
    pub fn from_query(query: &str) -> Option<Self> {
        let mut state = Self::default();
        state.apply_query(query).then_some(state)
    }
}

fn lookup<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// `#rrggbb`, either case.
pub fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Integer prefix of `value` (optional sign, then digits), ignoring trailing
/// garbage the way lenient query parsing does: `"12px"` is 12.
fn leading_int(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let (sign, digits) = match value.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, value.strip_prefix('+').unwrap_or(value)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

fn int_in_range(value: &str, range: RangeInclusive<i64>) -> Option<i64> {
    leading_int(value).filter(|n| range.contains(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_maps_to_gradient_options() {
        let options = GeneratorState::default().to_options();
        assert_eq!((options.width, options.height), (3840, 2160));
        assert_eq!(options.shape_count, 7);
        assert_eq!(options.background_color.as_deref(), Some("#212121"));
        assert!(matches!(options.palette, PaletteSpec::Colors(ref c) if c.len() == 5));
        assert_eq!(options.layout, LayoutPolicy::overlap(0.12, 0.75, 0.35));
        assert_eq!(options.seed, None);
    }

    #[test]
    fn themes_mode_drops_background_override() {
        let state = GeneratorState {
            mode: GeneratorMode::Themes,
            palette: "nord".into(),
            seed: Some(9),
            ..Default::default()
        };
        let options = state.to_options();
        assert_eq!(options.palette, PaletteSpec::named("nord"));
        assert_eq!(options.background_color, None);
        assert_eq!(options.seed, Some(9));
    }

    #[test]
    fn gradient_query_round_trip() {
        let state = GeneratorState {
            seed: Some(1_700_000_000_000),
            shape_count: 9,
            ..Default::default()
        };
        let query = state.to_query();
        assert!(query.starts_with("m=gradient&r=4k&s=9&w=12&h=75&o=35&c=%2322c55e%2C"));
        assert!(!query.contains("p="));
        assert_eq!(GeneratorState::from_query(&query), Some(state));
    }

    #[test]
    fn themes_query_round_trip() {
        let state = GeneratorState {
            mode: GeneratorMode::Themes,
            palette: "rosePineDawn".into(),
            resolution: ResolutionPreset::Mobile,
            overlap: 0,
            seed: Some(0),
            ..Default::default()
        };
        let query = state.to_query();
        assert_eq!(query, "m=themes&r=mobile&s=7&w=12&h=75&o=0&p=rosePineDawn&seed=0");
        assert_eq!(GeneratorState::from_query(&format!("?{query}")), Some(state));
    }

    #[test]
    fn invalid_values_are_ignored_individually() {
        let mut state = GeneratorState::default();
        let applied = state.apply_query(
            "m=rainbow&r=8k&s=40&w=2&h=96&o=61&c=%23ff0000,red&bg=black&seed=abc&p=nord",
        );
        assert!(applied);
        assert_eq!(
            state,
            GeneratorState {
                palette: "nord".into(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn lenient_integers_and_color_filtering() {
        let mut state = GeneratorState::default();
        state.apply_query("s=12abc&o=0&c=%23ff0000,nope,%2300ff00&bg=%23ABCDEF&seed=-5");
        assert_eq!(state.shape_count, 12);
        assert_eq!(state.overlap, 0);
        assert_eq!(state.custom_colors, vec!["#ff0000", "#00ff00"]);
        assert_eq!(state.background_color, "#ABCDEF");
        assert_eq!(state.seed, None);
    }

    #[test]
    fn too_many_custom_colors_are_rejected() {
        let colors = vec!["%23112233"; 11].join(",");
        let mut state = GeneratorState::default();
        state.apply_query(&format!("c={colors}"));
        assert_eq!(state.custom_colors, GeneratorState::default().custom_colors);
    }

    #[test]
    fn query_without_share_keys_is_not_applied() {
        assert_eq!(GeneratorState::from_query(""), None);
        assert_eq!(GeneratorState::from_query("utm_source=x"), None);
    }

    #[test]
    fn shareable_only_when_every_value_fits_the_link() {
        let state = GeneratorState::default();
        assert!(state.is_shareable());

        for unshareable in [
            GeneratorState {
                shape_count: 20,
                ..state.clone()
            },
            GeneratorState {
                overlap: 61,
                ..state.clone()
            },
            GeneratorState {
                custom_colors: vec!["#fff".into(), "#000000".into()],
                ..state.clone()
            },
        ] {
            assert!(!unshareable.is_shareable(), "{unshareable:?}");
            let mut applied = GeneratorState::default();
            applied.apply_query(&unshareable.to_query());
            assert_ne!(applied, unshareable);
        }

        let themes = GeneratorState {
            mode: GeneratorMode::Themes,
            background_color: "not a color".into(),
            ..state
        };
        assert!(themes.is_shareable());
    }

    #[test]
    fn query_with_only_invalid_values_is_not_applied() {
        assert_eq!(GeneratorState::from_query("s=99&w=1"), None);
        assert_eq!(GeneratorState::from_query("m=rainbow&bg=black&seed=-3"), None);

        let mut state = GeneratorState {
            shape_count: 9,
            ..Default::default()
        };
        assert!(!state.apply_query("s=2&c=%23ff0000"));
        assert_eq!(state.shape_count, 9);
    }

    #[test]
    fn hex_color_check() {
        assert!(is_hex_color("#a1B2c3"));
        assert!(!is_hex_color("#abc"));
        assert!(!is_hex_color("a1b2c3f"));
        assert!(!is_hex_color("#a1b2cg"));
    }
}
