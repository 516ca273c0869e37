//! Named theme catalog and palette resolution.
//!
//! A palette is either the key of a catalog theme or an explicit list of colors
//! ([`PaletteSpec`]). [`resolve_palette`] turns either into the concrete colors
//! and background a layout uses.
//!
//! The catalog is static data. Theme keys appear in share links and saved
//! settings, so renaming or removing one is a breaking change.
use tracing::debug;

use crate::color::Rgb;
use crate::error::{Error, Result};

/// Background for explicit color lists when no override is given.
pub const DEFAULT_BACKGROUND: &str = "#0a0a0a";

/// A catalog theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PaletteDefinition {
    /// Unique key, used for lookup.
    pub name: &'static str,
    pub display_name: &'static str,
    pub colors: [&'static str; 7],
    pub background: &'static str,
    pub accent: Option<&'static str>,
}

/// Where a palette's colors come from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum PaletteSpec {
    /// Key of a catalog theme.
    Named(String),
    /// Caller-supplied colors, used as given. Enables gradient mode in the
    /// overlap layout.
    Colors(Vec<String>),
}

impl PaletteSpec {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    pub fn colors<S: Into<String>>(colors: impl IntoIterator<Item = S>) -> Self {
        Self::Colors(colors.into_iter().map(Into::into).collect())
    }
}

impl Default for PaletteSpec {
    fn default() -> Self {
        Self::Named("catppuccinMocha".into())
    }
}

/// What to use as background for an explicit color list without an override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackgroundFallback {
    /// [`DEFAULT_BACKGROUND`].
    #[default]
    Constant,
    /// The first color of the list.
    FirstColor,
}

/// Concrete colors and background after resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPalette {
    pub colors: Vec<String>,
    pub background: String,
}

/// Resolve with [`BackgroundFallback::Constant`].
pub fn resolve_palette(
    spec: &PaletteSpec,
    custom_background: Option<&str>,
) -> Result<ResolvedPalette> {
    resolve_palette_with(spec, custom_background, BackgroundFallback::Constant)
}

/// Resolve a palette spec.
///
/// Named themes return their colors and background verbatim; the override is
/// ignored. Explicit lists are returned as-is with the override, or the
/// fallback, as background. Explicit colors and the override must be valid hex.
pub fn resolve_palette_with(
    spec: &PaletteSpec,
    custom_background: Option<&str>,
    fallback: BackgroundFallback,
) -> Result<ResolvedPalette> {
    match spec {
        PaletteSpec::Named(name) => {
            let definition = get_palette(name).ok_or_else(|| Error::UnknownPalette {
                name: name.clone(),
                available: palette_names().join(", "),
            })?;
            debug!(palette = definition.name, "resolved named palette");
            Ok(ResolvedPalette {
                colors: definition.colors.iter().map(|c| c.to_string()).collect(),
                background: definition.background.to_owned(),
            })
        }
        PaletteSpec::Colors(colors) => {
            let first = colors.first().ok_or(Error::EmptyPalette)?;
            for color in colors {
                Rgb::from_hex(color)?;
            }

            let background = match (custom_background, fallback) {
                (Some(bg), _) => {
                    Rgb::from_hex(bg)?;
                    bg.to_owned()
                }
                (None, BackgroundFallback::Constant) => DEFAULT_BACKGROUND.to_owned(),
                (None, BackgroundFallback::FirstColor) => first.clone(),
            };
            debug!(colors = colors.len(), %background, "resolved explicit palette");

            Ok(ResolvedPalette {
                colors: colors.clone(),
                background,
            })
        }
    }
}

/// Look up a catalog theme by key.
pub fn get_palette(name: &str) -> Option<&'static PaletteDefinition> {
    PALETTES.iter().find(|p| p.name == name)
}

/// All theme keys in catalog order.
pub fn palette_names() -> Vec<&'static str> {
    PALETTES.iter().map(|p| p.name).collect()
}

/// All themes in catalog order.
pub fn all_palettes() -> &'static [PaletteDefinition] {
    PALETTES
}

pub static PALETTES: &[PaletteDefinition] = &[
    PaletteDefinition {
        name: "catppuccinMocha",
        display_name: "Catppuccin Mocha",
        colors: [
            "#f38ba8", "#fab387", "#f9e2af", "#a6e3a1", "#89dceb", "#cba6f7", "#f5c2e7",
        ],
        background: "#1e1e2e",
        accent: Some("#cdd6f4"),
    },
    PaletteDefinition {
        name: "catppuccinLatte",
        display_name: "Catppuccin Latte",
        colors: [
            "#d20f39", "#fe640b", "#df8e1d", "#40a02b", "#04a5e5", "#8839ef", "#ea76cb",
        ],
        background: "#eff1f5",
        accent: Some("#4c4f69"),
    },
    PaletteDefinition {
        name: "catppuccinFrappe",
        display_name: "Catppuccin Frappé",
        colors: [
            "#e78284", "#ef9f76", "#e5c890", "#a6d189", "#85c1dc", "#ca9ee6", "#f4b8e4",
        ],
        background: "#303446",
        accent: Some("#c6d0f5"),
    },
    PaletteDefinition {
        name: "catppuccinMacchiato",
        display_name: "Catppuccin Macchiato",
        colors: [
            "#ed8796", "#f5a97f", "#eed49f", "#a6da95", "#7dc4e4", "#c6a0f6", "#f5bde6",
        ],
        background: "#24273a",
        accent: Some("#cad3f5"),
    },
    PaletteDefinition {
        name: "dracula",
        display_name: "Dracula",
        colors: [
            "#ff5555", "#ffb86c", "#f1fa8c", "#50fa7b", "#8be9fd", "#bd93f9", "#ff79c6",
        ],
        background: "#282a36",
        accent: Some("#f8f8f2"),
    },
    PaletteDefinition {
        name: "draculaPro",
        display_name: "Dracula Pro",
        colors: [
            "#ff9580", "#ffca80", "#ffff80", "#8aff80", "#80ffea", "#9580ff", "#ff80bf",
        ],
        background: "#22212c",
        accent: Some("#f8f8f2"),
    },
    PaletteDefinition {
        name: "nord",
        display_name: "Nord",
        colors: [
            "#bf616a", "#d08770", "#ebcb8b", "#a3be8c", "#88c0d0", "#b48ead", "#81a1c1",
        ],
        background: "#2e3440",
        accent: Some("#eceff4"),
    },
    PaletteDefinition {
        name: "gruvboxDark",
        display_name: "Gruvbox Dark",
        colors: [
            "#cc241d", "#d65d0e", "#d79921", "#98971a", "#689d6a", "#458588", "#b16286",
        ],
        background: "#282828",
        accent: Some("#ebdbb2"),
    },
    PaletteDefinition {
        name: "gruvboxLight",
        display_name: "Gruvbox Light",
        colors: [
            "#9d0006", "#af3a03", "#b57614", "#79740e", "#427b58", "#076678", "#8f3f71",
        ],
        background: "#fbf1c7",
        accent: Some("#3c3836"),
    },
    PaletteDefinition {
        name: "tokyoNight",
        display_name: "Tokyo Night",
        colors: [
            "#f7768e", "#ff9e64", "#e0af68", "#9ece6a", "#73daca", "#7aa2f7", "#bb9af7",
        ],
        background: "#1a1b26",
        accent: Some("#c0caf5"),
    },
    PaletteDefinition {
        name: "oneDark",
        display_name: "One Dark",
        colors: [
            "#e06c75", "#d19a66", "#e5c07b", "#98c379", "#56b6c2", "#61afef", "#c678dd",
        ],
        background: "#282c34",
        accent: Some("#abb2bf"),
    },
    PaletteDefinition {
        name: "solarizedDark",
        display_name: "Solarized Dark",
        colors: [
            "#dc322f", "#cb4b16", "#b58900", "#859900", "#2aa198", "#268bd2", "#d33682",
        ],
        background: "#002b36",
        accent: Some("#839496"),
    },
    PaletteDefinition {
        name: "solarizedLight",
        display_name: "Solarized Light",
        colors: [
            "#dc322f", "#cb4b16", "#b58900", "#859900", "#2aa198", "#268bd2", "#d33682",
        ],
        background: "#fdf6e3",
        accent: Some("#657b83"),
    },
    PaletteDefinition {
        name: "rosePine",
        display_name: "Rosé Pine",
        colors: [
            "#eb6f92", "#f6c177", "#ebbcba", "#9ccfd8", "#c4a7e7", "#31748f", "#e0def4",
        ],
        background: "#191724",
        accent: Some("#e0def4"),
    },
    PaletteDefinition {
        name: "rosePineMoon",
        display_name: "Rosé Pine Moon",
        colors: [
            "#eb6f92", "#f6c177", "#ea9a97", "#9ccfd8", "#c4a7e7", "#3e8fb0", "#e0def4",
        ],
        background: "#232136",
        accent: Some("#e0def4"),
    },
    PaletteDefinition {
        name: "rosePineDawn",
        display_name: "Rosé Pine Dawn",
        colors: [
            "#b4637a", "#ea9d34", "#d7827e", "#56949f", "#907aa9", "#286983", "#575279",
        ],
        background: "#faf4ed",
        accent: Some("#575279"),
    },
    PaletteDefinition {
        name: "sunset",
        display_name: "Sunset",
        colors: [
            "#ff6b35", "#f7931e", "#fdc830", "#37cfdc", "#4e9fe5", "#b8d4e3", "#ffffff",
        ],
        background: "#ff8c42",
        accent: Some("#ffffff"),
    },
    PaletteDefinition {
        name: "ocean",
        display_name: "Ocean",
        colors: [
            "#667eea", "#764ba2", "#f093fb", "#4facfe", "#00f2fe", "#43e97b", "#38f9d7",
        ],
        background: "#0a1628",
        accent: Some("#ffffff"),
    },
    PaletteDefinition {
        name: "forest",
        display_name: "Forest",
        colors: [
            "#2d5a27", "#4a7c47", "#6b9f68", "#8bc389", "#a8d8a8", "#c5ebc5", "#e2f5e2",
        ],
        background: "#1a2f1a",
        accent: Some("#e2f5e2"),
    },
    PaletteDefinition {
        name: "candy",
        display_name: "Candy",
        colors: [
            "#ff6b9d", "#ff85a1", "#ff9fb4", "#ffb8c6", "#ffd1d9", "#ffeaec", "#fff5f7",
        ],
        background: "#ffeef8",
        accent: Some("#ff6b9d"),
    },
    PaletteDefinition {
        name: "midnight",
        display_name: "Midnight",
        colors: [
            "#1a1a3e", "#2d2d5a", "#404077", "#535394", "#6666b1", "#7979ce", "#8c8ceb",
        ],
        background: "#0d0d1a",
        accent: Some("#8c8ceb"),
    },];
