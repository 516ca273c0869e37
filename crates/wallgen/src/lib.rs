#![forbid(unsafe_code)]
//! wallgen: deterministic layout, palette and rendering engine for pill wallpapers.
//!
//! Modules:
//! - random: seeded Park–Miller generator and the helpers built on it
//! - color, derive: color parsing/conversion, LCh gradients, generated palettes
//! - palette: the named theme catalog and palette resolution
//! - layout: shape placement policies producing a [`layout::WallpaperConfig`]
//! - render: drawing-surface traits and the renderer that paints a config
//! - resolution, state: output presets and the flat share/settings state
//!
//! [`generate_wallpaper`] composes layout and rendering in one call.
pub mod color;
pub mod derive;
pub mod error;
pub mod layout;
pub mod palette;
pub mod random;
pub mod render;
pub mod resolution;
pub mod state;

use crate::error::Result;
use crate::layout::{GeneratorOptions, WallpaperConfig};
use crate::render::Surface;

/// Lay out a wallpaper for `options` and paint it onto `surface`.
///
/// The returned config carries the seed actually used, so an unseeded call
/// can still be reproduced afterwards.
pub fn generate_wallpaper<S: Surface + ?Sized>(
    surface: &mut S,
    options: &GeneratorOptions,
) -> Result<WallpaperConfig> {
    let config = layout::layout(options)?;
    render::render(surface, &config)?;
    Ok(config)
}

/// Convenient re-exports for common types. Import with `use wallgen::prelude::*;`.
pub mod prelude {
    pub use crate::color::{Gradient, Rgb};
    pub use crate::derive::{
        contrasting_background, generate_analogous_palette, generate_complementary_palette,
        generate_random_palette,
    };
    pub use crate::error::{Error, Result};
    pub use crate::generate_wallpaper;
    pub use crate::layout::{
        layout, GeneratorOptions, LayoutPolicy, PaintOrder, ShapeConfig, WallpaperConfig,
    };
    pub use crate::palette::{
        all_palettes, get_palette, palette_names, resolve_palette, resolve_palette_with,
        BackgroundFallback, PaletteDefinition, PaletteSpec, ResolvedPalette,
    };
    pub use crate::random::{pick_random, random_int, random_range, shuffle, SeededRandom};
    pub use crate::render::{render, DrawingContext, Surface};
    pub use crate::resolution::{Resolution, ResolutionPreset};
    pub use crate::state::{GeneratorMode, GeneratorState};
}
