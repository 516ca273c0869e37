//! Shape layout: from [`GeneratorOptions`] to a [`WallpaperConfig`].
//!
//! Two placement policies are available through [`LayoutPolicy`]:
//!
//! - [`LayoutPolicy::Overlap`] (default): equal pills stepped horizontally by
//!   `width * (1 - overlap)`, the group centered on the canvas. Explicit color
//!   lists with two or more colors are sampled as an LCh gradient across the
//!   row; otherwise colors come from one shuffle of the palette. Painted back to
//!   front, so shape 0 ends up on top.
//! - [`LayoutPolicy::RandomSize`]: each pill samples its own size from the
//!   given ranges and pills are packed left to right with a fixed gap. The
//!   group is centered using the average width, so the real span can drift
//!   slightly off center. Painted front to back.
//!
//! All positions and sizes are fractions of the canvas. Nothing is clamped:
//! wide groups may extend past the canvas edges.
use tracing::{debug, warn};

use crate::color::Gradient;
use crate::error::{Error, Result};
use crate::palette::{resolve_palette_with, BackgroundFallback, PaletteSpec};
use crate::random::{random_range, shuffle, SeededRandom};

pub const DEFAULT_SHAPE_COUNT: usize = 7;
pub const DEFAULT_SHAPE_WIDTH_RATIO: f64 = 0.12;
pub const DEFAULT_SHAPE_HEIGHT_RATIO: f64 = 0.75;
pub const DEFAULT_OVERLAP_RATIO: f64 = 0.35;
pub const DEFAULT_SHAPE_WIDTH_RANGE: (f64, f64) = (0.06, 0.14);
pub const DEFAULT_SHAPE_HEIGHT_RANGE: (f64, f64) = (0.45, 0.85);
pub const DEFAULT_SPACING: f64 = 0.02;

/// How shapes are sized and placed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "policy", rename_all = "camelCase", rename_all_fields = "camelCase")
)]
pub enum LayoutPolicy {
    /// Equal shapes overlapping by a fraction of their width.
    Overlap {
        shape_width_ratio: f64,
        shape_height_ratio: f64,
        overlap_ratio: f64,
    },
    /// Per-shape random sizes with a fixed gap between neighbours.
    RandomSize {
        shape_width_range: (f64, f64),
        shape_height_range: (f64, f64),
        spacing: f64,
    },
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self::Overlap {
            shape_width_ratio: DEFAULT_SHAPE_WIDTH_RATIO,
            shape_height_ratio: DEFAULT_SHAPE_HEIGHT_RATIO,
            overlap_ratio: DEFAULT_OVERLAP_RATIO,
        }
    }
}

impl LayoutPolicy {
    pub fn overlap(shape_width_ratio: f64, shape_height_ratio: f64, overlap_ratio: f64) -> Self {
        Self::Overlap {
            shape_width_ratio,
            shape_height_ratio,
            overlap_ratio,
        }
    }

    pub fn random_size(
        shape_width_range: (f64, f64),
        shape_height_range: (f64, f64),
        spacing: f64,
    ) -> Self {
        Self::RandomSize {
            shape_width_range,
            shape_height_range,
            spacing,
        }
    }

    /// [`LayoutPolicy::RandomSize`] with the default ranges and spacing.
    pub fn default_random_size() -> Self {
        Self::random_size(
            DEFAULT_SHAPE_WIDTH_RANGE,
            DEFAULT_SHAPE_HEIGHT_RANGE,
            DEFAULT_SPACING,
        )
    }

    fn validate(&self) -> Result<()> {
        match *self {
            Self::Overlap {
                shape_width_ratio,
                shape_height_ratio,
                overlap_ratio,
            } => {
                check_fraction("shape_width_ratio", shape_width_ratio)?;
                check_fraction("shape_height_ratio", shape_height_ratio)?;
                check_fraction("overlap_ratio", overlap_ratio)
            }
            Self::RandomSize {
                shape_width_range,
                shape_height_range,
                spacing,
            } => {
                check_range("shape_width_range", shape_width_range)?;
                check_range("shape_height_range", shape_height_range)?;
                check_fraction("spacing", spacing)
            }
        }
    }
}

fn check_fraction(name: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(Error::InvalidConfig(format!(
            "{name} must be within [0, 1], got {value}"
        )));
    }
    Ok(())
}

fn check_range(name: &str, (min, max): (f64, f64)) -> Result<()> {
    check_fraction(name, min)?;
    check_fraction(name, max)?;
    if min > max {
        return Err(Error::InvalidConfig(format!(
            "{name} min must not exceed max, got ({min}, {max})"
        )));
    }
    Ok(())
}

/// Input of a layout run.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct GeneratorOptions {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    pub palette: PaletteSpec,
    pub shape_count: usize,
    /// `None` picks a fresh seed per run; the chosen seed is echoed in the
    /// resulting config.
    pub seed: Option<u64>,
    pub layout: LayoutPolicy,
    /// Background override, honored only for explicit color lists.
    pub background_color: Option<String>,
}

impl GeneratorOptions {
    /// Options with the default shape count and overlap layout.
    pub fn new(width: u32, height: u32, palette: PaletteSpec) -> Self {
        Self {
            width,
            height,
            palette,
            shape_count: DEFAULT_SHAPE_COUNT,
            seed: None,
            layout: LayoutPolicy::default(),
            background_color: None,
        }
    }

    pub fn with_shape_count(mut self, shape_count: usize) -> Self {
        self.shape_count = shape_count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_layout(mut self, layout: LayoutPolicy) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    /// Validates the options, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidConfig(
                "width and height must be > 0".into(),
            ));
        }
        if self.shape_count == 0 {
            return Err(Error::InvalidConfig("shape_count must be > 0".into()));
        }
        self.layout.validate()
    }

    fn custom_background(&self) -> Option<&str> {
        self.background_color.as_deref().filter(|bg| !bg.is_empty())
    }
}

/// One laid-out shape. Position and size are fractions of the canvas.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ShapeConfig {
    pub width_ratio: f64,
    pub height_ratio: f64,
    pub x: f64,
    pub y: f64,
    /// Hex color.
    pub color: String,
    /// Corner radius in pixels, half the shorter rendered side.
    pub border_radius: f64,
}

/// Order in which the renderer paints [`WallpaperConfig::shapes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum PaintOrder {
    /// Index 0 first; later shapes cover earlier ones.
    Forward,
    /// Last index first; shape 0 ends up on top. Configs that do not record an
    /// order come from the overlap layout and use this.
    #[default]
    Reverse,
}

/// Output of a layout run and input of [`crate::render::render`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct WallpaperConfig {
    pub width: u32,
    pub height: u32,
    pub background_color: String,
    /// Colors the layout drew from.
    pub palette: Vec<String>,
    pub shapes: Vec<ShapeConfig>,
    /// Seed actually used, including auto-picked ones.
    pub seed: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub paint_order: PaintOrder,
}

impl WallpaperConfig {
    /// Shapes in the order they are painted.
    pub fn shapes_in_paint_order(&self) -> impl Iterator<Item = &ShapeConfig> + '_ {
        let count = self.shapes.len();
        let reverse = self.paint_order == PaintOrder::Reverse;
        (0..count).map(move |i| {
            let index = if reverse { count - 1 - i } else { i };
            &self.shapes[index]
        })
    }
}

/// Compute the layout for `options`.
///
/// Deterministic for a given seed. Palette errors propagate; no partial
/// layout is returned.
pub fn layout(options: &GeneratorOptions) -> Result<WallpaperConfig> {
    options.validate()?;
    let mut rng = SeededRandom::new(options.seed);
    debug!(
        seed = rng.seed(),
        shapes = options.shape_count,
        width = options.width,
        height = options.height,
        "laying out wallpaper"
    );

    match options.layout {
        LayoutPolicy::Overlap {
            shape_width_ratio,
            shape_height_ratio,
            overlap_ratio,
        } => layout_overlap(
            options,
            &mut rng,
            shape_width_ratio,
            shape_height_ratio,
            overlap_ratio,
        ),
        LayoutPolicy::RandomSize {
            shape_width_range,
            shape_height_range,
            spacing,
        } => layout_random_size(
            options,
            &mut rng,
            shape_width_range,
            shape_height_range,
            spacing,
        ),
    }
}

fn layout_overlap(
    options: &GeneratorOptions,
    rng: &mut SeededRandom,
    shape_width: f64,
    shape_height: f64,
    overlap: f64,
) -> Result<WallpaperConfig> {
    let palette = resolve_palette_with(
        &options.palette,
        options.custom_background(),
        BackgroundFallback::Constant,
    )?;

    let gradient = match &options.palette {
        PaletteSpec::Colors(colors) if colors.len() >= 2 => Some(Gradient::from_hex(colors)?),
        _ => None,
    };
    let shuffled = match gradient {
        Some(_) => Vec::new(),
        None => shuffle(rng, &palette.colors),
    };

    let count = options.shape_count;
    let step = shape_width * (1.0 - overlap);
    let total_width = shape_width + (count - 1) as f64 * step;
    let start_x = (1.0 - total_width) / 2.0;
    let y = (1.0 - shape_height) / 2.0;
    if total_width > 1.0 {
        warn!(
            total_width,
            "shape group is wider than the canvas; outer shapes will be cut off"
        );
    }

    let border_radius = pill_radius(options, shape_width, shape_height);
    let shapes = (0..count)
        .map(|i| {
            let color = match &gradient {
                Some(gradient) => {
                    let t = if count > 1 {
                        i as f64 / (count - 1) as f64
                    } else {
                        0.5
                    };
                    gradient.at(t).to_hex()
                }
                None => shuffled[i % shuffled.len()].clone(),
            };
            ShapeConfig {
                width_ratio: shape_width,
                height_ratio: shape_height,
                x: start_x + i as f64 * step,
                y,
                color,
                border_radius,
            }
        })
        .collect();

    Ok(WallpaperConfig {
        width: options.width,
        height: options.height,
        background_color: palette.background,
        palette: palette.colors,
        shapes,
        seed: rng.seed(),
        paint_order: PaintOrder::Reverse,
    })
}

fn layout_random_size(
    options: &GeneratorOptions,
    rng: &mut SeededRandom,
    (min_width, max_width): (f64, f64),
    (min_height, max_height): (f64, f64),
    spacing: f64,
) -> Result<WallpaperConfig> {
    let palette = resolve_palette_with(
        &options.palette,
        options.custom_background(),
        BackgroundFallback::FirstColor,
    )?;
    let shuffled = shuffle(rng, &palette.colors);

    let count = options.shape_count;
    let average_width = (min_width + max_width) / 2.0;
    let estimated_width = count as f64 * average_width + (count - 1) as f64 * spacing;
    let mut cursor = (1.0 - estimated_width) / 2.0;

    let mut shapes = Vec::with_capacity(count);
    for i in 0..count {
        let width = random_range(rng, min_width, max_width);
        let height = random_range(rng, min_height, max_height);
        shapes.push(ShapeConfig {
            width_ratio: width,
            height_ratio: height,
            x: cursor,
            y: (1.0 - height) / 2.0,
            color: shuffled[i % shuffled.len()].clone(),
            border_radius: pill_radius(options, width, height),
        });
        cursor += width + spacing;
    }
    debug!(
        estimated_width,
        actual_width = cursor - spacing - shapes[0].x,
        "packed random-size shapes"
    );

    Ok(WallpaperConfig {
        width: options.width,
        height: options.height,
        background_color: palette.background,
        palette: palette.colors,
        shapes,
        seed: rng.seed(),
        paint_order: PaintOrder::Forward,
    })
}

/// Half the shorter rendered side: a capsule, or a circle for square shapes.
#[inline]
fn pill_radius(options: &GeneratorOptions, width_ratio: f64, height_ratio: f64) -> f64 {
    let pixel_width = width_ratio * options.width as f64;
    let pixel_height = height_ratio * options.height as f64;
    pixel_width.min(pixel_height) / 2.0
}
