//! Painting a [`WallpaperConfig`] onto a caller-owned drawing surface.
//!
//! The engine never creates surfaces. Hosts implement [`Surface`] (backing
//! size, PNG export) and [`DrawingContext`] (solid fills and rounded-rect
//! paths) for whatever pixel store they have.
use tracing::debug;

use crate::color::Rgb;
use crate::error::{Error, Result};
use crate::layout::WallpaperConfig;

/// 2D drawing operations needed to paint a wallpaper.
pub trait DrawingContext {
    /// Color used by subsequent fills.
    fn set_fill_color(&mut self, color: Rgb);
    /// Fill an axis-aligned rectangle immediately.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    /// Discard the current path.
    fn begin_path(&mut self);
    /// Add a rounded rectangle to the current path.
    fn round_rect(&mut self, x: f64, y: f64, width: f64, height: f64, radius: f64);
    /// Fill the current path.
    fn fill(&mut self);
}

/// A drawing surface with a resizable backing store.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Set the backing dimensions. May clear previous content.
    fn resize(&mut self, width: u32, height: u32);
    /// The 2D context, or `None` if this surface cannot draw.
    fn context_2d(&mut self) -> Option<&mut dyn DrawingContext>;
    /// Encode the current pixels as PNG.
    fn encode_png(&self) -> Result<Vec<u8>>;
}

struct PaintOp {
    color: Rgb,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    radius: f64,
}

/// Paint `config` onto `surface`.
///
/// Resets the surface to the config dimensions, fills the background, then
/// fills every shape as a rounded rectangle in the config's paint order.
/// Colors are parsed before the surface is touched, so a bad color leaves
/// it unchanged.
pub fn render<S: Surface + ?Sized>(surface: &mut S, config: &WallpaperConfig) -> Result<()> {
    if surface.context_2d().is_none() {
        return Err(Error::Surface(
            "could not get a 2d context from the surface".into(),
        ));
    }

    let width = f64::from(config.width);
    let height = f64::from(config.height);
    let background = Rgb::from_hex(&config.background_color)?;
    let ops = config
        .shapes_in_paint_order()
        .map(|shape| {
            Ok(PaintOp {
                color: Rgb::from_hex(&shape.color)?,
                x: shape.x * width,
                y: shape.y * height,
                width: shape.width_ratio * width,
                height: shape.height_ratio * height,
                radius: shape.border_radius,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    surface.resize(config.width, config.height);
    let ctx = surface
        .context_2d()
        .ok_or_else(|| Error::Surface("2d context lost after resize".into()))?;

    ctx.set_fill_color(background);
    ctx.fill_rect(0.0, 0.0, width, height);

    for op in &ops {
        ctx.set_fill_color(op.color);
        ctx.begin_path();
        ctx.round_rect(op.x, op.y, op.width, op.height, op.radius);
        ctx.fill();
    }

    debug!(
        width = config.width,
        height = config.height,
        shapes = ops.len(),
        "rendered wallpaper"
    );
    Ok(())
}
