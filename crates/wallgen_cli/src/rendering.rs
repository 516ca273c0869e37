use std::io::Cursor;
use std::path::Path;

use glam::DVec2;
use image::{ImageFormat, Rgba, RgbaImage};
use tracing::info;
use wallgen::prelude::{DrawingContext, Error, Result, Rgb, Surface};

#[derive(Debug, Clone, Copy)]
struct RoundedRect {
    center: DVec2,
    half_extent: DVec2,
    radius: f64,
}

impl RoundedRect {
    fn new(x: f64, y: f64, width: f64, height: f64, radius: f64) -> Self {
        let half_extent = DVec2::new(width.abs(), height.abs()) * 0.5;
        let origin = DVec2::new(x.min(x + width), y.min(y + height));
        Self {
            center: origin + half_extent,
            half_extent,
            radius: radius.clamp(0.0, half_extent.min_element()),
        }
    }

    /// Signed distance from `p` to the outline, negative inside.
    fn distance(&self, p: DVec2) -> f64 {
        let q = (p - self.center).abs() - self.half_extent + DVec2::splat(self.radius);
        q.max(DVec2::ZERO).length() + q.max_element().min(0.0) - self.radius
    }
}

/// Software RGBA surface for the wallpaper renderer.
///
/// Fills are anti-aliased with one signed-distance sample per pixel center and
/// composited source-over. A fresh or resized surface is fully transparent.
pub struct RasterSurface {
    pixels: RgbaImage,
    fill: Rgb,
    path: Vec<RoundedRect>,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            fill: Rgb::new(0.0, 0.0, 0.0),
            path: Vec::new(),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    /// RGBA at `(x, y)`, `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixels.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Encode as PNG and write to `path`.
    pub fn save_png(&self, path: &Path) -> anyhow::Result<()> {
        let bytes = self.encode_png()?;
        std::fs::write(path, bytes)?;
        info!(
            path = %path.display(),
            width = self.pixels.width(),
            height = self.pixels.height(),
            "saved wallpaper"
        );
        Ok(())
    }

    fn paint(&mut self, shape: RoundedRect) {
        let (width, height) = self.pixels.dimensions();
        let min = shape.center - shape.half_extent;
        let max = shape.center + shape.half_extent;
        let x0 = min.x.floor().clamp(0.0, f64::from(width)) as u32;
        let y0 = min.y.floor().clamp(0.0, f64::from(height)) as u32;
        let x1 = max.x.ceil().clamp(0.0, f64::from(width)) as u32;
        let y1 = max.y.ceil().clamp(0.0, f64::from(height)) as u32;

        let [r, g, b] = self.fill.to_u8();
        let source = [f64::from(r), f64::from(g), f64::from(b)];
        for y in y0..y1 {
            for x in x0..x1 {
                let center = DVec2::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                let coverage = (0.5 - shape.distance(center)).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    blend(self.pixels.get_pixel_mut(x, y), source, coverage);
                }
            }
        }
    }
}

/// Source-over with an opaque source at `coverage`.
fn blend(dst: &mut Rgba<u8>, source: [f64; 3], coverage: f64) {
    let dst_alpha = f64::from(dst.0[3]) / 255.0;
    let out_alpha = coverage + dst_alpha * (1.0 - coverage);
    for (channel, src) in dst.0.iter_mut().zip(source) {
        let value = (src * coverage + f64::from(*channel) * dst_alpha * (1.0 - coverage)) / out_alpha;
        *channel = value.round().clamp(0.0, 255.0) as u8;
    }
    dst.0[3] = (out_alpha * 255.0).round() as u8;
}

impl DrawingContext for RasterSurface {
    fn set_fill_color(&mut self, color: Rgb) {
        self.fill = color;
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.paint(RoundedRect::new(x, y, width, height, 0.0));
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn round_rect(&mut self, x: f64, y: f64, width: f64, height: f64, radius: f64) {
        self.path.push(RoundedRect::new(x, y, width, height, radius));
    }

    fn fill(&mut self) {
        let path = std::mem::take(&mut self.path);
        for shape in &path {
            self.paint(*shape);
        }
        self.path = path;
    }
}

impl Surface for RasterSurface {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.pixels = RgbaImage::new(width, height);
        self.path.clear();
    }

    fn context_2d(&mut self) -> Option<&mut dyn DrawingContext> {
        Some(self as &mut dyn DrawingContext)
    }

    fn encode_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Cursor::new(Vec::new());
        self.pixels
            .write_to(&mut bytes, ImageFormat::Png)
            .map_err(|e| Error::Surface(format!("png encoding failed: {e}")))?;
        Ok(bytes.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(width: u32, height: u32, color: &str) -> RasterSurface {
        let mut surface = RasterSurface::new(width, height);
        surface.set_fill_color(Rgb::from_hex(color).unwrap());
        surface.fill_rect(0.0, 0.0, f64::from(width), f64::from(height));
        surface
    }

    #[test]
    fn new_surface_is_transparent() {
        let surface = RasterSurface::new(4, 3);
        assert_eq!(surface.pixel(3, 2), Some([0, 0, 0, 0]));
        assert_eq!(surface.pixel(4, 0), None);
    }

    #[test]
    fn fill_rect_covers_whole_pixels() {
        let surface = filled(8, 8, "#282a36");
        assert_eq!(surface.pixel(0, 0), Some([0x28, 0x2a, 0x36, 255]));
        assert_eq!(surface.pixel(7, 7), Some([0x28, 0x2a, 0x36, 255]));
    }

    #[test]
    fn half_covered_edge_is_blended() {
        let mut surface = filled(10, 10, "#000000");
        surface.set_fill_color(Rgb::from_hex("#ffffff").unwrap());
        surface.begin_path();
        surface.round_rect(2.5, 0.0, 5.0, 10.0, 0.0);
        surface.fill();

        assert_eq!(surface.pixel(1, 5), Some([0, 0, 0, 255]));
        assert_eq!(surface.pixel(2, 5), Some([128, 128, 128, 255]));
        assert_eq!(surface.pixel(4, 5), Some([255, 255, 255, 255]));
    }

    #[test]
    fn rounded_corners_stay_background() {
        let mut surface = filled(20, 20, "#000000");
        surface.set_fill_color(Rgb::from_hex("#ff0000").unwrap());
        surface.begin_path();
        surface.round_rect(0.0, 0.0, 20.0, 20.0, 10.0);
        surface.fill();

        assert_eq!(surface.pixel(0, 0), Some([0, 0, 0, 255]));
        assert_eq!(surface.pixel(10, 10), Some([255, 0, 0, 255]));
        assert_eq!(surface.pixel(10, 1), Some([255, 0, 0, 255]));
    }

    #[test]
    fn begin_path_discards_pending_shapes() {
        let mut surface = filled(4, 4, "#000000");
        surface.set_fill_color(Rgb::from_hex("#ffffff").unwrap());
        surface.round_rect(0.0, 0.0, 4.0, 4.0, 0.0);
        surface.begin_path();
        surface.fill();
        assert_eq!(surface.pixel(1, 1), Some([0, 0, 0, 255]));
    }

    #[test]
    fn encodes_png() {
        let surface = filled(3, 2, "#50fa7b");
        let bytes = surface.encode_png().unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (3, 2));
        assert_eq!(decoded.get_pixel(2, 1).0, [0x50, 0xfa, 0x7b, 255]);
    }

    #[test]
    fn resize_clears_pixels() {
        let mut surface = filled(2, 2, "#ffffff");
        surface.resize(5, 1);
        assert_eq!((surface.width(), surface.height()), (5, 1));
        assert_eq!(surface.pixel(0, 0), Some([0, 0, 0, 0]));
    }
}
