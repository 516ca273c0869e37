//! Palette extraction from images.
//!
//! Pixels are sampled evenly, filtered, bucketed and merged into distinct
//! colors, then split into shape colors (vibrant) and a background (the
//! darkest neutral). Failures are recoverable: callers keep whatever palette
//! they had.
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::{ImageReader, RgbaImage};
use thiserror::Error;
use tracing::debug;
use wallgen::prelude::Rgb;

/// Maximum number of pixels sampled from an image.
pub const SAMPLE_PIXELS: u64 = 50_000;
/// Background used when no colors survive filtering.
pub const FALLBACK_BACKGROUND: &str = "#212121";

const MAX_SHAPE_COLORS: usize = 8;
const FALLBACK_SHAPE_COLORS: usize = 5;

const RGB_DISTANCE: f64 = 0.25;
const HUE_DISTANCE: f64 = 1.0 / 12.0;
const SATURATION_DISTANCE: f64 = 0.15;
const LIGHTNESS_DISTANCE: f64 = 0.2;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Please select an image file: {}", .0.display())]
    NotAnImage(PathBuf),

    #[error("Could not extract colors from this image")]
    NoColors,

    #[error("Not enough distinct colors found in image")]
    NotEnoughColors,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Shape colors and a background taken from an image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedPalette {
    pub colors: Vec<String>,
    pub background_color: String,
}

/// A merged color with its share of the sampled pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedColor {
    pub hex: String,
    /// Fraction of accepted samples, `0..=1`.
    pub area: f64,
    /// Degrees, `0` for grays.
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
    /// HSL chroma, `0..=1`.
    pub intensity: f64,
}

impl ExtractedColor {
    fn from_rgb(rgb: Rgb, area: f64) -> Self {
        let hsl = rgb.to_hsl();
        Self {
            hex: rgb.to_hex(),
            area,
            hue: hsl.h.unwrap_or(0.0),
            saturation: hsl.s,
            lightness: hsl.l,
            intensity: hsl.s * (1.0 - (2.0 * hsl.l - 1.0).abs()),
        }
    }
}

/// Decode the image at `path` and extract a palette from it.
pub fn extract_from_file(path: &Path) -> Result<ExtractedPalette, ExtractError> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    if reader.format().is_none() {
        return Err(ExtractError::NotAnImage(path.to_path_buf()));
    }
    let image = reader.decode()?.to_rgba8();
    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "extracting palette"
    );
    extract_from_image(&image)
}

/// Extract a palette from decoded pixels.
pub fn extract_from_image(image: &RgbaImage) -> Result<ExtractedPalette, ExtractError> {
    let colors = extract_colors(image);
    if colors.is_empty() {
        return Err(ExtractError::NoColors);
    }
    let palette = select_palette(&colors);
    if palette.colors.len() < 2 {
        return Err(ExtractError::NotEnoughColors);
    }
    Ok(palette)
}

/// Accepts opaque pixels whose mean channel is neither near black nor near white.
fn accept_pixel([r, g, b, a]: [u8; 4]) -> bool {
    let mean = (u32::from(r) + u32::from(g) + u32::from(b)) as f64 / 3.0;
    a > 250 && mean > 20.0 && mean < 240.0
}

#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    sum: [f64; 3],
    count: u64,
}

impl Bucket {
    fn add(&mut self, rgb: [f64; 3], count: u64) {
        for (s, c) in self.sum.iter_mut().zip(rgb) {
            *s += c * count as f64;
        }
        self.count += count;
    }

    fn mean(&self) -> Rgb {
        let n = self.count.max(1) as f64;
        Rgb::new(self.sum[0] / n, self.sum[1] / n, self.sum[2] / n)
    }
}

/// Distinct colors of `image`, largest area first.
pub fn extract_colors(image: &RgbaImage) -> Vec<ExtractedColor> {
    let (width, height) = image.dimensions();
    let total = u64::from(width) * u64::from(height);
    if total == 0 {
        return Vec::new();
    }
    let step = total.div_ceil(SAMPLE_PIXELS).max(1);

    let mut buckets: HashMap<[u8; 3], Bucket> = HashMap::new();
    let mut accepted = 0_u64;
    for index in (0..total).step_by(step as usize) {
        let x = (index % u64::from(width)) as u32;
        let y = (index / u64::from(width)) as u32;
        let px = image.get_pixel(x, y).0;
        if !accept_pixel(px) {
            continue;
        }
        accepted += 1;
        let key = [px[0] >> 4, px[1] >> 4, px[2] >> 4];
        buckets
            .entry(key)
            .or_default()
            .add([f64::from(px[0]), f64::from(px[1]), f64::from(px[2])], 1);
    }
    if accepted == 0 {
        return Vec::new();
    }

    let mut buckets: Vec<Bucket> = buckets.into_values().collect();
    buckets.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.sum.partial_cmp(&b.sum).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut clusters: Vec<Bucket> = Vec::new();
    for bucket in buckets {
        let color = bucket.mean();
        match clusters.iter_mut().find(|c| similar(c.mean(), color)) {
            Some(cluster) => cluster.add([color.r, color.g, color.b], bucket.count),
            None => clusters.push(bucket),
        }
    }
    clusters.sort_by(|a, b| b.count.cmp(&a.count));

    debug!(
        sampled = accepted,
        distinct = clusters.len(),
        "clustered image colors"
    );
    clusters
        .iter()
        .map(|c| ExtractedColor::from_rgb(c.mean(), c.count as f64 / accepted as f64))
        .collect()
}

fn similar(a: Rgb, b: Rgb) -> bool {
    let rgb_distance = ((a.r - b.r).powi(2) + (a.g - b.g).powi(2) + (a.b - b.b).powi(2)).sqrt()
        / (255.0 * 3f64.sqrt());
    if rgb_distance < RGB_DISTANCE {
        return true;
    }

    let (ha, hb) = (a.to_hsl(), b.to_hsl());
    let hue_delta = match (ha.h, hb.h) {
        (Some(x), Some(y)) => {
            let d = (x - y).abs() / 360.0;
            d.min(1.0 - d)
        }
        _ => 0.0,
    };
    hue_delta < HUE_DISTANCE
        && (ha.s - hb.s).abs() < SATURATION_DISTANCE
        && (ha.l - hb.l).abs() < LIGHTNESS_DISTANCE
}

/// Split distinct colors into shape colors and a background.
///
/// Vibrant colors (saturation above 0.25, lightness within (0.15, 0.85)) are
/// ranked by saturation times intensity. The background is the darkest color
/// with saturation under 0.3, else the darkest color overall. Up to eight
/// vibrant colors become shape colors; with fewer than two, the first five
/// non-background colors are used instead.
pub fn select_palette(colors: &[ExtractedColor]) -> ExtractedPalette {
    let by_lightness = |a: &&ExtractedColor, b: &&ExtractedColor| a.lightness.total_cmp(&b.lightness);

    let mut vibrant: Vec<&ExtractedColor> = colors
        .iter()
        .filter(|c| c.saturation > 0.25 && c.lightness > 0.15 && c.lightness < 0.85)
        .collect();
    vibrant.sort_by(|a, b| (b.saturation * b.intensity).total_cmp(&(a.saturation * a.intensity)));

    let background = colors
        .iter()
        .filter(|c| c.saturation < 0.3)
        .min_by(by_lightness)
        .or_else(|| colors.iter().min_by(by_lightness))
        .map_or_else(|| FALLBACK_BACKGROUND.to_owned(), |c| c.hex.clone());

    let not_background = |c: &&ExtractedColor| !c.hex.eq_ignore_ascii_case(&background);
    let shape_colors: Vec<String> = vibrant
        .into_iter()
        .filter(not_background)
        .take(MAX_SHAPE_COLORS)
        .map(|c| c.hex.clone())
        .collect();

    let colors = if shape_colors.len() >= 2 {
        shape_colors
    } else {
        colors
            .iter()
            .filter(not_background)
            .take(FALLBACK_SHAPE_COLORS)
            .map(|c| c.hex.clone())
            .collect()
    };

    ExtractedPalette {
        colors,
        background_color: background,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn color(hex: &str) -> ExtractedColor {
        ExtractedColor::from_rgb(Rgb::from_hex(hex).unwrap(), 0.1)
    }

    fn stripes(colors: &[[u8; 4]], stripe: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(stripe * colors.len() as u32, height, |x, _| {
            Rgba(colors[(x / stripe) as usize])
        })
    }

    #[test]
    fn validator_rejects_transparent_and_extreme_pixels() {
        assert!(accept_pixel([100, 50, 200, 255]));
        assert!(!accept_pixel([100, 50, 200, 250]));
        assert!(!accept_pixel([10, 10, 10, 255]));
        assert!(!accept_pixel([250, 250, 240, 255]));
    }

    #[test]
    fn background_is_darkest_neutral() {
        let palette = select_palette(&[
            color("#ff0000"),
            color("#555555"),
            color("#2b2b2b"),
            color("#00ff00"),
            color("#0000ff"),
        ]);
        assert_eq!(palette.background_color, "#2b2b2b");
        assert_eq!(palette.colors.len(), 3);
        assert!(!palette.colors.contains(&"#2b2b2b".to_string()));
    }

    #[test]
    fn background_falls_back_to_darkest_color() {
        let palette = select_palette(&[color("#ff4444"), color("#660000"), color("#44ff44")]);
        assert_eq!(palette.background_color, "#660000");
        assert_eq!(palette.colors, vec!["#ff4444", "#44ff44"]);
    }

    #[test]
    fn vibrant_colors_are_ranked_and_capped() {
        let hexes = [
            "#ff0000", "#ff8000", "#ffff00", "#80ff00", "#00ff00", "#00ff80", "#00ffff", "#0080ff",
            "#0000ff", "#8000ff",
        ];
        let mut colors: Vec<_> = hexes.iter().map(|h| color(h)).collect();
        colors.push(color("#9f6060"));
        colors.push(color("#202020"));
        let palette = select_palette(&colors);
        assert_eq!(palette.colors.len(), 8);
        assert!(!palette.colors.contains(&"#9f6060".to_string()));
        assert_eq!(palette.background_color, "#202020");
    }

    #[test]
    fn dull_images_use_first_non_background_colors() {
        let palette = select_palette(&[
            color("#808080"),
            color("#404040"),
            color("#a0a0a0"),
            color("#c0a0a0"),
        ]);
        assert_eq!(palette.background_color, "#404040");
        assert_eq!(palette.colors, vec!["#808080", "#a0a0a0", "#c0a0a0"]);
    }

    #[test]
    fn no_colors_falls_back_to_default_background() {
        let palette = select_palette(&[]);
        assert_eq!(palette.background_color, FALLBACK_BACKGROUND);
        assert!(palette.colors.is_empty());
    }

    #[test]
    fn extracts_stripes_of_distinct_colors() {
        let image = stripes(
            &[
                [200, 40, 40, 255],
                [40, 180, 60, 255],
                [50, 70, 210, 255],
                [40, 40, 40, 255],
            ],
            10,
            10,
        );
        let palette = extract_from_image(&image).unwrap();
        assert_eq!(palette.background_color, "#282828");
        let mut colors = palette.colors.clone();
        colors.sort();
        assert_eq!(colors, vec!["#28b43c", "#3246d2", "#c82828"]);
    }

    #[test]
    fn near_duplicates_are_merged() {
        let image = stripes(&[[200, 40, 40, 255], [205, 45, 40, 255]], 5, 2);
        let colors = extract_colors(&image);
        assert_eq!(colors.len(), 1);
        assert!((colors[0].area - 1.0).abs() < 1e-12);
    }

    #[test]
    fn blank_image_yields_no_colors() {
        let image = stripes(&[[255, 255, 255, 255], [0, 0, 0, 255]], 4, 4);
        assert!(matches!(
            extract_from_image(&image),
            Err(ExtractError::NoColors)
        ));
    }

    #[test]
    fn single_color_image_is_not_enough() {
        let image = stripes(&[[120, 30, 200, 255]], 8, 8);
        assert!(matches!(
            extract_from_image(&image),
            Err(ExtractError::NotEnoughColors)
        ));
    }
}
