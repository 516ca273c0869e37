//! Color parsing, conversion and perceptual gradients.
//!
//! Colors travel through the engine as hex strings (that is what configs and
//! share links carry); [`Rgb`] is the working form used whenever a color has to
//! be converted, interpolated or painted.
//!
//! Conversion pipeline:
//!
//!   hex ↔ sRGB ↔ HSL
//!   sRGB ↔ linear sRGB ↔ XYZ (D65) ↔ CIE Lab ↔ LCh
//!
//! Gradients interpolate in LCh so midpoints between saturated stops stay
//! saturated instead of passing through gray.
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

// D65 reference white and the Lab companding constants.
const XN: f64 = 0.950_470;
const YN: f64 = 1.0;
const ZN: f64 = 1.088_830;
const T0: f64 = 4.0 / 29.0;
const T1: f64 = 6.0 / 29.0;
const T2: f64 = 3.0 * T1 * T1;
const T3: f64 = T1 * T1 * T1;

/// sRGB color with channels in `0..=255`.
///
/// Channels are kept as unclamped floats so chained conversions do not
/// accumulate rounding; clamping and rounding happen in [`Rgb::to_hex`] and
/// [`Rgb::to_u8`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Cylindrical Lab coordinates. `h` is `None` for achromatic colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lch {
    pub l: f64,
    pub c: f64,
    pub h: Option<f64>,
}

/// HSL coordinates with `s` and `l` in `[0, 1]`. `h` is `None` for grays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: Option<f64>,
    pub s: f64,
    pub l: f64,
}

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(input: &str) -> Result<Self> {
        let invalid = || Error::InvalidColor(input.to_owned());
        let digits = input.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_owned(),
            _ => return Err(invalid()),
        };

        let channel = |i: usize| {
            u8::from_str_radix(&expanded[i..i + 2], 16)
                .map(f64::from)
                .map_err(|_| invalid())
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Lower-case `#rrggbb`, channels rounded and clamped.
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_u8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    pub fn to_u8(&self) -> [u8; 3] {
        let q = |v: f64| v.clamp(0.0, 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Build from HSL with `h` in degrees (any value; wrapped once into
    /// `[0, 360)`), `s` and `l` in `[0, 1]`.
    pub fn from_hsl(h: f64, s: f64, l: f64) -> Self {
        if s == 0.0 {
            let v = l * 255.0;
            return Self::new(v, v, v);
        }

        let t2 = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let t1 = 2.0 * l - t2;
        let hue = h / 360.0;

        let channel = |offset: f64| {
            let mut t = hue + offset;
            if t < 0.0 {
                t += 1.0;
            }
            if t > 1.0 {
                t -= 1.0;
            }
            let v = if 6.0 * t < 1.0 {
                t1 + (t2 - t1) * 6.0 * t
            } else if 2.0 * t < 1.0 {
                t2
            } else if 3.0 * t < 2.0 {
                t1 + (t2 - t1) * (2.0 / 3.0 - t) * 6.0
            } else {
                t1
            };
            v * 255.0
        };

        Self::new(channel(1.0 / 3.0), channel(0.0), channel(-1.0 / 3.0))
    }

    pub fn to_hsl(&self) -> Hsl {
        let r = self.r.clamp(0.0, 255.0) / 255.0;
        let g = self.g.clamp(0.0, 255.0) / 255.0;
        let b = self.b.clamp(0.0, 255.0) / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if max == min {
            return Hsl { h: None, s: 0.0, l };
        }

        let delta = max - min;
        let s = if l < 0.5 {
            delta / (max + min)
        } else {
            delta / (2.0 - max - min)
        };

        let mut h = if r == max {
            (g - b) / delta
        } else if g == max {
            2.0 + (b - r) / delta
        } else {
            4.0 + (r - g) / delta
        };
        h *= 60.0;
        if h < 0.0 {
            h += 360.0;
        }

        Hsl { h: Some(h), s, l }
    }

    /// Same saturation and lightness, hue replaced.
    pub fn with_hue(&self, hue: f64) -> Self {
        let hsl = self.to_hsl();
        Self::from_hsl(hue, hsl.s, hsl.l)
    }

    /// Hue in degrees, `0` for grays.
    pub fn hue(&self) -> f64 {
        self.to_hsl().h.unwrap_or(0.0)
    }

    pub fn to_lab(&self) -> [f64; 3] {
        let r = srgb_to_linear(self.r / 255.0);
        let g = srgb_to_linear(self.g / 255.0);
        let b = srgb_to_linear(self.b / 255.0);

        let x = xyz_to_lab((0.412_456_4 * r + 0.357_576_1 * g + 0.180_437_5 * b) / XN);
        let y = xyz_to_lab((0.212_672_9 * r + 0.715_152_2 * g + 0.072_175_0 * b) / YN);
        let z = xyz_to_lab((0.019_333_9 * r + 0.119_192_0 * g + 0.950_304_1 * b) / ZN);

        let l = 116.0 * y - 16.0;
        [l.max(0.0), 500.0 * (x - y), 200.0 * (y - z)]
    }

    pub fn from_lab(l: f64, a: f64, b: f64) -> Self {
        let fy = (l + 16.0) / 116.0;
        let fx = fy + a / 500.0;
        let fz = fy - b / 200.0;

        let x = XN * lab_to_xyz(fx);
        let y = YN * lab_to_xyz(fy);
        let z = ZN * lab_to_xyz(fz);

        Self::new(
            linear_to_srgb(3.240_454_2 * x - 1.537_138_5 * y - 0.498_531_4 * z) * 255.0,
            linear_to_srgb(-0.969_266_0 * x + 1.876_010_8 * y + 0.041_556_0 * z) * 255.0,
            linear_to_srgb(0.055_643_4 * x - 0.204_025_9 * y + 1.057_225_2 * z) * 255.0,
        )
    }

    pub fn to_lch(&self) -> Lch {
        let [l, a, b] = self.to_lab();
        let c = a.hypot(b);
        let h = if (c * 10_000.0).round() == 0.0 {
            None
        } else {
            Some((b.atan2(a) * 180.0 / PI + 360.0) % 360.0)
        };
        Lch { l, c, h }
    }

    pub fn from_lch(lch: Lch) -> Self {
        let h = lch.h.unwrap_or(0.0) * PI / 180.0;
        Self::from_lab(lch.l, h.cos() * lch.c, h.sin() * lch.c)
    }

    /// WCAG relative luminance in `[0, 1]`.
    pub fn luminance(&self) -> f64 {
        let channel = |v: f64| {
            let v = v.clamp(0.0, 255.0) / 255.0;
            if v <= 0.039_28 {
                v / 12.92
            } else {
                ((v + 0.055) / 1.055).powf(2.4)
            }
        };
        0.2126 * channel(self.r) + 0.7152 * channel(self.g) + 0.0722 * channel(self.b)
    }
}

impl FromStr for Rgb {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[inline]
fn srgb_to_linear(v: f64) -> f64 {
    if v <= 0.040_45 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
fn linear_to_srgb(v: f64) -> f64 {
    if v <= 0.003_04 {
        12.92 * v
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}

#[inline]
fn xyz_to_lab(t: f64) -> f64 {
    if t > T3 {
        t.cbrt()
    } else {
        t / T2 + T0
    }
}

#[inline]
fn lab_to_xyz(t: f64) -> f64 {
    if t > T1 {
        t * t * t
    } else {
        T2 * (t - T0)
    }
}

/// Interpolate two colors in LCh, taking the short way around the hue circle.
///
/// When only one end has a hue (the other is gray, black or white) that hue is
/// kept, so fading into white does not sweep through unrelated hues. Chroma
/// still interpolates linearly, except towards pure black (`L = 0`), where the
/// chromatic end's chroma is held.
pub fn mix_lch(from: Rgb, to: Rgb, t: f64) -> Rgb {
    let a = from.to_lch();
    let b = to.to_lch();
    let mut chroma = None;

    let hue = match (a.h, b.h) {
        (Some(h0), Some(h1)) => {
            let dh = if h1 > h0 && h1 - h0 > 180.0 {
                h1 - (h0 + 360.0)
            } else if h1 < h0 && h0 - h1 > 180.0 {
                h1 + 360.0 - h0
            } else {
                h1 - h0
            };
            Some(h0 + t * dh)
        }
        (Some(h0), None) => {
            if is_black(b.l) {
                chroma = Some(a.c);
            }
            Some(h0)
        }
        (None, Some(h1)) => {
            if is_black(a.l) {
                chroma = Some(b.c);
            }
            Some(h1)
        }
        (None, None) => None,
    };

    Rgb::from_lch(Lch {
        l: a.l + t * (b.l - a.l),
        c: chroma.unwrap_or(a.c + t * (b.c - a.c)),
        h: hue,
    })
}

#[inline]
fn is_black(l: f64) -> bool {
    l <= 0.0
}

/// Evenly spaced color stops sampled in LCh.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    stops: Vec<Rgb>,
}

impl Gradient {
    /// Build a gradient from at least one stop.
    pub fn new(stops: Vec<Rgb>) -> Result<Self> {
        if stops.is_empty() {
            return Err(Error::EmptyPalette);
        }
        Ok(Self { stops })
    }

    /// Parse every hex string into a stop.
    pub fn from_hex<S: AsRef<str>>(colors: &[S]) -> Result<Self> {
        let stops = colors
            .iter()
            .map(|c| Rgb::from_hex(c.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Self::new(stops)
    }

    pub fn stops(&self) -> &[Rgb] {
        &self.stops
    }

    /// Color at `t`, clamped to `[0, 1]`.
    pub fn at(&self, t: f64) -> Rgb {
        let last = self.stops.len() - 1;
        if last == 0 || t <= 0.0 {
            return self.stops[0];
        }
        if t >= 1.0 {
            return self.stops[last];
        }

        let scaled = t * last as f64;
        let segment = (scaled.floor() as usize).min(last - 1);
        let local = scaled - segment as f64;
        if local == 0.0 {
            return self.stops[segment];
        }
        mix_lch(self.stops[segment], self.stops[segment + 1], local)
    }

    /// `count` hex colors spread over the whole gradient; a single sample is
    /// taken from the middle.
    pub fn colors(&self, count: usize) -> Vec<String> {
        match count {
            0 => Vec::new(),
            1 => vec![self.at(0.5).to_hex()],
            n => (0..n)
                .map(|i| self.at(i as f64 / (n - 1) as f64).to_hex())
                .collect(),
        }
    }
}
