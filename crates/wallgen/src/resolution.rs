//! Output resolution presets.
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Pixel dimensions and a human label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
    pub label: &'static str,
}

/// Named output sizes. Keys are part of share links and saved settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResolutionPreset {
    #[cfg_attr(feature = "serde", serde(rename = "hd"))]
    Hd,
    #[cfg_attr(feature = "serde", serde(rename = "fhd"))]
    Fhd,
    #[cfg_attr(feature = "serde", serde(rename = "qhd"))]
    Qhd,
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "4k"))]
    FourK,
    #[cfg_attr(feature = "serde", serde(rename = "ultrawide"))]
    Ultrawide,
    #[cfg_attr(feature = "serde", serde(rename = "mobile"))]
    Mobile,
}

impl ResolutionPreset {
    pub const ALL: [ResolutionPreset; 6] = [
        Self::Hd,
        Self::Fhd,
        Self::Qhd,
        Self::FourK,
        Self::Ultrawide,
        Self::Mobile,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Hd => "hd",
            Self::Fhd => "fhd",
            Self::Qhd => "qhd",
            Self::FourK => "4k",
            Self::Ultrawide => "ultrawide",
            Self::Mobile => "mobile",
        }
    }

    pub const fn resolution(self) -> Resolution {
        let (width, height, label) = match self {
            Self::Hd => (1280, 720, "HD (1280x720)"),
            Self::Fhd => (1920, 1080, "Full HD (1920x1080)"),
            Self::Qhd => (2560, 1440, "QHD (2560x1440)"),
            Self::FourK => (3840, 2160, "4K (3840x2160)"),
            Self::Ultrawide => (3440, 1440, "Ultrawide (3440x1440)"),
            Self::Mobile => (1080, 1920, "Mobile (1080x1920)"),
        };
        Resolution {
            width,
            height,
            label,
        }
    }

    /// `(width, height)` in pixels.
    pub const fn dimensions(self) -> (u32, u32) {
        let r = self.resolution();
        (r.width, r.height)
    }

    fn available() -> String {
        Self::ALL
            .iter()
            .map(|p| p.key())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for ResolutionPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.key() == s)
            .ok_or_else(|| Error::UnknownResolution {
                key: s.to_owned(),
                available: Self::available(),
            })
    }
}

impl fmt::Display for ResolutionPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
