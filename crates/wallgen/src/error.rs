//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! configuration lookups that failed (palettes, resolution presets), malformed
//! colors, invalid layout parameters and drawing surfaces that cannot be used.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown palette: {name}. Available: {available}")]
    UnknownPalette { name: String, available: String },

    #[error("unknown resolution preset: {key}. Available: {available}")]
    UnknownResolution { key: String, available: String },

    #[error("palette must contain at least one color")]
    EmptyPalette,

    #[error("invalid color '{0}'")]
    InvalidColor(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("surface error: {0}")]
    Surface(String),
}
