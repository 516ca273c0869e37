#![forbid(unsafe_code)]
//! Host side of wallgen: a raster surface with PNG export, palette extraction
//! from images, saved settings and the `wallgen` command line.

mod cli;
pub mod extract;
mod rendering;
pub mod settings;

pub use cli::{run, CanvasArgs, Cli, Command, FractionRange, GenerateArgs, RandomArgs};
pub use rendering::RasterSurface;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "wallgen=info,wallgen_cli=info";

/// Install the fmt subscriber on stderr.
///
/// `level` takes precedence over `RUST_LOG`; without either, wallgen logs at
/// info. Calling this more than once is a no-op.
pub fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
