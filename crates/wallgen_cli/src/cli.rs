use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::{info, warn};
use wallgen::layout::{DEFAULT_SHAPE_HEIGHT_RANGE, DEFAULT_SHAPE_WIDTH_RANGE, DEFAULT_SPACING};
use wallgen::prelude::*;

use crate::extract::extract_from_file;
use crate::rendering::RasterSurface;
use crate::settings::SettingsStore;

#[derive(Debug, Parser)]
#[command(name = "wallgen", version, about = "Generate geometric pill wallpapers")]
pub struct Cli {
    /// Log filter such as `debug` or `wallgen=trace`; overrides RUST_LOG.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a wallpaper from a palette or custom colors.
    #[command(disable_help_flag = true)]
    Generate(GenerateArgs),
    /// Generate a wallpaper with random colors.
    #[command(disable_help_flag = true)]
    Random(RandomArgs),
    /// List available color palettes.
    Palettes,
    /// List available resolution presets.
    Resolutions,
}

/// Canvas and output flags shared by the generating commands.
#[derive(Debug, Args)]
pub struct CanvasArgs {
    /// Number of shapes.
    #[arg(short = 's', long = "shapes")]
    pub shapes: Option<usize>,

    /// Resolution preset: hd, fhd, qhd, 4k, ultrawide, mobile.
    #[arg(short, long)]
    pub resolution: Option<String>,

    /// Custom width in pixels; needs --height.
    #[arg(short, long)]
    pub width: Option<u32>,

    /// Custom height in pixels; needs --width.
    #[arg(short = 'h', long)]
    pub height: Option<u32>,

    /// Output PNG path.
    #[arg(short, long, default_value = "./wallpaper.png")]
    pub output: PathBuf,

    /// Seed for a reproducible layout.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print help.
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

impl CanvasArgs {
    fn apply(&self, state: &mut GeneratorState) -> anyhow::Result<()> {
        if let Some(resolution) = &self.resolution {
            state.resolution = resolution.parse()?;
        }
        if let Some(shapes) = self.shapes {
            state.shape_count = shapes;
        }
        if let Some(seed) = self.seed {
            state.seed = Some(seed);
        }
        Ok(())
    }

    fn custom_size(&self) -> Option<(u32, u32)> {
        match (self.width, self.height) {
            (Some(width), Some(height)) => Some((width, height)),
            (None, None) => None,
            _ => {
                warn!("--width and --height must be given together; using the resolution preset");
                None
            }
        }
    }
}

/// `min,max` pair of canvas fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractionRange(pub f64, pub f64);

impl FromStr for FractionRange {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (min, max) = s
            .split_once(',')
            .ok_or_else(|| format!("expected MIN,MAX, got '{s}'"))?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid number '{v}': {e}"))
        };
        Ok(Self(parse(min)?, parse(max)?))
    }
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub canvas: CanvasArgs,

    /// Palette name (see `wallgen palettes`).
    #[arg(short, long)]
    pub palette: Option<String>,

    /// Comma-separated hex colors; switches to gradient mode.
    #[arg(long, value_delimiter = ',')]
    pub colors: Vec<String>,

    /// Background color in gradient mode.
    #[arg(long)]
    pub background: Option<String>,

    /// Shape width in percent of the canvas width.
    #[arg(long, value_parser = clap::value_parser!(u32).range(5..=25))]
    pub shape_width: Option<u32>,

    /// Shape height in percent of the canvas height.
    #[arg(long, value_parser = clap::value_parser!(u32).range(40..=95))]
    pub shape_height: Option<u32>,

    /// Overlap in percent of the shape width.
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=60))]
    pub overlap: Option<u32>,

    /// Take shape and background colors from an image.
    #[arg(long, value_name = "IMAGE")]
    pub from_image: Option<PathBuf>,

    /// Apply a share link or query string.
    #[arg(long, value_name = "URL_OR_QUERY")]
    pub link: Option<String>,

    /// Start from the saved settings.
    #[arg(long)]
    pub restore: bool,

    /// Save the settings used for this wallpaper.
    #[arg(long)]
    pub remember: bool,

    /// Settings file; defaults to the platform config directory.
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Write the generated layout as JSON.
    #[arg(long, value_name = "PATH")]
    pub config_out: Option<PathBuf>,

    /// Randomize each shape's size instead of overlapping equal pills.
    #[arg(long)]
    pub random_size: bool,

    /// Shape width range as canvas fractions, e.g. `0.06,0.14`.
    #[arg(long, requires = "random_size", value_name = "MIN,MAX")]
    pub width_range: Option<FractionRange>,

    /// Shape height range as canvas fractions, e.g. `0.45,0.85`.
    #[arg(long, requires = "random_size", value_name = "MIN,MAX")]
    pub height_range: Option<FractionRange>,

    /// Gap between shapes as a fraction of the canvas width.
    #[arg(long, requires = "random_size")]
    pub spacing: Option<f64>,
}

#[derive(Debug, Args)]
pub struct RandomArgs {
    #[command(flatten)]
    pub canvas: CanvasArgs,

    /// Background color; defaults to the engine fallback.
    #[arg(long)]
    pub background: Option<String>,
}

/// Execute `cli`, writing user-facing output to `out`.
pub fn run<W: Write>(cli: Cli, out: &mut W) -> anyhow::Result<()> {
    match cli.command {
        Command::Generate(args) => generate(&args, out),
        Command::Random(args) => random(&args, out),
        Command::Palettes => list_palettes(out),
        Command::Resolutions => list_resolutions(out),
    }
}

/// State used when no flag, link or saved setting says otherwise.
fn cli_defaults() -> GeneratorState {
    GeneratorState {
        mode: GeneratorMode::Themes,
        resolution: ResolutionPreset::Fhd,
        ..Default::default()
    }
}

fn settings_store(path: Option<&Path>) -> anyhow::Result<SettingsStore> {
    match path {
        Some(path) => Ok(SettingsStore::new(path)),
        None => SettingsStore::open_default(),
    }
}

fn build_state(args: &GenerateArgs, store: Option<&SettingsStore>) -> anyhow::Result<GeneratorState> {
    let mut state = cli_defaults();

    if let Some(saved) = store.filter(|_| args.restore).and_then(SettingsStore::load) {
        info!("restored saved settings");
        state = saved;
    }

    if let Some(link) = &args.link {
        let query = link.split_once('?').map_or(link.as_str(), |(_, q)| q);
        let query = query.split_once('#').map_or(query, |(q, _)| q);
        if !state.apply_query(query) {
            warn!(link = %link, "link carries no wallpaper settings");
        }
    }

    if let Some(palette) = &args.palette {
        state.mode = GeneratorMode::Themes;
        state.palette = palette.clone();
    }
    if !args.colors.is_empty() {
        state.mode = GeneratorMode::Gradient;
        state.custom_colors = args.colors.clone();
    }
    if let Some(background) = &args.background {
        state.background_color = background.clone();
    }

    if let Some(path) = &args.from_image {
        match extract_from_file(path) {
            Ok(extracted) => {
                info!(
                    colors = extracted.colors.len(),
                    background = %extracted.background_color,
                    "using colors from image"
                );
                state.mode = GeneratorMode::Gradient;
                state.custom_colors = extracted.colors;
                state.background_color = extracted.background_color;
            }
            Err(e) => warn!(path = %path.display(), error = %e, "keeping previous palette"),
        }
    }

    args.canvas.apply(&mut state)?;
    if let Some(width) = args.shape_width {
        state.shape_width = width;
    }
    if let Some(height) = args.shape_height {
        state.shape_height = height;
    }
    if let Some(overlap) = args.overlap {
        state.overlap = overlap;
    }
    Ok(state)
}

fn generate<W: Write>(args: &GenerateArgs, out: &mut W) -> anyhow::Result<()> {
    let store = if args.restore || args.remember {
        Some(settings_store(args.settings.as_deref())?)
    } else {
        None
    };
    let mut state = build_state(args, store.as_ref())?;

    let mut options = state.to_options();
    let custom_size = args.canvas.custom_size();
    if let Some((width, height)) = custom_size {
        options.width = width;
        options.height = height;
    }
    if args.random_size {
        let width = args
            .width_range
            .map_or(DEFAULT_SHAPE_WIDTH_RANGE, |r| (r.0, r.1));
        let height = args
            .height_range
            .map_or(DEFAULT_SHAPE_HEIGHT_RANGE, |r| (r.0, r.1));
        options.layout =
            LayoutPolicy::random_size(width, height, args.spacing.unwrap_or(DEFAULT_SPACING));
    }

    let config = render_to_file(&options, &args.canvas.output)?;

    if let Some(path) = &args.config_out {
        let json = serde_json::to_string_pretty(&config)?;
        fs::write(path, json).with_context(|| format!("writing config to {}", path.display()))?;
    }
    if let Some(store) = store.as_ref().filter(|_| args.remember) {
        store.save(&state)?;
        info!(path = %store.path().display(), "remembered settings");
    }

    state.seed = Some(config.seed);
    let palette = match state.mode {
        GeneratorMode::Themes => state.palette.clone(),
        GeneratorMode::Gradient => state.custom_colors.join(", "),
    };
    let unshareable = unshareable_reason(&state, custom_size.is_some(), args.random_size);
    print_summary(out, &args.canvas.output, &config, &palette, &state, unshareable)
}

fn random<W: Write>(args: &RandomArgs, out: &mut W) -> anyhow::Result<()> {
    let mut state = cli_defaults();
    args.canvas.apply(&mut state)?;
    let seed = state.seed.unwrap_or_else(seed_from_clock);
    let custom_size = args.canvas.custom_size();
    let (width, height) = custom_size.unwrap_or_else(|| state.resolution.dimensions());

    let colors = generate_random_palette(state.shape_count, Some(seed));
    let mut options = GeneratorOptions::new(width, height, PaletteSpec::Colors(colors.clone()))
        .with_shape_count(state.shape_count)
        .with_seed(seed);
    if let Some(background) = &args.background {
        options = options.with_background_color(background.clone());
    }

    let config = render_to_file(&options, &args.canvas.output)?;

    state.mode = GeneratorMode::Gradient;
    state.custom_colors = colors.clone();
    state.background_color = config.background_color.clone();
    state.seed = Some(seed);
    let unshareable = unshareable_reason(&state, custom_size.is_some(), false);
    print_summary(out, &args.canvas.output, &config, "random", &state, unshareable)?;
    writeln!(out, "  Colors:")?;
    for (i, color) in colors.iter().enumerate() {
        writeln!(out, "    {}. {color}", i + 1)?;
    }
    Ok(())
}

fn render_to_file(options: &GeneratorOptions, output: &Path) -> anyhow::Result<WallpaperConfig> {
    let mut surface = RasterSurface::new(options.width, options.height);
    let config = generate_wallpaper(&mut surface, options).context("failed to generate wallpaper")?;
    surface.save_png(output)?;
    Ok(config)
}

fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(1, |d| d.as_millis() as u64)
}

/// Why a share link built from `state` would not reproduce the wallpaper.
fn unshareable_reason(
    state: &GeneratorState,
    custom_size: bool,
    random_size: bool,
) -> Option<&'static str> {
    if custom_size {
        Some("custom canvas size")
    } else if random_size {
        Some("random shape sizes")
    } else if !state.is_shareable() {
        Some("settings outside the share link ranges")
    } else {
        None
    }
}

fn print_summary<W: Write>(
    out: &mut W,
    output: &Path,
    config: &WallpaperConfig,
    palette: &str,
    state: &GeneratorState,
    unshareable: Option<&str>,
) -> anyhow::Result<()> {
    let shown = std::path::absolute(output).unwrap_or_else(|_| output.to_path_buf());
    writeln!(out, "Wallpaper saved to {}", shown.display())?;
    writeln!(out, "  Resolution: {}x{}", config.width, config.height)?;
    writeln!(out, "  Palette: {palette}")?;
    writeln!(out, "  Shapes: {}", config.shapes.len())?;
    writeln!(out, "  Seed: {} (use this to reproduce)", config.seed)?;
    match unshareable {
        None => writeln!(out, "  Share: ?{}", state.to_query())?,
        Some(reason) => {
            warn!(reason, "no share link for this wallpaper");
            writeln!(out, "  Share: not available ({reason})")?;
        }
    }
    Ok(())
}

fn list_palettes<W: Write>(out: &mut W) -> anyhow::Result<()> {
    writeln!(out, "Available palettes:")?;
    for palette in all_palettes() {
        writeln!(out)?;
        writeln!(out, "{} ({})", palette.display_name, palette.name)?;
        writeln!(out, "  {}", palette.colors.join(" "))?;
        writeln!(out, "  Background: {}", palette.background)?;
    }
    Ok(())
}

fn list_resolutions<W: Write>(out: &mut W) -> anyhow::Result<()> {
    writeln!(out, "Available resolutions:")?;
    for preset in ResolutionPreset::ALL {
        writeln!(out, "  {:<12} {}", preset.key(), preset.resolution().label)?;
    }
    Ok(())
}

