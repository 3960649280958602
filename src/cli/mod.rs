//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod animate;
mod render;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use glob::glob;
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::bitmap::Bitmap;
use crate::config::{load_config, ConfigError, FxConfig};
use crate::literal::{parse_literal, LiteralError};
use crate::output::OutputError;
use crate::palette::{list_builtins, Palette, PaletteError};

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Errors surfaced by CLI commands
#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read '{path}': {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("'{path}': {source}")]
    Literal { path: PathBuf, source: LiteralError },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Palette(#[from] PaletteError),
    #[error(transparent)]
    Output(#[from] OutputError),
}

/// SpriteFX - rotate, fade and reshape 16-color sprites
#[derive(Parser)]
#[command(name = "sfx")]
#[command(about = "SpriteFX - non-destructive rotation, dithered opacity and shape edits for 16-color sprites")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to sfx.toml (default: search upward from the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply effects to image literal files and write PNGs
    Render {
        /// Image literal files or glob patterns
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Output file or directory (ends with /).
        /// If omitted: {input stem}.png next to the input
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Rotation in degrees (clockwise on screen)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        rotate: f64,

        /// Opacity percent, approximated by ordered dithering
        #[arg(long, default_value = "100")]
        opacity: f64,

        /// Mirror left-right
        #[arg(long)]
        flip_h: bool,

        /// Mirror top-bottom
        #[arg(long)]
        flip_v: bool,

        /// Replace a palette index, as FROM:TO (repeatable)
        #[arg(long, value_parser = parse_recolor)]
        recolor: Vec<(f64, f64)>,

        /// Grow a one-pixel outline in this palette index (repeatable)
        #[arg(long)]
        outline: Vec<f64>,

        /// Crop to the opaque pixels before rotating
        #[arg(long)]
        crop: bool,

        /// Scale factor (default from sfx.toml)
        #[arg(long)]
        scale: Option<u32>,

        /// Print the result as an image literal instead of writing PNG
        #[arg(long)]
        print: bool,
    },

    /// Animate a smooth rotation and write it as a GIF
    Animate {
        /// Image literal file
        input: PathBuf,

        /// Starting rotation in degrees
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        from: f64,

        /// Target rotation in degrees
        #[arg(long, allow_hyphen_values = true)]
        to: f64,

        /// Duration in milliseconds
        #[arg(long, default_value = "1000")]
        duration: f64,

        /// Output GIF (default: {input stem}.gif)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Scale factor (default from sfx.toml)
        #[arg(long)]
        scale: Option<u32>,
    },

    /// Orbit a sprite around a point over the background and write a GIF
    Orbit {
        /// Image literal file
        input: PathBuf,

        /// Pivot as X,Y
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        pivot: (f64, f64),

        /// Orbit radius; 0 keeps the starting distance
        #[arg(long, default_value = "0")]
        radius: f64,

        /// Angular speed in degrees per second
        #[arg(long, default_value = "90", allow_hyphen_values = true)]
        speed: f64,

        /// Duration in milliseconds
        #[arg(long, default_value = "1000")]
        duration: f64,

        /// Starting position as X,Y (default: radius to the right of the pivot)
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        at: Option<(f64, f64)>,

        /// Stamp the sprite onto the background every tick
        #[arg(long)]
        trail: bool,

        /// Output GIF (default: {input stem}.gif)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Scale factor (default from sfx.toml)
        #[arg(long)]
        scale: Option<u32>,
    },

    /// List built-in palettes
    Palettes,
}

fn parse_recolor(s: &str) -> Result<(f64, f64), String> {
    let (from, to) = s.split_once(':').ok_or_else(|| format!("expected FROM:TO, got '{}'", s))?;
    let from = from.trim().parse::<f64>().map_err(|e| format!("invalid FROM '{}': {}", from, e))?;
    let to = to.trim().parse::<f64>().map_err(|e| format!("invalid TO '{}': {}", to, e))?;
    Ok((from, to))
}

fn parse_point(s: &str) -> Result<(f64, f64), String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected X,Y, got '{}'", s))?;
    let x = x.trim().parse::<f64>().map_err(|e| format!("invalid X '{}': {}", x, e))?;
    let y = y.trim().parse::<f64>().map_err(|e| format!("invalid Y '{}': {}", y, e))?;
    Ok((x, y))
}

/// Install the stderr log subscriber.
fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Warning: logging was already initialised");
    }
}

/// Expand glob patterns; plain paths pass through even if they don't exist
/// so the read error names them.
pub(crate) fn expand_inputs(patterns: &[String]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for pattern in patterns {
        let matches: Vec<PathBuf> = match glob(pattern) {
            Ok(paths) => paths.filter_map(Result::ok).collect(),
            Err(_) => Vec::new(),
        };
        if matches.is_empty() {
            files.push(PathBuf::from(pattern));
        } else {
            files.extend(matches);
        }
    }
    files
}

/// Read and parse an image literal file.
pub(crate) fn read_literal(path: &Path) -> Result<Bitmap, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_literal(&text).map_err(|source| CliError::Literal {
        path: path.to_path_buf(),
        source,
    })
}

/// Settings shared by every command.
pub struct Context {
    pub config: FxConfig,
    pub palette: Palette,
}

impl Context {
    fn load(config_path: Option<&Path>) -> Result<Self, CliError> {
        let config = load_config(config_path)?;
        let palette = config.palette.resolve()?;
        Ok(Self { config, palette })
    }

    /// CLI scale if given, else the configured one.
    pub fn scale(&self, cli_scale: Option<u32>) -> u32 {
        cli_scale.unwrap_or(self.config.render.scale)
    }
}

/// Parse arguments and run the selected command.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::Palettes = cli.command {
        for name in list_builtins() {
            println!("{}", name);
        }
        return ExitCode::from(EXIT_SUCCESS);
    }

    let ctx = match Context::load(cli.config.as_deref()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match cli.command {
        Commands::Render {
            inputs,
            output,
            rotate,
            opacity,
            flip_h,
            flip_v,
            recolor,
            outline,
            crop,
            scale,
            print,
        } => {
            let effects = render::Effects {
                rotate,
                opacity,
                flip_h,
                flip_v,
                recolor,
                outline,
                crop,
            };
            render::run_render(&ctx, &inputs, output.as_deref(), &effects, scale, print)
        }
        Commands::Animate {
            input,
            from,
            to,
            duration,
            output,
            scale,
        } => animate::run_animate(&ctx, &input, from, to, duration, output.as_deref(), scale),
        Commands::Orbit {
            input,
            pivot,
            radius,
            speed,
            duration,
            at,
            trail,
            output,
            scale,
        } => {
            let orbit = animate::OrbitArgs {
                pivot,
                radius,
                speed,
                duration,
                at,
                trail,
            };
            animate::run_orbit(&ctx, &input, &orbit, output.as_deref(), scale)
        }
        Commands::Palettes => ExitCode::from(EXIT_SUCCESS),
    }
}
