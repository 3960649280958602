//! Animate and orbit commands: drive the scheduler and record each tick

use std::path::Path;
use std::process::ExitCode;

use image::RgbaImage;

use crate::fx::SpriteFx;
use crate::output::{generate_output_path, render_gif, to_rgba_scaled};
use crate::scene::SpriteId;

use super::{read_literal, CliError, Context, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Upper bound on recorded frames, so huge durations can't exhaust memory.
const MAX_FRAMES: usize = 2000;

pub struct OrbitArgs {
    pub pivot: (f64, f64),
    pub radius: f64,
    pub speed: f64,
    pub duration: f64,
    pub at: Option<(f64, f64)>,
    pub trail: bool,
}

fn check_scale(scale: u32) -> Option<ExitCode> {
    if scale == 0 || scale > crate::config::MAX_SCALE {
        eprintln!("Error: --scale must be between 1 and {}", crate::config::MAX_SCALE);
        return Some(ExitCode::from(EXIT_INVALID_ARGS));
    }
    None
}

/// Tick `fx` until idle, capturing a frame before the first tick and after
/// every tick.
fn record(fx: &mut SpriteFx, mut capture: impl FnMut(&mut SpriteFx) -> RgbaImage) -> Vec<RgbaImage> {
    let mut frames = vec![capture(fx)];
    while !fx.scheduler().is_idle() && frames.len() < MAX_FRAMES {
        fx.tick();
        frames.push(capture(fx));
    }
    frames
}

/// Frames of a smooth rotation, drawn on the sprite's own canvas.
pub fn rotation_frames(ctx: &Context, fx: &mut SpriteFx, id: SpriteId, to: f64, duration: f64, scale: u32) -> Vec<RgbaImage> {
    fx.smooth_rotate(id, to, duration);
    record(fx, |fx| match fx.image(id) {
        Some(image) => to_rgba_scaled(image, &ctx.palette, scale),
        None => RgbaImage::new(scale, scale),
    })
}

fn run_animate_inner(
    ctx: &Context,
    input: &Path,
    from: f64,
    to: f64,
    duration: f64,
    output: Option<&Path>,
    scale: u32,
) -> Result<std::path::PathBuf, CliError> {
    let image = read_literal(input)?;
    let mut fx = SpriteFx::new(&ctx.config);
    let id = fx.create_sprite(image, 0.0, 0.0);
    fx.set_rotation(id, from);

    let frames = rotation_frames(ctx, &mut fx, id, to, duration, scale);
    tracing::debug!(frames = frames.len(), "recorded rotation");

    let path = generate_output_path(input, output, true, "gif");
    render_gif(&frames, ctx.config.render.frame_ms, true, &path)?;
    Ok(path)
}

/// Execute the animate command
pub fn run_animate(
    ctx: &Context,
    input: &Path,
    from: f64,
    to: f64,
    duration: f64,
    output: Option<&Path>,
    scale: Option<u32>,
) -> ExitCode {
    let scale = ctx.scale(scale);
    if let Some(code) = check_scale(scale) {
        return code;
    }

    match run_animate_inner(ctx, input, from, to, duration, output, scale) {
        Ok(path) => {
            eprintln!("Saved: {}", path.display());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Frames of an orbit, drawn as full scene composites.
pub fn orbit_frames(ctx: &Context, fx: &mut SpriteFx, id: SpriteId, orbit: &OrbitArgs, scale: u32) -> Vec<RgbaImage> {
    let (cx, cy) = orbit.pivot;
    fx.orbit_around_point(id, cx, cy, orbit.radius, orbit.speed, orbit.duration);
    let trail = orbit.trail;
    record(fx, |fx| {
        if trail {
            fx.stamp_to_background(id);
        }
        to_rgba_scaled(&fx.scene().composite(), &ctx.palette, scale)
    })
}

fn run_orbit_inner(ctx: &Context, input: &Path, orbit: &OrbitArgs, output: Option<&Path>, scale: u32) -> Result<std::path::PathBuf, CliError> {
    let image = read_literal(input)?;
    let (cx, cy) = orbit.pivot;
    let (x, y) = orbit.at.unwrap_or((cx + orbit.radius.max(0.0), cy));

    let mut fx = SpriteFx::new(&ctx.config);
    let id = fx.create_sprite(image, x, y);

    let frames = orbit_frames(ctx, &mut fx, id, orbit, scale);
    tracing::debug!(frames = frames.len(), "recorded orbit");

    let path = generate_output_path(input, output, true, "gif");
    render_gif(&frames, ctx.config.render.frame_ms, true, &path)?;
    Ok(path)
}

/// Execute the orbit command
pub fn run_orbit(ctx: &Context, input: &Path, orbit: &OrbitArgs, output: Option<&Path>, scale: Option<u32>) -> ExitCode {
    let scale = ctx.scale(scale);
    if let Some(code) = check_scale(scale) {
        return code;
    }

    match run_orbit_inner(ctx, input, orbit, output, scale) {
        Ok(path) => {
            eprintln!("Saved: {}", path.display());
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
