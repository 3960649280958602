//! Render command implementation

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use rayon::prelude::*;

use crate::bitmap::Bitmap;
use crate::fx::SpriteFx;
use crate::literal::format_literal;
use crate::output::{generate_output_path, save_png, to_rgba_scaled};

use super::{expand_inputs, read_literal, CliError, Context, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Effects requested on the command line.
///
/// Shape edits run first, in a fixed order (flips, recolors, outlines,
/// crop), then rotation and opacity are applied to the edited baseline.
#[derive(Debug, Clone, Default)]
pub struct Effects {
    pub rotate: f64,
    pub opacity: f64,
    pub flip_h: bool,
    pub flip_v: bool,
    pub recolor: Vec<(f64, f64)>,
    pub outline: Vec<f64>,
    pub crop: bool,
}

impl Effects {
    /// Run `image` through a fresh effects runtime and return what it displays.
    pub fn apply(&self, ctx: &Context, image: Bitmap) -> Bitmap {
        let mut fx = SpriteFx::new(&ctx.config);
        let id = fx.create_sprite(image, 0.0, 0.0);

        if self.flip_h {
            fx.flip_horizontal(id);
        }
        if self.flip_v {
            fx.flip_vertical(id);
        }
        for &(from, to) in &self.recolor {
            fx.recolor(id, from, to);
        }
        for &color in &self.outline {
            fx.outline(id, color);
        }
        if self.crop {
            fx.crop_transparent_border(id);
        }
        fx.set_rotation(id, self.rotate);
        fx.set_opacity(id, self.opacity);

        fx.image(id).cloned().unwrap_or_else(|| Bitmap::new(1, 1))
    }
}

fn render_one(
    ctx: &Context,
    input: &Path,
    output: Option<&Path>,
    is_single: bool,
    effects: &Effects,
    scale: u32,
    print: bool,
) -> Result<Option<PathBuf>, CliError> {
    let image = read_literal(input)?;
    let result = effects.apply(ctx, image);

    if print {
        print!("{}", format_literal(&result));
        return Ok(None);
    }

    let path = generate_output_path(input, output, is_single, "png");
    save_png(&to_rgba_scaled(&result, &ctx.palette, scale), &path)?;
    Ok(Some(path))
}

/// Execute the render command
pub fn run_render(
    ctx: &Context,
    inputs: &[String],
    output: Option<&Path>,
    effects: &Effects,
    scale: Option<u32>,
    print: bool,
) -> ExitCode {
    let scale = ctx.scale(scale);
    if scale == 0 || scale > crate::config::MAX_SCALE {
        eprintln!("Error: --scale must be between 1 and {}", crate::config::MAX_SCALE);
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let files = expand_inputs(inputs);
    let is_single = files.len() == 1;

    let results: Vec<(PathBuf, Result<Option<PathBuf>, CliError>)> = if print {
        // Printing keeps input order on stdout
        files
            .iter()
            .map(|f| (f.clone(), render_one(ctx, f, output, is_single, effects, scale, true)))
            .collect()
    } else {
        files
            .par_iter()
            .map(|f| (f.clone(), render_one(ctx, f, output, is_single, effects, scale, false)))
            .collect()
    };

    let mut failed = 0;
    for (input, result) in results {
        match result {
            Ok(Some(path)) => eprintln!("Saved: {}", path.display()),
            Ok(None) => {}
            Err(e) => {
                tracing::debug!(input = %input.display(), "render failed");
                eprintln!("Error: {}", e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}
