//! SpriteFX - command-line renderer for sprite effects

use std::process::ExitCode;

use spritefx::cli;

fn main() -> ExitCode {
    cli::run()
}
