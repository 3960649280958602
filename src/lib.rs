//! SpriteFX - non-destructive effects for 16-color sprites
//!
//! This library provides functionality to:
//! - Rotate and fade sprites without ever touching their stored art
//! - Edit sprite shapes (flip, recolor, outline, crop)
//! - Animate rotations and orbits on a cooperative, tick-driven scheduler
//! - Render the results to PNG and GIF through a configurable palette

pub mod bitmap;
pub mod cli;
pub mod config;
pub mod fx;
pub mod literal;
pub mod motion;
pub mod output;
pub mod palette;
pub mod registry;
pub mod scene;
pub mod scheduler;
pub mod transforms;

pub use bitmap::Bitmap;
pub use fx::SpriteFx;
pub use scene::{Scene, SpriteId};
