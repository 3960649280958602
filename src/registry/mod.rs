//! Identity-keyed transform state.
//!
//! This module provides:
//! - A `Registry` trait for handle-keyed lookups
//! - `TransformRegistry`, holding one `TransformRecord` per sprite ever touched
//!
//! Records are keyed by `SpriteId`, never by image contents: two sprites
//! showing identical art still get independent records.

mod traits;
mod transform;

pub use traits::Registry;
pub use transform::{TransformRecord, TransformRegistry};
