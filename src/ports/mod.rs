//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the gateway core and an external
//! provider. Implementations live in `src/adapters/`.

pub mod image_generator;

pub use image_generator::{GenerateFuture, ImageGenerator, ImageRequest, ImageResult};
