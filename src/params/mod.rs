//! Parameter definitions with physical units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Units (pixels, seconds, spectrum bands, etc.)
//! - Documented ranges and meanings
//! - Type safety where possible

mod audio;
mod cloud;
mod render;

// Re-export all types
pub use audio::{audio_constants, SpectrumConfig};
pub use cloud::{CloudPhysics, SpectrumMapping};
pub use render::{DrawMode, RenderConfig};
