//! Particle Field Renderer
//!
//! A decorative animation: a fixed number of particles spiral into the
//! center of the canvas around a glowing disk.
//!
//! - **field**: per-particle state and the per-frame update
//! - **render**: frame painting over an abstract `Surface`
//! - **ascii**: a character-grid `Surface` for terminals
//!
//! # Frame
//!
//! ```text
//! clear → radial gradient disk (3 palette stops) → step field → particles
//! ```

mod ascii;
mod field;
mod render;

pub use ascii::AsciiSurface;
pub use field::{FieldConfig, Particle, ParticleField};
pub use render::{Renderer, Surface, DISK_STOP_OFFSETS};
