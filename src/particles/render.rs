//! Frame rendering
//!
//! The renderer owns the particle field and paints it onto any `Surface`:
//! a browser canvas in the UI crate, a character grid in the CLI, a
//! recording fake in tests.

use std::rc::Rc;

use super::field::{FieldConfig, ParticleField};
use crate::theme::{PaletteSource, Rgba, ThemeChanged};

/// Gradient stop offsets matching `Palette::disk_stops`
pub const DISK_STOP_OFFSETS: [f64; 3] = [0.0, 0.5, 1.0];

/// A 2D drawing target
pub trait Surface {
    /// Erase the whole drawing area
    fn clear(&mut self, width: f64, height: f64);

    /// Fill a disk with a radial gradient from its center outwards
    fn fill_radial_disk(&mut self, cx: f64, cy: f64, radius: f64, stops: &[(f64, Rgba); 3]);

    /// Fill a circle with a flat color
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgba);
}

/// Drives the particle field and paints one frame at a time
pub struct Renderer {
    field: ParticleField,
    palette: Rc<dyn PaletteSource>,
    frames: u64,
}

impl Renderer {
    pub fn new(field: ParticleField, palette: Rc<dyn PaletteSource>) -> Self {
        Self {
            field,
            palette,
            frames: 0,
        }
    }

    /// Convenience constructor with an entropy-seeded field
    pub fn for_canvas(
        config: FieldConfig,
        width: f64,
        height: f64,
        palette: Rc<dyn PaletteSource>,
    ) -> Self {
        Self::new(ParticleField::new(config, width, height), palette)
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    /// Frames drawn so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Canvas size changed: regenerate every particle
    pub fn resize(&mut self, width: f64, height: f64) {
        self.field.resize(width, height);
    }

    /// Theme switched. Colors are resolved on every frame, so nothing here
    /// needs to change; the next frame picks up the new palette.
    pub fn on_theme_changed(&self, change: &ThemeChanged) {
        tracing::debug!("Renderer will repaint with theme {}", change.theme);
    }

    /// Advance the simulation one step and paint the result
    pub fn draw_frame(&mut self, surface: &mut dyn Surface) {
        let palette = self.palette.palette();
        let (width, height) = (self.field.width(), self.field.height());
        let (cx, cy) = self.field.center();

        surface.clear(width, height);

        let stops = [
            (DISK_STOP_OFFSETS[0], palette.disk_stops[0]),
            (DISK_STOP_OFFSETS[1], palette.disk_stops[1]),
            (DISK_STOP_OFFSETS[2], palette.disk_stops[2]),
        ];
        surface.fill_radial_disk(cx, cy, self.field.config().disk_radius, &stops);

        self.field.step();

        for particle in self.field.particles() {
            let (x, y) = self.field.position(particle);
            surface.fill_circle(
                x,
                y,
                particle.radius,
                palette.particle.scale_alpha(particle.opacity),
            );
        }

        self.frames += 1;
    }
}
