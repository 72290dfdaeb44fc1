//! Character-grid surface
//!
//! Rasterizes frames into a fixed grid of characters so the animation can be
//! previewed in a terminal. Each cell covers `cell_width` x `cell_height`
//! canvas units; brighter (more opaque) paint wins over dimmer paint.

use std::fmt;

use super::render::Surface;
use crate::theme::Rgba;

/// Glyphs from faintest to strongest
const RAMP: [char; 5] = ['.', ':', '*', 'o', '@'];

#[derive(Debug, Clone)]
pub struct AsciiSurface {
    columns: usize,
    rows: usize,
    cell_width: f64,
    cell_height: f64,
    /// Strongest alpha painted into each cell this frame
    cells: Vec<f64>,
}

impl AsciiSurface {
    /// Grid of `columns` x `rows` covering a `width` x `height` canvas
    pub fn new(columns: usize, rows: usize, width: f64, height: f64) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);

        Self {
            columns,
            rows,
            cell_width: (width / columns as f64).max(f64::MIN_POSITIVE),
            cell_height: (height / rows as f64).max(f64::MIN_POSITIVE),
            cells: vec![0.0; columns * rows],
        }
    }

    fn paint(&mut self, x: f64, y: f64, alpha: f64) {
        if x < 0.0 || y < 0.0 {
            return;
        }
        let col = (x / self.cell_width) as usize;
        let row = (y / self.cell_height) as usize;
        if col >= self.columns || row >= self.rows {
            return;
        }

        let cell = &mut self.cells[row * self.columns + col];
        *cell = cell.max(alpha);
    }

    fn glyph(alpha: f64) -> char {
        if alpha <= 0.0 {
            return ' ';
        }
        let index = ((alpha * RAMP.len() as f64).ceil() as usize).clamp(1, RAMP.len()) - 1;
        RAMP[index]
    }
}

impl Surface for AsciiSurface {
    fn clear(&mut self, _width: f64, _height: f64) {
        self.cells.iter_mut().for_each(|c| *c = 0.0);
    }

    fn fill_radial_disk(&mut self, cx: f64, cy: f64, radius: f64, stops: &[(f64, Rgba); 3]) {
        for row in 0..self.rows {
            for col in 0..self.columns {
                let x = (col as f64 + 0.5) * self.cell_width;
                let y = (row as f64 + 0.5) * self.cell_height;
                let distance = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
                if distance > radius || radius <= 0.0 {
                    continue;
                }

                // Linear interpolation of alpha between the surrounding stops
                let t = distance / radius;
                let alpha = if t <= stops[1].0 {
                    lerp(stops[0].1.a, stops[1].1.a, t / stops[1].0.max(f64::MIN_POSITIVE))
                } else {
                    let span = (stops[2].0 - stops[1].0).max(f64::MIN_POSITIVE);
                    lerp(stops[1].1.a, stops[2].1.a, (t - stops[1].0) / span)
                };
                self.paint(x, y, alpha);
            }
        }
    }

    fn fill_circle(&mut self, x: f64, y: f64, _radius: f64, color: Rgba) {
        self.paint(x, y, color.a);
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

impl fmt::Display for AsciiSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.columns) {
            let line: String = row.iter().map(|&a| Self::glyph(a)).collect();
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
