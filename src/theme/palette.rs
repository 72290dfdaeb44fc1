//! Colors consumed by the particle renderer

use std::fmt;

/// An sRGB color with straight alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// 0.0 (transparent) to 1.0 (opaque)
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with its alpha multiplied by `factor` (clamped to 0..=1)
    pub fn scale_alpha(self, factor: f64) -> Self {
        Self {
            a: (self.a * factor).clamp(0.0, 1.0),
            ..self
        }
    }

    /// CSS `rgba()` notation, as accepted by canvas fill styles
    pub fn to_css(&self) -> String {
        self.to_string()
    }

    /// Parse `#rgb`, `#rrggbb`, `rgb(r, g, b)` or `rgba(r, g, b, a)`
    ///
    /// Returns `None` for anything else, including named colors.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();

        if let Some(hex) = input.strip_prefix('#') {
            return parse_hex(hex);
        }

        let (body, has_alpha) = if let Some(rest) = input.strip_prefix("rgba(") {
            (rest.strip_suffix(')')?, true)
        } else if let Some(rest) = input.strip_prefix("rgb(") {
            (rest.strip_suffix(')')?, false)
        } else {
            return None;
        };

        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        let expected = if has_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return None;
        }

        let r = parts[0].parse().ok()?;
        let g = parts[1].parse().ok()?;
        let b = parts[2].parse().ok()?;
        let a = if has_alpha {
            parts[3].parse::<f64>().ok()?.clamp(0.0, 1.0)
        } else {
            1.0
        };

        Some(Self { r, g, b, a })
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();

    match hex.len() {
        3 => {
            let mut digits = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            Some(Rgba::new(digits.next()??, digits.next()??, digits.next()??, 1.0))
        }
        6 => Some(Rgba::new(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
            1.0,
        )),
        _ => None,
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Style variables the renderer reads every frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Radial gradient stops at offsets 0.0, 0.5 and 1.0
    pub disk_stops: [Rgba; 3],
    /// Base particle color; each particle scales its alpha
    pub particle: Rgba,
}

/// CSS custom properties carrying the palette, in `disk_stops` order then
/// the particle color
pub const PALETTE_VARIABLES: [&str; 4] = [
    "--disk-core",
    "--disk-mid",
    "--disk-edge",
    "--particle-color",
];

/// Anything that can resolve the current palette
///
/// The renderer asks on every frame instead of caching, so a theme switch
/// shows up on the next repaint without touching particle state.
pub trait PaletteSource {
    fn palette(&self) -> Palette;
}
