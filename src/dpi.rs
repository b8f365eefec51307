//! Resolution for rendering (dots per inch = DPI).

/// Dots per inch used to resolve physical length units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Dpi {
    pub x: f64,
    pub y: f64,
}

/// The CSS reference pixel density.
pub const DEFAULT_DPI: f64 = 96.0;

impl Dpi {
    pub fn new(x: f64, y: f64) -> Dpi {
        Dpi { x, y }
    }
}

impl Default for Dpi {
    fn default() -> Dpi {
        Dpi::new(DEFAULT_DPI, DEFAULT_DPI)
    }
}
