//! Comparing coordinates at the precision that Cairo actually keeps.

use float_cmp::{ApproxEq, F64Margin};

/// Cairo stores coordinates as 24.8 fixed-point numbers; distances below one
/// step of the fraction cannot be told apart once they reach a path or a matrix.
const CAIRO_MARGIN: F64Margin = F64Margin {
    epsilon: 1.0 / 256.0,
    ulps: 1,
};

/// Equality for `f64` values that end up in Cairo paths, rectangles or matrices.
///
/// Huge values whose difference exceeds the fixed-point step but is still a single
/// unit in the last place also compare equal.
pub trait ApproxEqCairo {
    fn approx_eq_cairo(self, other: Self) -> bool;
}

impl ApproxEqCairo for f64 {
    fn approx_eq_cairo(self, other: f64) -> bool {
        self.approx_eq(other, CAIRO_MARGIN)
    }
}
