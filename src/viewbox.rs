//! Parser for the `viewBox` attribute.

use cssparser::Parser;
use std::ops::Deref;

use crate::error::*;
use crate::parsers::{optional_comma, Parse};
use crate::rect::Rect;
use crate::transform::Transform;

/// Newtype around a [`Rect`], used to represent the `viewBox` attribute.
///
/// A `ViewBox` is a new user-space coordinate system mapped onto the rectangle defined by
/// the current viewport.  See <https://www.w3.org/TR/SVG2/coords.html#ViewBoxAttribute>
///
/// `ViewBox` derefs to `Rect`, so you can use `Rect`'s methods and fields directly like
/// `vbox.x0` or `vbox.width()`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewBox(Rect);

impl Deref for ViewBox {
    type Target = Rect;

    fn deref(&self) -> &Rect {
        &self.0
    }
}

impl From<Rect> for ViewBox {
    fn from(r: Rect) -> ViewBox {
        ViewBox(r)
    }
}

impl ViewBox {
    /// Transform that fits the view box into a `width` by `height` viewport, keeping its
    /// aspect ratio and centering it (`xMidYMid meet`).
    ///
    /// Returns `None` for an empty view box, whose contents are not rendered.
    pub fn transform_to(&self, width: f64, height: f64) -> Option<Transform> {
        if self.is_empty() {
            return None;
        }

        let scale = f64::min(width / self.width(), height / self.height());

        let tx = (width - self.width() * scale) / 2.0 - self.x0 * scale;
        let ty = (height - self.height() * scale) / 2.0 - self.y0 * scale;

        Some(Transform::new_unchecked(scale, 0.0, 0.0, scale, tx, ty))
    }
}

impl Parse for ViewBox {
    // viewBox: double [,] double [,] double [,] double
    //
    // x, y, w, h
    //
    // Where w and h must be nonnegative.
    fn parse<'i>(parser: &mut Parser<'i, '_>) -> Result<ViewBox, ParseError<'i>> {
        let loc = parser.current_source_location();

        let x = f64::parse(parser)?;
        optional_comma(parser);
        let y = f64::parse(parser)?;
        optional_comma(parser);
        let width = f64::parse(parser)?;
        optional_comma(parser);
        let height = f64::parse(parser)?;

        if width >= 0.0 && height >= 0.0 {
            Ok(ViewBox(Rect::new(x, y, x + width, y + height)))
        } else {
            Err(loc.new_custom_error(ValueErrorKind::value_error(
                "width and height must not be negative",
            )))
        }
    }
}
