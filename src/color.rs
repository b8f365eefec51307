//! CSS color values.

use cssparser::Parser;

use crate::error::*;
use crate::parsers::Parse;

pub use cssparser::Color;

impl Parse for cssparser::Color {
    fn parse<'i>(parser: &mut Parser<'i, '_>) -> Result<cssparser::Color, ParseError<'i>> {
        Ok(cssparser::Color::parse(parser)?)
    }
}

impl Parse for cssparser::RGBA {
    fn parse<'i>(parser: &mut Parser<'i, '_>) -> Result<cssparser::RGBA, ParseError<'i>> {
        let loc = parser.current_source_location();

        match cssparser::Color::parse(parser)? {
            cssparser::Color::RGBA(rgba) => Ok(rgba),
            cssparser::Color::CurrentColor => Err(loc.new_custom_error(ValueErrorKind::Value(
                "currentColor is not allowed here".to_string(),
            ))),
        }
    }
}

/// Packs a color as `0xAARRGGBB`.
pub fn rgba_to_argb(rgba: cssparser::RGBA) -> u32 {
    u32::from(rgba.alpha) << 24
        | u32::from(rgba.red) << 16
        | u32::from(rgba.green) << 8
        | u32::from(rgba.blue)
}

/// Unpacks a `0xAARRGGBB` color.
pub fn argb_to_rgba(argb: u32) -> cssparser::RGBA {
    cssparser::RGBA::new(
        ((argb >> 16) & 0xff) as u8,
        ((argb >> 8) & 0xff) as u8,
        (argb & 0xff) as u8,
        (argb >> 24) as u8,
    )
}

/// Resolves a parsed color against the value of the `color` property.
pub fn resolve_color(color: &Color, current_color: cssparser::RGBA) -> cssparser::RGBA {
    match *color {
        Color::RGBA(rgba) => rgba,
        Color::CurrentColor => current_color,
    }
}

/// Multiplies the alpha of `rgba` by `opacity`, which is in `[0, 255]`.
pub fn with_opacity(rgba: cssparser::RGBA, opacity: u8) -> cssparser::RGBA {
    let alpha = (u32::from(rgba.alpha) * u32::from(opacity) + 127) / 255;

    cssparser::RGBA {
        alpha: alpha as u8,
        ..rgba
    }
}
