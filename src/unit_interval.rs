//! Opacity-like values, kept within `[0, 1]`.

use cssparser::{Parser, Token};

use crate::error::*;
use crate::parsers::{finite_f32, Parse};
use crate::util;

/// Value of `opacity`, `fill-opacity`, `stop-opacity` and similar properties, and of
/// gradient stop offsets.
///
/// Out-of-range input is clamped rather than rejected.
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd)]
pub struct UnitInterval(pub f64);

impl UnitInterval {
    pub fn clamp(val: f64) -> UnitInterval {
        UnitInterval(util::clamp(val, 0.0, 1.0))
    }
}

impl Parse for UnitInterval {
    /// Accepts a number or a percentage, so `0.5` and `50%` are the same value.
    fn parse<'i>(parser: &mut Parser<'i, '_>) -> Result<UnitInterval, ParseError<'i>> {
        let value = match parser.next()?.clone() {
            Token::Number { value, .. } => value,
            Token::Percentage { unit_value, .. } => unit_value,
            token => return Err(parser.new_unexpected_token_error(token)),
        };

        let value = finite_f32(value).map_err(|e| parser.new_custom_error(e))?;

        Ok(UnitInterval::clamp(f64::from(value)))
    }
}

/// Alpha byte for Cairo and pixel code.
impl From<UnitInterval> for u8 {
    fn from(UnitInterval(x): UnitInterval) -> u8 {
        (x * 255.0).round() as u8
    }
}
