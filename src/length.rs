//! Lengths with units, as used by geometry attributes and `font-size`.
//!
//! A length knows which viewport dimension its percentages refer to, through the
//! `O: Orientation` parameter, and whether negative values are a parse error, through
//! the `S: Sign` parameter.  Most code uses the [`Length`] and [`ULength`] aliases:
//!
//! ```
//! # use rsvg_render::doctest_only::{Both, Horizontal, Length, Parse, ULength, Vertical};
//! struct Circle {
//!     cx: Length<Horizontal>,
//!     cy: Length<Vertical>,
//!     r: ULength<Both>,
//! }
//!
//! let r = ULength::<Both>::parse_str("2.5mm").unwrap();
//! assert!(ULength::<Both>::parse_str("-1").is_err());
//! # let _ = Circle { cx: Length::default(), cy: Length::default(), r };
//! ```
//!
//! `Both` lengths resolve percentages against the viewport diagonal divided by √2.

use cssparser::{Parser, Token};
use std::f64::consts::SQRT_2;
use std::marker::PhantomData;

use crate::dpi::Dpi;
use crate::drawing_ctx::ViewParams;
use crate::error::*;
use crate::parsers::{finite_f32, Parse};
use crate::properties::ComputedValues;

/// Font size that relative `font-size` values fall back to at the root.
const INITIAL_FONT_SIZE: f64 = 12.0;

#[derive(Debug, PartialEq, Copy, Clone)]
pub enum LengthUnit {
    /// User-space units; also used for unitless numbers.
    Px,

    /// Stored as a fraction, so `50%` has a length of `0.5`.
    Percent,

    Em,

    /// Taken as half an em.
    Ex,

    /// Units that are a fixed fraction of an inch, and so depend on the DPI.
    Physical(PhysicalUnit),
}

#[derive(Debug, PartialEq, Copy, Clone)]
pub enum PhysicalUnit {
    In,
    Cm,
    Mm,
    Pt,
    Pc,
}

impl PhysicalUnit {
    fn per_inch(self) -> f64 {
        match self {
            PhysicalUnit::In => 1.0,
            PhysicalUnit::Cm => 2.54,
            PhysicalUnit::Mm => 25.4,
            PhysicalUnit::Pt => 72.0,
            PhysicalUnit::Pc => 6.0,
        }
    }
}

impl LengthUnit {
    fn from_suffix(suffix: &str) -> Option<LengthUnit> {
        let unit = match suffix {
            "px" => LengthUnit::Px,
            "em" => LengthUnit::Em,
            "ex" => LengthUnit::Ex,
            "in" => LengthUnit::Physical(PhysicalUnit::In),
            "cm" => LengthUnit::Physical(PhysicalUnit::Cm),
            "mm" => LengthUnit::Physical(PhysicalUnit::Mm),
            "pt" => LengthUnit::Physical(PhysicalUnit::Pt),
            "pc" => LengthUnit::Physical(PhysicalUnit::Pc),
            _ => return None,
        };

        Some(unit)
    }
}

/// Picks the viewport dimension, or DPI axis, that a length is measured along.
pub trait Orientation {
    fn pick(x: f64, y: f64) -> f64;
}

#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Horizontal;

#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Vertical;

#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Both;

impl Orientation for Horizontal {
    fn pick(x: f64, _y: f64) -> f64 {
        x
    }
}

impl Orientation for Vertical {
    fn pick(_x: f64, y: f64) -> f64 {
        y
    }
}

impl Orientation for Both {
    fn pick(x: f64, y: f64) -> f64 {
        x.hypot(y) / SQRT_2
    }
}

/// Decides which numeric values a length accepts when parsed.
pub trait Sign {
    fn check(v: f64) -> Result<f64, ValueErrorKind>;
}

#[derive(Debug, PartialEq, Copy, Clone)]
pub struct AnySign;

#[derive(Debug, PartialEq, Copy, Clone)]
pub struct NonNegative;

impl Sign for AnySign {
    fn check(v: f64) -> Result<f64, ValueErrorKind> {
        Ok(v)
    }
}

impl Sign for NonNegative {
    fn check(v: f64) -> Result<f64, ValueErrorKind> {
        if v < 0.0 {
            Err(ValueErrorKind::value_error("value must be non-negative"))
        } else {
            Ok(v)
        }
    }
}

#[derive(Debug, PartialEq, Copy, Clone)]
pub struct CssLength<O: Orientation, S: Sign> {
    pub length: f64,
    pub unit: LengthUnit,
    marker: PhantomData<(O, S)>,
}

/// A length that may be negative, like a coordinate.
pub type Length<O> = CssLength<O, AnySign>;

/// A length that must not be negative, like a width or a radius.
pub type ULength<O> = CssLength<O, NonNegative>;

impl<O: Orientation, S: Sign> Default for CssLength<O, S> {
    fn default() -> Self {
        CssLength::new(0.0, LengthUnit::Px)
    }
}

impl<O: Orientation, S: Sign> Parse for CssLength<O, S> {
    fn parse<'i>(parser: &mut Parser<'i, '_>) -> Result<Self, ParseError<'i>> {
        let token = parser.next()?.clone();

        let (value, unit) = match token {
            Token::Number { value, .. } => (value, LengthUnit::Px),
            Token::Percentage { unit_value, .. } => (unit_value, LengthUnit::Percent),
            Token::Dimension {
                value, ref unit, ..
            } => match LengthUnit::from_suffix(unit) {
                Some(unit) => (value, unit),
                None => return Err(parser.new_unexpected_token_error(token.clone())),
            },
            _ => return Err(parser.new_unexpected_token_error(token)),
        };

        let value = finite_f32(value)
            .map(f64::from)
            .and_then(S::check)
            .map_err(|e| parser.new_custom_error(e))?;

        Ok(CssLength::new(value, unit))
    }
}

impl<O: Orientation, S: Sign> CssLength<O, S> {
    pub fn new(length: f64, unit: LengthUnit) -> Self {
        CssLength {
            length,
            unit,
            marker: PhantomData,
        }
    }

    /// Resolves the length to user-space units.
    ///
    /// Percentages use the viewport in `params`, physical units its DPI, and
    /// font-relative units the computed `font-size` in `values`.
    pub fn to_user(&self, values: &ComputedValues, params: &ViewParams) -> f64 {
        let unit_size = match self.unit {
            LengthUnit::Px => 1.0,
            LengthUnit::Percent => O::pick(params.vbox.width(), params.vbox.height()),
            LengthUnit::Em => em_size(values, params.dpi),
            LengthUnit::Ex => em_size(values, params.dpi) / 2.0,
            LengthUnit::Physical(p) => O::pick(params.dpi.x, params.dpi.y) / p.per_inch(),
        };

        self.length * unit_size
    }
}

fn em_size(values: &ComputedValues, dpi: Dpi) -> f64 {
    let font_size = values.font_size.value();

    // The cascade makes relative sizes absolute unless there was no parent to resolve against.
    let unit_size = match font_size.unit {
        LengthUnit::Px => 1.0,
        LengthUnit::Percent | LengthUnit::Em => INITIAL_FONT_SIZE,
        LengthUnit::Ex => INITIAL_FONT_SIZE / 2.0,
        LengthUnit::Physical(p) => Both::pick(dpi.x, dpi.y) / p.per_inch(),
    };

    font_size.length * unit_size
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float_eq_cairo::ApproxEqCairo;

    fn user(l: f64, unit: LengthUnit, params: &ViewParams) -> (f64, f64, f64) {
        let values = ComputedValues::default();

        (
            Length::<Horizontal>::new(l, unit).to_user(&values, params),
            Length::<Vertical>::new(l, unit).to_user(&values, params),
            Length::<Both>::new(l, unit).to_user(&values, params),
        )
    }

    #[test]
    fn numbers_and_percentages() {
        assert_eq!(
            Length::<Horizontal>::parse_str("-7").unwrap(),
            Length::new(-7.0, LengthUnit::Px)
        );
        assert_eq!(
            Length::<Horizontal>::parse_str("3.5px").unwrap(),
            Length::new(3.5, LengthUnit::Px)
        );
        assert_eq!(
            ULength::<Vertical>::parse_str("25%").unwrap(),
            ULength::new(0.25, LengthUnit::Percent)
        );
    }

    #[test]
    fn unit_suffixes() {
        for (s, unit) in &[
            ("2em", LengthUnit::Em),
            ("2ex", LengthUnit::Ex),
            ("2in", LengthUnit::Physical(PhysicalUnit::In)),
            ("2cm", LengthUnit::Physical(PhysicalUnit::Cm)),
            ("2mm", LengthUnit::Physical(PhysicalUnit::Mm)),
            ("2pt", LengthUnit::Physical(PhysicalUnit::Pt)),
            ("2pc", LengthUnit::Physical(PhysicalUnit::Pc)),
        ] {
            assert_eq!(Length::<Both>::parse_str(s).unwrap(), Length::new(2.0, *unit));
        }
    }

    #[test]
    fn rejects_bad_input() {
        assert!(Length::<Both>::parse_str("").is_err());
        assert!(Length::<Both>::parse_str("10 px").is_err());
        assert!(Length::<Both>::parse_str("3furlongs").is_err());
        assert!(Length::<Both>::parse_str("auto").is_err());
    }

    #[test]
    fn unsigned_lengths_reject_negative_values() {
        assert!(ULength::<Horizontal>::parse_str("-0.5").is_err());
        assert!(ULength::<Horizontal>::parse_str("-1%").is_err());
        assert!(ULength::<Horizontal>::parse_str("0").is_ok());
        assert!(Length::<Horizontal>::parse_str("-0.5").is_ok());
    }

    #[test]
    fn percentages_follow_orientation() {
        let params = ViewParams::new(Dpi::default(), 300.0, 400.0);

        let (h, v, both) = user(0.5, LengthUnit::Percent, &params);
        assert!(h.approx_eq_cairo(150.0));
        assert!(v.approx_eq_cairo(200.0));
        // Half of 500 / √2.
        assert!(both.approx_eq_cairo(250.0 / SQRT_2));
    }

    #[test]
    fn physical_units_follow_dpi() {
        let params = ViewParams::new(Dpi::new(72.0, 144.0), 100.0, 100.0);

        let (h, v, _) = user(1.0, LengthUnit::Physical(PhysicalUnit::In), &params);
        assert!(h.approx_eq_cairo(72.0));
        assert!(v.approx_eq_cairo(144.0));

        let (h, _, _) = user(36.0, LengthUnit::Physical(PhysicalUnit::Pt), &params);
        assert!(h.approx_eq_cairo(36.0));

        let (h, _, _) = user(2.54, LengthUnit::Physical(PhysicalUnit::Cm), &params);
        assert!(h.approx_eq_cairo(72.0));

        let (_, v, _) = user(1.0, LengthUnit::Physical(PhysicalUnit::Pc), &params);
        assert!(v.approx_eq_cairo(24.0));
    }

    #[test]
    fn plain_pixels_ignore_dpi_and_viewport() {
        let params = ViewParams::new(Dpi::new(300.0, 10.0), 1.0, 1000.0);

        assert_eq!(user(8.0, LengthUnit::Px, &params), (8.0, 8.0, 8.0));
    }

    #[test]
    fn font_units_use_default_font_size() {
        let params = ViewParams::new(Dpi::default(), 100.0, 100.0);

        let (h, _, _) = user(2.0, LengthUnit::Em, &params);
        assert!(h.approx_eq_cairo(24.0));

        let (_, v, _) = user(2.0, LengthUnit::Ex, &params);
        assert!(v.approx_eq_cairo(12.0));
    }
}
