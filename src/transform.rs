//! Affine transforms and the `transform` / `gradientTransform` attribute syntax.
//!
//! The syntax follows the [SVG 1.1 transform attribute][spec].
//!
//! [spec]:  https://www.w3.org/TR/SVG11/coords.html#TransformAttribute

use cssparser::{Parser, Token};

use crate::error::*;
use crate::parsers::{optional_comma, Parse};
use crate::rect::Rect;

/// A 2D affine transform, with the same field layout as `cairo::Matrix`.
///
/// A point is transformed as `x' = xx * x + xy * y + x0` and `y' = yx * x + yy * y + y0`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub xx: f64,
    pub yx: f64,
    pub xy: f64,
    pub yy: f64,
    pub x0: f64,
    pub y0: f64,
}

impl Transform {
    #[inline]
    pub fn new_unchecked(xx: f64, yx: f64, xy: f64, yy: f64, x0: f64, y0: f64) -> Self {
        Self {
            xx,
            yx,
            xy,
            yy,
            x0,
            y0,
        }
    }

    #[inline]
    pub fn identity() -> Self {
        Self::new_unchecked(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    #[inline]
    pub fn new_translate(tx: f64, ty: f64) -> Self {
        Self::new_unchecked(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    #[inline]
    pub fn new_scale(sx: f64, sy: f64) -> Self {
        Self::new_unchecked(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    #[inline]
    pub fn new_rotate(degrees: f64) -> Self {
        let (s, c) = degrees.to_radians().sin_cos();
        Self::new_unchecked(c, s, -s, c, 0.0, 0.0)
    }

    #[inline]
    pub fn new_skew(ax_degrees: f64, ay_degrees: f64) -> Self {
        Self::new_unchecked(
            1.0,
            ay_degrees.to_radians().tan(),
            ax_degrees.to_radians().tan(),
            1.0,
            0.0,
            0.0,
        )
    }

    /// Maps the unit square onto `rect`.
    ///
    /// This is the transform for content in `objectBoundingBox` units.
    #[inline]
    pub fn from_unit_square(rect: &Rect) -> Self {
        Self::new_unchecked(rect.width(), 0.0, 0.0, rect.height(), rect.x0, rect.y0)
    }

    /// Returns the transform that applies `t1` first and then `t2`.
    #[must_use]
    pub fn multiply(t1: &Transform, t2: &Transform) -> Self {
        Transform {
            xx: t1.xx * t2.xx + t1.yx * t2.xy,
            yx: t1.xx * t2.yx + t1.yx * t2.yy,
            xy: t1.xy * t2.xx + t1.yy * t2.xy,
            yy: t1.xy * t2.yx + t1.yy * t2.yy,
            x0: t1.x0 * t2.xx + t1.y0 * t2.xy + t2.x0,
            y0: t1.x0 * t2.yx + t1.y0 * t2.yy + t2.y0,
        }
    }

    /// Returns a transform that applies `t` first and then `self`.
    #[inline]
    pub fn pre_transform(&self, t: &Transform) -> Self {
        Self::multiply(t, self)
    }

    /// Returns a transform that applies `self` first and then `t`.
    #[inline]
    pub fn post_transform(&self, t: &Transform) -> Self {
        Self::multiply(self, t)
    }

    #[inline]
    pub fn pre_translate(&self, x: f64, y: f64) -> Self {
        self.pre_transform(&Transform::new_translate(x, y))
    }

    #[inline]
    pub fn pre_scale(&self, sx: f64, sy: f64) -> Self {
        self.pre_transform(&Transform::new_scale(sx, sy))
    }

    #[inline]
    pub fn pre_rotate(&self, degrees: f64) -> Self {
        self.pre_transform(&Transform::new_rotate(degrees))
    }

    #[inline]
    pub fn post_translate(&self, x: f64, y: f64) -> Self {
        self.post_transform(&Transform::new_translate(x, y))
    }

    #[inline]
    fn determinant(&self) -> f64 {
        self.xx * self.yy - self.xy * self.yx
    }

    #[inline]
    pub fn is_invertible(&self) -> bool {
        let det = self.determinant();

        det != 0.0 && det.is_finite()
    }

    #[must_use]
    pub fn invert(&self) -> Option<Self> {
        let det = self.determinant();

        if det == 0.0 || !det.is_finite() {
            return None;
        }

        let inv_det = 1.0 / det;

        Some(Transform::new_unchecked(
            inv_det * self.yy,
            inv_det * (-self.yx),
            inv_det * (-self.xy),
            inv_det * self.xx,
            inv_det * (self.xy * self.y0 - self.yy * self.x0),
            inv_det * (self.yx * self.x0 - self.xx * self.y0),
        ))
    }

    #[inline]
    pub fn transform_distance(&self, dx: f64, dy: f64) -> (f64, f64) {
        (dx * self.xx + dy * self.xy, dx * self.yx + dy * self.yy)
    }

    #[inline]
    pub fn transform_point(&self, px: f64, py: f64) -> (f64, f64) {
        let (x, y) = self.transform_distance(px, py);
        (x + self.x0, y + self.y0)
    }

    /// Transforms the four corners of `rect` and returns their bounding rectangle.
    pub fn transform_rect(&self, rect: &Rect) -> Rect {
        let points = [
            self.transform_point(rect.x0, rect.y0),
            self.transform_point(rect.x1, rect.y0),
            self.transform_point(rect.x0, rect.y1),
            self.transform_point(rect.x1, rect.y1),
        ];

        let (x, y) = points[0];
        let first = Rect::new(x, y, x, y);

        points[1..]
            .iter()
            .fold(first, |r, &(x, y)| r.union(&Rect::new(x, y, x, y)))
    }
}

impl Default for Transform {
    #[inline]
    fn default() -> Transform {
        Transform::identity()
    }
}

impl From<cairo::Matrix> for Transform {
    #[inline]
    fn from(m: cairo::Matrix) -> Self {
        Self::new_unchecked(m.xx(), m.yx(), m.xy(), m.yy(), m.x0(), m.y0())
    }
}

impl From<Transform> for cairo::Matrix {
    #[inline]
    fn from(t: Transform) -> Self {
        Self::new(t.xx, t.yx, t.xy, t.yy, t.x0, t.y0)
    }
}

impl Parse for Transform {
    fn parse<'i>(parser: &mut Parser<'i, '_>) -> Result<Transform, ParseError<'i>> {
        let loc = parser.current_source_location();

        let t = parse_transform_list(parser)?;

        if !t.is_invertible() {
            return Err(loc.new_custom_error(ValueErrorKind::Value(
                "invalid transformation matrix".to_string(),
            )));
        }

        Ok(t)
    }
}

fn parse_transform_list<'i>(parser: &mut Parser<'i, '_>) -> Result<Transform, ParseError<'i>> {
    let mut t = Transform::identity();

    while !parser.is_exhausted() {
        t = parse_transform_command(parser)?.post_transform(&t);
        optional_comma(parser);
    }

    Ok(t)
}

fn parse_transform_command<'i>(parser: &mut Parser<'i, '_>) -> Result<Transform, ParseError<'i>> {
    let loc = parser.current_source_location();

    match parser.next()?.clone() {
        Token::Function(ref name) => parse_transform_function(name, parser),

        Token::Ident(ref name) => {
            parser.expect_parenthesis_block()?;
            parse_transform_function(name, parser)
        }

        tok => Err(loc.new_unexpected_token_error(tok)),
    }
}

fn parse_transform_function<'i>(
    name: &str,
    parser: &mut Parser<'i, '_>,
) -> Result<Transform, ParseError<'i>> {
    let loc = parser.current_source_location();

    match name {
        "matrix" => parser.parse_nested_block(|p| {
            let mut v = [0.0; 6];

            for (i, n) in v.iter_mut().enumerate() {
                if i > 0 {
                    optional_comma(p);
                }
                *n = f64::parse(p)?;
            }

            Ok(Transform::new_unchecked(v[0], v[1], v[2], v[3], v[4], v[5]))
        }),

        "translate" => parser.parse_nested_block(|p| {
            let tx = f64::parse(p)?;
            let ty = optional_second_number(p).unwrap_or(0.0);

            Ok(Transform::new_translate(tx, ty))
        }),

        "scale" => parser.parse_nested_block(|p| {
            let x = f64::parse(p)?;
            let y = optional_second_number(p).unwrap_or(x);

            Ok(Transform::new_scale(x, y))
        }),

        "rotate" => parser.parse_nested_block(|p| {
            let angle = f64::parse(p)?;

            let (cx, cy) = p
                .try_parse(|p| -> Result<_, ParseError<'_>> {
                    optional_comma(p);
                    let cx = f64::parse(p)?;

                    optional_comma(p);
                    let cy = f64::parse(p)?;

                    Ok((cx, cy))
                })
                .unwrap_or((0.0, 0.0));

            Ok(Transform::new_translate(cx, cy)
                .pre_rotate(angle)
                .pre_translate(-cx, -cy))
        }),

        "skewX" => parser.parse_nested_block(|p| Ok(Transform::new_skew(f64::parse(p)?, 0.0))),

        "skewY" => parser.parse_nested_block(|p| Ok(Transform::new_skew(0.0, f64::parse(p)?))),

        _ => Err(loc.new_custom_error(ValueErrorKind::parse_error(
            "expected matrix|translate|scale|rotate|skewX|skewY",
        ))),
    }
}

fn optional_second_number(parser: &mut Parser<'_, '_>) -> Option<f64> {
    parser
        .try_parse(|p| {
            optional_comma(p);
            f64::parse(p)
        })
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::ApproxEq;

    fn rotation_transform(deg: f64, tx: f64, ty: f64) -> Transform {
        Transform::new_translate(tx, ty)
            .pre_rotate(deg)
            .pre_translate(-tx, -ty)
    }

    fn parse_transform(s: &str) -> Result<Transform, ParseError<'_>> {
        Transform::parse_str(s)
    }

    fn assert_transform_eq(t1: &Transform, t2: &Transform) {
        let epsilon = 8.0 * f64::EPSILON; // kind of arbitrary, but allow for some sloppiness

        assert!(t1.xx.approx_eq(t2.xx, (epsilon, 1)));
        assert!(t1.yx.approx_eq(t2.yx, (epsilon, 1)));
        assert!(t1.xy.approx_eq(t2.xy, (epsilon, 1)));
        assert!(t1.yy.approx_eq(t2.yy, (epsilon, 1)));
        assert!(t1.x0.approx_eq(t2.x0, (epsilon, 1)));
        assert!(t1.y0.approx_eq(t2.y0, (epsilon, 1)));
    }

    #[test]
    fn multiply_applies_first_argument_first() {
        let t1 = Transform::new_unchecked(0.5, 0.0, 0.0, 0.5, 10.0, 10.0);
        let t2 = Transform::new_translate(-10.0, -10.0);

        assert_transform_eq(
            &Transform::multiply(&t1, &t2),
            &Transform::new_scale(0.5, 0.5),
        );
        assert_transform_eq(
            &Transform::multiply(&t2, &t1),
            &Transform::new_unchecked(0.5, 0.0, 0.0, 0.5, 5.0, 5.0),
        );
    }

    #[test]
    fn inverts() {
        assert!(Transform::new_unchecked(2.0, 0.0, 0.0, 0.0, 0.0, 0.0)
            .invert()
            .is_none());

        let t = Transform::new_unchecked(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        let i = t.invert().unwrap();
        assert_transform_eq(&t.pre_transform(&i), &Transform::identity());
        assert_transform_eq(&t.post_transform(&i), &Transform::identity());
    }

    #[test]
    fn transforms_rect_corners() {
        let t = Transform::new_rotate(90.0);
        let r = t.transform_rect(&Rect::new(0.0, 0.0, 10.0, 20.0));

        assert!(r.approx_eq(&Rect::new(-20.0, 0.0, 0.0, 10.0)));
    }

    #[test]
    fn maps_unit_square_to_rect() {
        let t = Transform::from_unit_square(&Rect::new(10.0, 20.0, 30.0, 60.0));

        assert_eq!(t.transform_point(0.0, 0.0), (10.0, 20.0));
        assert_eq!(t.transform_point(1.0, 1.0), (30.0, 60.0));
    }

    #[test]
    fn converts_to_and_from_cairo() {
        let t = Transform::new_unchecked(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        let m = cairo::Matrix::from(t);

        assert_eq!(Transform::from(m), t);
    }

    #[test]
    fn parses_transform_list() {
        let t = Transform::new_translate(20.0, 30.0);
        let s = Transform::new_scale(10.0, 10.0);
        let r = rotation_transform(30.0, 10.0, 10.0);

        assert_transform_eq(
            &parse_transform("scale(10)rotate(30, 10, 10)").unwrap(),
            &Transform::multiply(&r, &s),
        );

        let a = Transform::multiply(&s, &t);
        assert_transform_eq(
            &parse_transform("translate(20, 30), scale (10) rotate (30 10 10)").unwrap(),
            &Transform::multiply(&r, &a),
        );
    }

    #[test]
    fn parses_single_functions() {
        assert_transform_eq(
            &parse_transform("matrix(1,2,3,4 5 6)").unwrap(),
            &Transform::new_unchecked(1.0, 2.0, 3.0, 4.0, 5.0, 6.0),
        );
        assert_transform_eq(
            &parse_transform("translate(-1)").unwrap(),
            &Transform::new_translate(-1.0, 0.0),
        );
        assert_transform_eq(
            &parse_transform("scale(-1, -2)").unwrap(),
            &Transform::new_scale(-1.0, -2.0),
        );
        assert_transform_eq(
            &parse_transform("skewX (30)").unwrap(),
            &Transform::new_skew(30.0, 0.0),
        );
        assert_transform_eq(&parse_transform("").unwrap(), &Transform::identity());
    }

    #[test]
    fn rejects_bad_syntax_and_singular_matrices() {
        assert!(parse_transform("foo").is_err());
        assert!(parse_transform("matrix (1 2 3 4 5)").is_err());
        assert!(parse_transform("translate (1,)").is_err());
        assert!(parse_transform("skewY ()").is_err());
        assert!(parse_transform("scale (0), translate (10, 10)").is_err());
    }
}
