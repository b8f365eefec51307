//! Filter primitives and the context they are rendered in.

use crate::attributes::Attributes;
use crate::drawing_ctx::ViewParams;
use crate::element::{set_attribute, AttributeErrors};
use crate::length::*;
use crate::node::{Node, NodeBorrow};
use crate::parsers::ParseValue;
use crate::rect::Rect;
use crate::transform::Transform;

pub mod error;
pub mod flood;
pub mod offset;
pub mod tile;

pub use self::error::FilterError;

/// Everything a primitive needs to know about the filter that contains it.
///
/// All surfaces involved in a filter have the size of the canvas, and regions are
/// expressed in canvas pixels.
pub struct FilterContext {
    /// Size of every intermediate surface.
    width: i32,
    height: i32,

    /// The filter effects region, in canvas space, on whole pixels.
    effects_region: Rect,

    /// Maps `primitiveUnits` coordinates to canvas space.
    paffine: Transform,

    /// Viewport for percentages in primitive attributes, already in `primitiveUnits`.
    params: ViewParams,
}

/// What a primitive produced.
pub struct FilterOutput {
    pub surface: cairo::ImageSurface,

    /// The primitive subregion; nothing outside of it was drawn.
    pub bounds: Rect,
}

impl FilterContext {
    /// Creates a context; `effects_region` gets rounded out to whole pixels and clipped
    /// to the surface size.
    pub fn new(
        width: i32,
        height: i32,
        effects_region: Rect,
        paffine: Transform,
        params: ViewParams,
    ) -> FilterContext {
        let canvas = Rect::from_size(f64::from(width), f64::from(height));

        FilterContext {
            width,
            height,
            effects_region: pixel_bounds(&effects_region)
                .intersection(&canvas)
                .unwrap_or_default(),
            paffine,
            params,
        }
    }

    #[inline]
    pub fn effects_region(&self) -> Rect {
        self.effects_region
    }

    /// Returns the transform from `primitiveUnits` to canvas space.
    #[inline]
    pub fn paffine(&self) -> Transform {
        self.paffine
    }

    /// Creates a transparent surface for a primitive's output.
    pub fn new_surface(&self) -> Result<cairo::ImageSurface, FilterError> {
        Ok(cairo::ImageSurface::create(
            cairo::Format::ARgb32,
            self.width,
            self.height,
        )?)
    }
}

/// Limits drawing on `cr` to `bounds`.
pub fn clip_to_bounds(cr: &cairo::Context, bounds: &Rect) {
    cr.rectangle(bounds.x0, bounds.y0, bounds.width(), bounds.height());
    cr.clip();
}

/// Smallest rectangle on whole pixels that contains `r`.
fn pixel_bounds(r: &Rect) -> Rect {
    Rect::new(r.x0.floor(), r.y0.floor(), r.x1.ceil(), r.y1.ceil())
}

/// The `x`, `y`, `width`, `height` attributes that every primitive accepts.
///
/// They are in `primitiveUnits`.  Unset ones take their value from a default region,
/// which depends on the primitive.
#[derive(Default)]
pub struct Primitive {
    x: Option<Length<Horizontal>>,
    y: Option<Length<Vertical>>,
    width: Option<ULength<Horizontal>>,
    height: Option<ULength<Vertical>>,
}

impl Primitive {
    pub fn set_attributes(&mut self, attrs: &Attributes, errors: &mut AttributeErrors<'_>) {
        for (attr, value) in attrs.iter() {
            match attr.as_str() {
                "x" => set_attribute(&mut self.x, attr.parse(value), errors),
                "y" => set_attribute(&mut self.y, attr.parse(value), errors),
                "width" => set_attribute(&mut self.width, attr.parse(value), errors),
                "height" => set_attribute(&mut self.height, attr.parse(value), errors),
                _ => (),
            }
        }
    }

    /// Computes the primitive subregion in canvas pixels, clipped to the effects region.
    ///
    /// `default` is in canvas space; it is used as is when none of the attributes is set.
    pub fn subregion(&self, node: &Node, ctx: &FilterContext, default: Rect) -> Rect {
        let is_set = self.x.is_some()
            || self.y.is_some()
            || self.width.is_some()
            || self.height.is_some();

        let region = match ctx.paffine.invert() {
            Some(inverse) if is_set => {
                let elt = node.borrow_element();
                let values = elt.get_computed_values();
                let params = &ctx.params;

                let r = inverse.transform_rect(&default);

                let x = self.x.map_or(r.x0, |l| l.to_user(values, params));
                let y = self.y.map_or(r.y0, |l| l.to_user(values, params));
                let w = self.width.map_or(r.width(), |l| l.to_user(values, params));
                let h = self.height.map_or(r.height(), |l| l.to_user(values, params));

                ctx.paffine.transform_rect(&Rect::new(x, y, x + w, y + h))
            }

            _ => default,
        };

        pixel_bounds(&region)
            .intersection(&ctx.effects_region)
            .unwrap_or_default()
    }
}

/// A filter primitive interface.
pub trait FilterEffect {
    /// Renders the primitive, taking the previous primitive's result as `input`.
    ///
    /// The first primitive in a filter gets the filtered element's rendering, with
    /// the effects region as its bounds.
    fn render(
        &self,
        node: &Node,
        ctx: &FilterContext,
        input: &FilterOutput,
    ) -> Result<FilterOutput, FilterError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dpi::Dpi;
    use crate::element::Element;
    use crate::session::Session;

    fn context(paffine: Transform) -> FilterContext {
        FilterContext::new(
            20,
            20,
            Rect::new(1.5, 2.0, 18.2, 17.0),
            paffine,
            ViewParams::new(Dpi::default(), 100.0, 100.0),
        )
    }

    fn primitive(attrs: &[(&str, &str)]) -> (Primitive, Node) {
        let session = Session::new_for_test_suite();
        let attrs = Attributes::from(attrs);

        let mut primitive = Primitive::default();
        let mut errors = AttributeErrors::new(&session);
        primitive.set_attributes(&attrs, &mut errors);
        assert!(errors.into_vec().is_empty());

        let node = Node::new(Element::new(&session, "feFlood", &attrs));

        (primitive, node)
    }

    #[test]
    fn effects_region_is_on_whole_pixels_inside_the_canvas() {
        let ctx = FilterContext::new(
            10,
            10,
            Rect::new(-3.0, 0.5, 8.5, 30.0),
            Transform::identity(),
            ViewParams::new(Dpi::default(), 10.0, 10.0),
        );

        assert_eq!(ctx.effects_region(), Rect::new(0.0, 0.0, 9.0, 10.0));
    }

    #[test]
    fn unset_subregion_uses_default() {
        let ctx = context(Transform::identity());
        let (p, node) = primitive(&[]);

        assert_eq!(
            p.subregion(&node, &ctx, ctx.effects_region()),
            Rect::new(1.0, 2.0, 19.0, 17.0)
        );
        assert_eq!(
            p.subregion(&node, &ctx, Rect::new(4.0, 4.0, 6.5, 6.0)),
            Rect::new(4.0, 4.0, 7.0, 6.0)
        );
    }

    #[test]
    fn subregion_attributes_are_in_primitive_units() {
        let ctx = context(Transform::new_translate(2.0, 0.0).pre_scale(2.0, 2.0));
        let (p, node) = primitive(&[("x", "1"), ("width", "3")]);

        // y and height come from the default, through the primitive space.
        assert_eq!(
            p.subregion(&node, &ctx, Rect::new(0.0, 4.0, 20.0, 10.0)),
            Rect::new(4.0, 4.0, 10.0, 10.0)
        );
    }

    #[test]
    fn negative_subregion_size_is_an_error() {
        let session = Session::new_for_test_suite();
        let mut errors = AttributeErrors::new(&session);

        let mut p = Primitive::default();
        p.set_attributes(&Attributes::from(&[("width", "-1")][..]), &mut errors);

        assert_eq!(errors.into_vec().len(), 1);
        assert!(p.width.is_none());
    }

    #[test]
    fn subregion_is_clipped_to_effects_region() {
        let ctx = context(Transform::identity());
        let (p, node) = primitive(&[("x", "-5"), ("y", "-5"), ("width", "10"), ("height", "100")]);

        assert_eq!(
            p.subregion(&node, &ctx, ctx.effects_region()),
            Rect::new(1.0, 2.0, 5.0, 17.0)
        );
    }
}
