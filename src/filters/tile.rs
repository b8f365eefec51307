use crate::attributes::Attributes;
use crate::element::{AttributeErrors, ElementTrait};
use crate::node::Node;

use super::{clip_to_bounds, FilterContext, FilterEffect, FilterError, FilterOutput, Primitive};

/// The `feTile` filter primitive.
///
/// It repeats the part of its input inside the input's bounds over its own subregion.
/// The input does not affect the default subregion, which is the effects region.
#[derive(Default)]
pub struct FeTile {
    base: Primitive,
}

impl ElementTrait for FeTile {
    fn set_attributes(&mut self, attrs: &Attributes, errors: &mut AttributeErrors<'_>) {
        self.base.set_attributes(attrs, errors);
    }
}

impl FilterEffect for FeTile {
    fn render(
        &self,
        node: &Node,
        ctx: &FilterContext,
        input: &FilterOutput,
    ) -> Result<FilterOutput, FilterError> {
        let bounds = self.base.subregion(node, ctx, ctx.effects_region());
        let surface = ctx.new_surface()?;

        let tile_rect = input.bounds;

        if tile_rect.is_empty() {
            return Ok(FilterOutput { surface, bounds });
        }

        // Bounds are on whole pixels, so this is exact.
        let tile = cairo::ImageSurface::create(
            cairo::Format::ARgb32,
            tile_rect.width() as i32,
            tile_rect.height() as i32,
        )?;

        {
            let cr = cairo::Context::new(&tile)?;
            cr.set_source_surface(&input.surface, -tile_rect.x0, -tile_rect.y0)?;
            cr.paint()?;
        }

        {
            let cr = cairo::Context::new(&surface)?;
            clip_to_bounds(&cr, &bounds);

            let pattern = cairo::SurfacePattern::create(&tile);
            pattern.set_extend(cairo::Extend::Repeat);
            pattern.set_matrix(cairo::Matrix::new(
                1.0,
                0.0,
                0.0,
                1.0,
                -tile_rect.x0,
                -tile_rect.y0,
            ));

            cr.set_source(&pattern)?;
            cr.paint()?;
        }

        Ok(FilterOutput { surface, bounds })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dpi::Dpi;
    use crate::drawing_ctx::ViewParams;
    use crate::element::Element;
    use crate::node::NodeBorrow;
    use crate::rect::Rect;
    use crate::session::Session;
    use crate::surface_utils::{ImageSurfaceDataExt, Pixel};
    use crate::transform::Transform;

    fn render(attrs: &[(&str, &str)], input: &FilterOutput) -> FilterOutput {
        let node = Node::new(Element::new(
            &Session::new_for_test_suite(),
            "feTile",
            &Attributes::from(attrs),
        ));

        let ctx = FilterContext::new(
            8,
            8,
            Rect::from_size(8.0, 8.0),
            Transform::identity(),
            ViewParams::new(Dpi::default(), 8.0, 8.0),
        );

        let elt = node.borrow_element();
        let effect = elt.as_filter_effect().unwrap();
        effect.render(&node, &ctx, input).unwrap()
    }

    // A 2x2 tile at (2, 2) whose top-left pixel is opaque.
    fn input() -> FilterOutput {
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 8, 8).unwrap();
        {
            let cr = cairo::Context::new(&surface).unwrap();
            cr.rectangle(2.0, 2.0, 1.0, 1.0);
            cr.fill().unwrap();
        }

        FilterOutput {
            surface,
            bounds: Rect::new(2.0, 2.0, 4.0, 4.0),
        }
    }

    #[test]
    fn repeats_input_bounds_over_effects_region() {
        let output = render(&[], &input());
        assert_eq!(output.bounds, Rect::from_size(8.0, 8.0));

        let mut surface = output.surface;
        let stride = surface.stride() as usize;
        let data = surface.data().unwrap();

        let black = Pixel::new(0, 0, 0, 255);
        let clear = Pixel::new(0, 0, 0, 0);

        // Tiles are aligned to the input's bounds, so they start at even pixels.
        for (x, y) in [(0, 0), (2, 2), (6, 0), (4, 6)] {
            assert_eq!(data.get_pixel(stride, x, y), black);
        }

        for (x, y) in [(1, 0), (3, 3), (7, 6), (4, 5)] {
            assert_eq!(data.get_pixel(stride, x, y), clear);
        }
    }

    #[test]
    fn only_fills_its_subregion() {
        let output = render(&[("x", "4"), ("width", "4")], &input());
        assert_eq!(output.bounds, Rect::new(4.0, 0.0, 8.0, 8.0));

        let mut surface = output.surface;
        let stride = surface.stride() as usize;
        let data = surface.data().unwrap();

        assert_eq!(data.get_pixel(stride, 0, 0).a, 0);
        assert_eq!(data.get_pixel(stride, 2, 2).a, 0);
        assert_eq!(data.get_pixel(stride, 4, 4).a, 255);
    }

    #[test]
    fn empty_input_bounds_produce_transparent_output() {
        let mut input = input();
        input.bounds = Rect::default();

        let output = render(&[], &input);

        let mut surface = output.surface;
        let stride = surface.stride() as usize;
        let data = surface.data().unwrap();
        assert_eq!(data.get_pixel(stride, 2, 2).a, 0);
    }
}
