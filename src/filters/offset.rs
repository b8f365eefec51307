use crate::attributes::Attributes;
use crate::element::{set_attribute, AttributeErrors, ElementTrait};
use crate::node::Node;
use crate::parsers::ParseValue;

use super::{clip_to_bounds, FilterContext, FilterEffect, FilterError, FilterOutput, Primitive};

/// The `feOffset` filter primitive.
///
/// Its subregion defaults to the bounds of its input.
#[derive(Default)]
pub struct FeOffset {
    base: Primitive,
    dx: f64,
    dy: f64,
}

impl ElementTrait for FeOffset {
    fn set_attributes(&mut self, attrs: &Attributes, errors: &mut AttributeErrors<'_>) {
        self.base.set_attributes(attrs, errors);

        for (attr, value) in attrs.iter() {
            match attr.as_str() {
                "dx" => set_attribute(&mut self.dx, attr.parse(value), errors),
                "dy" => set_attribute(&mut self.dy, attr.parse(value), errors),
                _ => (),
            }
        }
    }
}

impl FilterEffect for FeOffset {
    fn render(
        &self,
        node: &Node,
        ctx: &FilterContext,
        input: &FilterOutput,
    ) -> Result<FilterOutput, FilterError> {
        let (dx, dy) = ctx.paffine().transform_distance(self.dx, self.dy);

        let bounds = self.base.subregion(node, ctx, input.bounds);
        let surface = ctx.new_surface()?;

        {
            let cr = cairo::Context::new(&surface)?;
            clip_to_bounds(&cr, &bounds);

            cr.set_source_surface(&input.surface, dx, dy)?;
            cr.paint()?;
        }

        Ok(FilterOutput { surface, bounds })
    }
}
