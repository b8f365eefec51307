use crate::attributes::Attributes;
use crate::color::{resolve_color, with_opacity};
use crate::element::{AttributeErrors, ElementTrait};
use crate::node::{Node, NodeBorrow};

use super::{clip_to_bounds, FilterContext, FilterEffect, FilterError, FilterOutput, Primitive};

/// The `feFlood` filter primitive.
///
/// It fills its subregion with `flood-color` at `flood-opacity`, and ignores its input.
#[derive(Default)]
pub struct FeFlood {
    base: Primitive,
}

impl ElementTrait for FeFlood {
    fn set_attributes(&mut self, attrs: &Attributes, errors: &mut AttributeErrors<'_>) {
        self.base.set_attributes(attrs, errors);
    }
}

impl FilterEffect for FeFlood {
    fn render(
        &self,
        node: &Node,
        ctx: &FilterContext,
        _input: &FilterOutput,
    ) -> Result<FilterOutput, FilterError> {
        let rgba = {
            let elt = node.borrow_element();
            let values = elt.get_computed_values();

            with_opacity(
                resolve_color(&values.flood_color.0, values.color.0),
                u8::from(values.flood_opacity.0),
            )
        };

        let bounds = self.base.subregion(node, ctx, ctx.effects_region());
        let surface = ctx.new_surface()?;

        {
            let cr = cairo::Context::new(&surface)?;
            clip_to_bounds(&cr, &bounds);

            cr.set_source_rgba(
                f64::from(rgba.red) / 255.0,
                f64::from(rgba.green) / 255.0,
                f64::from(rgba.blue) / 255.0,
                f64::from(rgba.alpha) / 255.0,
            );
            cr.paint()?;
        }

        Ok(FilterOutput { surface, bounds })
    }
}
