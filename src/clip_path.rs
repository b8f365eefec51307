//! The `clipPath` element.

use crate::attributes::Attributes;
use crate::bbox::BoundingBox;
use crate::coord_units::CoordUnits;
use crate::drawing_ctx::DrawingCtx;
use crate::element::{set_attribute, AttributeErrors, ElementTrait};
use crate::error::RenderingError;
use crate::node::Node;
use crate::parsers::ParseValue;
use crate::transform::Transform;

coord_units!(ClipPathUnits, CoordUnits::UserSpaceOnUse);

#[derive(Default)]
pub struct ClipPath {
    units: ClipPathUnits,
}

impl ClipPath {
    pub fn get_units(&self) -> CoordUnits {
        CoordUnits::from(self.units)
    }

    /// Intersects the clip of the current target with the union of the clip path's
    /// children.
    ///
    /// `affine` is the user space of the element being clipped, and `bbox` its bounding
    /// box in that space; the latter is only used for `objectBoundingBox` units, which
    /// are skipped if the box is empty.
    pub fn to_cairo_context(
        clip_node: &Node,
        affine: &Transform,
        bbox: &BoundingBox,
        draw_ctx: &mut DrawingCtx<'_>,
    ) -> Result<(), RenderingError> {
        let units = borrow_element_as!(clip_node, ClipPath).get_units();

        let bbox_transform = match units.to_user_space(bbox) {
            Some(t) => t,
            None => return Ok(()),
        };

        let cr = draw_ctx.get_cairo_context();
        let orig_matrix = cr.matrix();

        cr.set_matrix((*affine).into());
        cr.new_path();

        let res = draw_ctx.with_saved_bboxes(|dc| {
            dc.without_drawsub_stack(|dc| {
                dc.with_saved_transform(Some(bbox_transform), |dc| match units {
                    CoordUnits::ObjectBoundingBox => {
                        dc.with_view_box(1.0, 1.0, |dc| dc.draw_children(clip_node, true))
                    }
                    CoordUnits::UserSpaceOnUse => dc.draw_children(clip_node, true),
                })
            })
        });

        cr.set_matrix(orig_matrix);
        cr.clip();

        res
    }
}

impl ElementTrait for ClipPath {
    fn set_attributes(&mut self, attrs: &Attributes, errors: &mut AttributeErrors<'_>) {
        for (attr, value) in attrs.iter() {
            if attr.as_str() == "clipPathUnits" {
                set_attribute(&mut self.units, attr.parse(value), errors);
            }
        }
    }
}
