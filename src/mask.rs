//! The `mask` element, and generation of luminance masks.

use crate::attributes::Attributes;
use crate::bbox::BoundingBox;
use crate::coord_units::CoordUnits;
use crate::drawing_ctx::{DrawingCtx, ViewParams};
use crate::element::{set_attribute, AttributeErrors, ElementTrait};
use crate::error::RenderingError;
use crate::length::*;
use crate::node::{Node, NodeBorrow};
use crate::parsers::ParseValue;
use crate::properties::ComputedValues;
use crate::rect::Rect;
use crate::surface_utils;
use crate::transform::Transform;

coord_units!(MaskUnits, CoordUnits::ObjectBoundingBox);
coord_units!(MaskContentUnits, CoordUnits::UserSpaceOnUse);

pub struct Mask {
    x: Length<Horizontal>,
    y: Length<Vertical>,
    width: ULength<Horizontal>,
    height: ULength<Vertical>,

    units: MaskUnits,
    content_units: MaskContentUnits,
}

impl Default for Mask {
    fn default() -> Mask {
        Mask {
            x: Length::<Horizontal>::new(-0.1, LengthUnit::Percent),
            y: Length::<Vertical>::new(-0.1, LengthUnit::Percent),
            width: ULength::<Horizontal>::new(1.2, LengthUnit::Percent),
            height: ULength::<Vertical>::new(1.2, LengthUnit::Percent),

            units: MaskUnits::default(),
            content_units: MaskContentUnits::default(),
        }
    }
}

impl Mask {
    pub fn get_units(&self) -> CoordUnits {
        CoordUnits::from(self.units)
    }

    pub fn get_content_units(&self) -> CoordUnits {
        CoordUnits::from(self.content_units)
    }

    fn get_rect(&self, values: &ComputedValues, params: &ViewParams) -> Rect {
        let x = self.x.to_user(values, params);
        let y = self.y.to_user(values, params);
        let w = self.width.to_user(values, params);
        let h = self.height.to_user(values, params);

        Rect::new(x, y, x + w, y + h)
    }

    /// Renders the mask's children and turns the result into an alpha-only mask.
    ///
    /// `affine` and `bbox` are the user space and the bounding box of the element being
    /// masked; `opacity` is that element's opacity, which gets folded into the mask.  The
    /// returned surface is canvas-sized, to be used at the current offset.
    pub fn generate_cairo_mask(
        &self,
        mask_node: &Node,
        affine: &Transform,
        bbox: &BoundingBox,
        opacity: u8,
        draw_ctx: &mut DrawingCtx<'_>,
    ) -> Result<cairo::ImageSurface, RenderingError> {
        let (width, height) = draw_ctx.canvas_size()?;

        let mut surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height)
            .map_err(|e| {
                RenderingError::OutOfMemory(format!("could not create mask surface: {}", e))
            })?;

        let mask_units = self.get_units();
        let content_units = self.get_content_units();

        let bbox_rect = bbox.rect.filter(|r| !r.is_empty());

        // Nothing can be masked relative to an empty box, so nothing shows through.
        if bbox_rect.is_none()
            && (mask_units == CoordUnits::ObjectBoundingBox
                || content_units == CoordUnits::ObjectBoundingBox)
        {
            return Ok(surface);
        }

        let elt = mask_node.borrow_element();
        let values = elt.get_computed_values();

        let rect = {
            let params = draw_ctx.get_view_params().with_units(mask_units);
            self.get_rect(values, &params)
        };

        let (clip_rect, content_transform) = match bbox_rect {
            Some(r) => {
                let bbox_transform = Transform::from_unit_square(&r);

                let clip_rect = match mask_units {
                    CoordUnits::ObjectBoundingBox => bbox_transform.transform_rect(&rect),
                    CoordUnits::UserSpaceOnUse => rect,
                };

                let content_transform = match content_units {
                    CoordUnits::ObjectBoundingBox => Some(bbox_transform),
                    CoordUnits::UserSpaceOnUse => None,
                };

                (clip_rect, content_transform)
            }

            None => (rect, None),
        };

        let mask_cr = cairo::Context::new(&surface)?;
        mask_cr.set_matrix(draw_ctx.canvas_transform(affine).into());
        clip_to_rectangle(&mask_cr, &clip_rect);

        draw_ctx
            .cr_stack
            .push(std::mem::replace(&mut draw_ctx.cr, mask_cr));

        let res = draw_ctx.without_drawsub_stack(|dc| {
            dc.with_saved_bboxes(|dc| {
                dc.with_saved_transform(content_transform, |dc| {
                    if content_units == CoordUnits::ObjectBoundingBox {
                        dc.push_view_box(1.0, 1.0);
                    }

                    let res = dc.with_discrete_layer(values, false, |dc| {
                        dc.draw_children(mask_node, false)
                    });

                    if content_units == CoordUnits::ObjectBoundingBox {
                        dc.pop_view_box();
                    }

                    res
                })
            })
        });

        // This drops mask_cr, so that we can get at the surface's pixels.
        draw_ctx.cr = match draw_ctx.cr_stack.pop() {
            Some(cr) => cr,
            None => panic!("cr_stack is empty after drawing a mask"),
        };

        res?;

        surface_utils::luminance_to_alpha(&mut surface, opacity)?;

        Ok(surface)
    }
}

fn clip_to_rectangle(cr: &cairo::Context, r: &Rect) {
    cr.rectangle(r.x0, r.y0, r.width(), r.height());
    cr.clip();
}

impl ElementTrait for Mask {
    fn set_attributes(&mut self, attrs: &Attributes, errors: &mut AttributeErrors<'_>) {
        for (attr, value) in attrs.iter() {
            match attr.as_str() {
                "x" => set_attribute(&mut self.x, attr.parse(value), errors),
                "y" => set_attribute(&mut self.y, attr.parse(value), errors),
                "width" => set_attribute(&mut self.width, attr.parse(value), errors),
                "height" => set_attribute(&mut self.height, attr.parse(value), errors),
                "maskUnits" => set_attribute(&mut self.units, attr.parse(value), errors),
                "maskContentUnits" => {
                    set_attribute(&mut self.content_units, attr.parse(value), errors)
                }
                _ => (),
            }
        }
    }
}
