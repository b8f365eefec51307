//! Structural elements in SVG: the `g`, `svg` and `use` elements, and non-rendering containers.

use crate::attributes::Attributes;
use crate::document::NodeId;
use crate::drawing_ctx::{DrawingCtx, ViewParams};
use crate::element::{set_attribute, AttributeErrors, ElementTrait};
use crate::error::*;
use crate::length::*;
use crate::node::Node;
use crate::parsers::ParseValue;
use crate::properties::ComputedValues;
use crate::transform::Transform;
use crate::viewbox::ViewBox;

#[derive(Default)]
pub struct Group();

impl ElementTrait for Group {
    fn draw(
        &self,
        node: &Node,
        values: &ComputedValues,
        draw_ctx: &mut DrawingCtx<'_>,
        clipping: bool,
    ) -> Result<(), RenderingError> {
        draw_ctx.with_discrete_layer(values, clipping, |dc| dc.draw_children(node, clipping))
    }
}

/// A no-op node that does not render anything
///
/// Sometimes we just need a node that can contain children, but doesn't
/// render itself or its children.  This is just that kind of node.
#[derive(Default)]
pub struct NonRendering;

impl ElementTrait for NonRendering {}

/// The `<svg>` element.
pub struct Svg {
    x: Length<Horizontal>,
    y: Length<Vertical>,
    width: ULength<Horizontal>,
    height: ULength<Vertical>,
    vbox: Option<ViewBox>,
}

impl Default for Svg {
    fn default() -> Svg {
        Svg {
            x: Default::default(),
            y: Default::default(),
            width: ULength::<Horizontal>::new(1.0, LengthUnit::Percent),
            height: ULength::<Vertical>::new(1.0, LengthUnit::Percent),
            vbox: None,
        }
    }
}

impl Svg {
    pub fn get_viewbox(&self) -> Option<ViewBox> {
        self.vbox
    }

    /// The `width` and `height`, resolved against `params`.
    pub fn get_size(&self, values: &ComputedValues, params: &ViewParams) -> (f64, f64) {
        (
            self.width.to_user(values, params),
            self.height.to_user(values, params),
        )
    }

    /// Transform from the element's contents to its parent's user space, and the size of
    /// the viewport the contents see.  `None` if nothing should be rendered.
    fn viewport(
        &self,
        node: &Node,
        values: &ComputedValues,
        params: &ViewParams,
    ) -> Option<(Transform, f64, f64)> {
        // The outermost svg fills the canvas, whose size is the initial viewport.
        let (x, y, w, h) = if node.parent().is_some() {
            let (w, h) = self.get_size(values, params);
            (self.x.to_user(values, params), self.y.to_user(values, params), w, h)
        } else {
            (0.0, 0.0, params.vbox.width(), params.vbox.height())
        };

        match self.vbox {
            Some(vbox) => vbox
                .transform_to(w, h)
                .map(|t| (t.post_translate(x, y), vbox.width(), vbox.height())),

            None => Some((Transform::new_translate(x, y), w, h)),
        }
    }
}

impl ElementTrait for Svg {
    fn set_attributes(&mut self, attrs: &Attributes, errors: &mut AttributeErrors<'_>) {
        for (attr, value) in attrs.iter() {
            match attr.as_str() {
                "x" => set_attribute(&mut self.x, attr.parse(value), errors),
                "y" => set_attribute(&mut self.y, attr.parse(value), errors),
                "width" => set_attribute(&mut self.width, attr.parse(value), errors),
                "height" => set_attribute(&mut self.height, attr.parse(value), errors),
                "viewBox" => set_attribute(&mut self.vbox, attr.parse(value), errors),
                _ => (),
            }
        }
    }

    fn draw(
        &self,
        node: &Node,
        values: &ComputedValues,
        draw_ctx: &mut DrawingCtx<'_>,
        clipping: bool,
    ) -> Result<(), RenderingError> {
        let (transform, vw, vh) = match self.viewport(node, values, &draw_ctx.get_view_params()) {
            Some(v) => v,
            None => return Ok(()),
        };

        draw_ctx.with_discrete_layer(values, clipping, |dc| {
            dc.with_saved_transform(Some(transform), |dc| {
                dc.with_view_box(vw, vh, |dc| dc.draw_children(node, clipping))
            })
        })
    }
}

/// The `<use>` element.
///
/// The referenced element is drawn with its own computed values, translated by `x, y`.
#[derive(Default)]
pub struct Use {
    link: Option<NodeId>,
    x: Length<Horizontal>,
    y: Length<Vertical>,
}

impl ElementTrait for Use {
    fn set_attributes(&mut self, attrs: &Attributes, errors: &mut AttributeErrors<'_>) {
        for (attr, value) in attrs.iter() {
            match attr.as_str() {
                "xlink:href" | "href" => set_attribute(
                    &mut self.link,
                    NodeId::parse(value).map(Some).attribute(attr.as_str()),
                    errors,
                ),
                "x" => set_attribute(&mut self.x, attr.parse(value), errors),
                "y" => set_attribute(&mut self.y, attr.parse(value), errors),
                _ => (),
            }
        }
    }

    fn draw(
        &self,
        _node: &Node,
        values: &ComputedValues,
        draw_ctx: &mut DrawingCtx<'_>,
        clipping: bool,
    ) -> Result<(), RenderingError> {
        let link = match self.link {
            Some(ref link) => link,
            None => return Ok(()),
        };

        // A reference back to the element being drawn, directly or through other
        // `<use>` elements, cannot be acquired a second time.
        let acquired = match draw_ctx.acquire_node(link)? {
            Some(acquired) => acquired,
            None => return Ok(()),
        };

        let child = acquired.get().clone();

        let params = draw_ctx.get_view_params();
        let x = self.x.to_user(values, &params);
        let y = self.y.to_user(values, &params);

        let res = draw_ctx.with_discrete_layer(values, clipping, |dc| {
            dc.with_saved_transform(Some(Transform::new_translate(x, y)), |dc| {
                dc.without_drawsub_stack(|dc| dc.draw_node_from_stack(&child, clipping))
            })
        });

        draw_ctx.release_node(acquired);

        res
    }
}
