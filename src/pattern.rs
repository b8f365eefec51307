//! The `pattern` element.
//!
//! A pattern is a paint server whose children are drawn into a tile, which then gets
//! repeated over the shape being filled or stroked.  Like gradients, patterns can inherit
//! unset attributes, and their children, through an `xlink:href` chain.

use crate::attributes::Attributes;
use crate::bbox::BoundingBox;
use crate::coord_units::CoordUnits;
use crate::document::{NodeId, NodeStack};
use crate::drawing_ctx::DrawingCtx;
use crate::element::{set_attribute, AttributeErrors, ElementData, ElementTrait};
use crate::error::*;
use crate::float_eq_cairo::ApproxEqCairo;
use crate::length::*;
use crate::node::{Node, NodeBorrow};
use crate::parsers::ParseValue;
use crate::rect::Rect;
use crate::transform::Transform;
use crate::unit_interval::UnitInterval;
use crate::viewbox::ViewBox;

coord_units!(PatternUnits, CoordUnits::ObjectBoundingBox);

coord_units!(PatternContentUnits, CoordUnits::UserSpaceOnUse);

/// Attributes of a `<pattern>` that may be inherited from the patterns it references.
///
/// `None` means that the attribute is not specified.  For `vbox`, `Some(None)` means that
/// it is known that there is no view box, since a pattern without one is a valid end state.
#[derive(Clone, Default)]
struct Common {
    units: Option<PatternUnits>,
    content_units: Option<PatternContentUnits>,
    vbox: Option<Option<ViewBox>>,
    transform: Option<Transform>,
    x: Option<Length<Horizontal>>,
    y: Option<Length<Vertical>>,
    width: Option<ULength<Horizontal>>,
    height: Option<ULength<Vertical>>,
}

/// Node for the `<pattern>` element.
#[derive(Default)]
pub struct Pattern {
    common: Common,
    fallback: Option<NodeId>,
}

impl ElementTrait for Pattern {
    fn set_attributes(&mut self, attrs: &Attributes, errors: &mut AttributeErrors<'_>) {
        for (attr, value) in attrs.iter() {
            match attr.as_str() {
                "patternUnits" => set_attribute(&mut self.common.units, attr.parse(value), errors),
                "patternContentUnits" => {
                    set_attribute(&mut self.common.content_units, attr.parse(value), errors)
                }
                "viewBox" => set_attribute(
                    &mut self.common.vbox,
                    attr.parse(value).map(Some),
                    errors,
                ),
                "patternTransform" => {
                    set_attribute(&mut self.common.transform, attr.parse(value), errors)
                }
                "xlink:href" | "href" => set_attribute(
                    &mut self.fallback,
                    NodeId::parse(value).map(Some).attribute(attr.as_str()),
                    errors,
                ),
                "x" => set_attribute(&mut self.common.x, attr.parse(value), errors),
                "y" => set_attribute(&mut self.common.y, attr.parse(value), errors),
                "width" => set_attribute(&mut self.common.width, attr.parse(value), errors),
                "height" => set_attribute(&mut self.common.height, attr.parse(value), errors),
                _ => (),
            }
        }
    }
}

/// A pattern while its `href` chain is being walked.
struct UnresolvedPattern {
    common: Common,

    /// The first pattern in the chain that has child elements.
    children: Option<Node>,
}

/// A pattern with all of its attributes known, ready to be used as a paint source.
pub struct ResolvedPattern {
    units: PatternUnits,
    content_units: PatternContentUnits,
    vbox: Option<ViewBox>,
    transform: Transform,
    x: Length<Horizontal>,
    y: Length<Vertical>,
    width: ULength<Horizontal>,
    height: ULength<Vertical>,

    /// Node whose children make up the tile; it may have no children at all.
    node: Node,
}

impl UnresolvedPattern {
    fn is_resolved(&self) -> bool {
        self.common.units.is_some()
            && self.common.content_units.is_some()
            && self.common.vbox.is_some()
            && self.common.transform.is_some()
            && self.common.x.is_some()
            && self.common.y.is_some()
            && self.common.width.is_some()
            && self.common.height.is_some()
            && self.children.is_some()
    }

    fn resolve_from_fallback(&self, fallback: &UnresolvedPattern) -> UnresolvedPattern {
        let (a, b) = (&self.common, &fallback.common);

        UnresolvedPattern {
            common: Common {
                units: a.units.or(b.units),
                content_units: a.content_units.or(b.content_units),
                vbox: a.vbox.or(b.vbox),
                transform: a.transform.or(b.transform),
                x: a.x.or(b.x),
                y: a.y.or(b.y),
                width: a.width.or(b.width),
                height: a.height.or(b.height),
            },
            children: self.children.clone().or_else(|| fallback.children.clone()),
        }
    }

    /// Fills in the initial values; `node` supplies the (empty) content if no pattern
    /// in the chain had children.
    fn into_resolved(self, node: &Node) -> ResolvedPattern {
        let c = self.common;

        ResolvedPattern {
            units: c.units.unwrap_or_default(),
            content_units: c.content_units.unwrap_or_default(),
            vbox: c.vbox.unwrap_or(None),
            transform: c.transform.unwrap_or_default(),
            x: c.x.unwrap_or_default(),
            y: c.y.unwrap_or_default(),
            width: c.width.unwrap_or_default(),
            height: c.height.unwrap_or_default(),
            node: self.children.unwrap_or_else(|| node.clone()),
        }
    }
}

impl Pattern {
    fn get_unresolved(&self, node: &Node) -> UnresolvedPattern {
        UnresolvedPattern {
            common: self.common.clone(),
            children: node.first_child().map(|_| node.clone()),
        }
    }

    /// Walks the `href` chain of fallback patterns and fills in unset attributes.
    ///
    /// `node` must be the node that holds `self`, already acquired by the caller.  A
    /// reference to a missing element ends the chain; a reference to something that is
    /// not a pattern, or back into the chain, is an error.
    pub fn resolve(
        &self,
        node: &Node,
        draw_ctx: &mut DrawingCtx<'_>,
    ) -> Result<ResolvedPattern, AcquireError> {
        let mut pattern = self.get_unresolved(node);
        let mut fallback = self.fallback.clone();

        let mut stack = NodeStack::new();

        while !pattern.is_resolved() {
            let node_id = match fallback {
                Some(ref id) => id.clone(),
                None => break,
            };

            let acquired = match draw_ctx.try_acquire_node(&node_id) {
                Ok(acquired) => acquired,

                Err(AcquireError::LinkNotFound(_)) => {
                    rsvg_log!(draw_ctx.session(), "pattern fallback {} not found", node_id);
                    break;
                }

                Err(e) => return Err(e),
            };

            let acquired_node = acquired.get().clone();

            if stack.contains(&acquired_node) {
                return Err(AcquireError::CircularReference(acquired_node));
            }

            let (unresolved, next) = match acquired_node.borrow_element().element_data {
                ElementData::Pattern(ref p) => (p.get_unresolved(&acquired_node), p.fallback.clone()),
                _ => return Err(AcquireError::InvalidLinkType(node_id)),
            };

            pattern = pattern.resolve_from_fallback(&unresolved);
            fallback = next;

            stack.push(&acquired_node);
            draw_ctx.release_node(acquired);
        }

        Ok(pattern.into_resolved(node))
    }
}

impl ResolvedPattern {
    /// Renders one tile and sets it, repeated, as the source of the current Cairo context.
    ///
    /// Returns `Ok(false)` if the pattern paints nothing: its tile is empty, it needs an
    /// object bounding box that is empty, or its content refers back to the pattern.
    pub fn set_as_source(
        &self,
        draw_ctx: &mut DrawingCtx<'_>,
        bbox: &BoundingBox,
        opacity: UnitInterval,
    ) -> Result<bool, RenderingError> {
        let units = CoordUnits::from(self.units);
        let content_units = CoordUnits::from(self.content_units);

        let tile_space = match units.to_user_space(bbox) {
            Some(t) => t,
            None => return Ok(false),
        };

        let obb = bbox.rect.filter(|r| !r.is_empty());

        if self.vbox.is_none() && content_units == CoordUnits::ObjectBoundingBox && obb.is_none() {
            return Ok(false);
        }

        let elt = self.node.borrow_element();
        let values = elt.get_computed_values();

        let params = draw_ctx.get_view_params().with_units(units);
        let x = self.x.to_user(values, &params);
        let y = self.y.to_user(values, &params);
        let w = self.width.to_user(values, &params);
        let h = self.height.to_user(values, &params);

        let tile = tile_space.transform_rect(&Rect::new(x, y, x + w, y + h));

        if tile.width().approx_eq_cairo(0.0) || tile.height().approx_eq_cairo(0.0) {
            return Ok(false);
        }

        // Transform and viewport for the tile's content, relative to the tile's origin.
        let (content_transform, (vw, vh)) = match (self.vbox, content_units, obb) {
            (Some(vbox), _, _) => match vbox.transform_to(tile.width(), tile.height()) {
                Some(t) => (t, vbox.size()),
                None => return Ok(false),
            },

            (None, CoordUnits::ObjectBoundingBox, Some(r)) => {
                (Transform::new_scale(r.width(), r.height()), (1.0, 1.0))
            }

            _ => (Transform::identity(), draw_ctx.get_view_params().vbox.size()),
        };

        // The tile gets rendered at device resolution, in whole pixels.
        let device = draw_ctx.get_transform().pre_transform(&self.transform);
        let sx = (device.xx * device.xx + device.xy * device.xy).sqrt();
        let sy = (device.yx * device.yx + device.yy * device.yy).sqrt();

        let pw = (tile.width() * sx) as i32;
        let ph = (tile.height() * sy) as i32;

        if pw < 1 || ph < 1 {
            return Ok(false);
        }

        let sx = f64::from(pw) / tile.width();
        let sy = f64::from(ph) / tile.height();

        let tile_to_user = self
            .transform
            .pre_translate(tile.x0, tile.y0)
            .pre_scale(1.0 / sx, 1.0 / sy);

        let user_to_tile = match tile_to_user.invert() {
            Some(t) => t,
            None => return Ok(false),
        };

        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, pw, ph).map_err(|e| {
            RenderingError::OutOfMemory(format!("could not create pattern tile: {}", e))
        })?;

        let drawn = {
            let cr = cairo::Context::new(&surface)?;
            cr.set_matrix(Transform::new_scale(sx, sy).pre_transform(&content_transform).into());

            draw_ctx.with_view_box(vw, vh, |dc| self.draw_tile(dc, &cr, opacity))?
        };

        if !drawn {
            return Ok(false);
        }

        let pattern = cairo::SurfacePattern::create(&surface);
        pattern.set_matrix(user_to_tile.into());
        pattern.set_extend(cairo::Extend::Repeat);
        pattern.set_filter(cairo::Filter::Best);

        draw_ctx.get_cairo_context().set_source(&pattern)?;

        Ok(true)
    }

    fn draw_tile(
        &self,
        draw_ctx: &mut DrawingCtx<'_>,
        cr: &cairo::Context,
        opacity: UnitInterval,
    ) -> Result<bool, RenderingError> {
        let acquired = match draw_ctx.acquire_node_ref(&self.node) {
            Ok(acquired) => acquired,
            Err(e) => {
                rsvg_log!(draw_ctx.session(), "not drawing pattern content: {}", e);
                return Ok(false);
            }
        };

        let UnitInterval(o) = opacity;
        let with_opacity = !o.approx_eq_cairo(1.0);

        if with_opacity {
            cr.push_group();
        }

        let elt = self.node.borrow_element();
        let values = elt.get_computed_values();

        let res = draw_ctx.with_target(cr, |dc| {
            dc.with_discrete_layer(values, false, |dc| dc.draw_children(&self.node, false))
        });

        draw_ctx.release_node(acquired);

        if with_opacity {
            cr.pop_group_to_source()?;
            cr.paint_with_alpha(o)?;
        }

        res.map(|()| true)
    }
}
