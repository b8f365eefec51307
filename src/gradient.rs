//! Gradient paint servers; the `linearGradient` and `radialGradient` elements.

use cssparser::{Parser, Token};

use crate::attributes::Attributes;
use crate::bbox::BoundingBox;
use crate::color::{resolve_color, with_opacity};
use crate::coord_units::CoordUnits;
use crate::document::{NodeId, NodeStack};
use crate::drawing_ctx::DrawingCtx;
use crate::element::{set_attribute, AttributeErrors, ElementData, ElementTrait};
use crate::error::*;
use crate::length::*;
use crate::node::Node;
use crate::parsers::{finite_f32, Parse, ParseValue};
use crate::properties::ComputedValues;
use crate::transform::Transform;
use crate::unit_interval::UnitInterval;

/// Contents of a `<stop>` element for gradient color stops
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorStop {
    /// `<stop offset="..."/>`
    pub offset: UnitInterval,

    /// `<stop stop-color="..." stop-opacity="..."/>`, with the opacity already applied
    pub rgba: cssparser::RGBA,
}

// gradientUnits attribute; its default is objectBoundingBox
coord_units!(GradientUnits, CoordUnits::ObjectBoundingBox);

/// spreadMethod attribute for gradients
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SpreadMethod {
    Pad,
    Reflect,
    Repeat,
}

enum_default!(SpreadMethod, SpreadMethod::Pad);

impl Parse for SpreadMethod {
    fn parse<'i>(parser: &mut Parser<'i, '_>) -> Result<SpreadMethod, ParseError<'i>> {
        Ok(parse_identifiers!(
            parser,
            "pad" => SpreadMethod::Pad,
            "reflect" => SpreadMethod::Reflect,
            "repeat" => SpreadMethod::Repeat,
        )?)
    }
}

impl From<SpreadMethod> for cairo::Extend {
    fn from(s: SpreadMethod) -> cairo::Extend {
        match s {
            SpreadMethod::Pad => cairo::Extend::Pad,
            SpreadMethod::Reflect => cairo::Extend::Reflect,
            SpreadMethod::Repeat => cairo::Extend::Repeat,
        }
    }
}

/// The `offset` attribute of `<stop>`; a number or a percentage, clamped to `[0, 1]`.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
struct StopOffset(UnitInterval);

impl Parse for StopOffset {
    fn parse<'i>(parser: &mut Parser<'i, '_>) -> Result<StopOffset, ParseError<'i>> {
        let loc = parser.current_source_location();

        let value = match *parser.next()? {
            Token::Number { value, .. } => value,
            Token::Percentage { unit_value, .. } => unit_value,
            ref t => return Err(loc.new_unexpected_token_error(t.clone())),
        };

        let value = finite_f32(value).map_err(|e| loc.new_custom_error(e))?;

        Ok(StopOffset(UnitInterval::clamp(f64::from(value))))
    }
}

/// Node for the `<stop>` element
#[derive(Default)]
pub struct Stop {
    offset: StopOffset,
    // stop-color and stop-opacity are properties, not attributes
}

impl ElementTrait for Stop {
    fn set_attributes(&mut self, attrs: &Attributes, errors: &mut AttributeErrors<'_>) {
        for (attr, value) in attrs.iter() {
            if attr.as_str() == "offset" {
                set_attribute(&mut self.offset, attr.parse(value), errors);
            }
        }
    }
}

/// Parameters specific to each gradient type, before being resolved.
///
/// These will be composed together with the `UnresolvedVariant` from fallback nodes
/// (referenced with e.g. `<linearGradient xlink:href="#fallback">`) to form a final,
/// resolved variant.
#[derive(Copy, Clone)]
enum UnresolvedVariant {
    Linear {
        x1: Option<Length<Horizontal>>,
        y1: Option<Length<Vertical>>,
        x2: Option<Length<Horizontal>>,
        y2: Option<Length<Vertical>>,
    },

    Radial {
        cx: Option<Length<Horizontal>>,
        cy: Option<Length<Vertical>>,
        r: Option<Length<Both>>,
        fx: Option<Length<Horizontal>>,
        fy: Option<Length<Vertical>>,
    },
}

/// Parameters specific to each gradient type, after resolving.
#[derive(Debug, Clone)]
enum ResolvedGradientVariant {
    Linear {
        x1: Length<Horizontal>,
        y1: Length<Vertical>,
        x2: Length<Horizontal>,
        y2: Length<Vertical>,
    },

    Radial {
        cx: Length<Horizontal>,
        cy: Length<Vertical>,
        r: Length<Both>,
        fx: Length<Horizontal>,
        fy: Length<Vertical>,
    },
}

impl UnresolvedVariant {
    /// Unset values become zero lengths; call `resolve_from_defaults()` first.
    fn into_resolved(self) -> ResolvedGradientVariant {
        match self {
            UnresolvedVariant::Linear { x1, y1, x2, y2 } => ResolvedGradientVariant::Linear {
                x1: x1.unwrap_or_default(),
                y1: y1.unwrap_or_default(),
                x2: x2.unwrap_or_default(),
                y2: y2.unwrap_or_default(),
            },

            UnresolvedVariant::Radial { cx, cy, r, fx, fy } => ResolvedGradientVariant::Radial {
                cx: cx.unwrap_or_default(),
                cy: cy.unwrap_or_default(),
                r: r.unwrap_or_default(),
                fx: fx.unwrap_or_default(),
                fy: fy.unwrap_or_default(),
            },
        }
    }

    fn is_resolved(&self) -> bool {
        match *self {
            UnresolvedVariant::Linear { x1, y1, x2, y2 } => {
                x1.is_some() && y1.is_some() && x2.is_some() && y2.is_some()
            }

            UnresolvedVariant::Radial { cx, cy, r, fx, fy } => {
                cx.is_some() && cy.is_some() && r.is_some() && fx.is_some() && fy.is_some()
            }
        }
    }

    fn resolve_from_fallback(&self, fallback: &UnresolvedVariant) -> UnresolvedVariant {
        match (*self, *fallback) {
            (
                UnresolvedVariant::Linear { x1, y1, x2, y2 },
                UnresolvedVariant::Linear {
                    x1: fx1,
                    y1: fy1,
                    x2: fx2,
                    y2: fy2,
                },
            ) => UnresolvedVariant::Linear {
                x1: x1.or(fx1),
                y1: y1.or(fy1),
                x2: x2.or(fx2),
                y2: y2.or(fy2),
            },

            (
                UnresolvedVariant::Radial { cx, cy, r, fx, fy },
                UnresolvedVariant::Radial {
                    cx: f_cx,
                    cy: f_cy,
                    r: f_r,
                    fx: f_fx,
                    fy: f_fy,
                },
            ) => UnresolvedVariant::Radial {
                cx: cx.or(f_cx),
                cy: cy.or(f_cy),
                r: r.or(f_r),
                fx: fx.or(f_fx),
                fy: fy.or(f_fy),
            },

            _ => *self, // If variants are of different types, then nothing to resolve
        }
    }

    // https://www.w3.org/TR/SVG/pservers.html#LinearGradients
    // https://www.w3.org/TR/SVG/pservers.html#RadialGradients
    fn resolve_from_defaults(&self) -> UnresolvedVariant {
        match *self {
            UnresolvedVariant::Linear { x1, y1, x2, y2 } => UnresolvedVariant::Linear {
                x1: x1.or_else(|| Some(Length::new(0.0, LengthUnit::Percent))),
                y1: y1.or_else(|| Some(Length::new(0.0, LengthUnit::Percent))),
                x2: x2.or_else(|| Some(Length::new(1.0, LengthUnit::Percent))),
                y2: y2.or_else(|| Some(Length::new(0.0, LengthUnit::Percent))),
            },

            UnresolvedVariant::Radial { cx, cy, r, fx, fy } => {
                let cx = cx.or_else(|| Some(Length::new(0.5, LengthUnit::Percent)));
                let cy = cy.or_else(|| Some(Length::new(0.5, LengthUnit::Percent)));
                let r = r.or_else(|| Some(Length::new(0.5, LengthUnit::Percent)));

                // fx and fy fall back to the presentational value of cx and cy
                let fx = fx.or(cx);
                let fy = fy.or(cy);

                UnresolvedVariant::Radial { cx, cy, r, fx, fy }
            }
        }
    }
}

/// Fields shared by all gradient nodes
#[derive(Default)]
struct Common {
    units: Option<GradientUnits>,
    transform: Option<Transform>,
    spread: Option<SpreadMethod>,

    fallback: Option<NodeId>,
}

/// Node for the `<linearGradient>` element
#[derive(Default)]
pub struct LinearGradient {
    common: Common,

    x1: Option<Length<Horizontal>>,
    y1: Option<Length<Vertical>>,
    x2: Option<Length<Horizontal>>,
    y2: Option<Length<Vertical>>,
}

/// Node for the `<radialGradient>` element
#[derive(Default)]
pub struct RadialGradient {
    common: Common,

    cx: Option<Length<Horizontal>>,
    cy: Option<Length<Vertical>>,
    r: Option<Length<Both>>,
    fx: Option<Length<Horizontal>>,
    fy: Option<Length<Vertical>>,
}

/// Main structure used during gradient resolution.  For unresolved
/// gradients, we store all fields as `Option<T>` - if `None`, it means
/// that the field is not specified; if `Some(T)`, it means that the
/// field was specified.
struct UnresolvedGradient {
    units: Option<GradientUnits>,
    transform: Option<Transform>,
    spread: Option<SpreadMethod>,
    stops: Option<Vec<ColorStop>>,

    variant: UnresolvedVariant,
}

/// A gradient with its whole `href` chain and all defaults applied.
#[derive(Debug, Clone)]
pub struct ResolvedGradient {
    units: GradientUnits,
    transform: Transform,
    spread: SpreadMethod,
    stops: Vec<ColorStop>,

    variant: ResolvedGradientVariant,
}

impl UnresolvedGradient {
    fn into_resolved(self) -> ResolvedGradient {
        let UnresolvedGradient {
            units,
            transform,
            spread,
            stops,
            variant,
        } = self;

        ResolvedGradient {
            units: units.unwrap_or_default(),
            transform: transform.unwrap_or_default(),
            spread: spread.unwrap_or_default(),
            stops: stops.unwrap_or_default(),
            variant: variant.into_resolved(),
        }
    }

    /// Helper for `add_color_stops_from_node()`; keeps offsets monotonic.
    fn add_color_stop(&mut self, offset: UnitInterval, rgba: cssparser::RGBA) {
        let stops = self.stops.get_or_insert_with(Vec::new);

        let last_offset = stops
            .last()
            .map(|stop| stop.offset)
            .unwrap_or(UnitInterval(0.0));

        let offset = if offset > last_offset {
            offset
        } else {
            last_offset
        };

        stops.push(ColorStop { offset, rgba });
    }

    /// Looks for `<stop>` children inside a gradient node and adds their info to `self`.
    fn add_color_stops_from_node(&mut self, node: &Node) {
        for child in node.children() {
            let elt = child.borrow();

            if let ElementData::Stop(ref stop) = elt.element_data {
                if elt.is_in_error() {
                    continue;
                }

                let values = elt.get_computed_values();
                let rgba = with_opacity(
                    resolve_color(&values.stop_color.0, values.color.0),
                    u8::from(values.stop_opacity.0),
                );

                self.add_color_stop(stop.offset.0, rgba);
            }
        }
    }

    fn is_resolved(&self) -> bool {
        self.units.is_some()
            && self.transform.is_some()
            && self.spread.is_some()
            && self.stops.is_some()
            && self.variant.is_resolved()
    }

    fn resolve_from_fallback(&self, fallback: &UnresolvedGradient) -> UnresolvedGradient {
        UnresolvedGradient {
            units: self.units.or(fallback.units),
            transform: self.transform.or(fallback.transform),
            spread: self.spread.or(fallback.spread),
            stops: self.stops.clone().or_else(|| fallback.stops.clone()),
            variant: self.variant.resolve_from_fallback(&fallback.variant),
        }
    }

    fn resolve_from_defaults(&self) -> UnresolvedGradient {
        UnresolvedGradient {
            units: self.units.or_else(|| Some(GradientUnits::default())),
            transform: self.transform.or_else(|| Some(Transform::default())),
            spread: self.spread.or_else(|| Some(SpreadMethod::default())),
            stops: self.stops.clone().or_else(|| Some(Vec::new())),
            variant: self.variant.resolve_from_defaults(),
        }
    }
}

/// State used during the gradient resolution process
///
/// This is the current node's gradient information, plus the fallback
/// that should be used in case that information is not complete for a
/// resolved gradient yet.
struct Unresolved {
    gradient: UnresolvedGradient,
    fallback: Option<NodeId>,
}

impl LinearGradient {
    fn get_unresolved_variant(&self) -> UnresolvedVariant {
        UnresolvedVariant::Linear {
            x1: self.x1,
            y1: self.y1,
            x2: self.x2,
            y2: self.y2,
        }
    }
}

impl RadialGradient {
    fn get_unresolved_variant(&self) -> UnresolvedVariant {
        UnresolvedVariant::Radial {
            cx: self.cx,
            cy: self.cy,
            r: self.r,
            fx: self.fx,
            fy: self.fy,
        }
    }
}

impl Common {
    fn set_attributes(&mut self, attrs: &Attributes, errors: &mut AttributeErrors<'_>) {
        for (attr, value) in attrs.iter() {
            match attr.as_str() {
                "gradientUnits" => set_attribute(&mut self.units, attr.parse(value), errors),
                "gradientTransform" => {
                    set_attribute(&mut self.transform, attr.parse(value), errors)
                }
                "spreadMethod" => set_attribute(&mut self.spread, attr.parse(value), errors),
                "xlink:href" | "href" => set_attribute(
                    &mut self.fallback,
                    NodeId::parse(value).map(Some).attribute(attr.as_str()),
                    errors,
                ),
                _ => (),
            }
        }
    }
}

impl ElementTrait for LinearGradient {
    fn set_attributes(&mut self, attrs: &Attributes, errors: &mut AttributeErrors<'_>) {
        self.common.set_attributes(attrs, errors);

        for (attr, value) in attrs.iter() {
            match attr.as_str() {
                "x1" => set_attribute(&mut self.x1, attr.parse(value), errors),
                "y1" => set_attribute(&mut self.y1, attr.parse(value), errors),
                "x2" => set_attribute(&mut self.x2, attr.parse(value), errors),
                "y2" => set_attribute(&mut self.y2, attr.parse(value), errors),
                _ => (),
            }
        }
    }
}

impl ElementTrait for RadialGradient {
    fn set_attributes(&mut self, attrs: &Attributes, errors: &mut AttributeErrors<'_>) {
        self.common.set_attributes(attrs, errors);

        for (attr, value) in attrs.iter() {
            match attr.as_str() {
                "cx" => set_attribute(&mut self.cx, attr.parse(value), errors),
                "cy" => set_attribute(&mut self.cy, attr.parse(value), errors),
                "r" => set_attribute(&mut self.r, attr.parse(value), errors),
                "fx" => set_attribute(&mut self.fx, attr.parse(value), errors),
                "fy" => set_attribute(&mut self.fy, attr.parse(value), errors),
                _ => (),
            }
        }
    }
}

macro_rules! impl_gradient {
    ($gradient_type:ident, $other_type:ident) => {
        impl $gradient_type {
            fn get_unresolved(&self, node: &Node) -> Unresolved {
                let mut gradient = UnresolvedGradient {
                    units: self.common.units,
                    transform: self.common.transform,
                    spread: self.common.spread,
                    stops: None,
                    variant: self.get_unresolved_variant(),
                };

                gradient.add_color_stops_from_node(node);

                Unresolved {
                    gradient,
                    fallback: self.common.fallback.clone(),
                }
            }

            /// Walks the `href` chain of fallback gradients and fills in unset attributes.
            ///
            /// `node` must be the node that holds `self`, and it is expected to be acquired
            /// already, so that a chain leading back to it is caught as a cycle.
            pub fn resolve(
                &self,
                node: &Node,
                draw_ctx: &mut DrawingCtx<'_>,
            ) -> Result<ResolvedGradient, AcquireError> {
                let Unresolved {
                    mut gradient,
                    mut fallback,
                } = self.get_unresolved(node);

                let mut stack = NodeStack::new();

                while !gradient.is_resolved() {
                    if let Some(node_id) = fallback {
                        let acquired = draw_ctx.try_acquire_node(&node_id)?;
                        let acquired_node = acquired.get().clone();

                        if stack.contains(&acquired_node) {
                            return Err(AcquireError::CircularReference(acquired_node));
                        }

                        let unresolved = match acquired_node.borrow().element_data {
                            ElementData::$gradient_type(ref g) => g.get_unresolved(&acquired_node),
                            ElementData::$other_type(ref g) => g.get_unresolved(&acquired_node),
                            _ => return Err(AcquireError::InvalidLinkType(node_id.clone())),
                        };

                        gradient = gradient.resolve_from_fallback(&unresolved.gradient);
                        fallback = unresolved.fallback;

                        stack.push(&acquired_node);
                        draw_ctx.release_node(acquired);
                    } else {
                        break;
                    }
                }

                Ok(gradient.resolve_from_defaults().into_resolved())
            }
        }
    };
}

impl_gradient!(LinearGradient, RadialGradient);
impl_gradient!(RadialGradient, LinearGradient);

/// Moves a radial gradient's focus onto its circle if it lies outside of it.
///
/// Cairo would produce a cone instead of a circle for a focus outside the circle.
fn fix_focus_point(fx: f64, fy: f64, cx: f64, cy: f64, radius: f64) -> (f64, f64) {
    // Easy case first: the focus point is inside the circle
    if (fx - cx) * (fx - cx) + (fy - cy) * (fy - cy) <= radius * radius {
        return (fx, fy);
    }

    // Hard case: focus point is outside the circle.
    // Find the vector from the origin to (fx, fy)
    let mut dx = fx - cx;
    let mut dy = fy - cy;

    // Normalize the vector to have a magnitude equal to radius
    let scale = (dx * dx + dy * dy).sqrt() / radius;

    dx /= scale;
    dy /= scale;

    (cx + dx, cy + dy)
}

impl ResolvedGradient {
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Sets the gradient as the source of the current Cairo context.
    ///
    /// Returns `Ok(false)` if the gradient cannot be used, because it is in
    /// `objectBoundingBox` units and the bounding box is empty.
    pub fn set_as_source(
        &self,
        draw_ctx: &DrawingCtx<'_>,
        bbox: &BoundingBox,
        values: &ComputedValues,
        opacity: UnitInterval,
    ) -> Result<bool, RenderingError> {
        let units = CoordUnits::from(self.units);

        let bbox_transform = match units.to_user_space(bbox) {
            Some(t) => t,
            None => return Ok(false),
        };

        let pattern_transform = match bbox_transform.pre_transform(&self.transform).invert() {
            Some(t) => t,
            None => return Ok(false),
        };

        let params = draw_ctx.get_view_params().with_units(units);

        let g = match self.variant {
            ResolvedGradientVariant::Linear { x1, y1, x2, y2 } => {
                cairo::Gradient::clone(&cairo::LinearGradient::new(
                    x1.to_user(values, &params),
                    y1.to_user(values, &params),
                    x2.to_user(values, &params),
                    y2.to_user(values, &params),
                ))
            }

            ResolvedGradientVariant::Radial { cx, cy, r, fx, fy } => {
                let cx = cx.to_user(values, &params);
                let cy = cy.to_user(values, &params);
                let r = r.to_user(values, &params);
                let (fx, fy) = fix_focus_point(
                    fx.to_user(values, &params),
                    fy.to_user(values, &params),
                    cx,
                    cy,
                    r,
                );

                cairo::Gradient::clone(&cairo::RadialGradient::new(fx, fy, 0.0, cx, cy, r))
            }
        };

        g.set_matrix(pattern_transform.into());
        g.set_extend(cairo::Extend::from(self.spread));

        let UnitInterval(o) = opacity;

        for stop in &self.stops {
            let UnitInterval(offset) = stop.offset;

            g.add_color_stop_rgba(
                offset,
                f64::from(stop.rgba.red) / 255.0,
                f64::from(stop.rgba.green) / 255.0,
                f64::from(stop.rgba.blue) / 255.0,
                f64::from(stop.rgba.alpha) / 255.0 * o,
            );
        }

        draw_ctx.get_cairo_context().set_source(&g)?;

        Ok(true)
    }
}
