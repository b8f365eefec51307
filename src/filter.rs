//! The `filter` element, and the evaluator that runs its primitives.

use crate::attributes::Attributes;
use crate::bbox::BoundingBox;
use crate::coord_units::CoordUnits;
use crate::drawing_ctx::{DrawingCtx, ViewParams};
use crate::element::{set_attribute, AttributeErrors, ElementTrait};
use crate::error::{AttributeResultExt, ValueErrorKind};
use crate::filters::{FilterContext, FilterError, FilterOutput};
use crate::length::*;
use crate::node::{Node, NodeBorrow};
use crate::parsers::ParseValue;
use crate::properties::ComputedValues;
use crate::rect::Rect;
use crate::transform::Transform;

/// The <filter> node.
pub struct Filter {
    x: Length<Horizontal>,
    y: Length<Vertical>,
    width: ULength<Horizontal>,
    height: ULength<Vertical>,
    filter_units: CoordUnits,
    primitive_units: CoordUnits,
}

impl Default for Filter {
    /// Constructs a new `Filter` with default properties.
    fn default() -> Self {
        Self {
            x: Length::<Horizontal>::new(-0.1, LengthUnit::Percent),
            y: Length::<Vertical>::new(-0.1, LengthUnit::Percent),
            width: ULength::<Horizontal>::new(1.2, LengthUnit::Percent),
            height: ULength::<Vertical>::new(1.2, LengthUnit::Percent),
            filter_units: CoordUnits::ObjectBoundingBox,
            primitive_units: CoordUnits::UserSpaceOnUse,
        }
    }
}

impl Filter {
    /// Computes the filter effects region in the space of `bbox.transform`, which is the
    /// canvas space of the filtered layer.
    fn effects_region(
        &self,
        values: &ComputedValues,
        bbox: &BoundingBox,
        params: &ViewParams,
    ) -> Result<Rect, FilterError> {
        let params = params.with_units(self.filter_units);

        let x = self.x.to_user(values, &params);
        let y = self.y.to_user(values, &params);
        let w = self.width.to_user(values, &params);
        let h = self.height.to_user(values, &params);

        let rect = Rect::new(x, y, x + w, y + h);

        let user_rect = units_to_user_space(self.filter_units, bbox)?.transform_rect(&rect);

        Ok(bbox.transform.transform_rect(&user_rect))
    }

    /// Transform from `primitiveUnits` to the canvas space of the filtered layer.
    fn primitive_transform(&self, bbox: &BoundingBox) -> Result<Transform, FilterError> {
        let t = units_to_user_space(self.primitive_units, bbox)?;
        Ok(bbox.transform.pre_transform(&t))
    }
}

fn units_to_user_space(units: CoordUnits, bbox: &BoundingBox) -> Result<Transform, FilterError> {
    units.to_user_space(bbox).ok_or_else(|| {
        FilterError::InvalidParameter(String::from(
            "objectBoundingBox units with an empty bounding box",
        ))
    })
}

impl ElementTrait for Filter {
    fn set_attributes(&mut self, attrs: &Attributes, errors: &mut AttributeErrors<'_>) {
        // Parse filterUnits first as it affects x, y, width, height checks.
        if let Some(value) = attrs.get("filterUnits") {
            let attr = crate::attributes::AttrName::from("filterUnits");
            set_attribute(&mut self.filter_units, attr.parse(value), errors);
        }

        // With ObjectBoundingBox, only fractions and percents are allowed.
        let no_units_allowed = self.filter_units == CoordUnits::ObjectBoundingBox;

        let check_units = |unit: LengthUnit, attr: &str| {
            if no_units_allowed && !matches!(unit, LengthUnit::Px | LengthUnit::Percent) {
                Err(ValueErrorKind::parse_error(
                    "unit identifiers are not allowed with filterUnits set to objectBoundingBox",
                ))
                .attribute(attr)
            } else {
                Ok(())
            }
        };

        for (attr, value) in attrs.iter() {
            match attr.as_str() {
                "x" => {
                    let res = attr.parse(value).and_then(|l: Length<Horizontal>| {
                        check_units(l.unit, attr.as_str()).map(|_| l)
                    });
                    set_attribute(&mut self.x, res, errors);
                }
                "y" => {
                    let res = attr.parse(value).and_then(|l: Length<Vertical>| {
                        check_units(l.unit, attr.as_str()).map(|_| l)
                    });
                    set_attribute(&mut self.y, res, errors);
                }
                "width" => {
                    let res = attr.parse(value).and_then(|l: ULength<Horizontal>| {
                        check_units(l.unit, attr.as_str()).map(|_| l)
                    });
                    set_attribute(&mut self.width, res, errors);
                }
                "height" => {
                    let res = attr.parse(value).and_then(|l: ULength<Vertical>| {
                        check_units(l.unit, attr.as_str()).map(|_| l)
                    });
                    set_attribute(&mut self.height, res, errors);
                }
                "primitiveUnits" => {
                    set_attribute(&mut self.primitive_units, attr.parse(value), errors)
                }
                _ => (),
            }
        }
    }
}

/// Evaluates a `<filter>` element on the contents of a layer.
///
/// The drawing context calls this once for each filtered layer, with the layer's
/// surface as `source` and the layer's bounding box.  The returned surface replaces
/// the layer's contents; it must have the same size as `source`.
pub trait FilterRenderer {
    fn render(
        &self,
        filter_node: &Node,
        source: &cairo::ImageSurface,
        bbox: &BoundingBox,
        draw_ctx: &DrawingCtx<'_>,
    ) -> Result<cairo::ImageSurface, FilterError>;
}

/// Runs the filter primitives that this crate knows about, in document order.
///
/// Each primitive takes the previous one's result as its input; the first one gets
/// `source`.  A filter without primitives produces a transparent image.
pub struct DefaultFilterRenderer;

impl FilterRenderer for DefaultFilterRenderer {
    fn render(
        &self,
        filter_node: &Node,
        source: &cairo::ImageSurface,
        bbox: &BoundingBox,
        draw_ctx: &DrawingCtx<'_>,
    ) -> Result<cairo::ImageSurface, FilterError> {
        let ctx = {
            let elt = filter_node.borrow_element();
            let filter = borrow_element_as!(filter_node, Filter);
            let params = draw_ctx.get_view_params();

            let region = filter.effects_region(elt.get_computed_values(), bbox, &params)?;

            FilterContext::new(
                source.width(),
                source.height(),
                region,
                filter.primitive_transform(bbox)?,
                params.with_units(filter.primitive_units),
            )
        };

        let mut result: Option<FilterOutput> = None;

        for child in filter_node.children() {
            let elt = child.borrow_element();

            if let Some(effect) = elt.as_filter_effect() {
                if elt.is_in_error() {
                    return Err(FilterError::ChildNodeInError);
                }

                let output = match result {
                    Some(ref input) => effect.render(&child, &ctx, input)?,
                    None => effect.render(
                        &child,
                        &ctx,
                        &FilterOutput {
                            surface: source.clone(),
                            bounds: ctx.effects_region(),
                        },
                    )?,
                };

                result = Some(output);
            }
        }

        match result {
            Some(output) => Ok(output.surface),
            None => ctx.new_surface(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dpi::Dpi;
    use crate::element::Element;
    use crate::session::Session;

    fn new_filter(attrs: &[(&str, &str)]) -> Element {
        Element::new(&Session::new_for_test_suite(), "filter", &Attributes::from(attrs))
    }

    #[test]
    fn rejects_units_with_object_bounding_box() {
        let elt = new_filter(&[("x", "1in"), ("width", "50%")]);
        assert_eq!(elt.errors().len(), 1);

        let elt = new_filter(&[("filterUnits", "userSpaceOnUse"), ("x", "1in")]);
        assert!(!elt.is_in_error());
    }

    #[test]
    fn computes_effects_region() {
        let params = ViewParams::new(Dpi::default(), 100.0, 100.0);
        let values = ComputedValues::default();
        let bbox = BoundingBox::new()
            .with_transform(Transform::new_translate(5.0, 0.0))
            .with_rect(Rect::new(10.0, 10.0, 20.0, 30.0));

        let filter = Filter::default();
        let region = filter.effects_region(&values, &bbox, &params).unwrap();
        assert!(region.approx_eq(&Rect::new(14.0, 8.0, 26.0, 32.0)));

        let empty = BoundingBox::new();
        assert!(filter.effects_region(&values, &empty, &params).is_err());

        let filter = Filter {
            filter_units: CoordUnits::UserSpaceOnUse,
            ..Filter::default()
        };
        let region = filter.effects_region(&values, &empty, &params).unwrap();
        assert!(region.approx_eq(&Rect::new(-10.0, -10.0, 110.0, 110.0)));
    }

    #[test]
    fn primitive_units_scale_with_bounding_box() {
        let bbox = BoundingBox::new().with_rect(Rect::new(0.0, 0.0, 10.0, 20.0));

        let filter = Filter {
            primitive_units: CoordUnits::ObjectBoundingBox,
            ..Filter::default()
        };

        let t = filter.primitive_transform(&bbox).unwrap();
        assert_eq!(t.transform_distance(0.5, 0.5), (5.0, 10.0));
    }
}
