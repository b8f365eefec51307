//! Presentation properties, and their specified and computed values.
//!
//! Each element has a [`SpecifiedValues`] that comes from its presentation attributes.
//! When the document is built, every element's [`ComputedValues`] is derived from its
//! parent's computed values plus its own specified values.  Properties that are not
//! specified either inherit from the parent or reset to their initial value, depending
//! on [`Property::inherits_automatically`].

use cssparser::{Parser, ParserInput};
use std::rc::Rc;

use crate::attributes::AttrName;
use crate::error::*;
use crate::iri::IRI;
use crate::length::*;
use crate::paint_server::{PaintServer, SolidColor};
use crate::parsers::{Parse, ParseValue};
use crate::property_macros::Property;
use crate::unit_interval::UnitInterval;

/// A property's value as it comes from an element's attributes.
#[derive(Debug, Clone, PartialEq)]
pub enum SpecifiedValue<T>
where
    T: Property + Clone + Default,
{
    Unspecified,
    Inherit,
    Specified(T),
}

impl<T> Default for SpecifiedValue<T>
where
    T: Property + Clone + Default,
{
    fn default() -> Self {
        SpecifiedValue::Unspecified
    }
}

impl<T> SpecifiedValue<T>
where
    T: Property + Clone + Default,
{
    /// Computes the value given the parent's value for the same property.
    pub fn compute(&self, src: &T, src_values: &ComputedValues) -> T {
        let value: T = match *self {
            SpecifiedValue::Unspecified => {
                if <T as Property>::inherits_automatically() {
                    src.clone()
                } else {
                    Default::default()
                }
            }

            SpecifiedValue::Inherit => src.clone(),

            SpecifiedValue::Specified(ref v) => v.clone(),
        };

        value.compute(src_values)
    }
}

make_property!(
    /// `clip-path` property.
    ClipPath,
    default: IRI::None,
    inherits_automatically: false,
    newtype_parse: IRI,
);

make_property!(
    /// `color` property, the value for `currentColor`.
    Color,
    default: cssparser::RGBA::new(0, 0, 0, 255),
    inherits_automatically: true,
    newtype_parse: cssparser::RGBA,
);

make_property!(
    /// `comp-op` property, the Cairo operator used to composite a layer.
    CompOp,
    default: SrcOver,
    inherits_automatically: false,

    identifiers:
    "clear" => Clear,
    "src" => Src,
    "dst" => Dst,
    "src-over" => SrcOver,
    "dst-over" => DstOver,
    "src-in" => SrcIn,
    "dst-in" => DstIn,
    "src-out" => SrcOut,
    "dst-out" => DstOut,
    "src-atop" => SrcAtop,
    "dst-atop" => DstAtop,
    "xor" => Xor,
    "plus" => Plus,
    "multiply" => Multiply,
    "screen" => Screen,
    "overlay" => Overlay,
    "darken" => Darken,
    "lighten" => Lighten,
    "color-dodge" => ColorDodge,
    "color-burn" => ColorBurn,
    "hard-light" => HardLight,
    "soft-light" => SoftLight,
    "difference" => Difference,
    "exclusion" => Exclusion,
);

impl From<CompOp> for cairo::Operator {
    fn from(op: CompOp) -> cairo::Operator {
        use cairo::Operator;

        match op {
            CompOp::Clear => Operator::Clear,
            CompOp::Src => Operator::Source,
            CompOp::Dst => Operator::Dest,
            CompOp::SrcOver => Operator::Over,
            CompOp::DstOver => Operator::DestOver,
            CompOp::SrcIn => Operator::In,
            CompOp::DstIn => Operator::DestIn,
            CompOp::SrcOut => Operator::Out,
            CompOp::DstOut => Operator::DestOut,
            CompOp::SrcAtop => Operator::Atop,
            CompOp::DstAtop => Operator::DestAtop,
            CompOp::Xor => Operator::Xor,
            CompOp::Plus => Operator::Add,
            CompOp::Multiply => Operator::Multiply,
            CompOp::Screen => Operator::Screen,
            CompOp::Overlay => Operator::Overlay,
            CompOp::Darken => Operator::Darken,
            CompOp::Lighten => Operator::Lighten,
            CompOp::ColorDodge => Operator::ColorDodge,
            CompOp::ColorBurn => Operator::ColorBurn,
            CompOp::HardLight => Operator::HardLight,
            CompOp::SoftLight => Operator::SoftLight,
            CompOp::Difference => Operator::Difference,
            CompOp::Exclusion => Operator::Exclusion,
        }
    }
}

make_property!(
    /// `display` property.
    Display,
    default: Inline,
    inherits_automatically: false,

    identifiers:
    "inline" => Inline,
    "block" => Block,
    "none" => None,
);

make_property!(
    /// `enable-background` property; `new` isolates the layer from its backdrop.
    EnableBackground,
    default: Accumulate,
    inherits_automatically: false,

    identifiers:
    "accumulate" => Accumulate,
    "new" => New,
);

make_property!(
    /// `fill` property.
    Fill,
    default: Rc::new(PaintServer::Solid(SolidColor::black())),
    inherits_automatically: true,
    newtype_parse: Rc<PaintServer>,
);

make_property!(
    /// `fill-opacity` property.
    FillOpacity,
    default: UnitInterval(1.0),
    inherits_automatically: true,
    newtype_parse: UnitInterval,
);

make_property!(
    /// `filter` property.
    Filter,
    default: IRI::None,
    inherits_automatically: false,
    newtype_parse: IRI,
);

make_property!(
    /// `flood-color` property, for `feFlood`.
    FloodColor,
    default: cssparser::Color::RGBA(cssparser::RGBA::new(0, 0, 0, 255)),
    inherits_automatically: false,
    newtype_parse: cssparser::Color,
);

make_property!(
    /// `flood-opacity` property, for `feFlood`.
    FloodOpacity,
    default: UnitInterval(1.0),
    inherits_automatically: false,
    newtype_parse: UnitInterval,
);

make_property!(
    /// `font-size` property.
    ///
    /// Relative sizes are resolved against the parent's size during the cascade, so
    /// computed values only hold absolute units.
    FontSize,
    default: ULength::<Both>::new(12.0, LengthUnit::Px),
    newtype_parse: ULength<Both>,
    property_impl: {
        impl Property for FontSize {
            fn inherits_automatically() -> bool {
                true
            }

            fn compute(&self, v: &ComputedValues) -> Self {
                let parent = v.font_size.value();

                let factor = match self.0.unit {
                    LengthUnit::Percent | LengthUnit::Em => self.0.length,
                    LengthUnit::Ex => self.0.length / 2.0,
                    _ => return self.clone(),
                };

                FontSize(ULength::<Both>::new(parent.length * factor, parent.unit))
            }
        }
    }
);

impl FontSize {
    pub fn value(&self) -> ULength<Both> {
        self.0
    }
}

make_property!(
    /// `mask` property.
    Mask,
    default: IRI::None,
    inherits_automatically: false,
    newtype_parse: IRI,
);

make_property!(
    /// `opacity` property.
    Opacity,
    default: UnitInterval(1.0),
    inherits_automatically: false,
    newtype_parse: UnitInterval,
);

make_property!(
    /// `stop-color` property, for gradient stops.
    StopColor,
    default: cssparser::Color::RGBA(cssparser::RGBA::new(0, 0, 0, 255)),
    inherits_automatically: false,
    newtype_parse: cssparser::Color,
);

make_property!(
    /// `stop-opacity` property, for gradient stops.
    StopOpacity,
    default: UnitInterval(1.0),
    inherits_automatically: false,
    newtype_parse: UnitInterval,
);

make_property!(
    /// `stroke` property.
    Stroke,
    default: Rc::new(PaintServer::None),
    inherits_automatically: true,
    newtype_parse: Rc<PaintServer>,
);

make_property!(
    /// `stroke-opacity` property.
    StrokeOpacity,
    default: UnitInterval(1.0),
    inherits_automatically: true,
    newtype_parse: UnitInterval,
);

make_property!(
    /// `stroke-width` property.
    StrokeWidth,
    default: Length::<Both>::new(1.0, LengthUnit::Px),
    inherits_automatically: true,
    newtype_parse: Length<Both>,
);

make_property!(
    /// `visibility` property.
    Visibility,
    default: Visible,
    inherits_automatically: true,

    identifiers:
    "visible" => Visible,
    "hidden" => Hidden,
    "collapse" => Collapse,
);

/// Presentation attributes of an element, before the cascade.
#[derive(Debug, Default, Clone)]
pub struct SpecifiedValues {
    pub clip_path: SpecifiedValue<ClipPath>,
    pub color: SpecifiedValue<Color>,
    pub comp_op: SpecifiedValue<CompOp>,
    pub display: SpecifiedValue<Display>,
    pub enable_background: SpecifiedValue<EnableBackground>,
    pub fill: SpecifiedValue<Fill>,
    pub fill_opacity: SpecifiedValue<FillOpacity>,
    pub filter: SpecifiedValue<Filter>,
    pub flood_color: SpecifiedValue<FloodColor>,
    pub flood_opacity: SpecifiedValue<FloodOpacity>,
    pub font_size: SpecifiedValue<FontSize>,
    pub mask: SpecifiedValue<Mask>,
    pub opacity: SpecifiedValue<Opacity>,
    pub stop_color: SpecifiedValue<StopColor>,
    pub stop_opacity: SpecifiedValue<StopOpacity>,
    pub stroke: SpecifiedValue<Stroke>,
    pub stroke_opacity: SpecifiedValue<StrokeOpacity>,
    pub stroke_width: SpecifiedValue<StrokeWidth>,
    pub visibility: SpecifiedValue<Visibility>,
}

/// Used values of the presentation properties for one element.
#[derive(Debug, Default, Clone)]
pub struct ComputedValues {
    pub clip_path: ClipPath,
    pub color: Color,
    pub comp_op: CompOp,
    pub display: Display,
    pub enable_background: EnableBackground,
    pub fill: Fill,
    pub fill_opacity: FillOpacity,
    pub filter: Filter,
    pub flood_color: FloodColor,
    pub flood_opacity: FloodOpacity,
    pub font_size: FontSize,
    pub mask: Mask,
    pub opacity: Opacity,
    pub stop_color: StopColor,
    pub stop_opacity: StopOpacity,
    pub stroke: Stroke,
    pub stroke_opacity: StrokeOpacity,
    pub stroke_width: StrokeWidth,
    pub visibility: Visibility,
}

impl ComputedValues {
    /// Whether the element takes part in rendering at all.
    pub fn is_visible(&self) -> bool {
        self.display != Display::None && self.visibility == Visibility::Visible
    }

    /// The `opacity` property as a byte.
    pub fn opacity_u8(&self) -> u8 {
        u8::from(self.opacity.0)
    }
}

fn parse_specified<T>(attr: &AttrName, value: &str) -> Result<SpecifiedValue<T>, ElementError>
where
    T: Property + Clone + Default + Parse,
{
    let mut input = ParserInput::new(value);
    let mut parser = Parser::new(&mut input);

    let is_inherit = parser
        .try_parse(|p| {
            p.expect_ident_matching("inherit")?;
            p.expect_exhausted()
        })
        .is_ok();

    if is_inherit {
        Ok(SpecifiedValue::Inherit)
    } else {
        let v: T = attr.parse(value)?;
        Ok(SpecifiedValue::Specified(v))
    }
}

impl SpecifiedValues {
    /// Whether `name` is one of the presentation attributes handled here.
    pub fn is_property_name(name: &str) -> bool {
        matches!(
            name,
            "clip-path"
                | "color"
                | "comp-op"
                | "display"
                | "enable-background"
                | "fill"
                | "fill-opacity"
                | "filter"
                | "flood-color"
                | "flood-opacity"
                | "font-size"
                | "mask"
                | "opacity"
                | "stop-color"
                | "stop-opacity"
                | "stroke"
                | "stroke-opacity"
                | "stroke-width"
                | "visibility"
        )
    }

    /// Parses a presentation attribute into the corresponding property.
    ///
    /// On error the property keeps its previous value.
    pub fn set_property_from_attribute(
        &mut self,
        attr: &AttrName,
        value: &str,
    ) -> Result<(), ElementError> {
        match attr.as_str() {
            "clip-path" => self.clip_path = parse_specified(attr, value)?,
            "color" => self.color = parse_specified(attr, value)?,
            "comp-op" => self.comp_op = parse_specified(attr, value)?,
            "display" => self.display = parse_specified(attr, value)?,
            "enable-background" => self.enable_background = parse_specified(attr, value)?,
            "fill" => self.fill = parse_specified(attr, value)?,
            "fill-opacity" => self.fill_opacity = parse_specified(attr, value)?,
            "filter" => self.filter = parse_specified(attr, value)?,
            "flood-color" => self.flood_color = parse_specified(attr, value)?,
            "flood-opacity" => self.flood_opacity = parse_specified(attr, value)?,
            "font-size" => self.font_size = parse_specified(attr, value)?,
            "mask" => self.mask = parse_specified(attr, value)?,
            "opacity" => self.opacity = parse_specified(attr, value)?,
            "stop-color" => self.stop_color = parse_specified(attr, value)?,
            "stop-opacity" => self.stop_opacity = parse_specified(attr, value)?,
            "stroke" => self.stroke = parse_specified(attr, value)?,
            "stroke-opacity" => self.stroke_opacity = parse_specified(attr, value)?,
            "stroke-width" => self.stroke_width = parse_specified(attr, value)?,
            "visibility" => self.visibility = parse_specified(attr, value)?,

            _ => {
                return Err(ElementError {
                    attr: attr.to_string(),
                    err: ValueErrorKind::UnknownProperty,
                })
            }
        }

        Ok(())
    }

    /// Turns `computed`, which holds the parent's values, into this element's values.
    pub fn to_computed_values(&self, computed: &mut ComputedValues) {
        macro_rules! compute {
            ($field:ident) => {
                let v = self.$field.compute(&computed.$field, computed);
                computed.$field = v;
            };
        }

        // font-size goes first; its relative values need the parent's size.
        compute!(font_size);

        compute!(clip_path);
        compute!(color);
        compute!(comp_op);
        compute!(display);
        compute!(enable_background);
        compute!(fill);
        compute!(fill_opacity);
        compute!(filter);
        compute!(flood_color);
        compute!(flood_opacity);
        compute!(mask);
        compute!(opacity);
        compute!(stop_color);
        compute!(stop_opacity);
        compute!(stroke);
        compute!(stroke_opacity);
        compute!(stroke_width);
        compute!(visibility);
    }
}
