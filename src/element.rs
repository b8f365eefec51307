//! SVG Elements.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

use crate::attributes::Attributes;
use crate::clip_path::ClipPath;
use crate::drawing_ctx::DrawingCtx;
use crate::error::*;
use crate::filter::Filter;
use crate::filters::{flood::FeFlood, offset::FeOffset, tile::FeTile, FilterEffect};
use crate::gradient::{LinearGradient, RadialGradient, Stop};
use crate::mask::Mask;
use crate::node::Node;
use crate::parsers::ParseValue;
use crate::pattern::Pattern;
use crate::properties::{ComputedValues, SpecifiedValues};
use crate::session::Session;
use crate::shapes::{Circle, Ellipse, Rect};
use crate::structure::{Group, NonRendering, Svg, Use};
use crate::transform::Transform;

pub trait ElementTrait {
    /// Sets per-element attributes.
    ///
    /// Each element is supposed to iterate the `attributes`, and parse any ones it needs.
    /// SVG specifies that unknown attributes should be ignored, and known attributes with invalid
    /// values should be ignored so that the attribute ends up with its "initial value".
    ///
    /// You can use the [`set_attribute`] function to do that.
    fn set_attributes(&mut self, _attributes: &Attributes, _errors: &mut AttributeErrors<'_>) {}

    /// Draw an element.
    ///
    /// Each element is supposed to draw itself as needed.  `values` are the element's
    /// computed values.
    fn draw(
        &self,
        _node: &Node,
        _values: &ComputedValues,
        _draw_ctx: &mut DrawingCtx<'_>,
        _clipping: bool,
    ) -> Result<(), RenderingError> {
        // by default elements don't draw themselves
        Ok(())
    }
}

/// Collects the attribute errors of an element while it is being created.
pub struct AttributeErrors<'s> {
    session: &'s Session,
    errors: Vec<ElementError>,
}

impl<'s> AttributeErrors<'s> {
    pub fn new(session: &'s Session) -> AttributeErrors<'s> {
        AttributeErrors {
            session,
            errors: Vec::new(),
        }
    }

    /// Logs an error and keeps it for the element's error list.
    pub fn record(&mut self, error: ElementError) {
        rsvg_log!(self.session, "ignoring attribute with invalid value: {}", error);
        self.errors.push(error);
    }

    pub(crate) fn into_vec(self) -> Vec<ElementError> {
        self.errors
    }
}

/// Sets `dest` if `parse_result` is `Ok()`, otherwise records the error.
///
/// Implementations of the [`ElementTrait`] trait generally scan a list of attributes
/// for the ones they can handle, and parse their string values.  Per the SVG spec, an attribute
/// with an invalid value should be ignored, and it should fall back to the default value.
///
/// Those default values are set in each element's implementation of the [`Default`] trait:
/// at element creation time, each element gets initialized to its `Default`, and then each
/// attribute gets parsed.  This function will set that attribute's value only if parsing was
/// successful.
pub fn set_attribute<T>(
    dest: &mut T,
    parse_result: Result<T, ElementError>,
    errors: &mut AttributeErrors<'_>,
) {
    match parse_result {
        Ok(v) => *dest = v,
        Err(e) => errors.record(e),
    }
}

pub struct Element {
    element_name: String,
    id: Option<String>,
    transform: Transform,
    specified_values: SpecifiedValues,
    values: ComputedValues,
    errors: Vec<ElementError>,
    pub element_data: ElementData,
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.element_name)?;
        write!(f, " id={}", self.get_id().unwrap_or("None"))?;
        Ok(())
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Parsed contents of an element node in the DOM.
///
/// This enum uses `Box<Foo>` in order to make each variant the size of
/// a pointer.
pub enum ElementData {
    Circle(Box<Circle>),
    ClipPath(Box<ClipPath>),
    Ellipse(Box<Ellipse>),
    Filter(Box<Filter>),
    Group(Box<Group>),
    LinearGradient(Box<LinearGradient>),
    Mask(Box<Mask>),
    NonRendering(Box<NonRendering>),
    Pattern(Box<Pattern>),
    RadialGradient(Box<RadialGradient>),
    Rect(Box<Rect>),
    Stop(Box<Stop>),
    Svg(Box<Svg>),
    Use(Box<Use>),

    // Filter primitives, these start with "Fe" as element names are e.g. "feFlood"
    FeFlood(Box<FeFlood>),
    FeOffset(Box<FeOffset>),
    FeTile(Box<FeTile>),
}

/// The kind of an element, without its data.
///
/// Used to check that a reference points to the right kind of element.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ElementType {
    Circle,
    ClipPath,
    Ellipse,
    Filter,
    Group,
    LinearGradient,
    Mask,
    NonRendering,
    Pattern,
    RadialGradient,
    Rect,
    Stop,
    Svg,
    Use,
    FeFlood,
    FeOffset,
    FeTile,
}

type ElementDataCreateFn =
    fn(attributes: &Attributes, errors: &mut AttributeErrors<'_>) -> ElementData;

#[rustfmt::skip]
static ELEMENT_CREATORS: Lazy<HashMap<&'static str, ElementDataCreateFn>> = Lazy::new(|| {
    let creators_table: Vec<(&str, ElementDataCreateFn)> = vec![
        // name,                create_fn
        ("circle",              create_circle),
        ("clipPath",            create_clip_path),
        ("defs",                create_defs),
        ("ellipse",             create_ellipse),
        ("feFlood",             create_fe_flood),
        ("feOffset",            create_fe_offset),
        ("feTile",              create_fe_tile),
        ("filter",              create_filter),
        ("g",                   create_group),
        ("linearGradient",      create_linear_gradient),
        ("mask",                create_mask),
        ("pattern",             create_pattern),
        ("radialGradient",      create_radial_gradient),
        ("rect",                create_rect),
        ("stop",                create_stop),
        ("svg",                 create_svg),
        ("use",                 create_use),
    ];

    creators_table.into_iter().collect()
});

impl Element {
    /// Takes an element name and a list of attribute/value pairs to create an [`Element`].
    ///
    /// This operation does not fail.  Unknown element names simply produce a [`NonRendering`]
    /// element, and attributes with invalid values are recorded in [`Element::errors`].
    pub fn new(session: &Session, name: &str, attributes: &Attributes) -> Element {
        let create_fn = ELEMENT_CREATORS
            .get(name)
            .copied()
            // Whenever we encounter a element name we don't understand, represent it as a
            // non-rendering element.  This is like a group, but it doesn't do any rendering
            // of children.  The effect is that we will ignore all children of unknown elements.
            .unwrap_or(create_non_rendering as ElementDataCreateFn);

        let mut errors = AttributeErrors::new(session);
        let element_data = create_fn(attributes, &mut errors);

        let mut e = Element {
            element_name: name.to_string(),
            id: None,
            transform: Transform::identity(),
            specified_values: Default::default(),
            values: Default::default(),
            errors: Vec::new(),
            element_data,
        };

        e.set_common_attributes(attributes, &mut errors);
        e.errors = errors.into_vec();

        e
    }

    /// Parses the attributes that every element supports: `id`, `transform`, and the
    /// presentation attributes for properties.
    fn set_common_attributes(&mut self, attributes: &Attributes, errors: &mut AttributeErrors<'_>) {
        for (attr, value) in attributes.iter() {
            match attr.as_str() {
                "id" => self.id = Some(value.to_string()),

                "transform" => set_attribute(&mut self.transform, attr.parse(value), errors),

                name if SpecifiedValues::is_property_name(name) => {
                    if let Err(e) = self.specified_values.set_property_from_attribute(attr, value)
                    {
                        errors.record(e);
                    }
                }

                _ => (),
            }
        }
    }

    pub fn element_name(&self) -> &str {
        &self.element_name
    }

    pub fn get_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The element's `transform` attribute; the identity if it is not set.
    pub fn get_transform(&self) -> Transform {
        self.transform
    }

    pub fn get_specified_values(&self) -> &SpecifiedValues {
        &self.specified_values
    }

    pub fn get_computed_values(&self) -> &ComputedValues {
        &self.values
    }

    pub fn set_computed_values(&mut self, values: &ComputedValues) {
        self.values = values.clone();
    }

    /// Attribute errors found while creating the element.
    pub fn errors(&self) -> &[ElementError] {
        &self.errors
    }

    pub fn is_in_error(&self) -> bool {
        !self.errors.is_empty()
    }

    #[rustfmt::skip]
    pub fn element_type(&self) -> ElementType {
        use ElementData::*;

        match self.element_data {
            Circle(_) =>         ElementType::Circle,
            ClipPath(_) =>       ElementType::ClipPath,
            Ellipse(_) =>        ElementType::Ellipse,
            Filter(_) =>         ElementType::Filter,
            Group(_) =>          ElementType::Group,
            LinearGradient(_) => ElementType::LinearGradient,
            Mask(_) =>           ElementType::Mask,
            NonRendering(_) =>   ElementType::NonRendering,
            Pattern(_) =>        ElementType::Pattern,
            RadialGradient(_) => ElementType::RadialGradient,
            Rect(_) =>           ElementType::Rect,
            Stop(_) =>           ElementType::Stop,
            Svg(_) =>            ElementType::Svg,
            Use(_) =>            ElementType::Use,
            FeFlood(_) =>        ElementType::FeFlood,
            FeOffset(_) =>       ElementType::FeOffset,
            FeTile(_) =>         ElementType::FeTile,
        }
    }

    #[rustfmt::skip]
    pub fn as_filter_effect(&self) -> Option<&dyn FilterEffect> {
        use ElementData::*;

        match &self.element_data {
            FeFlood(fe) =>  Some(&**fe),
            FeOffset(fe) => Some(&**fe),
            FeTile(fe) =>   Some(&**fe),
            _ => None,
        }
    }

    /// The main drawing function for elements.
    pub fn draw(
        &self,
        node: &Node,
        draw_ctx: &mut DrawingCtx<'_>,
        clipping: bool,
    ) -> Result<(), RenderingError> {
        self.element_data
            .draw(node, &self.values, draw_ctx, clipping)
    }
}

impl ElementData {
    /// Dispatcher for the draw method of concrete element implementations.
    #[rustfmt::skip]
    fn draw(
        &self,
        node: &Node,
        values: &ComputedValues,
        draw_ctx: &mut DrawingCtx<'_>,
        clipping: bool,
    ) -> Result<(), RenderingError> {
        use ElementData::*;

        let data: &dyn ElementTrait = match self {
            Circle(d) =>         &**d,
            ClipPath(d) =>       &**d,
            Ellipse(d) =>        &**d,
            Filter(d) =>         &**d,
            Group(d) =>          &**d,
            LinearGradient(d) => &**d,
            Mask(d) =>           &**d,
            NonRendering(d) =>   &**d,
            Pattern(d) =>        &**d,
            RadialGradient(d) => &**d,
            Rect(d) =>           &**d,
            Stop(d) =>           &**d,
            Svg(d) =>            &**d,
            Use(d) =>            &**d,
            FeFlood(d) =>        &**d,
            FeOffset(d) =>       &**d,
            FeTile(d) =>         &**d,
        };

        data.draw(node, values, draw_ctx, clipping)
    }
}

macro_rules! e {
    ($name:ident, $element_type:ident) => {
        pub fn $name(attributes: &Attributes, errors: &mut AttributeErrors<'_>) -> ElementData {
            let mut payload = Box::<$element_type>::default();
            payload.set_attributes(attributes, errors);

            ElementData::$element_type(payload)
        }
    };
}

#[rustfmt::skip]
mod creators {
    use super::*;

    e!(create_circle,           Circle);
    e!(create_clip_path,        ClipPath);
    e!(create_defs,             NonRendering);
    e!(create_ellipse,          Ellipse);
    e!(create_fe_flood,         FeFlood);
    e!(create_fe_offset,        FeOffset);
    e!(create_fe_tile,          FeTile);
    e!(create_filter,           Filter);
    e!(create_group,            Group);
    e!(create_linear_gradient,  LinearGradient);
    e!(create_mask,             Mask);
    e!(create_non_rendering,    NonRendering);
    e!(create_pattern,          Pattern);
    e!(create_radial_gradient,  RadialGradient);
    e!(create_rect,             Rect);
    e!(create_stop,             Stop);
    e!(create_svg,              Svg);
    e!(create_use,              Use);
}

use creators::*;

#[cfg(test)]
mod tests {
    use super::*;

    fn new_element(name: &str, attrs: &[(&str, &str)]) -> Element {
        Element::new(
            &Session::new_for_test_suite(),
            name,
            &Attributes::from(attrs),
        )
    }

    #[test]
    fn unknown_elements_are_non_rendering() {
        let e = new_element("foo", &[("id", "bar")]);

        assert_eq!(e.element_type(), ElementType::NonRendering);
        assert_eq!(e.get_id(), Some("bar"));
        assert_eq!(e.to_string(), "foo id=bar");
    }

    #[test]
    fn defs_is_non_rendering() {
        assert_eq!(new_element("defs", &[]).element_type(), ElementType::NonRendering);
    }

    #[test]
    fn parses_transform_attribute() {
        let e = new_element("g", &[("transform", "translate(10, 20)")]);

        assert_eq!(e.get_transform(), Transform::new_translate(10.0, 20.0));
        assert!(!e.is_in_error());
    }

    #[test]
    fn records_errors_and_keeps_parsing_siblings() {
        let e = new_element(
            "rect",
            &[("transform", "scale(0)"), ("opacity", "bogus"), ("fill", "red")],
        );

        let attrs: Vec<&str> = e.errors().iter().map(|err| err.attr.as_str()).collect();
        assert_eq!(attrs, vec!["transform", "opacity"]);

        assert_eq!(e.get_transform(), Transform::identity());

        let mut values = ComputedValues::default();
        e.get_specified_values().to_computed_values(&mut values);
        assert_eq!(values.opacity, ComputedValues::default().opacity);
        assert_ne!(values.fill, ComputedValues::default().fill);
    }

    #[test]
    fn filter_primitives_are_filter_effects() {
        assert!(new_element("feFlood", &[]).as_filter_effect().is_some());
        assert!(new_element("feOffset", &[]).as_filter_effect().is_some());
        assert!(new_element("feTile", &[]).as_filter_effect().is_some());
        assert!(new_element("pattern", &[]).as_filter_effect().is_none());
        assert!(new_element("rect", &[]).as_filter_effect().is_none());
    }
}
