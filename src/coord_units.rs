//! The coordinate systems named by `gradientUnits`, `patternUnits`, `maskUnits` and friends.

use cssparser::Parser;

use crate::bbox::BoundingBox;
use crate::error::*;
use crate::parse_identifiers;
use crate::parsers::Parse;
use crate::transform::Transform;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CoordUnits {
    /// Plain user space of the element being painted, clipped or filtered.
    UserSpaceOnUse,

    /// Fractions of that element's bounding box, where (0, 0) and (1, 1) are its corners.
    ObjectBoundingBox,
}

impl CoordUnits {
    /// Maps these units into the user space whose bounding box is `bbox`.
    ///
    /// Returns `None` for `objectBoundingBox` when the box is missing or has no area,
    /// in which case the referencing feature paints nothing.
    pub fn to_user_space(self, bbox: &BoundingBox) -> Option<Transform> {
        match self {
            CoordUnits::UserSpaceOnUse => Some(Transform::identity()),
            CoordUnits::ObjectBoundingBox => bbox
                .rect
                .filter(|r| !r.is_empty())
                .map(|r| Transform::from_unit_square(&r)),
        }
    }
}

impl Parse for CoordUnits {
    fn parse<'i>(parser: &mut Parser<'i, '_>) -> Result<Self, ParseError<'i>> {
        Ok(parse_identifiers!(
            parser,
            "objectBoundingBox" => CoordUnits::ObjectBoundingBox,
            "userSpaceOnUse" => CoordUnits::UserSpaceOnUse,
        )?)
    }
}

/// Declares `$name`, an attribute-specific wrapper for `CoordUnits` defaulting to `$default`.
///
/// `clipPathUnits` and `maskContentUnits` start out as `userSpaceOnUse` while
/// `maskUnits` and `gradientUnits` start out as `objectBoundingBox`, so each
/// attribute gets its own type and `Default` stays correct at every use site.
#[macro_export]
macro_rules! coord_units {
    ($name:ident, $default:expr) => {
        #[derive(Debug, Copy, Clone, PartialEq, Eq)]
        pub struct $name(pub $crate::coord_units::CoordUnits);

        impl Default for $name {
            fn default() -> $name {
                $name($default)
            }
        }

        impl From<$name> for $crate::coord_units::CoordUnits {
            fn from(units: $name) -> $crate::coord_units::CoordUnits {
                units.0
            }
        }

        impl $crate::parsers::Parse for $name {
            fn parse<'i>(
                parser: &mut ::cssparser::Parser<'i, '_>,
            ) -> Result<$name, $crate::error::ParseError<'i>> {
                $crate::coord_units::CoordUnits::parse(parser).map($name)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rect::Rect;

    coord_units!(BoxUnits, CoordUnits::ObjectBoundingBox);
    coord_units!(SpaceUnits, CoordUnits::UserSpaceOnUse);

    #[test]
    fn wrappers_have_their_own_defaults() {
        assert_eq!(CoordUnits::from(BoxUnits::default()), CoordUnits::ObjectBoundingBox);
        assert_eq!(CoordUnits::from(SpaceUnits::default()), CoordUnits::UserSpaceOnUse);
    }

    #[test]
    fn wrappers_parse_both_keywords() {
        assert_eq!(
            SpaceUnits::parse_str("objectBoundingBox").unwrap(),
            SpaceUnits(CoordUnits::ObjectBoundingBox)
        );
        assert_eq!(
            BoxUnits::parse_str("userSpaceOnUse").unwrap(),
            BoxUnits(CoordUnits::UserSpaceOnUse)
        );

        // Keywords are case-sensitive.
        assert!(BoxUnits::parse_str("userspaceonuse").is_err());
        assert!(BoxUnits::parse_str("").is_err());
    }

    #[test]
    fn object_bounding_box_maps_unit_square_onto_box() {
        let bbox = BoundingBox::new().with_rect(Rect::new(10.0, 20.0, 50.0, 30.0));

        let t = CoordUnits::ObjectBoundingBox.to_user_space(&bbox).unwrap();
        assert_eq!(t.transform_point(0.0, 0.0), (10.0, 20.0));
        assert_eq!(t.transform_point(1.0, 1.0), (50.0, 30.0));

        let t = CoordUnits::UserSpaceOnUse.to_user_space(&bbox).unwrap();
        assert_eq!(t.transform_point(3.0, 4.0), (3.0, 4.0));
    }

    #[test]
    fn object_bounding_box_needs_an_area() {
        let flat = BoundingBox::new().with_rect(Rect::new(0.0, 5.0, 10.0, 5.0));

        assert!(CoordUnits::ObjectBoundingBox.to_user_space(&flat).is_none());
        assert!(CoordUnits::ObjectBoundingBox
            .to_user_space(&BoundingBox::new())
            .is_none());
        assert!(CoordUnits::UserSpaceOnUse
            .to_user_space(&BoundingBox::new())
            .is_some());
    }
}
