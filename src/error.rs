//! Error types.

use std::error;
use std::fmt;

use cssparser::{BasicParseError, BasicParseErrorKind, ParseErrorKind, ToCss};

use crate::document::NodeId;
use crate::node::Node;

/// A short-lived error.
///
/// The lifetime of the error is the same as the `cssparser::ParserInput` that
/// was used to create a `cssparser::Parser`.  That is, it is the lifetime of
/// the string data that is being parsed.
///
/// The code flow will sometimes require preserving this error as a long-lived struct;
/// see the `impl<'i, O> AttributeResultExt<O> for Result<O, ParseError<'i>>` for that
/// purpose.
pub type ParseError<'i> = cssparser::ParseError<'i, ValueErrorKind>;

/// A simple error which refers to an attribute's value
#[derive(Debug, Clone, PartialEq)]
pub enum ValueErrorKind {
    /// A property with the specified name was not found
    UnknownProperty,

    /// The value could not be parsed
    Parse(String),

    // The value could be parsed, but is invalid
    Value(String),
}

impl ValueErrorKind {
    pub fn parse_error(s: &str) -> ValueErrorKind {
        ValueErrorKind::Parse(s.to_string())
    }

    pub fn value_error(s: &str) -> ValueErrorKind {
        ValueErrorKind::Value(s.to_string())
    }
}

impl fmt::Display for ValueErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ValueErrorKind::UnknownProperty => write!(f, "unknown property name"),

            ValueErrorKind::Parse(ref s) => write!(f, "parse error: {}", s),

            ValueErrorKind::Value(ref s) => write!(f, "invalid value: {}", s),
        }
    }
}

impl<'a> From<BasicParseError<'a>> for ValueErrorKind {
    fn from(e: BasicParseError<'_>) -> ValueErrorKind {
        let BasicParseError { kind, .. } = e;

        let msg = match kind {
            BasicParseErrorKind::UnexpectedToken(_) => "unexpected token",
            BasicParseErrorKind::EndOfInput => "unexpected end of input",
            BasicParseErrorKind::AtRuleInvalid(_) => "invalid @-rule",
            BasicParseErrorKind::AtRuleBodyInvalid => "invalid @-rule body",
            BasicParseErrorKind::QualifiedRuleInvalid => "invalid qualified rule",
        };

        ValueErrorKind::parse_error(msg)
    }
}

/// A complete error for an attribute and its erroneous value
#[derive(Debug, Clone, PartialEq)]
pub struct ElementError {
    pub attr: String,
    pub err: ValueErrorKind,
}

impl fmt::Display for ElementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.attr, self.err)
    }
}

/// Errors from parsing a fragment identifier like `#foo`.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeIdError {
    /// The reference has no `#fragment` part.
    NodeIdRequired,

    /// The reference points into another document, which is not supported.
    ExternalReference(String),
}

impl fmt::Display for NodeIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            NodeIdError::NodeIdRequired => write!(f, "fragment identifier required"),
            NodeIdError::ExternalReference(ref url) => {
                write!(f, "references to other documents are not supported: {}", url)
            }
        }
    }
}

impl From<NodeIdError> for ValueErrorKind {
    fn from(e: NodeIdError) -> ValueErrorKind {
        ValueErrorKind::value_error(&e.to_string())
    }
}

/// Errors that can happen while rendering or measuring a document.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum RenderingError {
    /// An error from the rendering backend.
    Rendering(String),

    /// A particular implementation-defined limit was exceeded.
    LimitExceeded(String),

    /// Tried to reference an element that does not exist.
    IdNotFound,

    /// Tried to reference an element from a fragment identifier that is incorrect.
    InvalidId(String),

    /// Not enough memory was available for rendering.
    OutOfMemory(String),

    /// The document's nominal size is zero in at least one dimension, so there is no
    /// canvas to render to.
    ZeroSizedCanvas,
}

impl error::Error for RenderingError {}

impl RenderingError {
    /// The document references elements more times than `limits::MAX_REFERENCED_ELEMENTS`.
    pub(crate) fn too_many_references() -> RenderingError {
        RenderingError::LimitExceeded(String::from("too many referenced elements"))
    }
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            RenderingError::Rendering(ref s) => write!(f, "rendering error: {}", s),
            RenderingError::LimitExceeded(ref s) => write!(f, "limit exceeded: {}", s),
            RenderingError::IdNotFound => write!(f, "element id not found"),
            RenderingError::InvalidId(ref s) => write!(f, "invalid id: {:?}", s),
            RenderingError::OutOfMemory(ref s) => write!(f, "out of memory: {}", s),
            RenderingError::ZeroSizedCanvas => write!(f, "document has a zero-sized canvas"),
        }
    }
}

impl From<cairo::Error> for RenderingError {
    fn from(e: cairo::Error) -> RenderingError {
        match e {
            cairo::Error::NoMemory => RenderingError::OutOfMemory(format!("{:?}", e)),
            _ => RenderingError::Rendering(format!("{:?}", e)),
        }
    }
}

impl From<cairo::BorrowError> for RenderingError {
    fn from(e: cairo::BorrowError) -> RenderingError {
        RenderingError::Rendering(format!("could not access surface data: {:?}", e))
    }
}

/// Errors that can happen while building a document.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadingError {
    /// The tree is empty, or its root element is not `<svg>`.
    NoSvgRoot,
}

impl error::Error for LoadingError {}

impl fmt::Display for LoadingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            LoadingError::NoSvgRoot => write!(f, "root element is not <svg>"),
        }
    }
}

/// Errors from [`crate::document::AcquiredNodes::acquire`].
#[derive(Debug, Clone)]
pub enum AcquireError {
    LinkNotFound(NodeId),
    InvalidLinkType(NodeId),
    CircularReference(Node),
    MaxReferencesExceeded,
}

impl fmt::Display for AcquireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            AcquireError::LinkNotFound(ref id) => write!(f, "link not found: {}", id),

            AcquireError::InvalidLinkType(ref id) => {
                write!(f, "link {} is to object of invalid type", id)
            }

            AcquireError::CircularReference(ref node) => {
                write!(f, "circular reference in node {}", node.borrow())
            }

            AcquireError::MaxReferencesExceeded => {
                write!(f, "maximum number of references exceeded")
            }
        }
    }
}

/// Helper for converting `Result<O, E>` into `Result<O, ElementError>`
///
/// A `ElementError` requires the name of the attribute to which the error refers, plus
/// the actual `ValueErrorKind` that describes the error.  However, parsing functions for
/// attribute value types will want to return their own kind of error, instead of
/// `ValueErrorKind`.  If that particular error type has an `impl From<FooError> for
/// ValueErrorKind`, then this trait helps assign attribute values in
/// `set_attributes()` methods as follows:
///
/// ```
/// # use rsvg_render::doctest_only::{AttributeResultExt, ElementError, ValueErrorKind};
/// # type FooError = ValueErrorKind;
/// fn parse_foo(value: &str) -> Result<(), FooError>
/// # { Err(ValueErrorKind::value_error("test")) }
///
/// // It is assumed that there is an impl From<FooError> for ValueErrorKind
/// let result = parse_foo("value").attribute("foo");
/// assert!(result.is_err());
/// # Ok::<(), ElementError>(())
/// ```
///
/// The call to `.attribute(attr)` converts the `Result` from `parse_foo()` into a full
/// `ElementError` with the provided `attr`.
pub trait AttributeResultExt<O> {
    fn attribute(self, attr: &str) -> Result<O, ElementError>;
}

impl<O, E: Into<ValueErrorKind>> AttributeResultExt<O> for Result<O, E> {
    fn attribute(self, attr: &str) -> Result<O, ElementError> {
        self.map_err(|e| e.into()).map_err(|err| ElementError {
            attr: attr.to_string(),
            err,
        })
    }
}

/// Turns a short-lived `ParseError` into a long-lived `ElementError`
impl<'i, O> AttributeResultExt<O> for Result<O, ParseError<'i>> {
    fn attribute(self, attr: &str) -> Result<O, ElementError> {
        self.map_err(|e| {
            let ParseError {
                kind,
                location: _location,
            } = e;

            let err = match kind {
                ParseErrorKind::Basic(BasicParseErrorKind::UnexpectedToken(tok)) => {
                    let mut s = String::from("unexpected token '");
                    // Writing into a String cannot fail.
                    let _ = tok.to_css(&mut s);
                    s.push('\'');

                    ValueErrorKind::Parse(s)
                }

                ParseErrorKind::Basic(BasicParseErrorKind::EndOfInput) => {
                    ValueErrorKind::parse_error("unexpected end of input")
                }

                ParseErrorKind::Basic(_) => {
                    unreachable!("attribute parsers should not return errors for CSS rules")
                }

                ParseErrorKind::Custom(err) => err,
            };

            ElementError {
                attr: attr.to_string(),
                err,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::Parse;

    #[test]
    fn converts_unexpected_token_to_element_error() {
        let res = f64::parse_str("foo").attribute("x");

        assert_eq!(
            res,
            Err(ElementError {
                attr: "x".to_string(),
                err: ValueErrorKind::Parse("unexpected token 'foo'".to_string()),
            })
        );
    }

    #[test]
    fn converts_end_of_input_to_element_error() {
        let res = f64::parse_str("").attribute("y");

        assert_eq!(
            res,
            Err(ElementError {
                attr: "y".to_string(),
                err: ValueErrorKind::parse_error("unexpected end of input"),
            })
        );
    }

    #[test]
    fn keeps_custom_errors() {
        let res: Result<f64, ValueErrorKind> = Err(ValueErrorKind::value_error("negative"));

        assert_eq!(
            res.attribute("r").unwrap_err().to_string(),
            "r: invalid value: negative"
        );
    }

    #[test]
    fn cairo_errors_map_to_rendering_errors() {
        assert!(matches!(
            RenderingError::from(cairo::Error::NoMemory),
            RenderingError::OutOfMemory(_)
        ));

        assert!(matches!(
            RenderingError::from(cairo::Error::InvalidSize),
            RenderingError::Rendering(_)
        ));
    }
}
