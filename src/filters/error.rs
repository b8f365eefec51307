//! Errors from evaluating a `<filter>`.

use std::error;
use std::fmt;

/// Why a filter could not be evaluated.
///
/// A filter that fails leaves the element's layer as it was, so the element is drawn
/// without the filter.
#[derive(Debug, Clone)]
pub enum FilterError {
    /// The filter's attributes cannot be used for this element, for example
    /// `objectBoundingBox` units on an element with an empty bounding box.
    InvalidParameter(String),

    /// One of the primitives has an attribute with an invalid value.
    ChildNodeInError,

    /// An intermediate surface could not be created or drawn on.
    Cairo(cairo::Error),
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            FilterError::InvalidParameter(ref s) => write!(f, "cannot use filter: {}", s),
            FilterError::ChildNodeInError => write!(f, "a filter primitive is in error"),
            FilterError::Cairo(ref e) => write!(f, "cairo error in filter: {}", e),
        }
    }
}

impl error::Error for FilterError {}

impl From<cairo::Error> for FilterError {
    fn from(e: cairo::Error) -> FilterError {
        FilterError::Cairo(e)
    }
}
