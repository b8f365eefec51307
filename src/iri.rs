//! CSS funciri values.

use cssparser::Parser;

use crate::document::NodeId;
use crate::error::*;
use crate::parsers::Parse;

/// Used where style properties take a funciri or "none"
///
/// This is the type for `clip-path`, `mask` and `filter`.  Only references
/// to elements in the same document are accepted.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum IRI {
    #[default]
    None,
    Resource(NodeId),
}

impl IRI {
    /// Returns the contents of an `IRI::Resource`, or `None`
    pub fn get(&self) -> Option<&NodeId> {
        match *self {
            IRI::None => None,
            IRI::Resource(ref id) => Some(id),
        }
    }
}

impl Parse for IRI {
    fn parse<'i>(parser: &mut Parser<'i, '_>) -> Result<IRI, ParseError<'i>> {
        if parser
            .try_parse(|i| i.expect_ident_matching("none"))
            .is_ok()
        {
            Ok(IRI::None)
        } else {
            let loc = parser.current_source_location();
            let url = parser.expect_url()?;
            let id =
                NodeId::parse(&url).map_err(|e| loc.new_custom_error(ValueErrorKind::from(e)))?;

            Ok(IRI::Resource(id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_none() {
        assert_eq!(IRI::parse_str("none").unwrap(), IRI::None);
    }

    #[test]
    fn parses_url() {
        assert_eq!(
            IRI::parse_str("url(#bar)").unwrap(),
            IRI::Resource(NodeId::new("bar"))
        );

        // be permissive if the closing ) is missing
        assert_eq!(
            IRI::parse_str("url(#bar").unwrap(),
            IRI::Resource(NodeId::new("bar"))
        );

        assert!(IRI::parse_str("").is_err());
        assert!(IRI::parse_str("foo").is_err());
        assert!(IRI::parse_str("url(#foo)bar").is_err());
    }

    #[test]
    fn rejects_references_to_other_documents() {
        assert!(IRI::parse_str("url(foo.svg#bar)").is_err());
        assert!(IRI::parse_str("url(bar)").is_err());
    }
}
