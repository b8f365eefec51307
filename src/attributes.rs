//! Attribute lists for elements created through the document builder.

use std::fmt;

/// The name of an attribute, like `x1` or `xlink:href`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttrName(String);

impl AttrName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AttrName {
    fn from(s: &str) -> AttrName {
        AttrName(s.to_string())
    }
}

impl fmt::Display for AttrName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The attributes of an element, in document order.
#[derive(Debug, Clone, Default)]
pub struct Attributes(Vec<(AttrName, String)>);

impl Attributes {
    pub fn new() -> Attributes {
        Attributes(Vec::new())
    }

    pub fn push(&mut self, name: &str, value: &str) {
        self.0.push((AttrName::from(name), value.to_string()));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the value of the first attribute with the given name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AttrName, &str)> {
        self.0.iter().map(|(n, v)| (n, v.as_str()))
    }
}

impl<'a> From<&[(&'a str, &'a str)]> for Attributes {
    fn from(pairs: &[(&'a str, &'a str)]) -> Attributes {
        let mut attrs = Attributes::new();

        for (name, value) in pairs {
            attrs.push(name, value);
        }

        attrs
    }
}
