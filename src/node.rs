//! Tree nodes, the representation of SVG elements.
//!
//! The [rctree crate][rctree] provides the tree itself.  Its [`rctree::Node`] struct is a
//! reference-counted handle to a node; we put an [`Element`] as its type parameter, and
//! define a type alias [`Node`]` = rctree::Node<Element>` for convenience.
//!
//! Nodes are not constructed directly by callers; use
//! [`crate::document::DocumentBuilder`] instead.

use std::cell::{Ref, RefMut};

use crate::element::Element;
use crate::properties::ComputedValues;

/// Strong reference to an element in the SVG tree.
///
/// See the [module documentation][self] for more information.
pub type Node = rctree::Node<Element>;

/// Helper trait to borrow the element inside a node.
///
/// This only names the borrows, so that code which walks the tree reads the same as
/// code which looks at a single element.
pub trait NodeBorrow {
    /// Borrows an `Element` reference.
    fn borrow_element(&self) -> Ref<'_, Element>;

    /// Borrows an `Element` reference mutably.
    fn borrow_element_mut(&mut self) -> RefMut<'_, Element>;
}

impl NodeBorrow for Node {
    fn borrow_element(&self) -> Ref<'_, Element> {
        self.borrow()
    }

    fn borrow_element_mut(&mut self) -> RefMut<'_, Element> {
        self.borrow_mut()
    }
}

#[macro_export]
macro_rules! is_element_of_type {
    ($node:expr, $element_type:ident) => {
        {
            use $crate::node::NodeBorrow as _;

            matches!(
                $node.borrow_element().element_data,
                $crate::element::ElementData::$element_type(_)
            )
        }
    };
}

/// Borrows the element-specific data of a node, which must be of the given type.
///
/// Panics if the node holds another kind of element; check with
/// [`is_element_of_type!`] first if unsure.
#[macro_export]
macro_rules! borrow_element_as {
    ($node:expr, $element_type:ident) => {
        {
            use $crate::node::NodeBorrow as _;

            std::cell::Ref::map($node.borrow_element(), |e| match e.element_data {
                $crate::element::ElementData::$element_type(ref e) => &**e,
                _ => panic!("tried to borrow_element_as {}", stringify!($element_type)),
            })
        }
    };
}

/// Helper trait for cascading recursively
pub trait NodeCascade {
    fn cascade(&mut self, values: &ComputedValues);
}

impl NodeCascade for Node {
    fn cascade(&mut self, values: &ComputedValues) {
        let mut values = values.clone();

        {
            let mut elt = self.borrow_element_mut();

            elt.get_specified_values().to_computed_values(&mut values);
            elt.set_computed_values(&values);
        }

        for mut child in self.children() {
            child.cascade(&values);
        }
    }
}
