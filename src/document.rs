//! Main SVG document structure.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::attributes::Attributes;
use crate::dpi::Dpi;
use crate::drawing_ctx::ViewParams;
use crate::error::{AcquireError, LoadingError, NodeIdError};
use crate::limits;
use crate::node::{Node, NodeBorrow, NodeCascade};
use crate::properties::ComputedValues;
use crate::session::Session;
use crate::structure::Svg;

/// Identifier of an element in the document, as written in a `url(#foo)` or `#foo`
/// reference.
///
/// Only references within the same document are supported.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: &str) -> NodeId {
        NodeId(id.to_string())
    }

    /// Parses a reference like `#foo`.
    ///
    /// A reference that includes a URL before the `#` points to another document, so it
    /// is rejected.
    pub fn parse(href: &str) -> Result<NodeId, NodeIdError> {
        match href.rfind('#') {
            Some(0) if href.len() > 1 => Ok(NodeId(String::from(&href[1..]))),
            Some(p) if p > 0 && p + 1 < href.len() => {
                Err(NodeIdError::ExternalReference(String::from(href)))
            }
            _ => Err(NodeIdError::NodeIdRequired),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A document tree ready for rendering.
pub struct Document {
    /// Tree of nodes; the root is guaranteed to be an `<svg>` element.
    tree: Node,

    /// Mapping from `id` attributes to nodes.
    ids: HashMap<String, Node>,
}

impl Document {
    /// Gets the root node.  This is guaranteed to be an `<svg>` element.
    pub fn root(&self) -> Node {
        self.tree.clone()
    }

    /// Looks up a node by its `id` attribute.
    pub fn lookup(&self, node_id: &NodeId) -> Option<Node> {
        self.ids.get(node_id.as_str()).cloned()
    }

    pub fn has_element_with_id(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    /// The size of the root `<svg>` element, in pixels at the given `dpi`.
    ///
    /// Percentages resolve against the `viewBox`, or to zero if there is none.
    pub fn nominal_size(&self, dpi: Dpi) -> (f64, f64) {
        let root = self.tree.borrow_element();
        let values = root.get_computed_values();
        let svg = borrow_element_as!(self.tree, Svg);

        let (vw, vh) = svg.get_viewbox().map(|vbox| vbox.size()).unwrap_or((0.0, 0.0));
        let params = ViewParams::new(dpi, vw, vh);

        svg.get_size(values, &params)
    }

    fn cascade(&mut self) {
        self.tree.cascade(&ComputedValues::default());
    }
}

pub struct AcquiredNode {
    stack: Rc<RefCell<NodeStack>>,
    node: Node,
}

impl Drop for AcquiredNode {
    fn drop(&mut self) {
        // Don't pile a second panic on top of one that is already unwinding.
        if std::thread::panicking() {
            return;
        }

        let last = self.stack.borrow_mut().pop();
        assert!(
            last.as_ref() == Some(&self.node),
            "acquired nodes must be released in reverse order of acquisition"
        );
    }
}

impl AcquiredNode {
    pub fn get(&self) -> &Node {
        &self.node
    }
}

/// Detects circular references between nodes, and enforces referencing limits.
///
/// Consider this fragment of SVG:
///
/// ```xml
/// <mask id="foo">
///   <rect width="1" height="1" mask="url(#foo)"/>
/// </mask>
/// ```
///
/// The mask has a child element that references the mask itself.  This kind of circular
/// reference is invalid.  The `AcquiredNodes` struct is used wherever it may be necessary
/// to resolve references to nodes, or to access nodes "elsewhere" in the DOM that is not
/// the current subtree.
///
/// Also, such constructs that reference other elements can be maliciously arranged like
/// in the [billion laughs attack][lol], to cause huge amounts of CPU to be consumed through
/// creating an exponential number of references.  `AcquiredNodes` imposes a hard limit on
/// the number of references that can be resolved for typical, well-behaved SVG documents.
///
/// The [`Self::acquire()`] method returns an [`AcquiredNode`], which acts like a smart
/// pointer for a [`Node`].  Once a node has been acquired, it cannot be acquired again
/// until its [`AcquiredNode`] is dropped.  In the example above, a graphic element would
/// acquire the `mask`, which would then draw its `rect` child, which then would fail to
/// re-acquire the `mask`, thus signaling a circular reference.
///
/// Acquired nodes form a stack, and they must be released in reverse order.
///
/// [lol]: https://bitbucket.org/tiran/defusedxml
pub struct AcquiredNodes<'i> {
    document: &'i Document,
    num_elements_acquired: usize,
    node_stack: Rc<RefCell<NodeStack>>,
}

impl<'i> AcquiredNodes<'i> {
    pub fn new(document: &Document) -> AcquiredNodes<'_> {
        AcquiredNodes {
            document,
            num_elements_acquired: 0,
            node_stack: Rc::new(RefCell::new(NodeStack::new())),
        }
    }

    /// Acquires a node by its id.
    pub fn acquire(&mut self, node_id: &NodeId) -> Result<AcquiredNode, AcquireError> {
        self.num_elements_acquired += 1;

        // This is a mitigation for SVG files that try to instance a huge number of
        // elements via <use>, recursive masks, etc.  See limits.rs for details.
        if self.num_elements_acquired > limits::MAX_REFERENCED_ELEMENTS {
            return Err(AcquireError::MaxReferencesExceeded);
        }

        let node = self
            .document
            .lookup(node_id)
            .ok_or_else(|| AcquireError::LinkNotFound(node_id.clone()))?;

        self.acquire_ref(&node)
    }

    /// Acquires a node whose reference is already known.
    pub fn acquire_ref(&self, node: &Node) -> Result<AcquiredNode, AcquireError> {
        if self.node_stack.borrow().contains(node) {
            Err(AcquireError::CircularReference(node.clone()))
        } else {
            self.node_stack.borrow_mut().push(node);
            Ok(AcquiredNode {
                stack: self.node_stack.clone(),
                node: node.clone(),
            })
        }
    }

    /// Number of nodes that are currently acquired.
    pub fn depth(&self) -> usize {
        self.node_stack.borrow().len()
    }
}

/// Keeps a stack of nodes and can check if a certain node is contained in the stack
///
/// Sometimes parts of the code cannot plainly use the implicit stack of acquired
/// nodes as maintained by DrawingCtx::acquire_node(), and they must keep their
/// own stack of nodes to test for reference cycles.  NodeStack can be used to do that.
pub struct NodeStack(Vec<Node>);

impl NodeStack {
    pub fn new() -> NodeStack {
        NodeStack(Vec::new())
    }

    pub fn push(&mut self, node: &Node) {
        self.0.push(node.clone());
    }

    pub fn pop(&mut self) -> Option<Node> {
        self.0.pop()
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.0.iter().any(|n| *n == *node)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for NodeStack {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a [`Document`] one element at a time.
///
/// ```
/// # use rsvg_render::{Attributes, DocumentBuilder, Session};
/// let mut builder = DocumentBuilder::new(Session::new_for_test_suite());
///
/// let root = builder.append_element(
///     "svg",
///     &Attributes::from(&[("width", "100"), ("height", "100")][..]),
///     None,
/// );
/// builder.append_element(
///     "rect",
///     &Attributes::from(&[("id", "r"), ("width", "10"), ("height", "10")][..]),
///     Some(&root),
/// );
///
/// let document = builder.build().unwrap();
/// assert!(document.has_element_with_id("r"));
/// ```
pub struct DocumentBuilder {
    session: Session,
    tree: Option<Node>,
    ids: HashMap<String, Node>,
}

impl DocumentBuilder {
    pub fn new(session: Session) -> DocumentBuilder {
        DocumentBuilder {
            session,
            tree: None,
            ids: HashMap::new(),
        }
    }

    /// Creates an element and appends it to `parent`, or makes it the root of the tree.
    ///
    /// Panics if there is no `parent` and the root has been set already.
    pub fn append_element(
        &mut self,
        name: &str,
        attrs: &Attributes,
        parent: Option<&Node>,
    ) -> Node {
        let node = Node::new(crate::element::Element::new(&self.session, name, attrs));

        if let Some(id) = node.borrow_element().get_id() {
            // This is so we don't overwrite an existing id
            self.ids
                .entry(id.to_string())
                .or_insert_with(|| node.clone());
        }

        if let Some(parent) = parent {
            parent.clone().append(node.clone());
        } else if self.tree.is_none() {
            self.tree = Some(node.clone());
        } else {
            panic!("The tree root has already been set");
        }

        node
    }

    /// Finishes the tree and computes every element's style values.
    pub fn build(self) -> Result<Document, LoadingError> {
        let DocumentBuilder { tree, ids, .. } = self;

        match tree {
            Some(root) if is_element_of_type!(root, Svg) => {
                let mut document = Document { tree: root, ids };
                document.cascade();
                Ok(document)
            }

            _ => Err(LoadingError::NoSvgRoot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::Opacity;
    use crate::unit_interval::UnitInterval;

    fn build(elements: &[(&str, &[(&str, &str)], Option<usize>)]) -> Result<Document, LoadingError> {
        let mut builder = DocumentBuilder::new(Session::new_for_test_suite());
        let mut nodes: Vec<Node> = Vec::new();

        for (name, attrs, parent) in elements {
            let parent = parent.map(|i| &nodes[i]);
            let node = builder.append_element(name, &Attributes::from(*attrs), parent);
            nodes.push(node);
        }

        builder.build()
    }

    #[test]
    fn parses_node_id() {
        assert_eq!(NodeId::parse("#foo").unwrap(), NodeId::new("foo"));

        assert!(matches!(
            NodeId::parse("uri#foo"),
            Err(NodeIdError::ExternalReference(_))
        ));

        assert!(matches!(
            NodeId::parse("uri"),
            Err(NodeIdError::NodeIdRequired)
        ));

        assert!(matches!(NodeId::parse("#"), Err(NodeIdError::NodeIdRequired)));
    }

    #[test]
    fn displays_node_id_as_fragment() {
        assert_eq!(NodeId::new("foo").to_string(), "#foo");
    }

    #[test]
    fn requires_svg_root() {
        assert!(matches!(
            build(&[("g", &[], None)]),
            Err(LoadingError::NoSvgRoot)
        ));
        assert!(matches!(build(&[]), Err(LoadingError::NoSvgRoot)));
    }

    #[test]
    fn first_id_wins() {
        let doc = build(&[
            ("svg", &[], None),
            ("rect", &[("id", "a"), ("width", "1")], Some(0)),
            ("circle", &[("id", "a")], Some(0)),
        ])
        .unwrap();

        let node = doc.lookup(&NodeId::new("a")).unwrap();
        assert!(is_element_of_type!(node, Rect));
        assert!(doc.lookup(&NodeId::new("b")).is_none());
    }

    #[test]
    fn cascades_on_build() {
        let doc = build(&[
            ("svg", &[("fill-opacity", "0.5"), ("opacity", "0.5")], None),
            ("rect", &[("id", "r")], Some(0)),
        ])
        .unwrap();

        let node = doc.lookup(&NodeId::new("r")).unwrap();
        let values = node.borrow_element().get_computed_values().clone();

        assert_eq!(values.fill_opacity.0, UnitInterval(0.5));
        assert_eq!(values.opacity, Opacity(UnitInterval(1.0)));
    }

    #[test]
    fn computes_nominal_size() {
        let dpi = Dpi::new(96.0, 96.0);

        let doc = build(&[("svg", &[("width", "1in"), ("height", "50")], None)]).unwrap();
        assert_eq!(doc.nominal_size(dpi), (96.0, 50.0));

        let doc = build(&[(
            "svg",
            &[("width", "50%"), ("height", "100%"), ("viewBox", "0 0 40 30")],
            None,
        )])
        .unwrap();
        assert_eq!(doc.nominal_size(dpi), (20.0, 30.0));

        let doc = build(&[("svg", &[], None)]).unwrap();
        assert_eq!(doc.nominal_size(dpi), (0.0, 0.0));
    }

    #[test]
    fn detects_cycles_and_releases_in_order() {
        let doc = build(&[
            ("svg", &[], None),
            ("g", &[("id", "a")], Some(0)),
            ("g", &[("id", "b")], Some(0)),
        ])
        .unwrap();

        let mut acquired_nodes = AcquiredNodes::new(&doc);

        let a = acquired_nodes.acquire(&NodeId::new("a")).unwrap();
        let b = acquired_nodes.acquire(&NodeId::new("b")).unwrap();

        assert!(matches!(
            acquired_nodes.acquire(&NodeId::new("a")),
            Err(AcquireError::CircularReference(_))
        ));
        assert!(matches!(
            acquired_nodes.acquire(&NodeId::new("nonexistent")),
            Err(AcquireError::LinkNotFound(_))
        ));

        assert_eq!(acquired_nodes.depth(), 2);
        drop(b);
        drop(a);
        assert_eq!(acquired_nodes.depth(), 0);
    }

    #[test]
    #[should_panic(expected = "reverse order")]
    fn releasing_out_of_order_panics() {
        let doc = build(&[
            ("svg", &[], None),
            ("g", &[("id", "a")], Some(0)),
            ("g", &[("id", "b")], Some(0)),
        ])
        .unwrap();

        let mut acquired_nodes = AcquiredNodes::new(&doc);

        let a = acquired_nodes.acquire(&NodeId::new("a")).unwrap();
        let _b = acquired_nodes.acquire(&NodeId::new("b")).unwrap();

        drop(a);
    }

    #[test]
    fn enforces_reference_limit() {
        let doc = build(&[("svg", &[], None), ("g", &[("id", "a")], Some(0))]).unwrap();
        let mut acquired_nodes = AcquiredNodes::new(&doc);

        for _ in 0..limits::MAX_REFERENCED_ELEMENTS {
            let a = acquired_nodes.acquire(&NodeId::new("a")).unwrap();
            drop(a);
        }

        assert!(matches!(
            acquired_nodes.acquire(&NodeId::new("a")),
            Err(AcquireError::MaxReferencesExceeded)
        ));
    }
}
