//! Processing limits to mitigate malicious SVGs.

/// Maximum number of times that elements can be referenced through URL fragments.
///
/// This is a mitigation for the security-related bugs:
/// <https://gitlab.gnome.org/GNOME/librsvg/issues/323>
/// <https://gitlab.gnome.org/GNOME/librsvg/issues/515>
///
/// Imagine the XML [billion laughs attack], but done in SVG's terms:
///
/// - #323 above creates deeply nested groups of `<use>` elements.  The first one references
/// the second one ten times, the second one references the third one ten times, and so on.
/// In the file given, this causes 10^17 objects to be rendered.
///
/// - #515 has deep nesting of references to paint servers.
///
/// This limit is for the maximum number of references that can be acquired during a single
/// render pass.
///
/// [billion laughs attack]: https://bitbucket.org/tiran/defusedxml
pub const MAX_REFERENCED_ELEMENTS: usize = 500_000;

/// Maximum depth of element recursion while drawing.
///
/// The acquisition stack bounds recursion through references, but a plain tree of nested
/// groups can be arbitrarily deep.  Each level of nesting costs several stack frames, so
/// drawing stops descending past this depth.
pub const MAX_NESTING_DEPTH: usize = 256;
