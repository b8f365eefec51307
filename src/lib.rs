//! Render SVG document trees into Cairo surfaces.
//!
//! This crate is the rendering core of an SVG renderer.  It takes a [`Document`], a tree
//! of SVG elements with their cascaded style, and draws it into a Cairo context.  Parsing
//! XML and CSS is not done here; documents are built one element at a time with a
//! [`DocumentBuilder`].
//!
//! Drawing is driven by a [`DrawingCtx`], which walks the tree and composites each
//! element through a discrete layer: an element with group opacity, a clipping path, a
//! mask, a filter or a compositing operator is rendered into an offscreen surface, which
//! then gets composited into its parent.  Elements without any of those effects are drawn
//! directly.
//!
//! References between elements (`<use>`, `clip-path`, `mask`, `filter`, and the
//! `xlink:href` chains of gradients and patterns) are resolved through the document's
//! acquisition stack, so that reference cycles are detected instead of recursing forever.
//!
//! # Example
//!
//! ```
//! use rsvg_render::{Attributes, CairoRenderer, DocumentBuilder, Session};
//!
//! let mut builder = DocumentBuilder::new(Session::new());
//!
//! let root = builder.append_element(
//!     "svg",
//!     &Attributes::from(&[("width", "50"), ("height", "50")][..]),
//!     None,
//! );
//! builder.append_element(
//!     "rect",
//!     &Attributes::from(
//!         &[("id", "foo"), ("x", "10"), ("y", "10"), ("width", "30"), ("height", "30")][..],
//!     ),
//!     Some(&root),
//! );
//!
//! let document = builder.build().unwrap();
//!
//! let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 50, 50).unwrap();
//! let cr = cairo::Context::new(&surface).expect("Failed to create a cairo context");
//!
//! let renderer = CairoRenderer::new(&document);
//! renderer.render_document(&cr).unwrap();
//! ```

#![allow(rustdoc::private_intra_doc_links)]
#![allow(clippy::clone_on_ref_ptr)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::derive_partial_eq_without_eq)]
#![warn(nonstandard_style, rust_2018_idioms, unused)]
// Some lints no longer exist
#![warn(renamed_and_removed_lints)]
// Standalone lints
#![warn(trivial_casts, trivial_numeric_casts)]

// Modules that define macros go first, so the macros are in scope for the rest.
#[macro_use]
mod util;

#[macro_use]
mod log;

#[macro_use]
mod parsers;

#[macro_use]
mod coord_units;

#[macro_use]
mod float_eq_cairo;

#[macro_use]
mod property_macros;

#[macro_use]
mod node;

pub use crate::api::*;

pub use crate::attributes::Attributes;
pub use crate::bbox::BoundingBox;
pub use crate::document::{Document, DocumentBuilder, NodeId};
pub use crate::dpi::Dpi;
pub use crate::drawing_ctx::{DrawingCtx, RenderOptions, ViewParams};
pub use crate::element::ElementType;
pub use crate::error::{AcquireError, LoadingError, RenderingError};
pub use crate::filter::{DefaultFilterRenderer, FilterRenderer};
pub use crate::filters::error::FilterError;
pub use crate::layer::{DeferredClip, Layer};
pub use crate::node::Node;
pub use crate::properties::ComputedValues;
pub use crate::rect::Rect;
pub use crate::session::Session;
pub use crate::transform::Transform;

mod api;
mod attributes;
mod bbox;
mod clip_path;
mod color;
mod document;
mod dpi;
mod drawing_ctx;
mod element;
mod error;
mod filter;
mod filters;
mod gradient;
mod iri;
mod layer;
mod length;
mod limits;
mod mask;
mod paint_server;
mod pattern;
mod pixbuf_utils;
mod properties;
mod rect;
mod session;
mod shapes;
mod structure;
mod surface_utils;
mod transform;
mod unit_interval;
mod viewbox;

#[doc(hidden)]
pub mod bench_only {
    pub use crate::pixbuf_utils::{pixbuf_from_surface, surface_from_pixbuf};
    pub use crate::surface_utils::{luminance_to_alpha, ImageSurfaceDataExt, Pixel, PixelOps};
}

#[doc(hidden)]
pub mod doctest_only {
    pub use crate::error::AttributeResultExt;
    pub use crate::error::ElementError;
    pub use crate::error::ValueErrorKind;
    pub use crate::length::{Both, Horizontal, Length, LengthUnit, ULength, Vertical};
    pub use crate::parsers::{Parse, ParseValue};
}
