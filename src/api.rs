//! Public entry points for rendering a [`Document`] to a Cairo context.

use std::rc::Rc;

use gdk_pixbuf::Pixbuf;

use crate::document::{Document, NodeId};
use crate::dpi::Dpi;
use crate::drawing_ctx::{DrawingCtx, RenderOptions};
use crate::error::RenderingError;
use crate::filter::{DefaultFilterRenderer, FilterRenderer};
use crate::node::Node;
use crate::pixbuf_utils::{empty_pixbuf, pixbuf_from_surface};
use crate::rect::Rect;
use crate::session::Session;

/// Can render a [`Document`] to a Cairo context.
///
/// The document is drawn at its nominal size, under the context's current transform.
pub struct CairoRenderer<'a> {
    document: &'a Document,
    session: Session,
    dpi: Dpi,
    force_layers: bool,
    filter_renderer: Rc<dyn FilterRenderer>,
}

impl<'a> CairoRenderer<'a> {
    /// Creates a `CairoRenderer` for the specified `Document`.
    ///
    /// The default dots-per-inch (DPI) value is set to 96; you can change it
    /// with the [`with_dpi`] method.
    ///
    /// [`with_dpi`]: #method.with_dpi
    pub fn new(document: &'a Document) -> Self {
        CairoRenderer {
            document,
            session: Session::new(),
            dpi: Dpi::default(),
            force_layers: false,
            filter_renderer: Rc::new(DefaultFilterRenderer),
        }
    }

    /// Configures the dots-per-inch for resolving physical lengths.
    ///
    /// If an SVG document has physical units like `5cm`, they must be resolved
    /// to pixel-based values.  The default pixel density is 96 DPI in
    /// both dimensions.
    pub fn with_dpi(self, dpi_x: f64, dpi_y: f64) -> Self {
        assert!(dpi_x > 0.0);
        assert!(dpi_y > 0.0);

        CairoRenderer {
            dpi: Dpi::new(dpi_x, dpi_y),
            ..self
        }
    }

    /// Replaces the evaluator for the `filter` property.
    pub fn with_filter_renderer(self, filter_renderer: Rc<dyn FilterRenderer>) -> Self {
        CairoRenderer {
            filter_renderer,
            ..self
        }
    }

    /// Turns on test mode.  Do not use this function; it is for the test suite only.
    ///
    /// This only swaps in the test-suite session, which keeps logging quiet; rendering is
    /// the same.
    #[doc(hidden)]
    pub fn test_mode(self, enabled: bool) -> Self {
        CairoRenderer {
            session: if enabled {
                Session::new_for_test_suite()
            } else {
                self.session
            },
            ..self
        }
    }

    /// Draws every element into its own offscreen layer.  For the test suite only.
    #[doc(hidden)]
    pub fn force_layers(self, force_layers: bool) -> Self {
        CairoRenderer {
            force_layers,
            ..self
        }
    }

    fn options(&self) -> RenderOptions {
        RenderOptions {
            dpi: self.dpi,
            force_layers: self.force_layers,
            filter_renderer: self.filter_renderer.clone(),
        }
    }

    fn lookup_node(&self, id: &str) -> Result<Node, RenderingError> {
        let node_id = NodeId::parse(id).map_err(|_| RenderingError::InvalidId(id.to_string()))?;

        self.document
            .lookup(&node_id)
            .ok_or(RenderingError::IdNotFound)
    }

    /// Draws the whole document, or only the path from the root to `node` and `node`'s
    /// subtree.  Returns the accumulated (ink, logical) boxes in device space.
    fn draw_tree(
        &self,
        cr: &cairo::Context,
        node: Option<&Node>,
    ) -> Result<(Option<Rect>, Option<Rect>), RenderingError> {
        cr.status()?;

        let mut draw_ctx = DrawingCtx::new(self.document, cr, self.session, self.options())?;

        if let Some(node) = node {
            draw_ctx.add_node_and_ancestors_to_stack(node);
        }

        draw_ctx.draw_node_from_stack(&self.document.root(), false)?;

        let to_device = |bbox: &crate::bbox::BoundingBox| {
            bbox.rect.map(|r| bbox.transform.transform_rect(&r))
        };

        Ok((to_device(draw_ctx.get_ink_bbox()), to_device(draw_ctx.get_bbox())))
    }

    /// Renders the whole document.
    ///
    /// The `cr` must be in a `cairo::Status::Success` state, or this function
    /// will not render anything, and instead will return the `cr`'s current error state.
    pub fn render_document(&self, cr: &cairo::Context) -> Result<(), RenderingError> {
        self.draw_tree(cr, None).map(|_| ())
    }

    /// Renders a single element in the same place as for the whole document.
    ///
    /// Only the element given by `id`, its children, and the containers that lead to it
    /// from the root are drawn; the containers keep contributing their transforms,
    /// opacity, masks and so on.
    ///
    /// Note that the `id` must be a plain fragment identifier like `#foo`, with
    /// a leading `#` character.
    pub fn render_element(&self, cr: &cairo::Context, id: &str) -> Result<(), RenderingError> {
        let node = self.lookup_node(id)?;

        self.draw_tree(cr, Some(&node)).map(|_| ())
    }

    /// Computes the (ink_rect, logical_rect) of an element, in the coordinates of the
    /// document's canvas.
    ///
    /// The "ink rectangle" is the bounding box that would be painted for fully stroked
    /// and filled elements.  The "logical rectangle" just takes into account the
    /// unstroked paths.
    ///
    /// Pass `None` for the `id` to measure the whole document.
    pub fn geometry_for_element(&self, id: Option<&str>) -> Result<(Rect, Rect), RenderingError> {
        let node = id.map(|id| self.lookup_node(id)).transpose()?;

        let target = cairo::ImageSurface::create(cairo::Format::ARgb32, 1, 1)?;
        let cr = cairo::Context::new(&target)?;

        let (ink_rect, logical_rect) = self.draw_tree(&cr, node.as_ref())?;

        Ok((ink_rect.unwrap_or_default(), logical_rect.unwrap_or_default()))
    }

    /// Renders the document, or a single element if `id` is given, to a new pixbuf of
    /// the document's nominal size.
    pub fn render_to_pixbuf(&self, id: Option<&str>) -> Result<Pixbuf, RenderingError> {
        let (width, height) = self.document.nominal_size(self.dpi);

        let to_pixels = |v: f64| {
            cast::i32(v.ceil()).map_err(|_| {
                RenderingError::LimitExceeded(format!("image dimension {} is too big", v))
            })
        };

        let width = to_pixels(width)?;
        let height = to_pixels(height)?;

        if width <= 0 || height <= 0 {
            return empty_pixbuf();
        }

        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height)?;

        {
            let cr = cairo::Context::new(&surface)?;

            match id {
                Some(id) => self.render_element(&cr, id)?,
                None => self.render_document(&cr)?,
            }
        }

        pixbuf_from_surface(&surface)
    }
}
