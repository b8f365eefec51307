//! The main context structure which drives the drawing process.

use std::rc::Rc;

use crate::bbox::BoundingBox;
use crate::coord_units::CoordUnits;
use crate::document::{AcquiredNode, AcquiredNodes, Document, NodeId};
use crate::dpi::Dpi;
use crate::element::ElementType;
use crate::error::{AcquireError, RenderingError};
use crate::filter::{DefaultFilterRenderer, FilterRenderer};
use crate::limits;
use crate::node::{Node, NodeBorrow};
use crate::properties::ComputedValues;
use crate::rect::Rect;
use crate::session::Session;
use crate::transform::Transform;

/// Holds values that are required to normalize `CssLength` values to a current viewport.
///
/// This struct is created by calling `DrawingCtx::push_view_box()` or
/// `DrawingCtx::get_view_params()`.
///
/// This struct holds the size of the current viewport in the user's coordinate system.  A
/// viewport pushed with `DrawingCtx::push_view_box()` will remain in place until the
/// matching `DrawingCtx::pop_view_box()`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewParams {
    pub dpi: Dpi,
    pub vbox: Rect,
}

impl ViewParams {
    pub fn new(dpi: Dpi, view_box_width: f64, view_box_height: f64) -> ViewParams {
        ViewParams {
            dpi,
            vbox: Rect::from_size(view_box_width, view_box_height),
        }
    }

    /// Returns the view parameters to use for lengths in the given units.
    ///
    /// Lengths in `objectBoundingBox` units are fractions of the bounding box, so
    /// their percentages resolve against a 1x1 viewport.
    pub fn with_units(&self, units: CoordUnits) -> ViewParams {
        match units {
            CoordUnits::ObjectBoundingBox => ViewParams::new(self.dpi, 1.0, 1.0),
            CoordUnits::UserSpaceOnUse => *self,
        }
    }
}

/// Options for a render pass.
#[derive(Clone)]
pub struct RenderOptions {
    pub dpi: Dpi,

    /// Disables the fast path in `push_discrete_layer`, so that every element is drawn
    /// into its own offscreen surface.  Only useful for checking that both paths render
    /// the same.
    pub force_layers: bool,

    pub filter_renderer: Rc<dyn FilterRenderer>,
}

impl Default for RenderOptions {
    fn default() -> RenderOptions {
        RenderOptions {
            dpi: Dpi::default(),
            force_layers: false,
            filter_renderer: Rc::new(DefaultFilterRenderer),
        }
    }
}

pub struct DrawingCtx<'i> {
    session: Session,

    /// Canvas in device space.  Offscreen surfaces have this size, and `x0, y0` is the
    /// offset of the canvas with respect to the initial context.
    rect: Rect,

    dpi: Dpi,

    pub(crate) cr_stack: Vec<cairo::Context>,
    pub(crate) cr: cairo::Context,
    initial_cr: cairo::Context,

    pub(crate) surfaces_stack: Vec<cairo::ImageSurface>,

    view_box: Rect,
    view_box_stack: Vec<Rect>,

    pub(crate) bbox: BoundingBox,
    pub(crate) bbox_stack: Vec<BoundingBox>,
    pub(crate) ink_bbox: BoundingBox,
    pub(crate) ink_bbox_stack: Vec<BoundingBox>,

    acquired_nodes: AcquiredNodes<'i>,

    drawsub_stack: Vec<Node>,

    nesting_depth: usize,

    pub(crate) filter_renderer: Rc<dyn FilterRenderer>,

    pub(crate) force_layers: bool,
}

impl<'i> DrawingCtx<'i> {
    /// Creates a drawing context for the `document` on top of `cr`.
    ///
    /// The canvas is the document's nominal size, mapped through the current transform
    /// of `cr` and rounded outwards to whole pixels.
    pub fn new(
        document: &'i Document,
        cr: &cairo::Context,
        session: Session,
        options: RenderOptions,
    ) -> Result<DrawingCtx<'i>, RenderingError> {
        let (width, height) = document.nominal_size(options.dpi);

        if !(width > 0.0 && height > 0.0) {
            return Err(RenderingError::ZeroSizedCanvas);
        }

        let affine = Transform::from(cr.matrix());
        let extents = affine.transform_rect(&Rect::from_size(width, height));
        let rect = Rect::new(
            extents.x0.floor(),
            extents.y0.floor(),
            extents.x1.ceil(),
            extents.y1.ceil(),
        );

        Ok(DrawingCtx {
            session,
            rect,
            dpi: options.dpi,
            cr_stack: Vec::new(),
            cr: cr.clone(),
            initial_cr: cr.clone(),
            surfaces_stack: Vec::new(),
            view_box: Rect::from_size(width, height),
            view_box_stack: Vec::new(),
            bbox: BoundingBox::new().with_transform(affine),
            bbox_stack: Vec::new(),
            ink_bbox: BoundingBox::new().with_transform(affine),
            ink_bbox_stack: Vec::new(),
            acquired_nodes: AcquiredNodes::new(document),
            drawsub_stack: Vec::new(),
            nesting_depth: 0,
            filter_renderer: options.filter_renderer,
            force_layers: options.force_layers,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn get_cairo_context(&self) -> cairo::Context {
        self.cr.clone()
    }

    /// Whether `cr` is an offscreen context, as opposed to the one the caller passed in.
    pub fn is_cairo_context_nested(&self, cr: &cairo::Context) -> bool {
        cr.to_raw_none() != self.initial_cr.to_raw_none()
    }

    pub fn get_transform(&self) -> Transform {
        Transform::from(self.cr.matrix())
    }

    /// Canvas size in whole pixels.
    pub fn canvas_size(&self) -> Result<(i32, i32), RenderingError> {
        let to_i32 = |v: f64| {
            cast::i32(v).map_err(|_| {
                RenderingError::LimitExceeded(format!("canvas dimension {} is too big", v))
            })
        };

        Ok((to_i32(self.rect.width())?, to_i32(self.rect.height())?))
    }

    /// Offset of the canvas for the current target.
    ///
    /// Offscreen surfaces already have the canvas origin at (0, 0), so this is only
    /// nonzero while drawing on the initial context.
    pub fn get_offset(&self) -> (f64, f64) {
        if self.is_cairo_context_nested(&self.cr) {
            (0.0, 0.0)
        } else {
            (self.rect.x0, self.rect.y0)
        }
    }

    /// Transform for a new offscreen context that starts from `transform`, which is in
    /// the space of the current target.
    pub(crate) fn canvas_transform(&self, transform: &Transform) -> Transform {
        let (x, y) = self.get_offset();
        transform.post_translate(-x, -y)
    }

    pub fn get_view_params(&self) -> ViewParams {
        ViewParams {
            dpi: self.dpi,
            vbox: self.view_box,
        }
    }

    /// Sets a new viewport size for resolving percentage lengths.
    ///
    /// Must be paired with [`Self::pop_view_box`].
    pub fn push_view_box(&mut self, width: f64, height: f64) -> ViewParams {
        self.view_box_stack.push(self.view_box);
        self.view_box = Rect::from_size(width, height);
        self.get_view_params()
    }

    pub fn pop_view_box(&mut self) {
        match self.view_box_stack.pop() {
            Some(vbox) => self.view_box = vbox,
            None => panic!("pop_view_box() called without a matching push_view_box()"),
        }
    }

    pub fn with_view_box<F, T>(&mut self, width: f64, height: f64, f: F) -> T
    where
        F: FnOnce(&mut Self) -> T,
    {
        self.push_view_box(width, height);
        let res = f(self);
        self.pop_view_box();
        res
    }

    pub fn insert_bbox(&mut self, bbox: &BoundingBox) {
        self.bbox.insert(bbox);
    }

    pub fn insert_ink_bbox(&mut self, bbox: &BoundingBox) {
        self.ink_bbox.insert(bbox);
    }

    pub fn get_bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn get_ink_bbox(&self) -> &BoundingBox {
        &self.ink_bbox
    }

    /// Runs `f` with both boxes saved, and puts them back afterwards.
    pub(crate) fn with_saved_bboxes<F, T>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut Self) -> T,
    {
        let bbox = self.bbox;
        let ink_bbox = self.ink_bbox;

        let res = f(self);

        self.bbox = bbox;
        self.ink_bbox = ink_bbox;
        res
    }

    /// Acquires a node by its id, reporting why it could not be acquired.
    ///
    /// Nodes acquired by this function must be released in reverse acquiring order.
    pub fn try_acquire_node(&mut self, node_id: &NodeId) -> Result<AcquiredNode, AcquireError> {
        self.acquired_nodes.acquire(node_id)
    }

    /// Use this function when looking up urls to other nodes.
    ///
    /// This does proper recursion checking and thereby avoids infinite loops.  A missing
    /// node, or one that is already acquired, is logged and returned as `Ok(None)`;
    /// callers treat it as if the reference was not there.  Going over the limit of
    /// referenced elements is an error, which aborts the current subtree.
    ///
    /// Note that if you acquire a node, you have to release it before trying to
    /// acquire it again.  If you acquire a node "#foo" and don't release it before
    /// trying to acquire "foo" again, you will obtain `None` the second time.
    pub fn acquire_node(
        &mut self,
        node_id: &NodeId,
    ) -> Result<Option<AcquiredNode>, RenderingError> {
        match self.acquired_nodes.acquire(node_id) {
            Ok(acquired) => Ok(Some(acquired)),

            Err(AcquireError::MaxReferencesExceeded) => {
                rsvg_log!(
                    self.session,
                    "exceeded {} referenced elements while acquiring {}",
                    limits::MAX_REFERENCED_ELEMENTS,
                    node_id
                );
                Err(RenderingError::too_many_references())
            }

            Err(e) => {
                rsvg_log!(self.session, "could not acquire {}: {}", node_id, e);
                Ok(None)
            }
        }
    }

    /// Like [`Self::acquire_node`], but only returns the node if it has the given type.
    ///
    /// Malformed SVGs, for example, may reference a marker by its IRI, but the object
    /// referenced by the IRI is not a marker.
    pub fn acquire_node_of_type(
        &mut self,
        node_id: &NodeId,
        element_type: ElementType,
    ) -> Result<Option<AcquiredNode>, RenderingError> {
        let acquired = match self.acquire_node(node_id)? {
            Some(acquired) => acquired,
            None => return Ok(None),
        };

        if acquired.get().borrow_element().element_type() == element_type {
            Ok(Some(acquired))
        } else {
            rsvg_log!(
                self.session,
                "element {} is not of type {:?}",
                node_id,
                element_type
            );
            self.release_node(acquired);
            Ok(None)
        }
    }

    /// Releases a node that was acquired with one of the `acquire_*` functions.
    ///
    /// Dropping the [`AcquiredNode`] has the same effect.
    pub fn release_node(&mut self, acquired: AcquiredNode) {
        drop(acquired);
    }

    /// Acquires a node that is already at hand, without counting it as a reference.
    ///
    /// This catches content that, while being drawn, refers back to `node`.
    pub fn acquire_node_ref(&mut self, node: &Node) -> Result<AcquiredNode, AcquireError> {
        self.acquired_nodes.acquire_ref(node)
    }

    /// Runs `f` with `cr` as the drawing target, for content that is not part of the
    /// current element, like a pattern tile.
    ///
    /// Both boxes and the subtree restriction are restored afterwards.
    pub(crate) fn with_target<F>(&mut self, cr: &cairo::Context, f: F) -> Result<(), RenderingError>
    where
        F: FnOnce(&mut Self) -> Result<(), RenderingError>,
    {
        self.cr_stack.push(std::mem::replace(&mut self.cr, cr.clone()));

        let res = self.with_saved_bboxes(|dc| dc.without_drawsub_stack(f));

        self.cr = match self.cr_stack.pop() {
            Some(cr) => cr,
            None => panic!("cr_stack is empty when leaving a target"),
        };

        res
    }

    /// Restricts drawing to the subtree that leads from the root to `node`.
    pub fn add_node_and_ancestors_to_stack(&mut self, node: &Node) {
        self.drawsub_stack.extend(node.ancestors());
    }

    /// Runs `f` without the subtree restriction.
    ///
    /// Content that is drawn by reference, like a mask's children or the target of a
    /// `<use>`, is not part of the path from the root.
    pub(crate) fn without_drawsub_stack<F, T>(&mut self, f: F) -> T
    where
        F: FnOnce(&mut Self) -> T,
    {
        let saved = std::mem::take(&mut self.drawsub_stack);
        let res = f(self);
        self.drawsub_stack = saved;
        res
    }

    pub fn draw_node_from_stack(&mut self, node: &Node, clipping: bool) -> Result<(), RenderingError> {
        let stack_top = self.drawsub_stack.pop();

        let draw = if let Some(ref top) = stack_top {
            top == node
        } else {
            true
        };

        let res = if draw {
            self.draw_node(node, clipping)
        } else {
            Ok(())
        };

        if let Some(top) = stack_top {
            self.drawsub_stack.push(top);
        }

        res
    }

    fn draw_node(&mut self, node: &Node, clipping: bool) -> Result<(), RenderingError> {
        let elt = node.borrow_element();

        if !elt.get_computed_values().is_visible() {
            return Ok(());
        }

        if self.nesting_depth >= limits::MAX_NESTING_DEPTH {
            rsvg_log!(
                self.session,
                "nesting depth exceeded {} levels while drawing {}",
                limits::MAX_NESTING_DEPTH,
                *elt
            );
            return Err(RenderingError::LimitExceeded(String::from(
                "exceeded maximum nesting depth",
            )));
        }

        self.nesting_depth += 1;

        let res = self.with_saved_transform(Some(elt.get_transform()), |dc| {
            elt.draw(node, dc, clipping)
        });

        self.nesting_depth -= 1;

        res
    }

    /// Draws the element children of `node`.
    ///
    /// A child that fails is skipped and its siblings are still drawn, unless a
    /// limit was exceeded; in that case the whole subtree is abandoned.
    pub fn draw_children(&mut self, node: &Node, clipping: bool) -> Result<(), RenderingError> {
        for child in node.children() {
            match self.draw_node_from_stack(&child, clipping) {
                Ok(()) => (),

                Err(e @ RenderingError::LimitExceeded(_)) => return Err(e),

                Err(e) => {
                    rsvg_log!(
                        self.session,
                        "(skipping {} because of error: {})",
                        *child.borrow_element(),
                        e
                    );
                }
            }
        }

        Ok(())
    }

    /// Applies `transform` to the current target while `f` runs.
    ///
    /// A non-invertible transform makes the content invisible, so `f` is not run at all.
    pub fn with_saved_transform<F>(
        &mut self,
        transform: Option<Transform>,
        f: F,
    ) -> Result<(), RenderingError>
    where
        F: FnOnce(&mut Self) -> Result<(), RenderingError>,
    {
        let orig_matrix = self.cr.matrix();

        if let Some(t) = transform {
            if !t.is_invertible() {
                return Ok(());
            }

            self.cr.transform(t.into());
        }

        let res = f(self);

        self.cr.set_matrix(orig_matrix);

        res
    }

    /// Draws a shape whose path is emitted by `path_fn`.
    ///
    /// While clipping, the path is only appended to the current path, to be used by
    /// the clip path's `cairo_clip()`.
    pub fn draw_shape<F>(
        &mut self,
        values: &ComputedValues,
        clipping: bool,
        path_fn: F,
    ) -> Result<(), RenderingError>
    where
        F: Fn(&cairo::Context),
    {
        let cr = self.cr.clone();

        if clipping {
            path_fn(&cr);
            return Ok(());
        }

        cr.new_path();
        path_fn(&cr);

        let transform = Transform::from(cr.matrix());

        let (x0, y0, x1, y1) = cr.fill_extents()?;
        let bbox = BoundingBox::new()
            .with_transform(transform)
            .with_rect(Rect::new(x0, y0, x1, y1));

        let stroke_width = values.stroke_width.0.to_user(values, &self.get_view_params());
        cr.set_line_width(stroke_width);

        let mut ink_bbox = bbox;
        if *values.stroke.0 != crate::paint_server::PaintServer::None && stroke_width > 0.0 {
            let (x0, y0, x1, y1) = cr.stroke_extents()?;
            ink_bbox.insert(
                &BoundingBox::new()
                    .with_transform(transform)
                    .with_rect(Rect::new(x0, y0, x1, y1)),
            );
        }

        self.insert_bbox(&bbox);
        self.insert_ink_bbox(&ink_bbox);

        let fill = values.fill.0.resolve(self)?;
        if fill.set_as_source(self, &bbox, values, values.fill_opacity.0)? {
            cr.fill_preserve()?;
        }

        let stroke = values.stroke.0.resolve(self)?;
        if stroke_width > 0.0 && stroke.set_as_source(self, &bbox, values, values.stroke_opacity.0)? {
            cr.stroke_preserve()?;
        }

        cr.new_path();

        Ok(())
    }
}

impl<'i> Drop for DrawingCtx<'i> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            return;
        }

        assert!(self.cr_stack.is_empty(), "cr_stack is not empty");
        assert!(self.surfaces_stack.is_empty(), "surfaces_stack is not empty");
        assert!(self.bbox_stack.is_empty(), "bbox_stack is not empty");
        assert!(self.ink_bbox_stack.is_empty(), "ink_bbox_stack is not empty");
        assert!(self.view_box_stack.is_empty(), "view_box_stack is not empty");
        assert!(
            self.acquired_nodes.depth() == 0,
            "acquired nodes were not released"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Attributes;
    use crate::document::DocumentBuilder;

    fn document(width: &str, height: &str) -> Document {
        let mut builder = DocumentBuilder::new(Session::new_for_test_suite());
        let root = builder.append_element(
            "svg",
            &Attributes::from(&[("width", width), ("height", height)][..]),
            None,
        );
        builder.append_element(
            "g",
            &Attributes::from(&[("id", "a")][..]),
            Some(&root),
        );
        builder.append_element(
            "g",
            &Attributes::from(&[("id", "b")][..]),
            Some(&root),
        );
        builder.build().unwrap()
    }

    fn context(width: i32, height: i32) -> cairo::Context {
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height).unwrap();
        cairo::Context::new(&surface).unwrap()
    }

    fn new_draw_ctx<'i>(doc: &'i Document, cr: &cairo::Context) -> DrawingCtx<'i> {
        DrawingCtx::new(doc, cr, Session::new_for_test_suite(), RenderOptions::default()).unwrap()
    }

    #[test]
    fn view_params_for_object_bounding_box() {
        let params = ViewParams::new(Dpi::default(), 200.0, 100.0);

        assert_eq!(params.with_units(CoordUnits::UserSpaceOnUse), params);
        assert_eq!(
            params.with_units(CoordUnits::ObjectBoundingBox).vbox,
            Rect::from_size(1.0, 1.0)
        );
    }

    #[test]
    fn zero_sized_canvas_is_an_error() {
        let doc = document("0", "10");
        let cr = context(10, 10);

        assert!(matches!(
            DrawingCtx::new(&doc, &cr, Session::new_for_test_suite(), RenderOptions::default()),
            Err(RenderingError::ZeroSizedCanvas)
        ));
    }

    #[test]
    fn canvas_is_rounded_outwards() {
        let doc = document("10.5", "20");
        let cr = context(40, 40);
        cr.translate(0.25, 0.5);

        let draw_ctx = new_draw_ctx(&doc, &cr);

        assert_eq!(draw_ctx.rect, Rect::new(0.0, 0.0, 11.0, 21.0));
        assert_eq!(draw_ctx.canvas_size().unwrap(), (11, 21));
        assert_eq!(draw_ctx.get_offset(), (0.0, 0.0));
    }

    #[test]
    fn offset_is_zero_for_offscreen_targets() {
        let doc = document("10", "10");
        let cr = context(40, 40);
        cr.translate(5.0, 7.0);

        let mut draw_ctx = new_draw_ctx(&doc, &cr);
        assert_eq!(draw_ctx.get_offset(), (5.0, 7.0));

        let offscreen = context(10, 10);
        let saved = std::mem::replace(&mut draw_ctx.cr, offscreen);
        assert_eq!(draw_ctx.get_offset(), (0.0, 0.0));
        draw_ctx.cr = saved;
    }

    #[test]
    fn view_boxes_nest() {
        let doc = document("100", "50");
        let cr = context(100, 50);
        let mut draw_ctx = new_draw_ctx(&doc, &cr);

        assert_eq!(draw_ctx.get_view_params().vbox, Rect::from_size(100.0, 50.0));

        let inner = draw_ctx.with_view_box(1.0, 1.0, |dc| dc.get_view_params().vbox);
        assert_eq!(inner, Rect::from_size(1.0, 1.0));

        assert_eq!(draw_ctx.get_view_params().vbox, Rect::from_size(100.0, 50.0));
    }

    #[test]
    #[should_panic(expected = "pop_view_box")]
    fn unbalanced_pop_view_box_panics() {
        let doc = document("100", "50");
        let cr = context(100, 50);
        let mut draw_ctx = new_draw_ctx(&doc, &cr);

        draw_ctx.pop_view_box();
    }

    #[test]
    fn acquires_nodes_of_type() {
        let doc = document("10", "10");
        let cr = context(10, 10);
        let mut draw_ctx = new_draw_ctx(&doc, &cr);

        assert!(draw_ctx
            .acquire_node_of_type(&NodeId::new("a"), ElementType::Mask)
            .unwrap()
            .is_none());

        let a = draw_ctx
            .acquire_node_of_type(&NodeId::new("a"), ElementType::Group)
            .unwrap()
            .unwrap();
        assert!(draw_ctx.acquire_node(&NodeId::new("a")).unwrap().is_none());

        let b = draw_ctx.acquire_node(&NodeId::new("b")).unwrap().unwrap();
        draw_ctx.release_node(b);
        draw_ctx.release_node(a);

        assert!(draw_ctx
            .acquire_node(&NodeId::new("nonexistent"))
            .unwrap()
            .is_none());
    }

    #[test]
    fn too_many_references_is_an_error() {
        let doc = document("10", "10");
        let cr = context(10, 10);
        let mut draw_ctx = new_draw_ctx(&doc, &cr);

        for _ in 0..limits::MAX_REFERENCED_ELEMENTS {
            let a = draw_ctx.acquire_node(&NodeId::new("a")).unwrap().unwrap();
            draw_ctx.release_node(a);
        }

        assert!(matches!(
            draw_ctx.acquire_node(&NodeId::new("a")),
            Err(RenderingError::LimitExceeded(_))
        ));
        assert!(matches!(
            draw_ctx.acquire_node_of_type(&NodeId::new("b"), ElementType::Group),
            Err(RenderingError::LimitExceeded(_))
        ));
    }

    #[test]
    fn saved_transform_is_restored() {
        let doc = document("10", "10");
        let cr = context(10, 10);
        let mut draw_ctx = new_draw_ctx(&doc, &cr);

        draw_ctx
            .with_saved_transform(Some(Transform::new_scale(2.0, 2.0)), |dc| {
                assert_eq!(dc.get_transform(), Transform::new_scale(2.0, 2.0));
                Ok(())
            })
            .unwrap();

        assert_eq!(draw_ctx.get_transform(), Transform::identity());

        let mut ran = false;
        draw_ctx
            .with_saved_transform(Some(Transform::new_scale(0.0, 1.0)), |_| {
                ran = true;
                Ok(())
            })
            .unwrap();
        assert!(!ran);
    }

    #[test]
    fn target_is_restored_with_its_boxes() {
        let doc = document("10", "10");
        let cr = context(10, 10);
        let mut draw_ctx = new_draw_ctx(&doc, &cr);

        let tile = context(4, 4);

        draw_ctx
            .with_target(&tile, |dc| {
                assert!(dc.is_cairo_context_nested(&dc.get_cairo_context()));
                assert_eq!(dc.get_offset(), (0.0, 0.0));
                dc.insert_bbox(&BoundingBox::new().with_rect(Rect::from_size(4.0, 4.0)));
                Ok(())
            })
            .unwrap();

        assert!(!draw_ctx.is_cairo_context_nested(&draw_ctx.get_cairo_context()));
        assert!(draw_ctx.cr_stack.is_empty());
        assert!(draw_ctx.get_bbox().rect.is_none());
    }

    #[test]
    fn acquired_ref_catches_cycles() {
        let doc = document("10", "10");
        let cr = context(10, 10);
        let mut draw_ctx = new_draw_ctx(&doc, &cr);

        let node = doc.lookup(&NodeId::new("a")).unwrap();

        let acquired = draw_ctx.acquire_node_ref(&node).unwrap();
        assert!(matches!(
            draw_ctx.acquire_node_ref(&node),
            Err(AcquireError::CircularReference(_))
        ));
        draw_ctx.release_node(acquired);

        assert!(draw_ctx.acquire_node_ref(&node).is_ok());
    }
}
