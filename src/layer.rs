//! Discrete layers: opacity, clipping, masking, filters and compositing operators.
//!
//! Every element that draws something does so inside a layer.  Most layers go straight to
//! the current target; an element that needs group opacity, a mask, a filter, an
//! `objectBoundingBox` clip or a non-default operator gets drawn into an offscreen surface
//! the size of the canvas, which is then composited back onto its parent.

use crate::bbox::BoundingBox;
use crate::clip_path::ClipPath;
use crate::coord_units::CoordUnits;
use crate::document::NodeId;
use crate::drawing_ctx::DrawingCtx;
use crate::element::ElementType;
use crate::error::RenderingError;
use crate::mask::Mask;
use crate::properties::{CompOp, ComputedValues, EnableBackground};
use crate::transform::Transform;

/// A clip path whose application has to wait until the layer's bounding box is known.
#[derive(Debug, Clone, PartialEq)]
pub enum DeferredClip {
    None,

    /// A `clipPath` with `clipPathUnits="objectBoundingBox"`.
    Late(NodeId),
}

/// A layer opened by [`DrawingCtx::push_discrete_layer`].
///
/// It must be given back to [`DrawingCtx::pop_discrete_layer`].
pub enum Layer {
    /// Clip path contents; they only add to the current path.
    Clipping,

    /// Content is drawn on the current target.  Only the target's state is saved.
    Direct { cr: cairo::Context },

    /// Content is drawn on its own surface and composited on pop.
    Offscreen(Box<OffscreenLayer>),
}

pub struct OffscreenLayer {
    original_cr: cairo::Context,
    surface: cairo::ImageSurface,
    opacity: u8,
    comp_op: CompOp,
    mask: Option<NodeId>,
    filter: Option<NodeId>,
    clip: DeferredClip,

    /// Transform of the parent target when the layer was opened.
    affine: Transform,
}

impl Layer {
    pub fn is_offscreen(&self) -> bool {
        matches!(*self, Layer::Offscreen(_))
    }
}

impl<'i> DrawingCtx<'i> {
    /// Opens a layer for an element with the given computed values.
    ///
    /// If this returns an error, nothing needs to be popped.
    pub fn push_discrete_layer(
        &mut self,
        values: &ComputedValues,
        clipping: bool,
    ) -> Result<Layer, RenderingError> {
        if clipping {
            return Ok(Layer::Clipping);
        }

        let original_cr = self.cr.clone();
        original_cr.save()?;

        match self.open_layer(values, &original_cr) {
            Ok(layer) => Ok(layer),
            Err(e) => {
                original_cr.restore()?;
                Err(e)
            }
        }
    }

    fn open_layer(
        &mut self,
        values: &ComputedValues,
        original_cr: &cairo::Context,
    ) -> Result<Layer, RenderingError> {
        let affine = Transform::from(original_cr.matrix());

        let clip = self.resolve_clip(values.clip_path.0.get(), &affine)?;

        let opacity = values.opacity_u8();
        let filter = values.filter.0.get().cloned();
        let mask = values.mask.0.get().cloned();

        let is_direct = !self.force_layers
            && opacity == 255
            && filter.is_none()
            && mask.is_none()
            && clip == DeferredClip::None
            && values.comp_op == CompOp::SrcOver
            && values.enable_background == EnableBackground::Accumulate;

        if is_direct {
            return Ok(Layer::Direct {
                cr: original_cr.clone(),
            });
        }

        let (width, height) = self.canvas_size()?;

        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height)
            .map_err(|e| {
                RenderingError::OutOfMemory(format!("could not create layer surface: {}", e))
            })?;

        let cr = cairo::Context::new(&surface)?;
        let canvas_affine = self.canvas_transform(&affine);
        cr.set_matrix(canvas_affine.into());

        if filter.is_some() {
            self.surfaces_stack.push(surface.clone());
        }

        self.cr_stack.push(std::mem::replace(&mut self.cr, cr));

        self.bbox_stack.push(self.bbox);
        self.bbox = BoundingBox::new().with_transform(canvas_affine);

        self.ink_bbox_stack.push(self.ink_bbox);
        self.ink_bbox = BoundingBox::new().with_transform(canvas_affine);

        Ok(Layer::Offscreen(Box::new(OffscreenLayer {
            original_cr: original_cr.clone(),
            surface,
            opacity,
            comp_op: values.comp_op,
            mask,
            filter,
            clip,
            affine,
        })))
    }

    /// Applies a `userSpaceOnUse` clip path right away, or defers an
    /// `objectBoundingBox` one until the layer is popped.
    fn resolve_clip(
        &mut self,
        clip_id: Option<&NodeId>,
        affine: &Transform,
    ) -> Result<DeferredClip, RenderingError> {
        let clip_id = match clip_id {
            Some(id) => id,
            None => return Ok(DeferredClip::None),
        };

        let acquired = match self.acquire_node_of_type(clip_id, ElementType::ClipPath)? {
            Some(acquired) => acquired,
            None => return Ok(DeferredClip::None),
        };

        let clip_node = acquired.get().clone();
        let units = borrow_element_as!(clip_node, ClipPath).get_units();

        let res = match units {
            CoordUnits::UserSpaceOnUse => {
                let bbox = BoundingBox::new().with_transform(*affine);
                ClipPath::to_cairo_context(&clip_node, affine, &bbox, self)
                    .map(|_| DeferredClip::None)
            }

            CoordUnits::ObjectBoundingBox => Ok(DeferredClip::Late(clip_id.clone())),
        };

        self.release_node(acquired);

        res
    }

    /// Closes a layer, compositing it onto its parent if it was drawn offscreen.
    pub fn pop_discrete_layer(&mut self, layer: Layer) -> Result<(), RenderingError> {
        match layer {
            Layer::Clipping => Ok(()),

            Layer::Direct { cr } => Ok(cr.restore()?),

            Layer::Offscreen(layer) => {
                let res = self.close_offscreen_layer(&layer);
                let restored = layer.original_cr.restore().map_err(RenderingError::from);
                res.and(restored)
            }
        }
    }

    fn close_offscreen_layer(&mut self, layer: &OffscreenLayer) -> Result<(), RenderingError> {
        let source = match layer.filter {
            Some(ref filter_id) => {
                let unfiltered = match self.surfaces_stack.pop() {
                    Some(surface) => surface,
                    None => panic!("surfaces_stack is empty when popping a filtered layer"),
                };

                self.run_filter(filter_id, unfiltered)
            }

            None => Ok(layer.surface.clone()),
        };

        self.cr = match self.cr_stack.pop() {
            Some(cr) => cr,
            None => panic!("cr_stack is empty when popping a layer"),
        };

        let bbox = self.bbox;
        let ink_bbox = self.ink_bbox;

        let res = source.and_then(|source| self.composite(layer, &source, &bbox));

        self.bbox = match self.bbox_stack.pop() {
            Some(bbox) => bbox,
            None => panic!("bbox_stack is empty when popping a layer"),
        };

        self.ink_bbox = match self.ink_bbox_stack.pop() {
            Some(bbox) => bbox,
            None => panic!("ink_bbox_stack is empty when popping a layer"),
        };

        // The layer's boxes are in canvas space; bring them back to the parent's target.
        let (x, y) = self.get_offset();

        self.bbox
            .insert(&bbox.with_transform(bbox.transform.post_translate(x, y)));
        self.ink_bbox
            .insert(&ink_bbox.with_transform(ink_bbox.transform.post_translate(x, y)));

        res
    }

    /// Runs the filter on the layer's contents.
    ///
    /// A filter that fails leaves the contents unfiltered; only going over the reference
    /// limit is an error.
    fn run_filter(
        &mut self,
        filter_id: &NodeId,
        source: cairo::ImageSurface,
    ) -> Result<cairo::ImageSurface, RenderingError> {
        // An empty group has nothing to filter.
        if self.bbox.is_empty() {
            return Ok(source);
        }

        let acquired = match self.acquire_node_of_type(filter_id, ElementType::Filter)? {
            Some(acquired) => acquired,
            None => return Ok(source),
        };

        let filter_node = acquired.get().clone();
        let renderer = self.filter_renderer.clone();

        let res = renderer.render(&filter_node, &source, &self.bbox, self);

        self.release_node(acquired);

        match res {
            Ok(output) => Ok(output),
            Err(e) => {
                rsvg_log!(
                    self.session(),
                    "(not rendering filter {} because of error: {})",
                    filter_id,
                    e
                );
                Ok(source)
            }
        }
    }

    /// Paints the layer's surface onto the current target, through the late clip and
    /// the mask.
    fn composite(
        &mut self,
        layer: &OffscreenLayer,
        source: &cairo::ImageSurface,
        bbox: &BoundingBox,
    ) -> Result<(), RenderingError> {
        if let DeferredClip::Late(ref clip_id) = layer.clip {
            if let Some(acquired) = self.acquire_node_of_type(clip_id, ElementType::ClipPath)? {
                let clip_node = acquired.get().clone();
                let res = ClipPath::to_cairo_context(&clip_node, &layer.affine, bbox, self);
                self.release_node(acquired);
                res?;
            }
        }

        let mask = match layer.mask {
            Some(ref mask_id) => self.generate_mask(mask_id, &layer.affine, bbox, layer.opacity)?,
            None => None,
        };

        let cr = self.cr.clone();
        let (x, y) = self.get_offset();

        cr.identity_matrix();
        cr.set_source_surface(source, x, y)?;
        cr.set_operator(cairo::Operator::from(layer.comp_op));

        match mask {
            Some(mask) => cr.mask_surface(&mask, x, y)?,
            None if layer.opacity < 255 => cr.paint_with_alpha(f64::from(layer.opacity) / 255.0)?,
            None => cr.paint()?,
        }

        Ok(())
    }

    /// Returns `None` if the mask cannot be used; the layer is then painted as if it
    /// had no mask.
    fn generate_mask(
        &mut self,
        mask_id: &NodeId,
        affine: &Transform,
        bbox: &BoundingBox,
        opacity: u8,
    ) -> Result<Option<cairo::ImageSurface>, RenderingError> {
        let acquired = match self.acquire_node_of_type(mask_id, ElementType::Mask)? {
            Some(acquired) => acquired,
            None => return Ok(None),
        };

        let mask_node = acquired.get().clone();

        let res = borrow_element_as!(mask_node, Mask).generate_cairo_mask(
            &mask_node,
            affine,
            bbox,
            opacity,
            self,
        );

        self.release_node(acquired);

        res.map(Some)
    }

    /// Draws with `draw_fn` inside a discrete layer for an element with `values`.
    pub fn with_discrete_layer<F>(
        &mut self,
        values: &ComputedValues,
        clipping: bool,
        draw_fn: F,
    ) -> Result<(), RenderingError>
    where
        F: FnOnce(&mut DrawingCtx<'i>) -> Result<(), RenderingError>,
    {
        let layer = self.push_discrete_layer(values, clipping)?;
        let res = draw_fn(self);
        let popped = self.pop_discrete_layer(layer);

        res.and(popped)
    }
}
