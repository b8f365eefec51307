//! Basic SVG shapes: the `rect`, `circle` and `ellipse` elements.

use crate::attributes::Attributes;
use crate::drawing_ctx::DrawingCtx;
use crate::element::{set_attribute, AttributeErrors, ElementTrait};
use crate::error::RenderingError;
use crate::length::*;
use crate::node::Node;
use crate::parsers::ParseValue;
use crate::properties::ComputedValues;

/// Distance of the Bézier control points for a quarter of a unit circle.
const ARC_MAGIC: f64 = 0.552_284_749_830_793_4;

/// Appends a closed ellipse, starting at its rightmost point.
fn ellipse_path(cr: &cairo::Context, cx: f64, cy: f64, rx: f64, ry: f64) {
    let kx = rx * ARC_MAGIC;
    let ky = ry * ARC_MAGIC;

    cr.move_to(cx + rx, cy);
    cr.curve_to(cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry);
    cr.curve_to(cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy);
    cr.curve_to(cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry);
    cr.curve_to(cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy);
    cr.close_path();
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct RectGeometry {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    rx: f64,
    ry: f64,
}

impl RectGeometry {
    fn append_path(&self, cr: &cairo::Context) {
        let RectGeometry { x, y, w, h, rx, ry } = *self;

        if rx == 0.0 {
            cr.rectangle(x, y, w, h);
            return;
        }

        let kx = rx * ARC_MAGIC;
        let ky = ry * ARC_MAGIC;

        let right = x + w;
        let bottom = y + h;

        cr.move_to(x + rx, y);
        cr.line_to(right - rx, y);
        cr.curve_to(right - rx + kx, y, right, y + ry - ky, right, y + ry);
        cr.line_to(right, bottom - ry);
        cr.curve_to(right, bottom - ry + ky, right - rx + kx, bottom, right - rx, bottom);
        cr.line_to(x + rx, bottom);
        cr.curve_to(x + rx - kx, bottom, x, bottom - ry + ky, x, bottom - ry);
        cr.line_to(x, y + ry);
        cr.curve_to(x, y + ry - ky, x + rx - kx, y, x + rx, y);
        cr.close_path();
    }
}

#[derive(Default)]
pub struct Rect {
    x: Length<Horizontal>,
    y: Length<Vertical>,
    w: ULength<Horizontal>,
    h: ULength<Vertical>,

    // Radiuses for rounded corners
    rx: Option<ULength<Horizontal>>,
    ry: Option<ULength<Vertical>>,
}

impl Rect {
    /// Resolves the geometry; `None` if the rectangle has no area.
    fn geometry(&self, values: &ComputedValues, draw_ctx: &DrawingCtx<'_>) -> Option<RectGeometry> {
        let params = draw_ctx.get_view_params();

        let x = self.x.to_user(values, &params);
        let y = self.y.to_user(values, &params);
        let w = self.w.to_user(values, &params);
        let h = self.h.to_user(values, &params);

        if w <= 0.0 || h <= 0.0 {
            return None;
        }

        let rx = self.rx.map(|l| l.to_user(values, &params));
        let ry = self.ry.map(|l| l.to_user(values, &params));

        // A missing radius takes the value of the other one.
        let (mut rx, mut ry) = match (rx, ry) {
            (None, None) => (0.0, 0.0),
            (Some(rx), None) => (rx, rx),
            (None, Some(ry)) => (ry, ry),
            (Some(rx), Some(ry)) => (rx, ry),
        };

        rx = rx.min(w / 2.0);
        ry = ry.min(h / 2.0);

        if rx == 0.0 || ry == 0.0 {
            rx = 0.0;
            ry = 0.0;
        }

        Some(RectGeometry { x, y, w, h, rx, ry })
    }
}

impl ElementTrait for Rect {
    fn set_attributes(&mut self, attrs: &Attributes, errors: &mut AttributeErrors<'_>) {
        for (attr, value) in attrs.iter() {
            match attr.as_str() {
                "x" => set_attribute(&mut self.x, attr.parse(value), errors),
                "y" => set_attribute(&mut self.y, attr.parse(value), errors),
                "width" => set_attribute(&mut self.w, attr.parse(value), errors),
                "height" => set_attribute(&mut self.h, attr.parse(value), errors),
                "rx" => set_attribute(&mut self.rx, attr.parse(value).map(Some), errors),
                "ry" => set_attribute(&mut self.ry, attr.parse(value).map(Some), errors),
                _ => (),
            }
        }
    }

    fn draw(
        &self,
        _node: &Node,
        values: &ComputedValues,
        draw_ctx: &mut DrawingCtx<'_>,
        clipping: bool,
    ) -> Result<(), RenderingError> {
        let geometry = match self.geometry(values, draw_ctx) {
            Some(g) => g,
            None => return Ok(()),
        };

        draw_ctx.with_discrete_layer(values, clipping, |dc| {
            dc.draw_shape(values, clipping, |cr| geometry.append_path(cr))
        })
    }
}

#[derive(Default)]
pub struct Circle {
    cx: Length<Horizontal>,
    cy: Length<Vertical>,
    r: ULength<Both>,
}

impl ElementTrait for Circle {
    fn set_attributes(&mut self, attrs: &Attributes, errors: &mut AttributeErrors<'_>) {
        for (attr, value) in attrs.iter() {
            match attr.as_str() {
                "cx" => set_attribute(&mut self.cx, attr.parse(value), errors),
                "cy" => set_attribute(&mut self.cy, attr.parse(value), errors),
                "r" => set_attribute(&mut self.r, attr.parse(value), errors),
                _ => (),
            }
        }
    }

    fn draw(
        &self,
        _node: &Node,
        values: &ComputedValues,
        draw_ctx: &mut DrawingCtx<'_>,
        clipping: bool,
    ) -> Result<(), RenderingError> {
        let params = draw_ctx.get_view_params();

        let cx = self.cx.to_user(values, &params);
        let cy = self.cy.to_user(values, &params);
        let r = self.r.to_user(values, &params);

        if r <= 0.0 {
            return Ok(());
        }

        draw_ctx.with_discrete_layer(values, clipping, |dc| {
            dc.draw_shape(values, clipping, |cr| ellipse_path(cr, cx, cy, r, r))
        })
    }
}

#[derive(Default)]
pub struct Ellipse {
    cx: Length<Horizontal>,
    cy: Length<Vertical>,
    rx: ULength<Horizontal>,
    ry: ULength<Vertical>,
}

impl ElementTrait for Ellipse {
    fn set_attributes(&mut self, attrs: &Attributes, errors: &mut AttributeErrors<'_>) {
        for (attr, value) in attrs.iter() {
            match attr.as_str() {
                "cx" => set_attribute(&mut self.cx, attr.parse(value), errors),
                "cy" => set_attribute(&mut self.cy, attr.parse(value), errors),
                "rx" => set_attribute(&mut self.rx, attr.parse(value), errors),
                "ry" => set_attribute(&mut self.ry, attr.parse(value), errors),
                _ => (),
            }
        }
    }

    fn draw(
        &self,
        _node: &Node,
        values: &ComputedValues,
        draw_ctx: &mut DrawingCtx<'_>,
        clipping: bool,
    ) -> Result<(), RenderingError> {
        let params = draw_ctx.get_view_params();

        let cx = self.cx.to_user(values, &params);
        let cy = self.cy.to_user(values, &params);
        let rx = self.rx.to_user(values, &params);
        let ry = self.ry.to_user(values, &params);

        if rx <= 0.0 || ry <= 0.0 {
            return Ok(());
        }

        draw_ctx.with_discrete_layer(values, clipping, |dc| {
            dc.draw_shape(values, clipping, |cr| ellipse_path(cr, cx, cy, rx, ry))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Document, DocumentBuilder};
    use crate::drawing_ctx::RenderOptions;
    use crate::element::{Element, ElementData};
    use crate::session::Session;

    fn document() -> Document {
        let mut builder = DocumentBuilder::new(Session::new_for_test_suite());
        builder.append_element(
            "svg",
            &Attributes::from(&[("width", "100"), ("height", "50")][..]),
            None,
        );
        builder.build().unwrap()
    }

    fn rect_geometry(attrs: &[(&str, &str)]) -> Option<RectGeometry> {
        let doc = document();
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 100, 50).unwrap();
        let cr = cairo::Context::new(&surface).unwrap();
        let draw_ctx =
            DrawingCtx::new(&doc, &cr, Session::new_for_test_suite(), RenderOptions::default())
                .unwrap();

        let elt = Element::new(&Session::new_for_test_suite(), "rect", &Attributes::from(attrs));

        match elt.element_data {
            ElementData::Rect(ref r) => r.geometry(&ComputedValues::default(), &draw_ctx),
            _ => unreachable!(),
        }
    }

    #[test]
    fn rect_without_area_is_not_drawn() {
        assert_eq!(rect_geometry(&[("width", "10")]), None);
        assert_eq!(rect_geometry(&[("width", "10"), ("height", "-5")]), None);
    }

    #[test]
    fn rect_resolves_percentages() {
        let g = rect_geometry(&[("x", "10%"), ("width", "50%"), ("height", "50%")]).unwrap();

        assert_eq!((g.x, g.y, g.w, g.h), (10.0, 0.0, 50.0, 25.0));
        assert_eq!((g.rx, g.ry), (0.0, 0.0));
    }

    #[test]
    fn rect_corner_radiuses() {
        let g = rect_geometry(&[("width", "10"), ("height", "20"), ("rx", "2")]).unwrap();
        assert_eq!((g.rx, g.ry), (2.0, 2.0));

        let g = rect_geometry(&[("width", "10"), ("height", "20"), ("ry", "30")]).unwrap();
        assert_eq!((g.rx, g.ry), (5.0, 10.0));

        let g = rect_geometry(&[("width", "10"), ("height", "20"), ("rx", "3"), ("ry", "0")])
            .unwrap();
        assert_eq!((g.rx, g.ry), (0.0, 0.0));
    }

    #[test]
    fn ellipse_path_bounds() {
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 10, 10).unwrap();
        let cr = cairo::Context::new(&surface).unwrap();

        ellipse_path(&cr, 5.0, 5.0, 4.0, 2.0);
        let (x0, y0, x1, y1) = cr.fill_extents().unwrap();

        assert_eq!((x0, y0, x1, y1), (1.0, 3.0, 9.0, 7.0));
    }
}
