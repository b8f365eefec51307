#![allow(dead_code)]

use rsvg_render::bench_only::{ImageSurfaceDataExt, Pixel};
use rsvg_render::{Attributes, CairoRenderer, Document, DocumentBuilder, Node, RenderingError, Session};

/// Builds a document from nested elements, with an `<svg>` of the given size as the root.
pub struct TreeBuilder {
    builder: DocumentBuilder,
    parents: Vec<Node>,
}

impl TreeBuilder {
    pub fn new(width: &str, height: &str) -> TreeBuilder {
        Self::with_root(&[("width", width), ("height", height)])
    }

    pub fn with_root(attrs: &[(&str, &str)]) -> TreeBuilder {
        let mut builder = DocumentBuilder::new(Session::new_for_test_suite());
        let root = builder.append_element("svg", &Attributes::from(attrs), None);

        TreeBuilder {
            builder,
            parents: vec![root],
        }
    }

    /// Appends an element, and makes it the parent of the next ones until [`Self::close`].
    pub fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> &mut TreeBuilder {
        let node = self.append(name, attrs);
        self.parents.push(node);
        self
    }

    pub fn close(&mut self) -> &mut TreeBuilder {
        assert!(self.parents.len() > 1, "cannot close the root element");
        self.parents.pop();
        self
    }

    pub fn leaf(&mut self, name: &str, attrs: &[(&str, &str)]) -> &mut TreeBuilder {
        self.append(name, attrs);
        self
    }

    fn append(&mut self, name: &str, attrs: &[(&str, &str)]) -> Node {
        let parent = self.parents.last().cloned();
        self.builder
            .append_element(name, &Attributes::from(attrs), parent.as_ref())
    }

    pub fn build(self) -> Document {
        self.builder.build().unwrap()
    }
}

/// Renders the whole document into a new surface.
pub fn render(
    document: &Document,
    width: i32,
    height: i32,
    force_layers: bool,
) -> Result<cairo::ImageSurface, RenderingError> {
    render_with(document, width, height, |renderer, cr| {
        renderer.force_layers(force_layers).render_document(cr)
    })
}

pub fn render_with<F>(
    document: &Document,
    width: i32,
    height: i32,
    f: F,
) -> Result<cairo::ImageSurface, RenderingError>
where
    F: FnOnce(CairoRenderer<'_>, &cairo::Context) -> Result<(), RenderingError>,
{
    let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height)?;

    {
        let cr = cairo::Context::new(&surface)?;
        f(CairoRenderer::new(document).test_mode(true), &cr)?;
    }

    Ok(surface)
}

/// Returns the premultiplied pixel at `(x, y)`.
pub fn pixel(surface: &mut cairo::ImageSurface, x: u32, y: u32) -> Pixel {
    let stride = surface.stride() as usize;
    let data = surface.data().unwrap();
    data.get_pixel(stride, x, y)
}

/// Largest difference between corresponding channels of two surfaces of the same size.
pub fn max_channel_diff(a: &mut cairo::ImageSurface, b: &mut cairo::ImageSurface) -> u8 {
    assert_eq!((a.width(), a.height()), (b.width(), b.height()));

    let data_a = a.data().unwrap();
    let data_b = b.data().unwrap();

    data_a
        .iter()
        .zip(data_b.iter())
        .map(|(x, y)| if x > y { x - y } else { y - x })
        .max()
        .unwrap_or(0)
}
