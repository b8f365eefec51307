//! SVG paint servers.

use cssparser::Parser;

use crate::bbox::BoundingBox;
use crate::color::{argb_to_rgba, rgba_to_argb, with_opacity};
use crate::document::NodeId;
use crate::drawing_ctx::DrawingCtx;
use crate::element::ElementData;
use crate::error::*;
use crate::gradient::ResolvedGradient;
use crate::limits;
use crate::node::NodeBorrow;
use crate::parsers::Parse;
use crate::pattern::ResolvedPattern;
use crate::properties::ComputedValues;
use crate::unit_interval::UnitInterval;

/// A plain color, or a deferred reference to the `color` property.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SolidColor {
    pub current_color: bool,
    pub argb: u32,
}

impl SolidColor {
    pub fn black() -> SolidColor {
        SolidColor {
            current_color: false,
            argb: 0xff00_0000,
        }
    }

    /// Resolves `currentColor` against the element's `color` property.
    pub fn to_rgba(self, current_color: cssparser::RGBA) -> cssparser::RGBA {
        if self.current_color {
            current_color
        } else {
            argb_to_rgba(self.argb)
        }
    }
}

impl From<cssparser::Color> for SolidColor {
    fn from(color: cssparser::Color) -> SolidColor {
        match color {
            cssparser::Color::CurrentColor => SolidColor {
                current_color: true,
                argb: 0,
            },

            cssparser::Color::RGBA(rgba) => SolidColor {
                current_color: false,
                argb: rgba_to_argb(rgba),
            },
        }
    }
}

impl Parse for SolidColor {
    fn parse<'i>(parser: &mut Parser<'i, '_>) -> Result<SolidColor, ParseError<'i>> {
        Ok(SolidColor::from(cssparser::Color::parse(parser)?))
    }
}

/// The value of the `fill` and `stroke` properties.
#[derive(Debug, Clone, PartialEq)]
pub enum PaintServer {
    None,
    Solid(SolidColor),
    Reference {
        id: NodeId,
        fallback: Option<SolidColor>,
    },
}

impl Parse for PaintServer {
    fn parse<'i>(parser: &mut Parser<'i, '_>) -> Result<PaintServer, ParseError<'i>> {
        if parser
            .try_parse(|i| i.expect_ident_matching("none"))
            .is_ok()
        {
            Ok(PaintServer::None)
        } else if let Ok(url) = parser.try_parse(|i| i.expect_url()) {
            let loc = parser.current_source_location();

            let fallback = if !parser.is_exhausted() {
                if parser
                    .try_parse(|i| i.expect_ident_matching("none"))
                    .is_ok()
                {
                    None
                } else {
                    Some(parser.try_parse(SolidColor::parse)?)
                }
            } else {
                None
            };

            Ok(PaintServer::Reference {
                id: NodeId::parse(&url)
                    .map_err(|e: NodeIdError| -> ValueErrorKind { e.into() })
                    .map_err(|e| loc.new_custom_error(e))?,
                fallback,
            })
        } else {
            Ok(PaintServer::Solid(SolidColor::parse(parser)?))
        }
    }
}

/// What a paint server turned into once its references were followed.
pub enum PaintSource {
    None,
    Gradient(ResolvedGradient, Option<SolidColor>),
    Pattern(ResolvedPattern, Option<SolidColor>),
    Solid(SolidColor),
}

impl PaintServer {
    /// Follows a reference to a gradient or pattern, if any.
    ///
    /// References that cannot be resolved are logged and replaced by the fallback
    /// color, or by nothing if there is no fallback.  Going over the limit of
    /// referenced elements is an error instead.
    pub fn resolve(&self, draw_ctx: &mut DrawingCtx<'_>) -> Result<PaintSource, RenderingError> {
        match *self {
            PaintServer::None => Ok(PaintSource::None),

            PaintServer::Solid(color) => Ok(PaintSource::Solid(color)),

            PaintServer::Reference { ref id, fallback } => {
                let resolved = draw_ctx.try_acquire_node(id).and_then(|acquired| {
                    let node = acquired.get().clone();
                    let element = node.borrow_element();

                    let res = match element.element_data {
                        ElementData::LinearGradient(ref g) => g
                            .resolve(&node, draw_ctx)
                            .map(|g| PaintSource::Gradient(g, fallback)),

                        ElementData::RadialGradient(ref g) => g
                            .resolve(&node, draw_ctx)
                            .map(|g| PaintSource::Gradient(g, fallback)),

                        ElementData::Pattern(ref p) => p
                            .resolve(&node, draw_ctx)
                            .map(|p| PaintSource::Pattern(p, fallback)),

                        _ => Err(AcquireError::InvalidLinkType(id.clone())),
                    };

                    draw_ctx.release_node(acquired);
                    res
                });

                match resolved {
                    Ok(source) => Ok(source),

                    Err(AcquireError::MaxReferencesExceeded) => {
                        rsvg_log!(
                            draw_ctx.session(),
                            "exceeded {} referenced elements while resolving paint server {}",
                            limits::MAX_REFERENCED_ELEMENTS,
                            id
                        );
                        Err(RenderingError::too_many_references())
                    }

                    Err(e) => {
                        rsvg_log!(draw_ctx.session(), "could not resolve paint server {}: {}", id, e);

                        if let Some(color) = fallback {
                            rsvg_log!(draw_ctx.session(), "using fallback color for {}", id);
                            Ok(PaintSource::Solid(color))
                        } else {
                            Ok(PaintSource::None)
                        }
                    }
                }
            }
        }
    }
}

impl PaintSource {
    /// Sets this paint as the source of the current Cairo context.
    ///
    /// Returns whether there is anything to paint.
    pub fn set_as_source(
        &self,
        draw_ctx: &mut DrawingCtx<'_>,
        bbox: &BoundingBox,
        values: &ComputedValues,
        opacity: UnitInterval,
    ) -> Result<bool, RenderingError> {
        let current_color = values.color.0;

        let painted = match *self {
            PaintSource::None => return Ok(false),

            PaintSource::Solid(color) => {
                set_solid_source(draw_ctx, color, opacity, current_color);
                return Ok(true);
            }

            PaintSource::Gradient(ref gradient, _) => {
                gradient.set_as_source(draw_ctx, bbox, values, opacity)?
            }

            PaintSource::Pattern(ref pattern, _) => pattern.set_as_source(draw_ctx, bbox, opacity)?,
        };

        let fallback = match *self {
            PaintSource::Gradient(_, fallback) | PaintSource::Pattern(_, fallback) => fallback,
            _ => None,
        };

        if painted {
            Ok(true)
        } else if let Some(color) = fallback {
            set_solid_source(draw_ctx, color, opacity, current_color);
            Ok(true)
        } else {
            Ok(false)
        }
    }
}

fn set_solid_source(
    draw_ctx: &DrawingCtx<'_>,
    color: SolidColor,
    opacity: UnitInterval,
    current_color: cssparser::RGBA,
) {
    let rgba = with_opacity(color.to_rgba(current_color), u8::from(opacity));

    draw_ctx.get_cairo_context().set_source_rgba(
        f64::from(rgba.red) / 255.0,
        f64::from(rgba.green) / 255.0,
        f64::from(rgba.blue) / 255.0,
        f64::from(rgba.alpha) / 255.0,
    );
}
