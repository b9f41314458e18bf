//! Rasterization of a module matrix into a styled image.
//!
//! Compositing order, later steps painting over earlier ones:
//!
//! 1. background fill over the whole canvas
//! 2. border outline centered on the content edge
//! 3. body modules, then the three position-marker regions
//! 4. logo
//!
//! The canvas lives only for the duration of one call and is dropped once serialized.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbaImage};
use tiny_skia::{Paint, PathBuilder, Pixmap, Rect, Shader, Stroke, Transform};

use crate::error::RenderError;
use crate::gradient;
use crate::logo::{self, FileLogoLoader, LogoLoader};
use crate::matrix::ModuleMatrix;
use crate::shape::{self, Cell};
use crate::style::{Fill, RenderStyle};

/// Pixel geometry of one render.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CanvasLayout {
    /// Side of one module, `round(target / modules)`.
    pub block_px: u32,
    /// `block_px * modules`.
    pub content_px: u32,
    pub border_px: u32,
    /// `content_px + 2 * border_px`.
    pub canvas_px: u32,
}

impl CanvasLayout {
    /// The realized size may differ from `target_px` because of integer rounding.
    pub fn compute(modules: usize, target_px: u32, border_px: u32) -> Result<Self, RenderError> {
        let invalid = RenderError::InvalidDimension { target_px, modules };
        if modules == 0 {
            return Err(invalid);
        }
        let block_px = (f64::from(target_px) / modules as f64).round() as u32;
        if block_px == 0 {
            return Err(invalid);
        }
        let content = modules as u64 * u64::from(block_px);
        let canvas = content + 2 * u64::from(border_px);
        let (Ok(content_px), Ok(canvas_px)) = (u32::try_from(content), u32::try_from(canvas)) else {
            return Err(RenderError::CanvasTooLarge(canvas));
        };
        Ok(Self {
            block_px,
            content_px,
            border_px,
            canvas_px,
        })
    }

    fn cell(&self, row: usize, col: usize) -> Cell {
        let block = self.block_px as f32;
        Cell {
            x: col as f32 * block + self.border_px as f32,
            y: row as f32 * block + self.border_px as f32,
            size: block,
        }
    }
}

/// Serialized render output.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct EncodedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl EncodedImage {
    pub const MIME_TYPE: &'static str = "image/png";

    pub fn mime_type(&self) -> &'static str {
        Self::MIME_TYPE
    }
}

/// Draws module matrices. Holds no per-render state, so one renderer can serve concurrent calls.
#[derive(Clone, Debug, Default)]
pub struct Renderer<L = FileLogoLoader> {
    logos: L,
}

impl Renderer<FileLogoLoader> {
    /// Renderer that reads logos from the filesystem.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<L: LogoLoader> Renderer<L> {
    pub fn with_logo_loader(logos: L) -> Self {
        Self { logos }
    }

    pub fn logo_loader(&self) -> &L {
        &self.logos
    }

    /// Renders and encodes as PNG.
    #[tracing::instrument(skip(self, matrix, style), fields(modules = matrix.size()))]
    pub fn render(
        &self,
        matrix: &ModuleMatrix,
        target_px: u32,
        style: &RenderStyle,
    ) -> Result<EncodedImage, RenderError> {
        let pixels = self.rasterize(matrix, target_px, style)?;
        encode_png(pixels)
    }

    /// Renders to straight-alpha RGBA pixels.
    #[tracing::instrument(skip(self, matrix, style), fields(modules = matrix.size()))]
    pub fn rasterize(
        &self,
        matrix: &ModuleMatrix,
        target_px: u32,
        style: &RenderStyle,
    ) -> Result<RgbaImage, RenderError> {
        let layout = CanvasLayout::compute(matrix.size(), target_px, style.border_px())?;
        tracing::debug!(?layout, "canvas layout");

        let mut canvas = Pixmap::new(layout.canvas_px, layout.canvas_px)
            .ok_or(RenderError::CanvasTooLarge(u64::from(layout.canvas_px)))?;
        canvas.fill(style.background.to_skia());

        draw_border(&mut canvas, &layout, style);

        let paint = Paint {
            shader: module_shader(style, &layout),
            anti_alias: true,
            ..Paint::default()
        };
        draw_modules(&mut canvas, &paint, matrix, &layout, style);

        if let Some(logo_style) = &style.logo {
            let size_px = logo_style.size_px(layout.content_px);
            if size_px > 0 {
                let logo = self.logos.load(&logo_style.source)?;
                logo::composite(&mut canvas, &logo, logo_style, size_px, &logo_style.source)?;
            }
        }

        Ok(to_rgba_image(&canvas))
    }
}

fn draw_border(canvas: &mut Pixmap, layout: &CanvasLayout, style: &RenderStyle) {
    let Some(border) = style.border.as_ref().filter(|b| b.width > 0) else {
        return;
    };
    let edge = layout.border_px as f32;
    let content = layout.content_px as f32;
    let Some(rect) = Rect::from_xywh(edge, edge, content, content) else {
        return;
    };
    let path = PathBuilder::from_rect(rect);
    let mut paint = Paint::default();
    paint.set_color(border.color.to_skia());
    paint.anti_alias = true;
    let stroke = Stroke {
        width: border.width as f32,
        ..Stroke::default()
    };
    canvas.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
}

fn module_shader(style: &RenderStyle, layout: &CanvasLayout) -> Shader<'static> {
    match style.resolve_fill() {
        Fill::Solid(color) => Shader::SolidColor(color.to_skia()),
        Fill::Gradient(g) => gradient::shader(g, layout.border_px as f32, layout.content_px as f32),
    }
}

fn draw_modules(
    canvas: &mut Pixmap,
    paint: &Paint<'_>,
    matrix: &ModuleMatrix,
    layout: &CanvasLayout,
    style: &RenderStyle,
) {
    let (markers, body): (Vec<_>, Vec<_>) = matrix
        .dark_modules()
        .partition(|&(row, col)| matrix.is_position_marker(row, col));

    for (row, col) in body {
        let cell = layout.cell(row, col);
        shape::draw_module(canvas, paint, style.shape_style, matrix, row, col, cell);
    }
    let marker_shape = style.marker_shape();
    for (row, col) in markers {
        let cell = layout.cell(row, col);
        shape::draw_module(canvas, paint, marker_shape, matrix, row, col, cell);
    }
}

fn to_rgba_image(canvas: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(canvas.width(), canvas.height());
    for (dst, src) in img.pixels_mut().zip(canvas.pixels()) {
        let c = src.demultiply();
        *dst = image::Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}

/// Encodes straight-alpha pixels as PNG.
pub fn encode_png(pixels: RgbaImage) -> Result<EncodedImage, RenderError> {
    let (width, height) = pixels.dimensions();
    let mut bytes = Vec::new();
    DynamicImage::ImageRgba8(pixels)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(RenderError::Serialization)?;
    Ok(EncodedImage {
        bytes,
        width,
        height,
    })
}
