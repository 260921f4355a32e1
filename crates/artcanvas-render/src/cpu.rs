//! CPU rasterizer backend built on `vello_cpu`.
//!
//! Full frames are rasterized from scratch. Incremental segments are
//! rasterized onto a transparent scratch pixmap and composited source-over
//! onto the retained raster, so earlier pixels are never re-rendered.

use crate::renderer::{
    Painter, RenderContext, RenderResult, Renderer, RendererError, paint_frame, paint_segment,
};
use artcanvas_core::stroke::Segment;
use kurbo::{Affine, BezPath, PathEl};
use peniko::Color;
use png::{BitDepth, ColorType, Encoder};
use std::io::Write;
use std::path::Path;
use vello_cpu::kurbo::{
    Affine as CpuAffine, BezPath as CpuBezPath, Cap as CpuCap, Join as CpuJoin, Rect as CpuRect,
    Stroke as CpuStroke,
};
use vello_cpu::{Pixmap, RenderContext as CpuContext};

/// Premultiplied RGBA8 pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u16,
    height: u16,
    data: Vec<u8>,
}

impl Raster {
    /// A raster filled with one color, forced opaque.
    pub fn filled(width: u16, height: u16, color: Color) -> Self {
        let rgba = color.with_alpha(1.0).to_rgba8();
        let pixel = [rgba.r, rgba.g, rgba.b, rgba.a];
        let count = usize::from(width) * usize::from(height);
        Self {
            width,
            height,
            data: pixel.repeat(count),
        }
    }

    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// Raw premultiplied bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Premultiplied RGBA at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let offset = (y as usize * usize::from(self.width) + x as usize) * 4;
        let px = &self.data[offset..offset + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Replace the contents with a rendered pixmap of the same size.
    fn copy_from(&mut self, pixmap: &Pixmap) {
        self.data.clear();
        for p in pixmap.data() {
            self.data.extend_from_slice(&[p.r, p.g, p.b, p.a]);
        }
    }

    /// Composite a premultiplied pixmap over this raster.
    fn composite_over(&mut self, pixmap: &Pixmap) {
        for (dst, src) in self.data.chunks_exact_mut(4).zip(pixmap.data()) {
            if src.a == 0 {
                continue;
            }
            let inv = 255 - u16::from(src.a);
            let blend = |s: u8, d: u8| -> u8 {
                let scaled = (u16::from(d) * inv + 127) / 255;
                (u16::from(s) + scaled).min(255) as u8
            };
            dst[0] = blend(src.r, dst[0]);
            dst[1] = blend(src.g, dst[1]);
            dst[2] = blend(src.b, dst[2]);
            dst[3] = blend(src.a, dst[3]);
        }
    }

    /// Straight-alpha RGBA bytes for encoding.
    pub fn to_unpremultiplied(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            let a = px[3];
            if a == 0 || a == 255 {
                out.extend_from_slice(px);
                continue;
            }
            let unpremul = |c: u8| -> u8 {
                ((u16::from(c) * 255 + u16::from(a) / 2) / u16::from(a)).min(255) as u8
            };
            out.extend_from_slice(&[unpremul(px[0]), unpremul(px[1]), unpremul(px[2]), a]);
        }
        out
    }
}

fn surface_dimension(value: f64) -> Option<u16> {
    (value.is_finite() && value >= 1.0 && value <= f64::from(u16::MAX)).then_some(value as u16)
}

fn affine_to_cpu(xf: Affine) -> CpuAffine {
    CpuAffine::new(xf.as_coeffs())
}

fn path_to_cpu(path: &BezPath) -> CpuBezPath {
    let mut out = CpuBezPath::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => out.move_to((p.x, p.y)),
            PathEl::LineTo(p) => out.line_to((p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to((p1.x, p1.y), (p2.x, p2.y)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to((p1.x, p1.y), (p2.x, p2.y), (p3.x, p3.y))
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

/// `Painter` over a `vello_cpu` render context.
struct CpuPainter<'a> {
    ctx: &'a mut CpuContext,
    width: u16,
    height: u16,
}

impl Painter for CpuPainter<'_> {
    fn clear(&mut self, color: Color) {
        self.ctx.set_transform(CpuAffine::IDENTITY);
        self.ctx.set_paint(color.with_alpha(1.0));
        self.ctx.fill_rect(&CpuRect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));
    }

    fn stroke_path(&mut self, path: &BezPath, transform: Affine, color: Color, width: f64) {
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_stroke(
            CpuStroke::new(width)
                .with_caps(CpuCap::Round)
                .with_join(CpuJoin::Round),
        );
        self.ctx.set_paint(color);
        self.ctx.stroke_path(&path_to_cpu(path));
    }
}

/// CPU renderer holding the last rendered raster.
pub struct CpuRenderer {
    ctx: CpuContext,
    raster: Raster,
    background: Color,
}

impl std::fmt::Debug for CpuRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuRenderer")
            .field("width", &self.raster.width)
            .field("height", &self.raster.height)
            .finish_non_exhaustive()
    }
}

impl CpuRenderer {
    /// Create a renderer for a surface of `width` x `height` device pixels.
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        let (w, h) = Self::checked_size(f64::from(width), f64::from(height))?;
        Ok(Self {
            ctx: CpuContext::new(w, h),
            raster: Raster::filled(w, h, Color::WHITE),
            background: Color::WHITE,
        })
    }

    fn checked_size(width: f64, height: f64) -> RenderResult<(u16, u16)> {
        match (surface_dimension(width), surface_dimension(height)) {
            (Some(w), Some(h)) => Ok((w, h)),
            _ => Err(RendererError::InvalidSurface { width, height }),
        }
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    /// Reallocate for a new surface size. The raster is cleared to the
    /// background color until the next full frame.
    pub fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        let (w, h) = Self::checked_size(f64::from(width), f64::from(height))?;
        if w != self.raster.width || h != self.raster.height {
            log::debug!("Resizing CPU raster to {}x{}", w, h);
            self.ctx = CpuContext::new(w, h);
            self.raster = Raster::filled(w, h, self.background);
        }
        Ok(())
    }

    /// Rasterize a full frame, resizing to the context's physical size first.
    pub fn render(&mut self, ctx: &RenderContext<'_>) -> RenderResult<()> {
        let size = ctx.physical_size();
        let (w, h) = Self::checked_size(size.width, size.height)?;
        self.resize(u32::from(w), u32::from(h))?;
        self.background = ctx.background_color;

        self.ctx.reset();
        paint_frame(
            ctx,
            &mut CpuPainter {
                ctx: &mut self.ctx,
                width: w,
                height: h,
            },
        );
        let mut pixmap = Pixmap::new(w, h);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        self.raster.copy_from(&pixmap);
        Ok(())
    }

    /// Rasterize one segment and composite it over the retained raster.
    pub fn render_segment(&mut self, ctx: &RenderContext<'_>, segment: &Segment) {
        let (w, h) = (self.raster.width, self.raster.height);
        self.ctx.reset();
        paint_segment(
            ctx,
            segment,
            &mut CpuPainter {
                ctx: &mut self.ctx,
                width: w,
                height: h,
            },
        );
        let mut pixmap = Pixmap::new(w, h);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        self.raster.composite_over(&pixmap);
    }

    /// Encode the current raster as PNG.
    pub fn export_png<W: Write>(&self, writer: W) -> RenderResult<()> {
        let mut encoder = Encoder::new(writer, self.raster.width(), self.raster.height());
        encoder.set_color(ColorType::Rgba);
        encoder.set_depth(BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.raster.to_unpremultiplied())?;
        writer.finish()?;
        Ok(())
    }

    /// Encode the current raster as PNG into a byte vector.
    pub fn to_png_bytes(&self) -> RenderResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.export_png(&mut bytes)?;
        Ok(bytes)
    }

    /// Encode the current raster as PNG into a file.
    pub fn export_png_file(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        let file = std::fs::File::create(path.as_ref())?;
        self.export_png(std::io::BufWriter::new(file))
    }
}

impl Renderer for CpuRenderer {
    fn build_scene(&mut self, ctx: &RenderContext<'_>) {
        if let Err(err) = self.render(ctx) {
            log::error!("CPU render failed: {}", err);
        }
    }

    fn paint_segment(&mut self, ctx: &RenderContext<'_>, segment: &Segment) {
        self.render_segment(ctx, segment);
    }
}
