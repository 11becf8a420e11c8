//! # Canvas
//!
//! The raster drawing surface. Everything is rasterized immediately into a premultiplied RGBA8
//! [`tiny_skia::Pixmap`]; there are no retained stroke objects.

use crate::{
    color::HexColor,
    geometry::{Point, Size},
    surface::{Composite, LineCap, LineJoin, Surface},
};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CanvasError {
    #[error("canvas size {}x{} has no area or is too large", .0.width, .0.height)]
    BadSize(Size),
}

/// Pen state, as last set through the [`Surface`] setters.
#[derive(Clone, Copy, Debug)]
struct Pen {
    width: f32,
    cap: LineCap,
    join: LineJoin,
    composite: Composite,
    color: HexColor,
}
impl Default for Pen {
    fn default() -> Self {
        Self {
            width: 1.0,
            cap: LineCap::Butt,
            join: LineJoin::Miter,
            composite: Composite::SourceOver,
            color: HexColor::BLACK,
        }
    }
}
impl Pen {
    fn paint(&self) -> tiny_skia::Paint<'static> {
        let mut paint = tiny_skia::Paint::default();
        let [r, g, b, a] = self.color.as_array();
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = true;
        paint.blend_mode = match self.composite {
            Composite::SourceOver => tiny_skia::BlendMode::SourceOver,
            Composite::DestinationOut => tiny_skia::BlendMode::DestinationOut,
        };
        paint
    }
    fn stroke(&self) -> tiny_skia::Stroke {
        tiny_skia::Stroke {
            width: self.width,
            line_cap: match self.cap {
                LineCap::Butt => tiny_skia::LineCap::Butt,
                LineCap::Round => tiny_skia::LineCap::Round,
                LineCap::Square => tiny_skia::LineCap::Square,
            },
            line_join: match self.join {
                LineJoin::Miter => tiny_skia::LineJoin::Miter,
                LineJoin::Round => tiny_skia::LineJoin::Round,
                LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
            },
            ..tiny_skia::Stroke::default()
        }
    }
}

pub struct Canvas {
    pixmap: tiny_skia::Pixmap,
    pen: Pen,
}
impl Canvas {
    /// Create a fully transparent canvas.
    /// # Errors
    /// If either dimension is zero or the pixel count would overflow.
    pub fn new(size: Size) -> Result<Self, CanvasError> {
        let pixmap =
            tiny_skia::Pixmap::new(size.width, size.height).ok_or(CanvasError::BadSize(size))?;
        Ok(Self {
            pixmap,
            pen: Pen::default(),
        })
    }
    pub(crate) fn from_pixmap(pixmap: tiny_skia::Pixmap) -> Self {
        Self {
            pixmap,
            pen: Pen::default(),
        }
    }
    #[must_use]
    pub fn pixmap(&self) -> &tiny_skia::Pixmap {
        &self.pixmap
    }
    /// Read back a single pixel, demultiplied. `None` if out of bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<HexColor> {
        let color = self.pixmap.pixel(x, y)?.demultiply();
        Some(HexColor {
            r: color.red(),
            g: color.green(),
            b: color.blue(),
            a: color.alpha(),
        })
    }
    /// Whether every pixel is fully transparent.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.pixmap.pixels().iter().all(|pixel| pixel.alpha() == 0)
    }
    /// Reallocate the backing pixmap at `size`, keeping whatever of the old image fits when anchored at
    /// the origin. Content outside the new bounds is lost. Pen state is kept.
    /// # Errors
    /// If `size` has no area. The canvas is left untouched.
    pub fn resize(&mut self, size: Size) -> Result<(), CanvasError> {
        let mut resized =
            tiny_skia::Pixmap::new(size.width, size.height).ok_or(CanvasError::BadSize(size))?;
        blit(&mut resized, &self.pixmap);
        self.pixmap = resized;
        Ok(())
    }
    /// Replace all pixels with `source` copied at the origin (clipped to this canvas).
    pub(crate) fn replace_contents(&mut self, source: &tiny_skia::Pixmap) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
        blit(&mut self.pixmap, source);
    }
}

/// Exact copy of the region `source` and `dest` share when both are anchored at the origin.
/// No blending or filtering is involved, so pixels come out bit-identical.
fn blit(dest: &mut tiny_skia::Pixmap, source: &tiny_skia::Pixmap) {
    let dest_width = dest.width() as usize;
    let source_width = source.width() as usize;
    let overlap = Size::new(dest.width(), dest.height())
        .intersect(Size::new(source.width(), source.height()));
    let row_len = overlap.width as usize;

    let source_pixels = source.pixels();
    let dest_pixels = dest.pixels_mut();
    for row in 0..overlap.height as usize {
        let from = &source_pixels[row * source_width..][..row_len];
        dest_pixels[row * dest_width..][..row_len].copy_from_slice(from);
    }
}

impl Surface for Canvas {
    fn set_line_width(&mut self, width: f32) {
        self.pen.width = width;
    }
    fn set_line_cap(&mut self, cap: LineCap) {
        self.pen.cap = cap;
    }
    fn set_line_join(&mut self, join: LineJoin) {
        self.pen.join = join;
    }
    fn set_composite(&mut self, composite: Composite) {
        self.pen.composite = composite;
    }
    fn set_stroke_color(&mut self, color: HexColor) {
        self.pen.color = color;
    }
    fn stroke_quad(&mut self, from: Point, control: Point, to: Point) {
        let mut builder = tiny_skia::PathBuilder::new();
        builder.move_to(from.x, from.y);
        builder.quad_to(control.x, control.y, to.x, to.y);
        // None for non-finite input. Nothing sensible to draw.
        let Some(path) = builder.finish() else {
            log::trace!("Skipping degenerate segment {from:?} -> {to:?}");
            return;
        };
        self.pixmap.stroke_path(
            &path,
            &self.pen.paint(),
            &self.pen.stroke(),
            tiny_skia::Transform::identity(),
            None,
        );
    }
    fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }
    fn size(&self) -> Size {
        Size::new(self.pixmap.width(), self.pixmap.height())
    }
}
