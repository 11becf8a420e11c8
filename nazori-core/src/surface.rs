//! # Surfaces
//!
//! The seam between the stroke algorithms and whatever holds the pixels. Mirrors the handful of
//! 2D-context knobs the drawing core actually touches, so the smoothing and style logic can be driven
//! against a raster [`crate::canvas::Canvas`] or a recording fake in tests.

use crate::{color::HexColor, geometry::Point, geometry::Size};

#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}
/// How newly stroked pixels combine with the ones already there.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum Composite {
    /// Paint over the destination.
    #[default]
    SourceOver,
    /// Remove destination coverage where the stroke lands. Stroke color is irrelevant.
    DestinationOut,
}

pub trait Surface {
    fn set_line_width(&mut self, width: f32);
    fn set_line_cap(&mut self, cap: LineCap);
    fn set_line_join(&mut self, join: LineJoin);
    fn set_composite(&mut self, composite: Composite);
    fn set_stroke_color(&mut self, color: HexColor);
    /// Stroke a single quadratic curve with the current pen state.
    fn stroke_quad(&mut self, from: Point, control: Point, to: Point);
    /// Erase every pixel to transparent.
    fn clear(&mut self);
    fn size(&self) -> Size;
}
