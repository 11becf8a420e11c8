//! # Geometry & style core
//!
//! Stateless helpers shared by the renderer, lifecycle and history redraw paths.

use crate::{
    style::DrawingStyle,
    surface::{Composite, LineCap, LineJoin, Surface},
};

/// Canvas coordinates, in device pixels.
#[derive(Copy, Clone, PartialEq, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}
impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}
impl Size {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
    /// Componentwise minimum - the region two sizes anchored at the origin share.
    #[must_use]
    pub fn intersect(&self, other: Size) -> Size {
        Size::new(self.width.min(other.width), self.height.min(other.height))
    }
}

#[must_use]
pub fn midpoint(a: Point, b: Point) -> Point {
    Point {
        x: (a.x + b.x) / 2.0,
        y: (a.y + b.y) / 2.0,
    }
}

const PEN_ONLY_TYPES: &[&str] = &["pen"];
const ANY_POINTER_TYPES: &[&str] = &["pen", "mouse", "touch"];

/// Whether a pointer of this type may draw. Unknown or empty types never may.
#[must_use]
pub fn is_allowed_pointer_type(pointer_type: &str, pen_only: bool) -> bool {
    let allowed = if pen_only {
        PEN_ONLY_TYPES
    } else {
        ANY_POINTER_TYPES
    };
    allowed.contains(&pointer_type)
}

/// Load `style` into the surface's pen state. Caps and joins are always round.
pub fn apply_style<'s, S: Surface>(surface: &'s mut S, style: &DrawingStyle) -> &'s mut S {
    surface.set_line_width(style.line_width);
    surface.set_line_cap(LineCap::Round);
    surface.set_line_join(LineJoin::Round);

    if style.is_eraser {
        surface.set_composite(Composite::DestinationOut);
    } else {
        surface.set_composite(Composite::SourceOver);
        surface.set_stroke_color(style.line_color);
    }
    surface
}

pub fn clear<S: Surface>(surface: &mut S) {
    surface.clear();
}

/// Where the smoothing left off. Feed back into the next [`draw_smooth_segment`] call.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct SmoothState {
    pub last_pos: Point,
    pub mid_point: Point,
}

/// Draw `points` as a chain of quadratic curves between successive midpoints, with each raw sample
/// as the control point. This hides the facets a polyline through the raw samples would show.
///
/// No points - no drawing, and the state is returned as-is.
pub fn draw_smooth_segment<S: Surface>(
    surface: &mut S,
    points: &[Point],
    last_pos: Point,
    mid_point: Point,
) -> SmoothState {
    points.iter().fold(
        SmoothState {
            last_pos,
            mid_point,
        },
        |SmoothState {
             last_pos,
             mid_point,
         },
         &point| {
            let new_mid = midpoint(last_pos, point);
            surface.stroke_quad(mid_point, last_pos, new_mid);
            SmoothState {
                last_pos: point,
                mid_point: new_mid,
            }
        },
    )
}

#[cfg(test)]
pub(crate) mod test {
    use super::{
        apply_style, draw_smooth_segment, is_allowed_pointer_type, midpoint, Point, Size,
        SmoothState,
    };
    use crate::{
        color::HexColor,
        style::DrawingStyle,
        surface::{Composite, LineCap, LineJoin, Surface},
    };

    /// Every call a [`Surface`] saw, in order.
    #[derive(Debug, PartialEq, Clone)]
    pub enum Call {
        Width(f32),
        Cap(LineCap),
        Join(LineJoin),
        Composite(Composite),
        Color(HexColor),
        Quad(Point, Point, Point),
        Clear,
    }
    #[derive(Default)]
    pub struct RecordingSurface {
        pub calls: Vec<Call>,
    }
    impl RecordingSurface {
        pub fn quads(&self) -> impl Iterator<Item = &Call> {
            self.calls.iter().filter(|call| matches!(call, Call::Quad(..)))
        }
    }
    impl Surface for RecordingSurface {
        fn set_line_width(&mut self, width: f32) {
            self.calls.push(Call::Width(width));
        }
        fn set_line_cap(&mut self, cap: LineCap) {
            self.calls.push(Call::Cap(cap));
        }
        fn set_line_join(&mut self, join: LineJoin) {
            self.calls.push(Call::Join(join));
        }
        fn set_composite(&mut self, composite: Composite) {
            self.calls.push(Call::Composite(composite));
        }
        fn set_stroke_color(&mut self, color: HexColor) {
            self.calls.push(Call::Color(color));
        }
        fn stroke_quad(&mut self, from: Point, control: Point, to: Point) {
            self.calls.push(Call::Quad(from, control, to));
        }
        fn clear(&mut self) {
            self.calls.push(Call::Clear);
        }
        fn size(&self) -> Size {
            Size::new(100, 100)
        }
    }

    #[test]
    fn midpoints() {
        assert_eq!(
            midpoint(Point::new(0.0, 0.0), Point::new(10.0, 20.0)),
            Point::new(5.0, 10.0)
        );
        assert_eq!(
            midpoint(Point::new(-3.0, 1.5), Point::new(2.0, -4.5)),
            Point::new(-0.5, -1.5)
        );
        let p = Point::new(7.25, -2.0);
        assert_eq!(midpoint(p, p), p);
    }
    #[test]
    fn pointer_gating() {
        assert!(is_allowed_pointer_type("pen", true));
        assert!(!is_allowed_pointer_type("mouse", true));
        assert!(!is_allowed_pointer_type("touch", true));
        for ty in ["pen", "mouse", "touch"] {
            assert!(is_allowed_pointer_type(ty, false), "{ty}");
        }
        for ty in ["", "Pen", "stylus", "eraser"] {
            assert!(!is_allowed_pointer_type(ty, false), "{ty}");
            assert!(!is_allowed_pointer_type(ty, true), "{ty}");
        }
    }
    #[test]
    fn style_paint() {
        let mut surface = RecordingSurface::default();
        let style = DrawingStyle {
            line_width: 20.0,
            line_color: HexColor::rgb(0xff, 0, 0),
            ..DrawingStyle::default()
        };
        apply_style(&mut surface, &style);
        assert_eq!(
            surface.calls,
            [
                Call::Width(20.0),
                Call::Cap(LineCap::Round),
                Call::Join(LineJoin::Round),
                Call::Composite(Composite::SourceOver),
                Call::Color(HexColor::rgb(0xff, 0, 0)),
            ]
        );
    }
    #[test]
    fn style_eraser() {
        let mut surface = RecordingSurface::default();
        let style = DrawingStyle {
            is_eraser: true,
            ..DrawingStyle::default()
        };
        apply_style(&mut surface, &style);
        assert!(surface
            .calls
            .contains(&Call::Composite(Composite::DestinationOut)));
        // Color does not matter when erasing.
        assert!(!surface.calls.iter().any(|c| matches!(c, Call::Color(_))));
    }
    #[test]
    fn smoothing_identity() {
        let mut surface = RecordingSurface::default();
        let last_pos = Point::new(3.0, 4.0);
        let mid_point = Point::new(1.0, 2.0);
        let state = draw_smooth_segment(&mut surface, &[], last_pos, mid_point);
        assert_eq!(
            state,
            SmoothState {
                last_pos,
                mid_point
            }
        );
        assert!(surface.calls.is_empty());
    }
    #[test]
    fn smoothing_curves_between_midpoints() {
        let mut surface = RecordingSurface::default();
        let start = Point::new(10.0, 10.0);
        let state = draw_smooth_segment(
            &mut surface,
            &[Point::new(20.0, 20.0), Point::new(40.0, 20.0)],
            start,
            start,
        );
        assert_eq!(
            surface.calls,
            [
                Call::Quad(start, start, Point::new(15.0, 15.0)),
                Call::Quad(
                    Point::new(15.0, 15.0),
                    Point::new(20.0, 20.0),
                    Point::new(30.0, 20.0)
                ),
            ]
        );
        assert_eq!(state.last_pos, Point::new(40.0, 20.0));
        assert_eq!(state.mid_point, Point::new(30.0, 20.0));
    }
    #[test]
    fn smoothing_split_matches_whole() {
        // Flushing in two batches draws the same curves as flushing once.
        let points = [
            Point::new(1.0, 1.0),
            Point::new(5.0, 2.0),
            Point::new(9.0, 7.0),
            Point::new(3.0, 3.0),
        ];
        let start = Point::new(0.0, 0.0);

        let mut whole = RecordingSurface::default();
        let whole_state = draw_smooth_segment(&mut whole, &points, start, start);

        let mut split = RecordingSurface::default();
        let half = draw_smooth_segment(&mut split, &points[..1], start, start);
        let split_state =
            draw_smooth_segment(&mut split, &points[1..], half.last_pos, half.mid_point);

        assert_eq!(whole.calls, split.calls);
        assert_eq!(whole_state, split_state);
    }
}
