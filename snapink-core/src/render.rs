//! Per-frame overlay description, for whatever draws on top of the displayed image.

use crate::{
    color::Color,
    geom::{DisplayRect, Point, RectMapping},
    stroke::{StrokeSet, StrokeStyle},
};

/// One straight line draw, in display coordinates.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct LineSegment {
    pub from: Point,
    pub to: Point,
}

/// Everything needed to draw the current annotations over the image for one frame.
#[derive(Clone, PartialEq, Debug)]
pub struct Overlay {
    pub color: Color,
    pub width_px: f32,
    /// In drawing order: committed strokes first, then the in-progress one.
    pub segments: Vec<LineSegment>,
}
impl Overlay {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Describe `strokes` as line segments drawn with `style`.
///
/// Points recorded under an older layout are moved onto `current`, so they stay on the same spot of the image.
/// With no `current` rect, points are reported as recorded. Side-effect free, so it may be called every frame.
#[must_use]
pub fn render(strokes: &StrokeSet, style: &StrokeStyle, current: Option<DisplayRect>) -> Overlay {
    let mut segments = Vec::new();
    // Committed strokes precede the active one in the set, so plain iteration order is already correct.
    for stroke in strokes.iter() {
        let points: Vec<Point> = stroke
            .placed_points()
            .map(|(point, rect)| match current {
                Some(current) if current != rect => RectMapping::between(&rect, &current).map(point),
                _ => point,
            })
            .collect();
        segments.extend(
            points
                .windows(2)
                .map(|pair| LineSegment {
                    from: pair[0],
                    to: pair[1],
                }),
        );
    }
    Overlay {
        color: style.color(),
        width_px: style.width_px(),
        segments,
    }
}
