//! # Flattening
//!
//! Burns committed strokes permanently into a copy of the base image.
//!
//! Coverage is binary (a pixel centre is either within half the stroke width of the polyline or not), which keeps
//! the output byte-identical across repeated invocations. Each stroke is blended exactly once per pixel, so
//! translucent colors don't darken where a stroke's own segments overlap, while later strokes still blend over
//! earlier ones.

use crate::{
    buffer::ImageBuffer,
    geom::{Point, RectMapping},
    stroke::{Stroke, StrokeSet, StrokeStyle},
};

/// Thinnest radius ever rasterized, so hairlines stay visible.
const MIN_RADIUS: f32 = 0.5;

/// Composite every committed stroke of `strokes` onto a copy of `base`, in insertion order.
///
/// Each point is mapped into image space through the display rect it was recorded under, which is taken to show
/// the whole of `base`. The width is scaled along with it. A stroke still being drawn is *not* included.
#[must_use]
pub fn flatten(base: &ImageBuffer, strokes: &StrokeSet, style: &StrokeStyle) -> ImageBuffer {
    let mut out = base.clone();
    for stroke in strokes.iter_committed() {
        draw_stroke(&mut out, stroke, style);
    }
    out
}

/// Integer pixel rectangle, `[x0, x1) x [y0, y1)`.
#[derive(Clone, Copy, Debug)]
struct PixelBounds {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}
impl PixelBounds {
    /// Bounds of `points` grown by `radius`, clipped to the image. `None` if nothing remains.
    fn around(points: &[Point], radius: f32, width: u32, height: u32) -> Option<Self> {
        let (mut min_x, mut min_y) = (f32::INFINITY, f32::INFINITY);
        let (mut max_x, mut max_y) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
        for point in points {
            min_x = min_x.min(point.x);
            min_y = min_y.min(point.y);
            max_x = max_x.max(point.x);
            max_y = max_y.max(point.y);
        }
        // Float -> int `as` saturates, which is exactly the clipping wanted here.
        let clip = |v: f32, max: u32| (v.max(0.0) as u32).min(max);
        let bounds = Self {
            x0: clip((min_x - radius).floor(), width),
            y0: clip((min_y - radius).floor(), height),
            x1: clip((max_x + radius).ceil() + 1.0, width),
            y1: clip((max_y + radius).ceil() + 1.0, height),
        };
        (bounds.x0 < bounds.x1 && bounds.y0 < bounds.y1).then_some(bounds)
    }
    fn width(&self) -> u32 {
        self.x1 - self.x0
    }
    fn height(&self) -> u32 {
        self.y1 - self.y0
    }
}

fn draw_stroke(out: &mut ImageBuffer, stroke: &Stroke, style: &StrokeStyle) {
    // Nothing to connect - a lone point is a move-to only.
    if stroke.points().len() < 2 {
        return;
    }
    let (width, height) = out.dimensions();
    // Image-space point and the radius of the segment starting there.
    let placed: Vec<(Point, f32)> = stroke
        .placed_points()
        .map(|(point, rect)| {
            let mapping = RectMapping::onto_image(&rect, width, height);
            let radius = (style.width_px() * mapping.length_scale() / 2.0).max(MIN_RADIUS);
            (mapping.map(point), radius)
        })
        .collect();
    let points: Vec<Point> = placed.iter().map(|&(point, _)| point).collect();
    let max_radius = placed.iter().map(|&(_, radius)| radius).fold(MIN_RADIUS, f32::max);
    let Some(bounds) = PixelBounds::around(&points, max_radius, width, height) else {
        return;
    };

    let mut covered = vec![false; bounds.width() as usize * bounds.height() as usize];
    for pair in placed.windows(2) {
        let ((from, radius), (to, _)) = (pair[0], pair[1]);
        mark_segment(&mut covered, &bounds, from, to, radius);
    }

    let color = style.color();
    for (idx, _) in covered.iter().enumerate().filter(|(_, hit)| **hit) {
        let x = bounds.x0 + (idx % bounds.width() as usize) as u32;
        let y = bounds.y0 + (idx / bounds.width() as usize) as u32;
        out.blend(x, y, color);
    }
}

/// Mark every pixel in `bounds` whose centre lies within `radius` of the segment `a`-`b`. Round caps.
fn mark_segment(covered: &mut [bool], bounds: &PixelBounds, a: Point, b: Point, radius: f32) {
    let Some(local) = PixelBounds::around(&[a, b], radius, bounds.x1, bounds.y1) else {
        return;
    };
    let radius_sq = radius * radius;
    for y in local.y0.max(bounds.y0)..local.y1 {
        for x in local.x0.max(bounds.x0)..local.x1 {
            let centre = Point::new(x as f32 + 0.5, y as f32 + 0.5);
            if distance_sq_to_segment(centre, a, b) <= radius_sq {
                let idx = (y - bounds.y0) as usize * bounds.width() as usize + (x - bounds.x0) as usize;
                covered[idx] = true;
            }
        }
    }
}

fn distance_sq_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let (abx, aby) = (b.x - a.x, b.y - a.y);
    let (apx, apy) = (p.x - a.x, p.y - a.y);
    let len_sq = abx * abx + aby * aby;
    // Degenerate segment - distance to the point.
    let t = if len_sq > 0.0 {
        ((apx * abx + apy * aby) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (dx, dy) = (apx - abx * t, apy - aby * t);
    dx * dx + dy * dy
}
