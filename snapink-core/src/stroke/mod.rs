//! # Strokes
//!
//! Freehand polylines in display coordinates, and the ordered set of them belonging to one editing session.

pub mod style;
pub use style::{StrokeStyle, StyleError};

use crate::geom::{DisplayRect, Point};

/// The display rect in effect from point `first` onward, until the next layout.
#[derive(Clone, Copy, PartialEq, Debug)]
struct Layout {
    first: usize,
    rect: DisplayRect,
}

/// One continuous freehand line, from pointer-down to pointer-up.
#[derive(Clone, PartialEq, Debug)]
pub struct Stroke {
    /// Insertion order is drawing order.
    points: Vec<Point>,
    /// Never empty, the first entry starts at point 0. Ascending by `first`.
    layouts: Vec<Layout>,
    /// Set once the terminating pointer-up has been processed. No points may be added afterwards.
    committed: bool,
}
impl Stroke {
    fn start(at: Point, rect: DisplayRect) -> Self {
        Self {
            points: vec![at],
            layouts: vec![Layout { first: 0, rect }],
            committed: false,
        }
    }
    fn push(&mut self, point: Point, rect: DisplayRect) {
        if self.layouts.last().map(|layout| layout.rect) != Some(rect) {
            self.layouts.push(Layout {
                first: self.points.len(),
                rect,
            });
        }
        self.points.push(point);
    }
    /// Points in display coordinates, as recorded.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }
    #[must_use]
    pub fn is_committed(&self) -> bool {
        self.committed
    }
    /// Every point alongside the display rect that was in effect when it was recorded.
    pub fn placed_points(&self) -> impl Iterator<Item = (Point, DisplayRect)> + '_ {
        let mut layouts = self.layouts.iter().peekable();
        let mut rect = self.layouts[0].rect;
        self.points.iter().enumerate().map(move |(idx, &point)| {
            while let Some(layout) = layouts.next_if(|layout| layout.first <= idx) {
                rect = layout.rect;
            }
            (point, rect)
        })
    }
}

/// Ordered strokes of an editing session.
///
/// Only ever grows by appending. At most one stroke, the last, is uncommitted.
#[derive(Clone, Default, Debug)]
pub struct StrokeSet {
    strokes: Vec<Stroke>,
}
// Public methods for client
impl StrokeSet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.strokes.len()
    }
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
    /// All strokes in drawing order, including one in progress.
    pub fn iter(&self) -> impl Iterator<Item = &Stroke> + '_ {
        self.strokes.iter()
    }
    /// Committed strokes in drawing order.
    pub fn iter_committed(&self) -> impl Iterator<Item = &Stroke> + '_ {
        self.strokes.iter().filter(|stroke| stroke.committed)
    }
    /// The stroke currently being drawn, if any.
    #[must_use]
    pub fn active(&self) -> Option<&Stroke> {
        self.strokes.last().filter(|stroke| !stroke.committed)
    }
    /// Total number of recorded points across every stroke.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.strokes.iter().map(|stroke| stroke.points.len()).sum()
    }
}
// Mutation is reserved for the surface's state machine.
impl StrokeSet {
    /// Append a new in-progress stroke. Any previous in-progress stroke is committed first, so that the
    /// single-active invariant holds.
    pub(crate) fn begin(&mut self, at: Point, rect: DisplayRect) {
        self.commit_active();
        self.strokes.push(Stroke::start(at, rect));
    }
    /// Extend the active stroke with a point recorded under `rect`. Returns false if there is none.
    pub(crate) fn extend(&mut self, point: Point, rect: DisplayRect) -> bool {
        match self.active_mut() {
            Some(stroke) => {
                stroke.push(point, rect);
                true
            }
            None => false,
        }
    }
    /// Mark the active stroke immutable. Returns false if there was none.
    pub(crate) fn commit_active(&mut self) -> bool {
        match self.active_mut() {
            Some(stroke) => {
                stroke.committed = true;
                true
            }
            None => false,
        }
    }
    pub(crate) fn clear(&mut self) {
        self.strokes.clear();
    }
    fn active_mut(&mut self) -> Option<&mut Stroke> {
        self.strokes.last_mut().filter(|stroke| !stroke.committed)
    }
}
