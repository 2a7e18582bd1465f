//! # Annotation surface
//!
//! Accumulates freehand strokes over a displayed image from a stream of pointer events.
//!
//! Implemented as a small statemachine per stroke: `Idle -> Drawing -> Idle`. A stroke may only *start* inside the
//! display rectangle; once started, points that wander outside are clamped to its edge rather than dropped.
//! Events that make no sense in the current state are ignored, never errors, as the event source is trusted to
//! be well-formed but may not be.

use crate::{
    buffer::ImageBuffer,
    geom::{DisplayRect, Point},
    raster,
    render::{self, Overlay},
    stroke::{StrokeSet, StrokeStyle},
};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, strum::AsRefStr)]
pub enum SurfaceState {
    #[default]
    Idle,
    Drawing,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// Hover, cancel, scroll... Anything else. Ignored.
    #[serde(other)]
    Other,
}

/// A raw pointer event, in display (device pixel) coordinates.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub pos: Point,
}
impl PointerEvent {
    #[must_use]
    pub fn new(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self {
            phase,
            pos: Point::new(x, y),
        }
    }
}

pub struct AnnotationSurface {
    /// The rectangle currently occupied by the image. `None` until layout has happened.
    rect: Option<DisplayRect>,
    strokes: StrokeSet,
    state: SurfaceState,
    style: StrokeStyle,
    redraw_requested: bool,
}
impl AnnotationSurface {
    #[must_use]
    pub fn new(style: StrokeStyle) -> Self {
        Self {
            rect: None,
            strokes: StrokeSet::default(),
            state: SurfaceState::Idle,
            style,
            redraw_requested: false,
        }
    }
    /// Layout changed. Later points clamp to this rectangle. Earlier points keep the rectangle they were recorded
    /// under, and so stay where they were drawn on the image.
    pub fn set_display_rect(&mut self, rect: DisplayRect) {
        if self.rect != Some(rect) {
            log::trace!("Display rect now {rect}");
            self.rect = Some(rect);
            self.redraw_requested = true;
        }
    }
    #[must_use]
    pub fn display_rect(&self) -> Option<DisplayRect> {
        self.rect
    }
    #[must_use]
    pub fn state(&self) -> SurfaceState {
        self.state
    }
    #[must_use]
    pub fn strokes(&self) -> &StrokeSet {
        &self.strokes
    }
    #[must_use]
    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }
    /// Dispatch one event by its phase.
    pub fn handle(&mut self, event: PointerEvent) {
        match event.phase {
            PointerPhase::Down => self.pointer_down(event.pos),
            PointerPhase::Move => self.pointer_move(event.pos),
            PointerPhase::Up => self.pointer_up(event.pos),
            PointerPhase::Other => log::trace!("Ignoring pointer event {event:?}"),
        }
    }
    /// Start a stroke at `pos`, if idle and `pos` is within the display rectangle.
    pub fn pointer_down(&mut self, pos: Point) {
        if self.state != SurfaceState::Idle || !pos.is_finite() {
            log::trace!("Ignoring pointer down at {pos:?} while {}", self.state.as_ref());
            return;
        }
        let Some(rect) = self.rect else {
            // Nowhere to draw yet.
            return;
        };
        if !rect.contains(pos) {
            return;
        }
        self.strokes.begin(pos, rect);
        self.state = SurfaceState::Drawing;
        self.redraw_requested = true;
    }
    /// Extend the active stroke with `pos` clamped to the display rectangle.
    pub fn pointer_move(&mut self, pos: Point) {
        let _ = self.record(pos);
    }
    /// Finish the active stroke with `pos` clamped to the display rectangle. The stroke is immutable afterwards.
    pub fn pointer_up(&mut self, pos: Point) {
        if self.record(pos) {
            self.strokes.commit_active();
            self.state = SurfaceState::Idle;
        }
    }
    /// Commit the in-progress stroke as it stands, if any. Must precede [`AnnotationSurface::flatten`] when
    /// the in-progress stroke should be part of the result.
    pub fn commit_active(&mut self) {
        if self.strokes.commit_active() {
            log::debug!("Committed in-progress stroke early");
        }
        self.state = SurfaceState::Idle;
    }
    /// Consume the pending redraw request, if any.
    pub fn take_redraw_request(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }
    /// Describe the current frame's annotations. Has no effect on the surface.
    #[must_use]
    pub fn render(&self) -> Overlay {
        render::render(&self.strokes, &self.style, self.rect)
    }
    /// Composite all committed strokes onto a copy of `base`.
    ///
    /// Each point is mapped onto `base` through the display rectangle in effect when it was recorded, which is
    /// taken to show the whole of `base`.
    #[must_use]
    pub fn flatten(&self, base: &ImageBuffer) -> ImageBuffer {
        raster::flatten(base, &self.strokes, &self.style)
    }
    /// Drop every stroke. For session teardown.
    pub(crate) fn clear(&mut self) {
        self.strokes.clear();
        self.state = SurfaceState::Idle;
        self.redraw_requested = true;
    }
    /// Append `pos`, clamped, to the active stroke. False (and no change) if not drawing.
    fn record(&mut self, pos: Point) -> bool {
        if self.state != SurfaceState::Drawing || !pos.is_finite() {
            log::trace!("Ignoring pointer at {pos:?} while {}", self.state.as_ref());
            return false;
        }
        // Drawing implies a rect was set at pointer-down, and rects are never unset.
        let Some(rect) = self.rect else {
            return false;
        };
        let extended = self.strokes.extend(rect.clamp(pos), rect);
        self.redraw_requested |= extended;
        extended
    }
}


#[cfg(test)]
mod proptests {
    use super::{AnnotationSurface, PointerEvent, PointerPhase};
    use crate::{geom::DisplayRect, stroke::StrokeStyle};
    use proptest::prelude::*;

    fn phase() -> impl Strategy<Value = PointerPhase> {
        prop_oneof![
            Just(PointerPhase::Down),
            Just(PointerPhase::Move),
            Just(PointerPhase::Up),
            Just(PointerPhase::Other),
        ]
    }
    fn event() -> impl Strategy<Value = PointerEvent> {
        (phase(), -500.0f32..500.0, -500.0f32..500.0)
            .prop_map(|(phase, x, y)| PointerEvent::new(phase, x, y))
    }
    fn rect() -> impl Strategy<Value = DisplayRect> {
        (-100.0f32..100.0, -100.0f32..100.0, 0.0f32..300.0, 0.0f32..300.0)
            .prop_map(|(l, t, w, h)| DisplayRect::new(l, t, l + w, t + h).unwrap())
    }

    proptest! {
        #[test]
        fn recorded_points_lie_within_rect(
            steps in prop::collection::vec((prop::option::weighted(0.1, rect()), event()), 1..64),
            initial in rect(),
        ) {
            let mut surface = AnnotationSurface::new(StrokeStyle::default());
            surface.set_display_rect(initial);
            let mut seen_points = 0;
            for (relayout, event) in steps {
                if let Some(rect) = relayout {
                    surface.set_display_rect(rect);
                }
                let rect = surface.display_rect().unwrap();
                let before = surface.strokes().len();
                surface.handle(event);

                if event.phase == PointerPhase::Down && !rect.contains(event.pos) {
                    prop_assert_eq!(surface.strokes().len(), before);
                }
                // Any newly recorded point was clamped against the rect in effect right now.
                let count = surface.strokes().point_count();
                if count > seen_points {
                    let newest = surface.strokes().iter().last().unwrap().points().last().copied().unwrap();
                    prop_assert_eq!(rect.clamp(newest), newest);
                }
                seen_points = count;
            }
        }
    }
}
