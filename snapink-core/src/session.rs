//! One photo being annotated, from decode until it is saved or thrown away.
//!
//! The session owns both the upright base image and the strokes drawn over it. Ending the session, either way,
//! consumes it, so neither can outlive it.

use crate::{
    buffer::ImageBuffer,
    decode::{self, DecodeError},
    geom::DisplayRect,
    render::Overlay,
    stroke::StrokeStyle,
    surface::{AnnotationSurface, PointerEvent},
};

pub struct EditSession {
    base: ImageBuffer,
    surface: AnnotationSurface,
}
impl EditSession {
    /// Begin annotating an already-upright `base`.
    #[must_use]
    pub fn open(base: ImageBuffer, style: StrokeStyle) -> Self {
        log::debug!("Opened session on {base:?}");
        Self {
            base,
            surface: AnnotationSurface::new(style),
        }
    }
    /// Decode `bytes`, honoring its orientation, and begin annotating the result.
    pub fn open_bytes(bytes: &[u8], style: StrokeStyle) -> Result<Self, DecodeError> {
        Ok(Self::open(decode::decode(bytes)?, style))
    }
    pub fn set_display_rect(&mut self, rect: DisplayRect) {
        self.surface.set_display_rect(rect);
    }
    pub fn dispatch(&mut self, event: PointerEvent) {
        self.surface.handle(event);
    }
    #[must_use]
    pub fn surface(&self) -> &AnnotationSurface {
        &self.surface
    }
    /// The upright, unannotated image.
    #[must_use]
    pub fn base(&self) -> &ImageBuffer {
        &self.base
    }
    #[must_use]
    pub fn render(&self) -> Overlay {
        self.surface.render()
    }
    /// Consume any pending redraw request.
    pub fn take_redraw_request(&mut self) -> bool {
        self.surface.take_redraw_request()
    }
    /// End the session, producing the annotated image.
    ///
    /// A stroke still in progress is kept, as though its pointer had been lifted where it last was.
    #[must_use]
    pub fn save(mut self) -> ImageBuffer {
        self.surface.commit_active();
        let out = self.surface.flatten(&self.base);
        log::info!(
            "Saved {} strokes onto {out:?}",
            self.surface.strokes().iter_committed().count()
        );
        self.surface.clear();
        out
    }
    /// End the session, discarding the image and every stroke.
    pub fn cancel(mut self) {
        log::debug!(
            "Cancelled session with {} strokes",
            self.surface.strokes().len()
        );
        self.surface.clear();
    }
}

#[cfg(test)]
mod test {
    use super::EditSession;
    use crate::{
        buffer::ImageBuffer,
        color::Color,
        geom::DisplayRect,
        stroke::StrokeStyle,
        surface::{PointerEvent, PointerPhase},
    };

    fn style() -> StrokeStyle {
        StrokeStyle::new(Color::BLACK, 2.0).unwrap()
    }
    #[test]
    fn save_includes_dangling_stroke() {
        let base = ImageBuffer::filled(20, 10, Color::WHITE);
        let mut session = EditSession::open(base.clone(), style());
        session.set_display_rect(DisplayRect::from_size(20, 10));
        session.dispatch(PointerEvent::new(PointerPhase::Down, 2.0, 5.0));
        session.dispatch(PointerEvent::new(PointerPhase::Move, 18.0, 5.0));
        assert_eq!(session.render().segments.len(), 1);

        let out = session.save();
        assert_eq!(out.dimensions(), (20, 10));
        assert_eq!(out.get(10, 5), Some(Color::BLACK));
        assert_eq!(out.get(10, 0), Some(Color::WHITE));
    }
    #[test]
    fn save_without_strokes_is_base() {
        let base = ImageBuffer::filled(8, 8, Color::new(1, 2, 3, 255));
        let session = EditSession::open(base.clone(), style());
        assert_eq!(session.save(), base);
    }
    #[test]
    fn display_scale_is_undone_on_save() {
        // 40x20 image shown at half size.
        let base = ImageBuffer::filled(40, 20, Color::WHITE);
        let mut session = EditSession::open(base, style());
        session.set_display_rect(DisplayRect::new(0.0, 0.0, 20.0, 10.0).unwrap());
        session.dispatch(PointerEvent::new(PointerPhase::Down, 1.0, 5.0));
        session.dispatch(PointerEvent::new(PointerPhase::Up, 19.0, 5.0));
        let out = session.save();
        assert_eq!(out.get(20, 10), Some(Color::BLACK));
        assert_eq!(out.get(20, 2), Some(Color::WHITE));
    }
    #[test]
    fn open_bytes_orients() {
        let jpeg = crate::test_util::jpeg(30, 10);
        let tagged = crate::capture::embed_orientation(&jpeg, 6).unwrap();
        let session = EditSession::open_bytes(&tagged, style()).unwrap();
        assert_eq!(session.base().dimensions(), (10, 30));
        session.cancel();
    }
    #[test]
    fn open_bytes_rejects_garbage() {
        assert!(EditSession::open_bytes(b"not an image", style()).is_err());
    }
}
