//! Recorded pointer input, replayed onto an editing session.
//!
//! Scripts are TOML, a flat list of `[[events]]` each with a `kind`:
//! `layout` events (`rect = [left, top, right, bottom]`) stand in for the image being laid out on screen,
//! and `pointer` events (`phase`, `x`, `y`) for touches on it.

use snapink_core::{
    geom::{DisplayRect, RectError},
    session::EditSession,
    surface::{PointerEvent, PointerPhase},
};

#[derive(serde::Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ScriptEvent {
    Layout { rect: [f32; 4] },
    Pointer { phase: PointerPhase, x: f32, y: f32 },
}

#[derive(serde::Deserialize, Debug, Default)]
pub struct Script {
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
}

#[derive(thiserror::Error, Debug)]
pub enum ScriptError {
    #[error("bad layout at event {index}: {source}")]
    Layout { index: usize, source: RectError },
}

/// What a replay did, for reporting.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub layouts: usize,
    pub pointer_events: usize,
    pub redraws: usize,
}

impl Script {
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
    /// Feed every event, in order, into `session`. Stops at the first malformed layout.
    pub fn replay(&self, session: &mut EditSession) -> Result<ReplayStats, ScriptError> {
        let mut stats = ReplayStats::default();
        for (index, event) in self.events.iter().enumerate() {
            match *event {
                ScriptEvent::Layout {
                    rect: [left, top, right, bottom],
                } => {
                    let rect = DisplayRect::new(left, top, right, bottom)
                        .map_err(|source| ScriptError::Layout { index, source })?;
                    session.set_display_rect(rect);
                    stats.layouts += 1;
                }
                ScriptEvent::Pointer { phase, x, y } => {
                    session.dispatch(PointerEvent::new(phase, x, y));
                    stats.pointer_events += 1;
                }
            }
            // One frame per event.
            if session.take_redraw_request() {
                stats.redraws += 1;
            }
        }
        log::debug!("Replayed {stats:?}");
        Ok(stats)
    }
}

#[cfg(test)]
mod test {
    use super::{Script, ScriptError, ScriptEvent};
    use snapink_core::{
        buffer::ImageBuffer,
        color::Color,
        geom::Point,
        session::EditSession,
        stroke::StrokeStyle,
        surface::{PointerPhase, SurfaceState},
    };

    const SCENARIO: &str = r#"
[[events]]
kind = "layout"
rect = [0.0, 0.0, 100.0, 100.0]

[[events]]
kind = "pointer"
phase = "down"
x = 50.0
y = 50.0

[[events]]
kind = "pointer"
phase = "hover"
x = 0.0
y = 0.0

[[events]]
kind = "pointer"
phase = "move"
x = 150.0
y = 50.0

[[events]]
kind = "pointer"
phase = "up"
x = 50.0
y = 150.0
"#;

    #[test]
    fn parses_unknown_phase_as_other() {
        let script = Script::parse(SCENARIO).unwrap();
        assert_eq!(script.events.len(), 5);
        assert_eq!(
            script.events[2],
            ScriptEvent::Pointer {
                phase: PointerPhase::Other,
                x: 0.0,
                y: 0.0
            }
        );
        assert!(Script::parse("").unwrap().events.is_empty());
        assert!(Script::parse("[[events]]\nkind = \"teleport\"\n").is_err());
    }
    #[test]
    fn replays_clamped_stroke() {
        let script = Script::parse(SCENARIO).unwrap();
        let mut session =
            EditSession::open(ImageBuffer::filled(100, 100, Color::WHITE), StrokeStyle::default());
        let stats = script.replay(&mut session).unwrap();
        assert_eq!(stats.layouts, 1);
        assert_eq!(stats.pointer_events, 4);

        let surface = session.surface();
        assert_eq!(surface.state(), SurfaceState::Idle);
        assert_eq!(surface.strokes().len(), 1);
        let stroke = surface.strokes().iter().next().unwrap();
        assert_eq!(
            stroke.points(),
            [
                Point::new(50.0, 50.0),
                Point::new(100.0, 50.0),
                Point::new(50.0, 100.0)
            ]
        );
        let out = session.save();
        assert_eq!(out.get(75, 50), Some(Color::RED));
    }
    #[test]
    fn bad_layout_is_reported() {
        let script = Script::parse(
            "[[events]]\nkind = \"layout\"\nrect = [10.0, 0.0, 0.0, 10.0]\n",
        )
        .unwrap();
        let mut session =
            EditSession::open(ImageBuffer::filled(4, 4, Color::WHITE), StrokeStyle::default());
        assert!(matches!(
            script.replay(&mut session),
            Err(ScriptError::Layout { index: 0, .. })
        ));
    }
}
