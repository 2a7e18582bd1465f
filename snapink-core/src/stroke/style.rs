use crate::color::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StyleError {
    #[error("stroke width must be finite and positive")]
    BadWidth,
}

/// How strokes are drawn. The same style applies to every stroke of a session.
#[derive(Clone, Copy, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawStrokeStyle", into = "RawStrokeStyle")]
pub struct StrokeStyle {
    color: Color,
    /// Invariant: finite and > 0
    width_px: f32,
}
impl StrokeStyle {
    pub const DEFAULT_WIDTH_PX: f32 = 10.0;
    pub fn new(color: Color, width_px: f32) -> Result<Self, StyleError> {
        if width_px.is_finite() && width_px > 0.0 {
            Ok(Self { color, width_px })
        } else {
            Err(StyleError::BadWidth)
        }
    }
    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }
    /// Line width in display pixels.
    #[must_use]
    pub fn width_px(&self) -> f32 {
        self.width_px
    }
    #[must_use = "returns a new style and does not modify `self`"]
    pub fn with_color(self, color: Color) -> Self {
        Self { color, ..self }
    }
    pub fn with_width(self, width_px: f32) -> Result<Self, StyleError> {
        Self::new(self.color, width_px)
    }
}
impl Default for StrokeStyle {
    /// Opaque red, 10px.
    fn default() -> Self {
        Self {
            color: Color::RED,
            width_px: Self::DEFAULT_WIDTH_PX,
        }
    }
}

/// On-disk shape of [`StrokeStyle`], validated on the way in.
#[derive(serde::Serialize, serde::Deserialize)]
struct RawStrokeStyle {
    stroke_color: Color,
    stroke_width_px: f32,
}
impl TryFrom<RawStrokeStyle> for StrokeStyle {
    type Error = StyleError;
    fn try_from(value: RawStrokeStyle) -> Result<Self, Self::Error> {
        Self::new(value.stroke_color, value.stroke_width_px)
    }
}
impl From<StrokeStyle> for RawStrokeStyle {
    fn from(value: StrokeStyle) -> Self {
        Self {
            stroke_color: value.color,
            stroke_width_px: value.width_px,
        }
    }
}
