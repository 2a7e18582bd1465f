/// An 8-bit sRGB color with straight (non-premultiplied) alpha, as stored in an [`ImageBuffer`](crate::buffer::ImageBuffer).
#[repr(transparent)]
#[derive(Copy, Clone, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct Color([u8; 4]);
impl Color {
    pub const TRANSPARENT: Self = Self([0; 4]);
    pub const WHITE: Self = Self([255; 4]);
    pub const BLACK: Self = Self([0, 0, 0, 255]);
    pub const RED: Self = Self([255, 0, 0, 255]);
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self([r, g, b, a])
    }
    #[must_use]
    pub const fn as_array(&self) -> [u8; 4] {
        self.0
    }
    #[must_use]
    pub const fn alpha(&self) -> u8 {
        self.0[3]
    }
    /// Composite `self` over `dst` (both straight alpha), returning the straight-alpha result.
    ///
    /// Integer-only so that flattening the same strokes twice is byte-identical on every platform.
    #[must_use]
    pub fn over(self, dst: Self) -> Self {
        let src_a = u32::from(self.0[3]);
        if src_a == 255 {
            return self;
        }
        if src_a == 0 {
            return dst;
        }
        let dst_a = u32::from(dst.0[3]);
        // Scaled by 255 to stay in integers: out_a255 = 255 * out_a
        let dst_weight = dst_a * (255 - src_a);
        let out_a255 = src_a * 255 + dst_weight;
        if out_a255 == 0 {
            return Self::TRANSPARENT;
        }
        let mut out = [0u8; 4];
        for (channel, out) in out.iter_mut().enumerate().take(3) {
            let src = u32::from(self.0[channel]);
            let dst = u32::from(dst.0[channel]);
            let num = src * src_a * 255 + dst * dst_weight;
            // Rounded division; result is always <= 255.
            *out = ((num + out_a255 / 2) / out_a255) as u8;
        }
        out[3] = ((out_a255 + 127) / 255) as u8;
        Self(out)
    }
}
impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}
impl From<image::Rgba<u8>> for Color {
    fn from(value: image::Rgba<u8>) -> Self {
        Self(value.0)
    }
}
impl From<Color> for image::Rgba<u8> {
    fn from(value: Color) -> Self {
        image::Rgba(value.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ColorParseError {
    #[error("color must start with '#'")]
    MissingHash,
    #[error("expected 6 or 8 hex digits, found {0}")]
    BadLength(usize),
    #[error(transparent)]
    Digit(#[from] std::num::ParseIntError),
}

impl std::str::FromStr for Color {
    type Err = ColorParseError;
    /// Parse `#rrggbb` or `#rrggbbaa`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().strip_prefix('#').ok_or(ColorParseError::MissingHash)?;
        // Only ascii hex is meaningful, but guard against slicing through a multibyte char.
        if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
            return Err(ColorParseError::BadLength(hex.chars().count()));
        }
        let mut rgba = [255u8; 4];
        for (idx, channel) in rgba.iter_mut().enumerate().take(hex.len() / 2) {
            *channel = u8::from_str_radix(&hex[idx * 2..idx * 2 + 2], 16)?;
        }
        Ok(Self(rgba))
    }
}
impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [r, g, b, a] = self.0;
        write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}
impl serde::Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
impl<'de> serde::Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let string = String::deserialize(deserializer)?;
        string.parse().map_err(serde::de::Error::custom)
    }
}
