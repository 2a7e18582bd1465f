use crate::color::Color;

/// A rectangular grid of straight-alpha RGBA8 pixels.
///
/// Buffers are never shared mutably between pipeline stages: each stage takes one by value and hands a new
/// (or the same) one onward.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageBuffer(image::RgbaImage);
impl ImageBuffer {
    /// A buffer of the given size filled with `fill`.
    #[must_use]
    pub fn filled(width: u32, height: u32, fill: Color) -> Self {
        Self(image::RgbaImage::from_pixel(width, height, fill.into()))
    }
    #[must_use]
    pub fn width(&self) -> u32 {
        self.0.width()
    }
    #[must_use]
    pub fn height(&self) -> u32 {
        self.0.height()
    }
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }
    /// Fetch a pixel. `None` if out-of-bounds.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<Color> {
        self.0.get_pixel_checked(x, y).copied().map(Color::from)
    }
    /// Overwrite a pixel. Out-of-bounds writes are ignored.
    pub fn put(&mut self, x: u32, y: u32, color: Color) {
        if let Some(pixel) = self.0.get_pixel_mut_checked(x, y) {
            *pixel = color.into();
        }
    }
    /// Composite `color` over the pixel at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn blend(&mut self, x: u32, y: u32, color: Color) {
        if let Some(pixel) = self.0.get_pixel_mut_checked(x, y) {
            *pixel = color.over(Color::from(*pixel)).into();
        }
    }
    /// Raw pixel bytes, row-major RGBA8.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_raw()
    }
    #[must_use]
    pub fn as_image(&self) -> &image::RgbaImage {
        &self.0
    }
    #[must_use]
    pub fn into_image(self) -> image::RgbaImage {
        self.0
    }
}
impl From<image::RgbaImage> for ImageBuffer {
    fn from(value: image::RgbaImage) -> Self {
        Self(value)
    }
}
impl From<image::DynamicImage> for ImageBuffer {
    fn from(value: image::DynamicImage) -> Self {
        Self(value.into_rgba8())
    }
}
impl std::fmt::Debug for ImageBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Pixel data would drown everything else.
        f.debug_struct("ImageBuffer")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}
