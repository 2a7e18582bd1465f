//! Writing finished images out.

use crate::buffer::ImageBuffer;
use image::ImageEncoder;

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("no image format for extension {0:?}")]
    UnknownExtension(String),
    #[error("jpeg quality {0} outside 1..=100")]
    BadQuality(u8),
    #[error("encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ExportFormat {
    /// Lossy. Alpha is discarded.
    Jpeg { quality: u8 },
    Png,
}
impl ExportFormat {
    /// Photos are saved at the highest quality by default.
    pub const BEST_JPEG: Self = Self::Jpeg { quality: 100 };
    /// Pick a format by file extension, case-insensitively.
    pub fn from_path(path: &std::path::Path) -> Result<Self, ExportError> {
        let ext = path
            .extension()
            .and_then(std::ffi::OsStr::to_str)
            .unwrap_or_default()
            .to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Ok(Self::BEST_JPEG),
            "png" => Ok(Self::Png),
            _ => Err(ExportError::UnknownExtension(ext)),
        }
    }
}

/// Encode `buffer` into an in-memory file of the given format.
pub fn encode(buffer: &ImageBuffer, format: ExportFormat) -> Result<Vec<u8>, ExportError> {
    let mut out = Vec::new();
    let (width, height) = buffer.dimensions();
    match format {
        ExportFormat::Jpeg { quality } => {
            if !(1..=100).contains(&quality) {
                return Err(ExportError::BadQuality(quality));
            }
            let rgb = image::DynamicImage::ImageRgba8(buffer.as_image().clone()).into_rgb8();
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality).write_image(
                rgb.as_raw(),
                width,
                height,
                image::ExtendedColorType::Rgb8,
            )?;
        }
        ExportFormat::Png => {
            image::codecs::png::PngEncoder::new(&mut out).write_image(
                buffer.as_bytes(),
                width,
                height,
                image::ExtendedColorType::Rgba8,
            )?;
        }
    }
    Ok(out)
}

/// Encode `buffer` in the format implied by `path`'s extension and write it there.
pub fn save_to(buffer: &ImageBuffer, path: &std::path::Path) -> Result<(), ExportError> {
    let format = ExportFormat::from_path(path)?;
    let bytes = encode(buffer, format)?;
    std::fs::write(path, &bytes)?;
    log::info!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
