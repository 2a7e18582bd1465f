//! # Orientation
//!
//! EXIF orientation tags and the pixel transforms that make a stored image upright.

use crate::buffer::ImageBuffer;

/// EXIF orientation tag 0x0112.
pub const EXIF_ORIENTATION_TAG: u16 = 0x0112;

/// How a stored image must be transformed to appear upright.
///
/// Discriminants are the values of the conventional (EXIF/TIFF) orientation enumeration.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default, strum::EnumIter, strum::AsRefStr)]
#[repr(u16)]
pub enum OrientationTag {
    #[default]
    Identity = 1,
    MirrorHorizontal = 2,
    Rotate180 = 3,
    MirrorVertical = 4,
    /// Rotate 90 clockwise, then mirror horizontally.
    Rotate90MirrorHorizontal = 5,
    Rotate90 = 6,
    /// Rotate 270 clockwise, then mirror horizontally.
    Rotate270MirrorHorizontal = 7,
    Rotate270 = 8,
}
impl OrientationTag {
    /// Interpret a raw tag value. Unknown values are treated as [`OrientationTag::Identity`].
    #[must_use]
    pub fn from_value(value: u16) -> Self {
        Self::try_from_value(value).unwrap_or_default()
    }
    /// Interpret a raw tag value, `None` if outside `1..=8`.
    #[must_use]
    pub fn try_from_value(value: u16) -> Option<Self> {
        Some(match value {
            1 => Self::Identity,
            2 => Self::MirrorHorizontal,
            3 => Self::Rotate180,
            4 => Self::MirrorVertical,
            5 => Self::Rotate90MirrorHorizontal,
            6 => Self::Rotate90,
            7 => Self::Rotate270MirrorHorizontal,
            8 => Self::Rotate270,
            _ => return None,
        })
    }
    #[must_use]
    pub fn value(self) -> u16 {
        self as u16
    }
    /// Clockwise rotation, in degrees, needed to make the image upright.
    /// Mirroring (if any) is applied after this rotation, see [`OrientationTag::mirrored`].
    #[must_use]
    pub fn rotation_degrees(self) -> u16 {
        match self {
            Self::Identity | Self::MirrorHorizontal | Self::MirrorVertical => 0,
            Self::Rotate90 | Self::Rotate90MirrorHorizontal => 90,
            Self::Rotate180 => 180,
            Self::Rotate270 | Self::Rotate270MirrorHorizontal => 270,
        }
    }
    #[must_use]
    pub fn mirrored(self) -> bool {
        matches!(
            self,
            Self::MirrorHorizontal
                | Self::MirrorVertical
                | Self::Rotate90MirrorHorizontal
                | Self::Rotate270MirrorHorizontal
        )
    }
    /// Whether applying this orientation exchanges width and height.
    #[must_use]
    pub fn swaps_dimensions(self) -> bool {
        matches!(self.rotation_degrees(), 90 | 270)
    }
}
impl std::fmt::Display for OrientationTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.as_ref(), self.value())
    }
}

/// Apply `tag` to `buffer`, producing the upright image.
///
/// Rotations are exact quarter turns about the image centre, so no resampling occurs.
#[must_use]
pub fn orient(buffer: ImageBuffer, tag: OrientationTag) -> ImageBuffer {
    use image::imageops;
    let image = buffer.into_image();
    let image = match tag {
        OrientationTag::Identity => image,
        OrientationTag::MirrorHorizontal => imageops::flip_horizontal(&image),
        OrientationTag::Rotate180 => imageops::rotate180(&image),
        OrientationTag::MirrorVertical => imageops::flip_vertical(&image),
        OrientationTag::Rotate90MirrorHorizontal => {
            imageops::flip_horizontal(&imageops::rotate90(&image))
        }
        OrientationTag::Rotate90 => imageops::rotate90(&image),
        OrientationTag::Rotate270MirrorHorizontal => {
            imageops::flip_horizontal(&imageops::rotate270(&image))
        }
        OrientationTag::Rotate270 => imageops::rotate270(&image),
    };
    image.into()
}
