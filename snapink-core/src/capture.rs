//! # Capture-time orientation
//!
//! A freshly captured photo carries no orientation of its own. Before anything reads it back, the tag to
//! write is derived from the device's physical rotation and stored into the file's EXIF data.

use crate::decode::ContainerKind;

/// The four fixed physical rotation positions of the capturing device.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, strum::EnumIter, strum::AsRefStr)]
pub enum DeviceRotation {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}
impl DeviceRotation {
    /// Orientation value to persist for a photo captured in this rotation.
    ///
    /// This is a fixed lookup table, kept exactly as deployed photos were written: 90 and 180 both map to 1.
    #[must_use]
    pub const fn capture_tag(self) -> u16 {
        match self {
            Self::Deg0 => 6,
            Self::Deg90 => 1,
            Self::Deg180 => 1,
            Self::Deg270 => 3,
        }
    }
    #[must_use]
    pub const fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }
    /// `None` for anything but one of the four positions.
    #[must_use]
    pub const fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Self::Deg0),
            90 => Some(Self::Deg90),
            180 => Some(Self::Deg180),
            270 => Some(Self::Deg270),
            _ => None,
        }
    }
}
impl std::str::FromStr for DeviceRotation {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let degrees: u16 = s
            .trim()
            .trim_end_matches("deg")
            .parse()
            .map_err(|e| format!("bad rotation {s:?}: {e}"))?;
        Self::from_degrees(degrees).ok_or_else(|| format!("rotation must be 0, 90, 180 or 270, not {degrees}"))
    }
}

#[derive(thiserror::Error, Debug)]
pub enum MetadataWriteError {
    #[error("cannot embed metadata into this container")]
    UnsupportedContainer,
    #[error("writing EXIF data failed: {0}")]
    Exif(std::io::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Embed `value` as the EXIF orientation of the encoded image `bytes`, returning the re-encoded container.
///
/// Pixel data is left untouched.
pub fn embed_orientation(bytes: &[u8], value: u16) -> Result<Vec<u8>, MetadataWriteError> {
    use little_exif::{exif_tag::ExifTag, metadata::Metadata};
    let file_type = ContainerKind::sniff(bytes)
        .and_then(ContainerKind::exif_file_type)
        .ok_or(MetadataWriteError::UnsupportedContainer)?;

    // Keep whatever EXIF is already present, only replacing the orientation.
    let mut out = bytes.to_vec();
    let mut metadata =
        Metadata::new_from_vec(&out, file_type.clone()).unwrap_or_else(|_| Metadata::new());
    metadata.set_tag(ExifTag::Orientation(vec![value]));
    metadata
        .write_to_vec(&mut out, file_type)
        .map_err(MetadataWriteError::Exif)?;
    Ok(out)
}

/// Persist the capture-time orientation for `rotation` into the photo at `path`, in place.
///
/// Returns the value written.
pub fn tag_captured_photo(
    path: &std::path::Path,
    rotation: DeviceRotation,
) -> Result<u16, MetadataWriteError> {
    let value = rotation.capture_tag();
    let bytes = std::fs::read(path)?;
    let tagged = embed_orientation(&bytes, value)?;
    std::fs::write(path, tagged)?;
    log::info!(
        "EXIF orientation saved: {} (device rotation {}, orientation {value})",
        path.display(),
        rotation.degrees()
    );
    Ok(value)
}

#[cfg(test)]
mod test {
    use super::{embed_orientation, tag_captured_photo, DeviceRotation, MetadataWriteError};
    use crate::{decode, orientation::OrientationTag, test_util};

    #[test]
    fn capture_table_is_verbatim() {
        use strum::IntoEnumIterator;
        let values: Vec<u16> = DeviceRotation::iter().map(DeviceRotation::capture_tag).collect();
        // The duplicate at 90/180 is intentional to match existing files.
        assert_eq!(values, [6, 1, 1, 3]);
    }
    #[test]
    fn parse_rotation() {
        assert_eq!("90".parse(), Ok(DeviceRotation::Deg90));
        assert_eq!("270deg".parse(), Ok(DeviceRotation::Deg270));
        assert!("45".parse::<DeviceRotation>().is_err());
        assert!("up".parse::<DeviceRotation>().is_err());
    }
    #[test]
    fn embedded_tag_reads_back() {
        let jpeg = test_util::jpeg(8, 4);
        for value in [1u16, 3, 6, 8] {
            let tagged = embed_orientation(&jpeg, value).unwrap();
            assert_eq!(
                decode::read_orientation(&tagged).unwrap(),
                OrientationTag::from_value(value)
            );
        }
    }
    #[test]
    fn garbage_is_unsupported() {
        assert!(matches!(
            embed_orientation(b"definitely not an image", 6),
            Err(MetadataWriteError::UnsupportedContainer)
        ));
    }
    #[test]
    fn tags_file_in_place() {
        let file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
        std::fs::write(file.path(), test_util::jpeg(20, 10)).unwrap();

        let written = tag_captured_photo(file.path(), DeviceRotation::Deg0).unwrap();
        assert_eq!(written, 6);

        // Rotation 0 writes "rotate 90", so the upright image is portrait.
        let decoded = decode::decode_file(file.path()).unwrap();
        assert_eq!(decoded.dimensions(), (10, 20));
    }
}
