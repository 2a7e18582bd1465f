//! # Orientation-normalizing decoder
//!
//! Turns encoded image bytes into an upright [`ImageBuffer`]: the orientation tag is read from the embedded
//! metadata (treated as identity when absent or unreadable), the pixels are decoded, and the tag's transform is
//! applied. Decoding is pure, and may be run on any thread. The caller owns the result.

use crate::{
    buffer::ImageBuffer,
    orientation::{self, OrientationTag, EXIF_ORIENTATION_TAG},
};

#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("unsupported or malformed image: {0}")]
    Image(#[from] image::ImageError),
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),
}

/// Orientation metadata could not be determined. Always recoverable, by assuming identity.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataReadError {
    #[error("no EXIF orientation present")]
    Missing,
    #[error("container format not recognized")]
    UnknownContainer,
    #[error("orientation value {0} is out of range")]
    OutOfRange(u16),
    #[error("EXIF data unreadable: {0}")]
    Unreadable(String),
}

/// The container format of some encoded bytes, as far as metadata handling cares.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) struct ContainerKind(image::ImageFormat);
impl ContainerKind {
    pub(crate) fn sniff(bytes: &[u8]) -> Option<Self> {
        image::guess_format(bytes).ok().map(Self)
    }
    /// The matching container for EXIF reading/writing, if it can carry EXIF at all.
    pub(crate) fn exif_file_type(self) -> Option<little_exif::filetype::FileExtension> {
        use little_exif::filetype::FileExtension;
        match self.0 {
            image::ImageFormat::Jpeg => Some(FileExtension::JPEG),
            image::ImageFormat::Png => Some(FileExtension::PNG {
                as_zTXt_chunk: false,
            }),
            image::ImageFormat::Tiff => Some(FileExtension::TIFF),
            image::ImageFormat::WebP => Some(FileExtension::WEBP),
            _ => None,
        }
    }
}

/// Decode `bytes` into an upright buffer.
///
/// Missing or unreadable orientation metadata is not an error - the image is assumed to already be upright.
pub fn decode(bytes: &[u8]) -> Result<ImageBuffer, DecodeError> {
    let tag = match read_orientation(bytes) {
        Ok(tag) => tag,
        Err(e) => {
            log::debug!("Orientation unavailable ({e}), assuming identity");
            OrientationTag::Identity
        }
    };
    decode_with_orientation(bytes, tag)
}

/// Decode `bytes`, applying `tag` instead of reading one from the metadata.
pub fn decode_with_orientation(
    bytes: &[u8],
    tag: OrientationTag,
) -> Result<ImageBuffer, DecodeError> {
    let decoded: ImageBuffer = image::load_from_memory(bytes)?.into();
    log::trace!(
        "Decoded {}x{}, orienting by {tag}",
        decoded.width(),
        decoded.height()
    );
    Ok(orientation::orient(decoded, tag))
}

/// Read and decode the file at `path`. See [`decode`].
pub fn decode_file(path: &std::path::Path) -> Result<ImageBuffer, DecodeError> {
    let bytes = std::fs::read(path)?;
    decode(&bytes)
}

/// Read the orientation tag embedded in `bytes` without decoding any pixels.
pub fn read_orientation(bytes: &[u8]) -> Result<OrientationTag, MetadataReadError> {
    // Fast path: JPEG with the tag in IFD0, which is every camera photo.
    if let Some(value) = scan_jpeg_orientation(bytes) {
        return checked(value);
    }

    let file_type = ContainerKind::sniff(bytes)
        .and_then(ContainerKind::exif_file_type)
        .ok_or(MetadataReadError::UnknownContainer)?;
    let metadata = little_exif::metadata::Metadata::new_from_vec(&bytes.to_vec(), file_type)
        .map_err(|e| MetadataReadError::Unreadable(e.to_string()))?;

    let value = metadata
        .get_tag(&little_exif::exif_tag::ExifTag::Orientation(Vec::new()))
        .into_iter()
        .find_map(|tag| match tag {
            little_exif::exif_tag::ExifTag::Orientation(values) => values.first().copied(),
            _ => None,
        })
        .ok_or(MetadataReadError::Missing)?;
    checked(value)
}

fn checked(value: u16) -> Result<OrientationTag, MetadataReadError> {
    OrientationTag::try_from_value(value).ok_or(MetadataReadError::OutOfRange(value))
}

/// Walk JPEG markers to the `Exif\0\0` APP1 segment and read tag 0x0112 from its first IFD.
///
/// `None` if anything along the way doesn't look as expected, leaving the decision to the slower full parse.
fn scan_jpeg_orientation(bytes: &[u8]) -> Option<u16> {
    const SOI: [u8; 2] = [0xFF, 0xD8];
    const APP1: u8 = 0xE1;
    const SOS: u8 = 0xDA;
    if bytes.get(0..2)? != SOI {
        return None;
    }
    let mut pos = 2;
    loop {
        let marker = bytes.get(pos..pos + 2)?;
        if marker[0] != 0xFF {
            return None;
        }
        // Entropy coded data follows, no more metadata segments.
        if marker[1] == SOS {
            return None;
        }
        let len = usize::from(u16::from_be_bytes(bytes.get(pos + 2..pos + 4)?.try_into().ok()?));
        let body = bytes.get(pos + 4..pos + 2 + len)?;
        if marker[1] == APP1 {
            if let Some(tiff) = body.strip_prefix(b"Exif\0\0") {
                return scan_tiff_orientation(tiff);
            }
        }
        pos += 2 + len;
    }
}

fn scan_tiff_orientation(tiff: &[u8]) -> Option<u16> {
    let little_endian = match tiff.get(0..2)? {
        b"II" => true,
        b"MM" => false,
        _ => return None,
    };
    let read_u16 = |at: usize| -> Option<u16> {
        let raw: [u8; 2] = tiff.get(at..at + 2)?.try_into().ok()?;
        Some(if little_endian {
            u16::from_le_bytes(raw)
        } else {
            u16::from_be_bytes(raw)
        })
    };
    let read_u32 = |at: usize| -> Option<u32> {
        let raw: [u8; 4] = tiff.get(at..at + 4)?.try_into().ok()?;
        Some(if little_endian {
            u32::from_le_bytes(raw)
        } else {
            u32::from_be_bytes(raw)
        })
    };
    // TIFF magic
    if read_u16(2)? != 42 {
        return None;
    }
    let ifd = usize::try_from(read_u32(4)?).ok()?;
    let entries = usize::from(read_u16(ifd)?);
    (0..entries).find_map(|idx| {
        let entry = ifd + 2 + idx * 12;
        // SHORT-typed, value stored inline.
        (read_u16(entry)? == EXIF_ORIENTATION_TAG && read_u16(entry + 2)? == 3)
            .then(|| read_u16(entry + 8))
            .flatten()
    })
}

#[cfg(test)]
mod test {
    use super::{decode, decode_file, read_orientation, DecodeError, MetadataReadError};
    use crate::{capture::embed_orientation, orientation::OrientationTag, test_util};

    #[test]
    fn untagged_png_is_identity() {
        let png = test_util::png(200, 100);
        assert!(read_orientation(&png).is_err());
        assert_eq!(decode(&png).unwrap().dimensions(), (200, 100));
    }
    #[test]
    fn untagged_jpeg_decodes_upright() {
        let jpeg = test_util::jpeg(200, 100);
        assert!(read_orientation(&jpeg).is_err());
        assert_eq!(decode(&jpeg).unwrap().dimensions(), (200, 100));
    }
    #[test]
    fn quarter_turn_tags_swap_dimensions() {
        let jpeg = test_util::jpeg(200, 100);
        for (value, swapped) in [(1u16, false), (6, true), (3, false), (8, true)] {
            let tagged = embed_orientation(&jpeg, value).unwrap();
            let decoded = decode(&tagged).unwrap();
            let expected = if swapped { (100, 200) } else { (200, 100) };
            assert_eq!(decoded.dimensions(), expected, "orientation {value}");
        }
    }
    #[test]
    fn rotate_90_scenario() {
        let tagged = embed_orientation(&test_util::jpeg(200, 100), 6).unwrap();
        assert_eq!(read_orientation(&tagged), Ok(OrientationTag::Rotate90));
        assert_eq!(decode(&tagged).unwrap().dimensions(), (100, 200));
    }
    #[test]
    fn out_of_range_tag_recovers() {
        let tagged = embed_orientation(&test_util::jpeg(20, 10), 42).unwrap();
        assert_eq!(read_orientation(&tagged), Err(MetadataReadError::OutOfRange(42)));
        assert_eq!(decode(&tagged).unwrap().dimensions(), (20, 10));
    }
    #[test]
    fn garbage_fails() {
        assert!(matches!(
            decode(b"\x00\x01\x02 not an image"),
            Err(DecodeError::Image(_))
        ));
        assert_eq!(
            read_orientation(b"nope"),
            Err(MetadataReadError::UnknownContainer)
        );
    }
    #[test]
    fn missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            decode_file(&dir.path().join("absent.jpg")),
            Err(DecodeError::Io(_))
        ));
    }
    #[test]
    fn input_is_untouched() {
        let jpeg = test_util::jpeg(16, 8);
        let copy = jpeg.clone();
        let _ = decode(&jpeg).unwrap();
        assert_eq!(jpeg, copy);
    }
}
