use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use log::{debug, trace};

use crate::error::FspyError;

/// The four bytes every fSpy file starts with.
pub const FSPY_MAGIC: [u8; 4] = *b"fspy";

/// Size in bytes of the fixed header: magic, version, state size and image size.
pub const FSPY_HEADER_SIZE: usize = 16;

/// A parsed fSpy project.
///
/// The container owns the decoded state block and the raw image bytes. It is immutable once
/// read.
#[derive(Debug, Clone)]
pub struct FspyContainer {
    // The format version stored in the header. Not validated.
    version: u32,
    // The state block with its NUL padding removed.
    state_bytes: Vec<u8>,
    // The state block parsed as JSON.
    state: serde_json::Value,
    // The embedded image file, untouched.
    image: Vec<u8>,
}

impl FspyContainer {
    /// Create a container from an in-memory state and image.
    ///
    /// # Arguments
    ///
    /// * `version` - The format version to report.
    /// * `state` - The calibration state.
    /// * `image` - The encoded image bytes.
    pub fn from_state(
        version: u32,
        state: serde_json::Value,
        image: Vec<u8>,
    ) -> Result<Self, FspyError> {
        let state_bytes = serde_json::to_vec(&state)?;
        Ok(Self {
            version,
            state_bytes,
            state,
            image,
        })
    }

    /// The format version stored in the header.
    #[inline]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// The JSON state text as stored in the file, without NUL padding.
    #[inline]
    pub fn state_bytes(&self) -> &[u8] {
        &self.state_bytes
    }

    /// The parsed JSON state.
    #[inline]
    pub fn state(&self) -> &serde_json::Value {
        &self.state
    }

    /// The raw bytes of the embedded image.
    #[inline]
    pub fn image(&self) -> &[u8] {
        &self.image
    }

    /// Whether the file carries an image.
    #[inline]
    pub fn has_image(&self) -> bool {
        !self.image.is_empty()
    }
}

fn read_u32_le<R: Read>(reader: &mut R) -> Result<u32, FspyError> {
    let mut buf = [0u8; 4];
    reader.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

// A stream shorter than the tag is not an fSpy file, the missing bytes read as zeros.
fn read_magic<R: Read>(reader: &mut R) -> Result<[u8; 4], FspyError> {
    let mut head = Vec::with_capacity(FSPY_MAGIC.len());
    reader.by_ref().take(FSPY_MAGIC.len() as u64).read_to_end(&mut head)?;

    let mut magic = [0u8; 4];
    magic[..head.len()].copy_from_slice(&head);
    Ok(magic)
}

// NOTE: the size comes from the file, so grow the buffer as data arrives instead of trusting
// it for the allocation.
fn read_block<R: Read>(reader: &mut R, len: u32) -> Result<Vec<u8>, FspyError> {
    let mut block = Vec::new();
    reader.by_ref().take(u64::from(len)).read_to_end(&mut block)?;

    if block.len() != len as usize {
        return Err(FspyError::Io(std::io::Error::new(
            std::io::ErrorKind::UnexpectedEof,
            format!("expected a block of {} bytes, found {}", len, block.len()),
        )));
    }

    Ok(block)
}

/// Read an fSpy container from a byte stream.
///
/// The reader is consumed up to the end of the image block. On a magic mismatch nothing past
/// the first four bytes is read.
///
/// # Arguments
///
/// * `reader` - The source of the container bytes.
///
/// # Returns
///
/// The parsed container, or the first error met. A failed read never yields a partial
/// container.
pub fn read_fspy<R: Read>(mut reader: R) -> Result<FspyContainer, FspyError> {
    let magic = read_magic(&mut reader)?;
    trace!("fspy magic: {magic:?}");
    if magic != FSPY_MAGIC {
        return Err(FspyError::BadMagic(magic));
    }

    let version = read_u32_le(&mut reader)?;
    let state_size = read_u32_le(&mut reader)?;
    let image_size = read_u32_le(&mut reader)?;
    trace!("fspy header: version={version} state_size={state_size} image_size={image_size}");

    // the json text is padded with NUL bytes up to the block size
    let mut state_block = read_block(&mut reader, state_size)?;
    state_block.retain(|&b| b != 0);

    let text = String::from_utf8(state_block)?;
    let state = serde_json::from_str::<serde_json::Value>(&text)?;

    let image = read_block(&mut reader, image_size)?;
    trace!("fspy image block: {} bytes", image.len());

    Ok(FspyContainer {
        version,
        state_bytes: text.into_bytes(),
        state,
        image,
    })
}

/// Read an fSpy project file.
///
/// # Arguments
///
/// * `path` - The path to the `.fspy` file.
///
/// # Returns
///
/// The parsed container. The file is closed before returning, on success and on error.
pub fn read_fspy_file(path: impl AsRef<Path>) -> Result<FspyContainer, FspyError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let container = read_fspy(BufReader::new(file))?;
    debug!(
        "parsed fspy file {}: version {}, {} state bytes, {} image bytes",
        path.display(),
        container.version,
        container.state_bytes.len(),
        container.image.len()
    );
    Ok(container)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, ErrorKind, Write};
    use tempfile::NamedTempFile;

    const STATE: &str = r#"{"cameraParameters":{"imageWidth":1920,"imageHeight":1080}}"#;

    fn encode(version: u32, state: &[u8], image: &[u8]) -> Vec<u8> {
        let mut data = Vec::with_capacity(FSPY_HEADER_SIZE + state.len() + image.len());
        data.extend_from_slice(&FSPY_MAGIC);
        data.extend_from_slice(&version.to_le_bytes());
        data.extend_from_slice(&(state.len() as u32).to_le_bytes());
        data.extend_from_slice(&(image.len() as u32).to_le_bytes());
        assert_eq!(data.len(), FSPY_HEADER_SIZE);
        data.extend_from_slice(state);
        data.extend_from_slice(image);
        data
    }

    #[test]
    fn test_read_fspy() -> Result<(), FspyError> {
        let image = [0x89, b'P', b'N', b'G', 1, 2, 3];
        let container = read_fspy(Cursor::new(encode(1, STATE.as_bytes(), &image)))?;
        assert_eq!(container.version(), 1);
        assert_eq!(container.state()["cameraParameters"]["imageWidth"], 1920);
        assert_eq!(container.image(), &image);
        assert!(container.has_image());
        Ok(())
    }

    #[test]
    fn test_roundtrip_bytes() -> Result<(), FspyError> {
        let image = (0..=255u8).collect::<Vec<_>>();
        let data = encode(7, STATE.as_bytes(), &image);
        let container = read_fspy(Cursor::new(&data))?;

        let reencoded = encode(
            container.version(),
            container.state_bytes(),
            container.image(),
        );
        assert_eq!(reencoded, data);
        Ok(())
    }

    #[test]
    fn test_nul_padding_is_stripped() -> Result<(), FspyError> {
        let mut padded = STATE.as_bytes().to_vec();
        padded.extend_from_slice(&[0u8; 13]);
        let container = read_fspy(Cursor::new(encode(1, &padded, b"img")))?;
        assert_eq!(container.state_bytes(), STATE.as_bytes());
        assert_eq!(container.image(), b"img");
        Ok(())
    }

    #[test]
    fn test_any_version_is_accepted() -> Result<(), FspyError> {
        let container = read_fspy(Cursor::new(encode(u32::MAX, b"{}", b"")))?;
        assert_eq!(container.version(), u32::MAX);
        assert!(!container.has_image());
        Ok(())
    }

    #[test]
    fn test_bad_magic_stops_after_four_bytes() {
        let mut data = encode(1, STATE.as_bytes(), b"img");
        data[..4].copy_from_slice(b"fspx");
        let mut cursor = Cursor::new(data);

        let err = read_fspy(&mut cursor).unwrap_err();
        assert!(matches!(err, FspyError::BadMagic(m) if &m == b"fspx"));
        assert!(err.is_format_error());
        assert_eq!(cursor.position(), 4);
    }

    #[test]
    fn test_short_stream_is_bad_magic() {
        for (data, expected) in [
            (&b""[..], [0u8; 4]),
            (&b"fs"[..], *b"fs\0\0"),
            (&b"PK\x03"[..], *b"PK\x03\0"),
            (&b"fsp"[..], *b"fsp\0"),
        ] {
            let err = read_fspy(Cursor::new(data)).unwrap_err();
            assert!(matches!(err, FspyError::BadMagic(m) if m == expected), "{data:?}");
            assert!(err.is_format_error());
        }
    }

    #[test]
    fn test_invalid_json() {
        let err = read_fspy(Cursor::new(encode(1, b"{\"cameraParameters\":", b""))).unwrap_err();
        assert!(matches!(err, FspyError::InvalidStateJson(_)));
        assert!(err.is_format_error());
        assert!(err.to_string().starts_with("invalid state json"));
    }

    #[test]
    fn test_invalid_utf8() {
        let err = read_fspy(Cursor::new(encode(1, &[b'"', 0xff, 0xfe, b'"'], b""))).unwrap_err();
        assert!(matches!(err, FspyError::InvalidStateText(_)));
        assert!(err.is_format_error());
    }

    #[test]
    fn test_truncated_header() {
        let data = b"fspy\x01\x00".to_vec();
        assert!(data.len() < FSPY_HEADER_SIZE);
        let err = read_fspy(Cursor::new(data)).unwrap_err();
        assert!(matches!(err, FspyError::Io(ref e) if e.kind() == ErrorKind::UnexpectedEof));
        assert!(!err.is_format_error());
    }

    #[test]
    fn test_truncated_image_block() {
        let mut data = encode(1, STATE.as_bytes(), b"0123456789");
        data.truncate(data.len() - 3);
        let err = read_fspy(Cursor::new(data)).unwrap_err();
        assert!(matches!(err, FspyError::Io(ref e) if e.kind() == ErrorKind::UnexpectedEof));
    }

    #[test]
    fn test_huge_declared_size_does_not_allocate() {
        let mut data = encode(1, b"{}", b"");
        data[8..12].copy_from_slice(&u32::MAX.to_le_bytes());
        let err = read_fspy(Cursor::new(data)).unwrap_err();
        assert!(matches!(err, FspyError::Io(_)));
    }

    #[test]
    fn test_read_fspy_file() -> Result<(), Box<dyn std::error::Error>> {
        let mut file = NamedTempFile::new()?;
        file.write_all(&encode(1, STATE.as_bytes(), b"jpeg"))?;

        let container = read_fspy_file(file.path())?;
        assert_eq!(container.image(), b"jpeg");
        Ok(())
    }

    #[test]
    fn test_read_fspy_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_fspy_file(dir.path().join("missing.fspy")).unwrap_err();
        assert!(matches!(err, FspyError::Io(ref e) if e.kind() == ErrorKind::NotFound));
    }

    #[test]
    fn test_from_state() -> Result<(), FspyError> {
        let state = serde_json::json!({"cameraParameters": {}});
        let container = FspyContainer::from_state(2, state.clone(), vec![1, 2])?;
        assert_eq!(container.state(), &state);
        assert_eq!(container.state_bytes(), br#"{"cameraParameters":{}}"#);
        Ok(())
    }
}
