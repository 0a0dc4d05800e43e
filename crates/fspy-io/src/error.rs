/// An error type for reading fSpy containers.
#[derive(thiserror::Error, Debug)]
pub enum FspyError {
    /// Error to open, read or write a file.
    #[error("Failed to manipulate the file. {0}")]
    Io(#[from] std::io::Error),

    /// The file does not start with the `fspy` tag. Files shorter than the tag are padded
    /// with zeros.
    #[error("bad magic: expected \"fspy\", found {0:?}")]
    BadMagic([u8; 4]),

    /// The state block is not valid UTF-8.
    #[error("invalid state json: {0}")]
    InvalidStateText(#[from] std::string::FromUtf8Error),

    /// The state block is not valid JSON.
    #[error("invalid state json: {0}")]
    InvalidStateJson(#[from] serde_json::Error),
}

impl FspyError {
    /// Whether the error comes from malformed file contents rather than from the filesystem.
    pub fn is_format_error(&self) -> bool {
        !matches!(self, FspyError::Io(_))
    }
}
