use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Id3Error {
    #[error("read of {length} bytes at offset {offset} exceeds window of {available} bytes")]
    OutOfBounds {
        offset: usize,
        length: usize,
        available: usize,
    },

    #[error("Unexpected header size in ID3v2 extended header: declared {declared}, parsed {consumed}")]
    ExtendedHeaderSize { declared: u32, consumed: u32 },

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl Id3Error {
    /// Whether this error describes a malformed tag rather than a bad read request.
    pub fn is_structural(&self) -> bool {
        matches!(self, Id3Error::ExtendedHeaderSize { .. })
    }
}

pub type Result<T> = std::result::Result<T, Id3Error>;
