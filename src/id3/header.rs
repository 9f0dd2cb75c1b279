use std::fmt;

use crate::common::config::ParseOptions;
use crate::common::error::Result;
use crate::common::util::{get_syncsafe_u32, get_u8};
use crate::id3::extended::{parse_extended_header, ExtendedHeader};

pub const ID3V2_MARKER: &[u8; 3] = b"ID3";
/// Size of the fixed tag header.
pub const ID3V2_HEADER_SIZE: usize = 10;

// Header flag byte bits (%abcd0000)
const FLAG_UNSYNCHRONISATION: u8 = 0b1000_0000;
const FLAG_EXTENDED_HEADER: u8 = 0b0100_0000;
const FLAG_EXPERIMENTAL: u8 = 0b0010_0000;
const FLAG_FOOTER: u8 = 0b0001_0000;

/// ID3v2 version as stored in the header, e.g. `3.0` for ID3v2.3.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Id3v2Version {
    pub minor: u8,
    pub patch: u8,
}

impl fmt::Display for Id3v2Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = itoa::Buffer::new();
        f.write_str("ID3v2.")?;
        f.write_str(buf.format(self.minor))?;
        f.write_str(".")?;
        f.write_str(buf.format(self.patch))
    }
}

/// ID3v2 header flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Id3v2Flags {
    pub unsynchronisation: bool,
    pub extended_header: bool,
    pub experimental_indicator: bool,
    pub footer_present: bool,
}

impl Id3v2Flags {
    pub fn from_byte(byte: u8) -> Self {
        Id3v2Flags {
            unsynchronisation: byte & FLAG_UNSYNCHRONISATION != 0,
            extended_header: byte & FLAG_EXTENDED_HEADER != 0,
            experimental_indicator: byte & FLAG_EXPERIMENTAL != 0,
            footer_present: byte & FLAG_FOOTER != 0,
        }
    }
}

/// Decoded ID3v2 tag header, plus the extended header when flagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct V2Tag {
    pub version: Id3v2Version,
    pub flags: Id3v2Flags,
    /// Tag size excluding the 10 byte header
    pub size: u32,
    pub extended_header: Option<ExtendedHeader>,
}

impl V2Tag {
    /// Header plus body size, which is the span the decoder reads from.
    ///
    /// A footer is not counted, even with `footer_present` set.
    pub fn tag_span(&self) -> usize {
        self.size as usize + ID3V2_HEADER_SIZE
    }
}

/// Search for an ID3v2 tag in the file data.
/// Returns the offset where the tag starts, or None.
pub fn find_id3v2_header(data: &[u8]) -> Option<usize> {
    data.starts_with(ID3V2_MARKER).then_some(0)
}

/// Decode the ID3v2 header (and extended header) at the start of `data`.
///
/// Returns `Ok(None)` if the data doesn't start with `ID3`. Frames are not read.
pub fn read_id3v2(data: &[u8], options: ParseOptions) -> Result<Option<V2Tag>> {
    if find_id3v2_header(data).is_none() {
        log::debug!("No ID3v2 tag found");
        return Ok(None);
    }

    let size = get_syncsafe_u32(data, 6)?;
    let version = Id3v2Version {
        minor: get_u8(data, 3)?,
        patch: get_u8(data, 4)?,
    };
    let flags = Id3v2Flags::from_byte(get_u8(data, 5)?);

    // Only the header and body are visible from here on
    let span = (size as usize + ID3V2_HEADER_SIZE).min(data.len());
    let tag = &data[..span];

    log::debug!("Found {} tag, size: {} bytes", version, size);

    let extended_header = if flags.extended_header {
        Some(parse_extended_header(
            &tag[ID3V2_HEADER_SIZE..],
            options.parsing_mode,
        )?)
    } else {
        None
    };

    Ok(Some(V2Tag {
        version,
        flags,
        size,
        extended_header,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::ParsingMode;
    use crate::common::error::Id3Error;

    #[test]
    fn v2_3_header() {
        let data = [b'I', b'D', b'3', 3, 0, 0, 0, 0, 0x02, 0x01];
        let tag = read_id3v2(&data, ParseOptions::new()).unwrap().unwrap();
        assert_eq!(tag.version, Id3v2Version { minor: 3, patch: 0 });
        assert_eq!(tag.version.to_string(), "ID3v2.3.0");
        assert_eq!(tag.flags, Id3v2Flags::default());
        assert_eq!(tag.size, 257);
        assert_eq!(tag.tag_span(), 267);
        assert_eq!(tag.extended_header, None);
    }

    #[test]
    fn flag_bits() {
        assert_eq!(
            Id3v2Flags::from_byte(0xF0),
            Id3v2Flags {
                unsynchronisation: true,
                extended_header: true,
                experimental_indicator: true,
                footer_present: true,
            }
        );
        let flags = Id3v2Flags::from_byte(0x90);
        assert!(flags.unsynchronisation && flags.footer_present);
        assert!(!flags.extended_header && !flags.experimental_indicator);
        // Undefined low bits are ignored
        assert_eq!(Id3v2Flags::from_byte(0x0F), Id3v2Flags::default());
    }

    #[test]
    fn footer_does_not_extend_span() {
        let data = [b'I', b'D', b'3', 4, 0, 0x10, 0, 0, 0, 20];
        let tag = read_id3v2(&data, ParseOptions::new()).unwrap().unwrap();
        assert!(tag.flags.footer_present);
        assert_eq!(tag.tag_span(), 30);
    }

    #[test]
    fn extended_header_is_bounded_by_tag_size() {
        // Declared body size of 3 leaves no room for the extended header,
        // even though the window itself continues
        let mut data = vec![b'I', b'D', b'3', 4, 0, 0x40, 0, 0, 0, 3];
        data.extend_from_slice(&[0, 0, 0, 6, 1, 0x40, 0, 0]);
        assert!(matches!(
            read_id3v2(&data, ParseOptions::new()),
            Err(Id3Error::OutOfBounds { .. })
        ));

        data[9] = 8;
        let tag = read_id3v2(&data, ParseOptions::new()).unwrap().unwrap();
        assert_eq!(tag.extended_header.map(|h| h.size), Some(6));
    }

    #[test]
    fn relaxed_mode() {
        let mut data = vec![b'I', b'D', b'3', 4, 0, 0x40, 0, 0, 0, 8];
        data.extend_from_slice(&[0, 0, 0, 9, 1, 0x40, 0, 0]);
        assert!(read_id3v2(&data, ParseOptions::new()).is_err());

        let relaxed = ParseOptions::new().parsing_mode(ParsingMode::Relaxed);
        let tag = read_id3v2(&data, relaxed).unwrap().unwrap();
        assert_eq!(tag.extended_header.map(|h| h.size), Some(9));
    }

    #[test]
    fn not_id3v2() {
        assert_eq!(read_id3v2(b"TAG", ParseOptions::new()), Ok(None));
        assert_eq!(read_id3v2(b"ID", ParseOptions::new()), Ok(None));
        assert_eq!(read_id3v2(&[], ParseOptions::new()), Ok(None));
    }

    #[test]
    fn truncated_header() {
        assert!(matches!(
            read_id3v2(b"ID3\x04\x00\x00\x00", ParseOptions::new()),
            Err(Id3Error::OutOfBounds { .. })
        ));
    }
}
